use sessiongate::config::{load_config, print_schema};
use sessiongate::startup::run;
use sessiongate::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    if std::env::args().any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = load_config();
    init_logging(&config.logging);

    match run(&config).await {
        Ok(user) => println!("{}", user),
        Err(e) => {
            eprintln!("Login failed: {}", e);
            std::process::exit(1);
        }
    }
}
