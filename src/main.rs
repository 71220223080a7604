use log::error;
use section_scheduler::{config::AppConfig, server};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    if let Err(e) = server::run_server(&config).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
