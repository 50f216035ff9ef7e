use hr_engine::api::{create_router, AppState};
use hr_engine::config::ConfigLoader;
use hr_engine::logging::init_logging;
use tracing::info;

const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir =
        std::env::var("HR_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;

    let organisation = config.organisation();
    init_logging(&organisation.logging);
    let address = format!("{}:{}", organisation.server.host, organisation.server.port);
    info!(
        config_dir = %config_dir,
        organisation = %organisation.name,
        "Configuration loaded"
    );

    let router = create_router(AppState::bootstrap(config));
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(address = %address, "HR engine listening");
    axum::serve(listener, router).await?;
    Ok(())
}
