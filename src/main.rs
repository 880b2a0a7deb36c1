use weather_mcp_server::{build_app, config::Config, logging, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_logging(config.log_format);

    let bind_socket = config.bind_socket()?;
    let state = AppState::from_config(&config)?;
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        bind_port = config.bind_port,
        server_name = %config.identity.name,
        protocol_version = %config.identity.protocol_version,
        error_mapping = ?config.error_mapping,
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
