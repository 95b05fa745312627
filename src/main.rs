use edu_lms::config::{APP_NAME, Config};
use edu_lms::routes;
use edu_lms::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let port = config.port;
    tracing::info!(backend = ?config.auth_backend, api_url = %config.api_url, "auth backend selected");

    let app = routes::app(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "{APP_NAME} listening");
    axum::serve(listener, app).await.expect("server failed");
}
