mod db;
mod platforms;
mod rate_limit;
mod routes;
mod services;
mod state;

use crate::services::token::TokenConfig;
use crate::services::usage::DEFAULT_USAGE_LIMIT;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8000".into())
        .parse()
        .expect("invalid PORT");
    let usage_limit: i64 = std::env::var("AI_USAGE_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_USAGE_LIMIT);

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // A typo in AI_DISABLED_PLATFORMS or a malformed timeout is a startup
    // error; a missing vendor key is not (that platform fails at call time).
    let platforms = platforms::PlatformRegistry::from_env().expect("platform config invalid");
    for platform in platforms::Platform::ALL {
        tracing::info!(
            platform = %platform,
            available = platforms.is_available(platform),
            "platform registered"
        );
    }

    let state = state::AppState::new(
        pool,
        platforms,
        rate_limit::RateLimiter::new(),
        TokenConfig::from_env(),
        usage_limit,
    );

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, %usage_limit, "chatgate listening");
    axum::serve(listener, app).await.expect("server failed");
}
