use tracing::info;
use warp::Filter;

use deal_assistant::{api, build_state, config, error, metrics, middleware};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so LOG_LEVEL can seed the filter
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!("Starting Deal Intelligence Assistant");

    let state = build_state(&config)?;
    info!(
        deals = state.responder.retriever().store().len(),
        "Datasets loaded"
    );

    let api_routes = api::routes(state)
        .with(warp::log("api"))
        .with(middleware::cors(config.cors_origin.as_deref()));

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({"status": "healthy"})));

    let metrics_route = warp::path("metrics").and(warp::get()).map(|| {
        let (buffer, content_type) = metrics::encode();
        warp::reply::with_header(buffer, "Content-Type", content_type)
    });

    let routes = health
        .or(metrics_route)
        .or(api_routes)
        .recover(error::handle_rejection);

    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", addr.1);

    warp::serve(routes).run(addr).await;

    Ok(())
}
