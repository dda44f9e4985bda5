use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use swap_router::feed::SnapshotFeed;
use swap_router::orchestrator::{get_quote as build_quote, refresh_pair_data};
use swap_router::types::{DexConfig, QuoteRequest, QuoteResponse, ResponseHop};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppState {
    config: Arc<DexConfig>,
    feed: Arc<SnapshotFeed>,
}

#[derive(OpenApi)]
#[openapi(
    paths(get_quote, update_pair_data, health),
    components(schemas(QuoteRequest, QuoteResponse, ResponseHop)),
    tags(
        (name = "quotes", description = "Swap routes and quotes for a token pair")
    )
)]
struct ApiDoc;

#[utoipa::path(
    get,
    path = "/quote",
    params(QuoteRequest),
    responses(
        (status = 200, description = "Swap quote with route, minimum output and price impact", body = QuoteResponse),
        (status = 422, description = "No route, insufficient liquidity or invalid request")
    ),
    tag = "quotes"
)]
async fn get_quote(
    State(state): State<AppState>,
    Query(params): Query<QuoteRequest>,
) -> Result<Json<QuoteResponse>, (StatusCode, String)> {
    build_quote(state.config.as_ref(), &params)
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, format!("{}", e)))
}

#[utoipa::path(
    post,
    path = "/update_pair_data",
    responses(
        (status = 200, description = "Successfully refreshed the pair snapshot"),
        (status = 502, description = "Snapshot feed unavailable")
    ),
    tag = "quotes"
)]
async fn update_pair_data(State(state): State<AppState>) -> Result<String, (StatusCode, String)> {
    refresh_pair_data(state.config.as_ref(), state.feed.as_ref())
        .await
        .map(|count| format!("refreshed {} pairs", count))
        .map_err(|e| (StatusCode::BAD_GATEWAY, format!("{}", e)))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "quotes"
)]
async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swap_router=debug,info".into()),
        )
        .init();

    let config_path = PathBuf::from("dex_config.toml");
    let config = Arc::new(DexConfig::load_from(config_path)?);
    let feed = Arc::new(SnapshotFeed::new(&config.backend_url));

    let state = AppState {
        config: config.clone(),
        feed: feed.clone(),
    };

    // Keep displayed quotes reasonably fresh while the service runs,
    // independent of any incoming request.
    let refresh_state = state.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(
            refresh_state.config.refresh_secs.max(1),
        ));
        loop {
            ticker.tick().await;
            if let Err(e) =
                refresh_pair_data(refresh_state.config.as_ref(), refresh_state.feed.as_ref()).await
            {
                warn!("snapshot refresh failed: {:#}", e);
            }
        }
    });

    let openapi = ApiDoc::openapi();
    let app = Router::new()
        .route("/quote", get(get_quote))
        .route("/update_pair_data", post(update_pair_data))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.listen_port));
    info!("server running on http://{}", addr);
    info!("swagger ui available at http://{}/swagger-ui/", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
