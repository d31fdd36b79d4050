use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use database::{ConnectionProvider, DbRepository, StockStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StockStore>,
}

impl AppState {
    pub fn new(store: impl StockStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Builds the application routes on top of the given state.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/stock",
            get(handlers::get_all_stocks).post(handlers::create_stock),
        )
        .route(
            "/api/stock/:id",
            get(handlers::get_stock)
                .put(handlers::update_stock)
                .delete(handlers::delete_stock),
        )
        .with_state(app_state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// The main function to configure and run the web server.
///
/// Tracing is initialized by the binary before this is called.
pub async fn run_server(addr: SocketAddr, provider: ConnectionProvider) -> anyhow::Result<()> {
    let db_repo = DbRepository::new(provider.clone());
    let app = router(Arc::new(AppState::new(db_repo)));

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    provider.close().await;
    Ok(())
}
