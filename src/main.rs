use lending_ledger::{
    adapters::memory::InMemoryCatalogStore,
    adapters::mock::MockPaymentGateway,
    api::{handlers::AppState, router::create_router},
    application::lending::ServiceDependencies,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lending_ledger=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize adapters: in-memory store, mock gateway
    let catalog_store = Arc::new(InMemoryCatalogStore::new());
    let payment_gateway = Arc::new(MockPaymentGateway::new());

    let deps = ServiceDependencies {
        catalog_store,
        payment_gateway,
    };

    let app_state = Arc::new(AppState { deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
