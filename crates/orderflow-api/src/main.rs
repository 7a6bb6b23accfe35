//! Orderflow API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use orderflow_api::routes;
use orderflow_api::state::AppState;
use orderflow_kafka::consumer::PaymentConsumer;
use orderflow_kafka::producer::KafkaOrderProducer;
use orderflow_orders::lines::LineService;
use orderflow_orders::service::OrderService;
use orderflow_store::pg_item_repository::PgItemRepository;
use orderflow_store::pg_order_line_repository::PgOrderLineRepository;
use orderflow_store::pg_order_repository::PgOrderRepository;
use orderflow_store::schema;
use orderflow_users::HttpUserClient;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Orderflow API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL environment variable must be set")?;
    let user_service_url = std::env::var("USER_SERVICE_URL")
        .map_err(|_| "USER_SERVICE_URL environment variable must be set")?;
    let kafka_brokers = std::env::var("KAFKA_BROKERS")
        .map_err(|_| "KAFKA_BROKERS environment variable must be set")?;
    let orders_topic = env_or("ORDERS_TOPIC", "orders");
    let payments_topic = env_or("PAYMENTS_TOPIC", "payments");
    let dead_payments_topic = env_or("DEAD_PAYMENTS_TOPIC", "dead-payments");
    let host = env_or("HOST", "0.0.0.0");
    let port: u16 = env_or("PORT", "3000")
        .parse()
        .map_err(|e| format!("PORT must be a valid u16: {e}"))?;
    let user_timeout: u64 = env_or("USER_LOOKUP_TIMEOUT_SECS", "5")
        .parse()
        .map_err(|e| format!("USER_LOOKUP_TIMEOUT_SECS must be a valid u64: {e}"))?;

    // Create database connection pool and ensure the schema exists.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    schema::apply_schema(&pool).await?;

    // Build collaborators.
    let items = Arc::new(PgItemRepository::new(pool.clone()));
    let orders = Arc::new(PgOrderRepository::new(pool.clone()));
    let order_lines = Arc::new(PgOrderLineRepository::new(pool));
    let users = Arc::new(HttpUserClient::new(
        user_service_url,
        Duration::from_secs(user_timeout),
    )?);
    let producer = Arc::new(KafkaOrderProducer::new(
        &kafka_brokers,
        orders_topic,
        Duration::from_secs(5),
    )?);

    let order_service = Arc::new(OrderService::new(
        orders.clone(),
        items.clone(),
        users,
        producer,
    ));
    let line_service = Arc::new(LineService::new(order_lines, orders, items.clone()));

    // Start the payment consumer alongside the HTTP server.
    let consumer = PaymentConsumer::new(
        &kafka_brokers,
        &payments_topic,
        dead_payments_topic,
        order_service.clone(),
    )?;
    tokio::spawn(consumer.run());

    // Build application state.
    let app_state = AppState::new(items, order_service, line_service);

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api/items", routes::items::router())
        .nest("/api/orders", routes::orders::router())
        .nest("/api/order-items", routes::order_lines::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
