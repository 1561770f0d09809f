use customer_service::{ Config, Result };
use migration::MigratorTrait;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "customer_service=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| customer_service::AppError::Config(e.to_string()))?;

    // Initialize database connection
    let db = sea_orm::Database
        ::connect(&config.database_url).await
        .map_err(customer_service::AppError::Database)?;

    tracing::info!("Database connected successfully");

    // Run migrations
    migration::Migrator::up(&db, None).await.map_err(customer_service::AppError::Database)?;

    tracing::info!("Migrations completed successfully");

    // Initialize repositories, sharing one retry policy at the storage boundary
    let retry = config.retry_policy();
    let customers = Arc::new(
        customer_service::db::CustomerRepository::new(db.clone(), retry.clone())
    );
    let addresses = Arc::new(customer_service::db::AddressRepository::new(db, retry));

    // Create app state and router
    let app_state = customer_service::api::AppState::new(customers, addresses);
    let app = customer_service::api
        ::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| customer_service::AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| customer_service::AppError::Internal(e.to_string()))?;

    Ok(())
}
