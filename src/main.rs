use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

use warehouse::{
    app::product::repository::ProductRepository,
    config::{load_config, Config, StorageBackend},
    infrastructure::{logger::Logger, memory::InMemoryProductRepository},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 第一个命令行参数可以指定配置文件
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    Logger::init(&config.logging.level);
    info!("Starting warehouse inventory service...");

    let repository = build_repository(&config).await.map_err(|e| {
        error!("Failed to initialize storage: {}", e);
        e
    })?;

    let state = warehouse::app_state(repository);
    let app = warehouse::build_app(state, Duration::from_secs(config.http.timeout_seconds));

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Warehouse service running on http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /product/searchByParam?param=&paramValue=");
    info!("   DELETE /product/deleteByParam?param=&paramValue=");
    info!("   PUT    /product/editByParam?param=&paramValue=&article=");
    info!("   GET    /product/getAll");
    info!("   DELETE /product/deleteAll");
    info!("   POST   /product/createProduct");
    info!("   GET    /health");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_repository(
    config: &Config,
) -> Result<Arc<dyn ProductRepository>, Box<dyn std::error::Error>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory product storage");
            Ok(Arc::new(InMemoryProductRepository::new()))
        }
        #[cfg(feature = "database")]
        StorageBackend::Postgres => {
            use warehouse::infrastructure::database::{DatabaseManager, PgProductRepository};

            let url = config
                .database_url()
                .ok_or("postgres storage requires database.url or DATABASE_URL")?;
            let manager = DatabaseManager::new(&config.database, &url).await?;
            manager.create_tables().await?;
            Ok(Arc::new(PgProductRepository::new(manager.get_pool().clone())))
        }
        #[cfg(not(feature = "database"))]
        StorageBackend::Postgres => {
            Err("postgres storage requires the `database` feature".into())
        }
    }
}
