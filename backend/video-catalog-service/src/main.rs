use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::task::JoinSet;
use tonic::transport::Server;
use tonic_health::server::health_reporter;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use video_catalog_service::config::{Config, StoreBackend};
use video_catalog_service::grpc::proto::video_catalog_service_server::VideoCatalogServiceServer;
use video_catalog_service::grpc::VideoCatalogGrpc;
use video_catalog_service::metrics::metrics_handler;
use video_catalog_service::repository::{
    InMemoryVideoRepository, PostgresVideoRepository, VideoRepository,
};
use video_catalog_service::services::VideoCatalog;
use video_catalog_service::MIGRATOR;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "video_catalog_service=info,db_pool=info".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn readiness(repo: web::Data<Arc<dyn VideoRepository>>) -> impl Responder {
    match repo.health_check().await {
        Ok(()) => HttpResponse::Ok().body("READY"),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().body(format!("not ready: {}", e))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting video-catalog-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: env={}, http_port={}, grpc_port={}, store={:?}, delete_policy={:?}",
        config.app.env,
        config.app.http_port,
        config.grpc.port,
        config.catalog.store,
        config.catalog.delete_policy
    );

    let repo: Arc<dyn VideoRepository> = match (config.catalog.store, config.database.clone()) {
        (StoreBackend::Postgres, Some(db_config)) => {
            db_config.log_config();
            let pool = db_pool::create_pool(db_config)
                .await
                .context("Failed to create database pool")?;
            info!("Database pool created and verified");

            if config.catalog.run_migrations {
                MIGRATOR
                    .run(&pool)
                    .await
                    .context("Failed to run database migrations")?;
                info!("Database migrations completed");
            }

            Arc::new(PostgresVideoRepository::new(pool))
        }
        (StoreBackend::Postgres, None) => {
            anyhow::bail!("Postgres store selected without database configuration");
        }
        (StoreBackend::Memory, _) => {
            warn!("Using in-memory video store; records are lost on restart");
            Arc::new(InMemoryVideoRepository::new())
        }
    };

    let catalog = VideoCatalog::new(repo.clone(), config.catalog.delete_policy);

    let grpc_addr = format!("{}:{}", config.app.host, config.grpc.port)
        .parse()
        .context("Invalid gRPC address")?;
    let http_addr = format!("{}:{}", config.app.host, config.app.http_port);

    info!("Starting servers:");
    info!("  - HTTP health checks: http://{}", http_addr);
    info!("  - gRPC service: grpc://{}", grpc_addr);

    let mut join_set = JoinSet::new();

    let http_repo = repo.clone();
    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(http_repo.clone()))
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/ready", web::get().to(readiness))
            .route("/metrics", web::get().to(metrics_handler))
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run();

    join_set.spawn(async move {
        http_server
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))
    });

    let (mut health_reporter, health_service) = health_reporter();
    health_reporter
        .set_serving::<VideoCatalogServiceServer<VideoCatalogGrpc>>()
        .await;

    let grpc_service = VideoCatalogGrpc::new(catalog);
    join_set.spawn(async move {
        Server::builder()
            .add_service(health_service)
            .add_service(VideoCatalogServiceServer::new(grpc_service))
            .serve_with_shutdown(grpc_addr, shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("gRPC server error: {}", e))
    });

    info!("video-catalog-service is running");

    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(Ok(())) => {
                info!("Task completed successfully");
            }
            Ok(Err(e)) => {
                tracing::error!("Task failed: {:#}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::error!("Task panicked: {:#}", e);
                return Err(anyhow::anyhow!("Task panicked: {}", e));
            }
        }
    }

    info!("video-catalog-service shutting down");
    Ok(())
}
