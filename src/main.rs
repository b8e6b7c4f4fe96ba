use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{extract::DefaultBodyLimit, http::StatusCode, middleware::from_fn, routing::get, Router};
use lipci_storefront::core::config::{Config, SwaggerConfig};
use lipci_storefront::core::openapi::{ApiDoc, SwaggerInfoModifier};
use lipci_storefront::core::{database, middleware};
use lipci_storefront::features::categories::{
    routes as categories_routes, CategoryService, PgCategoryRepository,
};
use lipci_storefront::features::messages::{
    routes as messages_routes, MessageService, PgMessageRepository,
};
use lipci_storefront::features::products::{
    routes as products_routes, PgProductRepository, ProductService,
};
use lipci_storefront::modules::storage::MinIOClient;
use socket2::{Domain, Protocol, Socket, TcpKeepalive, Type};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

const SOCKET_BUFFER_SIZE: usize = 256 * 1024;
const LISTEN_BACKLOG: i32 = 65535;

fn main() -> anyhow::Result<()> {
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(available_cpus);

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?
        .block_on(serve(worker_threads))
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

async fn serve(worker_threads: usize) -> anyhow::Result<()> {
    // RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!("Failed to load .env file: {}", e);
        }
    }

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Starting storefront API: cpus={}, worker_threads={}, pid={}",
        available_cpus(),
        worker_threads,
        std::process::id()
    );

    let pool = database::create_pool(&config.database).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Migration failed")?;
    tracing::info!("Database ready, migrations applied");

    let images = Arc::new(MinIOClient::new(config.minio.clone()).context("MinIO client")?);
    images.prepare().await.context("MinIO bucket preparation")?;

    let api = Router::new()
        .merge(categories_routes::routes(Arc::new(CategoryService::new(
            Arc::new(PgCategoryRepository::new(pool.clone())),
            images,
        ))))
        .merge(messages_routes::routes(Arc::new(MessageService::new(
            Arc::new(PgMessageRepository::new(pool.clone())),
        ))))
        .merge(products_routes::routes(Arc::new(ProductService::new(
            Arc::new(PgProductRepository::new(pool)),
            config.catalog.search_default_limit,
        ))));

    let app = Router::new()
        .merge(swagger_router(&config.swagger))
        .merge(api)
        .route("/health", get(|| async { StatusCode::OK }))
        // Category images arrive inline as base64 data URIs
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(config.app.cors_allowed_origins.clone()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let listener = bind(addr.parse().context("Invalid server address")?)?;
    tracing::info!("Listening on http://{} (docs at /swagger-ui/)", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Swagger UI with the configured title, optionally behind basic auth
fn swagger_router(swagger: &SwaggerConfig) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: swagger.title.clone(),
        version: swagger.version.clone(),
        description: swagger.description.clone(),
    }
    .modify(&mut openapi);

    let router =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    match swagger.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI protected by basic auth");
            router.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
        }
        None => {
            tracing::info!("Swagger UI open (no credentials configured)");
            router
        }
    }
}

/// TCP listener with address reuse, no Nagle, larger buffers and keepalive
fn bind(addr: SocketAddr) -> anyhow::Result<tokio::net::TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;

    let keepalive = TcpKeepalive::new().with_time(Duration::from_secs(60));
    #[cfg(target_os = "linux")]
    let keepalive = keepalive
        .with_interval(Duration::from_secs(10))
        .with_retries(3);
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}
