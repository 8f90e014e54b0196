mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StoreBackend};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{routes as auth_routes, TokenService};
use crate::features::categories::{routes as categories_routes, CategoryResolver, CategoryService};
use crate::features::works::{routes as works_routes, WorkRepository, WorkService};
use crate::modules::store::{MemoryWorksStore, PgWorksStore, WorksStore};
use crate::shared::constants::SERVICE_NAME;
use axum::{middleware::from_fn, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/api/works": "Active works, optional ?category=<name>",
            "/api/works/category/{category_name}": "Active works in a category",
            "/api/works/slug/{work_slug}": "Active work by slug",
            "/api/works/{work_id}": "Work by id",
            "/api/works/{work_id}/view": "Render target of a work",
            "/api/categories": "Active categories",
            "/api/categories/names": "Category names",
            "/api/views": "Registered views",
            "/api/auth/login": "Admin login",
            "/api/admin/works": "Works management"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": SERVICE_NAME }))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    // Load configuration; APP_ENV picks the log level when RUST_LOG is unset
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.app.environment.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!(
        "Configuration loaded successfully (environment={})",
        config.app.environment
    );

    // Select the works store
    let store: Arc<dyn WorksStore> = match config.store.backend {
        StoreBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres store"))?;

            let pool = database::create_pool(db_config).await?;
            tracing::info!("Database connection pool created");

            // Run migrations automatically
            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            Arc::new(PgWorksStore::new(pool, &config.store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory works store; data is lost on restart");
            Arc::new(MemoryWorksStore::seeded())
        }
    };
    tracing::info!(
        "Works store initialized: backend={}, works={}, categories={}",
        store.backend_name(),
        config.store.works_table_ref(),
        config.store.categories_table_ref()
    );

    // Initialize Category Services
    let category_service = Arc::new(CategoryService::new(Arc::clone(&store)));
    if !category_service.refresh().await {
        tracing::warn!("Categories unavailable at startup, serving the built-in catalogue");
    }
    let category_resolver = Arc::new(CategoryResolver::new(Arc::clone(&store)));

    // Initialize Works Services
    let work_repository = Arc::new(WorkRepository::new(
        Arc::clone(&store),
        category_resolver,
    ));
    let work_service = Arc::new(WorkService::new(
        work_repository,
        Arc::clone(&category_service),
    ));
    tracing::info!("Work service initialized");

    // Initialize admin token service
    let token_service = Arc::new(TokenService::new(config.admin_auth.clone()));
    tracing::info!(
        "Admin auth initialized (token ttl {}s)",
        config.admin_auth.token_ttl.as_secs()
    );

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require admin bearer token)
    let protected_routes = Router::new()
        .merge(works_routes::admin_routes(Arc::clone(&work_service)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&token_service),
            middleware::auth_middleware,
        ));

    // Service info endpoints (no auth required, no envelope)
    let info_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(token_service))
        .merge(works_routes::routes(work_service))
        .merge(categories_routes::routes(category_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(info_routes)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("{} listening on http://{}", SERVICE_NAME, addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
