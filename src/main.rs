mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::admin::{routes as admin_routes, AdminService};
use crate::features::alerts::{
    routes as alerts_routes, AlertHub, AlertService, DecisionCache, PgAlertHistoryRepository,
};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, JwtValidator, TokenService};
use crate::features::favorites::{
    routes as favorites_routes, AqiPoller, FavoriteCityService, PgFavoriteCityRepository,
};
use crate::features::pollution::{
    routes as pollution_routes, AirQualityProvider, OpenWeatherClient, PollutionService,
};
use crate::features::users::{routes as users_routes, PgUserRepository, UserService};
use crate::modules::mailer::{EmailTemplates, Mailer, SmtpMailer};
use axum::{middleware::from_fn, Router};
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

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Repositories
    let user_repository = Arc::new(PgUserRepository::new(pool.clone()));
    let favorite_repository = Arc::new(PgFavoriteCityRepository::new(pool.clone()));
    let alert_history_repository = Arc::new(PgAlertHistoryRepository::new(pool.clone()));

    // Initialize auth
    let jwt_validator = Arc::new(JwtValidator::new(
        &config.auth.jwt_secret,
        &config.auth.jwt_issuer,
    ));
    let token_service = Arc::new(TokenService::new(&config.auth));
    tracing::info!("Auth configuration initialized");

    // Initialize mailer
    let mailer: Arc<dyn Mailer> = Arc::new(
        SmtpMailer::new(&config.smtp)
            .map_err(|e| anyhow::anyhow!("Failed to initialize SMTP mailer: {}", e))?,
    );
    let email_templates = Arc::new(
        EmailTemplates::new()
            .map_err(|e| anyhow::anyhow!("Failed to load email templates: {}", e))?,
    );
    tracing::info!(
        "SMTP mailer initialized ({}:{})",
        config.smtp.host,
        config.smtp.port
    );

    // Initialize air quality provider
    let provider: Arc<dyn AirQualityProvider> = Arc::new(
        OpenWeatherClient::new(&config.openweather)
            .map_err(|e| anyhow::anyhow!("Failed to initialize OpenWeatherMap client: {}", e))?,
    );
    let pollution_service = Arc::new(PollutionService::new(
        Arc::clone(&provider),
        config.openweather.cache_ttl,
    ));
    tracing::info!("Pollution service initialized");

    // Initialize alerting
    let alert_hub = Arc::new(AlertHub::new());
    let decision_cache = DecisionCache::new(config.alerts.decision_cache_ttl);
    let alert_service = Arc::new(AlertService::new(
        alert_history_repository,
        alert_hub.clone(),
        Arc::clone(&mailer),
        Arc::clone(&email_templates),
        decision_cache.clone(),
    ));
    tracing::info!("Alert service initialized");

    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        Arc::clone(&mailer),
        Arc::clone(&email_templates),
        Arc::clone(&token_service),
    ));
    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        decision_cache.clone(),
    ));
    let favorite_service = Arc::new(FavoriteCityService::new(
        favorite_repository.clone(),
        user_repository.clone(),
        Arc::clone(&provider),
        Arc::clone(&alert_service),
        decision_cache.clone(),
    ));
    let admin_service = Arc::new(AdminService::new(
        user_repository.clone(),
        favorite_repository.clone(),
        Arc::clone(&alert_service),
        Arc::clone(&mailer),
        Arc::clone(&email_templates),
        decision_cache,
        Arc::clone(&pollution_service),
    ));
    tracing::info!("Feature services initialized");

    // Spawn background AQI poller
    if config.alerts.poll_enabled {
        let poller = AqiPoller::new(
            favorite_repository,
            user_repository,
            Arc::clone(&provider),
            Arc::clone(&alert_service),
            config.alerts.poll_interval,
        );
        tokio::spawn(async move {
            poller.run().await;
        });
        tracing::info!("AQI poller worker spawned");
    } else {
        tracing::info!("AQI poller disabled");
    }

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

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(users_routes::routes(user_service))
        .merge(favorites_routes::routes(favorite_service))
        .merge(alerts_routes::routes(alert_service, alert_hub))
        .nest("/api/admin", admin_routes::routes(admin_service))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(pollution_routes::routes(pollution_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
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
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
