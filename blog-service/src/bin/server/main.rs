use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use blog_service::config::Config;
use blog_service::domain::article::service::ArticleService;
use blog_service::domain::authentication::service::AuthService;
use blog_service::domain::category::service::CategoryService;
use blog_service::domain::demo::service::DemoService;
use blog_service::domain::tag::service::TagService;
use blog_service::domain::user::service::UserService;
use blog_service::inbound::http::router::create_router;
use blog_service::inbound::http::router::AppState;
use blog_service::outbound::extractor::HttpContentExtractor;
use blog_service::outbound::repositories::PostgresArticleRepository;
use blog_service::outbound::repositories::PostgresAuthenticationRepository;
use blog_service::outbound::repositories::PostgresCategoryRepository;
use blog_service::outbound::repositories::PostgresDemoRepository;
use blog_service::outbound::repositories::PostgresTagRepository;
use blog_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "blog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        environment = ?config.application.environment,
        http_port = config.server.http_port,
        jwt_issuer = %config.jwt.issuer,
        extractor_timeout_seconds = config.extractor.timeout_seconds,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        &config.jwt.authenticator_config(),
        PasswordHasher::new(),
    ));

    let article_repository = Arc::new(PostgresArticleRepository::new(pg_pool.clone()));
    let category_repository = Arc::new(PostgresCategoryRepository::new(pg_pool.clone()));
    let tag_repository = Arc::new(PostgresTagRepository::new(pg_pool.clone()));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let authentication_repository =
        Arc::new(PostgresAuthenticationRepository::new(pg_pool.clone()));
    let demo_repository = Arc::new(PostgresDemoRepository::new(pg_pool));
    let extractor = Arc::new(HttpContentExtractor::new(
        config.extractor.timeout(),
        &config.extractor.user_agent,
    )?);

    let state = AppState {
        article_service: Arc::new(ArticleService::new(
            article_repository,
            Arc::clone(&tag_repository),
            extractor,
        )),
        category_service: Arc::new(CategoryService::new(category_repository)),
        tag_service: Arc::new(TagService::new(tag_repository)),
        user_service: Arc::new(UserService::new(user_repository, PasswordHasher::new())),
        auth_service: Arc::new(AuthService::new(authentication_repository, authenticator)),
        demo_service: Arc::new(DemoService::new(demo_repository)),
        environment: config.application.environment,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
