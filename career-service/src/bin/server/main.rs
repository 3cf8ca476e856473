use std::sync::Arc;

use auth::Authenticator;
use career_service::career_path::ports::CareerPathServicePort;
use career_service::career_path::service::CareerPathService;
use career_service::config::Config;
use career_service::domain::user::models::DisplayName;
use career_service::domain::user::models::EmailAddress;
use career_service::domain::user::models::Password;
use career_service::domain::user::models::RegisterCommand;
use career_service::domain::user::ports::UserRepository;
use career_service::domain::user::service::UserService;
use career_service::inbound::http::router::create_router;
use career_service::outbound::repositories::InMemoryStore;
use career_service::outbound::repositories::PostgresCareerPathRepository;
use career_service::outbound::repositories::PostgresUserRepository;
use career_service::user::ports::UserServicePort;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "career_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "career-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        store = if config.database.url.is_some() { "postgresql" } else { "memory" },
        store_timeout_ms = config.database.timeout_ms,
        token_lifetime_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())
            .with_token_lifetime(config.token_lifetime()),
    );
    let store_timeout = config.database.timeout();

    let (user_service, career_path_service) = match &config.database.url {
        Some(url) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(store_timeout)
                .connect(url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let user_service = UserService::new(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::clone(&authenticator),
                store_timeout,
            );
            bootstrap_admin(&config, &user_service).await?;

            let user_service: Arc<dyn UserServicePort> = Arc::new(user_service);
            let career_path_service: Arc<dyn CareerPathServicePort> =
                Arc::new(CareerPathService::new(
                    Arc::new(PostgresCareerPathRepository::new(pg_pool)),
                    store_timeout,
                ));
            (user_service, career_path_service)
        }
        None => {
            tracing::warn!("No database configured; identities live in process memory only");

            let store = Arc::new(InMemoryStore::new());
            let user_service =
                UserService::new(Arc::clone(&store), Arc::clone(&authenticator), store_timeout);
            bootstrap_admin(&config, &user_service).await?;

            let user_service: Arc<dyn UserServicePort> = Arc::new(user_service);
            let career_path_service: Arc<dyn CareerPathServicePort> =
                Arc::new(CareerPathService::new(store, store_timeout));
            (user_service, career_path_service)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, career_path_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}

async fn bootstrap_admin<UR>(
    config: &Config,
    user_service: &UserService<UR>,
) -> Result<(), anyhow::Error>
where
    UR: UserRepository,
{
    let Some(admin) = &config.admin else {
        return Ok(());
    };

    let command = RegisterCommand::new(
        DisplayName::new(admin.name.clone())?,
        EmailAddress::new(admin.email.clone())?,
        Password::new(admin.password.clone())?,
    );

    if !user_service.bootstrap_admin(command).await? {
        tracing::info!(email = %admin.email, "Bootstrap administrator already present");
    }

    Ok(())
}
