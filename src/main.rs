//! Brewtab server binary
//!
//! Café table-ordering backend. Reads configuration from a TOML file
//! (~/.config/brewtab/config.toml, overridable with BREWTAB_CONFIG).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use brewtab::application::{
    CartService, CartSweeper, MenuService, OrderService, PaymentService, TableService,
};
use brewtab::config::AppConfig;
use brewtab::infrastructure::crypto::jwt::JwtConfig;
use brewtab::infrastructure::database::migrator::Migrator;
use brewtab::infrastructure::SimulatedPaymentGateway;
use brewtab::{
    create_api_router, default_config_path, init_database, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("BREWTAB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Brewtab...");

    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "brewtab".to_string(),
    };

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    let repos: Arc<dyn brewtab::domain::RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    // Create default admin user if no accounts exist yet
    create_default_admin(&repos, &app_cfg).await;

    // ── Services ───────────────────────────────────────────────
    let gateway = Arc::new(SimulatedPaymentGateway::new());
    let tables = Arc::new(TableService::new(repos.clone()));
    let menus = Arc::new(MenuService::new(repos.clone()));
    let carts = Arc::new(CartService::new(repos.clone()));
    let orders = Arc::new(OrderService::new(repos.clone()));
    let payments = Arc::new(PaymentService::new(repos.clone(), gateway));

    // Periodic empty-cart sweep
    let mut sweeper_handle = None;
    if app_cfg.sweeper.enabled {
        let sweeper = CartSweeper::new(repos.clone(), app_cfg.sweeper.interval_secs);
        sweeper_handle = Some(sweeper.start());
    }

    // ── HTTP server ────────────────────────────────────────────
    let router = create_api_router(
        repos,
        db.clone(),
        jwt_config,
        tables,
        menus,
        carts,
        orders,
        payments,
    );

    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweeper_handle {
        handle.abort();
    }

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }

    info!("Brewtab shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Create the bootstrap admin account if no users exist
async fn create_default_admin(
    repos: &Arc<dyn brewtab::domain::RepositoryProvider>,
    app_cfg: &AppConfig,
) {
    use brewtab::domain::user::{User, UserRole};
    use brewtab::infrastructure::crypto::password::hash_password;

    let users_count = repos.users().count().await.unwrap_or(0);
    if users_count > 0 {
        return;
    }

    info!("Creating default admin user...");

    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let now = chrono::Utc::now();
    let admin = User {
        id: 0,
        username: app_cfg.admin.username.clone(),
        email: app_cfg.admin.email.clone(),
        password_hash,
        role: UserRole::Admin,
        is_active: true,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    };

    match repos.users().save(admin).await {
        Ok(user) => {
            info!("Default admin created: {}", user.email);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => error!("Failed to create admin user: {}", e),
    }
}
