//! Service entrypoint: configuration, database pool, dependency wiring and
//! the axum server with graceful shutdown.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use devcamper::adapters::email::{LoggingMailer, SmtpConfig};
use devcamper::adapters::geo::NominatimGeocoder;
use devcamper::adapters::http::{api_router, AppState, CookieSettings};
use devcamper::adapters::postgres::{
    PgBootcampRepository, PgCourseRepository, PgReviewRepository, PgUserRepository,
};
use devcamper::adapters::security::{BcryptHasher, JwtTokenService};
use devcamper::adapters::storage::LocalPhotoStorage;
use devcamper::application::{
    AggregateRecomputer, AuthSession, BootcampService, CourseService, ReviewService,
    UserAdminService,
};
use devcamper::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let bootcamps = Arc::new(PgBootcampRepository::new(pool.clone()));
    let courses = Arc::new(PgCourseRepository::new(pool.clone()));
    let reviews = Arc::new(PgReviewRepository::new(pool));

    let hasher = Arc::new(BcryptHasher::new());
    let tokens = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expire_days,
    ));
    let mailer = Arc::new(LoggingMailer::new(SmtpConfig {
        from_name: config.email.from_name.clone(),
        from_email: config.email.from_email.clone(),
    }));
    let geocoder = Arc::new(NominatimGeocoder::new(
        reqwest::Client::new(),
        config.geocoder.base_url.clone(),
        config.geocoder.country_code.clone(),
    ));
    let photos = Arc::new(LocalPhotoStorage::new(config.uploads.dir.clone()));

    let recomputer = Arc::new(AggregateRecomputer::new(
        bootcamps.clone(),
        courses.clone(),
        reviews.clone(),
    ));

    let scheme = if config.server.is_production() {
        "https"
    } else {
        "http"
    };
    let state = AppState {
        auth: Arc::new(AuthSession::new(
            users.clone(),
            hasher.clone(),
            tokens,
            mailer,
        )),
        bootcamps: Arc::new(BootcampService::new(
            bootcamps.clone(),
            courses.clone(),
            reviews.clone(),
            geocoder,
            photos,
            config.uploads.max_file_size,
        )),
        courses: Arc::new(CourseService::new(
            courses,
            bootcamps.clone(),
            recomputer.clone(),
        )),
        reviews: Arc::new(ReviewService::new(reviews, bootcamps, recomputer)),
        users: Arc::new(UserAdminService::new(users, hasher)),
        cookie: CookieSettings {
            expire_days: config.auth.cookie_expire_days,
            secure: config.server.is_production(),
        },
        reset_url_base: format!(
            "{}://{}:{}/api/v1/auth/resetpassword",
            scheme, config.server.host, config.server.port
        ),
    };

    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, environment = ?config.server.environment, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("ctrl-c handler installation failed");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("sigterm handler installation failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
