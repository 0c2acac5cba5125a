use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use courtbook::config::AppConfig;
use courtbook::db;
use courtbook::handlers;
use courtbook::services::coupons::local::LocalCouponValidator;
use courtbook::services::coupons::remote::RemoteCouponValidator;
use courtbook::services::coupons::CouponValidator;
use courtbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    let db = Arc::new(Mutex::new(conn));

    let coupons: Box<dyn CouponValidator> = match config.coupon_provider.as_str() {
        "remote" => {
            anyhow::ensure!(
                !config.promotions_url.is_empty(),
                "PROMOTIONS_URL must be set when COUPON_PROVIDER=remote"
            );
            tracing::info!("using remote coupon validator (url: {})", config.promotions_url);
            Box::new(RemoteCouponValidator::new(
                config.promotions_url.clone(),
                config.promotions_api_key.clone(),
                config.coupon_timeout_secs,
            ))
        }
        _ => {
            tracing::info!("using local coupon validator");
            Box::new(LocalCouponValidator::new(Arc::clone(&db)))
        }
    };

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        coupons,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/coupons", get(handlers::coupons::list_coupons))
        .route(
            "/api/coupons/validate",
            post(handlers::coupons::validate_coupon),
        )
        .route(
            "/api/bookings",
            get(handlers::bookings::get_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/bookings/:id/review",
            get(handlers::reviews::review_exists).post(handlers::reviews::create_review),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
