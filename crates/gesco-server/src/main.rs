use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{error, info, warn};

use gesco_api::routes;
use gesco_api::state::AppState;
use gesco_infrastructure::database::connection;
use gesco_shared::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize telemetry (guard kept for the process lifetime)
    let _guard = gesco_shared::telemetry::init_telemetry(
        &settings.log_level,
        &settings.log_format,
        settings.log_file.as_deref(),
    );

    info!("Gesco server starting...");

    // Connect to database and apply migrations
    let pool = connection::create_pool(
        &settings.database_url,
        settings.database_pool_size,
        settings.database_max_overflow,
    )
    .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    info!("Database connection established.");

    let cors = build_cors(&settings);
    let host: std::net::IpAddr = settings.host.parse()?;
    let addr = SocketAddr::from((host, settings.port));

    let state = AppState::new(pool, settings)?;
    let app = routes::app(state).layer(cors);

    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn build_cors(settings: &Settings) -> CorsLayer {
    let origins = settings.cors_origins_list();
    if origins == ["*"] {
        // Wildcard : pas de credentials possibles avec tower-http.
        if settings.cors_allow_credentials {
            warn!("CORS_ORIGINS='*' désactive l'envoi des credentials");
        }
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                error!("origine CORS invalide ignorée : {o}");
                None
            }
        })
        .collect();
    let layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    if settings.cors_allow_credentials {
        layer.allow_credentials(true)
    } else {
        layer
    }
}
