use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use bestgo::config::Settings;
use bestgo::core::Matcher;
use bestgo::models::MatchWeights;
use bestgo::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use bestgo::services::{CacheManager, JwtValidator, MatchService, PostgresClient};
use jsonwebtoken::Algorithm;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| io_error(format!("Configuration error: {}", e)))?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }

    info!("Starting Bestgo marketplace service...");

    let algorithm = match Algorithm::from_str(&settings.auth.algorithm) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
        _ => {
            error!("Unsupported JWT algorithm: {}", settings.auth.algorithm);
            return Err(io_error(format!("Unsupported JWT algorithm {}", settings.auth.algorithm)));
        }
    };
    let validator = JwtValidator::new(&settings.auth.secret_key, algorithm);

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl).await {
        Ok(c) => {
            info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            Arc::new(c)
        }
        Err(e) => {
            error!("Failed to connect to Redis: {}", e);
            return Err(io_error("Redis connection required".to_string()));
        }
    };

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            io_error(format!("PostgreSQL connection error: {}", e))
        })?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let weights = MatchWeights::from(&settings.matching.weights);
    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    let match_service = MatchService::new(postgres.clone(), matcher);

    let app_state = AppState {
        postgres,
        cache,
        request_ttl_hours: settings.matching.request_ttl_hours,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(match_service.clone()))
            .app_data(web::Data::new(validator.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
