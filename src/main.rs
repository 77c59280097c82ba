use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder};
use komik_crawler::app_state::AppState;
use komik_crawler::config::Config;
use komik_crawler::dom::Document;
use komik_crawler::error::ScrapeError;
use komik_crawler::http_client::FetchRequest;
use komik_crawler::metrics::MetricsTracker;
use komik_crawler::models::ApiResponse;
use komik_crawler::sources::mangapark::{self, ListingMode};
use serde_json::json;
use std::collections::HashMap;
use std::time::Instant;

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

/// Parses a positive integer query parameter, falling back to a default
/// when absent. Mirrors the pagination validation the routing layer owns.
fn positive_param(
    query: &HashMap<String, String>,
    key: &str,
    default: u32,
    message: &str,
) -> Result<u32, String> {
    match query.get(key) {
        None => Ok(default),
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) if value >= 1 => Ok(value),
            _ => Err(message.to_string()),
        },
    }
}

fn pagination_params(query: &HashMap<String, String>) -> Result<(u32, u32), String> {
    let page = positive_param(query, "page", 1, "Page must be a positive integer")?;
    let limit = positive_param(
        query,
        "limit",
        DEFAULT_LIMIT,
        "Limit must be between 1 and 100",
    )?;
    if limit > MAX_LIMIT {
        return Err("Limit must be between 1 and 100".to_string());
    }
    Ok((page, limit))
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error(message))
}

fn error_response(err: &ScrapeError) -> HttpResponse {
    let mut builder = match err {
        ScrapeError::Timeout(_) => HttpResponse::GatewayTimeout(),
        ScrapeError::Network(_) | ScrapeError::Parse(_) => HttpResponse::BadGateway(),
        ScrapeError::Config(_) => HttpResponse::InternalServerError(),
    };
    builder.json(ApiResponse::error(err.to_string()))
}

/// Fetches one page from the source site and parses it, recording the
/// outcome against `operation`.
async fn fetch_document(
    state: &AppState,
    operation: &str,
    req: FetchRequest,
) -> Result<Document, ScrapeError> {
    let started = Instant::now();
    match state.fetcher.fetch(&req).await {
        Ok(outcome) => match Document::parse(&outcome.raw_body) {
            Ok(doc) => {
                state.metrics.record_success(operation, started.elapsed());
                Ok(doc)
            }
            Err(e) => {
                log::error!("{}: fetched {} but body was unusable: {}", operation, req.path, e);
                state.metrics.record_failure(operation, e.to_string(), false);
                Err(e)
            }
        },
        Err(e) => {
            log::warn!("{}: fetch of {} failed: {}", operation, req.path, e);
            state
                .metrics
                .record_failure(operation, e.to_string(), e.is_timeout());
            Err(e)
        }
    }
}

#[get("/")]
async fn index() -> impl Responder {
    let endpoints = json!({
        "latest": "/api/v1/mangas",
        "catalog": "/api/v1/mangas/catalog",
        "search": "/api/v1/mangas/search?word=",
        "detail": "/api/v1/mangas/{slug}",
        "metrics": "/metrics",
    });
    HttpResponse::Ok().json(
        ApiResponse::ok(json!({
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": endpoints,
        }))
        .with_message("Welcome to Komik Crawler API"),
    )
}

/// Latest-updates feed with pagination.
#[get("/api/v1/mangas")]
async fn list_mangas(
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let (page, limit) = match pagination_params(&query) {
        Ok(params) => params,
        Err(message) => return bad_request(message),
    };

    let doc = match fetch_document(&data, "latest", mangapark::latest_request(page)).await {
        Ok(doc) => doc,
        Err(e) => return error_response(&e),
    };

    let catalog = mangapark::assemble_listing(
        &doc,
        ListingMode::Latest,
        page,
        limit,
        data.config.scraping.catalog_total,
    );
    HttpResponse::Ok().json(ApiResponse::paginated(catalog.items, catalog.pagination))
}

/// Catalog browse pages use the source site's fixed page size.
#[get("/api/v1/mangas/catalog")]
async fn browse_catalog(
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let page = match positive_param(&query, "page", 1, "Page must be a positive integer") {
        Ok(page) => page,
        Err(message) => return bad_request(message),
    };

    let doc = match fetch_document(&data, "catalog", mangapark::catalog_request(page)).await {
        Ok(doc) => doc,
        Err(e) => return error_response(&e),
    };

    let catalog = mangapark::assemble_listing(
        &doc,
        ListingMode::Latest,
        page,
        data.config.scraping.catalog_page_size,
        data.config.scraping.catalog_total,
    );
    HttpResponse::Ok().json(ApiResponse::paginated(catalog.items, catalog.pagination))
}

#[get("/api/v1/mangas/search")]
async fn search_mangas(
    data: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let word = match query.get("word").map(|w| w.trim()) {
        Some(word) if !word.is_empty() => word.to_string(),
        _ => return bad_request("Search term is required".to_string()),
    };
    let (page, limit) = match pagination_params(&query) {
        Ok(params) => params,
        Err(message) => return bad_request(message),
    };

    let doc = match fetch_document(&data, "search", mangapark::search_request(&word, page)).await {
        Ok(doc) => doc,
        Err(e) => return error_response(&e),
    };

    let catalog = mangapark::assemble_listing(
        &doc,
        ListingMode::Search,
        page,
        limit,
        data.config.scraping.catalog_total,
    );
    HttpResponse::Ok().json(ApiResponse::paginated(catalog.items, catalog.pagination))
}

#[get("/api/v1/mangas/{slug}")]
async fn get_manga(data: web::Data<AppState>, slug: web::Path<String>) -> impl Responder {
    let doc = match fetch_document(&data, "detail", mangapark::detail_request(&slug)).await {
        Ok(doc) => doc,
        Err(e) => return error_response(&e),
    };

    let detail = mangapark::assemble_detail(&doc);
    HttpResponse::Ok().json(ApiResponse::ok(detail))
}

#[get("/metrics")]
async fn get_metrics(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::ok(data.metrics.snapshot()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();

    let config = Config::load();
    let fetcher = config
        .scraping
        .create_fetch_client()
        .expect("Failed to create fetch client");
    let metrics = MetricsTracker::new();

    log::info!("Fetch client initialized:");
    log::info!("  Base origin: {}", config.scraping.base_url);
    log::info!("  Timeout: {}ms", config.scraping.timeout_ms);
    log::info!("  Identity pool: {} agents", config.scraping.user_agents.len());

    let bind_addr = (config.server.host.clone(), config.server.port);
    let data = web::Data::new(AppState {
        fetcher,
        config,
        metrics,
    });

    log::info!(
        "Komik Crawler API listening on {}:{}",
        bind_addr.0,
        bind_addr.1
    );

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::default())
            .service(index)
            .service(list_mangas)
            .service(browse_catalog)
            .service(search_mangas)
            .service(get_manga)
            .service(get_metrics)
    })
    .bind(bind_addr)?
    .run()
    .await
}
