use actix_cors::Cors;
use actix_web::{error, web, App, HttpResponse, HttpServer, Result as ActixResult};
use morphmatch_core::{Error, Gender, SemanticProfile};
use serde::Deserialize;
use std::sync::Arc;

use crate::service::MatchService;

#[derive(Deserialize)]
struct MatchRequest {
    profile: SemanticProfile,
    limit: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(service: Arc<MatchService>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(Self::configure(service.clone()))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Routes and shared state, reusable from tests
    pub fn configure(service: Arc<MatchService>) -> impl FnOnce(&mut web::ServiceConfig) {
        move |cfg| {
            let json_config = web::JsonConfig::default().error_handler(|err, _req| {
                let message = err.to_string();
                error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
                )
                .into()
            });

            cfg.app_data(web::Data::new(service))
                .app_data(json_config)
                .route("/health", web::get().to(health))
                .route("/match", web::post().to(match_archetypes))
                .route("/catalog/{gender}", web::get().to(catalog_summary));
        }
    }
}

fn error_response(err: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        Error::CatalogUnavailable(_) => HttpResponse::ServiceUnavailable().json(body),
        Error::InvalidConfig(_) => HttpResponse::BadRequest().json(body),
        Error::InvalidArchetypeData { .. } => HttpResponse::InternalServerError().json(body),
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "title": "morphmatch",
        "version": env!("CARGO_PKG_VERSION"),
        "time": chrono::Utc::now().to_rfc3339(),
    })))
}

async fn match_archetypes(
    service: web::Data<Arc<MatchService>>,
    req: web::Json<MatchRequest>,
) -> ActixResult<HttpResponse> {
    let MatchRequest { profile, limit } = req.into_inner();

    match service.match_profile(&profile, limit).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => {
            tracing::error!(error = %e, "match request failed");
            Ok(error_response(&e))
        }
    }
}

async fn catalog_summary(
    service: web::Data<Arc<MatchService>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let gender: Gender = match path.into_inner().parse() {
        Ok(g) => g,
        Err(e) => return Ok(error_response(&e)),
    };

    match service.catalog_summary(gender).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(e) => Ok(error_response(&e)),
    }
}
