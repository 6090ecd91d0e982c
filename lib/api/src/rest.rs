use std::fs;
use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::NamedFile;
use actix_multipart::form::tempfile::TempFile;
use actix_multipart::form::MultipartForm;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use vestx_core::Error as CoreError;
use vestx_extract::{extract_attributes, ImagePayload, ModelClient, ModelError, RetryPolicy};
use vestx_outfit::{rule_based, score_pair, Selector};
use vestx_storage::{SavedItem, WardrobeStore, IMAGE_EXTENSIONS};

/// Upload cap enforced by hand so the reply carries the exact size. The
/// multipart field allows a bit more to keep that check reachable.
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Shared application state, cloned into every worker.
#[derive(Clone)]
pub struct AppState {
    pub store: WardrobeStore,
    pub model: Arc<dyn ModelClient>,
    pub selector: Arc<Selector>,
    pub retry_policy: RetryPolicy,
}

#[derive(Debug, MultipartForm)]
struct ExtractForm {
    #[multipart(limit = "25MB")]
    image: Option<TempFile>,
}

#[derive(Debug, Deserialize)]
struct ItemsQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScoreQuery {
    top_id: Option<String>,
    bottom_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendQuery {
    count: Option<usize>,
    season: Option<String>,
    formality: Option<f64>,
    use_model: Option<bool>,
}

/// Failures of the blocking extraction pipeline.
#[derive(Debug, Error)]
enum PipelineError {
    #[error("{0}")]
    Model(#[from] ModelError),
    #[error("{0}")]
    Store(#[from] CoreError),
}

impl PipelineError {
    fn to_response(&self) -> HttpResponse {
        let body = json!({ "error": self.to_string() });
        match self {
            PipelineError::Model(ModelError::RateLimited { .. }) => {
                HttpResponse::TooManyRequests().json(body)
            }
            PipelineError::Model(_) => HttpResponse::BadGateway().json(body),
            PipelineError::Store(CoreError::ItemNotFound(_)) => {
                HttpResponse::NotFound().json(body)
            }
            PipelineError::Store(CoreError::InvalidItemId(_))
            | PipelineError::Store(CoreError::InvalidRequest(_)) => {
                HttpResponse::BadRequest().json(body)
            }
            PipelineError::Store(_) => HttpResponse::InternalServerError().json(body),
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .route("/api/health", web::get().to(health))
                .route("/api/images/{filename}", web::get().to(serve_image))
                .route("/api/extract", web::post().to(extract))
                .route("/api/wardrobe/items", web::get().to(wardrobe_items))
                .route("/api/outfit/score", web::get().to(outfit_score))
                .route("/api/recommend/outfit", web::get().to(recommend_outfit))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}

async fn serve_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let filename = path.into_inner();
    let file_path = match state.store.image_path(&filename) {
        Ok(path) => path,
        Err(err) => {
            return Ok(HttpResponse::NotFound().json(json!({ "error": err.to_string() })));
        }
    };
    match NamedFile::open_async(&file_path).await {
        Ok(file) => Ok(file.into_response(&req)),
        Err(err) => Ok(HttpResponse::NotFound().json(json!({ "error": err.to_string() }))),
    }
}

async fn extract(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ExtractForm>,
) -> ActixResult<HttpResponse> {
    let Some(upload) = form.image else {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": "No image file provided" })));
    };
    let file_name = match upload.file_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Ok(HttpResponse::BadRequest().json(json!({ "error": "No file selected" }))),
    };

    if upload.size > MAX_FILE_SIZE {
        let megabytes = upload.size as f64 / (1024.0 * 1024.0);
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": format!(
                "File size exceeds maximum allowed size (10MB). Your file is {megabytes:.1}MB"
            )
        })));
    }

    let extension = Path::new(&file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": format!("Invalid file type. Allowed: {}", IMAGE_EXTENSIONS.join(", "))
        })));
    }

    let mime = upload
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string());
    if let Some(mime) = &mime {
        if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": format!("Invalid MIME type. Allowed: {}", ALLOWED_MIME_TYPES.join(", "))
            })));
        }
    }
    let payload_mime = mime.unwrap_or_else(|| mime_for_extension(&extension).to_string());

    let store = state.store.clone();
    let model = state.model.clone();
    let policy = state.retry_policy.clone();
    let temp_path = upload.file.path().to_path_buf();

    let result = web::block(move || -> Result<SavedItem, PipelineError> {
        let bytes = fs::read(&temp_path).map_err(CoreError::from)?;
        let payload = ImagePayload::new(payload_mime, bytes.clone());
        let record = extract_attributes(model.as_ref(), &payload, &policy)?;
        Ok(store.save(&record, &bytes, Some(file_name.as_str()))?)
    })
    .await;

    let saved = match result {
        Ok(Ok(saved)) => saved,
        Ok(Err(err)) => {
            warn!(error = %err, "extraction pipeline failed");
            return Ok(err.to_response());
        }
        Err(err) => {
            error!(error = %err, "extraction worker failed");
            return Ok(
                HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }))
            );
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "attributes": saved.item.attributes,
        "saved_to": saved.json_path.display().to_string(),
        "image_url": saved.item.image_url,
        "item_id": saved.item.id,
    })))
}

async fn wardrobe_items(
    state: web::Data<AppState>,
    query: web::Query<ItemsQuery>,
) -> ActixResult<HttpResponse> {
    let mut items = match state.store.items() {
        Ok(items) => items,
        Err(err) => {
            return Ok(
                HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }))
            );
        }
    };
    if let Some(category) = &query.category {
        let category = category.to_lowercase();
        items.retain(|item| item.attributes.category.main == category);
    }
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": items.len(),
        "items": items,
    })))
}

async fn outfit_score(
    state: web::Data<AppState>,
    query: web::Query<ScoreQuery>,
) -> ActixResult<HttpResponse> {
    let (top_id, bottom_id) = match (&query.top_id, &query.bottom_id) {
        (Some(top), Some(bottom)) if !top.is_empty() && !bottom.is_empty() => (top, bottom),
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "top_id and bottom_id are required"
            })));
        }
    };

    let items = match state.store.items() {
        Ok(items) => items,
        Err(err) => {
            return Ok(
                HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }))
            );
        }
    };
    let top = items.iter().find(|item| &item.id == top_id);
    let bottom = items.iter().find(|item| &item.id == bottom_id);
    let (Some(top), Some(bottom)) = (top, bottom) else {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "Items not found" })));
    };

    let verdict = score_pair(&top.attributes, &bottom.attributes);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "score": (verdict.score * 1000.0).round() / 1000.0,
        "score_percent": (verdict.score * 100.0).round() as i64,
        "reasons": verdict.reasons,
        "top": top,
        "bottom": bottom,
    })))
}

async fn recommend_outfit(
    state: web::Data<AppState>,
    query: web::Query<RecommendQuery>,
) -> ActixResult<HttpResponse> {
    let count = query.count.unwrap_or(1);
    let use_model = query.use_model.unwrap_or(true);

    let items = match state.store.items() {
        Ok(items) => items,
        Err(err) => {
            return Ok(
                HttpResponse::InternalServerError().json(json!({ "error": err.to_string() }))
            );
        }
    };

    let mut tops = Vec::new();
    let mut bottoms = Vec::new();
    for item in items {
        match item.attributes.category.main.as_str() {
            "top" => tops.push(item),
            "bottom" => bottoms.push(item),
            _ => {}
        }
    }

    if tops.is_empty() || bottoms.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "outfits": [],
            "message": "Not enough items in wardrobe (need at least one top and one bottom)"
        })));
    }

    if let Some(season) = &query.season {
        let season = season.to_lowercase();
        tops.retain(|item| item.attributes.scores.season.iter().any(|s| s == &season));
        bottoms.retain(|item| item.attributes.scores.season.iter().any(|s| s == &season));
    }
    if let Some(target) = query.formality {
        tops.retain(|item| (item.attributes.scores.formality - target).abs() <= 0.3);
        bottoms.retain(|item| (item.attributes.scores.formality - target).abs() <= 0.3);
    }

    if tops.is_empty() || bottoms.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "outfits": [],
            "message": "No items match the filters"
        })));
    }

    if use_model {
        let selector = state.selector.clone();
        let model_tops = tops.clone();
        let model_bottoms = bottoms.clone();
        let result =
            web::block(move || selector.recommend(&model_tops, &model_bottoms, count)).await;
        match result {
            Ok(selection) if !selection.outfits.is_empty() => {
                let produced = selection.outfits.len();
                return Ok(HttpResponse::Ok().json(json!({
                    "success": true,
                    "outfits": selection.outfits,
                    "count": produced,
                    "method": selection.method.as_str(),
                })));
            }
            Ok(_) => {}
            Err(err) => {
                error!(error = %err, "recommendation worker failed");
            }
        }
    }

    let outfits = rule_based(&tops, &bottoms, count);
    let produced = outfits.len();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "outfits": outfits,
        "count": produced,
        "method": "rule-based",
    })))
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        _ => "image/jpeg",
    }
}
