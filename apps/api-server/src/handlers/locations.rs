//! Location listing handler.

use actix_web::{HttpResponse, web};

use blog_shared::ApiResponse;
use blog_shared::dto::LocationResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/locations
///
/// The published locations a post can be tagged with, alphabetical.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let locations = state.locations.list_published().await?;

    let items: Vec<LocationResponse> = locations
        .into_iter()
        .map(|location| LocationResponse {
            id: location.id,
            name: location.name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(items)))
}
