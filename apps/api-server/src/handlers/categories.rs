//! Category listing handler.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::query::PostQuery;
use blog_shared::ApiResponse;
use blog_shared::dto::{CategoryDetailResponse, CategoryPostsResponse};

use crate::handlers::{PageParams, page_response};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/categories/{category_slug}/posts
///
/// An unpublished category is indistinguishable from a missing one,
/// whatever the state of the posts inside it.
pub async fn posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::NotFound(format!("category {slug} not found")))?;

    let query = PostQuery::category(category.id);
    let page = state
        .posts
        .list(
            &query,
            Utc::now(),
            params.page.unwrap_or(1),
            state.paginate_by,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(CategoryPostsResponse {
        category: CategoryDetailResponse {
            id: category.id,
            title: category.title,
            description: category.description,
            slug: category.slug,
        },
        posts: page_response(page),
    })))
}
