//! Profile handlers: the per-user listing and self-service profile editing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::query::PostQuery;
use blog_shared::ApiResponse;
use blog_shared::dto::{ProfileResponse, UpdateProfileRequest};

use crate::handlers::{PageParams, page_response, profile_location, see_other, user_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/profiles/{username}
///
/// Owners browsing their own profile see drafts and scheduled posts;
/// everyone else gets the publicly filtered listing.
pub async fn show(
    state: web::Data<AppState>,
    path: web::Path<String>,
    viewer: OptionalIdentity,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username} not found")))?;

    let include_hidden = viewer.0.map(|i| i.user_id) == Some(user.id);
    let query = PostQuery::profile(user.id, include_hidden);
    let page = state
        .posts
        .list(
            &query,
            Utc::now(),
            params.page.unwrap_or(1),
            state.paginate_by,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProfileResponse {
        profile: user_response(&user),
        posts: page_response(page),
    })))
}

/// PUT /api/profiles/me
///
/// The edited record is always the acting identity's own; the target is
/// never taken from the path.
pub async fn edit_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if let Some(username) = req.username {
        if username.trim().is_empty() {
            return Err(AppError::Validation(vec![
                "username must not be empty".to_string(),
            ]));
        }
        if username != user.username
            && state.users.find_by_username(&username).await?.is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }
        user.username = username;
    }
    if let Some(email) = req.email {
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(vec![
                "invalid email address".to_string(),
            ]));
        }
        if email != user.email && state.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        user.email = email;
    }
    if let Some(first_name) = req.first_name {
        user.first_name = Some(first_name);
    }
    if let Some(last_name) = req.last_name {
        user.last_name = Some(last_name);
    }
    user.updated_at = Utc::now();

    let saved = state.users.save(user).await?;
    tracing::info!(user_id = %saved.id, "Profile updated");

    Ok(see_other(profile_location(&saved.username)))
}
