//! Post handlers: listing, detail, create, edit, delete.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blog_core::access;
use blog_core::domain::{Post, PostStatus};
use blog_core::query::PostQuery;
use blog_shared::ApiResponse;
use blog_shared::dto::{CreatePostRequest, PostDetailResponse, UpdatePostRequest};

use crate::handlers::{
    PageParams, comment_response, page_response, post_detail_location, post_response,
    profile_location, see_other,
};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts - the public home listing.
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let query = PostQuery::public();
    let page = state
        .posts
        .list(
            &query,
            Utc::now(),
            params.page.unwrap_or(1),
            state.paginate_by,
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page_response(page))))
}

/// GET /api/posts/{post_id}
///
/// Authors see their own posts in any state; everyone else only sees
/// publicly visible posts, with NotFound covering the rest.
pub async fn detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_detail(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;

    access::check_detail_access(&post, viewer.0.map(|i| i.user_id), Utc::now())?;

    let comments = state.comments.list_published_for_post(post_id).await?;
    let comment_count = comments.len() as i64;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PostDetailResponse {
        post: post_response(blog_core::query::PostListItem {
            post: post.post,
            author_username: post.author_username,
            category: post.category,
            location_name: post.location_name,
            comment_count,
        }),
        comments: comments.into_iter().map(comment_response).collect(),
    })))
}

/// POST /api/posts - authenticated; the author is always the acting identity.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    if req.title.trim().is_empty() {
        errors.push("title must not be empty".to_string());
    }
    if req.text.trim().is_empty() {
        errors.push("text must not be empty".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let status = req
        .status
        .as_deref()
        .map(|s| s.parse::<PostStatus>())
        .transpose()
        .map_err(AppError::from)?;

    let mut post = Post::new(identity.user_id, req.title, req.text, req.pub_date);
    if let Some(status) = status {
        post.status = status;
    }
    if let Some(is_published) = req.is_published {
        post.is_published = is_published;
    }
    post.location_id = req.location_id;
    post.category_id = req.category_id;
    post.image = req.image;

    let saved = state.posts.save(post).await?;
    tracing::info!(post_id = %saved.id, author = %identity.username, "Post created");

    Ok(see_other(profile_location(&identity.username)))
}

/// PUT /api/posts/{post_id}
///
/// Non-authors are quietly bounced to the detail view instead of getting an
/// error page; the post is left untouched.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;

    if access::require_author(post.author_id, identity.user_id).is_err() {
        return Ok(see_other(post_detail_location(post_id)));
    }

    let status = req
        .status
        .as_deref()
        .map(|s| s.parse::<PostStatus>())
        .transpose()
        .map_err(AppError::from)?;

    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation(vec![
                "title must not be empty".to_string(),
            ]));
        }
        post.title = title;
    }
    if let Some(text) = req.text {
        if text.trim().is_empty() {
            return Err(AppError::Validation(vec![
                "text must not be empty".to_string(),
            ]));
        }
        post.text = text;
    }
    if let Some(pub_date) = req.pub_date {
        post.pub_date = pub_date;
    }
    if let Some(status) = status {
        post.status = status;
    }
    if let Some(is_published) = req.is_published {
        post.is_published = is_published;
    }
    if let Some(location_id) = req.location_id {
        post.location_id = location_id;
    }
    if let Some(category_id) = req.category_id {
        post.category_id = category_id;
    }
    if let Some(image) = req.image {
        post.image = image;
    }
    post.updated_at = Utc::now();

    state.posts.save(post).await?;
    tracing::info!(post_id = %post_id, "Post updated");

    Ok(see_other(post_detail_location(post_id)))
}

/// DELETE /api/posts/{post_id} - author only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;

    access::require_author(post.author_id, identity.user_id)?;

    state.posts.delete(post_id).await?;
    tracing::info!(post_id = %post_id, "Post deleted");

    Ok(see_other(profile_location(&identity.username)))
}
