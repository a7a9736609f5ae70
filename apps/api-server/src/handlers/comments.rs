//! Comment handlers: add, edit, delete.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::access;
use blog_core::domain::Comment;
use blog_shared::dto::CommentRequest;

use crate::handlers::{post_detail_location, see_other};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments - authenticated.
pub async fn add(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    if req.text.trim().is_empty() {
        return Err(AppError::Validation(vec![
            "text must not be empty".to_string(),
        ]));
    }

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id} not found")))?;

    let comment = Comment::new(post.id, identity.user_id, req.text);
    let saved = state.comments.save(comment).await?;
    tracing::info!(comment_id = %saved.id, post_id = %post_id, "Comment added");

    Ok(see_other(post_detail_location(post_id)))
}

/// PUT /api/posts/{post_id}/comments/{comment_id} - comment author only.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let req = body.into_inner();

    if req.text.trim().is_empty() {
        return Err(AppError::Validation(vec![
            "text must not be empty".to_string(),
        ]));
    }

    let mut comment = resolve_comment(&state, post_id, comment_id).await?;
    access::require_author(comment.author_id, identity.user_id)?;

    comment.text = req.text;
    state.comments.save(comment).await?;
    tracing::info!(comment_id = %comment_id, "Comment updated");

    Ok(see_other(post_detail_location(post_id)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id} - comment author only.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = resolve_comment(&state, post_id, comment_id).await?;
    access::require_author(comment.author_id, identity.user_id)?;

    state.comments.delete(comment_id).await?;
    tracing::info!(comment_id = %comment_id, "Comment deleted");

    Ok(see_other(post_detail_location(post_id)))
}

/// A comment addressed under the wrong post is treated as missing.
async fn resolve_comment(
    state: &AppState,
    post_id: Uuid,
    comment_id: Uuid,
) -> Result<Comment, AppError> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| AppError::NotFound(format!("comment {comment_id} not found")))?;

    Ok(comment)
}
