//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod locations;
mod posts;
mod profiles;

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;

use blog_core::domain::User;
use blog_core::query::{CategoryRef, CommentWithAuthor, PostListItem, PostPage};
use blog_shared::dto::{
    CategoryResponse, CommentResponse, PostListResponse, PostResponse, UserResponse,
};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts
            .route("/posts", web::get().to(posts::list))
            .route("/posts", web::post().to(posts::create))
            .route("/posts/{post_id}", web::get().to(posts::detail))
            .route("/posts/{post_id}", web::put().to(posts::edit))
            .route("/posts/{post_id}", web::delete().to(posts::delete))
            // Comments
            .route("/posts/{post_id}/comments", web::post().to(comments::add))
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::put().to(comments::edit),
            )
            .route(
                "/posts/{post_id}/comments/{comment_id}",
                web::delete().to(comments::delete),
            )
            // Categories
            .route(
                "/categories/{category_slug}/posts",
                web::get().to(categories::posts),
            )
            // Locations
            .route("/locations", web::get().to(locations::list))
            // Profiles
            .route("/profiles/me", web::put().to(profiles::edit_me))
            .route("/profiles/{username}", web::get().to(profiles::show)),
    );
}

/// Common pagination query parameters. Pages are 1-based.
#[derive(Debug, Deserialize)]
pub(crate) struct PageParams {
    pub page: Option<u64>,
}

/// Post-action redirect, mirroring the browse flow: the response names the
/// next location to show the user.
pub(crate) fn see_other(location: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

pub(crate) fn post_detail_location(post_id: uuid::Uuid) -> String {
    format!("/api/posts/{post_id}")
}

pub(crate) fn profile_location(username: &str) -> String {
    format!("/api/profiles/{username}")
}

fn category_response(category: &CategoryRef) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title.clone(),
        slug: category.slug.clone(),
    }
}

pub(crate) fn post_response(item: PostListItem) -> PostResponse {
    PostResponse {
        id: item.post.id,
        title: item.post.title,
        text: item.post.text,
        pub_date: item.post.pub_date,
        status: item.post.status.to_string(),
        is_published: item.post.is_published,
        author: item.author_username,
        category: item.category.as_ref().map(category_response),
        location: item.location_name,
        image: item.post.image,
        comment_count: item.comment_count,
        created_at: item.post.created_at,
        updated_at: item.post.updated_at,
    }
}

pub(crate) fn page_response(page: PostPage) -> PostListResponse {
    PostListResponse {
        items: page.items.into_iter().map(post_response).collect(),
        page: page.page,
        page_size: page.page_size,
        total_items: page.total_items,
        total_pages: page.total_pages,
    }
}

pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        created_at: user.created_at,
    }
}

pub(crate) fn comment_response(comment: CommentWithAuthor) -> CommentResponse {
    CommentResponse {
        id: comment.comment.id,
        post_id: comment.comment.post_id,
        author: comment.author_username,
        text: comment.comment.text,
        created_at: comment.comment.created_at,
    }
}
