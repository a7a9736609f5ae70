//! Post listing descriptions and the public-visibility rule.
//!
//! Every browse view is built from a [`PostQuery`]: a declarative description
//! of which posts to fetch and how to decorate them. Repositories interpret
//! the description; nothing here touches storage.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Post;

/// Which base collection of posts a listing draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    /// All posts.
    All,
    /// Posts authored by one user.
    Author(Uuid),
    /// Posts in one category.
    Category(Uuid),
}

/// Declarative description of a post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub scope: PostScope,
    /// Keep only publicly visible posts (published flag, published or absent
    /// category, publication date not in the future).
    pub filter_published: bool,
    /// Attach the count of published comments per post and order the listing
    /// by publication date, newest first.
    pub annotate_comments: bool,
}

impl PostQuery {
    /// The public home listing.
    pub fn public() -> Self {
        Self {
            scope: PostScope::All,
            filter_published: true,
            annotate_comments: true,
        }
    }

    /// Listing of one published category's posts.
    pub fn category(category_id: Uuid) -> Self {
        Self {
            scope: PostScope::Category(category_id),
            filter_published: true,
            annotate_comments: true,
        }
    }

    /// Listing of one author's posts. `include_hidden` is true only when the
    /// acting identity is the profile owner; self-view sees drafts and
    /// scheduled posts.
    pub fn profile(author_id: Uuid, include_hidden: bool) -> Self {
        Self {
            scope: PostScope::Author(author_id),
            filter_published: !include_hidden,
            annotate_comments: true,
        }
    }
}

/// Whether a post may be shown to the general public.
///
/// `category_published` is the `is_published` flag of the post's category, or
/// `None` when the post has no category. A missing category does not hide the
/// post.
pub fn is_publicly_visible(
    post: &Post,
    category_published: Option<bool>,
    now: DateTime<Utc>,
) -> bool {
    post.is_published && category_published.unwrap_or(true) && post.pub_date <= now
}

/// Lightweight reference to a post's category, as carried by read models.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
}

/// One row of a post listing: the post plus its resolved relations and the
/// published-comment count.
#[derive(Debug, Clone, Serialize)]
pub struct PostListItem {
    pub post: Post,
    pub author_username: String,
    pub category: Option<CategoryRef>,
    pub location_name: Option<String>,
    pub comment_count: i64,
}

/// A post resolved for the detail view, relations included.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub author_username: String,
    pub category: Option<CategoryRef>,
    pub location_name: Option<String>,
}

impl PostDetail {
    /// Evaluate the public-visibility rule against this detail's category.
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        is_publicly_visible(
            &self.post,
            self.category.as_ref().map(|c| c.is_published),
            now,
        )
    }
}

/// A comment with its author's username resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    pub comment: crate::domain::Comment,
    pub author_username: String,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub items: Vec<PostListItem>,
    /// 1-based page number.
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn post_at(pub_date: DateTime<Utc>, is_published: bool) -> Post {
        let mut post = Post::new(
            Uuid::new_v4(),
            "Title".to_string(),
            "Text".to_string(),
            pub_date,
        );
        post.is_published = is_published;
        post
    }

    #[test]
    fn visible_when_published_and_date_passed() {
        let now = Utc::now();
        let post = post_at(now - TimeDelta::hours(1), true);

        assert!(is_publicly_visible(&post, Some(true), now));
    }

    #[test]
    fn hidden_when_unpublished() {
        let now = Utc::now();
        let post = post_at(now - TimeDelta::hours(1), false);

        assert!(!is_publicly_visible(&post, Some(true), now));
    }

    #[test]
    fn hidden_when_scheduled_in_future() {
        let now = Utc::now();
        let post = post_at(now + TimeDelta::days(1), true);

        assert!(!is_publicly_visible(&post, Some(true), now));
    }

    #[test]
    fn hidden_when_category_unpublished() {
        let now = Utc::now();
        let post = post_at(now - TimeDelta::hours(1), true);

        assert!(!is_publicly_visible(&post, Some(false), now));
    }

    #[test]
    fn missing_category_does_not_hide() {
        let now = Utc::now();
        let post = post_at(now - TimeDelta::hours(1), true);

        assert!(is_publicly_visible(&post, None, now));
    }

    #[test]
    fn visible_exactly_at_pub_date() {
        let now = Utc::now();
        let post = post_at(now, true);

        assert!(is_publicly_visible(&post, None, now));
    }

    #[test]
    fn public_query_filters_and_annotates() {
        let query = PostQuery::public();

        assert_eq!(query.scope, PostScope::All);
        assert!(query.filter_published);
        assert!(query.annotate_comments);
    }

    #[test]
    fn profile_query_keeps_hidden_posts_only_for_owner() {
        let author = Uuid::new_v4();

        let own_view = PostQuery::profile(author, true);
        assert!(!own_view.filter_published);
        assert_eq!(own_view.scope, PostScope::Author(author));

        let visitor_view = PostQuery::profile(author, false);
        assert!(visitor_view.filter_published);
    }
}
