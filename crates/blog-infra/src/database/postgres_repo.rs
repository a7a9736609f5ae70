//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, IntoCondition, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blog_core::domain::{Category, Location, Post, User};
use blog_core::error::RepoError;
use blog_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blog_core::query::{
    CategoryRef, CommentWithAuthor, PostDetail, PostListItem, PostPage, PostQuery, PostScope,
};

use super::entity::{category, comment, location, post, user};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<user::Entity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<post::Entity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<comment::Entity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<category::Entity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<location::Entity>;

/// Flat row shape for post listings and details: the post's own columns plus
/// the joined author/category/location columns and the comment count.
#[derive(Debug, FromQueryResult)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    text: String,
    pub_date: DateTimeWithTimeZone,
    status: post::PostStatus,
    is_published: bool,
    location_id: Option<Uuid>,
    category_id: Option<Uuid>,
    image: Option<String>,
    created_at: DateTimeWithTimeZone,
    updated_at: DateTimeWithTimeZone,
    author_username: String,
    category_title: Option<String>,
    category_slug: Option<String>,
    category_is_published: Option<bool>,
    location_name: Option<String>,
    comment_count: Option<i64>,
}

impl PostRow {
    fn category_ref(&self) -> Option<CategoryRef> {
        match (
            self.category_id,
            self.category_title.clone(),
            self.category_slug.clone(),
            self.category_is_published,
        ) {
            (Some(id), Some(title), Some(slug), Some(is_published)) => Some(CategoryRef {
                id,
                title,
                slug,
                is_published,
            }),
            _ => None,
        }
    }

    fn into_post(self) -> (Post, String, Option<CategoryRef>, Option<String>, i64) {
        let category = self.category_ref();
        let post = Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            text: self.text,
            pub_date: self.pub_date.into(),
            status: self.status.into(),
            is_published: self.is_published,
            location_id: self.location_id,
            category_id: self.category_id,
            image: self.image,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        };
        (
            post,
            self.author_username,
            category,
            self.location_name,
            self.comment_count.unwrap_or(0),
        )
    }

    fn into_list_item(self) -> PostListItem {
        let (post, author_username, category, location_name, comment_count) = self.into_post();
        PostListItem {
            post,
            author_username,
            category,
            location_name,
            comment_count,
        }
    }

    fn into_detail(self) -> PostDetail {
        let (post, author_username, category, location_name, _) = self.into_post();
        PostDetail {
            post,
            author_username,
            category,
            location_name,
        }
    }
}

/// Base select for posts with author, category and location resolved.
fn post_select() -> Select<post::Entity> {
    post::Entity::find()
        .select_only()
        .columns([
            post::Column::Id,
            post::Column::AuthorId,
            post::Column::Title,
            post::Column::Text,
            post::Column::PubDate,
            post::Column::Status,
            post::Column::IsPublished,
            post::Column::LocationId,
            post::Column::CategoryId,
            post::Column::Image,
            post::Column::CreatedAt,
            post::Column::UpdatedAt,
        ])
        .column_as(user::Column::Username, "author_username")
        .column_as(category::Column::Title, "category_title")
        .column_as(category::Column::Slug, "category_slug")
        .column_as(category::Column::IsPublished, "category_is_published")
        .column_as(location::Column::Name, "location_name")
        .join(JoinType::InnerJoin, post::Relation::Author.def())
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .join(JoinType::LeftJoin, post::Relation::Location.def())
}

/// SQL form of the public-visibility rule. A post with no category is not
/// excluded by the category clause.
fn public_visibility(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let row = post_select()
            .column_as(SimpleExpr::Value(0i64.into()), "comment_count")
            .filter(post::Column::Id.eq(id))
            .into_model::<PostRow>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(row.map(PostRow::into_detail))
    }

    async fn list(
        &self,
        query: &PostQuery,
        now: DateTime<Utc>,
        page: u64,
        page_size: u64,
    ) -> Result<PostPage, RepoError> {
        let mut select = post_select();

        select = match query.scope {
            PostScope::All => select,
            PostScope::Author(author_id) => select.filter(post::Column::AuthorId.eq(author_id)),
            PostScope::Category(category_id) => {
                select.filter(post::Column::CategoryId.eq(category_id))
            }
        };

        if query.filter_published {
            select = select.filter(public_visibility(now));
        }

        if query.annotate_comments {
            // Count only published comments: the join condition filters them
            // before aggregation so posts without comments still count as 0.
            select = select
                .join(
                    JoinType::LeftJoin,
                    post::Relation::Comments.def().on_condition(|_left, right| {
                        Expr::col((right, comment::Column::IsPublished))
                            .eq(true)
                            .into_condition()
                    }),
                )
                .column_as(comment::Column::Id.count(), "comment_count")
                .group_by(post::Column::Id)
                .group_by(user::Column::Id)
                .group_by(category::Column::Id)
                .group_by(location::Column::Id);
        } else {
            select = select.column_as(SimpleExpr::Value(0i64.into()), "comment_count");
        }

        select = select.order_by(post::Column::PubDate, Order::Desc);

        let page = page.max(1);
        let page_size = page_size.max(1);

        let paginator = select
            .into_model::<PostRow>()
            .paginate(self.db.as_ref(), page_size);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;
        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(PostPage {
            items: rows.into_iter().map(PostRow::into_list_item).collect(),
            page,
            page_size,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    text: String,
    is_published: bool,
    created_at: DateTimeWithTimeZone,
    author_username: String,
}

impl CommentRow {
    fn into_comment_with_author(self) -> CommentWithAuthor {
        CommentWithAuthor {
            comment: blog_core::domain::Comment {
                id: self.id,
                post_id: self.post_id,
                author_id: self.author_id,
                text: self.text,
                is_published: self.is_published,
                created_at: self.created_at.into(),
            },
            author_username: self.author_username,
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_published_for_post(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let rows = comment::Entity::find()
            .select_only()
            .columns([
                comment::Column::Id,
                comment::Column::PostId,
                comment::Column::AuthorId,
                comment::Column::Text,
                comment::Column::IsPublished,
                comment::Column::CreatedAt,
            ])
            .column_as(user::Column::Username, "author_username")
            .join(JoinType::InnerJoin, comment::Relation::Author.def())
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::IsPublished.eq(true))
            .order_by(comment::Column::CreatedAt, Order::Asc)
            .into_model::<CommentRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(CommentRow::into_comment_with_author)
            .collect())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let rows = location::Entity::find()
            .filter(location::Column::IsPublished.eq(true))
            .order_by(location::Column::Name, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
