#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crate::database::entity::{category, location, post, user};
    use crate::database::postgres_repo::{
        PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
        PostgresPostRepository, PostgresUserRepository,
    };
    use blog_core::domain::{Category, Post, PostStatus, User};
    use blog_core::ports::{
        BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
        UserRepository,
    };
    use blog_core::query::PostQuery;
    use sea_orm::prelude::DateTimeWithTimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn post_model(id: uuid::Uuid, author_id: uuid::Uuid) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            author_id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: now.into(),
            status: post::PostStatus::Published,
            is_published: true,
            location_id: None,
            category_id: None,
            image: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    /// One flat listing row the joined post select produces: post columns
    /// plus author/category/location columns and the comment count.
    fn listing_row(
        id: uuid::Uuid,
        author_id: uuid::Uuid,
        username: &str,
        comment_count: i64,
    ) -> BTreeMap<&'static str, Value> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        BTreeMap::from([
            ("id", Value::from(id)),
            ("author_id", Value::from(author_id)),
            ("title", Value::from("Test Post")),
            ("text", Value::from("Content")),
            ("pub_date", Value::from(now)),
            ("status", Value::from("published")),
            ("is_published", Value::from(true)),
            ("location_id", Value::Uuid(None)),
            ("category_id", Value::Uuid(None)),
            ("image", Value::String(None)),
            ("created_at", Value::from(now)),
            ("updated_at", Value::from(now)),
            ("author_username", Value::from(username)),
            ("category_title", Value::String(None)),
            ("category_slug", Value::String(None)),
            ("category_is_published", Value::Bool(None)),
            ("location_name", Value::String(None)),
            ("comment_count", Value::from(comment_count)),
        ])
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, author_id)]])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.status, PostStatus::Published);
        assert!(post.category_id.is_none());
    }

    #[tokio::test]
    async fn test_list_maps_annotated_rows() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();

        // The paginator counts before it fetches, so the first result set is
        // the count row and the second is the page itself.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![
                vec![BTreeMap::from([("num_items", Value::BigInt(Some(1)))])],
                vec![listing_row(post_id, author_id, "alice", 2)],
            ])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let page = repo
            .list(&PostQuery::public(), chrono::Utc::now(), 1, 10)
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 1);

        let item = &page.items[0];
        assert_eq!(item.post.id, post_id);
        assert_eq!(item.post.author_id, author_id);
        assert_eq!(item.post.status, PostStatus::Published);
        assert_eq!(item.author_username, "alice");
        assert_eq!(item.comment_count, 2);
        assert!(item.category.is_none());
        assert!(item.location_name.is_none());
    }

    #[tokio::test]
    async fn test_find_detail_resolves_joined_columns() {
        let post_id = uuid::Uuid::new_v4();
        let author_id = uuid::Uuid::new_v4();
        let category_id = uuid::Uuid::new_v4();

        let mut row = listing_row(post_id, author_id, "alice", 0);
        row.insert("category_id", Value::from(category_id));
        row.insert("category_title", Value::from("News"));
        row.insert("category_slug", Value::from("news"));
        row.insert("category_is_published", Value::from(true));
        row.insert("location_name", Value::from("Reykjavik"));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let detail = repo.find_detail(post_id).await.unwrap().unwrap();

        assert_eq!(detail.post.id, post_id);
        assert_eq!(detail.author_username, "alice");
        let category = detail.category.unwrap();
        assert_eq!(category.id, category_id);
        assert_eq!(category.slug, "news");
        assert!(category.is_published);
        assert_eq!(detail.location_name.as_deref(), Some("Reykjavik"));
    }

    #[tokio::test]
    async fn test_published_comments_resolve_authors() {
        let post_id = uuid::Uuid::new_v4();
        let comment_id = uuid::Uuid::new_v4();
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![BTreeMap::from([
                ("id", Value::from(comment_id)),
                ("post_id", Value::from(post_id)),
                ("author_id", Value::from(uuid::Uuid::new_v4())),
                ("text", Value::from("Nice one")),
                ("is_published", Value::from(true)),
                ("created_at", Value::from(now)),
                ("author_username", Value::from("bob")),
            ])]])
            .into_connection();

        let repo = PostgresCommentRepository::new(Arc::new(db));

        let comments = repo.list_published_for_post(post_id).await.unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].comment.id, comment_id);
        assert_eq!(comments[0].comment.post_id, post_id);
        assert_eq!(comments[0].author_username, "bob");
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let user_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "alice".to_owned(),
                email: "alice@example.com".to_owned(),
                password_hash: "hash".to_owned(),
                first_name: None,
                last_name: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(Arc::new(db));

        let result: Option<User> = repo.find_by_username("alice").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.id, user_id);
        assert_eq!(found.username, "alice");
    }

    #[tokio::test]
    async fn test_find_category_by_slug() {
        let category_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: category_id,
                title: "News".to_owned(),
                description: "All the news".to_owned(),
                slug: "news".to_owned(),
                is_published: true,
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(Arc::new(db));

        let result: Option<Category> = repo.find_by_slug("news").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().slug, "news");
    }

    #[tokio::test]
    async fn test_list_published_locations() {
        let location_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![location::Model {
                id: location_id,
                name: "Reykjavik".to_owned(),
                is_published: true,
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresLocationRepository::new(Arc::new(db));

        let locations = repo.list_published().await.unwrap();

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].id, location_id);
        assert_eq!(locations[0].name, "Reykjavik");
    }

    #[tokio::test]
    async fn test_find_missing_post_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(Arc::new(db));

        let result: Option<Post> = repo.find_by_id(uuid::Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }
}
