//! Authorization rules for viewing and mutating content.
//!
//! Handlers call these named functions directly instead of layering the rules
//! into the request dispatch itself.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::query::PostDetail;

/// Gate detail access to a post.
///
/// The author always sees their own post. Anyone else, authenticated or not,
/// sees it only when it is publicly visible; otherwise the failure is
/// NotFound so the existence of hidden posts does not leak.
pub fn check_detail_access(
    detail: &PostDetail,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if viewer == Some(detail.post.author_id) {
        return Ok(());
    }
    if detail.is_publicly_visible(now) {
        return Ok(());
    }
    Err(DomainError::NotFound {
        entity_type: "post",
        id: detail.post.id,
    })
}

/// Gate mutation access: only the owning author may edit or delete.
pub fn require_author(owner_id: Uuid, actor_id: Uuid) -> Result<(), DomainError> {
    if owner_id == actor_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Post;
    use crate::query::CategoryRef;
    use chrono::TimeDelta;

    fn detail(author_id: Uuid, pub_date: DateTime<Utc>, is_published: bool) -> PostDetail {
        let mut post = Post::new(
            author_id,
            "Title".to_string(),
            "Text".to_string(),
            pub_date,
        );
        post.is_published = is_published;
        PostDetail {
            post,
            author_username: "alice".to_string(),
            category: None,
            location_name: None,
        }
    }

    #[test]
    fn author_sees_own_draft() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let detail = detail(author, now - TimeDelta::hours(1), false);

        assert!(check_detail_access(&detail, Some(author), now).is_ok());
    }

    #[test]
    fn author_sees_own_future_post() {
        let author = Uuid::new_v4();
        let now = Utc::now();
        let detail = detail(author, now + TimeDelta::days(3), true);

        assert!(check_detail_access(&detail, Some(author), now).is_ok());
    }

    #[test]
    fn stranger_gets_not_found_for_draft() {
        let now = Utc::now();
        let detail = detail(Uuid::new_v4(), now - TimeDelta::hours(1), false);

        let err = check_detail_access(&detail, Some(Uuid::new_v4()), now).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn anonymous_gets_not_found_for_future_post() {
        let now = Utc::now();
        let detail = detail(Uuid::new_v4(), now + TimeDelta::days(1), true);

        let err = check_detail_access(&detail, None, now).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn anonymous_sees_public_post() {
        let now = Utc::now();
        let detail = detail(Uuid::new_v4(), now - TimeDelta::hours(1), true);

        assert!(check_detail_access(&detail, None, now).is_ok());
    }

    #[test]
    fn unpublished_category_hides_post_from_strangers() {
        let now = Utc::now();
        let mut d = detail(Uuid::new_v4(), now - TimeDelta::hours(1), true);
        d.category = Some(CategoryRef {
            id: Uuid::new_v4(),
            title: "News".to_string(),
            slug: "news".to_string(),
            is_published: false,
        });

        assert!(check_detail_access(&d, None, now).is_err());
        assert!(check_detail_access(&d, Some(d.post.author_id), now).is_ok());
    }

    #[test]
    fn only_owner_may_mutate() {
        let owner = Uuid::new_v4();

        assert!(require_author(owner, owner).is_ok());
        assert!(matches!(
            require_author(owner, Uuid::new_v4()),
            Err(DomainError::Forbidden)
        ));
    }
}
