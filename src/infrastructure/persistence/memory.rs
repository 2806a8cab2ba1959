//! In-memory store implementing every repository trait.
//!
//! Backs the unit and integration tests.
//! Unique constraints mirror the SQL schema: page slug, one OGP per page,
//! user email, token name and token hash.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::{NewPage, NewPageView, Ogp, OgpFields, Page, PageView, User};
use crate::domain::repositories::{
    ApiToken, OgpRepository, PageRepository, PageViewRepository, TokenRepository,
};
use crate::error::AppError;

struct StoredToken {
    token: ApiToken,
    last_used_at: Option<DateTime<Utc>>,
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    next_id: AtomicI64,
    pages: DashMap<i64, Page>,
    slugs: DashMap<String, i64>,
    ogps: DashMap<i64, Ogp>,
    ogp_by_page: DashMap<i64, i64>,
    views: DashMap<i64, PageView>,
    users: DashMap<i64, User>,
    tokens: DashMap<i64, StoredToken>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn attach_ogp(&self, page: Page) -> Page {
        let ogp = self
            .ogp_by_page
            .get(&page.id)
            .map(|id| *id)
            .and_then(|ogp_id| self.ogps.get(&ogp_id).map(|o| o.clone()));
        page.with_ogp(ogp)
    }

    /// Creates or updates the page's OGP record in place.
    fn put_ogp(&self, page_id: i64, fields: OgpFields) -> Ogp {
        let id = *self
            .ogp_by_page
            .entry(page_id)
            .or_insert_with(|| self.next_id());
        let ogp = Ogp::new(id, page_id, fields.title, fields.image, fields.description);
        self.ogps.insert(id, ogp.clone());
        ogp
    }

    fn remove_ogp(&self, page_id: i64) {
        if let Some((_, id)) = self.ogp_by_page.remove(&page_id) {
            self.ogps.remove(&id);
        }
    }

    /// Returns every recorded page view, oldest first.
    pub fn page_views(&self) -> Vec<PageView> {
        let mut views: Vec<PageView> = self.views.iter().map(|v| v.clone()).collect();
        views.sort_by_key(|v| v.id);
        views
    }

    /// Returns when a token was last used to authenticate.
    pub fn token_last_used(&self, id: i64) -> Option<DateTime<Utc>> {
        self.tokens.get(&id).and_then(|t| t.last_used_at)
    }
}

#[async_trait]
impl PageRepository for InMemoryStore {
    async fn create(&self, new_page: NewPage) -> Result<Page, AppError> {
        let id = match self.slugs.entry(new_page.slug.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(
                    "Slug already taken",
                    json!({ "slug": new_page.slug }),
                ));
            }
            Entry::Vacant(slot) => {
                let id = self.next_id();
                slot.insert(id);
                id
            }
        };

        let page = Page::new(id, new_page.slug, new_page.user_id, new_page.url, Utc::now());
        self.pages.insert(id, page.clone());
        let ogp = new_page.ogp.map(|fields| self.put_ogp(id, fields));

        Ok(page.with_ogp(ogp))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Page>, AppError> {
        let Some(id) = self.slugs.get(slug).map(|id| *id) else {
            return Ok(None);
        };
        PageRepository::find_by_id(self, id).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Page>, AppError> {
        let page = self.pages.get(&id).map(|p| p.clone());
        Ok(page.map(|p| self.attach_ogp(p)))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Page>, AppError> {
        let mut pages: Vec<Page> = self
            .pages
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.clone())
            .collect();
        pages.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(pages.into_iter().map(|p| self.attach_ogp(p)).collect())
    }

    async fn update(
        &self,
        id: i64,
        url: &str,
        ogp: Option<OgpFields>,
    ) -> Result<Page, AppError> {
        let page = match self.pages.get_mut(&id) {
            Some(mut page) => {
                page.url = url.to_string();
                page.clone()
            }
            None => return Err(AppError::not_found("Page not found", json!({ "id": id }))),
        };

        match ogp {
            Some(fields) => {
                self.put_ogp(id, fields);
            }
            None => self.remove_ogp(id),
        }

        Ok(self.attach_ogp(page))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.pages.len() as i64)
    }
}

#[async_trait]
impl OgpRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Ogp>, AppError> {
        Ok(self.ogps.get(&id).map(|o| o.clone()))
    }
}

#[async_trait]
impl PageViewRepository for InMemoryStore {
    async fn record(&self, new_view: NewPageView) -> Result<PageView, AppError> {
        let view = PageView {
            id: self.next_id(),
            slug: new_view.slug,
            real_ip: new_view.real_ip,
            referer: new_view.referer,
            mobile: new_view.mobile,
            platform: new_view.platform,
            os: new_view.os,
            browser_name: new_view.browser_name,
            created_at: Utc::now(),
        };
        self.views.insert(view.id, view.clone());
        Ok(view)
    }

    async fn count_by_slug(&self, slug: &str) -> Result<i64, AppError> {
        Ok(self.views.iter().filter(|v| v.slug == slug).count() as i64)
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn find_user_by_token(&self, token_hash: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.token.token_hash == token_hash && t.token.revoked_at.is_none())
            .map(|t| t.token.user_id))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        for mut t in self.tokens.iter_mut() {
            if t.token.token_hash == token_hash && t.token.revoked_at.is_none() {
                t.last_used_at = Some(Utc::now());
            }
        }
        Ok(())
    }

    async fn create_token(
        &self,
        user_id: i64,
        name: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let taken = self
            .tokens
            .iter()
            .any(|t| t.token.name == name || t.token.token_hash == token_hash);
        if taken {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_tokens_name_key" }),
            ));
        }

        let token = ApiToken {
            id: self.next_id(),
            user_id,
            name: name.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            revoked_at: None,
        };
        self.tokens.insert(
            token.id,
            StoredToken {
                token: token.clone(),
                last_used_at: None,
            },
        );
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let mut tokens: Vec<ApiToken> = self.tokens.iter().map(|t| t.token.clone()).collect();
        tokens.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tokens)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        Ok(self.tokens.get(&id).map(|t| t.token.clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        Ok(self
            .tokens
            .iter()
            .find(|t| t.token.name == name)
            .map(|t| t.token.clone()))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        if let Some(mut t) = self.tokens.get_mut(&id)
            && t.token.revoked_at.is_none()
        {
            t.token.revoked_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_user(&self, name: &str, email: &str) -> Result<User, AppError> {
        if self.users.iter().any(|u| u.email == email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        let user = User {
            id: self.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_page(slug: &str) -> NewPage {
        NewPage {
            slug: slug.to_string(),
            user_id: 1,
            url: "https://example.com".to_string(),
            ogp: None,
        }
    }

    fn fields(title: &str) -> OgpFields {
        OgpFields {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let store = InMemoryStore::new();
        PageRepository::create(&store, new_page("abc123")).await.unwrap();

        let err = PageRepository::create(&store, new_page("abc123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(PageRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_with_ogp_joins_on_lookup() {
        let store = InMemoryStore::new();
        let created = PageRepository::create(
            &store,
            NewPage {
                ogp: Some(fields("Hello")),
                ..new_page("abc123")
            },
        )
        .await
        .unwrap();

        let ogp = created.ogp.clone().unwrap();
        assert_eq!(ogp.title, "Hello");

        let found = store.find_by_slug("abc123").await.unwrap().unwrap();
        assert_eq!(found.ogp, Some(ogp.clone()));
        assert_eq!(OgpRepository::find_by_id(&store, ogp.id).await.unwrap(), Some(ogp));
    }

    #[tokio::test]
    async fn test_update_reconciles_ogp() {
        let store = InMemoryStore::new();
        let page = PageRepository::create(&store, new_page("abc123")).await.unwrap();

        let added = store
            .update(page.id, "https://a.example.com", Some(fields("One")))
            .await
            .unwrap();
        let ogp_id = added.ogp.as_ref().unwrap().id;
        assert_eq!(added.url, "https://a.example.com");

        let renamed = store
            .update(page.id, "https://b.example.com", Some(fields("Two")))
            .await
            .unwrap();
        assert_eq!(renamed.ogp.as_ref().map(|o| o.id), Some(ogp_id));
        assert_eq!(renamed.ogp.as_ref().map(|o| o.title.as_str()), Some("Two"));

        let removed = store
            .update(page.id, "https://b.example.com", None)
            .await
            .unwrap();
        assert!(removed.ogp.is_none());
        assert!(OgpRepository::find_by_id(&store, ogp_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_page() {
        let store = InMemoryStore::new();
        let err = store
            .update(99, "https://a.b", Some(fields("x")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(store.ogps.is_empty());
    }

    #[tokio::test]
    async fn test_revoked_token_does_not_resolve() {
        let store = InMemoryStore::new();
        let user = store.create_user("Ann", "ann@example.com").await.unwrap();
        let token = store.create_token(user.id, "ci", "hash").await.unwrap();

        assert_eq!(store.find_user_by_token("hash").await.unwrap(), Some(user.id));

        store.update_last_used("hash").await.unwrap();
        assert!(store.token_last_used(token.id).is_some());

        store.revoke_token(token.id).await.unwrap();
        assert_eq!(store.find_user_by_token("hash").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_by_user_newest_first() {
        let store = InMemoryStore::new();
        let first = PageRepository::create(&store, new_page("aaaaaa")).await.unwrap();
        let second = PageRepository::create(&store, new_page("bbbbbb")).await.unwrap();
        PageRepository::create(
            &store,
            NewPage {
                user_id: 2,
                ..new_page("cccccc")
            },
        )
        .await
        .unwrap();

        let pages = store.list_by_user(1).await.unwrap();
        let ids: Vec<i64> = pages.iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![second.id, first.id]);
    }
}
