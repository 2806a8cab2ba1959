//! Background worker that persists page views.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info, warn};

use crate::domain::repositories::PageViewRepository;
use crate::domain::view_event::PageViewEvent;

/// Drains the page view channel and writes each event to the store.
///
/// Up to `concurrency` writes run at once. A failed write is logged and
/// dropped; analytics are best-effort and never retried. The worker returns
/// once every sender is dropped and in-flight writes have finished.
pub async fn run_view_worker(
    mut rx: mpsc::Receiver<PageViewEvent>,
    repository: Arc<dyn PageViewRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let slug = event.slug.clone();
            match repository.record(event.into()).await {
                Ok(view) => debug!(slug = %slug, view_id = view.id, "Page view recorded"),
                Err(e) => warn!(slug = %slug, error = %e, "Failed to record page view"),
            }
            drop(permit);
        });
    }

    // Holding every permit means all spawned writes have finished.
    match permits.acquire_many(concurrency as u32).await {
        Ok(_) => info!("View worker stopped"),
        Err(e) => warn!(error = %e, "View worker stopped without draining in-flight writes"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{NewPageView, PageView};
    use crate::domain::repositories::MockPageViewRepository;
    use crate::error::AppError;
    use crate::utils::user_agent::AgentInfo;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Repository whose writes take a while to complete.
    #[derive(Default)]
    struct SlowRepository {
        recorded: AtomicUsize,
    }

    #[async_trait]
    impl PageViewRepository for SlowRepository {
        async fn record(&self, new_view: NewPageView) -> Result<PageView, AppError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.recorded.fetch_add(1, Ordering::SeqCst);
            Ok(stored(&new_view.slug))
        }

        async fn count_by_slug(&self, _slug: &str) -> Result<i64, AppError> {
            Ok(self.recorded.load(Ordering::SeqCst) as i64)
        }
    }

    fn event(slug: &str) -> PageViewEvent {
        PageViewEvent::new(
            slug.to_string(),
            Some("10.0.0.1".to_string()),
            None,
            AgentInfo::default(),
        )
    }

    fn stored(slug: &str) -> PageView {
        PageView {
            id: 1,
            slug: slug.to_string(),
            real_ip: Some("10.0.0.1".to_string()),
            referer: None,
            mobile: false,
            platform: None,
            os: None,
            browser_name: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_worker_records_every_event() {
        let mut mock_repo = MockPageViewRepository::new();
        mock_repo
            .expect_record()
            .times(2)
            .returning(|view| Ok(stored(&view.slug)));

        let (tx, rx) = mpsc::channel(8);
        tx.send(event("abc123")).await.unwrap();
        tx.send(event("xyz789")).await.unwrap();
        drop(tx);

        run_view_worker(rx, Arc::new(mock_repo), 2).await;
    }

    #[tokio::test]
    async fn test_worker_continues_after_failure() {
        let mut mock_repo = MockPageViewRepository::new();
        mock_repo
            .expect_record()
            .withf(|view| view.slug == "broken")
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        mock_repo
            .expect_record()
            .withf(|view| view.slug == "abc123")
            .times(1)
            .returning(|view| Ok(stored(&view.slug)));

        let (tx, rx) = mpsc::channel(8);
        tx.send(event("broken")).await.unwrap();
        tx.send(event("abc123")).await.unwrap();
        drop(tx);

        run_view_worker(rx, Arc::new(mock_repo), 1).await;
    }

    #[tokio::test]
    async fn test_worker_waits_for_in_flight_writes() {
        let repository = Arc::new(SlowRepository::default());

        let (tx, rx) = mpsc::channel(8);
        for slug in ["a", "b", "c", "d", "e"] {
            tx.send(event(slug)).await.unwrap();
        }
        drop(tx);

        run_view_worker(rx, repository.clone(), 3).await;

        assert_eq!(repository.recorded.load(Ordering::SeqCst), 5);
    }
}
