//! Page-view tracking
//!
//! One `pageview` hit per location change. Hits are fire-and-forget: no
//! retries, no batching.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HIT_TYPE_PAGEVIEW: &str = "pageview";

/// A single page-view hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageviewEvent {
    pub hit_type: String,
    /// Path plus query string, e.g. `/cards/42?tab=stats`
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl PageviewEvent {
    pub fn new(path: &str, query: &str) -> Self {
        Self {
            hit_type: HIT_TYPE_PAGEVIEW.to_string(),
            page: page_of(path, query),
            client_id: None,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

/// `path` + `query`, accepting the query with or without its leading `?`
pub fn page_of(path: &str, query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Collector request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Collector rejected hit with status {0}")]
    Rejected(http::StatusCode),
}

/// Analytics collector endpoint
#[async_trait]
pub trait PageviewCollector: Send + Sync {
    async fn send(&self, event: &PageviewEvent) -> Result<(), CollectorError>;
}

/// Collector reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpCollector {
    client: reqwest::Client,
    url: String,
    tracking_id: Option<String>,
}

#[derive(Serialize)]
struct Hit<'a> {
    v: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    tid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cid: Option<&'a str>,
    t: &'a str,
    dp: &'a str,
}

impl HttpCollector {
    /// `timeout` bounds each hit, connect included
    pub fn new(
        url: impl Into<String>,
        tracking_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            tracking_id,
        })
    }
}

#[async_trait]
impl PageviewCollector for HttpCollector {
    async fn send(&self, event: &PageviewEvent) -> Result<(), CollectorError> {
        let hit = Hit {
            v: 1,
            tid: self.tracking_id.as_deref(),
            cid: event.client_id.as_deref(),
            t: &event.hit_type,
            dp: &event.page,
        };

        let resp = self.client.post(&self.url).json(&hit).send().await?;
        if !resp.status().is_success() {
            return Err(CollectorError::Rejected(resp.status()));
        }
        Ok(())
    }
}

/// Emits a page view whenever the observed location changes
pub struct PageviewTracker<C: PageviewCollector + ?Sized> {
    collector: Arc<C>,
    last_page: Mutex<Option<String>>,
}

impl<C: PageviewCollector + ?Sized> PageviewTracker<C> {
    pub fn new(collector: Arc<C>) -> Self {
        Self {
            collector,
            last_page: Mutex::new(None),
        }
    }

    /// Report a location; returns whether a hit was emitted
    ///
    /// Reporting the current location again emits nothing.
    pub async fn location_changed(&self, path: &str, query: &str) -> bool {
        let event = PageviewEvent::new(path, query);
        {
            let mut last = match self.last_page.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if last.as_deref() == Some(event.page.as_str()) {
                return false;
            }
            *last = Some(event.page.clone());
        }

        if let Err(e) = self.collector.send(&event).await {
            tracing::warn!(page = %event.page, error = %e, "Page view dropped");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingCollector {
        hits: Mutex<Vec<PageviewEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl PageviewCollector for RecordingCollector {
        async fn send(&self, event: &PageviewEvent) -> Result<(), CollectorError> {
            self.hits.lock().unwrap().push(event.clone());
            if self.fail {
                Err(CollectorError::Rejected(http::StatusCode::BAD_GATEWAY))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_page_of() {
        assert_eq!(page_of("/cards", ""), "/cards");
        assert_eq!(page_of("/cards", "?tab=1"), "/cards?tab=1");
        assert_eq!(page_of("/cards", "tab=1"), "/cards?tab=1");
        assert_eq!(page_of("/cards", "?"), "/cards");
    }

    #[tokio::test]
    async fn test_emits_once_per_location_change() {
        let collector = Arc::new(RecordingCollector::default());
        let tracker = PageviewTracker::new(collector.clone());

        assert!(tracker.location_changed("/", "").await);
        assert!(!tracker.location_changed("/", "").await);
        assert!(tracker.location_changed("/cards/42", "?tab=stats").await);
        assert!(tracker.location_changed("/cards/42", "").await);
        assert!(tracker.location_changed("/", "").await);

        let hits = collector.hits.lock().unwrap();
        let pages: Vec<&str> = hits.iter().map(|h| h.page.as_str()).collect();
        assert_eq!(pages, vec!["/", "/cards/42?tab=stats", "/cards/42", "/"]);
        assert!(hits.iter().all(|h| h.hit_type == HIT_TYPE_PAGEVIEW));
    }

    #[tokio::test]
    async fn test_failed_hit_is_not_retried() {
        let collector = Arc::new(RecordingCollector {
            fail: true,
            ..Default::default()
        });
        let tracker = PageviewTracker::new(collector.clone());

        assert!(tracker.location_changed("/a", "").await);
        assert!(!tracker.location_changed("/a", "").await);
        assert_eq!(collector.hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_http_collector_times_out_on_silent_endpoint() {
        // accepted by the kernel backlog, never answered
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/collect", listener.local_addr().unwrap());
        let collector = HttpCollector::new(url, None, Duration::from_millis(200)).unwrap();

        let started = std::time::Instant::now();
        let err = collector
            .send(&PageviewEvent::new("/cards", ""))
            .await
            .unwrap_err();

        assert!(matches!(&err, CollectorError::Http(e) if e.is_timeout()), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(5));
        drop(listener);
    }

    #[tokio::test]
    async fn test_tracker_over_trait_object() {
        let collector: Arc<dyn PageviewCollector> = Arc::new(RecordingCollector::default());
        let tracker = PageviewTracker::new(collector);
        assert!(tracker.location_changed("/x", "").await);
    }
}
