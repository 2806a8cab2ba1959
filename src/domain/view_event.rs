//! Page view event passed from the redirect path to the background worker.

use crate::domain::entities::NewPageView;
use crate::utils::user_agent::AgentInfo;

/// An in-memory page view awaiting persistence.
///
/// Built by [`crate::application::services::RedirectService`] for every
/// non-crawler visit and sent over a bounded channel, so the redirect never
/// waits on the analytics write.
#[derive(Debug, Clone)]
pub struct PageViewEvent {
    pub slug: String,
    pub real_ip: Option<String>,
    pub referer: Option<String>,
    pub agent: AgentInfo,
}

impl PageViewEvent {
    /// Creates a new page view event.
    pub fn new(
        slug: String,
        real_ip: Option<String>,
        referer: Option<&str>,
        agent: AgentInfo,
    ) -> Self {
        Self {
            slug,
            real_ip,
            referer: referer.filter(|r| !r.is_empty()).map(str::to_string),
            agent,
        }
    }
}

impl From<PageViewEvent> for NewPageView {
    fn from(event: PageViewEvent) -> Self {
        Self {
            slug: event.slug,
            real_ip: event.real_ip,
            referer: event.referer,
            mobile: event.agent.is_mobile,
            platform: event.agent.platform,
            os: event.agent.os,
            browser_name: event.agent.browser_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> AgentInfo {
        AgentInfo {
            is_bot: false,
            is_mobile: true,
            platform: Some("smartphone".to_string()),
            os: Some("iPhone".to_string()),
            browser_name: Some("Safari".to_string()),
        }
    }

    #[test]
    fn test_view_event_creation() {
        let event = PageViewEvent::new(
            "abc123".to_string(),
            Some("203.0.113.9".to_string()),
            Some("https://news.example.com"),
            agent(),
        );

        assert_eq!(event.slug, "abc123");
        assert_eq!(event.real_ip.as_deref(), Some("203.0.113.9"));
        assert_eq!(event.referer.as_deref(), Some("https://news.example.com"));
    }

    #[test]
    fn test_empty_referer_is_dropped() {
        let event = PageViewEvent::new("abc123".to_string(), None, Some(""), agent());
        assert!(event.referer.is_none());
    }

    #[test]
    fn test_into_new_page_view() {
        let event = PageViewEvent::new(
            "abc123".to_string(),
            Some("10.0.0.1".to_string()),
            None,
            agent(),
        );

        let view: NewPageView = event.into();

        assert_eq!(view.slug, "abc123");
        assert!(view.mobile);
        assert_eq!(view.platform.as_deref(), Some("smartphone"));
        assert_eq!(view.os.as_deref(), Some("iPhone"));
        assert_eq!(view.browser_name.as_deref(), Some("Safari"));
    }
}
