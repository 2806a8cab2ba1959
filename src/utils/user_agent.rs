//! User-Agent classification for page view analytics.
//!
//! Wraps woothee to decide whether a visitor is a crawler and to extract the
//! platform, OS and browser recorded with each page view.

use woothee::parser::Parser;

/// Attributes extracted from a raw User-Agent header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentInfo {
    pub is_bot: bool,
    pub is_mobile: bool,
    pub platform: Option<String>,
    pub os: Option<String>,
    pub browser_name: Option<String>,
}

const UNKNOWN: &str = "UNKNOWN";

fn known(value: &str) -> Option<String> {
    if value.is_empty() || value == UNKNOWN {
        None
    } else {
        Some(value.to_string())
    }
}

/// Classifies a User-Agent string.
///
/// A missing or unparseable agent is treated as a human visitor with unknown
/// attributes.
pub fn classify(user_agent: Option<&str>) -> AgentInfo {
    let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
        return AgentInfo::default();
    };

    let parser = Parser::new();
    let Some(result) = parser.parse(ua) else {
        return AgentInfo::default();
    };

    let os = match (known(result.os), known(&result.os_version)) {
        (Some(os), Some(version)) => Some(format!("{os} {version}")),
        (os, _) => os,
    };

    AgentInfo {
        is_bot: result.category == "crawler",
        is_mobile: matches!(result.category, "smartphone" | "mobilephone"),
        platform: known(result.category),
        os,
        browser_name: known(result.name),
    }
}
