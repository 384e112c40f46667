use serde::{Deserialize, Serialize};

/// Webhook endpoint plus the shared secret used to sign each request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub webhook_url: String,
    pub secret_key: String,
}

/// One message bound for the group robot.
///
/// The "at everyone" flag is never stored: an explicit mention list
/// suppresses it, so it is derived from `mentions.is_empty()` at render
/// time.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Text {
        content: String,
        mentions: Vec<String>,
    },
    Markdown {
        title: String,
        body: String,
        mentions: Vec<String>,
    },
    Raw {
        payload: String,
    },
}

impl OutboundMessage {
    pub fn text(content: String, mentions: Vec<String>) -> Self {
        Self::Text { content, mentions }
    }

    pub fn markdown(title: String, body: String, mentions: Vec<String>) -> Self {
        Self::Markdown {
            title,
            body,
            mentions,
        }
    }

    pub fn raw(payload: String) -> Self {
        Self::Raw { payload }
    }
}

/// A failing row scraped from a build report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub product: String,
    pub detail: String,
}

/// All failures under one version header, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionReport {
    pub version: String,
    pub entries: Vec<ReportEntry>,
}
