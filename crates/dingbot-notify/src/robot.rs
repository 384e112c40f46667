use chrono::Utc;
use dingbot_core::{Credentials, DingbotError, DingbotResult, OutboundMessage};
use tracing::info;

use crate::message;
use crate::sign;

const SUCCESS_RESPONSE: &str = "{\"errcode\":0,\"errmsg\":\"ok\"}";
const SEND_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

pub struct Robot {
    client: reqwest::Client,
    credentials: Credentials,
}

impl Robot {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }

    /// Sign and deliver one message.
    ///
    /// Succeeds only on the exact acknowledgement body; any other response
    /// is a delivery error carrying the raw body text.
    pub async fn send(&self, message: &OutboundMessage) -> DingbotResult<()> {
        let body = message::render(message).replace("\r\n", "\n");

        // One sample feeds both the signature and the query string.
        let timestamp = Utc::now().timestamp_millis();
        let signature = sign::sign(&self.credentials.secret_key, timestamp);
        let url = format!(
            "{}&timestamp={}&sign={}",
            self.credentials.webhook_url, timestamp, signature
        );

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/json; charset=utf-8")
            .body(body)
            .timeout(SEND_TIMEOUT)
            .send()
            .await?;

        let ack = resp.text().await?;
        if ack == SUCCESS_RESPONSE {
            info!("robot message delivered");
            Ok(())
        } else {
            Err(DingbotError::Delivery(ack))
        }
    }
}
