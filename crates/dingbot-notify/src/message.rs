use dingbot_core::OutboundMessage;
use serde_json::json;

/// Render a message to the JSON body the webhook expects.
///
/// Text messages get their mention list prefixed to the visible content as
/// `@<phone>` tokens; markdown messages carry mentions only in the `at`
/// metadata. `isAtAll` is true exactly when the mention list is empty.
pub fn render(message: &OutboundMessage) -> String {
    match message {
        OutboundMessage::Text { content, mentions } => {
            let visible = if mentions.is_empty() {
                content.clone()
            } else {
                let prefix: Vec<String> = mentions.iter().map(|m| format!("@{}", m)).collect();
                format!("{} {}", prefix.join(" "), content)
            };
            json!({
                "msgtype": "text",
                "text": { "content": visible },
                "at": { "atMobiles": mentions, "isAtAll": mentions.is_empty() },
            })
            .to_string()
        }
        OutboundMessage::Markdown {
            title,
            body,
            mentions,
        } => json!({
            "msgtype": "markdown",
            "markdown": { "title": title, "text": format!("{}\n", body) },
            "at": { "atMobiles": mentions, "isAtAll": mentions.is_empty() },
        })
        .to_string(),
        OutboundMessage::Raw { payload } => payload.clone(),
    }
}
