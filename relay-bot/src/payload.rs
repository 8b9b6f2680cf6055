//! Formatting of relay payloads posted to destination webhooks.

use relay_core::{InboundMessage, RelayPayload, Route};

/// Longest username a webhook accepts.
pub const MAX_USERNAME_CHARS: usize = 80;
/// Longest message content a webhook accepts.
pub const MAX_CONTENT_CHARS: usize = 2000;
/// Username used when the transformed identity is blank.
pub const PLACEHOLDER_IDENTITY: &str = "Anonymous";

/// Builds the payload for one transformed output.
///
/// The identity is cut at [`MAX_USERNAME_CHARS`]; anything beyond is prefixed to the content.
/// When the original message is kept, the output links back to it.
pub fn build_payload(
    output: &str,
    identity: &str,
    route: &Route,
    message: &InboundMessage,
) -> RelayPayload {
    let identity = match identity.trim() {
        "" => PLACEHOLDER_IDENTITY,
        trimmed => trimmed,
    };
    let username: String = identity.chars().take(MAX_USERNAME_CHARS).collect();
    let remainder: String = identity.chars().skip(MAX_USERNAME_CHARS).collect();
    let remainder = remainder.trim();

    let prefix = if remainder.is_empty() {
        String::new()
    } else {
        format!("{} ", remainder)
    };
    let (open, close) = if route.delete_original {
        (String::new(), String::new())
    } else {
        ("[".to_string(), format!("]({})", message.link))
    };

    let fixed = prefix.chars().count() + open.chars().count() + close.chars().count();
    let budget = MAX_CONTENT_CHARS.saturating_sub(fixed);
    let body = if route.delete_original {
        truncate_chars(output, budget)
    } else {
        truncate_chars(&escape_link_text(output), budget)
    };

    let content = format!("{}{}{}{}", prefix, open, body, close);
    RelayPayload {
        content: truncate_chars(&content, MAX_CONTENT_CHARS),
        username,
        avatar_url: message.author.avatar_url.clone(),
    }
}

/// Brackets would end the link text early.
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
