//! Pulling JSON out of model replies

use tracing::debug;

/// Extract the JSON payload from a model reply
///
/// Models sometimes wrap JSON in Markdown fences or add a sentence before
/// it. This returns the fenced block if there is one, otherwise the span from
/// the first `{`/`[` to the matching last `}`/`]`.
pub fn extract_json(reply: &str) -> &str {
    debug!(reply_len = reply.len(), "extract_json: called");
    let trimmed = reply.trim();

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // skip an optional language tag on the fence line
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            debug!("extract_json: found fenced block");
            return body[..end].trim();
        }
    }

    let open = trimmed.find(['{', '[']);
    let close = trimmed.rfind(['}', ']']);
    match (open, close) {
        (Some(open), Some(close)) if close > open => &trimmed[open..=close],
        _ => trimmed,
    }
}
