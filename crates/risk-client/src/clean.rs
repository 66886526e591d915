use regex::Regex;
use std::sync::OnceLock;

fn opening_fence() -> &'static Regex {
    static OPENING: OnceLock<Regex> = OnceLock::new();
    OPENING.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").expect("opening fence"))
}

fn closing_fence() -> &'static Regex {
    static CLOSING: OnceLock<Regex> = OnceLock::new();
    CLOSING.get_or_init(|| Regex::new(r"\r?\n?```$").expect("closing fence"))
}

/// Removes a markdown code fence wrapped around the model output, e.g.
/// "```json\n{...}\n```". Text without a fence only gets trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(found) = opening_fence().find(body) {
        body = &body[found.end()..];
    }
    if let Some(found) = closing_fence().find(body) {
        body = &body[..found.start()];
    }
    body.trim()
}
