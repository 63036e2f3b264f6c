use chrono::{DateTime, Utc};

/// Escapes text for safe interpolation into HTML bodies and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Human readable instant, e.g. `Thu, Sep 26 2024 09:00`.
pub fn display_instant(instant: &DateTime<Utc>) -> String {
    instant.format("%a, %b %d %Y %H:%M").to_string()
}

/// Value for an `<input type="datetime-local">`.
pub fn datetime_local_value(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M").to_string()
}

/// Wraps a rendered body in the shared page chrome.
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<main class=\"p-4 max-w-4xl mx-auto\">\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}
