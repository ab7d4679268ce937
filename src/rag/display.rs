//! HTML-safe wrapping of generated text

const PRE_OPEN: &str = r#"<pre style="white-space: pre-wrap; font-size: 1rem;">"#;
const PRE_CLOSE: &str = "</pre>";

/// Escape `<` and `>` so generated text cannot inject markup
#[must_use]
pub fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Trim, escape, and wrap a completion in a whitespace-preserving block
#[must_use]
pub fn format_for_display(raw: &str) -> String {
    format!("{PRE_OPEN}{}{PRE_CLOSE}", escape_angle_brackets(raw.trim()))
}

/// Undo [`format_for_display`] for terminal output
#[must_use]
pub fn to_plain_text(html: &str) -> String {
    let inner = html
        .strip_prefix(PRE_OPEN)
        .and_then(|rest| rest.strip_suffix(PRE_CLOSE))
        .unwrap_or(html);
    inner.replace("&lt;", "<").replace("&gt;", ">")
}
