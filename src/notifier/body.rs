use html_escape::encode_text;

/// Simple HTML rendering of a plain-text body: escaped, line breaks kept.
pub fn render_html(body: &str) -> String {
    encode_text(body).replace('\n', "<br>\n")
}
