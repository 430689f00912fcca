//! Sanitized transcript text

/// Text from the user or the backend, made safe before it reaches a surface.
///
/// The raw string is kept, and each surface asks for the form it renders:
/// markup surfaces take [`SafeText::markup`], character surfaces take
/// [`SafeText::display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeText {
    raw: String,
}

impl SafeText {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// HTML-escaped form, inert inside element content and attribute values
    pub fn markup(&self) -> String {
        escape_html(&self.raw)
    }

    /// Form for terminal surfaces: control characters other than newline and
    /// tab are dropped so no escape sequence survives
    pub fn display(&self) -> String {
        self.raw
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect()
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tags_are_escaped() {
        let text = SafeText::new("<script>alert(1)</script>");
        assert_eq!(text.markup(), "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert_eq!(text.raw(), "<script>alert(1)</script>");
    }

    #[test]
    fn ampersand_escaped_first() {
        assert_eq!(escape_html("a & <b>"), "a &amp; &lt;b&gt;");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(escape_html(r#"" onclick='x'"#), "&quot; onclick=&#39;x&#39;");
    }

    #[test]
    fn display_drops_escape_sequences() {
        let text = SafeText::new("red\u{1b}[31m text\r\nnext\tcol");
        assert_eq!(text.display(), "red[31m text\nnext\tcol");
    }

    #[test]
    fn plain_text_is_untouched() {
        let text = SafeText::new("Привет, how are you? 🙂");
        assert_eq!(text.markup(), "Привет, how are you? 🙂");
        assert_eq!(text.display(), "Привет, how are you? 🙂");
    }
}
