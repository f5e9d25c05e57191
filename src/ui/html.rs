use std::borrow::Cow;

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub const STYLE: &str = "\
table { border-collapse: collapse; margin-bottom: 24px; }
th, td { border: 1px solid #999; padding: 2px 4px; vertical-align: top; font: 12px sans-serif; }
th { background: #eee; }
.null { color: #999; font-style: italic; }
.intent { color: #06c; cursor: help; text-decoration: underline dotted; }
table.grid td { text-align: center; vertical-align: middle; }
table.grid td.empty { background: #f6f6f6; }
.overlap { color: #c00; }
";

pub fn document_start(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>\n{STYLE}</style>\n</head>\n<body>\n",
        escape(title)
    )
}

pub const DOCUMENT_END: &str = "</body>\n</html>\n";

pub fn heading(text: &str) -> String { format!("<h2>{}</h2>\n", escape(text)) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape("Calculator"), Cow::Borrowed("Calculator")));
    }

    #[test]
    fn markup_and_quotes_become_entities() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn escaping_is_not_idempotent_on_entities() {
        assert_eq!(escape("&amp;"), "&amp;amp;");
    }

    #[test]
    fn document_title_is_escaped() {
        assert!(document_start("a<b").contains("<title>a&lt;b</title>"));
    }
}
