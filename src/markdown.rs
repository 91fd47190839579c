use pulldown_cmark::{html, Options, Parser};

/// Converts markdown to HTML, appending the result to `w`. On top of
/// CommonMark, tables and `~~strikethrough~~` are recognized.
pub fn to_html(w: &mut String, markdown: &str) {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    html::push_html(w, Parser::new_ext(markdown, options));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_plain_paragraphs() {
        let mut out = String::new();
        to_html(&mut out, "Hello, world.\n\nSecond paragraph.\n");
        assert_eq!(out, "<p>Hello, world.</p>\n<p>Second paragraph.</p>\n");
    }

    #[test]
    fn test_strikethrough() {
        let mut out = String::new();
        to_html(&mut out, "~~struck~~\n");
        assert_eq!(out, "<p><del>struck</del></p>\n");
    }

    #[test]
    fn test_tables() {
        let mut out = String::new();
        to_html(&mut out, "| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.starts_with("<table>"), "{}", out);
        assert!(out.contains("<th>a</th>"), "{}", out);
        assert!(out.contains("<td>1</td><td>2</td>"), "{}", out);
    }

    #[test]
    fn test_fenced_code() {
        let mut out = String::new();
        to_html(&mut out, "```\nlet x = 1;\n```\n");
        assert_eq!(out, "<pre><code>let x = 1;\n</code></pre>\n");
    }
}
