//! html.rs - Escaping and stripping of markup in untrusted text.
//!
//! License: MIT OR APACHE 2.0

use log::trace;

use super::patterns::{DATA_SCHEME, EVENT_HANDLER_ATTR, JAVASCRIPT_SCHEME, SCRIPT_BLOCK};

/// Image media types a `data:` URI may keep.
const SAFE_DATA_MEDIA_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg", "image/gif", "image/webp"];

/// Replaces the six HTML-significant characters with entities.
///
/// ```
/// use wellkeep_core::sanitizers::html::escape_html;
/// assert_eq!(escape_html("<a href='/x'>"), "&lt;a href=&#039;&#x2F;x&#039;&gt;");
/// ```
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}

/// Removes script blocks, quoted inline event handlers, `javascript:`
/// schemes and non-image `data:` URIs, then trims surrounding whitespace.
///
/// Used when HTML input is allowed; everything else passes through as-is.
pub fn strip_dangerous(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let without_handlers = EVENT_HANDLER_ATTR.replace_all(&without_scripts, "");
    let without_js = JAVASCRIPT_SCHEME.replace_all(&without_handlers, "");
    let stripped = strip_data_uris(&without_js);
    trace!("strip_dangerous: {} -> {} bytes", input.len(), stripped.trim().len());
    stripped.trim().to_string()
}

fn is_safe_data_uri(after_scheme: &str) -> bool {
    SAFE_DATA_MEDIA_TYPES.iter().any(|media| {
        after_scheme
            .get(..media.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(media))
    })
}

/// Drops each `data:...;` run (scheme through the first `;`) unless the
/// media type is an allowed image type.
fn strip_data_uris(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut copied_to = 0;
    let mut search_from = 0;

    while let Some(m) = DATA_SCHEME.find_at(input, search_from) {
        let rest = &input[m.end()..];
        if is_safe_data_uri(rest) {
            search_from = m.end();
            continue;
        }
        let Some(semi) = rest.find(';') else {
            break;
        };
        out.push_str(&input[copied_to..m.start()]);
        copied_to = m.end() + semi + 1;
        search_from = copied_to;
    }

    out.push_str(&input[copied_to..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_covers_all_six_characters() {
        assert_eq!(escape_html(r#"&<>"'/"#), "&amp;&lt;&gt;&quot;&#039;&#x2F;");
        assert_eq!(escape_html("plain 文本"), "plain 文本");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_escape_html_is_not_idempotent_on_ampersands() {
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_strip_script_blocks() {
        assert_eq!(strip_dangerous("Hello <script>alert(1)</script>world"), "Hello world");
        assert_eq!(
            strip_dangerous("<SCRIPT type='text/javascript'>\nx()\n</SCRIPT> after"),
            "after"
        );
    }

    #[test]
    fn test_strip_event_handlers_and_js_scheme() {
        assert_eq!(
            strip_dangerous(r#"<img src="a.png" onerror="steal()">"#),
            r#"<img src="a.png">"#
        );
        assert_eq!(
            strip_dangerous(r#"<a href="JavaScript:go()">x</a>"#),
            r#"<a href="go()">x</a>"#
        );
    }

    #[test]
    fn test_strip_data_uris_keeps_images() {
        assert_eq!(
            strip_dangerous("<img src=\"data:image/png;base64,AAA\">"),
            "<img src=\"data:image/png;base64,AAA\">"
        );
        assert_eq!(
            strip_dangerous("<a href=\"data:text/html;base64,PHNj\">"),
            "<a href=\"base64,PHNj\">"
        );
        assert_eq!(strip_dangerous("DATA:IMAGE/WEBP;x"), "DATA:IMAGE/WEBP;x");
    }

    #[test]
    fn test_strip_data_uri_without_terminator_is_left_alone() {
        assert_eq!(strip_dangerous("data:text/plain"), "data:text/plain");
    }

    #[test]
    fn test_strip_trims_and_passes_plain_text() {
        assert_eq!(strip_dangerous("  today was fine  "), "today was fine");
        assert_eq!(strip_dangerous(""), "");
    }

    #[test]
    fn test_escaped_stripped_output_has_no_raw_markup() {
        let inputs = [
            "<script>x</script><b onclick='y'>hi</b>",
            "<<>>\"'/&",
            "javascript:alert('x')",
        ];
        for input in inputs {
            let out = escape_html(&strip_dangerous(input));
            assert!(!out.contains('<'), "{out}");
            assert!(!out.contains('>'), "{out}");
            assert!(!out.contains('"'), "{out}");
            assert!(!out.contains('\''), "{out}");
        }
    }
}
