//! JSON syntax highlighting.
//!
//! Produces the same markup shape as highlight.js for the `json` language,
//! so the stock highlight.js themes style the report. Input is expected to
//! be serializer output; anything unexpected is copied through escaped.

pub const CLASS_ATTR: &str = "hljs-attr";
pub const CLASS_STRING: &str = "hljs-string";
pub const CLASS_NUMBER: &str = "hljs-number";
pub const CLASS_LITERAL: &str = "hljs-literal";
pub const CLASS_PUNCTUATION: &str = "hljs-punctuation";

/// Escape text for HTML element content and attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Highlight JSON text. Object keys become `hljs-attr` spans.
pub fn highlight_json(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len() * 2);
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = string_end(bytes, i);
                let class = if next_significant(bytes, end) == Some(b':') {
                    CLASS_ATTR
                } else {
                    CLASS_STRING
                };
                push_span(&mut out, class, &source[i..end]);
                i = end;
            }
            b'{' | b'}' | b'[' | b']' | b',' | b':' => {
                push_span(&mut out, CLASS_PUNCTUATION, &source[i..i + 1]);
                i += 1;
            }
            b'-' | b'0'..=b'9' => {
                let end = scan(bytes, i, |b| {
                    b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E')
                });
                push_span(&mut out, CLASS_NUMBER, &source[i..end]);
                i = end;
            }
            b if b.is_ascii_alphabetic() => {
                let end = scan(bytes, i, |b| b.is_ascii_alphabetic());
                push_span(&mut out, CLASS_LITERAL, &source[i..end]);
                i = end;
            }
            _ => {
                // Whitespace or stray input; keep char boundaries intact.
                let c = source[i..].chars().next().unwrap_or(' ');
                out.push_str(&html_escape(c.encode_utf8(&mut [0; 4])));
                i += c.len_utf8().max(1);
            }
        }
    }
    out
}

/// Index just past the closing quote of the string starting at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'"' => return j + 1,
            _ => j += 1,
        }
    }
    bytes.len()
}

fn scan(bytes: &[u8], start: usize, keep: impl Fn(u8) -> bool) -> usize {
    bytes[start..]
        .iter()
        .position(|b| !keep(*b))
        .map_or(bytes.len(), |offset| start + offset)
}

fn next_significant(bytes: &[u8], from: usize) -> Option<u8> {
    bytes
        .get(from..)?
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
}

fn push_span(out: &mut String, class: &str, text: &str) {
    out.push_str("<span class=\"");
    out.push_str(class);
    out.push_str("\">");
    out.push_str(&html_escape(text));
    out.push_str("</span>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_values_get_distinct_classes() {
        let html = highlight_json("{\"id\": \"id\"}");
        assert_eq!(
            html,
            "<span class=\"hljs-punctuation\">{</span>\
             <span class=\"hljs-attr\">&quot;id&quot;</span>\
             <span class=\"hljs-punctuation\">:</span> \
             <span class=\"hljs-string\">&quot;id&quot;</span>\
             <span class=\"hljs-punctuation\">}</span>"
        );
    }

    #[test]
    fn numbers_and_literals() {
        let html = highlight_json("[-1.5e3, true, null]");
        assert!(html.contains("<span class=\"hljs-number\">-1.5e3</span>"));
        assert!(html.contains("<span class=\"hljs-literal\">true</span>"));
        assert!(html.contains("<span class=\"hljs-literal\">null</span>"));
    }

    #[test]
    fn escaped_quotes_stay_inside_the_string() {
        let html = highlight_json(r#"{"a": "say \"hi\": <b>"}"#);
        assert!(html.contains(
            "<span class=\"hljs-string\">&quot;say \\&quot;hi\\&quot;: &lt;b&gt;&quot;</span>"
        ));
        assert_eq!(html.matches(CLASS_ATTR).count(), 1);
    }

    #[test]
    fn multibyte_keys_and_indentation_survive() {
        let html = highlight_json("{\n    \"⚠️age\": 3\n}");
        assert!(html.contains("\n    <span class=\"hljs-attr\">&quot;⚠️age&quot;</span>"));
    }

    #[test]
    fn escape_covers_attribute_breakers() {
        assert_eq!(html_escape(r#"<a href='x'>&"#), "&lt;a href=&#x27;x&#x27;&gt;&amp;");
    }
}
