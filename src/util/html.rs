//! Small HTML helpers shared by the transformer and the renderer

/// Escape text for inclusion in HTML body or attribute context.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Left-align `weight` in a 4-column field, spaces as padding.
pub fn pad_weight(weight: u64) -> String {
    format!("{:<4}", weight)
}

/// Same field, but padding spaces rendered as `&nbsp;` for HTML output.
pub fn pad_weight_html(weight: u64) -> String {
    pad_weight(weight).replace(' ', "&nbsp;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_markup_chars_when_escaping_then_entities_substituted() {
        assert_eq!(escape("a < b & c > \"d\""), "a &lt; b &amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn given_short_weight_when_padding_then_field_is_four_columns() {
        assert_eq!(pad_weight(7), "7   ");
        assert_eq!(pad_weight_html(7), "7&nbsp;&nbsp;&nbsp;");
    }

    #[test]
    fn given_wide_weight_when_padding_then_no_truncation() {
        assert_eq!(pad_weight(12345), "12345");
    }
}
