use std::borrow::Cow;

/// Decode named and numeric HTML entities. Text without entities is returned
/// as is, without allocating.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    html_escape::decode_html_entities(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&quot;Hello&quot;"), "\"Hello\"");
        assert_eq!(decode_entities("Pok&eacute;mon"), "Pokémon");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_entities("Don&#039;t"), "Don't");
        assert_eq!(decode_entities("Don&#x27;t"), "Don't");
        assert_eq!(decode_entities("&#960; &lt; 4"), "π < 4");
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let plain = "Which planet is closest to the Sun?";
        assert!(matches!(decode_entities(plain), Cow::Borrowed(_)));

        let decoded = decode_entities("R&amp;D isn&#039;t &quot;easy&quot;").into_owned();
        assert_eq!(decode_entities(&decoded), decoded);
    }
}
