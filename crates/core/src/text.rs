//! Normalization of question text delivered with HTML character references.
//!
//! Trivia feeds send prompts like `Which of these is &quot;Kiwi&quot;?` and
//! sometimes encode them twice (`&amp;quot;`). Everything the quiz shows or
//! compares goes through [`decode_entities`] first.

/// Decode HTML character references (`&amp;`, `&#039;`, `&#x27;`, ...).
///
/// Unknown or malformed references are kept verbatim. Decoding runs until the
/// text stops changing, so the result is a fixed point and decoding it again
/// is a no-op. Each pass that changes the text makes it strictly shorter,
/// which bounds the loop.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    let mut current = raw.to_owned();
    loop {
        let next = html_escape::decode_html_entities(&current).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("It&#039;s"), "It's");
        assert_eq!(decode_entities("&quot;Kiwi&quot;"), "\"Kiwi\"");
        assert_eq!(decode_entities("caf&eacute;"), "café");
        assert_eq!(decode_entities("&#x27;hex&#x27;"), "'hex'");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(decode_entities("What is 2 + 2?"), "What is 2 + 2?");
        assert_eq!(decode_entities(""), "");
    }

    #[test]
    fn malformed_references_are_kept_verbatim() {
        assert_eq!(decode_entities("AT&T rocks"), "AT&T rocks");
        assert_eq!(decode_entities("&zzzz;"), "&zzzz;");
        assert_eq!(decode_entities("dangling &"), "dangling &");
    }

    #[test]
    fn double_encoded_text_is_fully_decoded() {
        assert_eq!(decode_entities("&amp;quot;hi&amp;quot;"), "\"hi\"");
    }

    #[test]
    fn decoding_is_idempotent() {
        let samples = [
            "Tom &amp; Jerry",
            "&amp;amp;amp;",
            "&lt;b&gt;bold&lt;/b&gt;",
            "AT&T &#39; &#x; &#;",
            "100% &amp;&amp; more",
            "Pok&eacute;mon",
            "",
        ];
        for s in samples {
            let once = decode_entities(s);
            assert_eq!(decode_entities(&once), once, "input: {s:?}");
        }
    }
}
