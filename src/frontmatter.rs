// Frontmatter module: the one piece of real parsing logic in the crate.
// A post file opens with a `---` marker line, zero or more `key: value`
// lines, and a closing `---` line; everything after is the post body.

use std::collections::BTreeMap;

/// Marker line that frames the metadata header.
pub const MARKER: &str = "---";

/// Split raw file content into a metadata map and a body.
///
/// The header must start at the very beginning of the content. Header
/// lines split on the first colon; keys and values are trimmed, and a
/// line without a colon is dropped. A repeated key keeps its last value.
///
/// Content that does not open with a complete marker pair is not an
/// error: the metadata map is empty and the whole content, trimmed, is
/// the body.
pub fn parse(content: &str) -> (BTreeMap<String, String>, String) {
    let no_frontmatter = || (BTreeMap::new(), content.trim().to_string());

    let Some(rest) = content.strip_prefix("---\n") else {
        return no_frontmatter();
    };
    // An unterminated header means the leading marker was just body text.
    let Some((header, body)) = rest.split_once("\n---\n") else {
        return no_frontmatter();
    };

    let mut metadata = BTreeMap::new();
    for line in header.lines() {
        if let Some((key, value)) = line.split_once(':') {
            metadata.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    (metadata, body.trim().to_string())
}

/// Render a metadata map and body back into file content. Inverse of
/// [`parse`] up to whitespace normalization.
pub fn render(metadata: &BTreeMap<String, String>, body: &str) -> String {
    let mut out = String::new();
    if !metadata.is_empty() {
        out.push_str(MARKER);
        out.push('\n');
        for (key, value) in metadata {
            out.push_str(key);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out.push_str(MARKER);
        out.push_str("\n\n");
    }
    out.push_str(body);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_metadata_and_body() {
        let content = "---\nimage: cover.png\ntitle: Systems\n---\n\nHello world.\n";
        let (metadata, body) = parse(content);
        assert_eq!(metadata, map(&[("image", "cover.png"), ("title", "Systems")]));
        assert_eq!(body, "Hello world.");
    }

    #[test]
    fn missing_opening_marker_yields_empty_metadata() {
        let (metadata, body) = parse("just a plain post\nwith two lines\n");
        assert!(metadata.is_empty());
        assert_eq!(body, "just a plain post\nwith two lines");
    }

    #[test]
    fn unterminated_header_is_treated_as_body() {
        let content = "---\nimage: x.png\nno closing marker here";
        let (metadata, body) = parse(content);
        assert!(metadata.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn line_without_colon_is_dropped() {
        let (metadata, _) = parse("---\nimage: x.png\nnot-a-field\n---\nBody");
        assert_eq!(metadata, map(&[("image", "x.png")]));
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let (metadata, _) = parse("---\nimage: a.png\nimage: b.png\n---\nBody");
        assert_eq!(metadata, map(&[("image", "b.png")]));
    }

    #[test]
    fn keys_and_values_are_trimmed() {
        let (metadata, _) = parse("---\n  image :   x.png  \n---\nBody");
        assert_eq!(metadata, map(&[("image", "x.png")]));
    }

    #[test]
    fn value_splits_on_first_colon_only() {
        let (metadata, _) = parse("---\ntime: 10:30\n---\nBody");
        assert_eq!(metadata, map(&[("time", "10:30")]));
    }

    #[test]
    fn empty_header_parses_to_empty_map() {
        let (metadata, body) = parse("---\n\n---\nBody text");
        assert!(metadata.is_empty());
        assert_eq!(body, "Body text");
    }

    #[test]
    fn body_is_trimmed() {
        let (_, body) = parse("---\nimage: x.png\n---\n\n\n  Hello  \n\n");
        assert_eq!(body, "Hello");
    }

    #[test]
    fn round_trip_preserves_record() {
        let metadata = map(&[("image", "x.png")]);
        let rendered = render(&metadata, "Hello");
        let (parsed_meta, parsed_body) = parse(&rendered);
        assert_eq!(parsed_meta, metadata);
        assert_eq!(parsed_body, "Hello");
    }

    #[test]
    fn render_without_metadata_is_body_only() {
        assert_eq!(render(&BTreeMap::new(), "Hello"), "Hello\n");
    }
}
