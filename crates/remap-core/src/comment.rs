//! `sourceMappingURL` comments embedded in generated text.
//!
//! Two forms are recognised, each as a `//` line comment or a `/* */` block
//! comment, spelled with `#` or the legacy `@`:
//!
//! - inline: `//# sourceMappingURL=data:application/json;base64,<payload>`
//! - external: `//# sourceMappingURL=<path>`

use base64::Engine;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::CommentError;
use crate::raw_map::RawSourceMap;

lazy_static! {
    static ref INLINE_MAP_COMMENT: Regex = Regex::new(
        r"(?m)^\s*/(?:/|\*)[@#]\s+sourceMappingURL=data:(?:application|text)/json;(?:charset[:=]\S+?;)?base64,(.*)$"
    )
    .expect("inline source map comment pattern");
    static ref EXTERNAL_MAP_COMMENT: Regex = Regex::new(
        r#"(?m)(?://[@#][ \t]+sourceMappingURL=([^\s'"`]+?)[ \t]*$)|(?:/\*[@#][ \t]+sourceMappingURL=([^*]+?)[ \t]*\*/[ \t]*$)"#
    )
    .expect("external source map comment pattern");
}

/// Strip every source map comment from `contents`.
///
/// A blank line left behind at the very end is folded into a single
/// trailing newline.
pub fn remove_source_map_comments(contents: &str) -> String {
    let without_inline = INLINE_MAP_COMMENT.replace_all(contents, "");
    let mut stripped = EXTERNAL_MAP_COMMENT
        .replace_all(&without_inline, "")
        .into_owned();
    if stripped.ends_with("\n\n") {
        stripped.pop();
    }
    stripped
}

/// The last line of `contents` that is not empty.
///
/// Only this line is searched for a source map comment, since bundled
/// files may carry the comments of their inputs further up.
pub fn last_non_empty_line(contents: &str) -> &str {
    let trimmed = contents.trim_end_matches(['\n', '\r']);
    match trimmed.rfind('\n') {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// Decode an inline source map from `line`, if it carries one.
pub fn find_inline_map(line: &str) -> Option<Result<RawSourceMap, CommentError>> {
    let captures = INLINE_MAP_COMMENT.captures(line)?;
    let payload = captures.get(1)?.as_str().trim_end();
    let payload = payload.strip_suffix("*/").unwrap_or(payload).trim_end();
    Some(decode_inline_payload(payload))
}

fn decode_inline_payload(payload: &str) -> Result<RawSourceMap, CommentError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    let json = String::from_utf8(bytes)?;
    Ok(RawSourceMap::from_json(&json)?)
}

/// The path named by an external source map comment on `line`.
pub fn find_external_map_url(line: &str) -> Option<&str> {
    let captures = EXTERNAL_MAP_COMMENT.captures(line)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|url| url.as_str().trim())
}

/// Render `map` as an inline comment line.
pub fn inline_map_comment(map: &RawSourceMap) -> Result<String, serde_json::Error> {
    let json = map.to_json_compact()?;
    let payload = base64::engine::general_purpose::STANDARD.encode(json);
    Ok(format!(
        "//# sourceMappingURL=data:application/json;charset=utf-8;base64,{payload}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> RawSourceMap {
        RawSourceMap {
            version: 3,
            file: Some("a.js".to_string()),
            source_root: None,
            sources: vec!["a.ts".to_string()],
            names: vec![],
            mappings: "AAAA".to_string(),
            sources_content: None,
        }
    }

    #[test]
    fn test_last_non_empty_line() {
        assert_eq!(last_non_empty_line("a\nb\n\n\r\n"), "b");
        assert_eq!(last_non_empty_line("single"), "single");
        assert_eq!(last_non_empty_line(""), "");
    }

    #[test]
    fn test_inline_map_roundtrip() {
        let comment = inline_map_comment(&sample_map()).unwrap();
        let map = find_inline_map(&comment).unwrap().unwrap();
        assert_eq!(map, sample_map());
    }

    #[test]
    fn test_inline_map_legacy_and_block_forms() {
        let comment = inline_map_comment(&sample_map()).unwrap();
        let payload = comment.rsplit(',').next().unwrap();

        let legacy = format!("//@ sourceMappingURL=data:application/json;base64,{payload}");
        assert!(find_inline_map(&legacy).unwrap().is_ok());

        let block = format!("/*# sourceMappingURL=data:text/json;base64,{payload} */");
        assert_eq!(find_inline_map(&block).unwrap().unwrap(), sample_map());
    }

    #[test]
    fn test_inline_map_bad_payload() {
        let line = "//# sourceMappingURL=data:application/json;base64,!!!";
        assert!(matches!(
            find_inline_map(line),
            Some(Err(CommentError::Base64(_)))
        ));
    }

    #[test]
    fn test_external_map_url() {
        assert_eq!(
            find_external_map_url("//# sourceMappingURL=index.js.map"),
            Some("index.js.map")
        );
        assert_eq!(
            find_external_map_url("/*# sourceMappingURL=../maps/a.css.map */"),
            Some("../maps/a.css.map")
        );
        assert_eq!(find_external_map_url("const x = 1;"), None);
    }

    #[test]
    fn test_remove_comments() {
        let text = "const a = 1;\n//# sourceMappingURL=a.js.map\n";
        assert_eq!(remove_source_map_comments(text), "const a = 1;\n");

        let inline = inline_map_comment(&sample_map()).unwrap();
        let text = format!("let b;\n{inline}\n");
        assert_eq!(remove_source_map_comments(&text), "let b;\n");

        assert_eq!(remove_source_map_comments("no comments\n"), "no comments\n");
    }
}
