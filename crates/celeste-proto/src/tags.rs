//! Leading tag segment of a chat line.
//!
//! The gateway prefixes each line with `key=value` pairs joined by `;`
//! (IRCv3 message tags, e.g. `@badge-info=;color=#FF4500;display-name=Foo`).
//! Values use the IRCv3 escaping rules, which are undone here.

use std::collections::HashMap;

use crate::error::MessageParseError;

/// Tag key/value pairs of a single line. Order is not preserved.
pub type TagMap = HashMap<String, String>;

/// Parse a tag segment into a [`TagMap`].
///
/// A leading `@` is ignored. Empty pieces (`a=1;;b=2`) are skipped, a value
/// may be empty (`b=`), and a later duplicate key replaces an earlier one.
/// A piece without `=` is rejected.
///
/// ```
/// use celeste_proto::parse_tags;
///
/// let tags = parse_tags("a=1;b=;c=3").unwrap();
/// assert_eq!(tags["a"], "1");
/// assert_eq!(tags["b"], "");
/// assert!(parse_tags("a=1;oops").is_err());
/// ```
pub fn parse_tags(segment: &str) -> Result<TagMap, MessageParseError> {
    let segment = segment.strip_prefix('@').unwrap_or(segment);
    let mut tags = TagMap::new();
    for pair in segment.split(';').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| MessageParseError::MalformedTag(pair.to_string()))?;
        tags.insert(key.to_string(), unescape_tag_value(value));
    }
    Ok(tags)
}

/// Unescape a tag value from wire format.
///
/// `\:` → `;`, `\s` → space, `\\` → `\`, `\r` and `\n` → CR/LF. An unknown
/// escape keeps the escaped character; a trailing lone backslash is dropped.
pub fn unescape_tag_value(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }
    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        let r = if c == '\\' {
            match iter.next() {
                Some(':') => ';',
                Some('s') => ' ',
                Some('\\') => '\\',
                Some('r') => '\r',
                Some('n') => '\n',
                Some(c) => c,
                None => break,
            }
        } else {
            c
        };
        unescaped.push(r);
    }
    unescaped
}
