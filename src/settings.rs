// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

use crate::error::{Error, Result};

/// Separator of the settings in a settings string.
pub const DELIMITER: char = ':';
/// Separator of key and value in a single setting.
pub const ASSIGN: char = '=';
/// Escape character for separators.
pub const ESCAPE: char = '\\';

/// Value of a single setting.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean setting without argument, e.g., `no-deblock`.
    Flag,
    /// Setting with an argument, e.g., `crf=20`, possibly empty.
    Text(String),
}

impl Value {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }
    pub fn is_flag(&self) -> bool {
        matches!(self, Self::Flag)
    }
}

/// One configuration: settings in the order they were given.
pub type ConfigMap = crate::ordered_map::OrderedMap<Value>;

/// Split `string` at every `sep` that is not part of an escape sequence.
/// Escape sequences are left in the returned pieces.
pub(crate) fn split_unescaped(string: &str, sep: char) -> Vec<&str> {
    let mut pieces = vec![];
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in string.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == sep {
            pieces.push(&string[start..i]);
            start = i + c.len_utf8();
        }
    }
    pieces.push(&string[start..]);
    pieces
}

/// Split `string` at the first `sep` that is not part of an escape sequence.
pub(crate) fn split_once_unescaped(string: &str, sep: char) -> Option<(&str, &str)> {
    match split_unescaped(string, sep).first().copied() {
        Some(head) if head.len() < string.len() => {
            Some((head, &string[head.len() + sep.len_utf8()..]))
        }
        _ => None,
    }
}

/// Replace the escape sequences of the escape character itself and of
/// `seps` with the escaped character. Other escape sequences are kept.
pub(crate) fn unescape(string: &str, seps: &[char]) -> String {
    let mut ret = String::with_capacity(string.len());
    let mut chars = string.chars();
    while let Some(c) = chars.next() {
        if c != ESCAPE {
            ret.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == ESCAPE || seps.contains(&next) => ret.push(next),
            Some(next) => {
                ret.push(ESCAPE);
                ret.push(next);
            }
            None => ret.push(ESCAPE),
        }
    }
    ret
}

/// Escape the escape character and every `sep` in `string`.
pub(crate) fn escape(string: &str, seps: &[char]) -> String {
    let mut ret = String::with_capacity(string.len());
    for c in string.chars() {
        if c == ESCAPE || seps.contains(&c) {
            ret.push(ESCAPE);
        }
        ret.push(c);
    }
    ret
}

/// Return true if `string` ends in the middle of an escape sequence.
fn has_unterminated_escape(string: &str) -> bool {
    string.chars().rev().take_while(|c| *c == ESCAPE).count() % 2 == 1
}

/// Parse a settings string into keys and raw, still escaped, values.
pub(crate) fn parse_raw(string: &str) -> Result<Vec<(String, Option<&str>)>> {
    if has_unterminated_escape(string) {
        return Err(Error::malformed(string, "unterminated escape"));
    }
    let mut ret = vec![];
    for token in split_unescaped(string, DELIMITER) {
        match split_once_unescaped(token, ASSIGN) {
            Some((key, value)) => {
                let key = unescape(key.trim(), &[DELIMITER, ASSIGN]);
                if key.is_empty() {
                    return Err(Error::malformed(string, "empty key"));
                }
                ret.push((key, Some(value.trim())));
            }
            None => {
                let key = unescape(token.trim(), &[DELIMITER, ASSIGN]);
                if !key.is_empty() {
                    ret.push((key, None));
                }
            }
        }
    }
    Ok(ret)
}

/// Parse settings strings like `crf=20:me=umh:no-deblock`.
///
/// Flags, i.e., settings without `=`, are mapped to [`Value::Flag`].
pub fn parse(strings: &[&str]) -> Result<ConfigMap> {
    parse_with_default(strings, Value::Flag)
}

/// Parse settings strings, mapping settings without `=` to `default_value`.
///
/// Settings are separated by `:`, key and value by the first `=`. Both can
/// be escaped with `\`, which in turn is escaped as `\\`. Keys and values
/// are trimmed. A key repeated later overwrites the value but keeps the
/// position where it first appeared.
/// Empty settings (e.g., from a trailing `:`) are ignored.
pub fn parse_with_default(strings: &[&str], default_value: Value) -> Result<ConfigMap> {
    let mut settings = ConfigMap::new();
    for string in strings {
        for (key, value) in parse_raw(string)? {
            let value = match value {
                Some(value) => Value::Text(unescape(value, &[DELIMITER, ASSIGN])),
                None => default_value.clone(),
            };
            settings.insert_or_update(&key, value);
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::config_map;

    #[test]
    fn test_parse_settings() -> anyhow::Result<()> {
        let settings = parse(&["crf=20 : me = umh:no-deblock"])?;
        assert_eq!(
            config_map(&[("crf", Some("20")), ("me", Some("umh")), ("no-deblock", None)]),
            settings
        );
        Ok(())
    }

    #[test]
    fn test_parse_settings_multiple_strings() -> anyhow::Result<()> {
        let settings = parse(&["crf=20", "bframes=5:no-cabac"])?;
        assert_eq!(vec!["crf", "bframes", "no-cabac"], settings.keys().collect::<Vec<_>>());
        Ok(())
    }

    #[test]
    fn test_parse_settings_escaped() -> anyhow::Result<()> {
        let settings = parse(&[r"deblock=-1\:-1:zones=0,100,b\=0.5:x=a=b"])?;
        assert_eq!(
            config_map(&[
                ("deblock", Some("-1:-1")),
                ("zones", Some("0,100,b=0.5")),
                ("x", Some("a=b"))
            ]),
            settings
        );
        Ok(())
    }

    #[test]
    fn test_parse_settings_repeated_key_keeps_first_position() -> anyhow::Result<()> {
        let settings = parse(&["a=1:b=2:a=3"])?;
        assert_eq!(config_map(&[("a", Some("3")), ("b", Some("2"))]), settings);
        Ok(())
    }

    #[test]
    fn test_parse_settings_empty() -> anyhow::Result<()> {
        assert!(parse(&[""])?.is_empty());
        assert!(parse(&[])?.is_empty());
        assert_eq!(config_map(&[("a", Some("1"))]), parse(&[":a=1: :"])?);
        assert_eq!(config_map(&[("a", Some(""))]), parse(&["a="])?);
        Ok(())
    }

    #[test]
    fn test_parse_settings_default_value() -> anyhow::Result<()> {
        let settings = parse_with_default(&["a:b=2"], Value::text("yes"))?;
        assert_eq!(config_map(&[("a", Some("yes")), ("b", Some("2"))]), settings);
        Ok(())
    }

    #[test]
    fn test_parse_settings_malformed() {
        assert!(matches!(
            parse(&["a=1: =2"]),
            Err(Error::MalformedSettings { .. })
        ));
        assert!(matches!(
            parse(&[r"a=1\"]),
            Err(Error::MalformedSettings { .. })
        ));
    }

    #[test]
    fn test_parse_settings_escaped_backslash() -> anyhow::Result<()> {
        let settings = parse(&[r"a=x\\:b=1:c=\d\\\:e:f=g\/h"])?;
        assert_eq!(
            config_map(&[
                ("a", Some(r"x\")),
                ("b", Some("1")),
                ("c", Some(r"\d\:e")),
                ("f", Some(r"g\/h"))
            ]),
            settings
        );
        assert_eq!(config_map(&[("a", Some(r"x\"))]), parse(&[r"a=x\\"])?);
        Ok(())
    }

    #[test]
    fn test_split_unescaped() {
        assert_eq!(vec!["a", r"b\:c", ""], split_unescaped(r"a:b\:c:", ':'));
        assert_eq!(vec![""], split_unescaped("", ':'));
        assert_eq!(Some(("k", r"v\=w=x")), split_once_unescaped(r"k=v\=w=x", '='));
        assert_eq!(None, split_once_unescaped(r"k\=v", '='));
        assert_eq!(vec![r"a\\", "b"], split_unescaped(r"a\\:b", ':'));
        assert_eq!(Some(("", "")), split_once_unescaped("=", '='));
    }

    #[test]
    fn test_escape_unescape() {
        assert_eq!(r"a\:b\\c\=d/e", escape(r"a:b\c=d/e", &[':', '=']));
        assert_eq!(r"a:b\c=d/e", unescape(r"a\:b\\c\=d/e", &[':', '=']));
        assert_eq!(r"a\/b\x\", unescape(r"a\/b\x\", &[':']));
        assert!(has_unterminated_escape(r"a\"));
        assert!(!has_unterminated_escape(r"a\\"));
        assert!(has_unterminated_escape(r"a\\\"));
    }
}
