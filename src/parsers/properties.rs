//! Java `.properties` reader

use crate::error::MetadataError;
use crate::fs::FileSystem;
use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;
use std::str::Chars;
use thiserror::Error;

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Key/value pairs of a properties file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: IndexMap<String, String>,
}

impl Properties {
    /// Read a properties file, returning `None` when it does not exist.
    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Option<Self>> {
        if !fs.is_file(path) {
            return Ok(None);
        }

        let content = decode(&fs.read(path)?);
        let properties = Self::parse(&content).map_err(|e| MetadataError::Properties {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;

        Ok(Some(properties))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, SyntaxError> {
        let mut entries = IndexMap::new();
        let mut lines = content.lines().enumerate();

        while let Some((index, raw)) = lines.next() {
            let line = raw.trim_start_matches(WHITESPACE);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let mut logical = line.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(WHITESPACE)),
                    None => break,
                }
            }

            let (key, value) = split_key_value(&logical);
            let to_error = |message: String| SyntaxError {
                line: index + 1,
                message,
            };
            let key = unescape(key).map_err(to_error)?;
            let value = unescape(value).map_err(to_error)?;
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Comma-separated value of `key`, trimmed, with empty items dropped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start_matches(WHITESPACE);
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
    (&line[..key_end], rest.trim_start_matches(WHITESPACE))
}

fn unescape(s: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => out.push(unicode_escape(&mut chars)?),
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Properties files are ISO-8859-1 unless they happen to be valid UTF-8.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Decode the `XXXX` of a `\uXXXX` escape, joining a UTF-16 surrogate pair
/// spelled as two consecutive escapes.
fn unicode_escape(chars: &mut Chars<'_>) -> std::result::Result<char, String> {
    let high = utf16_unit(chars)?;
    if !(0xD800..=0xDBFF).contains(&high) {
        return char::from_u32(u32::from(high))
            .ok_or_else(|| format!("malformed \\uxxxx encoding: lone surrogate \\u{:04X}", high));
    }

    let mut ahead = chars.clone();
    if ahead.next() != Some('\\') || ahead.next() != Some('u') {
        return Err(format!(
            "malformed \\uxxxx encoding: unpaired surrogate \\u{:04X}",
            high
        ));
    }
    let low = utf16_unit(&mut ahead)?;
    *chars = ahead;

    char::decode_utf16([high, low])
        .next()
        .and_then(|c| c.ok())
        .ok_or_else(|| {
            format!(
                "malformed \\uxxxx encoding: invalid surrogate pair \\u{:04X}\\u{:04X}",
                high, low
            )
        })
}

fn utf16_unit(chars: &mut Chars<'_>) -> std::result::Result<u16, String> {
    let hex: String = chars.by_ref().take(4).collect();
    u16::from_str_radix(&hex, 16)
        .ok()
        .filter(|_| hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| format!("malformed \\uxxxx encoding: \\u{}", hex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn test_parse_simple() {
        let props = Properties::parse("configuration-properties.classes=alpha").unwrap();
        assert_eq!(props.get("configuration-properties.classes"), Some("alpha"));
    }

    #[test]
    fn test_parse_separators() {
        let props = Properties::parse("a=1\nb: 2\nc 3\nd = 4\ne\n").unwrap();

        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.get("d"), Some("4"));
        assert_eq!(props.get("e"), Some(""));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let props = Properties::parse("# comment\n! also comment\n\n   \nkey=value\n").unwrap();

        assert_eq!(props.len(), 1);
        assert_eq!(props.get("key"), Some("value"));
    }

    #[test]
    fn test_parse_line_continuation() {
        let props = Properties::parse(
            "configuration-properties.classes=com.example.Alpha,\\\n    com.example.Bravo\n",
        )
        .unwrap();

        assert_eq!(
            props.get("configuration-properties.classes"),
            Some("com.example.Alpha,com.example.Bravo")
        );
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let props = Properties::parse("path=C:\\\\\nnext=1\n").unwrap();

        assert_eq!(props.get("path"), Some("C:\\"));
        assert_eq!(props.get("next"), Some("1"));
    }

    #[test]
    fn test_parse_escapes() {
        let props = Properties::parse("key\\=with\\:sep=tab\\there \\u0041\n").unwrap();
        assert_eq!(props.get("key=with:sep"), Some("tab\there A"));
    }

    #[test]
    fn test_malformed_unicode_escape_is_an_error() {
        let err = Properties::parse("ok=1\nbad=\\u00zz\n").unwrap_err();

        assert_eq!(err.line, 2);
        assert!(err.message.contains("malformed"));
    }

    #[test]
    fn test_parse_surrogate_pair() {
        let props = Properties::parse("emoji=\\uD83D\\uDE00\nsnowman=\\u2603\n").unwrap();

        assert_eq!(props.get("emoji"), Some("\u{1F600}"));
        assert_eq!(props.get("snowman"), Some("\u{2603}"));
    }

    #[test]
    fn test_unpaired_surrogate_is_an_error() {
        let err = Properties::parse("a=1\nbad=\\uD83Dx\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("unpaired surrogate"));

        let err = Properties::parse("bad=\\uDE00\n").unwrap_err();
        assert!(err.message.contains("lone surrogate"));

        let err = Properties::parse("bad=\\uD83D\\u0041\n").unwrap_err();
        assert!(err.message.contains("invalid surrogate pair"));
    }

    #[test]
    fn test_read_latin1_file() {
        let fs = MockFileSystem::new();
        fs.add_binary(
            "dataflow.properties",
            b"# caf\xe9\nconfiguration-properties.classes=alpha\ntitle=na\xefve\n",
        );

        let props = Properties::read(&fs, Path::new("dataflow.properties"))
            .unwrap()
            .unwrap();
        assert_eq!(props.get_list("configuration-properties.classes"), vec!["alpha"]);
        assert_eq!(props.get("title"), Some("na\u{ef}ve"));
    }

    #[test]
    fn test_read_utf8_file() {
        let fs = MockFileSystem::new();
        fs.add_file("dataflow.properties", "title=caf\u{e9}\n");

        let props = Properties::read(&fs, Path::new("dataflow.properties"))
            .unwrap()
            .unwrap();
        assert_eq!(props.get("title"), Some("caf\u{e9}"));
    }

    #[test]
    fn test_get_list() {
        let props = Properties::parse("classes= alpha , bravo,,charlie ").unwrap();

        assert_eq!(props.get_list("classes"), vec!["alpha", "bravo", "charlie"]);
        assert!(props.get_list("missing").is_empty());
    }

    #[test]
    fn test_read_missing_is_none() {
        let fs = MockFileSystem::new();
        let props = Properties::read(&fs, Path::new("missing.properties")).unwrap();

        assert!(props.is_none());
    }

    #[test]
    fn test_read_malformed_is_metadata_error() {
        let fs = MockFileSystem::new();
        fs.add_file("bad.properties", "key=\\u12");

        let err = Properties::read(&fs, Path::new("bad.properties")).unwrap_err();
        let metadata_err = err.downcast_ref::<MetadataError>().unwrap();

        assert!(matches!(metadata_err, MetadataError::Properties { line: 1, .. }));
    }
}
