use langsync_core::{LangSyncError, PhraseFile, Result};
use std::path::Path;

/// Characters that may not appear in a phrase key.
const RESERVED_KEY_CHARS: &[char] = &['?', '{', '}', '|', '&', '~', '!', '(', ')', '^', '"'];

fn malformed(path: &Path, line: Option<usize>, reason: impl Into<String>) -> LangSyncError {
    LangSyncError::Parse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

/// Read and parse a phrase file from disk.
///
/// A file that cannot be read or decoded is a parse failure, never an empty
/// table: an empty table would make every key of the sibling file look
/// missing or obsolete.
pub fn parse_phrase_file(path: &Path) -> Result<PhraseFile> {
    let bytes = std::fs::read(path).map_err(|e| malformed(path, None, e.to_string()))?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|e| malformed(path, None, format!("invalid UTF-8: {e}")))?;
    parse_phrases(text, path)
}

/// Scan INI text as a flat key/value table with raw (unescaped) values.
///
/// Section headers are accepted and flattened away. Quoted values keep the
/// text between the first and the last double quote verbatim. Repeated keys
/// keep the last value.
pub fn parse_phrases(text: &str, path: &Path) -> Result<PhraseFile> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut file = PhraseFile::new(path);

    for (idx, raw) in text.lines().enumerate() {
        let line_no = Some(idx + 1);
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(malformed(path, line_no, "unterminated section header").into());
            }
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(malformed(path, line_no, "expected KEY=VALUE").into());
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(malformed(path, line_no, "empty key").into());
        }
        if let Some(c) = key.chars().find(|c| RESERVED_KEY_CHARS.contains(c)) {
            return Err(
                malformed(path, line_no, format!("reserved character '{c}' in key {key}")).into(),
            );
        }

        let value = unquote(value.trim()).map_err(|reason| malformed(path, line_no, reason))?;

        if file.insert(key, value).is_some() {
            tracing::debug!(event = "duplicate_key", path = %path.display(), key = key, line = idx + 1);
        }
    }

    Ok(file)
}

/// The closing quote is the first unescaped `"` followed only by whitespace
/// or a `;` comment. Quotes inside the value (`\"`, `"_QQ_"`) are kept raw.
fn unquote(value: &str) -> std::result::Result<&str, &'static str> {
    let Some(rest) = value.strip_prefix('"') else {
        return Ok(value);
    };

    let mut saw_quote = false;
    for (idx, ch) in rest.char_indices() {
        if ch != '"' || rest[..idx].ends_with('\\') {
            continue;
        }
        saw_quote = true;
        let tail = rest[idx + 1..].trim_start();
        if tail.is_empty() || tail.starts_with(';') {
            return Ok(&rest[..idx]);
        }
    }

    if saw_quote {
        Err("unexpected text after quoted value")
    } else {
        Err("unterminated quoted value")
    }
}
