//! Line tokenizing and key lookup over the text records under `/proc` and `/etc`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ReadError;

/// A character rewrite applied to a line before it is split on whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    Replace(char, char),
    StripQuotes,
}

/// Splits `line` into whitespace-delimited tokens after applying `rules` in order.
pub fn tokenize(line: &str, rules: &[Normalize]) -> Vec<String> {
    let mut normalized = line.to_string();
    for rule in rules {
        normalized = match *rule {
            Normalize::Replace(from, to) => normalized.replace(from, &to.to_string()),
            Normalize::StripQuotes => normalized.replace('"', " "),
        };
    }
    normalized.split_whitespace().map(str::to_string).collect()
}

/// Opens `path` and yields its lines. Invalid UTF-8 is replaced rather than
/// failing the scan; a read error mid-file is yielded as `SourceUnavailable`.
pub fn read_lines(
    path: &Path,
) -> Result<impl Iterator<Item = Result<String, ReadError>> + use<>, ReadError> {
    let file = File::open(path).map_err(|e| ReadError::unavailable(path, e))?;
    let path = path.to_path_buf();
    Ok(BufReader::new(file).split(b'\n').map(move |bytes| {
        bytes
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|e| ReadError::unavailable(&path, e))
    }))
}

/// First line of `path`, without the trailing newline. An empty file gives an empty string.
pub fn read_first_line(path: &Path) -> Result<String, ReadError> {
    Ok(read_lines(path)?.next().transpose()?.unwrap_or_default())
}

/// For each key, the tokens following it on the first line whose first token equals it.
///
/// Every line is examined until all keys have been seen. Keys that never
/// appear come back as `None`.
pub fn find_fields(
    path: &Path,
    rules: &[Normalize],
    keys: &[&str],
) -> Result<Vec<Option<Vec<String>>>, ReadError> {
    let mut found: Vec<Option<Vec<String>>> = vec![None; keys.len()];
    let mut remaining = keys.len();

    for line in read_lines(path)? {
        if remaining == 0 {
            break;
        }
        let line = line?;
        let mut tokens = tokenize(&line, rules);
        if tokens.is_empty() {
            continue;
        }
        let values = tokens.split_off(1);
        if let Some(slot) = keys
            .iter()
            .position(|key| *key == tokens[0])
            .map(|idx| &mut found[idx])
        {
            if slot.is_none() {
                *slot = Some(values);
                remaining -= 1;
            }
        }
    }

    Ok(found)
}

/// The first token after `key`, or `KeyNotFound` when the key is absent or has no value.
pub fn find_first(path: &Path, rules: &[Normalize], key: &str) -> Result<String, ReadError> {
    find_fields(path, rules, &[key])?
        .pop()
        .flatten()
        .and_then(|values| values.into_iter().next())
        .ok_or_else(|| ReadError::key_not_found(path, key))
}

/// Parses a token into a number, reporting the offending text on failure.
pub fn parse_number<T: std::str::FromStr>(path: &Path, key: &str, raw: &str) -> Result<T, ReadError> {
    raw.parse()
        .map_err(|_| ReadError::malformed(path, format!("{key}: {raw:?} is not a number")))
}
