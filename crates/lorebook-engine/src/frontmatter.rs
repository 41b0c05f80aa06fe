use std::collections::HashMap;

const DELIMITER: &str = "---";

/// Flat key/value metadata block from the top of a wiki document.
///
/// The format is a deliberately small subset of YAML: a `---` line, then
/// `key: value` lines, then a closing `---` line. Documents are authored by
/// mod users, so anything malformed degrades to "no frontmatter" rather than
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: HashMap<String, String>,
}

impl Frontmatter {
    /// Extract the frontmatter block from `raw` and return it together with
    /// the byte offset where the document body starts.
    ///
    /// A document that does not open with a `---` line, or that never closes
    /// the block, yields an empty mapping and offset 0 (the whole text is
    /// body).
    pub fn extract(raw: &str) -> (Self, usize) {
        let Some(first_line_end) = raw.find('\n') else {
            return (Self::default(), 0);
        };
        if raw[..first_line_end].trim_end() != DELIMITER {
            return (Self::default(), 0);
        }

        let mut entries = HashMap::new();
        // Remembers the most recent key so the first entry of a YAML block
        // list can become that key's value.
        let mut last_key: Option<String> = None;

        let mut pos = first_line_end + 1;
        while pos <= raw.len() {
            let line_end = raw[pos..]
                .find('\n')
                .map(|i| pos + i)
                .unwrap_or(raw.len());
            let line = &raw[pos..line_end];

            if line.trim_end() == DELIMITER {
                let body_start = if line_end < raw.len() {
                    line_end + 1
                } else {
                    raw.len()
                };
                return (Self { entries }, body_start);
            }

            let trimmed = line.trim();
            if let Some(item) = trimmed.strip_prefix("- ") {
                // Block list entry. Only the first one is kept, and only when
                // the key has no inline value of its own.
                if let Some(key) = &last_key
                    && entries.get(key).is_some_and(String::is_empty)
                {
                    entries.insert(key.clone(), unquote(item.trim()).to_string());
                }
            } else if let Some((key, value)) = trimmed.split_once(':') {
                let key = key.trim().to_string();
                entries.insert(key.clone(), unquote(value.trim()).to_string());
                last_key = Some(key);
            }
            // Lines with neither form are ignored.

            if line_end >= raw.len() {
                break;
            }
            pos = line_end + 1;
        }

        // No closing delimiter: treat as absent.
        (Self::default(), 0)
    }

    /// Parse only the frontmatter of `raw`, discarding the body offset.
    pub fn parse(raw: &str) -> Self {
        Self::extract(raw).0
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn unquote(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}
