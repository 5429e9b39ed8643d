// File: src/loaders.rs
//! File-backed implementations of the collaborator traits in
//! [`crate::core::sources`].

use crate::core::contractions::ContractionMappings;
use crate::core::sources::{normalize_language_code, DictionarySource, LanguagePackResolver, PreferenceStore, UserWord};
use crate::error::RankerError;
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads `<dir>/<language>.txt`: one `word count` pair per line, `#` starts
/// a comment line.
pub struct TextDictionarySource {
    dir: PathBuf,
}

impl TextDictionarySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", normalize_language_code(language)))
    }
}

impl DictionarySource for TextDictionarySource {
    fn load(&self, language: &str) -> Result<Vec<(String, u32)>, RankerError> {
        let path = self.path_for(language);
        let source_name = path.display().to_string();
        let entries = read_pairs(&path, |word, count, line| match count {
            Some(count) => count
                .parse::<u32>()
                .map(|count| (word.to_string(), count))
                .map_err(|e| RankerError::parse(&source_name, line, format!("bad count '{}': {}", count, e))),
            None => Err(RankerError::parse(&source_name, line, "missing frequency count")),
        })?;
        tracing::debug!(path = %source_name, entries = entries.len(), "dictionary file read");
        Ok(entries)
    }
}

/// Language packs laid out as `<root>/<language>/dictionary.txt` and
/// `<root>/<language>/contractions.json`.
pub struct DirectoryLanguagePacks {
    root: PathBuf,
}

impl DirectoryLanguagePacks {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LanguagePackResolver for DirectoryLanguagePacks {
    fn dictionary_path(&self, language: &str) -> Option<PathBuf> {
        Some(self.root.join(normalize_language_code(language)).join("dictionary.txt"))
    }

    fn contractions_path(&self, language: &str) -> Option<PathBuf> {
        Some(self.root.join(normalize_language_code(language)).join("contractions.json"))
    }
}

/// Parses an accent dictionary: `canonical rank` per line, rank 0 being the
/// most frequent. Ranks above 255 saturate; a word without a rank gets 255.
pub fn read_accent_dictionary(path: &Path) -> Result<Vec<(String, u8)>, RankerError> {
    let source_name = path.display().to_string();
    read_pairs(path, |word, rank, line| {
        let rank = match rank {
            Some(rank) => rank
                .parse::<u32>()
                .map_err(|e| RankerError::parse(&source_name, line, format!("bad rank '{}': {}", rank, e)))?,
            None => u32::from(u8::MAX),
        };
        Ok((word.to_string(), rank.min(u32::from(u8::MAX)) as u8))
    })
}

pub fn read_contractions(path: &Path) -> Result<ContractionMappings, RankerError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Shared line reader: skips blanks and `#` comments, hands
/// `(first field, second field, 1-based line number)` to `parse`.
fn read_pairs<T>(
    path: &Path,
    mut parse: impl FnMut(&str, Option<&str>, usize) -> Result<T, RankerError>,
) -> Result<Vec<T>, RankerError> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let Some(first) = fields.next() else { continue };
        out.push(parse(first, fields.next(), idx + 1)?);
    }
    Ok(out)
}

/// Preference blob stored as JSON:
///
/// ```json
/// {
///   "custom_words":    { "en": { "ferris": 9000 } },
///   "disabled_words":  { "en": ["darn"] },
///   "user_dictionary": [ { "word": "tokio", "frequency": 250, "locale": "en_US" } ]
/// }
/// ```
///
/// The blob is re-read on every call, so an overlay reload picks up edits.
/// A missing file means "no preferences"; a blob that is not JSON is an
/// error; individual malformed entries are skipped.
pub struct JsonPreferenceStore {
    backing: Backing,
}

enum Backing {
    File(PathBuf),
    Inline(String),
}

impl JsonPreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { backing: Backing::File(path.into()) }
    }

    pub fn inline(json: impl Into<String>) -> Self {
        Self { backing: Backing::Inline(json.into()) }
    }

    fn blob(&self) -> Result<Value, RankerError> {
        match &self.backing {
            Backing::File(path) if !path.exists() => Ok(Value::Null),
            Backing::File(path) => Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?),
            Backing::Inline(json) => Ok(serde_json::from_str(json)?),
        }
    }

    /// `blob[section]`, then the entry whose key normalizes to `language`.
    fn language_section(&self, section: &str, language: &str) -> Result<Option<Value>, RankerError> {
        let blob = self.blob()?;
        let Some(by_language) = blob.get(section) else {
            return Ok(None);
        };
        let by_language = by_language
            .as_object()
            .ok_or_else(|| RankerError::parse(section, 0, "expected an object keyed by language"))?;
        let language = normalize_language_code(language);
        Ok(by_language
            .iter()
            .find(|(code, _)| normalize_language_code(code) == language)
            .map(|(_, value)| value.clone()))
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn custom_words(&self, language: &str) -> Result<Vec<(String, u32)>, RankerError> {
        let Some(section) = self.language_section("custom_words", language)? else {
            return Ok(Vec::new());
        };
        let words = section
            .as_object()
            .ok_or_else(|| RankerError::parse("custom_words", 0, "expected an object of word: frequency"))?;
        Ok(words
            .iter()
            .filter_map(|(word, frequency)| match frequency.as_u64() {
                Some(frequency) => Some((word.clone(), frequency.min(u64::from(u32::MAX)) as u32)),
                None => {
                    tracing::debug!(%word, "custom word without numeric frequency skipped");
                    None
                }
            })
            .collect())
    }

    fn disabled_words(&self, language: &str) -> Result<HashSet<String>, RankerError> {
        let Some(section) = self.language_section("disabled_words", language)? else {
            return Ok(HashSet::new());
        };
        let words = section
            .as_array()
            .ok_or_else(|| RankerError::parse("disabled_words", 0, "expected an array of words"))?;
        Ok(words.iter().filter_map(|w| w.as_str()).map(str::to_lowercase).collect())
    }

    fn user_dictionary_words(&self) -> Result<Vec<UserWord>, RankerError> {
        let blob = self.blob()?;
        let Some(entries) = blob.get("user_dictionary") else {
            return Ok(Vec::new());
        };
        let entries = entries
            .as_array()
            .ok_or_else(|| RankerError::parse("user_dictionary", 0, "expected an array"))?;

        let mut words = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let Some(word) = entry.get("word").and_then(Value::as_str) else {
                tracing::debug!(entry = idx, "user dictionary entry without word skipped");
                continue;
            };
            let frequency = entry
                .get("frequency")
                .and_then(Value::as_u64)
                .map_or(1, |f| f.min(u64::from(u32::MAX)) as u32);
            let locale = entry.get("locale").and_then(Value::as_str).map(str::to_string);
            words.push(UserWord { word: word.to_string(), frequency, locale });
        }
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn text_dictionary_reads_pairs_and_reports_line() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en.txt"), "# header\nthe 500\n\nfox 20\n").unwrap();
        let source = TextDictionarySource::new(dir.path());
        assert_eq!(
            source.load("en-US").unwrap(),
            vec![("the".to_string(), 500), ("fox".to_string(), 20)]
        );

        fs::write(dir.path().join("de.txt"), "der 10\ndie many\n").unwrap();
        match source.load("de").unwrap_err() {
            RankerError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(source.load("xx"), Err(RankerError::Io(_))));
    }

    #[test]
    fn language_pack_directory_layout() {
        let dir = tempdir().unwrap();
        let fr = dir.path().join("fr");
        fs::create_dir_all(&fr).unwrap();
        fs::write(fr.join("dictionary.txt"), "café 3\nêtre 900\nà\n").unwrap();
        fs::write(fr.join("contractions.json"), r#"{"non_paired": {"cest": "c'est"}}"#).unwrap();

        let packs = DirectoryLanguagePacks::new(dir.path());
        let words = packs.load_accent_dictionary("fr_FR").unwrap();
        assert_eq!(words, vec![("café".into(), 3), ("être".into(), 255), ("à".into(), 255)]);
        let contractions = packs.load_contractions("fr").unwrap().unwrap();
        assert_eq!(contractions.non_paired["cest"], "c'est");

        assert!(packs.load_contractions("de").unwrap().is_none());
        assert!(matches!(
            packs.load_accent_dictionary("de"),
            Err(RankerError::MissingLanguagePack { path: Some(_), .. })
        ));
    }

    #[test]
    fn preference_blob_sections() {
        let store = JsonPreferenceStore::inline(
            r#"{
                "custom_words": {"en_US": {"ferris": 9000, "broken": "high"}},
                "disabled_words": {"en": ["Darn", 7]},
                "user_dictionary": [
                    {"word": "tokio", "frequency": 250, "locale": "en"},
                    {"frequency": 10},
                    {"word": "serde"}
                ]
            }"#,
        );
        assert_eq!(store.custom_words("en").unwrap(), vec![("ferris".to_string(), 9000)]);
        assert_eq!(store.disabled_words("en").unwrap(), HashSet::from(["darn".to_string()]));
        assert!(store.custom_words("fr").unwrap().is_empty());

        let users = store.user_dictionary_words().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1], UserWord { word: "serde".into(), frequency: 1, locale: None });
    }

    #[test]
    fn malformed_or_missing_blobs() {
        let broken = JsonPreferenceStore::inline("{oops");
        assert!(matches!(broken.custom_words("en"), Err(RankerError::Json(_))));

        let wrong_shape = JsonPreferenceStore::inline(r#"{"disabled_words": ["a"]}"#);
        assert!(matches!(wrong_shape.disabled_words("en"), Err(RankerError::Parse { .. })));

        let dir = tempdir().unwrap();
        let missing = JsonPreferenceStore::open(dir.path().join("prefs.json"));
        assert!(missing.user_dictionary_words().unwrap().is_empty());
    }
}
