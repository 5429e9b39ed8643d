// File: src/bin/main.rs
//! Line protocol driver. Reads one command per line on stdin, answers on
//! stdout; logs go to stderr.
//!
//! ```text
//! RANK the:0.9 qick:0.4 [first=t] [len=3]
//! LANG fr [fallback]
//! SECONDARY es
//! UNLOAD_SECONDARY
//! RELOAD_OVERLAY
//! LANG_SCORES en=0.7 es=0.3
//! PREFIX qu
//! EXIT
//! ```
//!
//! Data directory layout (first argument, default `.`):
//! `dictionaries/<lang>.txt`, `packs/<lang>/...`, `preferences.json`,
//! `ranker.json` and `cache/<lang>.bin`.

use ranker_core::core::vocabulary::Vocabulary;
use ranker_core::loaders::{DirectoryLanguagePacks, JsonPreferenceStore, TextDictionarySource};
use ranker_core::persistence::{load_from_disk, save_to_disk};
use ranker_core::{CandidateWord, FilteredPrediction, PredictionEngine, RankerConfig, SwipeStats};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let data_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));
    let engine = build_engine(&data_dir);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().copied().unwrap_or("");

        match command {
            "RANK" => {
                let (candidates, stats) = parse_rank_args(&parts[1..]);
                let predictions = engine.rank(&candidates, &stats);
                writeln!(stdout, "PREDICTIONS {}", format_predictions(&predictions))?;
            }
            "LANG" => match parts.get(1) {
                Some(code) => {
                    let fallback = parts.get(2) == Some(&"fallback");
                    engine.set_primary_language_config(code, fallback);
                    writeln!(stdout, "OK {}", engine.language_state().primary())?;
                }
                None => writeln!(stdout, "ERR missing language code")?,
            },
            "SECONDARY" => match parts.get(1) {
                Some(code) if engine.load_secondary_dictionary(code) => writeln!(stdout, "OK")?,
                Some(_) => writeln!(stdout, "ERR secondary unavailable")?,
                None => writeln!(stdout, "ERR missing language code")?,
            },
            "UNLOAD_SECONDARY" => {
                engine.unload_secondary_dictionary();
                writeln!(stdout, "OK")?;
            }
            "RELOAD_OVERLAY" => {
                engine.reload_overlay();
                writeln!(stdout, "OK")?;
            }
            "LANG_SCORES" => {
                let scores: HashMap<String, f32> = parts[1..]
                    .iter()
                    .filter_map(|pair| {
                        let (code, score) = pair.split_once('=')?;
                        Some((code.to_string(), score.parse().ok()?))
                    })
                    .collect();
                engine.update_language_multiplier(&scores);
                writeln!(stdout, "MULTIPLIER {:.3}", engine.language_state().language_multiplier())?;
            }
            "PREFIX" => {
                let prefix = parts.get(1).copied().unwrap_or("");
                let next: String = engine.allowed_next_chars(prefix).into_iter().collect();
                writeln!(
                    stdout,
                    "NEXT {} word={} prefix={}",
                    if next.is_empty() { "-" } else { next.as_str() },
                    engine.contains_word(prefix),
                    engine.is_valid_prefix(prefix)
                )?;
            }
            "EXIT" => break,
            "" => continue,
            other => writeln!(stdout, "ERR unknown command {}", other)?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn build_engine(data_dir: &Path) -> PredictionEngine {
    let config_path = data_dir.join("ranker.json");
    let config = if config_path.exists() {
        RankerConfig::from_json_file(&config_path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config unreadable, using defaults");
            RankerConfig::default()
        })
    } else {
        RankerConfig::default()
    };
    let language = config.fallback_language.clone();

    let engine = PredictionEngine::new(
        config,
        Box::new(TextDictionarySource::new(data_dir.join("dictionaries"))),
        Box::new(DirectoryLanguagePacks::new(data_dir.join("packs"))),
        Box::new(JsonPreferenceStore::open(data_dir.join("preferences.json"))),
    );

    let cache_path = data_dir.join("cache").join(format!("{}.bin", language));
    match load_from_disk::<Vocabulary>(&cache_path) {
        Ok(vocabulary) => {
            tracing::info!(path = %cache_path.display(), "dictionary restored from cache");
            engine.install_vocabulary(vocabulary);
        }
        Err(_) => match engine.load_primary_dictionary() {
            Ok(()) => {
                if let Some(vocabulary) = engine.vocabulary() {
                    if let Err(e) = save_to_disk(vocabulary.as_ref(), &cache_path) {
                        tracing::warn!(error = %e, "could not write dictionary cache");
                    }
                }
            }
            Err(e) => tracing::warn!(error = %e, "dictionary not loaded, ranking degraded to raw candidates"),
        },
    }
    engine
}

/// `word:confidence` tokens plus optional `first=c` and `len=n`.
fn parse_rank_args(args: &[&str]) -> (Vec<CandidateWord>, SwipeStats) {
    let mut candidates = Vec::new();
    let mut stats = SwipeStats::default();
    for arg in args {
        if let Some(first) = arg.strip_prefix("first=") {
            stats.first_char = first.chars().next();
        } else if let Some(len) = arg.strip_prefix("len=") {
            stats.expected_length = len.parse().ok();
        } else if let Some((word, confidence)) = arg.rsplit_once(':') {
            candidates.push(CandidateWord::new(word, confidence.parse().unwrap_or(0.0)));
        } else {
            candidates.push(CandidateWord::new(*arg, 0.0));
        }
    }
    (candidates, stats)
}

fn format_predictions(predictions: &[FilteredPrediction]) -> String {
    predictions
        .iter()
        .map(|p| format!("{}|{:.3}|{}", p.display_text, p.score, p.source_label()))
        .collect::<Vec<_>>()
        .join(" ")
}
