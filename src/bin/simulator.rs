// File: src/bin/simulator.rs
//! Interactive ranking simulator.
//!
//! Type decoder output as `word:confidence` tokens (optionally `first=c`,
//! `len=n`) and see the ranked list, coloured by where each prediction came
//! from. `:lang <code> [fallback]`, `:secondary <code>`, `:unload` and
//! `:reload` drive the engine; `exit` quits.

use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use ranker_core::core::vocabulary::Vocabulary;
use ranker_core::loaders::{DirectoryLanguagePacks, JsonPreferenceStore, TextDictionarySource};
use ranker_core::{CandidateWord, FilteredPrediction, PredictionEngine, PredictionSource, RankerConfig, SwipeStats};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

/// Used when the data directory has no English dictionary.
const DEMO_WORDS: &[(&str, u32)] = &[
    ("the", 50_000),
    ("quick", 1_200),
    ("brown", 900),
    ("fox", 700),
    ("they", 20_000),
    ("there", 15_000),
    ("then", 12_000),
    ("jumps", 300),
    ("over", 8_000),
    ("lazy", 400),
    ("dog", 1_500),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let data_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| ".".to_string()));
    let engine = PredictionEngine::new(
        RankerConfig::default(),
        Box::new(TextDictionarySource::new(data_dir.join("dictionaries"))),
        Box::new(DirectoryLanguagePacks::new(data_dir.join("packs"))),
        Box::new(JsonPreferenceStore::open(data_dir.join("preferences.json"))),
    );
    if engine.load_primary_dictionary().is_err() {
        let demo = DEMO_WORDS.iter().map(|(w, f)| (w.to_string(), *f)).collect();
        engine.install_vocabulary(Vocabulary::from_ranked("en", demo)?);
    }

    let mut last: Vec<FilteredPrediction> = Vec::new();
    let mut status = String::from("ready");

    loop {
        render(&engine, &last, &status)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        let parts: Vec<&str> = input.split_whitespace().collect();

        match parts.as_slice() {
            ["exit"] => break,
            [":lang", code, rest @ ..] => {
                engine.set_primary_language_config(code, rest.first() == Some(&"fallback"));
                status = format!("primary language {}", engine.language_state().primary());
            }
            [":secondary", code] => {
                status = if engine.load_secondary_dictionary(code) {
                    format!("secondary language {}", code)
                } else {
                    format!("could not load secondary {}", code)
                };
            }
            [":unload"] => {
                engine.unload_secondary_dictionary();
                status = "secondary unloaded".to_string();
            }
            [":reload"] => {
                engine.reload_overlay();
                status = "overlay reloaded".to_string();
            }
            [] => {}
            tokens => {
                let (candidates, stats) = parse_tokens(tokens);
                last = engine.rank(&candidates, &stats);
                status = format!("{} candidates in, {} predictions out", candidates.len(), last.len());
            }
        }
    }
    Ok(())
}

fn parse_tokens(tokens: &[&str]) -> (Vec<CandidateWord>, SwipeStats) {
    let mut stats = SwipeStats::default();
    let mut candidates = Vec::new();
    for token in tokens {
        if let Some(first) = token.strip_prefix("first=") {
            stats.first_char = first.chars().next();
        } else if let Some(len) = token.strip_prefix("len=") {
            stats.expected_length = len.parse().ok();
        } else {
            let (word, confidence) = token.rsplit_once(':').unwrap_or((*token, "0.5"));
            candidates.push(CandidateWord::new(word, confidence.parse().unwrap_or(0.5)));
        }
    }
    (candidates, stats)
}

fn source_color(source: &PredictionSource) -> Color {
    match source {
        PredictionSource::Common | PredictionSource::Top5000 => Color::Green,
        PredictionSource::Vocabulary => Color::DarkGreen,
        PredictionSource::Primary => Color::Cyan,
        PredictionSource::Contraction(_) => Color::Magenta,
        PredictionSource::Custom | PredictionSource::Autocorrect => Color::Yellow,
        PredictionSource::Secondary => Color::Blue,
        PredictionSource::Raw => Color::Grey,
    }
}

fn render(engine: &PredictionEngine, predictions: &[FilteredPrediction], status: &str) -> std::io::Result<()> {
    let mut out = stdout();
    let language = engine.language_state();

    execute!(
        out,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(Color::Cyan),
        Print("Swipe Candidate Ranker Simulator\n"),
        ResetColor,
        Print("---------------------------------------------------------------\n"),
        Print(format!(
            "primary: {}  secondary: {}  multiplier: {:.2}  loaded: {}\n",
            language.primary(),
            language.secondary().unwrap_or("-"),
            language.language_multiplier(),
            engine.is_loaded()
        )),
        Print(format!("{}\n\n", status))
    )?;

    if predictions.is_empty() {
        execute!(out, Print("No predictions.\n"))?;
    }
    for (i, p) in predictions.iter().enumerate() {
        execute!(
            out,
            Print(format!("  {:>2}. ", i + 1)),
            SetForegroundColor(source_color(&p.source)),
            Print(format!("{:<16}", p.display_text)),
            ResetColor,
            Print(format!(" {:.3}  [{}]\n", p.score, p.source_label()))
        )?;
    }

    execute!(out, Print("\nword:conf ... [first=c] [len=n] | :lang | :secondary | exit\n> "))?;
    out.flush()
}
