use anyhow::{Context, Result};
use chrono::Utc;
use std::io::{self, Read, Write};

use ecue::config::EcueConfig;
use ecue::journal::{metadata, Analysis, Journal, JournalMetadata, SessionEnd};
use ecue::srs::timestamp::{to_iso, utc_now};

fn open(config: &EcueConfig) -> Journal {
    Journal {
        store: ecue::journal::JournalStore::new(config.entries_dir()),
        metadata_path: config.metadata_path(),
        min_words_for_streak: config.journal.min_words_for_streak,
    }
}

/// Write a new entry line by line on stdin.
pub fn write(config: &EcueConfig) -> Result<()> {
    let journal = open(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let end = journal.write_session(&mut stdin.lock(), &mut stdout, utc_now())?;
    stdout.flush()?;
    if let SessionEnd::Saved(_) = end {
        print_metadata(&metadata::load(&journal.metadata_path));
    }
    Ok(())
}

pub fn list(config: &EcueConfig, limit: usize) -> Result<()> {
    let entries = open(config).store.load_all()?;
    if entries.is_empty() {
        println!("No journal entries yet.");
        return Ok(());
    }
    for entry in entries.iter().take(limit) {
        let preview: String = entry.content.chars().take(60).collect();
        println!(
            "{}  {:>5} words  {}  {preview}",
            to_iso(entry.timestamp),
            entry.word_count,
            entry.id
        );
    }
    Ok(())
}

pub fn show(config: &EcueConfig, id: &str) -> Result<()> {
    let entry = open(config)
        .store
        .load_by_id(id)?
        .with_context(|| format!("no journal entry matches '{id}'"))?;
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

/// Attach an analysis read from model output on stdin.
pub fn analyze(config: &EcueConfig, id: &str) -> Result<()> {
    let journal = open(config);
    let mut entry = journal
        .store
        .load_by_id(id)?
        .with_context(|| format!("no journal entry matches '{id}'"))?;

    let mut output = String::new();
    io::stdin()
        .read_to_string(&mut output)
        .context("failed to read model output")?;
    let analysis = Analysis::from_model_output(&output);
    entry.analysis = Some(analysis.clone());
    journal.store.save(&entry)?;

    println!("Sentiment: {}  Tone: {}", analysis.sentiment, analysis.tone);
    if !analysis.emotions.is_empty() {
        println!("Emotions:  {}", analysis.emotions.join(", "));
    }
    if !analysis.topics.is_empty() {
        println!("Topics:    {}", analysis.topics.join(", "));
    }
    if !analysis.summary.is_empty() {
        println!("Summary:   {}", analysis.summary);
    }
    Ok(())
}

/// Recompute metadata from every entry, save it, and print it.
pub fn stats(config: &EcueConfig) -> Result<()> {
    let meta = open(config).refresh_metadata(Utc::now().date_naive())?;
    print_metadata(&meta);
    Ok(())
}

fn print_metadata(meta: &JournalMetadata) {
    println!("Journal Statistics");
    println!("{}", "=".repeat(40));
    println!("  Entries:             {}", meta.total_entries);
    println!("  Total words:         {}", meta.total_word_count);
    println!("  Words per session:   {:.2}", meta.average_word_count_per_session);
    println!("  Words per day:       {:.2}", meta.average_word_count_per_day);
    println!("  Current streak:      {} day(s)", meta.current_daily_streak);
    println!("  Longest streak:      {} day(s)", meta.all_time_daily_streak);
    if let Some(date) = meta.last_entry_date {
        println!("  Last entry:          {date}");
    }
}
