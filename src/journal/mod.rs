//! File-based journal: one JSON document per writing session, plus derived
//! metadata (word totals and daily streaks).
//!
//! Sessions here are offline: each line typed becomes one exchange with an
//! empty reply. Saving an entry recomputes and persists the metadata.

pub mod entry;
pub mod metadata;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub use entry::{count_words, Analysis, Entry, Exchange, JournalStore};
pub use metadata::JournalMetadata;

/// What a writing session ended with.
#[derive(Debug)]
pub enum SessionEnd {
    Saved(Entry),
    /// `save` with nothing written.
    Empty,
    Discarded,
}

/// Entry store and metadata file for one journal.
#[derive(Debug, Clone)]
pub struct Journal {
    pub store: JournalStore,
    pub metadata_path: PathBuf,
    pub min_words_for_streak: usize,
}

impl Journal {
    /// Persist `entry` and refresh the metadata file from every saved entry.
    pub fn commit(&self, entry: &Entry, today: NaiveDate) -> Result<JournalMetadata> {
        self.store.save(entry)?;
        self.refresh_metadata(today)
    }

    pub fn refresh_metadata(&self, today: NaiveDate) -> Result<JournalMetadata> {
        let entries = self.store.load_all()?;
        let meta = metadata::calculate(&entries, today, self.min_words_for_streak);
        metadata::save(&self.metadata_path, &meta)?;
        tracing::info!(entries = meta.total_entries, streak = meta.current_daily_streak, "journal metadata updated");
        Ok(meta)
    }

    /// Collect lines until `save` (keep), `exit`/`quit` or end of input (discard).
    pub fn write_session<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        out: &mut W,
        started: DateTime<Utc>,
    ) -> Result<SessionEnd> {
        writeln!(out, "Type 'save' to save and exit, or 'exit'/'quit' to end without saving.")?;

        let mut exchanges = Vec::new();
        let mut cumulative = 0;
        let mut line = String::new();
        loop {
            write!(out, "You: ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line).context("failed to read journal input")? == 0 {
                writeln!(out, "\nEnding journal session (not saved).")?;
                return Ok(SessionEnd::Discarded);
            }

            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            match text.to_lowercase().as_str() {
                "exit" | "quit" => {
                    writeln!(out, "Ending journal session (not saved).")?;
                    return Ok(SessionEnd::Discarded);
                }
                "save" => break,
                _ => {}
            }

            let words = count_words(text);
            cumulative += words;
            writeln!(out, "[{words} words this entry, {cumulative} words total]")?;
            exchanges.push(Exchange {
                user: text.to_string(),
                assistant: String::new(),
            });
        }

        let Some(entry) = Entry::from_exchanges(exchanges, started) else {
            writeln!(out, "No entries to save.")?;
            return Ok(SessionEnd::Empty);
        };
        self.commit(&entry, started.date_naive())?;
        writeln!(
            out,
            "✓ Saved session with {} exchanges to entry {}.",
            entry.exchanges.len(),
            entry.id
        )?;
        Ok(SessionEnd::Saved(entry))
    }
}
