//! The interactive review loop shared by `learn` and `practice`.
//!
//! Reads one response per line from any [`BufRead`] and writes prompts and
//! feedback to any [`Write`], so the whole loop runs under test with a
//! `Cursor` and a `Vec<u8>`.

use anyhow::{Context, Result};
use chrono::Duration;
use rand::rngs::StdRng;
use std::io::{BufRead, Write};

use crate::catalog::card::Card;
use crate::srs::scheduler::Scheduler;
use crate::srs::state::ProgressStore;
use crate::srs::timestamp::utc_now;
use crate::variant::{Outcome, Question, VariantSet};

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];
const SEPARATOR_WIDTH: usize = 60;

/// Answers counted during one session; retries are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub total: u32,
    pub correct: u32,
}

enum Reply {
    Judged(bool),
    Quit,
}

/// Run reviews until the user quits, input ends, or no card is left.
///
/// Every judged answer is persisted before the next card is drawn; a failed
/// save ends the session with an error.
pub fn run_session<S, R, W>(
    scheduler: &mut Scheduler<Card, S>,
    variants: &VariantSet,
    rng: &mut StdRng,
    input: &mut R,
    out: &mut W,
) -> Result<SessionStats>
where
    S: ProgressStore,
    R: BufRead,
    W: Write,
{
    let mut stats = SessionStats::default();

    loop {
        let Some(card) = scheduler.next_card().cloned() else {
            writeln!(out, "No cards available for review. Exiting.")?;
            break;
        };
        let variant = variants
            .get(&card.variant)
            .with_context(|| format!("no variant registered for card {}", card.card_id))?;
        let question = variant.prepare_question(&card, rng);

        let correct = match ask(&question, input, out)? {
            Reply::Quit => break,
            Reply::Judged(correct) => correct,
        };

        stats.total += 1;
        if correct {
            stats.correct += 1;
        }

        let now = utc_now();
        let record = scheduler.update_progress_at(&card, correct, now)?;
        writeln!(
            out,
            "Next review for this card in ~{}.",
            format_timedelta(record.next_due - now)
        )?;
        writeln!(
            out,
            "Progress: {}/{} correct | {} due | {} new remaining",
            stats.correct,
            stats.total,
            scheduler.due_count_at(now),
            scheduler.remaining_new()
        )?;
    }

    tracing::info!(total = stats.total, correct = stats.correct, "session finished");
    Ok(stats)
}

fn ask<R: BufRead, W: Write>(question: &Question, input: &mut R, out: &mut W) -> Result<Reply> {
    writeln!(out, "\n{}", "-".repeat(SEPARATOR_WIDTH))?;
    for line in &question.prompt_lines {
        writeln!(out, "{line}")?;
    }
    for (idx, choice) in question.choices.iter().enumerate() {
        writeln!(out, "{}. {choice}", idx + 1)?;
    }

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).context("failed to read response")? == 0 {
            writeln!(out, "\nNo input detected. Ending session.")?;
            return Ok(Reply::Quit);
        }

        let response = line.trim();
        if response.is_empty() {
            writeln!(out, "Please enter a response (or type 'quit' to exit).")?;
            continue;
        }
        if QUIT_WORDS.contains(&response.to_lowercase().as_str()) {
            writeln!(out, "Exiting session...")?;
            return Ok(Reply::Quit);
        }

        let grade = question.grade(response);
        for feedback in &grade.feedback {
            writeln!(out, "{feedback}")?;
        }
        match grade.outcome {
            Outcome::Retry => continue,
            Outcome::Correct => return Ok(Reply::Judged(true)),
            Outcome::Incorrect => return Ok(Reply::Judged(false)),
        }
    }
}

/// Rough human wait: days and hours, or hours and minutes under a day.
pub fn format_timedelta(delta: Duration) -> String {
    let total = delta.num_seconds();
    if total <= 0 {
        return "due now".to_string();
    }
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;

    let unit = |n: i64, name: &str| format!("{n} {name}{}", if n == 1 { "" } else { "s" });
    let mut parts = Vec::new();
    if days > 0 {
        parts.push(unit(days, "day"));
    }
    if hours > 0 {
        parts.push(unit(hours, "hour"));
    }
    if minutes > 0 && days == 0 {
        parts.push(unit(minutes, "minute"));
    }

    if parts.is_empty() {
        "due soon".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timedelta_formatting() {
        assert_eq!(format_timedelta(Duration::zero()), "due now");
        assert_eq!(format_timedelta(Duration::seconds(-5)), "due now");
        assert_eq!(format_timedelta(Duration::seconds(30)), "due soon");
        assert_eq!(format_timedelta(Duration::hours(4)), "4 hours");
        assert_eq!(format_timedelta(Duration::minutes(61)), "1 hour, 1 minute");
        assert_eq!(format_timedelta(Duration::days(1) + Duration::minutes(5)), "1 day");
        assert_eq!(format_timedelta(Duration::days(3) + Duration::hours(2)), "3 days, 2 hours");
    }
}
