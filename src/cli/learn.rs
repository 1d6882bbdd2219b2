use anyhow::Result;
use std::io::{self, Write};

use ecue::config::EcueConfig;
use ecue::session::run_session;

/// Run a flashcard review session on stdin/stdout.
pub fn learn(config: &EcueConfig) -> Result<()> {
    let variants = super::flashcard_variants(config)?;
    let mut scheduler = super::open_scheduler(config, &variants, super::learn_store(config))?;
    let mut rng = super::question_rng(config);

    println!("Learn mode started. Type 'quit' to exit.");
    println!(
        "Loaded {} cards. {} new cards remain.",
        scheduler.catalog().len(),
        scheduler.remaining_new()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let stats = run_session(&mut scheduler, &variants, &mut rng, &mut stdin.lock(), &mut stdout)?;
    stdout.flush()?;

    println!("Learn session complete.");
    if stats.total > 0 {
        println!("Score: {}/{} correct.", stats.correct, stats.total);
    }
    Ok(())
}
