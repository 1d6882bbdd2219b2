use anyhow::Result;
use std::io::{self, BufRead, Write};

use ecue::config::EcueConfig;
use ecue::session::run_session;
use ecue::variant::VariantSet;

/// Run an emotion-vocabulary session. Without `selection`, ask which variants to drill.
pub fn practice(config: &EcueConfig, selection: Option<&str>) -> Result<()> {
    let variants = super::emotion_variants(config)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let variants = match selection {
        Some(selection) => variants.select(selection)?,
        None => match choose_variants(variants, &mut input)? {
            Some(variants) => variants,
            None => {
                println!("No variants selected. Exiting.");
                return Ok(());
            }
        },
    };

    let mut scheduler = super::open_scheduler(config, &variants, super::practice_store(config))?;
    let mut rng = super::question_rng(config);

    println!("Emotion practice started. Type 'quit' to exit.");
    println!(
        "Loaded {} cards across {} variant(s).",
        scheduler.catalog().len(),
        variants.len()
    );
    println!(
        "{} due | {} new cards.",
        scheduler.due_count(),
        scheduler.remaining_new()
    );

    let mut stdout = io::stdout();
    let stats = run_session(&mut scheduler, &variants, &mut rng, &mut input, &mut stdout)?;
    stdout.flush()?;

    println!("Practice session complete.");
    if stats.total > 0 {
        println!("Score: {}/{} correct.", stats.correct, stats.total);
    }
    Ok(())
}

/// Prompt until the selection parses. `None` when the user quits.
fn choose_variants(variants: VariantSet, input: &mut impl BufRead) -> Result<Option<VariantSet>> {
    println!("Available practice variants:");
    for (idx, variant) in variants.iter().enumerate() {
        println!("{}. {} ({})", idx + 1, variant.label(), variant.id());
    }
    println!("Select variants by number or id (comma-separated). Press Enter for all variants.");

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            println!("\nNo input detected. Using all variants.");
            return Ok(Some(variants));
        }
        let answer = line.trim();
        if matches!(answer.to_lowercase().as_str(), "quit" | "exit") {
            return Ok(None);
        }
        match variants.resolve(answer) {
            Ok(positions) => return Ok(Some(variants.keep(&positions))),
            Err(e) => println!("{e}. Try again or press Enter to use all variants."),
        }
    }
}
