use anyhow::Result;

use ecue::config::EcueConfig;
use ecue::srs::scheduler::DeckStats;
use ecue::srs::timestamp::utc_now;

/// Display review statistics for both decks in the terminal.
pub fn stats(config: &EcueConfig) -> Result<()> {
    let now = utc_now();

    let flashcards = super::flashcard_variants(config)?;
    let learn = super::open_scheduler(config, &flashcards, super::learn_store(config))?;
    print_deck("Flashcards", &learn.deck_stats_at(now));

    let emotions = super::emotion_variants(config)?;
    let practice = super::open_scheduler(config, &emotions, super::practice_store(config))?;
    print_deck("Emotion practice", &practice.deck_stats_at(now));

    Ok(())
}

fn print_deck(title: &str, deck: &DeckStats) {
    println!("{title}");
    println!("{}", "=".repeat(40));
    println!("  Cards:               {}", deck.cards);
    println!("  Reviewed:            {}", deck.reviewed);
    println!("  New:                 {}", deck.new);
    println!("  Due now:             {}", deck.due_now);
    println!("  Due within 7 days:   {}", deck.due_within_week);
    match deck.mean_ease {
        Some(ease) => println!("  Mean ease:           {ease:.2}"),
        None => println!("  Mean ease:           -"),
    }
    println!();
}
