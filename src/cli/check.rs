use anyhow::Result;

use ecue::config::EcueConfig;
use ecue::variant::VariantSet;

/// Load every deck and report its size, or the first fatal content error.
pub fn check(config: &EcueConfig) -> Result<()> {
    let mut failed = false;

    println!("Content check");
    println!("{}", "=".repeat(40));
    failed |= !report("Flashcards", super::flashcard_variants(config));
    failed |= !report("Emotion practice", super::emotion_variants(config));

    anyhow::ensure!(!failed, "content check failed");
    println!("All content loaded.");
    Ok(())
}

fn report(title: &str, variants: Result<VariantSet>) -> bool {
    let outcome = variants.and_then(|variants| {
        let catalog = variants.catalog()?;
        let per_variant: Vec<String> = variants
            .iter()
            .map(|variant| {
                let count = catalog.iter().filter(|card| card.variant == variant.id()).count();
                format!("{} {count}", variant.id())
            })
            .collect();
        Ok((catalog.len(), per_variant))
    });

    match outcome {
        Ok((total, per_variant)) => {
            println!("  [ok]   {title}: {total} cards ({})", per_variant.join(", "));
            true
        }
        Err(e) => {
            println!("  [fail] {title}: {e:#}");
            false
        }
    }
}
