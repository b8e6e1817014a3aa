use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{card_json, due_label, outcome_label, short_id};
use crate::OutputFormat;
use mnemo_lib::ReviewOutcome;

pub fn run(
    app: &App,
    card: &str,
    outcome: ReviewOutcome,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let before = app.find_card(card)?;
    let after = app
        .service
        .review_card(before.id, outcome, app.today)
        .context("Failed to record review")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card_json(&after))?);
        }
        OutputFormat::Plain => {
            let recorded = after
                .last_review()
                .map(|entry| outcome_label(entry.outcome, use_color))
                .unwrap_or_default();
            println!("{} {}: level {} -> {}", short_id(&after), recorded, before.streak, after.streak);
            println!(
                "  Next review: {} ({})",
                after.next_review_date,
                due_label(after.next_review_date, app.today, use_color)
            );
        }
    }

    Ok(())
}
