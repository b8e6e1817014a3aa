use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{due_label, outcome_label, paint, Color};
use crate::OutputFormat;
use mnemo_lib::scheduling::{engine, preview};

pub fn run(app: &App, card: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let card = app.find_card(card)?;
    let store = app.service.profiles().context("Failed to load profiles")?;
    let profile = store.resolve(&card.profile_id);
    let [if_correct, if_wrong] = preview(&card, profile, app.today);
    let late_penalty = engine::overdue_penalty_applies(&card, profile, app.today);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "card": card,
                "profile": profile,
                "preview": {
                    "correct": if_correct,
                    "wrong": if_wrong,
                },
                "overduePenalty": late_penalty,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&card.content, Color::BOLD, use_color));
            println!();
            println!("  ID:      {}", card.id);
            println!("  Profile: {} ({})", profile.name, profile.id);
            println!("  Level:   {} of {}{}", card.streak, profile.intervals.len(),
                if card.is_graduated { " (graduated)" } else { "" });
            println!("  Due:     {} ({})", card.next_review_date,
                due_label(card.next_review_date, app.today, use_color));
            if late_penalty {
                println!("  {}", paint("Reviewed late: one extra level will be lost", Color::YELLOW, use_color));
            }
            println!("  Correct: next due {}", if_correct);
            println!("  Wrong:   next due {}", if_wrong);

            if !card.history.is_empty() {
                println!();
                println!("  History:");
                for entry in &card.history {
                    println!("    {}  {:<9}  level {}",
                        entry.date, outcome_label(entry.outcome, use_color), entry.streak_after);
                }
            }
        }
    }

    Ok(())
}
