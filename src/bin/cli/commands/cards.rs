use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{card_json, due_label, print_cards, short_id};
use crate::OutputFormat;
use mnemo_lib::scheduling::Card;

fn print_card_result(action: &str, card: &Card, app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card_json(card))?);
        }
        OutputFormat::Plain => {
            println!("{} card {}", action, short_id(card));
            println!("  Profile: {}", card.profile_id);
            println!("  Level:   {}{}", card.streak, if card.is_graduated { " (graduated)" } else { "" });
            println!("  Due:     {} ({})", card.next_review_date, due_label(card.next_review_date, app.today, use_color));
        }
    }
    Ok(())
}

pub fn run_add(
    app: &App,
    content: String,
    profile: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let profile_id = app.profile_id(profile)?;
    let card = app
        .service
        .create_card(content, profile_id.as_deref(), app.today)
        .context("Failed to create card")?;
    print_card_result("Added", &card, app, format, use_color)
}

fn print_card_list(cards: &[Card], empty: &str, app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = cards.iter().map(card_json).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("{}", empty);
                return Ok(());
            }
            print_cards(cards, app.today, use_color);
            println!("\n{} cards total", cards.len());
        }
    }
    Ok(())
}

pub fn run_due(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.service.due_cards(app.today).context("Failed to list due cards")?;
    print_card_list(&cards, "Nothing to review today.", app, format, use_color)
}

pub fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.service.cards().context("Failed to list cards")?;
    print_card_list(&cards, "No cards yet.", app, format, use_color)
}

pub fn run_snooze(
    app: &App,
    card: &str,
    days: Option<u32>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let card = app.find_card(card)?;
    let snoozed = app
        .service
        .snooze_card(card.id, days, app.today)
        .context("Failed to snooze card")?;
    print_card_result("Snoozed", &snoozed, app, format, use_color)
}

pub fn run_edit(
    app: &App,
    card: &str,
    content: Option<String>,
    profile: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let card = app.find_card(card)?;
    let profile_id = app.profile_id(profile)?;
    let edited = app
        .service
        .edit_card(card.id, content, profile_id.as_deref(), app.today)
        .context("Failed to edit card")?;
    print_card_result("Edited", &edited, app, format, use_color)
}

pub fn run_delete(app: &App, card: &str, format: &OutputFormat) -> Result<()> {
    let card = app.find_card(card)?;
    app.service.delete_card(card.id).context("Failed to delete card")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({ "deleted": card.id.to_string() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => println!("Deleted card {}", short_id(&card)),
    }
    Ok(())
}
