use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};

use crate::app::App;
use crate::render::terminal::{paint, short_id, Color};
use crate::OutputFormat;

pub fn run_card(app: &App, card: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let card = app.find_card(card)?;
    let dates = app
        .service
        .forecast_card(card.id, app.today)
        .context("Failed to project card")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": card.id.to_string(),
                "dates": dates,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if dates.is_empty() {
                println!("Card {} is retired and will not come up again.", short_id(&card));
                return Ok(());
            }
            println!("{}", paint("Assuming every future answer is correct:", Color::DIM, use_color));
            for date in &dates {
                println!("  {}", date);
            }
        }
    }

    Ok(())
}

pub fn run_calendar(app: &App, days: u32, format: &OutputFormat, use_color: bool) -> Result<()> {
    let last = app
        .today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    let calendar = app.service.calendar(app.today).context("Failed to build calendar")?;
    let upcoming: Vec<_> = calendar.into_iter().filter(|(date, _)| *date <= last).collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = upcoming.iter().map(|(date, count)| {
                serde_json::json!({
                    "date": date,
                    "count": count,
                })
            }).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if upcoming.is_empty() {
                println!("No reviews in the next {} days.", days);
                return Ok(());
            }
            for (date, count) in &upcoming {
                let label = if *date < app.today {
                    paint(&date.to_string(), Color::RED, use_color)
                } else {
                    date.to_string()
                };
                println!("{}  {:>3}  {}", label, count, "\u{2588}".repeat((*count).min(40)));
            }
        }
    }

    Ok(())
}
