use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.service.stats(app.today).context("Failed to compute stats")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint("Overview", Color::BOLD, use_color));
            println!("  Cards:         {}", stats.total_cards);
            println!("  Due today:     {}", stats.due_cards);
            println!("  Graduated:     {} ({} retired)", stats.graduated_cards, stats.retired_cards);
            println!("  Highest level: {}", stats.max_streak);
            println!("  Mastery:       {}%", stats.mastery_rate);
            println!("  Reviewed today: {} ({} correct)", stats.reviews_today, stats.correct_today);
        }
    }

    Ok(())
}

/// Dump every card and profile; always JSON
pub fn run_export(app: &App) -> Result<()> {
    let snapshot = app.service.sync().context("Failed to load data")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
