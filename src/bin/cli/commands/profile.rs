use anyhow::{bail, Context, Result};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::{OutputFormat, ProfileCommand};
use mnemo_lib::scheduling::{format_interval, parse_intervals, Profile};

pub fn run(app: &App, command: ProfileCommand, format: &OutputFormat, use_color: bool) -> Result<()> {
    match command {
        ProfileCommand::List => run_list(app, format, use_color),
        ProfileCommand::Add {
            name,
            intervals,
            id,
            regress_step,
            graduation_interval,
            overdue_tolerance,
        } => {
            let intervals = parse_intervals(&intervals, app.service.config().max_interval_days)?;
            let id = id.unwrap_or_else(|| slugify(&name));
            if id.is_empty() {
                bail!("Cannot derive an id from '{}'; pass one with --id", name);
            }
            let profile = Profile {
                regress_step,
                graduation_interval,
                overdue_tolerance,
                ..Profile::new(id, name, intervals)
            };
            app.service.add_profile(profile.clone()).context("Failed to add profile")?;
            print_profile("Added", &profile, None, format)
        }
        ProfileCommand::Edit {
            profile,
            name,
            intervals,
            regress_step,
            graduation_interval,
            overdue_tolerance,
        } => {
            let mut updated = app.find_profile(&profile)?;
            if let Some(name) = name {
                updated.name = name;
            }
            if let Some(intervals) = intervals {
                updated.intervals = parse_intervals(&intervals, app.service.config().max_interval_days)?;
            }
            if let Some(step) = regress_step {
                updated.regress_step = step;
            }
            if let Some(interval) = graduation_interval {
                updated.graduation_interval = interval;
            }
            if let Some(tolerance) = overdue_tolerance {
                updated.overdue_tolerance = tolerance;
            }
            let changed = app
                .service
                .update_profile(updated.clone(), app.today)
                .context("Failed to update profile")?;
            print_profile("Updated", &updated, Some(changed.len()), format)
        }
        ProfileCommand::Remove { profile } => {
            let profile = app.find_profile(&profile)?;
            let moved = app
                .service
                .remove_profile(&profile.id, app.today)
                .context("Failed to remove profile")?;
            print_profile("Removed", &profile, Some(moved.len()), format)
        }
        ProfileCommand::Default { profile } => {
            let profile = app.find_profile(&profile)?;
            app.service
                .set_default_profile(&profile.id)
                .context("Failed to set default profile")?;
            print_profile("Default is now", &profile, None, format)
        }
    }
}

fn run_list(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let store = app.service.profiles().context("Failed to load profiles")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&store)?);
        }
        OutputFormat::Plain => {
            for profile in store.profiles() {
                let marker = if profile.id == store.default_id() {
                    paint("*", Color::GREEN, use_color)
                } else {
                    " ".to_string()
                };
                println!("{} {} ({})", marker, paint(&profile.name, Color::BOLD, use_color), profile.id);
                println!("    {}", describe(profile));
            }
        }
    }

    Ok(())
}

fn print_profile(action: &str, profile: &Profile, affected: Option<usize>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "profile": profile,
                "cardsAffected": affected,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{} profile {} ({})", action, profile.name, profile.id);
            println!("    {}", describe(profile));
            if let Some(count) = affected {
                println!("    {} cards re-scheduled", count);
            }
        }
    }
    Ok(())
}

/// One-line summary like "now 1d 2d 1w, then every 1mo, regress 1, 3d grace"
fn describe(profile: &Profile) -> String {
    let steps: Vec<String> = profile
        .intervals
        .iter()
        .map(|&days| format_interval(i64::from(days)))
        .collect();
    let after = if profile.retires_on_graduation() {
        "then retired".to_string()
    } else {
        format!("then every {}", format_interval(i64::from(profile.graduation_interval)))
    };
    format!(
        "{}, {}, regress {}, {} grace",
        steps.join(" "),
        after,
        profile.regress_step,
        format_interval(i64::from(profile.overdue_tolerance))
    )
}

/// Lowercase, alphanumerics kept, everything else collapsed to '-'
fn slugify(name: &str) -> String {
    let mut slug = String::new();
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
