use chrono::NaiveDate;
use mnemo_lib::scheduling::{format_interval, Card, DueDate, HistoryOutcome};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in `color` when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Shorten to `width` characters, ending in "..." when cut
pub fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let kept: String = single_line.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// First 8 characters of a card id, enough to address it
pub fn short_id(card: &Card) -> String {
    card.id.to_string()[..8].to_string()
}

/// "overdue 3d", "today", "in 2w" or "retired"
pub fn due_label(due: DueDate, today: NaiveDate, use_color: bool) -> String {
    match due.days_overdue(today) {
        None => paint("retired", Color::GRAY, use_color),
        Some(0) => paint("today", Color::YELLOW, use_color),
        Some(late) if late > 0 => paint(&format!("overdue {}", format_interval(late)), Color::RED, use_color),
        Some(early) => format!("in {}", format_interval(-early)),
    }
}

pub fn outcome_label(outcome: HistoryOutcome, use_color: bool) -> String {
    match outcome {
        HistoryOutcome::Correct => paint("correct", Color::GREEN, use_color),
        HistoryOutcome::Wrong => paint("wrong", Color::RED, use_color),
        HistoryOutcome::Graduated => paint("graduated", Color::CYAN, use_color),
    }
}

/// Print an aligned table of cards
pub fn print_cards(cards: &[Card], today: NaiveDate, use_color: bool) {
    let content_width = cards
        .iter()
        .map(|c| c.content.chars().count())
        .max()
        .unwrap_or(7)
        .clamp(7, 40);

    println!("{:<8} {:<cw$} {:>5} {:<14} {}",
        "ID", "Content", "Level", "Profile", "Due",
        cw = content_width);
    println!("{} {} {} {} {}",
        "\u{2500}".repeat(8),
        "\u{2500}".repeat(content_width),
        "\u{2500}".repeat(5),
        "\u{2500}".repeat(14),
        "\u{2500}".repeat(12));

    for card in cards {
        println!("{:<8} {:<cw$} {:>5} {:<14} {}",
            short_id(card),
            truncate(&card.content, content_width),
            card.streak,
            truncate(&card.profile_id, 14),
            due_label(card.next_review_date, today, use_color),
            cw = content_width);
    }
}

/// JSON view of a card for `--format json`
pub fn card_json(card: &Card) -> serde_json::Value {
    serde_json::to_value(card).unwrap_or(serde_json::Value::Null)
}
