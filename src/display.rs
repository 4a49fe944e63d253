use crate::history::{Message, Role};
use crate::models::ModelInfo;
use chrono::{DateTime, Local, Utc};
use console::{Color, style};

/// Map a `#rrggbb` accent color onto the xterm 256-color cube.
fn accent_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    // Cube starts at index 16 with channel levels 0, 95, 135, 175, 215, 255
    fn level(v: u8) -> u8 {
        if v < 48 {
            0
        } else if v < 115 {
            1
        } else {
            ((v as u16 - 35) / 40) as u8
        }
    }

    Some(Color::Color256(16 + 36 * level(r) + 6 * level(g) + level(b)))
}

/// Print the model badge tinted with the model's accent color.
pub fn display_model_badge(model: &ModelInfo) {
    let badge = format!(" {} ", model.display_name);
    let styled = match accent_color(&model.accent_color) {
        Some(color) => style(badge).bg(color).white().bold(),
        None => style(badge).bold(),
    };
    println!("{}", styled);
}

fn format_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Print one transcript line with a role label and the local send time.
pub fn display_message(message: &Message) {
    let label = match message.role {
        Role::User => style("You").bold().green(),
        Role::Assistant => style("Bot").bold().blue(),
    };
    println!(
        "{} {}  {}",
        label,
        style(format_time(&message.timestamp)).dim(),
        message.content
    );
}

/// Render an assistant reply, as markdown when it looks like markdown.
pub fn display_reply(content: &str) {
    if content.contains("```")
        || content.contains('*')
        || content.contains('`')
        || content.contains('#')
    {
        termimad::print_text(content);
    } else {
        println!("{}", content);
    }
}

/// Print an advisory error line.
pub fn display_error(text: &str) {
    eprintln!("{} {}", style("✖").bold().red(), style(text).red());
}
