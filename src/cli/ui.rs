use crate::core::api_key::PRIMARY_ENV_VAR;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Result,
    Warning,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a right aligned `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

pub fn amount_cell(value: f64) -> Cell {
    Cell::new(format_amount(value)).set_alignment(CellAlignment::Right)
}

/// Marks a row as computed from the demo rate table.
pub fn demo_cell(is_demo: bool) -> Cell {
    if is_demo {
        Cell::new("demo").fg(Color::Yellow)
    } else {
        Cell::new("live").fg(Color::Green)
    }
}

/// Two decimals for ordinary amounts, more precision for tiny ones.
pub fn format_amount(value: f64) -> String {
    if value != 0.0 && value.abs() < 0.01 {
        format!("{value:.6}")
    } else {
        format!("{value:.2}")
    }
}

pub fn format_rate(rate: f64) -> String {
    format!("{rate:.4}")
}

pub fn demo_mode_notice() -> String {
    style_text(
        &format!(
            "Running in demo mode with a shared API key, set {PRIMARY_ENV_VAR} to use your own"
        ),
        StyleType::Warning,
    )
}

pub fn print_demo_mode_notice() {
    eprintln!("{}", demo_mode_notice());
}

/// Creates a spinner shown while waiting on the exchange-rate service.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
