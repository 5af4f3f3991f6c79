use super::ui;
use crate::core::Converter;
use crate::core::record::ConversionRecord;
use comfy_table::Cell;

/// Renders up to `limit` records, most recent first.
pub fn history_table<'a>(records: impl Iterator<Item = &'a ConversionRecord>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time"),
        ui::header_cell("From"),
        ui::header_cell("To"),
        ui::header_cell("Amount"),
        ui::header_cell("Result"),
        ui::header_cell("Rate"),
        ui::header_cell("Source"),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&record.from_currency),
            Cell::new(&record.to_currency),
            ui::amount_cell(record.amount),
            ui::amount_cell(record.result),
            ui::format_optional_cell(record.rate, ui::format_rate),
            ui::demo_cell(record.is_demo),
        ]);
    }

    table.to_string()
}

pub fn run(converter: &mut Converter, limit: usize, clear: bool) -> anyhow::Result<()> {
    if clear {
        converter.clear_history();
        println!("Conversion history cleared.");
        return Ok(());
    }

    let history = converter.history();
    if history.is_empty() {
        println!("No conversions recorded yet.");
        return Ok(());
    }
    if limit == 0 {
        println!("{} conversions recorded.", history.len());
        return Ok(());
    }

    println!(
        "\n{} {}",
        ui::style_text("Conversion history", ui::StyleType::Title),
        ui::style_text(
            &format!("(latest {} of {})", limit.min(history.len()), history.len()),
            ui::StyleType::Subtle
        )
    );
    println!("{}", history_table(history.recent(limit)));
    Ok(())
}
