use super::{history, ui};
use crate::core::{Conversion, ConvertError, Converter};
use crate::store::HistoryStore;

const RECENT_ROWS: usize = 10;

pub fn format_conversion(from: &str, to: &str, amount: f64, conversion: &Conversion) -> String {
    let mut out = format!(
        "{} {} = {}",
        ui::format_amount(amount),
        from,
        ui::style_text(
            &format!("{} {}", ui::format_amount(conversion.result), to),
            ui::StyleType::Result
        )
    );
    if let Some(rate) = conversion.rate {
        out.push_str(&format!("\n1 {from} = {} {to}", ui::format_rate(rate)));
    }
    if conversion.is_demo {
        out.push_str(&format!(
            "\n{}",
            ui::style_text(
                "Exchange-rate service unavailable, demo rate used",
                ui::StyleType::Warning
            )
        ));
    }
    out
}

/// Converts `amount` and prints the result followed by the latest history rows.
pub async fn run(
    converter: &mut Converter,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<(), ConvertError> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();

    let pb = ui::new_spinner(&format!("Converting {from} to {to}"));
    let result = converter.convert(&from, &to, amount).await;
    pb.finish_and_clear();
    let conversion = result?;

    println!("{}", format_conversion(&from, &to, amount, &conversion));

    let store = converter.history();
    if !store.is_empty() {
        println!(
            "\n{}",
            ui::style_text("Recent conversions", ui::StyleType::Title)
        );
        println!("{}", recent_history_table(store));
    }
    Ok(())
}

fn recent_history_table(store: &HistoryStore) -> String {
    history::history_table(store.recent(RECENT_ROWS))
}
