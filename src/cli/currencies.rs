use super::ui;
use crate::core::{Converter, CurrencyList};

const CODES_PER_LINE: usize = 12;

pub fn format_currency_list(list: &CurrencyList) -> String {
    let mut lines: Vec<String> = list
        .codes
        .chunks(CODES_PER_LINE)
        .map(|chunk| chunk.join(" "))
        .collect();
    if list.is_fallback {
        lines.push(ui::style_text(
            "Exchange-rate service unavailable, showing common currencies",
            ui::StyleType::Warning,
        ));
    }
    lines.join("\n")
}

pub async fn run(converter: &mut Converter) -> anyhow::Result<()> {
    let pb = ui::new_spinner("Loading currencies");
    let list = converter.fetch_currencies().await;
    pb.finish_and_clear();

    println!(
        "{} {}",
        ui::style_text("Available currencies", ui::StyleType::Title),
        ui::style_text(&format!("({})", list.codes.len()), ui::StyleType::Subtle)
    );
    println!("{}", format_currency_list(&list));
    Ok(())
}
