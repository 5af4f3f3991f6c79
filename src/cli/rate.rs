use super::ui;
use crate::core::{ConvertError, Converter};

pub async fn run(converter: &Converter, from: &str, to: &str) -> Result<(), ConvertError> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();

    let pb = ui::new_spinner(&format!("Fetching {from}/{to} rate"));
    let rate = converter.get_rate(&from, &to).await;
    pb.finish_and_clear();
    let rate = rate?;

    println!(
        "1 {from} = {}",
        ui::style_text(
            &format!("{} {to}", ui::format_rate(rate)),
            ui::StyleType::Result
        )
    );
    Ok(())
}
