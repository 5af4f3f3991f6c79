use std::fs;
use std::path::Path;
use tracing::info;
use xfx::core::api_key::resolve_api_key;
use xfx::core::{ConversionRecord, Converter};
use xfx::core::config::AppConfig;
use xfx::core::fallback::fallback_currencies;

mod test_utils {
    use std::path::Path;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // The key segment is whatever the environment or config supplies
    pub async fn mount_endpoint(server: &MockServer, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path_regex(format!("^/[^/]+/{endpoint}$")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let history_path = dir.join("history").join("conversion_history.json");
        let config_content = format!(
            r#"
api_key: "integration-key"
providers:
  exchangerate:
    base_url: "{}"
timeout_secs: 2
history_path: "{}"
"#,
            base_url,
            history_path.display()
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }

    /// An address nothing listens on.
    pub const UNREACHABLE: &str = "http://127.0.0.1:1";
}

fn read_history(dir: &Path) -> Vec<ConversionRecord> {
    let path = dir.join("history").join("conversion_history.json");
    serde_json::from_str(&fs::read_to_string(path).expect("history file exists"))
        .expect("history file is valid JSON")
}

fn load_config(path: &Path) -> AppConfig {
    AppConfig::load_from_path(path).expect("config loads")
}

fn converter_for(config: &AppConfig) -> Converter {
    xfx::build_converter(config, resolve_api_key(config)).expect("converter builds")
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_endpoint(
        &mock_server,
        "pair/USD/EUR/10",
        200,
        r#"{"result": "success", "conversion_rate": 0.9281, "conversion_result": 9.281}"#,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());

    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            from: "usd".to_string(),
            to: "eur".to_string(),
            amount: 10.0,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let history = read_history(dir.path());
    info!(?history, "Persisted history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_currency, "USD");
    assert_eq!(history[0].to_currency, "EUR");
    assert_eq!(history[0].result, 9.281);
    assert_eq!(history[0].rate, Some(0.9281));
    assert!(!history[0].is_demo);
}

#[test_log::test(tokio::test)]
async fn test_unreachable_service_uses_demo_rates() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), test_utils::UNREACHABLE);
    let mut converter = converter_for(&load_config(&config_path));

    let conversion = converter.convert("USD", "RUB", 100.0).await.unwrap();
    assert_eq!(conversion.result, 9250.0);
    assert!(conversion.is_demo);

    assert_eq!(converter.get_rate("EUR", "USD").await, Ok(1.07));
    assert_eq!(converter.get_rate("JPY", "JPY").await, Ok(1.0));

    let history = read_history(dir.path());
    assert_eq!(history.len(), 1);
    assert!(history[0].is_demo);
    assert_eq!(history[0].rate, Some(92.5));
}

#[test_log::test(tokio::test)]
async fn test_api_business_failure_uses_demo_rates() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_endpoint(
        &mock_server,
        "pair/EUR/RUB/2",
        200,
        r#"{"result": "error", "error-type": "quota-reached"}"#,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());
    let mut converter = converter_for(&load_config(&config_path));

    let conversion = converter.convert("EUR", "RUB", 2.0).await.unwrap();
    assert_eq!(conversion.result, 198.0);
    assert_eq!(conversion.rate, Some(99.0));
    assert!(conversion.is_demo);
}

#[test_log::test(tokio::test)]
async fn test_invalid_input_makes_no_requests() {
    use wiremock::matchers::any;
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = wiremock::MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());
    let mut converter = converter_for(&load_config(&config_path));

    for amount in [0.0, -1.0, f64::NAN] {
        assert!(matches!(
            converter.convert("USD", "EUR", amount).await,
            Err(xfx::core::ConvertError::InvalidAmount(_))
        ));
    }
    let same = converter.convert("GBP", "GBP", 42.5).await.unwrap();
    assert_eq!(same.result, 42.5);

    let result = xfx::run_command(
        xfx::AppCommand::Convert {
            from: "USD".to_string(),
            to: "EUR".to_string(),
            amount: -3.0,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Amount must be a positive number")
    );

    assert!(converter.history().is_empty());
    assert!(!dir.path().join("history").exists());
    // Mock expectations are verified when the server drops
}

#[test_log::test(tokio::test)]
async fn test_history_survives_restart_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), test_utils::UNREACHABLE);
    let config = load_config(&config_path);

    let pairs = [("USD", "EUR", 1.5), ("GBP", "USD", 20.0), ("RUB", "USD", 1000.0)];
    {
        let mut converter = converter_for(&config);
        for (from, to, amount) in pairs {
            converter.convert(from, to, amount).await.unwrap();
        }
    }

    let converter = converter_for(&config);
    let records = converter.history().records();
    assert_eq!(records.len(), pairs.len());
    for (record, (from, to, amount)) in records.iter().zip(pairs) {
        assert_eq!(record.from_currency, from);
        assert_eq!(record.to_currency, to);
        assert_eq!(record.amount, amount);
    }
    assert_eq!(records, read_history(dir.path()).as_slice());

    let result = xfx::run_command(
        xfx::AppCommand::History {
            limit: 10,
            clear: true,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok());

    assert!(read_history(dir.path()).is_empty());
    let converter = converter_for(&config);
    assert!(converter.history().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_currency_list_from_service() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_endpoint(
        &mock_server,
        "latest/USD",
        200,
        r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": {"USD": 1, "EUR": 0.92, "KZT": 447.1, "AED": 3.6725}
        }"#,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());
    let mut converter = converter_for(&load_config(&config_path));

    let list = converter.fetch_currencies().await;
    assert!(!list.is_fallback);
    assert_eq!(list.codes, vec!["AED", "EUR", "KZT", "USD"]);
    assert_eq!(converter.cached_rates().get("KZT"), Some(&447.1));
}

#[test_log::test(tokio::test)]
async fn test_currency_list_falls_back() {
    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_endpoint(&mock_server, "latest/USD", 403, r#"{"result": "error"}"#).await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = test_utils::write_config(dir.path(), &mock_server.uri());
    let mut converter = converter_for(&load_config(&config_path));

    let list = converter.fetch_currencies().await;
    assert!(list.is_fallback);
    assert_eq!(list.codes, fallback_currencies());

    let result = xfx::run_command(
        xfx::AppCommand::Currencies,
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok());
}

#[test_log::test(tokio::test)]
async fn test_configured_fallback_table() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    let history_path = dir.path().join("history.json");
    let config_content = serde_json::json!({
        "api_key": "integration-key",
        "providers": {"exchangerate": {"base_url": test_utils::UNREACHABLE}},
        "history_path": history_path,
        "fallback_rates": [{"from": "USD", "to": "INR", "rate": 83.0}]
    });
    fs::write(&config_path, config_content.to_string()).unwrap();

    let mut converter = converter_for(&load_config(&config_path));
    let conversion = converter.convert("USD", "INR", 2.0).await.unwrap();
    assert_eq!(conversion.result, 166.0);
    // The built-in table is replaced, not merged
    assert_eq!(converter.get_rate("USD", "RUB").await, Ok(1.0));
}
