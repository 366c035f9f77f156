//! Error message formatting

use rusty_trade::error::TradeError;

#[test]
fn test_source_unavailable() {
    let err = TradeError::unavailable("RATES.xml", "No such file or directory");
    let msg = err.to_string();
    assert!(msg.contains("Source unavailable"));
    assert!(msg.contains("RATES.xml"));
    assert!(msg.contains("No such file"));
}

#[test]
fn test_malformed_amount() {
    let err = TradeError::MalformedAmount {
        value: "12,50".to_string(),
        reason: "Invalid decimal".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("Malformed amount"));
    assert!(msg.contains("'12,50'"));
}

#[test]
fn test_unknown_currency() {
    let err = TradeError::UnknownCurrency {
        currency: "GBP".to_string(),
    };
    assert_eq!(err.to_string(), "Unknown currency: GBP has no conversion to USD");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: TradeError = io.into();
    assert!(matches!(err, TradeError::IoError(_)));
    assert!(err.to_string().contains("denied"));
}

#[test]
fn test_malformed_data_and_config() {
    assert_eq!(
        TradeError::MalformedData("bad row".to_string()).to_string(),
        "Malformed data: bad row"
    );
    assert_eq!(
        TradeError::ConfigError("item must not be empty".to_string()).to_string(),
        "Configuration error: item must not be empty"
    );
}
