//! Unit tests for the indicator registry

use equiscan::indicators::error::IndicatorError;
use equiscan::indicators::registry::{max_warmup, IndicatorRegistry};
use equiscan::models::indicators::{IndicatorKind, IndicatorRequest};

#[test]
fn test_standard_catalogue_resolves_component_keys() {
    let registry = IndicatorRegistry::standard();
    assert_eq!(registry.producer_of("macd_signal").unwrap().name, "macd");
    assert_eq!(registry.producer_of("dmi_plus_di").unwrap().name, "dmi");
    assert_eq!(registry.producer_of("bb_lower").unwrap().name, "bb");
    assert!(registry.producer_of("macd").is_none());
}

#[test]
fn test_select_dedupes_and_keeps_catalogue_order() {
    let registry = IndicatorRegistry::standard();
    let selected = registry
        .select(["rsi14", "macd_line", "ema5", "macd_signal"])
        .unwrap();
    let names: Vec<&str> = selected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["ema5", "rsi14", "macd"]);
}

#[test]
fn test_select_unknown_output() {
    let registry = IndicatorRegistry::standard();
    assert_eq!(
        registry.select(["ema7"]),
        Err(IndicatorError::UnknownOutput("ema7".to_string()))
    );
}

#[test]
fn test_register_rejects_colliding_outputs() {
    let mut registry = IndicatorRegistry::standard();
    let err = registry
        .register(IndicatorRequest::new("ema5", IndicatorKind::Ema { span: 8 }))
        .unwrap_err();
    assert_eq!(err, IndicatorError::DuplicateOutput("ema5".to_string()));
}

#[test]
fn test_register_specs_adds_custom_indicator() {
    let mut registry = IndicatorRegistry::standard();
    registry
        .register_specs(&["ema8=ema:8", "fast=macd:5,13,4"][..])
        .unwrap();
    assert_eq!(
        registry.producer_of("ema8").unwrap().kind,
        IndicatorKind::Ema { span: 8 }
    );
    assert!(registry.producer_of("fast_histogram").is_some());
}

#[test]
fn test_register_rejects_invalid_parameters() {
    let mut registry = IndicatorRegistry::new();
    assert!(registry.register_specs(&["bad=macd:26,12,9"][..]).is_err());
    assert!(registry.register_specs(&["zero=sma:0"][..]).is_err());
    assert!(registry.requests().is_empty());
}

#[test]
fn test_max_warmup() {
    let registry = IndicatorRegistry::standard();
    let requests = registry.select(["sma200", "stoch_rsi14", "high300"]).unwrap();
    assert_eq!(max_warmup(&requests), 200);
    assert_eq!(max_warmup(&[]), 0);
}
