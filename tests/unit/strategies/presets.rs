//! Unit tests for the built-in rule sets

use equiscan::indicators::registry::IndicatorRegistry;
use equiscan::models::strategy::ThresholdMode;
use equiscan::signals::decision::TradeParams;
use equiscan::signals::engine::ScanPlan;
use equiscan::signals::filter::EarlyFilter;
use equiscan::strategies::presets;

#[test]
fn test_preset_sizes() {
    assert_eq!(presets::elite().len(), 14);
    assert_eq!(presets::advanced().len(), 16);
    assert_eq!(presets::trend().len(), 10);
}

#[test]
fn test_presets_are_valid_and_resolvable() {
    let registry = IndicatorRegistry::standard();
    for name in presets::PRESET_NAMES {
        let rules = presets::by_name(name).unwrap();
        assert_eq!(rules.name, name);
        rules.validate().unwrap();
        for key in rules.dependencies() {
            assert!(
                registry.producer_of(&key).is_some(),
                "{} references unknown indicator {}",
                name,
                key
            );
        }
    }
}

#[test]
fn test_by_name_ignores_case() {
    assert!(presets::by_name("ELITE").is_some());
    assert!(presets::by_name(" Trend ").is_some());
    assert!(presets::by_name("momentum").is_none());
}

#[test]
fn test_presets_compile_with_200_candle_minimum() {
    for name in presets::PRESET_NAMES {
        let plan = ScanPlan::compile(
            presets::by_name(name).unwrap(),
            ThresholdMode::Strict,
            &IndicatorRegistry::standard(),
            200,
            EarlyFilter::default(),
            TradeParams::default(),
        )
        .unwrap();
        assert_eq!(plan.min_history(), 200, "{}", name);
        assert!(plan.requests().iter().any(|r| r.name == "atr14"));
    }
}
