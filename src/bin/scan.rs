//! Equiscan
//!
//! Runs one scan over the configured symbol universe, prints the ranked
//! results, optionally writes them as CSV and sends a Telegram digest.

use dotenvy::dotenv;
use equiscan::config::ScreenerConfig;
use equiscan::core::runtime::{ScanError, ScanReport, ScreenerRuntime};
use equiscan::indicators::registry::IndicatorRegistry;
use equiscan::jobs::context::JobContext;
use equiscan::logging;
use equiscan::metrics::Metrics;
use equiscan::services::cache::CachedProvider;
use equiscan::services::export::write_csv;
use equiscan::services::market_data::MarketDataProvider;
use equiscan::services::notification::{
    build_digest, deliver, DigestContext, TelegramNotifier, DEFAULT_DIGEST_LIMIT,
};
use equiscan::services::upstox::UpstoxMarketDataProvider;
use equiscan::signals::engine::ScanPlan;
use equiscan::signals::ranking::ResultRanker;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let env = equiscan::config::get_environment();
    info!(environment = %env, "Starting Equiscan");

    let config = ScreenerConfig::from_env()?;
    let symbols = config.load_symbols()?;
    let rules = config.load_rule_set()?;
    info!(
        symbols = symbols.len(),
        rule_set = %rules.name,
        rules = rules.len(),
        "Configuration loaded"
    );

    let token = config
        .upstox_token
        .clone()
        .ok_or("UPSTOX_ACCESS_TOKEN must be set")?;
    let upstox =
        UpstoxMarketDataProvider::new(&config.upstox_base_url, token, config.fetch_timeout())?;
    let provider = CachedProvider::new(upstox, config.cache_ttl());

    // Fail fast on expired credentials before touching the universe
    if let Err(e) = provider.check_connection().await {
        error!(error = %e, "Upstox preflight failed");
        return Err(format!("Upstox preflight failed: {}", e).into());
    }

    let threshold = config.threshold();
    let plan = ScanPlan::compile(
        rules,
        threshold,
        &IndicatorRegistry::standard(),
        config.min_candles,
        config.filter,
        config.trade_params(),
    )?;

    let metrics = Arc::new(Metrics::new()?);
    let plan = Arc::new(plan);
    let context = JobContext::new(
        Arc::new(provider),
        plan.clone(),
        config.lookback_days,
        config.fetch_timeout(),
    )
    .with_metrics(metrics.clone());

    let runtime = ScreenerRuntime::new(Arc::new(context))
        .with_concurrency(config.concurrency)
        .with_ranker(ResultRanker::new(config.sort));

    let (report, auth_failure) = match runtime.run(&symbols).await {
        Ok(report) => (report, None),
        Err(ScanError::Auth { message, partial }) => (*partial, Some(message)),
    };

    print_report(&report);

    if let Some(ref path) = config.output {
        match write_csv(path, &report.results, &config.export_columns) {
            Ok(()) => info!(path = %path.display(), rows = report.results.len(), "CSV written"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to write CSV"),
        }
    }

    if let (Some(token), Some(chat_id)) = (&config.telegram_bot_token, &config.telegram_chat_id) {
        let digest = build_digest(
            &report.results,
            &report.summary,
            &DigestContext {
                rule_set: plan.rules.name.clone(),
                required: threshold.required(plan.total_conditions()),
                total: plan.total_conditions(),
                min_history: plan.min_history(),
                price_floor: config.filter.price_floor,
                volume_floor: config.filter.volume_floor,
                limit: DEFAULT_DIGEST_LIMIT,
            },
        );
        // Notification problems are logged and never fail the scan.
        match TelegramNotifier::new(token.as_str(), chat_id.as_str()) {
            Ok(notifier) => {
                deliver(&notifier, &digest).await;
            }
            Err(e) => warn!(error = %e, "Telegram notifier unavailable"),
        }
    }

    match metrics.export() {
        Ok(text) => debug!(metrics = %text, "Scan metrics"),
        Err(e) => warn!(error = %e, "Failed to export metrics"),
    }

    if let Some(message) = auth_failure {
        return Err(format!("scan aborted, authentication failed: {}", message).into());
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    if report.results.is_empty() {
        println!("No symbols met the threshold.");
    } else {
        println!(
            "{:<4} {:<14} {:>7} {:>10} {:>10} {:>10} {:>5} {:>6} {:>7}",
            "#", "SYMBOL", "MET", "ENTRY", "STOP", "TARGET", "R:R", "RSI", "VOL_X"
        );
        for (i, r) in report.results.iter().enumerate() {
            println!(
                "{:<4} {:<14} {:>7} {:>10.2} {:>10.2} {:>10.2} {:>5} {:>6} {:>7}",
                i + 1,
                r.symbol,
                r.ratio_label(),
                r.entry_price,
                r.stop_loss,
                r.target,
                r.risk_reward().map_or("-".to_string(), |v| format!("{:.1}", v)),
                r.aux.rsi.map_or("-".to_string(), |v| format!("{:.1}", v)),
                r.aux
                    .volume_ratio
                    .map_or("-".to_string(), |v| format!("{:.2}", v)),
            );
        }
    }
    println!();
    println!("{}", report.summary);
}
