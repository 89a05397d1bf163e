use std::sync::Arc;

use tally_mastery::config::Config;
use tally_mastery::{logging, MasteryEngine, SqliteLedger};

const DEFAULT_FOCUS: usize = 3;

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    let _log_guard = logging::init_tracing(&config.log_level, config.log_dir.as_deref());

    let mut args = std::env::args().skip(1);
    let Some(profile_id) = args.next() else {
        eprintln!("usage: tally-mastery <profile-id> [max-focus]");
        std::process::exit(2);
    };
    let max = args
        .next()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(DEFAULT_FOCUS);

    let engine_config = match config.engine_config() {
        Ok(c) => c,
        Err(err) => {
            tracing::error!(error = %err, "engine config rejected");
            std::process::exit(1);
        }
    };

    let ledger = match SqliteLedger::open(&config.db_path).await {
        Ok(ledger) => Arc::new(ledger),
        Err(err) => {
            tracing::error!(error = %err, path = %config.db_path.display(), "failed to open mastery ledger");
            std::process::exit(1);
        }
    };

    let engine = MasteryEngine::new(Arc::clone(&ledger), engine_config);

    let progress = match engine.get_curriculum_progress(&profile_id).await {
        Ok(progress) => progress,
        Err(err) => {
            tracing::error!(error = %err, profile_id = %profile_id, "curriculum progress failed");
            std::process::exit(1);
        }
    };

    let focus = engine.get_recommended_focus_from(&progress, max);

    let report = serde_json::json!({
        "progress": progress,
        "focus": focus,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(text) => println!("{text}"),
        Err(err) => tracing::error!(error = %err, "failed to render report"),
    }

    ledger.close().await;
}
