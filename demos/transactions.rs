//! Config-driven logging with transactions
//!
//! Loads a driver configuration (from the path given as the first argument,
//! or a built-in console + file setup), then logs plain and transactional
//! records through every driver that came up.
//!
//! Run with: cargo run --example transactions [-- config.json]

use rust_driver_logger::prelude::*;
use rust_driver_logger::{create_manager_from_file, info, warn};
use std::env;

fn default_config() -> Result<Config> {
    let log_path = env::temp_dir().join("rust_driver_logger_demo.log");
    let json = serde_json::json!({
        "drivers": {
            "console": { "userReadableTime": true },
            "file": { "filePath": log_path }
        }
    });
    println!("Writing file output to {}\n", log_path.display());
    json.to_string().parse()
}

fn main() -> Result<()> {
    println!("=== Rust Driver Logger - Transactions Example ===\n");

    let factories = builtin_factories();
    let init = match env::args().nth(1) {
        Some(path) => create_manager_from_file(&factories, path)?,
        None => create_manager_with_config(&factories, &default_config()?)?,
    };

    for failed in init.failures() {
        eprintln!("driver '{}' unavailable: {}", failed.id, failed.error);
    }
    let mut logger = Logger::new(init.into_manager());
    println!("Active drivers: {:?}\n", logger.manager().driver_names());

    logger.info("Hello, world!");

    let tx = logger.begin_transaction(&Record::new().with("UserID", "123"));
    warn!(tx, "Doing something in TX {}", tx.id());

    let tx2 = logger.begin_transaction_with_component(
        &Record::new().with("UserID", "456"),
        "worker",
    );
    tx.end_transaction();

    logger.debug("Outside TX");
    info!(tx2, "Doing something in TX {}", tx2.id());
    logger.error("Error");
    tx2.end_transaction();

    let metrics = logger.metrics();
    println!(
        "\nDispatched {} records, {} transactions begun, {} ended",
        metrics.records_dispatched(),
        metrics.transactions_begun(),
        metrics.transactions_ended()
    );

    logger.stop();
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
