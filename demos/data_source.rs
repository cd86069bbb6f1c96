//! # Built-in DataSource task
//!
//! Demonstrates the pre-registered `DataSource` task:
//! - Extracting a nested value by dotted path
//! - Overriding the `path` option at factory time
//! - The failure messages for missing paths and bad responses

use serde_json::json;
use taskpipe::Registry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let registry = Registry::new();
    let response = json!({
        "status": "ok",
        "result": {
            "rows": [
                {"name": "first"},
                {"name": "second"},
            ]
        }
    });

    let mut picker = registry.factory_with("DataSource", &json!({"path": "result.rows.1.name"}))?;
    picker.process_in(&registry, &response)?;
    println!("picked: {:?}", picker.result());

    let mut missing = registry.factory_with("DataSource", &json!({"path": "result.count"}))?;
    missing.process_in(&registry, &response)?;
    println!("missing path: {:?}", missing.error());

    let mut scalar = registry.factory_with("DataSource", &json!({"path": "anything"}))?;
    scalar.process_in(&registry, &json!("not an object"))?;
    println!("bad response: {:?}", scalar.error());

    Ok(())
}
