//! # Simple data processing pipeline
//!
//! Demonstrates basic taskpipe features:
//! - Registering function-backed tasks
//! - Composing them into a named chain
//! - Result threading and first-failure short-circuit
//! - The apply outcome shapes

use serde_json::{Value, json};
use taskpipe::{Handler, Registry, Task, apply_in};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let registry = Registry::new();

    registry.register(
        "trim",
        Handler::func(|data: &Value, task: &mut Task| {
            match data.as_str() {
                Some(s) => task.set_process_result(json!(s.trim())),
                None => task.set_process_error("Data must be a string"),
            }
            Ok(())
        }),
    );

    registry.register(
        "shout",
        Handler::func(|data: &Value, task: &mut Task| {
            match data.as_str() {
                Some(s) => task.set_process_result(json!(s.to_uppercase())),
                None => task.set_process_error("Data must be a string"),
            }
            Ok(())
        }),
    );

    registry.register("clean", Handler::sequence(["trim", "shout"]));

    let outcome = apply_in(&registry, &json!("  hello pipeline  "), ["clean"])?;
    println!("success outcome: {}", serde_json::to_string(&outcome)?);

    // A non-string stops the chain at the first step; "shout" never runs.
    let outcome = apply_in(&registry, &json!(42), ["clean"])?;
    println!("failure outcome: {}", serde_json::to_string(&outcome)?);

    Ok(())
}
