//! # Example: basic_launch
//!
//! Demonstrates fault containment for spawned and synchronous work.
//!
//! Shows how to:
//! - Build a [`TaskGuard`] with a closure handler ([`HandlerFn`]).
//! - Launch a panicking future and keep the process running.
//! - Wrap a result-returning callable and inspect [`WorkError`].
//!
//! ## Flow
//! ```text
//! guard.launch("worker", fut)
//!     ├─► fut panics ──► Trap + location
//!     ├─► FaultReport ──► Dispatcher::dispatch()
//!     │                     └─► "printer".handle()
//!     └─► task ends normally
//!
//! guard.wrap_result("parse", Some(f))()
//!     ├─► Ok(v)        ─► Ok(v)
//!     ├─► Err(e)       ─► WorkError::Failed(e)
//!     └─► panic        ─► dispatch (blocking) ─► WorkError::Trapped(trap)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_launch
//! ```

use std::{sync::Arc, time::Duration};
use taskguard::{FaultReport, GuardConfig, HandlerError, HandlerFn, HandlerRef, TaskGuard};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let printer: HandlerRef = HandlerFn::arc(
        "printer",
        |report: Arc<FaultReport>, _ctx: CancellationToken| async move {
            println!(
                "[printer] report={} source={} cause={}",
                report.id, report.source, report.cause
            );
            Ok::<_, HandlerError>(())
        },
    );

    let cfg = GuardConfig::default()
        .with_stack_trace(false)
        .with_handler_timeout(Duration::from_secs(1));
    let guard = TaskGuard::builder(cfg).with_handlers(vec![printer]).build()?;

    // Spawned work: the panic stays inside the task.
    guard
        .launch("worker", async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            panic!("worker lost its connection");
        })
        .await?;
    println!("[main] worker task finished normally");

    // Synchronous work with its own error type.
    let parse = guard.wrap_result(
        "parse",
        Some(|| -> Result<u32, String> {
            let raw = "not-a-number";
            if raw.is_empty() {
                return Err("empty input".to_string());
            }
            Ok(raw.parse::<u32>().unwrap())
        }),
    );
    match tokio::task::spawn_blocking(parse).await? {
        Ok(v) => println!("[main] parsed {v}"),
        Err(e) => println!("[main] parse {}: {}", e.as_label(), e),
    }

    Ok(())
}
