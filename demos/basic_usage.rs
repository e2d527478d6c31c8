//! Basic usage example for thread-scoped-registry.
//!
//! Demonstrates:
//! - Storing values with `put()` and reading them back with `get()` (returns `Arc<V>`)
//! - Retrieving cloned values with `get_cloned()` (returns `V`)
//! - Checking key existence with `contains_key()`
//! - Thread isolation of values stored under the same key
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::Arc;
use std::thread;

use thread_scoped_registry::{Registry, RegistryMaintenance};

#[derive(Debug, Clone, PartialEq)]
struct Session {
    user: String,
    attempts: u32,
}

fn main() {
    println!("=== thread-scoped-registry: Basic Usage ===\n");

    let registry: Registry<&str, Session> = Registry::new();

    // -------------------------------------------------------------------------
    // 1. Store and read back on the same thread
    // -------------------------------------------------------------------------
    println!("1. Storing a session for the main thread...");

    registry.put(
        "session",
        Session {
            user: "main".to_string(),
            attempts: 1,
        },
    );

    let session: Arc<Session> = registry.get(&"session").unwrap();
    println!("   Retrieved: {:?}", session);

    // -------------------------------------------------------------------------
    // 2. Other threads see their own slot only
    // -------------------------------------------------------------------------
    println!("\n2. Reading the same key from a worker thread...");

    thread::scope(|s| {
        s.spawn(|| {
            println!(
                "   Worker before put: {:?}",
                registry.get_cloned(&"session")
            );
            registry.put(
                "session",
                Session {
                    user: "worker".to_string(),
                    attempts: 7,
                },
            );
            println!("   Worker after put:  {:?}", registry.get_cloned(&"session"));
        });
    });

    println!("   Main still sees:   {:?}", registry.get_cloned(&"session"));

    // -------------------------------------------------------------------------
    // 3. Key existence and maintenance
    // -------------------------------------------------------------------------
    println!("\n3. Checking keys...");

    println!("   contains 'session': {}", registry.contains_key(&"session"));
    println!("   contains 'other':   {}", registry.contains_key(&"other"));
    println!("   cell count:         {}", registry.cell_count());

    // -------------------------------------------------------------------------
    // 4. Dispose
    // -------------------------------------------------------------------------
    let released = registry.close();
    println!("\n4. Closed registry, released {} cell(s)", released);

    println!("\n=== Example completed successfully! ===");
}
