//! Per-thread connection handles.
//!
//! A resource manager keeps one connection per worker thread and data source.
//! The registry stores the handles; the manager decides when to open them.
//!
//! Run with: `RUST_LOG=debug cargo run --example per_thread_connections`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use thread_scoped_registry::{Registry, RegistryConfig, RegistryEvent};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Connection {
    id: u64,
    data_source: String,
    thread: thread::ThreadId,
}

impl Drop for Connection {
    fn drop(&mut self) {
        // Runs during thread teardown for worker connections, so avoid the subscriber
        println!("closing connection #{} ({})", self.id, self.data_source);
    }
}

/// Hands out one connection per (thread, data source).
struct ConnectionManager {
    handles: Registry<String, Connection>,
    next_id: AtomicU64,
}

impl ConnectionManager {
    fn new() -> Self {
        let config = RegistryConfig::default().with_initial_capacity(4);
        let handles = Registry::with_config(config).unwrap_or_default();

        handles.set_trace_callback(|event| {
            if let RegistryEvent::CellCreated { .. } = event {
                tracing::info!("{event}");
            }
        });

        Self {
            handles,
            next_id: AtomicU64::new(1),
        }
    }

    fn connection(&self, data_source: &str) -> Arc<Connection> {
        self.handles
            .get_or_put_with(data_source.to_string(), || self.open(data_source))
    }

    fn open(&self, data_source: &str) -> Connection {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::info!(id, data_source, "opening connection");
        Connection {
            id,
            data_source: data_source.to_string(),
            thread: thread::current().id(),
        }
    }

    fn shutdown(self) {
        let released = self.handles.close();
        tracing::info!(released, "connection manager stopped");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let manager = ConnectionManager::new();

    thread::scope(|s| {
        let workers: Vec<_> = (0..3)
            .map(|worker| {
                let manager = &manager;
                s.spawn(move || {
                    for _ in 0..2 {
                        let orders = manager.connection("jdbc/orders");
                        let users = manager.connection("jdbc/users");
                        assert_eq!(orders.thread, thread::current().id());
                        println!(
                            "worker {worker}: orders -> #{}, users -> #{}",
                            orders.id, users.id
                        );
                    }
                })
            })
            .collect();

        // Joining waits for each worker's connections to be closed on exit
        for handle in workers {
            handle.join().unwrap();
        }
    });

    let main_orders = manager.connection("jdbc/orders");
    println!("main: orders -> #{}", main_orders.id);
    drop(main_orders);

    manager.shutdown();
}
