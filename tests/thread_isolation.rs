//! Integration tests for per-thread isolation of registry values.
//!
//! Each thread only ever observes the values it stored itself, even when many
//! threads share the same keys.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;

use thread_scoped_registry::{Registry, RegistryEvent, ThreadCell};

#[derive(Debug, PartialEq, Eq)]
struct Handle(&'static str);

#[test]
fn test_never_used_key_is_absent_everywhere() {
    let registry: Registry<&str, Handle> = Registry::new();

    assert!(registry.get(&"conn-1").is_none());
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| assert!(registry.get(&"conn-1").is_none()));
        }
    });
    assert!(!registry.contains_key(&"conn-1"));
}

#[test]
fn test_connection_scenario() {
    let registry: Registry<&str, Handle> = Registry::new();

    // (thread A sends, thread B waits) then (B sends, A waits), so the puts
    // happen in the scenario's order
    let (a_done, b_start) = mpsc::channel();
    let (b_done, a_continue) = mpsc::channel();
    let check = Barrier::new(2);
    let (registry, check) = (&registry, &check);

    thread::scope(|s| {
        s.spawn(move || {
            registry.put("conn-1", Handle("A"));
            a_done.send(()).unwrap();
            a_continue.recv().unwrap();
            registry.put("conn-2", Handle("C"));
            check.wait();

            assert_eq!(registry.get(&"conn-1").as_deref(), Some(&Handle("A")));
            assert_eq!(registry.get(&"conn-2").as_deref(), Some(&Handle("C")));
        });

        s.spawn(move || {
            b_start.recv().unwrap();
            registry.put("conn-1", Handle("B"));
            b_done.send(()).unwrap();
            check.wait();

            assert_eq!(registry.get(&"conn-1").as_deref(), Some(&Handle("B")));
            assert!(registry.get(&"conn-2").is_none());
        });
    });
}

#[test]
fn test_overwrite_only_affects_calling_thread() {
    let registry: Registry<&str, u32> = Registry::new();
    registry.put("k", 1);
    registry.put("k", 1);
    assert_eq!(registry.get_cloned(&"k"), Some(1));

    let stored = Barrier::new(2);
    let overwritten = Barrier::new(2);

    thread::scope(|s| {
        s.spawn(|| {
            registry.put("k", 100);
            stored.wait();
            overwritten.wait();
            // Main thread's overwrite is not visible here
            assert_eq!(registry.get_cloned(&"k"), Some(100));
        });

        stored.wait();
        registry.put("k", 2);
        overwritten.wait();
    });

    assert_eq!(registry.get_cloned(&"k"), Some(2));
}

#[test]
fn test_no_cross_contamination_between_keys() {
    let registry: Registry<u64, u64> = Registry::new();
    registry.put(1, 10);

    assert!(registry.get(&2).is_none());

    registry.put(2, 20);
    assert_eq!(registry.get_cloned(&1), Some(10));
    assert_eq!(registry.get_cloned(&2), Some(20));
}

#[test]
fn test_creation_race_yields_one_cell() {
    const THREADS: usize = 16;

    let registry: Arc<Registry<&'static str, usize>> = Arc::new(Registry::new());
    let created = Arc::new(AtomicUsize::new(0));

    let created_clone = created.clone();
    registry.set_trace_callback(move |event| {
        if let RegistryEvent::CellCreated { .. } = event {
            created_clone.fetch_add(1, Ordering::SeqCst);
        }
    });

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.put("contended", i);

                assert_eq!(registry.get_cloned(&"contended"), Some(i));
                registry.cell(&"contended").unwrap()
            })
        })
        .collect();

    let cells: Vec<ThreadCell<usize>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(cells.iter().all(|c| ThreadCell::ptr_eq(c, &cells[0])));
}

#[test]
fn test_multiple_registries_are_isolated() {
    let database: Registry<&str, String> = Registry::new();
    let cache: Registry<&str, String> = Registry::new();

    database.put("primary", "postgresql://localhost".to_string());

    assert!(database.contains_key(&"primary"));
    assert!(!cache.contains_key(&"primary"));
    assert!(cache.get(&"primary").is_none());
}

#[test]
fn test_registry_shared_through_arc() {
    let registry = Arc::new(Registry::<String, Vec<u8>>::new());

    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                registry.put("buffer".to_string(), vec![i; 4]);
                registry.get_cloned("buffer")
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(vec![i as u8; 4]));
    }

    // The spawning thread never stored anything
    assert!(registry.get("buffer").is_none());
}
