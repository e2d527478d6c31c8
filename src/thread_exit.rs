//! Thread-exit reclamation of per-thread slots.
//!
//! Every thread that stores its first value into a slot table records a weak
//! reference to that table in a thread-local ledger. When the thread exits the
//! ledger is destroyed, and its destructor purges the thread's slot from every
//! table that is still alive.

use std::cell::RefCell;
use std::sync::Weak;
use std::thread::{self, ThreadId};

/// Number of tracked tables after which dead weak references are pruned.
const PRUNE_EVERY: usize = 64;

/// A slot table that can drop one thread's entry.
pub(crate) trait Reclaim: Send + Sync {
    fn reclaim(&self, thread: ThreadId);
}

struct ExitLedger {
    thread: ThreadId,
    tables: RefCell<Vec<Weak<dyn Reclaim>>>,
}

impl Drop for ExitLedger {
    fn drop(&mut self) {
        // No logging here: subscribers may use thread-locals that are already gone.
        for table in std::mem::take(self.tables.get_mut()) {
            if let Some(table) = table.upgrade() {
                table.reclaim(self.thread);
            }
        }
    }
}

thread_local! {
    static LEDGER: ExitLedger = ExitLedger {
        thread: thread::current().id(),
        tables: RefCell::new(Vec::new()),
    };
}

/// Records `table` for reclamation when the calling thread exits.
///
/// Returns `false` when the thread's locals are already being torn down; the
/// slot then lives until the table itself is dropped.
pub(crate) fn track(table: Weak<dyn Reclaim>) -> bool {
    LEDGER
        .try_with(|ledger| {
            let mut tables = ledger.tables.borrow_mut();
            if tables.len() % PRUNE_EVERY == PRUNE_EVERY - 1 {
                tables.retain(|t| t.strong_count() > 0);
            }
            tables.push(table);
            tracing::trace!(
                thread = ?ledger.thread,
                tracked = tables.len(),
                "tracking slot table for thread exit"
            );
        })
        .is_ok()
}
