//! Per-line mutual exclusion.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::LineId;

/// One async mutex per line, created on first use.
///
/// Edits are planned against a snapshot of a line's sections, so two
/// concurrent edits of the same line must not interleave between the read
/// and the write. Different lines never contend.
#[derive(Debug, Default)]
pub struct LineLocks {
    inner: Mutex<HashMap<LineId, Arc<Mutex<()>>>>,
}

impl LineLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `line_id`. Held until the guard drops.
    pub async fn lock(&self, line_id: LineId) -> OwnedMutexGuard<()> {
        let line_lock = {
            let mut map = self.inner.lock().await;
            map.entry(line_id).or_default().clone()
        };
        line_lock.lock_owned().await
    }

    /// Drop the lock entry of a deleted line.
    pub async fn forget(&self, line_id: LineId) {
        self.inner.lock().await.remove(&line_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_line_is_exclusive() {
        let locks = LineLocks::new();
        let guard = locks.lock(LineId(1)).await;

        let second = tokio::time::timeout(Duration::from_millis(20), locks.lock(LineId(1))).await;
        assert!(second.is_err(), "second lock on the same line must wait");

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(200), locks.lock(LineId(1))).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn different_lines_do_not_contend() {
        let locks = LineLocks::new();
        let _a = locks.lock(LineId(1)).await;
        let b = tokio::time::timeout(Duration::from_millis(200), locks.lock(LineId(2))).await;
        assert!(b.is_ok());
    }
}
