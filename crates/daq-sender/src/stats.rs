//! Activity counters of the sender.
//!
//! All counters use `AtomicU64` with `Ordering::Relaxed`: they are read for
//! monitoring only and never synchronize other memory.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot returned by [`crate::EquipmentMessageSender::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SenderStatsSnapshot {
    /// Valid values handed to the transport.
    pub values_sent: u64,
    /// Invalid values handed to the transport.
    pub invalid_sent: u64,
    /// Updates dropped by a filter and reported to the audit channel.
    pub filtered: u64,
    /// Updates parked in a time deadband buffer.
    pub buffered: u64,
    /// Messages the transport refused.
    pub transport_failures: u64,
    /// Alive heartbeats sent.
    pub alive_sent: u64,
    /// Alive heartbeats suppressed by alive filtering.
    pub alive_suppressed: u64,
    /// Comm fault states sent.
    pub comm_fault_sent: u64,
    /// Comm fault states dropped as repeats.
    pub comm_fault_repeated: u64,
}

#[derive(Debug, Default)]
pub(crate) struct SenderStats {
    values_sent: AtomicU64,
    invalid_sent: AtomicU64,
    filtered: AtomicU64,
    buffered: AtomicU64,
    transport_failures: AtomicU64,
    alive_sent: AtomicU64,
    alive_suppressed: AtomicU64,
    comm_fault_sent: AtomicU64,
    comm_fault_repeated: AtomicU64,
}

impl SenderStats {
    pub(crate) fn inc_sent(&self, valid: bool) {
        if valid {
            self.values_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.invalid_sent.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn inc_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_buffered(&self) {
        self.buffered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_transport_failure(&self) {
        self.transport_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_alive_sent(&self) {
        self.alive_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_alive_suppressed(&self) {
        self.alive_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_comm_fault_sent(&self) {
        self.comm_fault_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_comm_fault_repeated(&self) {
        self.comm_fault_repeated.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> SenderStatsSnapshot {
        SenderStatsSnapshot {
            values_sent: self.values_sent.load(Ordering::Relaxed),
            invalid_sent: self.invalid_sent.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            buffered: self.buffered.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            alive_sent: self.alive_sent.load(Ordering::Relaxed),
            alive_suppressed: self.alive_suppressed.load(Ordering::Relaxed),
            comm_fault_sent: self.comm_fault_sent.load(Ordering::Relaxed),
            comm_fault_repeated: self.comm_fault_repeated.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_increments() {
        let stats = SenderStats::default();
        stats.inc_sent(true);
        stats.inc_sent(true);
        stats.inc_sent(false);
        stats.inc_filtered();
        stats.inc_alive_suppressed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.values_sent, 2);
        assert_eq!(snapshot.invalid_sent, 1);
        assert_eq!(snapshot.filtered, 1);
        assert_eq!(snapshot.alive_suppressed, 1);
        assert_eq!(snapshot.transport_failures, 0);
    }
}
