use crate::models::Region;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Proof that an operation was the newest one aimed at a region when it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    region: Region,
    seq: u64,
}

impl Ticket {
    pub fn region(&self) -> Region {
        self.region
    }
}

/// One monotonically increasing counter per region. A response holding an
/// older ticket than the region's latest is stale and must not be rendered.
#[derive(Debug, Default)]
pub struct RegionTickets {
    latest: [AtomicU64; Region::ALL.len()],
}

impl RegionTickets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, region: Region) -> Ticket {
        let seq = self.latest[region.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { region, seq }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest[ticket.region.index()].load(Ordering::SeqCst) == ticket.seq
    }
}

/// Lists reloaded by a write that no page load has consumed yet. The redirect
/// after a write lands on a warm-up, which would otherwise fetch them again.
#[derive(Debug, Default)]
pub struct FreshLists {
    fresh: [AtomicBool; Region::ALL.len()],
}

impl FreshLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, region: Region) {
        self.fresh[region.index()].store(true, Ordering::SeqCst);
    }

    /// Clears the mark and reports whether it was set.
    pub fn take(&self, region: Region) -> bool {
        self.fresh[region.index()].swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let tickets = RegionTickets::new();
        let first = tickets.issue(Region::RunResult);
        let second = tickets.issue(Region::RunResult);

        assert!(!tickets.is_current(&first));
        assert!(tickets.is_current(&second));
    }

    #[test]
    fn regions_are_independent() {
        let tickets = RegionTickets::new();
        let run = tickets.issue(Region::RunResult);
        let _stats = tickets.issue(Region::Stats);

        assert!(tickets.is_current(&run));
        assert_eq!(run.region(), Region::RunResult);
    }

    #[test]
    fn fresh_mark_is_consumed_once() {
        let fresh = FreshLists::new();
        fresh.mark(Region::TemplateSelect);

        assert!(!fresh.take(Region::SegmentSelect));
        assert!(fresh.take(Region::TemplateSelect));
        assert!(!fresh.take(Region::TemplateSelect));
    }
}
