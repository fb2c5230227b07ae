//! Request generations for a single state slot.
//!
//! Every request against a slot takes a [`Ticket`]. Only the holder of the
//! most recent ticket may write the slot; older responses are dropped. The
//! slot is pending until that most recent ticket settles.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Generation {
    issued: u64,
    settled: u64,
}

impl Generation {
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Mark `ticket` finished. Returns whether its result should be applied.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            self.settled = ticket.0;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> bool {
        self.settled != self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_ticket_wins() {
        let mut g = Generation::default();
        let first = g.begin();
        let second = g.begin();
        assert!(g.pending());

        assert!(g.settle(second));
        assert!(!g.pending());
        assert!(!g.settle(first));
        assert!(!g.pending());
    }

    #[test]
    fn stale_settle_keeps_slot_pending() {
        let mut g = Generation::default();
        let first = g.begin();
        let _second = g.begin();
        assert!(!g.settle(first));
        assert!(g.pending());
    }
}
