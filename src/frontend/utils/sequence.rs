/// Number handed out when a request is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Orders completions of requests which replace the same piece of state, so that a response
/// issued earlier never overwrites one issued later, regardless of arrival order.
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: u64,
    applied: u64,
}

impl RequestSequence {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Returns true if the response for `ticket` may be applied.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        true
    }

    /// Ticket of the request issued most recently.
    pub fn last_issued(&self) -> Ticket {
        Ticket(self.issued)
    }
}
