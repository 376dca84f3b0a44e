//! Fetch bookkeeping shared by the views.
//!
//! A view issues a [`FetchTicket`] for every request it starts. The ticket
//! records the key the request was made for (station and direction, or
//! train id) and a sequence number. When the request completes, the result
//! is applied only if the ticket's key is still the view's key and no newer
//! ticket's result has already been applied. Requests are never cancelled;
//! a superseded response is simply dropped when it lands.

/// Where a fetched value is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    /// Nothing requested yet.
    Idle,
    /// A request is in flight; any previous value has been blanked.
    Loading,
    /// The latest applied request succeeded.
    Ready(T),
    /// The latest applied request failed.
    Failed,
}

impl<T> Phase<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Phase::Failed)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Phase::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// One issued request: the key it was issued for and its order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    key: K,
    seq: u64,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Issues tickets for a view's current key.
#[derive(Debug, Clone)]
pub struct RequestTracker<K> {
    key: K,
    issued: u64,
}

impl<K: Clone + PartialEq> RequestTracker<K> {
    pub fn new(key: K) -> Self {
        Self { key, issued: 0 }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Replace the current key. Returns whether it changed.
    pub fn set_key(&mut self, key: K) -> bool {
        if self.key == key {
            return false;
        }
        self.key = key;
        true
    }

    /// Issue a ticket for the current key.
    pub fn issue(&mut self) -> FetchTicket<K> {
        self.issued += 1;
        FetchTicket {
            key: self.key.clone(),
            seq: self.issued,
        }
    }

    /// Whether `ticket` was issued for the current key.
    pub fn is_current(&self, ticket: &FetchTicket<K>) -> bool {
        ticket.key == self.key
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: &FetchTicket<K>) -> bool {
        ticket.seq == self.issued
    }
}

/// What happened to a completed request.
#[derive(Debug)]
pub enum Completion<E> {
    /// The value was stored.
    Applied,
    /// The failure was stored; the error is handed back for logging.
    Failed(E),
    /// The request was superseded and its outcome dropped.
    Stale,
}

impl<E> Completion<E> {
    pub fn is_stale(&self) -> bool {
        matches!(self, Completion::Stale)
    }
}

/// A fetched value plus the sequence number of the request that set it.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    phase: Phase<T>,
    applied: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            applied: 0,
        }
    }
}

impl<T> Slot<T> {
    pub fn phase(&self) -> &Phase<T> {
        &self.phase
    }

    /// Enter the loading state, dropping the previous value.
    pub fn begin(&mut self) {
        self.phase = Phase::Loading;
    }

    /// Store the outcome of `ticket`'s request unless it is stale.
    pub fn complete<K, E>(
        &mut self,
        tracker: &RequestTracker<K>,
        ticket: &FetchTicket<K>,
        outcome: Result<T, E>,
    ) -> Completion<E>
    where
        K: Clone + PartialEq,
    {
        if !tracker.is_current(ticket) || ticket.seq <= self.applied {
            return Completion::Stale;
        }
        self.applied = ticket.seq;

        match outcome {
            Ok(value) => {
                self.phase = Phase::Ready(value);
                Completion::Applied
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Completion::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Outcome = Result<&'static str, &'static str>;

    #[test]
    fn tickets_carry_key_and_order() {
        let mut tracker = RequestTracker::new("A");
        let first = tracker.issue();
        let second = tracker.issue();

        assert_eq!(first.key(), &"A");
        assert!(first.seq() < second.seq());
        assert!(tracker.is_latest(&second));
        assert!(!tracker.is_latest(&first));
    }

    #[test]
    fn set_key_reports_change() {
        let mut tracker = RequestTracker::new("A");
        assert!(!tracker.set_key("A"));
        assert!(tracker.set_key("B"));
        assert_eq!(tracker.key(), &"B");
    }

    #[test]
    fn applies_result_for_current_key() {
        let mut tracker = RequestTracker::new("A");
        let mut slot = Slot::default();
        let ticket = tracker.issue();
        slot.begin();

        let done = slot.complete(&tracker, &ticket, Outcome::Ok("board A"));
        assert!(matches!(done, Completion::Applied));
        assert_eq!(slot.phase().ready(), Some(&"board A"));
    }

    #[test]
    fn drops_result_for_superseded_key() {
        let mut tracker = RequestTracker::new("A");
        let mut slot = Slot::default();

        let for_a = tracker.issue();
        tracker.set_key("B");
        let for_b = tracker.issue();
        slot.begin();

        // B resolves first, then A's late response lands.
        assert!(matches!(
            slot.complete(&tracker, &for_b, Outcome::Ok("board B")),
            Completion::Applied
        ));
        assert!(slot.complete(&tracker, &for_a, Outcome::Ok("board A")).is_stale());
        assert_eq!(slot.phase().ready(), Some(&"board B"));
    }

    #[test]
    fn stale_response_does_not_end_loading() {
        let mut tracker = RequestTracker::new("A");
        let mut slot: Slot<&str> = Slot::default();

        let for_a = tracker.issue();
        tracker.set_key("B");
        let _for_b = tracker.issue();
        slot.begin();

        assert!(slot.complete(&tracker, &for_a, Outcome::Ok("board A")).is_stale());
        assert!(slot.phase().is_loading());
    }

    #[test]
    fn older_result_never_overwrites_newer_for_same_key() {
        let mut tracker = RequestTracker::new("A");
        let mut slot = Slot::default();

        let old = tracker.issue();
        let new = tracker.issue();

        slot.complete(&tracker, &new, Outcome::Ok("fresh"));
        assert!(slot.complete(&tracker, &old, Outcome::Ok("old")).is_stale());
        assert_eq!(slot.phase().ready(), Some(&"fresh"));
    }

    #[test]
    fn failure_is_stored_and_returned() {
        let mut tracker = RequestTracker::new("A");
        let mut slot: Slot<&str> = Slot::default();
        let ticket = tracker.issue();

        let done = slot.complete(&tracker, &ticket, Outcome::Err("boom"));
        assert!(matches!(done, Completion::Failed("boom")));
        assert!(slot.phase().is_failed());
        assert!(!slot.phase().is_loading());
    }
}
