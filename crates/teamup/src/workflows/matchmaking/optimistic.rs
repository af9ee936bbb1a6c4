/// Locally cached value that may run ahead of the authoritative store.
///
/// The holder stages a new value before the remote write resolves, then
/// either commits (keep the staged value) or rolls back (restore the last
/// confirmed one). At most one write may be staged at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimisticValue<T> {
    current: T,
    previous: Option<T>,
    in_flight: bool,
}

impl<T> OptimisticValue<T> {
    /// Wrap a value confirmed by the authoritative store.
    pub fn confirmed(value: T) -> Self {
        Self {
            current: value,
            previous: None,
            in_flight: false,
        }
    }

    /// The value the caller should display right now.
    pub fn get(&self) -> &T {
        &self.current
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Stage `next` as the visible value, remembering the confirmed one for
    /// rollback. Returns `false` without touching state when a write is
    /// already outstanding.
    #[must_use]
    pub fn begin(&mut self, next: T) -> bool {
        if self.in_flight {
            return false;
        }
        self.previous = Some(std::mem::replace(&mut self.current, next));
        self.in_flight = true;
        true
    }

    /// The remote write succeeded: the staged value is now confirmed.
    pub fn commit(&mut self) {
        self.previous = None;
        self.in_flight = false;
    }

    /// The remote write failed: restore the last confirmed value.
    pub fn rollback(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.current = previous;
        }
        self.in_flight = false;
    }
}
