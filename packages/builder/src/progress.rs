/// Heuristic completion estimate for one build cycle.
///
/// The percentage is derived from counting output chunks, not from any
/// real measurement of work remaining: each chunk advances the value by
/// a fixed step up to a per-phase cap, and phase boundaries jump it to a
/// fixed floor. It is an approximation for display, never a contract.
///
/// Invariants: the value stays in [0, 100] and never decreases within a
/// cycle; only [`reset`](Self::reset) (a new cycle) returns it to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    value: u8,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Advance by `step`, saturating at `cap`. A cap below the current
    /// value leaves the value untouched rather than lowering it.
    pub fn advance(&mut self, step: u8, cap: u8) {
        let cap = cap.min(100);
        let bumped = self.value.saturating_add(step).min(cap);
        if bumped > self.value {
            self.value = bumped;
        }
    }

    /// Raise the value to at least `floor` (used for the fixed jumps at
    /// phase boundaries). Never lowers the value.
    pub fn raise_to(&mut self, floor: u8) {
        self.value = self.value.max(floor.min(100));
    }

    /// Start of a new cycle.
    pub fn reset(&mut self) {
        self.value = 0;
    }
}
