//! Bookkeeping for one print attempt

/// Identifies the START that asked for a print
///
/// Every accepted START gets a fresh id. Outcomes reported by the print
/// path carry it, so an outcome left over from an earlier attempt cannot
/// end a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunId(u32);

impl RunId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The id handed to the following request
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// One active or just-finished print attempt
///
/// `cancelled` is the only flag shared with the button path; it is set by
/// STOP and read by the scheduler before every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PrintRun {
    id: RunId,
    current_index: usize,
    started_at_ms: u64,
    cancelled: bool,
}

impl PrintRun {
    pub fn new(id: RunId, started_at_ms: u64) -> Self {
        Self {
            id,
            current_index: 0,
            started_at_ms,
            cancelled: false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    /// Record progress; the index never moves backwards
    pub fn advance_to(&mut self, index: usize) {
        self.current_index = self.current_index.max(index);
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Time since the run started
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }
}
