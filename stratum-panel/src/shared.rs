//! State shared between the button path and the print path
//!
//! The machine state, the latest print request, the active run and the
//! status display sit behind a single blocking mutex. Every access locks, mutates and releases within
//! one closure; nothing is held across an await.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use stratum_core::scheduler::{PrintRun, Progress, RunId};
use stratum_core::state::{Event, MachineState, Transition};
use stratum_core::status::StatusMessage;
use stratum_core::traits::StatusSink;
use stratum_display::{DisplayBackend, StatusPanel};
use tracing::{debug, warn};

struct Inner<B> {
    state: MachineState,
    request: RunId,
    run: Option<PrintRun>,
    status: StatusPanel<B>,
}

/// Lock-protected panel state
pub struct PanelShared<B> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner<B>>>,
}

impl<B: DisplayBackend> PanelShared<B> {
    pub fn new(backend: B) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                state: MachineState::Idle,
                request: RunId::default(),
                run: None,
                status: StatusPanel::new(backend),
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner<B>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn state(&self) -> MachineState {
        self.with(|inner| inner.state)
    }

    /// Apply an event to the machine state in one critical section
    ///
    /// Returns the state the event was applied to along with the
    /// transition. Print task events for any request but the latest are
    /// dropped and come back as a no-op.
    pub fn apply(&self, event: Event) -> (MachineState, Transition) {
        self.with(|inner| {
            let from = inner.state;
            if let Some(id) = event.run_id().filter(|id| *id != inner.request) {
                debug!(run = id.raw(), latest = inner.request.raw(), "stale print event");
                return (from, Transition::to(from));
            }
            let transition = from.transition(event);
            inner.state = transition.next;
            (from, transition)
        })
    }

    /// Issue the id for a newly accepted START
    pub fn next_request(&self) -> RunId {
        self.with(|inner| {
            inner.request = inner.request.next();
            inner.request
        })
    }

    /// Open a run for request `id`, but only while it is still current
    ///
    /// A STOP between START and the print task picking up the request
    /// leaves the machine out of `Printing`, and a later START supersedes
    /// `id`; no run is started in either case.
    pub fn begin_run(&self, id: RunId, now_ms: u64) -> bool {
        self.with(|inner| {
            if inner.state != MachineState::Printing || inner.request != id {
                return false;
            }
            inner.run = Some(PrintRun::new(id, now_ms));
            true
        })
    }

    /// Set the cancellation flag of the active run; false if none
    pub fn cancel_run(&self) -> bool {
        self.with(|inner| match inner.run.as_mut() {
            Some(run) => {
                run.cancel();
                true
            }
            None => false,
        })
    }

    /// Whether the active run has been cancelled
    ///
    /// A run that no longer exists counts as cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.with(|inner| inner.run.map_or(true, |run| run.is_cancelled()))
    }

    pub fn advance_run(&self, index: usize) {
        self.with(|inner| {
            if let Some(run) = inner.run.as_mut() {
                run.advance_to(index);
            }
        })
    }

    pub fn end_run(&self) -> Option<PrintRun> {
        self.with(|inner| inner.run.take())
    }

    #[cfg(test)]
    pub fn run(&self) -> Option<PrintRun> {
        self.with(|inner| inner.run)
    }

    pub fn show(&self, message: StatusMessage) {
        self.with(|inner| {
            inner.status.show(message);
            report(&inner.status);
        })
    }

    pub fn show_progress(&self, progress: &Progress) {
        self.with(|inner| {
            inner.status.show_progress(progress);
            report(&inner.status);
        })
    }

    pub fn set_lines(&self, line1: &str, line2: &str) {
        self.with(|inner| {
            inner.status.set_lines(line1, line2);
            report(&inner.status);
        })
    }

    /// Current display text with trailing padding removed
    pub fn status_lines(&self) -> (String, String) {
        self.with(|inner| {
            let screen = inner.status.screen();
            let line = |row| screen.get_line(row).unwrap_or("").trim_end().to_string();
            (line(0), line(1))
        })
    }
}

fn report<B: DisplayBackend>(status: &StatusPanel<B>) {
    if let Some(e) = status.last_error() {
        warn!(error = %e, "status display write failed");
    }
}
