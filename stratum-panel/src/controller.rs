//! Button-path controller
//!
//! Applies events to the machine state and performs the resulting
//! actions. The link is locked lazily at the first link action of a
//! transition and held until the transition's actions are done, so a
//! reset, settle and jog burst never interleaves with print traffic.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::MutexGuard;
use embedded_hal_async::delay::DelayNs;
use stratum_core::link::MotionLink;
use stratum_core::state::{Action, Event, MachineState};
use stratum_display::DisplayBackend;
use stratum_hal::Uart;
use tracing::{debug, info, warn};

use crate::channels::{CancelSignal, PrintRequests, SharedLink};
use crate::shared::PanelShared;

/// Owns the button side of the panel
pub struct PanelController<'a, P, B, D> {
    link: &'a SharedLink<P>,
    shared: &'a PanelShared<B>,
    requests: &'a PrintRequests,
    cancel: &'a CancelSignal,
    delay: D,
    jog_settle_ms: u32,
}

impl<'a, P: Uart, B: DisplayBackend, D: DelayNs> PanelController<'a, P, B, D> {
    pub fn new(
        link: &'a SharedLink<P>,
        shared: &'a PanelShared<B>,
        requests: &'a PrintRequests,
        cancel: &'a CancelSignal,
        delay: D,
        jog_settle_ms: u64,
    ) -> Self {
        Self {
            link,
            shared,
            requests,
            cancel,
            delay,
            jog_settle_ms: u32::try_from(jog_settle_ms).unwrap_or(u32::MAX),
        }
    }

    /// Apply `event` and perform everything it triggers
    ///
    /// A transition into `Stopping` is followed straight away by
    /// `StopComplete` once its actions are done. Returns the resulting
    /// state.
    pub async fn handle(&mut self, event: Event) -> MachineState {
        let mut pending = Some(event);

        while let Some(event) = pending.take() {
            let (from, transition) = self.shared.apply(event);
            if transition.is_noop(from) {
                debug!(?event, state = ?from, "event ignored");
                continue;
            }
            info!(?event, ?from, to = ?transition.next, "state transition");

            self.execute(&transition.actions).await;

            if transition.next == MachineState::Stopping {
                pending = Some(Event::StopComplete);
            }
        }

        self.shared.state()
    }

    async fn execute(&mut self, actions: &[Action]) {
        let link = self.link;
        let mut guard: Option<MutexGuard<'a, CriticalSectionRawMutex, MotionLink<P>>> = None;

        for action in actions {
            if action.uses_link() && guard.is_none() {
                guard = Some(link.lock().await);
            }

            match (*action, guard.as_deref_mut()) {
                (Action::ShowStatus(message), _) => self.shared.show(message),
                (Action::BeginPrint, _) => {
                    let id = self.shared.next_request();
                    debug!(run = id.raw(), "print requested");
                    self.requests.signal(id);
                }
                (Action::CancelRun, _) => {
                    if self.shared.cancel_run() {
                        info!("print run cancelled");
                    }
                    self.cancel.signal(());
                }
                (Action::ResetLink, Some(link)) => {
                    if let Err(e) = link.reset_cycle() {
                        warn!(error = %e, "link reset failed");
                    }
                }
                (Action::Settle, Some(_)) => self.delay.delay_ms(self.jog_settle_ms).await,
                (Action::SendSequence(sequence), Some(link)) => {
                    if let Err(e) = link.send_sequence(sequence) {
                        warn!(?sequence, error = %e, "motion sequence failed");
                    }
                }
                (Action::CloseLink, Some(link)) => link.close(),
                (_, None) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::tests::NullBackend;
    use crate::testing::{Log, LogDelay, LogPort};
    use embassy_futures::block_on;
    use embassy_sync::mutex::Mutex;
    use stratum_core::scheduler::{RunId, RunOutcome};
    use stratum_core::state::Button;

    struct Fixture {
        log: Log,
        link: SharedLink<LogPort>,
        shared: PanelShared<NullBackend>,
        requests: PrintRequests,
        cancel: CancelSignal,
    }

    impl Fixture {
        fn new() -> Self {
            let log = Log::default();
            Self {
                link: Mutex::new(MotionLink::new(LogPort::new(&log))),
                log,
                shared: PanelShared::new(NullBackend),
                requests: PrintRequests::new(),
                cancel: CancelSignal::new(),
            }
        }

        fn controller(&self) -> PanelController<'_, LogPort, NullBackend, LogDelay> {
            PanelController::new(
                &self.link,
                &self.shared,
                &self.requests,
                &self.cancel,
                LogDelay(self.log.clone()),
                1_000,
            )
        }
    }

    fn press(button: Button) -> Event {
        Event::Pressed(button)
    }

    /// Accept START and open the run the print task would open
    fn start_run(
        f: &Fixture,
        controller: &mut PanelController<'_, LogPort, NullBackend, LogDelay>,
    ) -> RunId {
        block_on(controller.handle(press(Button::Start)));
        let id = f.requests.try_take().unwrap();
        assert!(f.shared.begin_run(id, 0));
        id
    }

    #[test]
    fn test_start_requests_print() {
        let f = Fixture::new();
        let state = block_on(f.controller().handle(press(Button::Start)));

        assert_eq!(state, MachineState::Printing);
        assert!(f.requests.try_take().is_some());
        assert_eq!(f.shared.status_lines().0, "Starting...");
        assert!(f.log.entries().is_empty());
    }

    #[test]
    fn test_start_twice_keeps_one_request() {
        let f = Fixture::new();
        let mut controller = f.controller();
        block_on(controller.handle(press(Button::Start)));
        let first = f.requests.try_take().unwrap();
        block_on(controller.handle(press(Button::Start)));

        assert!(f.requests.try_take().is_none());
        assert!(f.shared.begin_run(first, 0));
    }

    #[test]
    fn test_stop_cancels_and_raises() {
        let f = Fixture::new();
        let mut controller = f.controller();
        start_run(&f, &mut controller);

        let state = block_on(controller.handle(press(Button::Stop)));

        assert_eq!(state, MachineState::Idle);
        assert!(f.shared.is_cancelled());
        assert!(f.cancel.signaled());
        assert_eq!(
            f.log.entries(),
            [
                "open",
                "close",
                "open",
                "tx G90",
                "tx M210 Z160",
                "tx G0 Z400",
                "close",
            ]
        );
        assert_eq!(f.shared.status_lines().0, " Machine stopped");
    }

    #[test]
    fn test_stop_when_idle_still_raises() {
        let f = Fixture::new();
        let state = block_on(f.controller().handle(press(Button::Stop)));

        assert_eq!(state, MachineState::Idle);
        assert_eq!(f.log.sent(), ["G90", "M210 Z160", "G0 Z400"]);
        assert!(!f.link.try_lock().map(|l| l.is_open()).unwrap_or(true));
    }

    #[test]
    fn test_jog_up_settles_then_raises() {
        let f = Fixture::new();
        let state = block_on(f.controller().handle(press(Button::JogUp)));

        assert_eq!(state, MachineState::RaisingZ);
        assert_eq!(
            f.log.entries(),
            [
                "open",
                "close",
                "open",
                "delay 1000",
                "tx G90",
                "tx M210 Z160",
                "tx G0 Z400",
                "close",
            ]
        );
    }

    #[test]
    fn test_repeated_jog_is_ignored() {
        let f = Fixture::new();
        let mut controller = f.controller();
        block_on(controller.handle(press(Button::JogUp)));
        f.log.clear();

        let state = block_on(controller.handle(press(Button::JogUp)));
        assert_eq!(state, MachineState::RaisingZ);
        assert!(f.log.entries().is_empty());

        let state = block_on(controller.handle(press(Button::JogDown)));
        assert_eq!(state, MachineState::LoweringZ);
        assert_eq!(f.log.sent(), ["M210 Z160", "G28"]);
    }

    #[test]
    fn test_jog_ignored_while_printing() {
        let f = Fixture::new();
        let mut controller = f.controller();
        block_on(controller.handle(press(Button::Start)));

        let state = block_on(controller.handle(press(Button::JogDown)));
        assert_eq!(state, MachineState::Printing);
        assert!(f.log.entries().is_empty());
    }

    #[test]
    fn test_job_unavailable_returns_to_idle() {
        let f = Fixture::new();
        let mut controller = f.controller();
        let id = start_run(&f, &mut controller);
        f.shared.end_run();

        let state = block_on(controller.handle(Event::JobUnavailable(id)));
        assert_eq!(state, MachineState::Idle);
        assert_eq!(
            f.shared.status_lines(),
            ("Insert media".into(), "with valid job".into())
        );
    }

    #[test]
    fn test_print_end_returns_to_idle() {
        let f = Fixture::new();
        let mut controller = f.controller();
        let id = start_run(&f, &mut controller);
        f.shared.end_run();

        let state = block_on(controller.handle(Event::PrintEnded(id, RunOutcome::Completed)));
        assert_eq!(state, MachineState::Idle);
    }

    #[test]
    fn test_outcome_of_earlier_run_keeps_new_start() {
        let f = Fixture::new();
        let mut controller = f.controller();
        let first = start_run(&f, &mut controller);
        f.shared.end_run();

        block_on(controller.handle(press(Button::Stop)));
        block_on(controller.handle(press(Button::Start)));
        let second = f.requests.try_take().unwrap();
        assert_ne!(first, second);

        let state = block_on(controller.handle(Event::PrintEnded(first, RunOutcome::Completed)));
        assert_eq!(state, MachineState::Printing);
        let state = block_on(controller.handle(Event::JobUnavailable(first)));
        assert_eq!(state, MachineState::Printing);
        assert_eq!(f.shared.status_lines().0, "Starting...");
        assert!(f.shared.begin_run(second, 0));
    }

    #[test]
    fn test_restart_before_pickup_supersedes_request() {
        let f = Fixture::new();
        let mut controller = f.controller();
        block_on(controller.handle(press(Button::Start)));
        block_on(controller.handle(press(Button::Stop)));
        block_on(controller.handle(press(Button::Start)));

        let id = f.requests.try_take().unwrap();
        assert!(f.requests.try_take().is_none());
        assert!(f.shared.begin_run(id, 0));
    }
}
