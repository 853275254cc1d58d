//! Layer step sequencing
//!
//! Per layer the scheduler yields: progress, exposure, rise, pause. A run
//! is bracketed by a preamble step (home and wait for the board) and a
//! single finish step. Cancellation is checked before every step.

use super::progress::Progress;
use crate::config::ExposureConfig;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunOutcome {
    /// Every layer was exposed
    Completed,
    /// STOP was observed before the last layer finished
    Cancelled,
    /// The job had no layers; nothing moved
    Empty,
}

/// One unit of work for the caller to perform
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrintStep {
    /// Announce the job, reset the link, home and wait for the board
    Begin { layer_count: usize, thickness_mm: f64 },
    /// Publish progress to the status display
    Publish(Progress),
    /// Show the layer image, hold it for `hold_ms`, then hide it
    Expose { index: usize, hold_ms: u64 },
    /// Peel and advance one layer
    Rise {
        index: usize,
        overshoot_mm: f64,
        length_mm: f64,
    },
    /// Let the resin settle after the rise
    Pause { index: usize, pause_ms: u64 },
    /// Park, close the shutter and release the image
    Finish(RunOutcome),
}

/// Scheduler execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerPhase {
    /// Preamble not yet issued
    Begin,
    /// Next step publishes progress for the current layer
    Publish,
    Expose,
    Rise,
    Pause,
    /// All layers done, final progress pending
    Complete,
    /// Final progress published, finish pending
    Finishing,
    /// Finish issued; no further steps
    Done,
}

/// Step generator for one run
#[derive(Debug, Clone)]
pub struct PrintScheduler {
    config: ExposureConfig,
    layer_count: usize,
    thickness_mm: f64,
    index: usize,
    phase: SchedulerPhase,
}

impl PrintScheduler {
    /// Create a scheduler for a job of `layer_count` layers
    pub fn new(config: ExposureConfig, layer_count: usize, thickness_mm: f64) -> Self {
        Self {
            config,
            layer_count,
            thickness_mm,
            index: 0,
            phase: SchedulerPhase::Begin,
        }
    }

    /// Produce the next step, or `None` once the run has finished
    ///
    /// `cancelled` is the run's cancellation flag as of now; once it is
    /// seen the scheduler goes straight to its finish step.
    pub fn next(&mut self, cancelled: bool) -> Option<PrintStep> {
        use SchedulerPhase::*;

        if self.phase == Done {
            return None;
        }
        if cancelled {
            return Some(self.finish(RunOutcome::Cancelled));
        }

        let step = match self.phase {
            Begin => {
                if self.layer_count == 0 {
                    return Some(self.finish(RunOutcome::Empty));
                }
                self.phase = Publish;
                PrintStep::Begin {
                    layer_count: self.layer_count,
                    thickness_mm: self.thickness_mm,
                }
            }
            Publish => {
                self.phase = Expose;
                PrintStep::Publish(Progress::at(self.index, self.layer_count, &self.config))
            }
            Expose => {
                self.phase = Rise;
                PrintStep::Expose {
                    index: self.index,
                    hold_ms: self.config.exposure_ms(self.index),
                }
            }
            Rise => {
                self.phase = Pause;
                PrintStep::Rise {
                    index: self.index,
                    overshoot_mm: self.config.overshoot_for(self.index),
                    length_mm: self.thickness_mm,
                }
            }
            Pause => {
                let index = self.index;
                self.index += 1;
                self.phase = if self.index >= self.layer_count {
                    Complete
                } else {
                    Publish
                };
                PrintStep::Pause {
                    index,
                    pause_ms: self.config.pause_ms(index),
                }
            }
            Complete => {
                self.phase = Finishing;
                PrintStep::Publish(Progress::at(self.layer_count, self.layer_count, &self.config))
            }
            Finishing => return Some(self.finish(RunOutcome::Completed)),
            Done => return None,
        };
        Some(step)
    }

    fn finish(&mut self, outcome: RunOutcome) -> PrintStep {
        self.phase = SchedulerPhase::Done;
        PrintStep::Finish(outcome)
    }
}
