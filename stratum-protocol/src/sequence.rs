//! Canned command sequences
//!
//! Jogging, stopping and the print preamble each send a short fixed
//! burst of commands. Keeping them here means the state machine only
//! has to name which one it wants.

use crate::command::MotionCommand;

/// Maximum Z feed used for all travel moves
pub const TRAVEL_FEED_Z: u32 = 160;

/// Z target for the safe raised position after a stop
pub const RAISED_Z: u32 = 400;

/// Z target for the parked position at the end of a print
pub const PARKED_Z: u32 = 200;

const RAISE: &[MotionCommand] = &[
    MotionCommand::Absolute,
    MotionCommand::MaxFeedZ(TRAVEL_FEED_Z),
    MotionCommand::RapidZ(RAISED_Z),
];

const HOME: &[MotionCommand] = &[
    MotionCommand::MaxFeedZ(TRAVEL_FEED_Z),
    MotionCommand::Home,
];

const PARK: &[MotionCommand] = &[
    MotionCommand::Absolute,
    MotionCommand::MaxFeedZ(TRAVEL_FEED_Z),
    MotionCommand::RapidZ(PARKED_Z),
];

/// A named, fixed burst of motion commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionSequence {
    /// Raise the platform to the safe position (jog up, stop)
    Raise,
    /// Lower the platform onto the home switch (jog down)
    Lower,
    /// Home before the first layer of a print
    Home,
    /// Park the platform once a print has finished
    Park,
}

impl MotionSequence {
    /// Commands making up the sequence, in send order
    pub fn commands(&self) -> &'static [MotionCommand] {
        match self {
            MotionSequence::Raise => RAISE,
            MotionSequence::Lower | MotionSequence::Home => HOME,
            MotionSequence::Park => PARK,
        }
    }
}
