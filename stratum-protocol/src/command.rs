//! Commands understood by the motion controller firmware

use core::fmt::Write;

use heapless::String;

/// Longest encoded command line, terminator included
pub const MAX_COMMAND_LEN: usize = 48;

/// An encoded command line ready to be written to the link
pub type CommandLine = String<MAX_COMMAND_LEN>;

/// Errors that can occur while encoding a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Encoded command does not fit in a command line
    CommandTooLong,
    /// A numeric argument is not finite
    InvalidArgument,
}

impl core::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtocolError::CommandTooLong => f.write_str("command too long"),
            ProtocolError::InvalidArgument => f.write_str("invalid command argument"),
        }
    }
}

/// Commands sent to the motion controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionCommand {
    /// `G90` - absolute positioning
    Absolute,
    /// `G91` - relative positioning
    Relative,
    /// `G0 Z{n}` - rapid move of the Z axis
    RapidZ(u32),
    /// `G2 O{overshoot} L{length}` - peel move: rise past the layer by
    /// the overshoot, then settle back to the next layer height
    Peel {
        /// Extra travel beyond the layer (mm)
        overshoot_mm: f64,
        /// Layer height to advance (mm)
        length_mm: f64,
    },
    /// `G28` - home the Z axis
    Home,
    /// `G93` - open the projector shutter servo
    ShutterOpen,
    /// `G94` - close the projector shutter servo
    ShutterClose,
    /// `M210 Z{n}` - set the maximum Z feed rate
    MaxFeedZ(u32),
    /// `G0` with no arguments; a no-op used to solicit an `ok`
    Probe,
}

impl MotionCommand {
    /// Encode the command text, without terminator
    pub fn encode(&self) -> Result<CommandLine, ProtocolError> {
        let mut line = CommandLine::new();
        let written = match *self {
            MotionCommand::Absolute => line.push_str("G90").map_err(|_| core::fmt::Error),
            MotionCommand::Relative => line.push_str("G91").map_err(|_| core::fmt::Error),
            MotionCommand::RapidZ(z) => write!(line, "G0 Z{}", z),
            MotionCommand::Peel {
                overshoot_mm,
                length_mm,
            } => {
                if !overshoot_mm.is_finite() || !length_mm.is_finite() {
                    return Err(ProtocolError::InvalidArgument);
                }
                write!(line, "G2 O{:.6} L{:.6}", overshoot_mm, length_mm)
            }
            MotionCommand::Home => line.push_str("G28").map_err(|_| core::fmt::Error),
            MotionCommand::ShutterOpen => line.push_str("G93").map_err(|_| core::fmt::Error),
            MotionCommand::ShutterClose => line.push_str("G94").map_err(|_| core::fmt::Error),
            MotionCommand::MaxFeedZ(rate) => write!(line, "M210 Z{}", rate),
            MotionCommand::Probe => line.push_str("G0").map_err(|_| core::fmt::Error),
        };
        written.map_err(|_| ProtocolError::CommandTooLong)?;
        Ok(line)
    }

    /// Encode the command followed by the `\n` terminator
    pub fn to_line(&self) -> Result<CommandLine, ProtocolError> {
        let mut line = self.encode()?;
        line.push('\n').map_err(|_| ProtocolError::CommandTooLong)?;
        Ok(line)
    }
}
