//! Line assembly for the controller's receive stream.
//!
//! Bytes arrive from the link in arbitrary chunks; the parser buffers
//! them until a `\n` and hands back the completed line with any `\r`
//! stripped. Empty lines are skipped.

use heapless::String;
use heapless::Vec;

use crate::response::Response;

/// Longest line the parser will buffer
pub const MAX_LINE_LEN: usize = 96;

/// Errors raised while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded `MAX_LINE_LEN`; the partial line was discarded
    Overflow,
    /// Line was not valid UTF-8
    InvalidUtf8,
}

/// Incremental line parser
#[derive(Debug, Default)]
pub struct LineParser {
    buffer: Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a single byte, returning a line once `\n` is seen
    pub fn feed(&mut self, byte: u8) -> Result<Option<String<MAX_LINE_LEN>>, LineError> {
        match byte {
            b'\n' => {
                if self.discarding {
                    self.discarding = false;
                    self.buffer.clear();
                    return Ok(None);
                }
                if self.buffer.last() == Some(&b'\r') {
                    self.buffer.pop();
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let bytes = core::mem::take(&mut self.buffer);
                let text = core::str::from_utf8(&bytes).map_err(|_| LineError::InvalidUtf8)?;
                let mut line = String::new();
                // Capacity matches the buffer, so this cannot fail
                let _ = line.push_str(text);
                Ok(Some(line))
            }
            _ if self.discarding => Ok(None),
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    return Err(LineError::Overflow);
                }
                Ok(None)
            }
        }
    }

    /// Feed a slice and count the `ok` acknowledgements it completes
    ///
    /// Malformed lines are dropped; they never count as acknowledgements.
    pub fn count_acks(&mut self, data: &[u8]) -> usize {
        data.iter()
            .filter_map(|&b| self.feed(b).ok().flatten())
            .filter(|line| Response::parse(line).is_ok())
            .count()
    }

    /// Drop any partially assembled line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}
