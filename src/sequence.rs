//! Sequence accumulation and validation

use crate::error::{FastgError, Result};
use crate::scanner::BodyLine;

/// Length and G/C tally of one declaration's sequence body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceStats {
    pub length: u64,
    pub gc_count: u64,
}

impl SequenceStats {
    /// Accumulate every body line of a declaration.
    ///
    /// Lines are trimmed and blank lines skipped; what remains must be drawn
    /// from the uppercase alphabet `A C G T U`.
    pub fn from_body(body: &[BodyLine]) -> Result<Self> {
        let mut stats = SequenceStats::default();
        for body_line in body {
            stats.push_line(&body_line.bytes, body_line.line)?;
        }
        Ok(stats)
    }

    fn push_line(&mut self, bytes: &[u8], line: usize) -> Result<()> {
        let Some(start) = bytes.iter().position(|b| !b.is_ascii_whitespace()) else {
            return Ok(());
        };
        let end = bytes
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(start, |pos| pos + 1);

        for (offset, &byte) in bytes[start..end].iter().enumerate() {
            match byte {
                b'G' | b'C' => self.gc_count += 1,
                b'A' | b'T' | b'U' => {}
                _ => {
                    return Err(FastgError::InvalidSequenceCharacter {
                        line,
                        column: start + offset + 1,
                        byte,
                    })
                }
            }
            self.length += 1;
        }
        Ok(())
    }

    /// Fraction of G/C bases; an empty sequence has a GC fraction of 0.0
    pub fn gc_fraction(&self) -> f64 {
        if self.length == 0 {
            0.0
        } else {
            self.gc_count as f64 / self.length as f64
        }
    }
}
