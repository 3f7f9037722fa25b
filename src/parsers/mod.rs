pub mod trace;

pub use trace::TraceLineParser;

use crate::event::AccessEvent;

/// Turns raw trace lines into access events.
///
/// Lines are handed over as bytes without their `\n` terminator. Callers must only
/// pass lines for which `is_record` returned true to `parse`.
pub trait RecordParser {
    fn is_record(&self, line: &[u8]) -> bool;
    fn parse(&self, line: &[u8]) -> AccessEvent;
}
