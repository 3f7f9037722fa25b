use super::RecordParser;
use crate::event::AccessEvent;

/// Byte every record carries at `SIGIL_POS` (records look like ` > read8 ...`).
pub const RECORD_SIGIL: u8 = b'>';
pub const SIGIL_POS: usize = 1;
/// Width of the ` > ` prefix skipped before tokenizing.
pub const RECORD_PREFIX_LEN: usize = 3;

/// Parser for the tracer's text format:
///
/// ```text
///  > <access-kind> <address:hex> <size:dec> <thread:dec> <source>
/// ```
///
/// Parsing is best-effort. Numeric fields that are missing or fail to parse become
/// zero and missing string fields become empty; a record line is never rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLineParser;

impl TraceLineParser {
    pub fn new() -> Self {
        Self
    }
}

impl RecordParser for TraceLineParser {
    fn is_record(&self, line: &[u8]) -> bool {
        line.len() > 2 && line[SIGIL_POS] == RECORD_SIGIL
    }

    fn parse(&self, line: &[u8]) -> AccessEvent {
        let body = line.get(RECORD_PREFIX_LEN..).unwrap_or_default();
        let mut tokens = body
            .split(|b| b.is_ascii_whitespace())
            .filter(|tok| !tok.is_empty());

        let access_kind = tokens.next().map(token_to_string).unwrap_or_default();
        let address = tokens.next().map(parse_hex_u64).unwrap_or(0);
        let access_size = tokens.next().map(parse_dec_u32).unwrap_or(0);
        let thread_id = tokens.next().map(parse_dec_u32).unwrap_or(0);
        let source = tokens.next().map(token_to_string).unwrap_or_default();

        AccessEvent {
            access_kind,
            source,
            address,
            thread_id,
            access_size,
        }
    }
}

fn token_to_string(token: &[u8]) -> String {
    String::from_utf8_lossy(token).into_owned()
}

/// Hex address, with or without a `0x`/`0X` prefix. Unparseable input yields 0.
fn parse_hex_u64(token: &[u8]) -> u64 {
    let digits = token
        .strip_prefix(b"0x")
        .or_else(|| token.strip_prefix(b"0X"))
        .unwrap_or(token);
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| u64::from_str_radix(s, 16).ok())
        .unwrap_or(0)
}

fn parse_dec_u32(token: &[u8]) -> u32 {
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> AccessEvent {
        TraceLineParser::new().parse(line.as_bytes())
    }

    #[test]
    fn test_parse_full_record() {
        let event = parse(" > read8 1a2b 8 1 funcA");
        assert_eq!(event.access_kind, "read8");
        assert_eq!(event.address, 0x1a2b);
        assert_eq!(event.access_size, 8);
        assert_eq!(event.thread_id, 1);
        assert_eq!(event.source, "funcA");
    }

    #[test]
    fn test_parse_prefixed_hex_address() {
        let event = parse(" > write4 0x7ffd12345678 4 3 main.c:42");
        assert_eq!(event.address, 0x7ffd_1234_5678);
        assert_eq!(event.source, "main.c:42");

        let event = parse(" > write4 0XFF 4 3 f");
        assert_eq!(event.address, 0xff);
    }

    #[test]
    fn test_parse_extra_whitespace_between_fields() {
        let event = parse(" > read1\t 10   1  7   worker_loop  ");
        assert_eq!(event.access_kind, "read1");
        assert_eq!(event.address, 0x10);
        assert_eq!(event.access_size, 1);
        assert_eq!(event.thread_id, 7);
        assert_eq!(event.source, "worker_loop");
    }

    #[test]
    fn test_bad_numbers_become_zero() {
        let event = parse(" > read8 zzzz eight one funcA");
        assert_eq!(event.access_kind, "read8");
        assert_eq!(event.address, 0);
        assert_eq!(event.access_size, 0);
        assert_eq!(event.thread_id, 0);
        // A bad numeric field does not disturb the fields after it
        assert_eq!(event.source, "funcA");
    }

    #[test]
    fn test_missing_fields_default() {
        let event = parse(" > write4 ff");
        assert_eq!(event.access_kind, "write4");
        assert_eq!(event.address, 0xff);
        assert_eq!(event.access_size, 0);
        assert_eq!(event.thread_id, 0);
        assert_eq!(event.source, "");

        let event = parse(" > ");
        assert_eq!(event, AccessEvent::default());
    }

    #[test]
    fn test_negative_and_overflowing_numbers_become_zero() {
        let event = parse(" > read8 1ffffffffffffffff -4 4294967296 f");
        assert_eq!(event.address, 0);
        assert_eq!(event.access_size, 0);
        assert_eq!(event.thread_id, 0);
    }

    #[test]
    fn test_is_record() {
        let parser = TraceLineParser::new();
        assert!(parser.is_record(b" > read8 1a2b 8 1 funcA"));
        assert!(parser.is_record(b"x>y"));
        assert!(!parser.is_record(b""));
        assert!(!parser.is_record(b" >"));
        // Only byte 1 is checked
        assert!(parser.is_record(b">> read8 1 1 1 f"));
        assert!(!parser.is_record(b"> read8 1 1 1 f"));
        assert!(!parser.is_record(b"ThreadSanitizer: reported 1 warnings"));
    }

    #[test]
    fn test_non_utf8_source_is_lossy() {
        let parser = TraceLineParser::new();
        let event = parser.parse(b" > read8 10 8 1 fn\xff");
        assert_eq!(event.address, 0x10);
        assert_eq!(event.source, "fn\u{fffd}");
    }
}
