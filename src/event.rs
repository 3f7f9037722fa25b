pub type Address = u64;
pub type ThreadId = u32;

/// One memory access recorded by the tracer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessEvent {
    pub access_kind: String,
    pub source: String,
    pub address: Address,
    pub thread_id: ThreadId,
    /// Parsed for completeness; aggregation never looks at it.
    pub access_size: u32,
}

/// Read/write tag derived from an access kind token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessClass {
    Read,
    Write,
}

impl AccessClass {
    pub fn is_read(self) -> bool {
        matches!(self, AccessClass::Read)
    }
}

/// Classify an access kind token.
///
/// Any token containing `read` (case-sensitive, anywhere in the token) is a read;
/// everything else, including unknown tokens such as `atomic`, counts as a write.
pub fn classify_access(access_kind: &str) -> AccessClass {
    if access_kind.contains("read") {
        AccessClass::Read
    } else {
        AccessClass::Write
    }
}

impl AccessEvent {
    pub fn class(&self) -> AccessClass {
        classify_access(&self.access_kind)
    }
}
