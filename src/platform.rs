use anyhow::Result;
use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::process;
use std::time::Duration;

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
    SignalPipe = 141, // 128 + SIGPIPE (13)
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

fn is_broken_pipe(e: &io::Error) -> bool {
    #[cfg(windows)]
    {
        e.kind() == io::ErrorKind::BrokenPipe
            || e.raw_os_error() == Some(232) // ERROR_NO_DATA
            || e.raw_os_error() == Some(109) // ERROR_BROKEN_PIPE
    }
    #[cfg(not(windows))]
    {
        e.kind() == io::ErrorKind::BrokenPipe
    }
}

/// Stdout wrapper that exits quietly when the reading end of a pipe goes away
pub struct SafeStdout {
    stdout: io::Stdout,
}

impl SafeStdout {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }

    pub fn write_str(&mut self, data: &str) -> Result<()> {
        match self.stdout.write_all(data.as_bytes()) {
            Ok(()) => Ok(()),
            Err(e) if is_broken_pipe(&e) => ExitCode::SignalPipe.exit(),
            Err(e) => Err(anyhow::anyhow!("Failed to write to stdout: {}", e)),
        }
    }

    pub fn writeln(&mut self, data: &str) -> Result<()> {
        self.write_str(data)?;
        self.write_str("\n")
    }

    pub fn flush(&mut self) -> Result<()> {
        match self.stdout.flush() {
            Ok(()) => Ok(()),
            Err(e) if is_broken_pipe(&e) => ExitCode::SignalPipe.exit(),
            Err(e) => Err(anyhow::anyhow!("Failed to flush stdout: {}", e)),
        }
    }
}

impl Default for SafeStdout {
    fn default() -> Self {
        Self::new()
    }
}

/// Stderr wrapper for diagnostics
pub struct SafeStderr {
    stderr: io::Stderr,
    use_color: bool,
}

impl SafeStderr {
    pub fn new() -> Self {
        let stderr = io::stderr();
        let use_color = stderr.is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { stderr, use_color }
    }

    pub fn writeln(&mut self, data: &str) -> Result<()> {
        // Nothing sensible is left to do if stderr itself is gone
        match writeln!(self.stderr, "{}", data) {
            Ok(()) => Ok(()),
            Err(_) => ExitCode::GeneralError.exit(),
        }
    }

    /// Write `tracestat: Error: <message>`, red when stderr is a terminal
    pub fn error(&mut self, message: &str) {
        let line = format_error_message(message, self.use_color);
        self.writeln(&line).unwrap_or(());
    }
}

impl Default for SafeStderr {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_error_message(message: &str, use_color: bool) -> String {
    if use_color {
        format!("\x1b[91mtracestat: Error:\x1b[0m {}", message)
    } else {
        format!("tracestat: Error: {}", message)
    }
}

/// Phase progress on stdout: `Analyzing ... 0.412s`.
///
/// The label is flushed before the phase starts and the elapsed time is appended when
/// it ends, so a slow phase shows what it is doing.
pub struct Progress {
    out: SafeStdout,
    quiet: bool,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        Self {
            out: SafeStdout::new(),
            quiet,
        }
    }

    pub fn begin(&mut self, label: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.out.write_str(label)?;
        self.out.flush()
    }

    pub fn finish(&mut self, elapsed: Duration) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.out.writeln(&format_elapsed(elapsed))?;
        self.out.flush()
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!(" {:.3}s", elapsed.as_secs_f64())
}
