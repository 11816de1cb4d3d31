// Licensed under the Apache-2.0 license

//! Driver-wide plumbing shared by the bus engine and the codec client.
//!
//! Every driver in this crate is generic over a [`Logger`] and defaults to
//! [`NoOpLogger`], so logging costs nothing unless a sink is wired in. On
//! hardware the usual sink is a UART exposed through `embedded_io::Write`,
//! see [`WriteLogger`].

use core::fmt::{self, Write as _};
use heapless::String;

/// Longest log line emitted by [`WriteLogger`]; longer lines are truncated.
pub const LOG_LINE_CAPACITY: usize = 128;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Sink for driver diagnostics.
pub trait Logger {
    fn log(&mut self, level: LogLevel, args: fmt::Arguments<'_>);

    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    fn warn(&mut self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    fn info(&mut self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }
}

/// Logger that discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline(always)]
    fn log(&mut self, _level: LogLevel, _args: fmt::Arguments<'_>) {}
}

/// Fixed-capacity line buffer that silently drops whatever does not fit.
struct Line(String<LOG_LINE_CAPACITY>);

impl fmt::Write for Line {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Line-oriented logger over any `embedded_io::Write` sink (typically a UART).
///
/// Each record is formatted as `[LEVEL] message\r\n`. Records above
/// `max_level` are dropped. Write errors from the sink are ignored: a
/// failing console must never take the bus driver down with it.
pub struct WriteLogger<W: embedded_io::Write> {
    sink: W,
    max_level: LogLevel,
}

impl<W: embedded_io::Write> WriteLogger<W> {
    pub fn new(sink: W, max_level: LogLevel) -> Self {
        Self { sink, max_level }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: embedded_io::Write> Logger for WriteLogger<W> {
    fn log(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        if level > self.max_level {
            return;
        }

        let mut line = Line(String::new());
        let _ = write!(line, "[{}] ", level.tag());
        let _ = line.write_fmt(args);

        let _ = self.sink.write_all(line.0.as_bytes());
        let _ = self.sink.write_all(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CaptureSink {
        bytes: std::vec::Vec<u8>,
    }

    impl embedded_io::ErrorType for CaptureSink {
        type Error = core::convert::Infallible;
    }

    impl embedded_io::Write for CaptureSink {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_write_logger_formats_lines() {
        let mut logger = WriteLogger::new(CaptureSink::default(), LogLevel::Info);

        logger.info(format_args!("codec ready, {} registers", 62));
        logger.error(format_args!("bus stuck"));

        let out = std::string::String::from_utf8(logger.into_inner().bytes).unwrap();
        assert_eq!(out, "[INFO] codec ready, 62 registers\r\n[ERROR] bus stuck\r\n");
    }

    #[test]
    fn test_write_logger_filters_by_level() {
        let mut logger = WriteLogger::new(CaptureSink::default(), LogLevel::Warn);

        logger.debug(format_args!("drained {} bytes", 3));
        logger.info(format_args!("init"));

        assert!(logger.into_inner().bytes.is_empty());
    }

    #[test]
    fn test_write_logger_truncates_long_lines() {
        let mut logger = WriteLogger::new(CaptureSink::default(), LogLevel::Debug);
        let long = "x".repeat(LOG_LINE_CAPACITY * 2);

        logger.debug(format_args!("{long}"));

        let bytes = logger.into_inner().bytes;
        assert_eq!(bytes.len(), LOG_LINE_CAPACITY + 2);
        assert!(bytes.ends_with(b"\r\n"));
    }
}
