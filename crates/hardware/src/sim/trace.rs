//! Memory trace reader.
//!
//! A trace is a text stream with one access per line:
//!
//! ```text
//! # kind  address
//! i 0x400a10
//! d 7ffe1c28
//! ```
//!
//! The kind is `i`/`I` for an instruction fetch or `d`/`D` for a data access.
//! The address is hexadecimal, with or without a `0x` prefix, and may come
//! before or after the kind. Tokens after the first two are ignored, as are blank
//! lines and lines starting with `#`.

use std::io::{self, BufRead};

use thiserror::Error;

use crate::common::AccessKind;

/// One access of a trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Instruction or data access.
    pub kind: AccessKind,
    /// Accessed byte address.
    pub addr: u64,
}

impl TraceRecord {
    /// Instruction fetch of `addr`.
    pub const fn instruction(addr: u64) -> Self {
        Self {
            kind: AccessKind::Instruction,
            addr,
        }
    }

    /// Data access of `addr`.
    pub const fn data(addr: u64) -> Self {
        Self {
            kind: AccessKind::Data,
            addr,
        }
    }
}

/// Failure to read or parse a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),

    /// A line did not contain an access kind and an address.
    #[error("line {line}: expected `<i|d> <hex address>`, got `{text}`")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Offending line.
        text: String,
    },

    /// The address token is not a hexadecimal 64-bit value.
    #[error("line {line}: invalid address `{token}`")]
    Address {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },
}

fn parse_hex(token: &str) -> Option<u64> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u64::from_str_radix(digits, 16).ok()
}

/// Parses a single trace line.
///
/// Returns `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] when no access kind or no second token is
/// present and [`TraceError::Address`] when the address is not valid hex.
pub fn parse_line(text: &str, line: usize) -> Result<Option<TraceRecord>, TraceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let malformed = || TraceError::Malformed {
        line,
        text: trimmed.to_owned(),
    };
    let mut tokens = trimmed.split_whitespace();
    let first = tokens.next().ok_or_else(malformed)?;
    let second = tokens.next().ok_or_else(malformed)?;

    let (kind, token) = match (
        AccessKind::from_mnemonic(first),
        AccessKind::from_mnemonic(second),
    ) {
        (Some(kind), _) => (kind, second),
        (None, Some(kind)) => (kind, first),
        (None, None) => return Err(malformed()),
    };
    let addr = parse_hex(token).ok_or_else(|| TraceError::Address {
        line,
        token: token.to_owned(),
    })?;
    Ok(Some(TraceRecord { kind, addr }))
}

/// Iterator over the records of a buffered trace source.
#[derive(Debug)]
pub struct TraceReader<R> {
    source: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(source: R) -> Self {
        Self {
            source,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.source.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line += 1;
                    match parse_line(&self.buf, self.line) {
                        Ok(Some(record)) => return Some(Ok(record)),
                        Ok(None) => {}
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
