//! Declaration scanning
//!
//! Splits a FASTG stream into declaration blocks: a `>` header line followed
//! by the sequence lines up to the next header or end of input. Lines are read
//! as raw bytes so that stray non-ASCII bytes surface as located parse errors
//! rather than decoding failures.

use crate::error::{FastgError, Result};
use std::io::BufRead;

const DECLARATION_SENTINEL: u8 = b'>';
const STATEMENT_TERMINATOR: char = ';';

/// A raw sequence line together with its line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLine {
    pub line: usize,
    pub bytes: Vec<u8>,
}

/// One header line and its sequence body, not yet interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Line number of the header
    pub line: usize,
    /// Header text between `>` and the terminating `;`
    pub header: String,
    pub body: Vec<BodyLine>,
}

impl Declaration {
    /// Split the header into the primary edge-name token and the adjacency
    /// region, which is empty or starts with `:`
    pub fn split_header(&self) -> (&str, &str) {
        match self.header.find(':') {
            Some(pos) => self.header.split_at(pos),
            None => (self.header.as_str(), ""),
        }
    }
}

/// Iterator over the declarations of a FASTG stream
///
/// Stops after yielding the first error.
pub struct DeclarationScanner<R> {
    reader: R,
    line_number: usize,
    pending: Option<(usize, Vec<u8>)>,
    finished: bool,
}

impl<R: BufRead> DeclarationScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            pending: None,
            finished: false,
        }
    }

    /// Next raw line without its `\n` / `\r\n` ending
    fn next_line(&mut self) -> Option<Result<(usize, Vec<u8>)>> {
        if let Some(pending) = self.pending.take() {
            return Some(Ok(pending));
        }

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                self.line_number += 1;
                Some(Ok((self.line_number, buf)))
            }
            Err(e) => Some(Err(FastgError::from(e))),
        }
    }

    fn scan_declaration(&mut self, line: usize, raw_header: Vec<u8>) -> Result<Declaration> {
        if raw_header.first() != Some(&DECLARATION_SENTINEL) {
            return Err(FastgError::ContentBeforeHeader { line });
        }

        let decoded = String::from_utf8_lossy(&raw_header[1..]);
        let trimmed = decoded.trim_end();
        let header = trimmed
            .strip_suffix(STATEMENT_TERMINATOR)
            .ok_or_else(|| FastgError::MissingTerminator {
                line,
                header: format!(">{}", trimmed),
            })?
            .to_string();

        let mut body = Vec::new();
        while let Some(next) = self.next_line() {
            let (body_line, bytes) = next?;
            if bytes.first() == Some(&DECLARATION_SENTINEL) {
                self.pending = Some((body_line, bytes));
                break;
            }
            body.push(BodyLine {
                line: body_line,
                bytes,
            });
        }

        Ok(Declaration { line, header, body })
    }
}

impl<R: BufRead> Iterator for DeclarationScanner<R> {
    type Item = Result<Declaration>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = match self.next_line()? {
            Ok((line, bytes)) => self.scan_declaration(line, bytes),
            Err(e) => Err(e),
        };

        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}
