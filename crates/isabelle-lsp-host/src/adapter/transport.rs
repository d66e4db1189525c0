//! Stdio transport with LSP header framing.
//!
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::process::{ChildStdin, ChildStdout};

use super::error::TransportError;

const CONTENT_LENGTH: &str = "Content-Length:";

/// Transport over a spawned process's pipes.
pub type ChildTransport = StdioTransport<BufReader<ChildStdout>, BufWriter<ChildStdin>>;

/// Reads and writes `Content-Length` framed messages.
#[derive(Debug)]
pub struct StdioTransport<R, W> {
    reader: R,
    writer: W,
}

impl ChildTransport {
    /// Creates a transport from process handles.
    #[must_use]
    pub fn from_child(stdout: ChildStdout, stdin: ChildStdin) -> Self {
        Self::new(BufReader::new(stdout), BufWriter::new(stdin))
    }
}

impl<R: BufRead, W: Write> StdioTransport<R, W> {
    /// Creates a transport over a buffered reader and a writer.
    #[must_use]
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Sends one framed message.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if writing fails.
    pub fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        write!(self.writer, "{CONTENT_LENGTH} {}\r\n\r\n", message.len())?;
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Receives one framed message, blocking until it is complete.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Closed` when the stream ends before a new
    /// message starts, and `TransportError::MissingContentLength` or
    /// `TransportError::InvalidHeader` for malformed headers.
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let content_length = self.read_headers()?;
        let mut content = vec![0_u8; content_length];
        self.reader.read_exact(&mut content)?;
        Ok(content)
    }

    /// Underlying writer.
    #[must_use]
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length = None;
        let mut started = false;

        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(if started {
                    TransportError::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed while reading headers",
                    ))
                } else {
                    TransportError::Closed
                });
            }
            started = true;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            if let Some(value) = trimmed.strip_prefix(CONTENT_LENGTH) {
                content_length = Some(
                    value
                        .trim()
                        .parse()
                        .map_err(|_| TransportError::InvalidHeader)?,
                );
            }
        }

        content_length.ok_or(TransportError::MissingContentLength)
    }
}
