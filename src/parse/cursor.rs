use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use crate::location::{Location, Span};

/// The number of bytes requested from the reader per refill.
pub const CHUNK_SIZE: usize = 4096;

/// A buffered byte reader that tracks the position of the last byte read.
#[derive(Debug)]
pub struct Cursor<R> {
    reader: R,
    buf: Box<[u8; CHUNK_SIZE]>,
    filled: usize,
    pos: usize,
    consumed: usize,
    eof: bool,
    location: Location,
}

impl Cursor<File> {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        Ok(Self::new(path.display().to_string(), file))
    }
}

impl<R: Read> Cursor<R> {
    pub fn new(path: impl Into<Arc<str>>, reader: R) -> Self {
        Self {
            reader,
            buf: Box::new([0; CHUNK_SIZE]),
            filled: 0,
            pos: 0,
            consumed: 0,
            eof: false,
            location: Location::new(path.into()),
        }
    }

    pub fn path(&self) -> &Arc<str> {
        &self.location.path
    }

    /// Returns the location of the most recently read byte, or of the end of
    /// input once it has been reached.
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_eof(&self) -> bool {
        self.eof
    }

    fn refill(&mut self) -> io::Result<()> {
        loop {
            match self.reader.read(&mut self.buf[..]) {
                Ok(n) => {
                    self.filled = n;
                    self.pos = 0;

                    return Ok(());
                }

                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.eof {
            return Ok(None);
        }

        if self.pos == self.filled {
            self.refill()?;
        }

        if self.filled == 0 {
            self.eof = true;
            self.location.column += 1;
            self.location.span = Span::new_with_extent(self.consumed, 0);

            return Ok(None);
        }

        let byte = self.buf[self.pos];
        self.pos += 1;

        if byte == b'\n' {
            self.location.row += 1;
            self.location.column = 0;
        } else {
            self.location.column += 1;
        }

        self.location.span = Span::new_with_extent(self.consumed, 1);
        self.consumed += 1;

        Ok(Some(byte))
    }

    /// Releases the underlying reader.
    pub fn close(self) {}
}
