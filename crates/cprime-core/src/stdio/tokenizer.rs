//! Tokenizing reader over a file (or any byte source).
//!
//! Lines, space-separated tokens, single characters and typed scalars can be
//! mixed freely on one reader; each call picks up exactly where the last one
//! stopped. A token that does not parse as the requested scalar yields
//! `None` and is not retried.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::config;
use crate::ctype::is_space;
use crate::except::{Exception, ExceptionCode};
use crate::stdio::buffer::GrowBuf;
use crate::stdio::stream::ByteStream;
use crate::stdlib::Scalar;

#[derive(Debug)]
pub struct Tokenizer<R> {
    stream: ByteStream<R>,
    buf: GrowBuf,
}

/// Tokenizer over a buffered, read-only file.
pub type FileTokenizer = Tokenizer<BufReader<File>>;

impl Tokenizer<BufReader<File>> {
    /// Opens `path` for tokenizing.
    ///
    /// # Errors
    ///
    /// [`ExceptionCode::IllegalArgument`] for an empty path and
    /// [`ExceptionCode::FileNotFound`] when the path is not a readable
    /// regular file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Exception> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Exception::with_detail(ExceptionCode::IllegalArgument, "empty path"));
        }
        let not_found = || Exception::with_detail(ExceptionCode::FileNotFound, path.display().to_string());
        let file = File::open(path).map_err(|_| not_found())?;
        match file.metadata() {
            Ok(meta) if meta.is_file() => Ok(Self::new(BufReader::new(file))),
            _ => Err(not_found()),
        }
    }
}

impl<R: Read> Tokenizer<R> {
    pub fn new(source: R) -> Self {
        Self {
            stream: ByteStream::new(source),
            buf: GrowBuf::new().with_limit(config::buffer_limit()),
        }
    }

    #[must_use]
    pub fn with_buffer(mut self, buf: GrowBuf) -> Self {
        self.buf = buf;
        self
    }

    fn take_bytes(&mut self, filled: Result<bool, Exception>) -> Result<Option<Vec<u8>>, Exception> {
        match filled {
            Ok(true) => Ok(Some(self.buf.finalize_bytes())),
            Ok(false) => {
                self.buf.clear();
                Ok(None)
            }
            Err(e) => {
                self.buf.clear();
                Err(e)
            }
        }
    }

    /// Next line without its terminator. `None` only at end of file with
    /// nothing read.
    pub fn next_line(&mut self) -> Result<Option<String>, Exception> {
        let filled = self.stream.read_line_into(&mut self.buf);
        Ok(self
            .take_bytes(filled)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn next_token_bytes(&mut self) -> Result<Option<Vec<u8>>, Exception> {
        let filled = self.stream.read_token_into(&mut self.buf);
        self.take_bytes(filled)
    }

    /// Next run of bytes delimited by space, `\r` or `\n`.
    pub fn next_token(&mut self) -> Result<Option<String>, Exception> {
        Ok(self
            .next_token_bytes()?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Next byte that is not whitespace.
    pub fn next_char(&mut self) -> Result<Option<char>, Exception> {
        loop {
            match self.stream.getc()? {
                Some(c) if is_space(c) => {}
                other => return Ok(other.map(char::from)),
            }
        }
    }

    /// Next token parsed as `T`. A malformed token is consumed and yields
    /// `None`.
    pub fn next_scalar<T: Scalar>(&mut self) -> Result<Option<T>, Exception> {
        Ok(self
            .next_token_bytes()?
            .and_then(|bytes| T::parse_strict(&bytes)))
    }

    pub fn next_int(&mut self) -> Result<Option<i32>, Exception> {
        self.next_scalar()
    }

    pub fn next_long(&mut self) -> Result<Option<i64>, Exception> {
        self.next_scalar()
    }

    pub fn next_float(&mut self) -> Result<Option<f32>, Exception> {
        self.next_scalar()
    }

    pub fn next_double(&mut self) -> Result<Option<f64>, Exception> {
        self.next_scalar()
    }

    /// Whether any byte remains. Never consumes.
    pub fn has_next(&mut self) -> Result<bool, Exception> {
        Ok(self.stream.peek()?.is_some())
    }

    /// Releases the source and the buffer.
    pub fn close(self) {}

    pub fn into_inner(self) -> R {
        self.stream.into_inner()
    }
}
