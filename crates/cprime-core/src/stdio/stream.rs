//! Byte-at-a-time input with one byte of pushback.
//!
//! Both readers pull single bytes so that a line or token never consumes
//! past its terminator; the pushback slot covers the one case (a lone `\r`)
//! where a byte has to be looked at and returned.

use std::io::{self, Read};

use crate::ctype::{is_line_terminator, is_token_separator};
use crate::except::{Exception, checkpoint};
use crate::stdio::buffer::GrowBuf;

#[derive(Debug)]
pub struct ByteStream<R> {
    inner: R,
    pushback: Option<u8>,
}

impl<R: Read> ByteStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: None,
        }
    }

    /// Next byte, or `None` at end of stream.
    ///
    /// An interrupted read delivers any pending asynchronous fault before
    /// retrying.
    pub fn getc(&mut self) -> Result<Option<u8>, Exception> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => checkpoint()?,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Returns `byte` to the stream. Only one byte of pushback is kept.
    pub fn ungetc(&mut self, byte: u8) {
        self.pushback = Some(byte);
    }

    /// Next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>, Exception> {
        let next = self.getc()?;
        if let Some(byte) = next {
            self.ungetc(byte);
        }
        Ok(next)
    }

    /// After a `\r`, swallows a following `\n`; anything else is pushed back.
    fn absorb_crlf(&mut self) -> Result<(), Exception> {
        match self.getc()? {
            Some(b'\n') | None => {}
            Some(other) => self.ungetc(other),
        }
        Ok(())
    }

    /// Appends `byte`, returning it to the stream if the buffer refuses it.
    fn push_or_unget(&mut self, buf: &mut GrowBuf, byte: u8) -> Result<(), Exception> {
        buf.append(byte).inspect_err(|_| self.ungetc(byte))
    }

    /// Accumulates one line into `buf`, excluding the terminator.
    ///
    /// `\n`, `\r` and `\r\n` all end a line. Returns `false` only when the
    /// stream was already at its end and nothing was read.
    pub fn read_line_into(&mut self, buf: &mut GrowBuf) -> Result<bool, Exception> {
        let mut any = false;
        loop {
            match self.getc()? {
                None => return Ok(any),
                Some(b'\r') => {
                    self.absorb_crlf()?;
                    return Ok(true);
                }
                Some(c) if is_line_terminator(c) => return Ok(true),
                Some(c) => {
                    any = true;
                    self.push_or_unget(buf, c)?;
                }
            }
        }
    }

    /// Skips separators, then accumulates one token into `buf`.
    ///
    /// Returns `false` when only separators (or nothing) remained.
    pub fn read_token_into(&mut self, buf: &mut GrowBuf) -> Result<bool, Exception> {
        let first = loop {
            match self.getc()? {
                None => return Ok(false),
                Some(c) if is_token_separator(c) => {}
                Some(c) => break c,
            }
        };
        self.push_or_unget(buf, first)?;
        loop {
            match self.getc()? {
                None => return Ok(true),
                Some(b'\r') => {
                    self.absorb_crlf()?;
                    return Ok(true);
                }
                Some(c) if is_token_separator(c) => return Ok(true),
                Some(c) => self.push_or_unget(buf, c)?,
            }
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &[u8]) -> Vec<String> {
        let mut stream = ByteStream::new(input);
        let mut buf = GrowBuf::new();
        let mut out = Vec::new();
        while stream.read_line_into(&mut buf).unwrap() {
            out.push(buf.finalize());
        }
        out
    }

    fn tokens(input: &[u8]) -> Vec<String> {
        let mut stream = ByteStream::new(input);
        let mut buf = GrowBuf::new();
        let mut out = Vec::new();
        while stream.read_token_into(&mut buf).unwrap() {
            out.push(buf.finalize());
        }
        out
    }

    #[test]
    fn every_terminator_form_ends_a_line() {
        assert_eq!(lines(b"a\nb\rc\r\nd"), ["a", "b", "c", "d"]);
        assert_eq!(lines(b"\n\n"), ["", ""]);
        assert_eq!(lines(b"\r\r\n"), ["", ""]);
        assert!(lines(b"").is_empty());
    }

    #[test]
    fn lone_cr_keeps_the_next_byte() {
        let mut stream = ByteStream::new(&b"x\ry"[..]);
        let mut buf = GrowBuf::new();
        assert!(stream.read_line_into(&mut buf).unwrap());
        assert_eq!(buf.finalize(), "x");
        assert_eq!(stream.getc().unwrap(), Some(b'y'));
        assert_eq!(stream.getc().unwrap(), None);
    }

    #[test]
    fn tokens_split_on_space_cr_lf_only() {
        assert_eq!(tokens(b"  a b\r\nc\rd\n\ne"), ["a", "b", "c", "d", "e"]);
        assert_eq!(tokens(b"tab\tinside here"), ["tab\tinside", "here"]);
        assert!(tokens(b" \r\n ").is_empty());
    }

    #[test]
    fn peek_does_not_consume() {
        let mut stream = ByteStream::new(&b"q"[..]);
        assert_eq!(stream.peek().unwrap(), Some(b'q'));
        assert_eq!(stream.peek().unwrap(), Some(b'q'));
        assert_eq!(stream.getc().unwrap(), Some(b'q'));
        assert_eq!(stream.peek().unwrap(), None);
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn read_errors_become_exceptions() {
        let mut stream = ByteStream::new(Failing);
        let err = stream.getc().unwrap_err();
        assert_eq!(err.code(), crate::except::ExceptionCode::PipeError);
    }
}
