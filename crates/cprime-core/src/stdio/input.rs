//! Prompted line input.
//!
//! [`InteractiveReader`] writes a prompt, flushes it, then reads one line.
//! Typed reads re-prompt until a line parses in full; end of input is the
//! only way to get `None` out of them.

use std::fmt;
use std::io::{self, Read, Stdin, Stdout, Write};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, MutexGuard};

use crate::config;
use crate::except::Exception;
use crate::stdio::buffer::GrowBuf;
use crate::stdio::stream::ByteStream;
use crate::stdio::tracker::{AllocationTracker, global_tracker};
use crate::stdlib::Scalar;

pub struct InteractiveReader<'t, R, W> {
    stream: ByteStream<R>,
    prompt_out: W,
    buf: GrowBuf,
    tracker: &'t AllocationTracker,
}

impl<'t, R: Read, W: Write> InteractiveReader<'t, R, W> {
    pub fn new(input: R, prompt_out: W, tracker: &'t AllocationTracker) -> Self {
        Self {
            stream: ByteStream::new(input),
            prompt_out,
            buf: GrowBuf::new().with_limit(config::buffer_limit()),
            tracker,
        }
    }

    /// Replaces the line buffer, e.g. to change growth policy or limit.
    #[must_use]
    pub fn with_buffer(mut self, buf: GrowBuf) -> Self {
        self.buf = buf;
        self
    }

    fn prompt(&mut self, prompt: Option<fmt::Arguments<'_>>) -> Result<(), Exception> {
        if let Some(args) = prompt {
            self.prompt_out.write_fmt(args)?;
            self.prompt_out.flush()?;
        }
        Ok(())
    }

    fn read_raw_line(&mut self) -> Result<Option<Vec<u8>>, Exception> {
        let result = self.stream.read_line_into(&mut self.buf);
        match result {
            Ok(true) => Ok(Some(self.buf.finalize_bytes())),
            Ok(false) => Ok(None),
            Err(e) => {
                self.buf.clear();
                Err(e)
            }
        }
    }

    /// Reads one line after writing `prompt`.
    ///
    /// The string is registered with the tracker. `None` means the input
    /// ended before any byte of a new line.
    pub fn read_line(
        &mut self,
        prompt: Option<fmt::Arguments<'_>>,
    ) -> Result<Option<Arc<str>>, Exception> {
        self.prompt(prompt)?;
        let Some(bytes) = self.read_raw_line()? else {
            return Ok(None);
        };
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Some(self.tracker.track(text)))
    }

    /// Reads lines until one parses as `T`, prompting before each attempt.
    pub fn read_typed<T: Scalar>(
        &mut self,
        prompt: Option<fmt::Arguments<'_>>,
    ) -> Result<Option<T>, Exception> {
        loop {
            self.prompt(prompt)?;
            let Some(line) = self.read_raw_line()? else {
                return Ok(None);
            };
            if let Some(value) = T::parse_strict(&line) {
                return Ok(Some(value));
            }
        }
    }

    pub fn tracker(&self) -> &'t AllocationTracker {
        self.tracker
    }
}

/// Reader over the process's standard input, prompting on standard output.
pub type StdinReader = InteractiveReader<'static, Stdin, Stdout>;

/// Locks the process-wide stdin reader.
pub fn stdin_reader() -> MutexGuard<'static, StdinReader> {
    static READER: OnceLock<Mutex<StdinReader>> = OnceLock::new();
    READER
        .get_or_init(|| {
            Mutex::new(InteractiveReader::new(
                io::stdin(),
                io::stdout(),
                global_tracker(),
            ))
        })
        .lock()
}

/// Prompts on stdout and reads a line from stdin.
pub fn get_string(prompt: Option<fmt::Arguments<'_>>) -> Result<Option<Arc<str>>, Exception> {
    stdin_reader().read_line(prompt)
}

/// Prompts on stdout and reads a `T` from stdin, re-prompting on bad input.
pub fn get_scalar<T: Scalar>(prompt: Option<fmt::Arguments<'_>>) -> Result<Option<T>, Exception> {
    stdin_reader().read_typed(prompt)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __prompt {
    () => {
        ::core::option::Option::None
    };
    ($($arg:tt)+) => {
        ::core::option::Option::Some(::core::format_args!($($arg)+))
    };
}

/// `input!(T)` or `input!(T, "prompt {}", args...)`: typed read from stdin.
#[macro_export]
macro_rules! input {
    ($ty:ty $(,)?) => {
        $crate::stdio::input::get_scalar::<$ty>(::core::option::Option::None)
    };
    ($ty:ty, $($arg:tt)+) => {
        $crate::stdio::input::get_scalar::<$ty>($crate::__prompt!($($arg)+))
    };
}

/// Reads a line from stdin, with an optional formatted prompt.
#[macro_export]
macro_rules! get_string {
    ($($arg:tt)*) => {
        $crate::stdio::input::get_string($crate::__prompt!($($arg)*))
    };
}

#[macro_export]
macro_rules! get_char {
    ($($arg:tt)*) => {
        $crate::stdio::input::get_scalar::<char>($crate::__prompt!($($arg)*))
    };
}

#[macro_export]
macro_rules! get_int {
    ($($arg:tt)*) => {
        $crate::stdio::input::get_scalar::<i32>($crate::__prompt!($($arg)*))
    };
}

#[macro_export]
macro_rules! get_long {
    ($($arg:tt)*) => {
        $crate::stdio::input::get_scalar::<i64>($crate::__prompt!($($arg)*))
    };
}

/// Same as [`get_long!`]; `long long` and `long` share a width here.
#[macro_export]
macro_rules! get_long_long {
    ($($arg:tt)*) => {
        $crate::stdio::input::get_scalar::<i64>($crate::__prompt!($($arg)*))
    };
}

#[macro_export]
macro_rules! get_float {
    ($($arg:tt)*) => {
        $crate::stdio::input::get_scalar::<f32>($crate::__prompt!($($arg)*))
    };
}

#[macro_export]
macro_rules! get_double {
    ($($arg:tt)*) => {
        $crate::stdio::input::get_scalar::<f64>($crate::__prompt!($($arg)*))
    };
}
