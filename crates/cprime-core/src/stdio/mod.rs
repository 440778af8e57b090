//! Buffered input.
//!
//! A [`GrowBuf`] accumulates bytes pulled one at a time from a
//! [`ByteStream`]; the interactive reader and the tokenizer both sit on top.

pub mod buffer;
pub mod input;
pub mod stream;
pub mod tokenizer;
pub mod tracker;

pub use buffer::{GrowBuf, GrowthPolicy};
pub use input::{InteractiveReader, StdinReader, get_scalar, get_string, stdin_reader};
pub use stream::ByteStream;
pub use tokenizer::{FileTokenizer, Tokenizer};
pub use tracker::{AllocationTracker, global_tracker};
