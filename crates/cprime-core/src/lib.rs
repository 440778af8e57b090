//! # cprime-core
//!
//! Exception channel and growable-buffer readers.
//!
//! Codes raised by programs and faults detected at runtime share one
//! taxonomy ([`except::ExceptionCode`]) and one dispatch path
//! ([`except::try_scope`]). The readers in [`stdio`] report missing or
//! malformed data as `None` and resource failures as exceptions.
//!
//! No `unsafe` code is permitted at the crate level; signal handlers live in
//! `cprime-abi`.

#![deny(unsafe_code)]

pub mod config;
pub mod ctype;
pub mod except;
pub mod stdio;
pub mod stdlib;
