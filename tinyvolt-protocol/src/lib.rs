//! Tinyvolt Serial Command Protocol
//!
//! This crate defines the line-oriented text protocol spoken over the
//! device's serial transport. The protocol is designed for hand typing on a
//! terminal as much as for scripted hosts: one command per line, short
//! tokens, terse responses.
//!
//! # Protocol Overview
//!
//! ```text
//! host → device:   <token>[<arg>] CR[LF]
//! device → host:   OK[:<payload>] CRLF      on success
//!                  ERR:<reason>   CRLF      on failure
//! ```
//!
//! Command tokens: `+`/`INC` and `-`/`DEC` (step the working value), `C`
//! (report raw code), `V` (report calibrated units), `Z` (calibrate zero),
//! `F` (calibrate full scale), `D` (dump state), `L<n>` (set verbosity).
//!
//! Whether a token is accepted on a given device is decided by the compiled
//! feature set in `tinyvolt-core`; this crate only classifies bytes.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod response;
pub mod verbosity;

pub use command::{Command, ParseError};
pub use line::{Line, LineError, LineReader, MAX_LINE_LEN};
pub use response::{CommandError, Payload, Response, MAX_RESPONSE_LEN};
pub use verbosity::VerbosityLevel;
