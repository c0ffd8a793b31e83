//! Purpose: Library crate behind the `jsonconv` CLI: JSON reader, value model, lookups.
//! Exports: `core` (value model, parser, options, errors), `json` (parse boundary),
//! `lookup` (paths and defaults), `quote` (option-chain extraction), `delta`
//! (Black-Scholes delta for contracts).
//! Role: Turns already-fetched response bodies into value trees callers can query.
//! Invariants: Parsing is pure and synchronous; no I/O happens inside the library.
pub mod core;
pub mod delta;
pub mod json;
pub mod lookup;
pub mod quote;

pub use crate::core::error::{Error, ErrorKind, to_exit_code};
pub use crate::core::options::{EscapePolicy, ParseOptions, TrailingPolicy};
pub use crate::core::parser::{parse, parse_with};
pub use crate::core::value::{Number, Value, ValueKind};
