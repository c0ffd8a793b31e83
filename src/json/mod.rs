//! Purpose: JSON parsing boundary shared by library callers and the CLI.
//! Exports: `parse` module with decode entrypoints and failure classification.
//! Role: Single seam between raw response bodies and the core parser.
//! Invariants: Callers outside `core` decode through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub mod parse;
