//! Scribe IO -- Templated text emission and scope guards for code generators.
//!
//! This crate provides the output layer for source-code generators. A
//! [`Printer`](printer::Printer) writes placeholder-substituted text with
//! automatic indentation, and scope guards such as
//! [`NamespacePrinter`](namespace::NamespacePrinter) pair every opening
//! declaration with its closing counterpart, no matter how the enclosing
//! Rust scope is left.
//!
//! # Quick Start
//!
//! ```
//! use scribe_io::prelude::*;
//!
//! let mut printer = Printer::new(Vec::new());
//! {
//!     let mut ns = NamespacePrinter::new(&mut printer, ["a", "b"])?;
//!     ns.print("int $name$ = 0;\n", &[("name", "x")])?;
//! }
//! let out = String::from_utf8(printer.into_inner()).unwrap();
//! assert_eq!(
//!     out,
//!     "namespace a {\nnamespace b {\nint x = 0;\n}  // namespace b\n}  // namespace a\n"
//! );
//! # Ok::<(), PrinterError>(())
//! ```
//!
//! # Modules
//!
//! - [`printer`]: The [`Emit`](printer::Emit) engine contract and the
//!   [`Printer`](printer::Printer) engine.
//! - [`namespace`]: Nested namespace open/close guard.
//! - [`ifdef_guard`]: `#ifndef`/`#define`/`#endif` include guard.
//! - [`recording`]: An engine that records every write, for tests.

#![deny(unsafe_code)]

pub mod ifdef_guard;
pub mod namespace;
pub mod printer;
pub mod recording;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by text emission.
#[derive(Debug, thiserror::Error)]
pub enum PrinterError {
    /// The underlying sink rejected a write.
    #[error("write to output sink failed: {0}")]
    Io(#[from] std::io::Error),

    /// A template referenced a variable that was not supplied.
    #[error("undefined template variable '{name}'")]
    UndefinedVariable {
        /// The placeholder name as it appeared in the template.
        name: String,
    },

    /// A template opened a placeholder that was never closed.
    #[error("unterminated template variable starting at byte {offset}")]
    UnterminatedVariable {
        /// Byte offset of the opening delimiter within the template.
        offset: usize,
    },

    /// `outdent` was called more times than `indent`.
    #[error("outdent called at indentation level 0")]
    IndentUnderflow,

    /// The printer failed earlier and refuses further writes.
    #[error("printer has already failed; no further output is written")]
    Failed,
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::ifdef_guard::{ifdef_guard_identifier, with_ifdef_guard, IfdefGuardPrinter};
    pub use crate::namespace::{
        with_namespace, with_namespace_style, NamespacePrinter, NamespaceStyle,
    };
    pub use crate::printer::{emit_fixed, render, Emit, Printer, PrinterOptions};
    pub use crate::recording::{RecordedWrite, RecordingEmitter};
    pub use crate::PrinterError;
}
