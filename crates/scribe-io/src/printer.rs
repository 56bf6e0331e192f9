//! Templated text emission with automatic indentation.
//!
//! The [`Emit`] trait is the contract every scope guard in this crate is
//! written against: emit one template with named placeholders substituted.
//! [`Printer`] is the concrete engine. It writes to any [`std::io::Write`]
//! sink, inserts the current indentation at the start of every non-empty
//! line, and becomes permanently failed after the first sink error.
//!
//! # Template syntax
//!
//! Placeholders are delimited by a single character (`$` by default):
//! `$name$` is replaced with the value bound to `name`, and `$$` emits a
//! literal `$`. Template errors (undefined or unterminated placeholders) are
//! detected before anything reaches the sink.
//!
//! # Example
//!
//! ```
//! use scribe_io::printer::Printer;
//!
//! let mut printer = Printer::new(Vec::new());
//! printer.print("struct $name$ {\n", &[("name", "Foo")])?;
//! printer.indent();
//! printer.print("int x;  // costs $$1\n", &[])?;
//! printer.outdent()?;
//! printer.print("};\n", &[])?;
//!
//! let out = String::from_utf8(printer.into_inner()).unwrap();
//! assert_eq!(out, "struct Foo {\n  int x;  // costs $1\n};\n");
//! # Ok::<(), scribe_io::PrinterError>(())
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::PrinterError;

// ---------------------------------------------------------------------------
// Emit
// ---------------------------------------------------------------------------

/// A text-emission engine: writes a template with its placeholders
/// substituted from `vars`.
///
/// Implementations own all formatting state (indentation, delimiter). Scope
/// guards only call `emit`; they never adjust indentation themselves.
pub trait Emit {
    /// Emit `template` with every placeholder replaced by its binding in
    /// `vars`. Failures are reported as-is to the caller.
    fn emit(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), PrinterError>;

    /// Character that delimits placeholders in templates passed to `emit`.
    fn delimiter(&self) -> char {
        '$'
    }
}

impl<E: Emit + ?Sized> Emit for &mut E {
    fn emit(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), PrinterError> {
        (**self).emit(template, vars)
    }

    fn delimiter(&self) -> char {
        (**self).delimiter()
    }
}

/// Variable that carries pre-rendered text in [`emit_fixed`].
const FIXED_TEXT_VAR: &str = "text";

/// Render `template` with `$` placeholders, then emit the result verbatim
/// through `emitter`, whatever delimiter the engine uses.
///
/// The rendered text is bound to a single placeholder in the engine's own
/// syntax, so names containing the engine's delimiter are written as-is.
/// `vars` are passed along after it for engines that inspect bindings.
///
/// ```
/// use scribe_io::printer::{emit_fixed, Printer, PrinterOptions};
///
/// let options = PrinterOptions { delimiter: '@', ..Default::default() };
/// let mut printer = Printer::with_options(Vec::new(), options);
/// emit_fixed(&mut printer, "namespace $ns$ {\n", &[("ns", "a@b")])?;
///
/// let out = String::from_utf8(printer.into_inner()).unwrap();
/// assert_eq!(out, "namespace a@b {\n");
/// # Ok::<(), scribe_io::PrinterError>(())
/// ```
pub fn emit_fixed<E: Emit + ?Sized>(
    emitter: &mut E,
    template: &str,
    vars: &[(&str, &str)],
) -> Result<(), PrinterError> {
    let text = render(template, vars, '$')?;
    let delimiter = emitter.delimiter();
    let placeholder = format!("{delimiter}{FIXED_TEXT_VAR}{delimiter}");

    let mut bound = Vec::with_capacity(vars.len() + 1);
    bound.push((FIXED_TEXT_VAR, text.as_str()));
    bound.extend_from_slice(vars);
    emitter.emit(&placeholder, &bound)
}

// ---------------------------------------------------------------------------
// PrinterOptions
// ---------------------------------------------------------------------------

/// Configuration for a [`Printer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterOptions {
    /// Character that opens and closes a placeholder.
    pub delimiter: char,
    /// Text inserted once per indentation level at the start of a line.
    pub indent: String,
}

impl Default for PrinterOptions {
    /// Defaults to `$` placeholders and two-space indentation.
    fn default() -> Self {
        Self {
            delimiter: '$',
            indent: "  ".to_owned(),
        }
    }
}

impl PrinterOptions {
    /// Parse options from a JSON document. Missing fields keep their
    /// defaults.
    ///
    /// ```
    /// use scribe_io::printer::PrinterOptions;
    ///
    /// let options = PrinterOptions::from_json(r#"{ "indent": "\t" }"#).unwrap();
    /// assert_eq!(options.delimiter, '$');
    /// assert_eq!(options.indent, "\t");
    /// ```
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

/// Substitute every `<delimiter>name<delimiter>` placeholder in `template`.
///
/// An empty name (two adjacent delimiters) produces a literal delimiter. When
/// a name is bound more than once in `vars`, the first binding wins.
pub fn render(
    template: &str,
    vars: &[(&str, &str)],
    delimiter: char,
) -> Result<String, PrinterError> {
    let width = delimiter.len_utf8();
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;

    while let Some(rel) = template[pos..].find(delimiter) {
        let start = pos + rel;
        out.push_str(&template[pos..start]);

        let name_start = start + width;
        let Some(name_len) = template[name_start..].find(delimiter) else {
            return Err(PrinterError::UnterminatedVariable { offset: start });
        };
        let name = &template[name_start..name_start + name_len];

        if name.is_empty() {
            out.push(delimiter);
        } else {
            let value = vars
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| PrinterError::UndefinedVariable {
                    name: name.to_owned(),
                })?;
            out.push_str(value);
        }

        pos = name_start + name_len + width;
    }

    out.push_str(&template[pos..]);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Printer
// ---------------------------------------------------------------------------

/// Text-emission engine writing to an [`std::io::Write`] sink.
#[derive(Debug)]
pub struct Printer<W: Write> {
    sink: W,
    options: PrinterOptions,
    /// Current indentation depth in units of `options.indent`.
    indent_level: usize,
    /// True when the next byte written starts a new line.
    at_line_start: bool,
    /// Set after the first sink error; all later writes are refused.
    failed: bool,
    bytes_written: u64,
}

impl<W: Write> Printer<W> {
    /// Create a printer with default options.
    pub fn new(sink: W) -> Self {
        Self::with_options(sink, PrinterOptions::default())
    }

    /// Create a printer with the given options.
    pub fn with_options(sink: W, options: PrinterOptions) -> Self {
        Self {
            sink,
            options,
            indent_level: 0,
            at_line_start: true,
            failed: false,
            bytes_written: 0,
        }
    }

    /// Print `template` with placeholders substituted from `vars`.
    pub fn print(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), PrinterError> {
        if self.failed {
            return Err(PrinterError::Failed);
        }
        let text = render(template, vars, self.options.delimiter)?;
        self.write_text(&text)
    }

    /// Write `text` verbatim, without placeholder substitution.
    /// Indentation is still applied.
    pub fn write_raw(&mut self, text: &str) -> Result<(), PrinterError> {
        if self.failed {
            return Err(PrinterError::Failed);
        }
        self.write_text(text)
    }

    /// Increase indentation by one level for subsequent lines.
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation by one level.
    pub fn outdent(&mut self) -> Result<(), PrinterError> {
        if self.indent_level == 0 {
            return Err(PrinterError::IndentUnderflow);
        }
        self.indent_level -= 1;
        Ok(())
    }

    /// Current indentation depth.
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Returns `true` once a sink write has failed.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Total bytes accepted by the sink so far.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// The options this printer was created with.
    pub fn options(&self) -> &PrinterOptions {
        &self.options
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Consume the printer and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_text(&mut self, text: &str) -> Result<(), PrinterError> {
        if text.is_empty() {
            return Ok(());
        }

        let mut buf = String::with_capacity(text.len());
        for line in text.split_inclusive('\n') {
            if self.at_line_start && line != "\n" {
                for _ in 0..self.indent_level {
                    buf.push_str(&self.options.indent);
                }
            }
            buf.push_str(line);
            self.at_line_start = line.ends_with('\n');
        }

        if let Err(e) = self.sink.write_all(buf.as_bytes()) {
            self.failed = true;
            return Err(PrinterError::Io(e));
        }
        self.bytes_written += buf.len() as u64;
        tracing::trace!(bytes = buf.len(), "printer wrote text");
        Ok(())
    }
}

impl<W: Write> Emit for Printer<W> {
    fn emit(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), PrinterError> {
        self.print(template, vars)
    }

    fn delimiter(&self) -> char {
        self.options.delimiter
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
