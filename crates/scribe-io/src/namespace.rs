//! Scope guard that wraps generated output in nested namespaces.
//!
//! A [`NamespacePrinter`] writes one opening declaration per component of a
//! namespace path when it is created, outermost first. When it goes out of
//! scope it writes the matching closing declarations innermost first, each
//! followed by a comment naming the namespace it closes. The close pass runs
//! on every exit path: normal fall-through, early `return`, `?` propagation,
//! and panic unwinding.
//!
//! While the guard is alive it holds the only mutable borrow of the engine,
//! so enclosed content is written *through* the guard (it dereferences to
//! the engine and implements [`Emit`] itself). Nested scopes are created by
//! constructing another guard on top of the first one; the borrow checker
//! makes it impossible to close them out of order.
//!
//! # Output
//!
//! With the default [`NamespaceStyle::cpp`] style and the path
//! `["a", "b", "c"]`:
//!
//! ```text
//! namespace a {
//! namespace b {
//! namespace c {
//! ...enclosed content...
//! }  // namespace c
//! }  // namespace b
//! }  // namespace a
//! ```
//!
//! The closing comment names the single component being closed. Close
//! templates also receive the fully qualified name as `qualified`, so a
//! custom style can opt into `}  // namespace a::b::c` instead.
//!
//! # Errors
//!
//! Engine failures while opening are returned from the constructor; any
//! components already opened are closed before the error is returned.
//! The close pass always attempts every open component: a failed close is
//! logged with `tracing::warn!` and the pass moves on to the next one.
//! [`NamespacePrinter::finish`] returns the first close failure; an implicit
//! close (in `Drop`) only logs it.
//!
//! # Example
//!
//! ```
//! use scribe_io::namespace::NamespacePrinter;
//! use scribe_io::printer::Printer;
//!
//! let mut printer = Printer::new(Vec::new());
//! {
//!     let mut outer = NamespacePrinter::new(&mut printer, ["proto"])?;
//!     let mut inner = NamespacePrinter::new(&mut outer, ["internal"])?;
//!     inner.print("class $name$;\n", &[("name", "Arena")])?;
//! }
//!
//! let out = String::from_utf8(printer.into_inner()).unwrap();
//! assert_eq!(
//!     out,
//!     "namespace proto {\n\
//!      namespace internal {\n\
//!      class Arena;\n\
//!      }  // namespace internal\n\
//!      }  // namespace proto\n"
//! );
//! # Ok::<(), scribe_io::PrinterError>(())
//! ```

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::printer::{emit_fixed, Emit};
use crate::PrinterError;

// ---------------------------------------------------------------------------
// NamespaceStyle
// ---------------------------------------------------------------------------

/// Templates used to open and close a single namespace component.
///
/// Both templates are rendered with two variables bound:
///
/// - `ns`: the component being opened or closed.
/// - `qualified`: every component from the outermost up to and including
///   this one, joined with [`separator`](Self::separator).
///
/// Templates always use `$` placeholders. They are rendered by the guard and
/// the result is written verbatim, so the engine's own delimiter does not
/// matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceStyle {
    /// Template written once per component, outermost first.
    pub open: String,
    /// Template written once per component, innermost first.
    pub close: String,
    /// Separator used to build the `qualified` variable.
    pub separator: String,
}

impl NamespaceStyle {
    /// C++ `namespace x {` / `}  // namespace x`.
    pub fn cpp() -> Self {
        Self {
            open: "namespace $ns$ {\n".to_owned(),
            close: "}  // namespace $ns$\n".to_owned(),
            separator: "::".to_owned(),
        }
    }

    /// Rust `pub mod x {` / `}  // mod x`.
    pub fn rust() -> Self {
        Self {
            open: "pub mod $ns$ {\n".to_owned(),
            close: "}  // mod $ns$\n".to_owned(),
            separator: "::".to_owned(),
        }
    }
}

impl Default for NamespaceStyle {
    /// Defaults to [`NamespaceStyle::cpp`].
    fn default() -> Self {
        Self::cpp()
    }
}

// ---------------------------------------------------------------------------
// NamespacePrinter
// ---------------------------------------------------------------------------

/// RAII guard that opens a namespace path on construction and closes it, in
/// reverse, when dropped or [`finish`](Self::finish)ed.
///
/// The path is fixed at construction. An empty path is valid and makes the
/// guard a pure pass-through: nothing is written when it opens or closes.
#[derive(Debug)]
pub struct NamespacePrinter<'p, E: Emit + ?Sized> {
    emitter: &'p mut E,
    components: Vec<String>,
    style: NamespaceStyle,
    /// Number of leading components currently open. Zero once closed.
    open: usize,
}

impl<'p, E: Emit + ?Sized> NamespacePrinter<'p, E> {
    /// Open every component of `components` using [`NamespaceStyle::cpp`].
    pub fn new<I, S>(emitter: &'p mut E, components: I) -> Result<Self, PrinterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_style(emitter, components, NamespaceStyle::default())
    }

    /// Open every component of `components` using `style`.
    ///
    /// If the engine fails part-way through, the components opened so far
    /// are closed again before the error is returned.
    pub fn with_style<I, S>(
        emitter: &'p mut E,
        components: I,
        style: NamespaceStyle,
    ) -> Result<Self, PrinterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut guard = Self {
            emitter,
            components: components.into_iter().map(Into::into).collect(),
            style,
            open: 0,
        };
        // On error the partially opened guard is dropped here, which closes
        // whatever was opened.
        guard.open_all()?;
        Ok(guard)
    }

    /// The namespace path, outermost first.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Number of components that are currently open.
    pub fn depth(&self) -> usize {
        self.open
    }

    /// The style this guard writes with.
    pub fn style(&self) -> &NamespaceStyle {
        &self.style
    }

    /// Close every open component now and report the first engine failure.
    /// Every component is attempted even if an earlier close fails.
    ///
    /// After this returns, successfully or not, the guard has no remaining
    /// obligations and dropping it writes nothing.
    pub fn finish(mut self) -> Result<(), PrinterError> {
        let result = self.close_all();
        self.open = 0;
        result
    }

    fn open_all(&mut self) -> Result<(), PrinterError> {
        let mut qualified = String::new();
        for (index, component) in self.components.iter().enumerate() {
            if index > 0 {
                qualified.push_str(&self.style.separator);
            }
            qualified.push_str(component);
            emit_fixed(
                &mut *self.emitter,
                &self.style.open,
                &[("ns", component.as_str()), ("qualified", qualified.as_str())],
            )?;
            self.open = index + 1;
        }
        if self.open > 0 {
            debug!(depth = self.open, path = %qualified, "opened namespace scope");
        }
        Ok(())
    }

    /// Write a close for every open component, innermost first.
    ///
    /// A failed close is logged and skipped, never retried; the remaining
    /// components are still closed. Returns the first failure.
    fn close_all(&mut self) -> Result<(), PrinterError> {
        if self.open == 0 {
            return Ok(());
        }
        let mut qualified = self.components[..self.open].join(&self.style.separator);
        let path = qualified.clone();
        let mut first_error = None;

        while self.open > 0 {
            let index = self.open - 1;
            self.open = index;
            let component = &self.components[index];
            let result = emit_fixed(
                &mut *self.emitter,
                &self.style.close,
                &[("ns", component.as_str()), ("qualified", qualified.as_str())],
            );
            if let Err(error) = result {
                warn!(
                    %error,
                    ns = %component,
                    remaining = self.open,
                    "failed to close namespace scope"
                );
                first_error.get_or_insert(error);
            }

            let trim = if index > 0 {
                component.len() + self.style.separator.len()
            } else {
                component.len()
            };
            qualified.truncate(qualified.len() - trim);
        }

        match first_error {
            Some(error) => Err(error),
            None => {
                debug!(%path, "closed namespace scope");
                Ok(())
            }
        }
    }
}

impl<E: Emit + ?Sized> Drop for NamespacePrinter<'_, E> {
    fn drop(&mut self) {
        // Failures were already logged per component.
        let _ = self.close_all();
    }
}

impl<E: Emit + ?Sized> Deref for NamespacePrinter<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        &*self.emitter
    }
}

impl<E: Emit + ?Sized> DerefMut for NamespacePrinter<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut *self.emitter
    }
}

impl<E: Emit + ?Sized> Emit for NamespacePrinter<'_, E> {
    fn emit(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), PrinterError> {
        self.emitter.emit(template, vars)
    }

    fn delimiter(&self) -> char {
        self.emitter.delimiter()
    }
}

// ---------------------------------------------------------------------------
// Closure form
// ---------------------------------------------------------------------------

/// Open `components`, run `work` inside them, then close them.
///
/// The close pass runs whether or not `work` succeeds. An error from `work`
/// takes precedence; otherwise a close failure is returned.
///
/// ```
/// use scribe_io::namespace::with_namespace;
/// use scribe_io::printer::{Emit, Printer};
/// use scribe_io::PrinterError;
///
/// let mut printer = Printer::new(Vec::new());
/// with_namespace(&mut printer, ["a"], |p| p.emit("int x;\n", &[]))?;
///
/// let out = String::from_utf8(printer.into_inner()).unwrap();
/// assert_eq!(out, "namespace a {\nint x;\n}  // namespace a\n");
/// # Ok::<(), PrinterError>(())
/// ```
pub fn with_namespace<E, I, S, T, Er, F>(emitter: &mut E, components: I, work: F) -> Result<T, Er>
where
    E: Emit + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
    Er: From<PrinterError>,
    F: FnOnce(&mut E) -> Result<T, Er>,
{
    with_namespace_style(emitter, components, NamespaceStyle::default(), work)
}

/// [`with_namespace`] with an explicit [`NamespaceStyle`].
pub fn with_namespace_style<E, I, S, T, Er, F>(
    emitter: &mut E,
    components: I,
    style: NamespaceStyle,
    work: F,
) -> Result<T, Er>
where
    E: Emit + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
    Er: From<PrinterError>,
    F: FnOnce(&mut E) -> Result<T, Er>,
{
    let mut guard = NamespacePrinter::with_style(emitter, components, style)?;
    let value = work(&mut *guard)?;
    guard.finish()?;
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
