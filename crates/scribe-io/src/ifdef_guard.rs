//! Scope guard for C/C++ include guards.
//!
//! [`IfdefGuardPrinter`] writes
//!
//! ```text
//! #ifndef FOO_BAR_H_
//! #define FOO_BAR_H_
//!
//! ```
//!
//! on construction and `\n#endif  // FOO_BAR_H_\n` when it goes out of
//! scope. By default the macro name is derived from the header's file name
//! with [`ifdef_guard_identifier`]; [`IfdefGuardPrinter::with_transform`]
//! accepts a custom mapping. Drop and [`finish`](IfdefGuardPrinter::finish)
//! follow the same failure policy as
//! [`NamespacePrinter`](crate::namespace::NamespacePrinter).

use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};

use crate::printer::{emit_fixed, Emit};
use crate::PrinterError;

const OPEN_TEMPLATE: &str = "#ifndef $id$\n#define $id$\n\n";
const CLOSE_TEMPLATE: &str = "\n#endif  // $id$\n";

/// Default include-guard macro for `filename`: `/`, `.` and `-` become `_`,
/// letters are upper-cased, and a trailing `_` is appended.
///
/// ```
/// use scribe_io::ifdef_guard::ifdef_guard_identifier;
///
/// assert_eq!(
///     ifdef_guard_identifier("google/protobuf/any.pb.h"),
///     "GOOGLE_PROTOBUF_ANY_PB_H_"
/// );
/// ```
pub fn ifdef_guard_identifier(filename: &str) -> String {
    let mut id: String = filename
        .chars()
        .map(|c| match c {
            '/' | '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();
    id.push('_');
    id
}

/// RAII guard that wraps output in `#ifndef`/`#define`/`#endif`.
#[derive(Debug)]
pub struct IfdefGuardPrinter<'p, E: Emit + ?Sized> {
    emitter: &'p mut E,
    identifier: String,
    open: bool,
}

impl<'p, E: Emit + ?Sized> IfdefGuardPrinter<'p, E> {
    /// Open a guard whose macro is [`ifdef_guard_identifier`]`(filename)`.
    pub fn new(emitter: &'p mut E, filename: &str) -> Result<Self, PrinterError> {
        Self::with_transform(emitter, filename, ifdef_guard_identifier)
    }

    /// Open a guard whose macro is `transform(filename)`.
    pub fn with_transform<F>(
        emitter: &'p mut E,
        filename: &str,
        transform: F,
    ) -> Result<Self, PrinterError>
    where
        F: FnOnce(&str) -> String,
    {
        let identifier = transform(filename);
        emit_fixed(&mut *emitter, OPEN_TEMPLATE, &[("id", identifier.as_str())])?;
        debug!(%identifier, "opened include guard");
        Ok(Self {
            emitter,
            identifier,
            open: true,
        })
    }

    /// The guard macro name.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Write the `#endif` now and report engine failures.
    pub fn finish(mut self) -> Result<(), PrinterError> {
        self.close()
    }

    fn close(&mut self) -> Result<(), PrinterError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        emit_fixed(
            &mut *self.emitter,
            CLOSE_TEMPLATE,
            &[("id", self.identifier.as_str())],
        )?;
        debug!(identifier = %self.identifier, "closed include guard");
        Ok(())
    }
}

impl<E: Emit + ?Sized> Drop for IfdefGuardPrinter<'_, E> {
    fn drop(&mut self) {
        if let Err(error) = self.close() {
            warn!(%error, identifier = %self.identifier, "failed to close include guard");
        }
    }
}

impl<E: Emit + ?Sized> Deref for IfdefGuardPrinter<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        &*self.emitter
    }
}

impl<E: Emit + ?Sized> DerefMut for IfdefGuardPrinter<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut *self.emitter
    }
}

impl<E: Emit + ?Sized> Emit for IfdefGuardPrinter<'_, E> {
    fn emit(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), PrinterError> {
        self.emitter.emit(template, vars)
    }

    fn delimiter(&self) -> char {
        self.emitter.delimiter()
    }
}

/// Open an include guard for `filename`, run `work`, then close the guard.
///
/// Error precedence matches [`with_namespace`](crate::namespace::with_namespace).
pub fn with_ifdef_guard<E, T, Er, F>(emitter: &mut E, filename: &str, work: F) -> Result<T, Er>
where
    E: Emit + ?Sized,
    Er: From<PrinterError>,
    F: FnOnce(&mut E) -> Result<T, Er>,
{
    let mut guard = IfdefGuardPrinter::new(emitter, filename)?;
    let value = work(&mut *guard)?;
    guard.finish()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{Printer, PrinterOptions};
    use crate::recording::RecordingEmitter;

    #[test]
    fn identifier_replaces_separators() {
        assert_eq!(ifdef_guard_identifier("a/b-c.h"), "A_B_C_H_");
        assert_eq!(ifdef_guard_identifier(""), "_");
    }

    #[test]
    fn guard_wraps_content() {
        let mut rec = RecordingEmitter::new();
        {
            let mut guard = IfdefGuardPrinter::new(&mut rec, "foo/bar.h").unwrap();
            assert_eq!(guard.identifier(), "FOO_BAR_H_");
            guard.emit("int x;\n", &[]).unwrap();
        }
        assert_eq!(
            rec.rendered(),
            "#ifndef FOO_BAR_H_\n#define FOO_BAR_H_\n\nint x;\n\n#endif  // FOO_BAR_H_\n"
        );
    }

    #[test]
    fn custom_transform_is_used_verbatim() {
        let mut rec = RecordingEmitter::new();
        IfdefGuardPrinter::with_transform(&mut rec, "x.h", |_| "MY_GUARD".to_owned())
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(rec.writes()[0].var("id"), Some("MY_GUARD"));
        assert_eq!(rec.writes()[1].var("id"), Some("MY_GUARD"));
    }

    #[test]
    fn custom_printer_delimiter_keeps_identifier() {
        let options = PrinterOptions {
            delimiter: '%',
            ..Default::default()
        };
        let mut printer = Printer::with_options(Vec::new(), options);
        IfdefGuardPrinter::new(&mut printer, "a.h")
            .unwrap()
            .finish()
            .unwrap();

        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out, "#ifndef A_H_\n#define A_H_\n\n\n#endif  // A_H_\n");
    }

    #[test]
    fn failed_open_writes_no_endif() {
        let mut rec = RecordingEmitter::new();
        rec.fail_nth(0);
        assert!(IfdefGuardPrinter::new(&mut rec, "x.h").is_err());
        assert!(rec.is_empty());
    }

    #[test]
    fn finish_reports_close_failure_once() {
        let mut rec = RecordingEmitter::new();
        rec.fail_nth(1);
        let guard = IfdefGuardPrinter::new(&mut rec, "x.h").unwrap();
        assert!(guard.finish().is_err());
        assert_eq!(rec.len(), 1);
    }
}
