//! An [`Emit`] engine that records every call instead of writing to a sink.
//!
//! [`RecordingEmitter`] is meant for tests of generator code: it keeps the
//! template, the bound variables, and the rendered text of each write, and
//! can be told to fail on demand to exercise error paths.

use std::io;

use crate::printer::{render, Emit};
use crate::PrinterError;

/// A single successful [`Emit::emit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// The template as passed by the caller.
    pub template: String,
    /// Variable bindings in the order they were passed.
    pub vars: Vec<(String, String)>,
    /// The template after substitution.
    pub rendered: String,
}

impl RecordedWrite {
    /// Value bound to `name`, if any. The first binding wins.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Engine that stores each write in memory. Uses `$` placeholders.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmitter {
    writes: Vec<RecordedWrite>,
    /// Number of `emit` calls made, including failed ones.
    calls: usize,
    /// Every call with index >= this value fails.
    fail_from: Option<usize>,
    /// Only the call with exactly this index fails.
    fail_at: Option<usize>,
}

impl RecordingEmitter {
    /// Create an empty recorder that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the next `n` calls succeed and fail every call after them.
    pub fn fail_after(&mut self, n: usize) {
        self.fail_from = Some(self.calls + n);
    }

    /// Fail only the call `n` calls from now (0 = the next call).
    pub fn fail_nth(&mut self, n: usize) {
        self.fail_at = Some(self.calls + n);
    }

    /// All recorded writes, oldest first.
    pub fn writes(&self) -> &[RecordedWrite] {
        &self.writes
    }

    /// Concatenation of every rendered write.
    pub fn rendered(&self) -> String {
        self.writes.iter().map(|w| w.rendered.as_str()).collect()
    }

    /// Number of recorded writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Forget all recorded writes. Failure injection settings are kept.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl Emit for RecordingEmitter {
    fn emit(&mut self, template: &str, vars: &[(&str, &str)]) -> Result<(), PrinterError> {
        let call = self.calls;
        self.calls += 1;

        let injected = self.fail_from.is_some_and(|from| call >= from) || self.fail_at == Some(call);
        if injected {
            return Err(PrinterError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("recording emitter configured to fail call {call}"),
            )));
        }

        let rendered = render(template, vars, '$')?;
        self.writes.push(RecordedWrite {
            template: template.to_owned(),
            vars: vars
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect(),
            rendered,
        });
        Ok(())
    }
}
