//! Property tests for namespace scoping.
//!
//! These tests use `proptest` to generate random namespace paths and nesting
//! layouts and verify that the write sequence always follows stack
//! discipline: opens outer-to-inner, closes inner-to-outer, exactly once each.

use proptest::prelude::*;
use scribe_io::prelude::*;

fn path_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,7}", 0..6)
}

/// The writes a single guard over `path` must produce around `body` lines.
fn expected_writes(path: &[String], body: &[String]) -> Vec<String> {
    let mut out: Vec<String> = path.iter().map(|ns| format!("namespace {ns} {{\n")).collect();
    out.extend(body.iter().cloned());
    out.extend(path.iter().rev().map(|ns| format!("}}  // namespace {ns}\n")));
    out
}

fn rendered_lines(rec: &RecordingEmitter) -> Vec<String> {
    rec.writes().iter().map(|w| w.rendered.clone()).collect()
}

proptest! {
    #[test]
    fn single_guard_follows_stack_discipline(
        path in path_strategy(),
        body_len in 0..5usize,
    ) {
        let body: Vec<String> = (0..body_len).map(|i| format!("line {i}\n")).collect();
        let mut rec = RecordingEmitter::new();
        {
            let mut ns = NamespacePrinter::new(&mut rec, path.clone()).unwrap();
            prop_assert_eq!(ns.depth(), path.len());
            for line in &body {
                ns.emit(line, &[]).unwrap();
            }
        }

        prop_assert_eq!(rendered_lines(&rec), expected_writes(&path, &body));
    }

    #[test]
    fn nested_guards_match_flattened_path(
        outer in path_strategy(),
        inner in path_strategy(),
    ) {
        let mut nested = RecordingEmitter::new();
        {
            let mut a = NamespacePrinter::new(&mut nested, outer.clone()).unwrap();
            let _b = NamespacePrinter::new(&mut a, inner.clone()).unwrap();
        }

        let flattened: Vec<String> = outer.iter().chain(inner.iter()).cloned().collect();
        prop_assert_eq!(rendered_lines(&nested), expected_writes(&flattened, &[]));
    }

    #[test]
    fn close_comments_name_their_component(path in path_strategy()) {
        let mut rec = RecordingEmitter::new();
        NamespacePrinter::new(&mut rec, path.clone()).unwrap().finish().unwrap();

        let closes: Vec<&str> = rec.writes()[path.len()..]
            .iter()
            .map(|w| w.var("ns").unwrap())
            .collect();
        let reversed: Vec<&str> = path.iter().rev().map(String::as_str).collect();
        prop_assert_eq!(closes, reversed);
    }

    #[test]
    fn output_stays_balanced_when_open_fails(
        path in prop::collection::vec("[a-z]{1,4}", 1..6),
        fail_index in 0..6usize,
    ) {
        let fail_index = fail_index % path.len();
        let mut rec = RecordingEmitter::new();
        rec.fail_nth(fail_index);

        prop_assert!(NamespacePrinter::new(&mut rec, path.clone()).is_err());
        prop_assert_eq!(rendered_lines(&rec), expected_writes(&path[..fail_index], &[]));
    }

    #[test]
    fn printer_output_matches_recorder(path in path_strategy()) {
        let mut printer = Printer::new(Vec::new());
        let mut rec = RecordingEmitter::new();
        drop(NamespacePrinter::new(&mut printer, path.clone()).unwrap());
        drop(NamespacePrinter::new(&mut rec, path.clone()).unwrap());

        let out = String::from_utf8(printer.into_inner()).unwrap();
        prop_assert_eq!(out, rec.rendered());
    }
}
