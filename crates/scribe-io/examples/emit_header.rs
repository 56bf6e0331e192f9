//! Emit a small C++ header to stdout.
//!
//! Usage: `cargo run --example emit_header -- [header path] [namespace]...`
//!
//! Defaults to `demo/widget.pb.h` inside `demo::v1`. Set `RUST_LOG=debug` to
//! see scope open/close events.

use std::io;

use scribe_io::prelude::*;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let header = args.next().unwrap_or_else(|| "demo/widget.pb.h".to_owned());
    let mut namespaces: Vec<String> = args.collect();
    if namespaces.is_empty() {
        namespaces = vec!["demo".to_owned(), "v1".to_owned()];
    }

    let stdout = io::stdout();
    let mut printer = Printer::new(stdout.lock());

    with_ifdef_guard(&mut printer, &header, |p| -> anyhow::Result<()> {
        p.print("#include <cstdint>\n\n", &[])?;
        let mut ns = NamespacePrinter::new(p, namespaces.iter().cloned())?;
        ns.print("class $class$ final {\n", &[("class", "Widget")])?;
        ns.print(" public:\n", &[])?;
        ns.indent();
        ns.print("int32_t id() const { return id_; }\n", &[])?;
        ns.outdent()?;
        ns.print("\n private:\n", &[])?;
        ns.indent();
        ns.print("int32_t id_ = 0;\n", &[])?;
        ns.outdent()?;
        ns.print("};\n", &[])?;
        ns.finish()?;
        Ok(())
    })?;

    Ok(())
}
