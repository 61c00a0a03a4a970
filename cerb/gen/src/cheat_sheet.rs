//! Plain-text reference of every context and a few example records.

use std::fmt::Write;

use serde_json::Value;

use crate::introspect::{Examples, SchemaSnapshot};

const BANNER_WIDTH: usize = 65;

/// Renders the cheat sheet for a snapshot.
///
/// Per context: a `#` banner with the context name, the raw context as
/// pretty JSON under `Context Information:`, then `Example(s):` with the
/// pretty examples, `No example records to pull`, or the indented error.
pub struct CheatSheetBuilder<'a> {
    snapshot: &'a SchemaSnapshot,
}

impl<'a> CheatSheetBuilder<'a> {
    pub fn new(snapshot: &'a SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn build(&self) -> String {
        let snapshot = self.snapshot;
        let banner = "#".repeat(BANNER_WIDTH);
        let mut out = format!(
            "Auto generated on {}, Cerb Build: {} (version {})\n",
            snapshot.captured_at.format("%Y-%m-%d %H:%M:%S UTC"),
            snapshot.build,
            snapshot.version
        );

        // Writing to a String cannot fail.
        for discovered in &snapshot.contexts {
            let _ = write!(
                out,
                "\n{banner}\n{}\n{banner}\n\nContext Information:\n{:#}\n\nExample(s):\n\n",
                discovered.context.name, discovered.raw
            );

            match &discovered.examples {
                Examples::Found(records) => {
                    for record in records {
                        let _ = writeln!(out, "{:#}", Value::Object(record.clone()));
                    }
                    out.push('\n');
                }
                Examples::Empty => out.push_str("No example records to pull\n\n"),
                Examples::Inaccessible(e) => {
                    let _ = writeln!(out, "    {e}");
                }
            }
        }

        if !snapshot.skipped.is_empty() {
            let _ = write!(out, "\n{banner}\nSkipped contexts\n{banner}\n\n");
            for skipped in &snapshot.skipped {
                let _ = writeln!(out, "    {skipped}");
            }
        }

        out
    }
}
