use std::io::{self, Write};

/// Write one name per line in the given order, or `No <label> found.` when there are none.
pub fn report<W: Write>(out: &mut W, label: &str, names: &[String]) -> io::Result<()> {
    if names.is_empty() {
        return writeln!(out, "No {label} found.");
    }

    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}
