//! Result-file writer.
//!
//! The output file is written exactly once per run, by the coordinator,
//! after the join barrier. One record per line:
//!
//! ```text
//! File: <baseName> | Line: <lineNumber> | <lineContent>
//! ```
//!
//! A run with no matches writes a single `No results found for keyword: ...`
//! line instead, so the file always distinguishes "ran, found nothing" from
//! a stale or absent file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::errors::{ScanError, ScanResult};
use crate::results::Match;

/// Writes the canonical result file, truncating any previous contents.
pub fn write_report(path: &Path, keyword: &str, matches: &[Match]) -> ScanResult<()> {
    let file = File::create(path).map_err(|e| ScanError::output_write(path, e))?;
    let mut writer = BufWriter::new(file);

    write_records(&mut writer, keyword, matches).map_err(|e| ScanError::output_write(path, e))?;

    info!(
        "Wrote {} match(es) to {}",
        matches.len(),
        path.display()
    );
    Ok(())
}

fn write_records<W: Write>(writer: &mut W, keyword: &str, matches: &[Match]) -> std::io::Result<()> {
    if matches.is_empty() {
        writeln!(writer, "No results found for keyword: {keyword}")?;
    } else {
        for m in matches {
            writeln!(
                writer,
                "File: {} | Line: {} | {}",
                m.file_name, m.line_number, m.line_content
            )?;
        }
    }
    writer.flush()
}
