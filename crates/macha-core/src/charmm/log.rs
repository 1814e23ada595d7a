//! Extraction of echoed sections from CHARMM output.
//!
//! The generated blocks bracket their output with `echo START_X` and
//! `echo END_X`. CHARMM logs both the command line and the echoed text, so a
//! section opens at the last start marker seen before its end marker.

/// Marker pair delimiting the HBUILD report.
pub const HBUILD_MARKERS: (&str, &str) = ("START_HBUILD", "END_HBUILD");
/// Marker pair delimiting the used-parameter listing.
pub const PARAMETER_MARKERS: (&str, &str) = ("START_PAR", "END_PAR");

/// Returns the text strictly between each start/end marker pair.
///
/// Marker lines themselves are excluded. A section without an end marker
/// is dropped.
pub fn extract_sections(log: &str, start: &str, end: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in log.lines() {
        if line.contains(end) {
            if let Some(lines) = current.take() {
                sections.push(lines.join("\n"));
            }
        } else if line.contains(start) {
            current = Some(Vec::new());
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }
    sections
}
