//! Stack-trace sanitation for reported runtime failures.
//!
//! Guest failure traces arrive with the interpreter's and bridge's own
//! frames appended below the guest frames. Operators only care about the
//! guest portion, so everything at and after the first internal frame is
//! dropped before the trace leaves the process.

/// Trimmed-line prefixes marking frames internal to the evaluator or the
/// bridge.
const INTERNAL_FRAME_PREFIXES: [&str; 2] = ["at evaluator.", "at bridge."];

/// Indent applied to every rendered trace line.
const INDENT: &str = "  ";

/// Truncate a frame list at the first evaluator/bridge-internal frame.
///
/// Frames are matched and emitted in trimmed form, so applying the function
/// to its own output removes nothing further.
#[must_use]
pub fn truncate_internal_frames(frames: &[String]) -> Vec<String> {
    frames
        .iter()
        .map(|line| line.trim())
        .take_while(|line| {
            !INTERNAL_FRAME_PREFIXES
                .iter()
                .any(|prefix| line.starts_with(prefix))
        })
        .map(str::to_owned)
        .collect()
}

/// Sanitize a full failure trace for delivery.
///
/// The first line is the summary/message and is always dropped. The
/// remaining frames are truncated at the first internal frame; if nothing
/// survives, a single empty placeholder line keeps the "evaluated at top
/// level" case representable. Lines are joined with `\n`, each prefixed by
/// a two-space indent.
#[must_use]
pub fn sanitize(lines: &[String]) -> String {
    let mut frames = match lines.split_first() {
        Some((_summary, rest)) => truncate_internal_frames(rest),
        None => Vec::new(),
    };
    if frames.is_empty() {
        frames.push(String::new());
    }
    frames
        .iter()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
