//! Unit tests for stack-trace sanitation.

use evalbridge::trace::{sanitize, truncate_internal_frames};

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|line| (*line).to_owned()).collect()
}

#[test]
fn summary_line_is_always_dropped() {
    let trace = lines(&["SomeError: it broke", "  at guest.Foo", "  at guest.Bar"]);
    assert_eq!(sanitize(&trace), "  at guest.Foo\n  at guest.Bar");
}

#[test]
fn truncates_at_first_bridge_frame() {
    let trace = lines(&[
        "msg",
        "  at guest.Foo",
        "  at bridge.Internal.run",
        "  at bridge.Internal.dispatch",
    ]);
    assert_eq!(sanitize(&trace), "  at guest.Foo");
}

#[test]
fn truncates_at_first_evaluator_frame() {
    let trace = lines(&[
        "msg",
        "  at guest.Foo",
        "  at evaluator.Loop.run",
        "  at guest.ShouldNotSurvive",
    ]);
    assert_eq!(sanitize(&trace), "  at guest.Foo");
}

#[test]
fn no_internal_marker_keeps_every_frame() {
    let trace = lines(&["msg", "  at guest.Foo", "  at guest.Bar", "  at guest.Baz"]);
    assert_eq!(sanitize(&trace), "  at guest.Foo\n  at guest.Bar\n  at guest.Baz");
}

#[test]
fn entirely_internal_trace_yields_one_placeholder_line() {
    let trace = lines(&["msg", "  at bridge.Internal.run", "  at bridge.Internal.dispatch"]);
    assert_eq!(sanitize(&trace), "  ");
}

#[test]
fn empty_trace_yields_one_placeholder_line() {
    assert_eq!(sanitize(&[]), "  ");
}

#[test]
fn summary_only_trace_yields_one_placeholder_line() {
    let trace = lines(&["msg"]);
    assert_eq!(sanitize(&trace), "  ");
}

#[test]
fn truncation_is_idempotent() {
    let frames = lines(&[
        "  at guest.Foo",
        "  at guest.Bar",
        "  at bridge.Internal.run",
        "  at guest.Hidden",
    ]);
    let once = truncate_internal_frames(&frames);
    let twice = truncate_internal_frames(&once);
    assert_eq!(once, twice);
    assert_eq!(once, lines(&["at guest.Foo", "at guest.Bar"]));
}

#[test]
fn marker_must_match_as_prefix_of_trimmed_line() {
    // A guest frame merely mentioning the marker text mid-line survives.
    let frames = lines(&["  at guest.CallsInto_at_bridge_Helper"]);
    assert_eq!(
        truncate_internal_frames(&frames),
        lines(&["at guest.CallsInto_at_bridge_Helper"])
    );
}
