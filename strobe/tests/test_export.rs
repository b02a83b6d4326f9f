use std::collections::BTreeMap;

use strobe::export::{write_artifact, write_folded, TextFormatter};
use strobe::{
    FlameGraph, OutputFormat, SourceLocation, TraceConfig, TraceEvent, TraceFile, TraceMetadata,
    TraceStats, TypedValue,
};

fn small_trace() -> TraceFile {
    TraceFile {
        metadata: TraceMetadata {
            program: "demo".to_string(),
            start_time: 0,
            versions: BTreeMap::new(),
        },
        events: vec![
            TraceEvent::function_enter(
                "handle",
                vec![TypedValue::int(42)],
                SourceLocation::new("srv.x", 8, 3),
                2_000,
                1,
            ),
            TraceEvent::Syscall {
                number: 1,
                name: "write".to_string(),
                args: vec![TypedValue::uint(1)],
                return_value: 12,
                duration_ns: 3_000,
                timestamp_ns: 5_000,
                pid: 9,
                tid: 1,
                parent_function: Some("handle".to_string()),
            },
            TraceEvent::Sample {
                instruction_pointer: 0x99,
                stack: vec![0x99],
                thread_id: 1,
                timestamp_ns: 6_000,
                parent_function: Some("handle".to_string()),
            },
            TraceEvent::function_exit(
                "handle",
                Some(TypedValue::bool(true)),
                6_000,
                8_000,
                1,
            ),
        ],
        stats: TraceStats { total_events: 4, ..TraceStats::default() },
    }
}

#[test]
fn test_text_stream_matches_line_grammar() {
    let trace = small_trace();
    let mut buffer = Vec::new();
    TextFormatter.write_stream(&trace.events, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    // Samples produce no line; order is implied by the stream
    assert_eq!(
        text,
        "[0.000002] -> handle(i64=42) <srv.x:8:3>\n\
         [0.000005] :: write(1) = 12 [0.003ms]\n\
         [0.000008] <- handle() = true [0.006ms]\n"
    );
}

#[test]
fn test_write_artifact_json_is_decodable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let config = TraceConfig {
        output_path: path.to_string_lossy().into_owned(),
        format: OutputFormat::Json,
        ..TraceConfig::default()
    };

    let trace = small_trace();
    write_artifact(&trace, &config).unwrap();
    assert_eq!(TraceFile::from_file(&path).unwrap(), trace);
}

#[test]
fn test_write_artifact_text_renders_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let config = TraceConfig {
        output_path: path.to_string_lossy().into_owned(),
        format: OutputFormat::Text,
        ..TraceConfig::default()
    };

    write_artifact(&small_trace(), &config).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("[0.000002] -> handle"));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_write_artifact_fails_loudly_on_bad_path() {
    let config = TraceConfig {
        output_path: "/nonexistent-dir/trace.json".to_string(),
        ..TraceConfig::default()
    };
    assert!(write_artifact(&small_trace(), &config).is_err());
}

#[test]
fn test_folded_file_round_trips_through_disk() {
    let mut flame = FlameGraph::new();
    flame.record_stack(vec!["main".to_string(), "foo".to_string(), "bar".to_string()]);
    flame.record_stack(vec!["main".to_string(), "foo".to_string(), "bar".to_string()]);
    flame.record_stack(vec!["main".to_string(), "foo".to_string(), "baz".to_string()]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.folded");
    let file = std::fs::File::create(&path).unwrap();
    write_folded(&flame, file).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "main;foo;bar 2\nmain;foo;baz 1\n");
}
