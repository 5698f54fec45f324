// lib/tests/stream_pipeline.rs

use std::fs::File;
use std::io::{BufReader, Cursor, Write};

use rolling_degree_lib::{EngineConfig, GraphError, StreamProcessor};
use tempfile::NamedTempFile;

const SCENARIO: &str = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "Jamie-Korn", "actor": "Jordan-Gruber"}
{"created_time": "2016-04-07T03:33:20Z", "target": "Jamie-Korn", "actor": "Maryann-Berry"}
{"created_time": "2016-04-07T03:33:21Z", "target": "Maryann-Berry", "actor": "Ying-Mo"}
{"created_time": "2016-04-07T03:44:20Z", "target": "FartButt", "actor": "Ying-Mo"}
"#;

#[test]
fn test_reference_scenario_from_file() {
    let mut input = NamedTempFile::new().unwrap();
    input.write_all(SCENARIO.as_bytes()).unwrap();

    let mut processor = StreamProcessor::from_config(&EngineConfig::default()).unwrap();
    let mut output = Vec::new();
    let reader = BufReader::new(File::open(input.path()).unwrap());
    let stats = processor.run(reader, &mut output).unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), "1.00\n1.00\n1.50\n1.00\n");
    assert_eq!(stats.admitted, 4);
    assert_eq!(stats.evicted, 3);
    assert_eq!(processor.engine().graph().node_count(), 2);
    processor.engine().check_invariants().unwrap();
}

#[test]
fn test_out_of_order_events_within_window() {
    let input = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "b", "actor": "a"}
{"created_time": "2016-04-07T03:34:00Z", "target": "c", "actor": "b"}
{"created_time": "2016-04-07T03:33:10Z", "target": "d", "actor": "c"}
{"created_time": "2016-04-07T03:34:15Z", "target": "e", "actor": "d"}
"#;
    let mut processor = StreamProcessor::from_config(&EngineConfig::default()).unwrap();
    let mut output = Vec::new();
    let stats = processor.run(Cursor::new(input), &mut output).unwrap();

    // 03:33:10 is 50s behind 03:34:00, so it is admitted without eviction.
    // 03:34:15 evicts 03:33:10 (65s) but keeps 03:33:19 (56s).
    assert_eq!(String::from_utf8(output).unwrap(), "1.00\n1.00\n1.50\n1.00\n");
    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.evicted, 1);
    let graph = processor.engine().graph();
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 3);
    processor.engine().check_invariants().unwrap();
}

#[test]
fn test_narrow_window_from_config() {
    let config = EngineConfig {
        window_seconds: 5,
        ..EngineConfig::default()
    };
    let input = r#"{"created_time": "2016-04-07T03:33:19Z", "target": "b", "actor": "a"}
{"created_time": "2016-04-07T03:33:24Z", "target": "c", "actor": "b"}
{"created_time": "2016-04-07T03:33:25Z", "target": "d", "actor": "c"}
{"created_time": "2016-04-07T03:33:10Z", "target": "x", "actor": "y"}
"#;
    let mut processor = StreamProcessor::from_config(&config).unwrap();
    let mut output = Vec::new();
    let stats = processor.run(Cursor::new(input), &mut output).unwrap();

    // 03:33:25 evicts a->b, leaving b:1 c:2 d:1.
    assert_eq!(String::from_utf8(output).unwrap(), "1.00\n1.00\n1.00\n1.00\n");
    assert_eq!(stats.evicted, 1);
    assert_eq!(stats.rejected, 1);
}

#[test]
fn test_invalid_window_is_a_configuration_error() {
    let config = EngineConfig {
        window_seconds: u64::MAX,
        ..EngineConfig::default()
    };
    let err = StreamProcessor::from_config(&config).unwrap_err();
    assert!(matches!(err, GraphError::ConfigurationError(_)));
}
