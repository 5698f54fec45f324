// lib/src/ingest/mod.rs

//! Input boundary: turns raw JSON lines into validated `EventRecord`s.

pub mod record_parser;

pub use record_parser::{parse_record, parse_timestamp, WIRE_TIME_FORMAT};
