// lib/src/orchestrator.rs

use std::fmt;
use std::io::{BufRead, Write};

use log::{debug, error, info};
use models::{EventRecord, GraphResult, ValidationError};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::engine::format_median;
use crate::graph_evolution::{ProcessOutcome, RollingMedianEngine};
use crate::ingest::parse_record;

/// Counters for one pass over an input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub lines_read: u64,
    pub skipped: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub evicted: u64,
}

impl StreamStats {
    /// Records that reached the engine; equals the number of output lines.
    pub fn processed(&self) -> u64 {
        self.admitted + self.rejected
    }

    fn record(&mut self, outcome: &ProcessOutcome) {
        if outcome.admitted {
            self.admitted += 1;
        } else {
            self.rejected += 1;
        }
        self.evicted += outcome.evicted as u64;
    }
}

impl fmt::Display for StreamStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines read, {} skipped, {} admitted, {} rejected, {} evicted",
            self.lines_read, self.skipped, self.admitted, self.rejected, self.evicted
        )
    }
}

/// Drives the engine over a line-oriented input, writing one median per
/// validated record.
#[derive(Debug)]
pub struct StreamProcessor {
    engine: RollingMedianEngine,
    stats: StreamStats,
}

impl StreamProcessor {
    pub fn new(engine: RollingMedianEngine) -> Self {
        StreamProcessor {
            engine,
            stats: StreamStats::default(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> GraphResult<Self> {
        Ok(Self::new(RollingMedianEngine::from_config(config)?))
    }

    pub fn engine(&self) -> &RollingMedianEngine {
        &self.engine
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Parses one line and, if it validates, feeds it to the engine and
    /// writes the median. Invalid lines are logged and skipped.
    pub fn process_line<W: Write>(&mut self, line: &str, output: &mut W) -> GraphResult<Option<f64>> {
        self.stats.lines_read += 1;
        let event = match parse_record(line) {
            Ok(event) => event,
            Err(e) => {
                self.skip(e);
                return Ok(None);
            }
        };
        let median = self.process_event(event)?;
        writeln!(output, "{}", format_median(median))?;
        Ok(Some(median))
    }

    pub fn process_event(&mut self, event: EventRecord) -> GraphResult<f64> {
        let outcome = self.engine.process(event).inspect_err(|e| {
            error!("aborting on event {}: {}", event, e);
        })?;
        self.stats.record(&outcome);
        Ok(outcome.median)
    }

    /// Consumes `input` to the end and flushes `output`. Lines are split on
    /// `\n` with an optional trailing `\r`; a line that is not UTF-8 is
    /// skipped like any other malformed record.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> GraphResult<StreamStats> {
        for raw in input.split(b'\n') {
            let mut raw = raw?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            match std::str::from_utf8(&raw) {
                Ok(line) => {
                    self.process_line(line, output)?;
                }
                Err(e) => {
                    self.stats.lines_read += 1;
                    self.skip(ValidationError::MalformedRecord(e.to_string()));
                }
            }
        }
        output.flush()?;
        info!("stream finished: {}", self.stats);
        Ok(self.stats)
    }

    fn skip(&mut self, reason: ValidationError) {
        self.stats.skipped += 1;
        debug!("skipping line {}: {}", self.stats.lines_read, reason);
    }
}
