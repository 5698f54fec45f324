// lib/src/graph_evolution/time_window.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use log::trace;
use models::{EventRecord, GraphError, GraphResult};

/// Outcome of offering an event to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The event was stored. `evicted` lists every entry that fell out of the
    /// window as a result, oldest first, one element per stored copy.
    Admitted { evicted: Vec<EventRecord> },
    /// The event is older than the window relative to `newest`.
    Rejected { newest: DateTime<Utc> },
}

/// Time-ordered log of admitted events, bounded to a trailing window that
/// is anchored at the newest admitted event rather than at wall time.
///
/// Entries are ordered by `(time, actor, target)`. Identical events are
/// kept as a count, so the ledger is a multiset.
#[derive(Debug, Clone)]
pub struct WindowLedger {
    entries: BTreeMap<EventRecord, usize>,
    len: usize,
    window: Duration,
}

impl WindowLedger {
    pub fn new(window: Duration) -> Self {
        WindowLedger {
            entries: BTreeMap::new(),
            len: 0,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of stored events, duplicates included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Time of the newest admitted event.
    pub fn high_water_mark(&self) -> Option<DateTime<Utc>> {
        self.entries.last_key_value().map(|(event, _)| event.time())
    }

    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.entries.first_key_value().map(|(event, _)| event.time())
    }

    /// Stored events in ledger order, each repeated by its count.
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> + '_ {
        self.entries
            .iter()
            .flat_map(|(event, count)| std::iter::repeat(event).take(*count))
    }

    /// Admits or rejects `event`.
    ///
    /// The first event is always admitted. Later events are rejected when
    /// the high-water mark is more than the window ahead of them. An event
    /// that moves the high-water mark forward evicts every entry strictly
    /// older than the window measured from the event's own time.
    pub fn admit(&mut self, event: EventRecord) -> Admission {
        let Some(newest) = self.high_water_mark() else {
            self.insert(event);
            return Admission::Admitted { evicted: Vec::new() };
        };

        if newest - event.time() > self.window {
            return Admission::Rejected { newest };
        }

        self.insert(event);

        let mut evicted = Vec::new();
        if event.time() > newest {
            while let Some((oldest, _)) = self.entries.first_key_value() {
                if event.time() - oldest.time() <= self.window {
                    break;
                }
                let Some((record, count)) = self.entries.pop_first() else {
                    break;
                };
                self.len -= count;
                trace!("evicting {} (x{})", record, count);
                evicted.extend(std::iter::repeat(record).take(count));
            }
        }
        Admission::Admitted { evicted }
    }

    /// Every entry must lie within the window of the high-water mark.
    pub fn check_window_bound(&self) -> GraphResult<()> {
        if let (Some(oldest), Some(newest)) = (self.oldest(), self.high_water_mark()) {
            if newest - oldest > self.window {
                return Err(GraphError::InvariantViolation(format!(
                    "ledger spans {}s, window is {}s",
                    (newest - oldest).num_seconds(),
                    self.window.num_seconds()
                )));
            }
        }
        Ok(())
    }

    fn insert(&mut self, event: EventRecord) {
        *self.entries.entry(event).or_insert(0) += 1;
        self.len += 1;
    }
}
