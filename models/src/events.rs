// models/src/events.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::Identifier;

/// A validated, directed relationship event between two identities.
///
/// The derived ordering compares `time` first, then `actor`, then `target`,
/// which is the total order the window ledger keeps its entries in. Fields
/// are private so a constructed record can't be altered.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventRecord {
    time: DateTime<Utc>,
    actor: Identifier,
    target: Identifier,
}

impl EventRecord {
    /// Create a new event. An actor paying itself is a valid record and
    /// becomes a self-loop in the graph.
    pub fn new(actor: Identifier, target: Identifier, time: DateTime<Utc>) -> Self {
        Self { time, actor, target }
    }

    pub fn actor(&self) -> Identifier {
        self.actor
    }

    pub fn target(&self) -> Identifier {
        self.target
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    pub fn is_self_loop(&self) -> bool {
        self.actor == self.target
    }

    /// Swap the direction of the event. Preserves `time`.
    pub fn reversed(&self) -> Self {
        Self {
            time: self.time,
            actor: self.target,
            target: self.actor,
        }
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} @ {}", self.actor, self.target, self.time.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}
