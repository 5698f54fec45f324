// lib/src/engine/rank_index.rs

//! Order-statistics index over node degrees.
//!
//! A treap keyed by `(degree, handle)`, stored in a slot arena so that nodes
//! are addressed by index rather than by pointer. Every tree node carries its
//! subtree size, which is what makes selection by rank logarithmic.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stable handle of a node in the connection graph arena.
pub type NodeHandle = usize;

const DEFAULT_SEED: u64 = 0x5eed_0f_de62ee;

/// One entry per live graph node. Ordered by degree, ties broken by handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RankEntry {
    pub degree: usize,
    pub handle: NodeHandle,
}

impl RankEntry {
    pub fn new(degree: usize, handle: NodeHandle) -> Self {
        RankEntry { degree, handle }
    }
}

#[derive(Debug, Clone)]
struct TreapNode {
    entry: RankEntry,
    priority: u64,
    left: Option<usize>,
    right: Option<usize>,
    size: usize,
}

#[derive(Debug)]
pub struct DegreeRankIndex {
    slots: Vec<TreapNode>,
    free: Vec<usize>,
    root: Option<usize>,
    rng: StdRng,
}

impl Default for DegreeRankIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DegreeRankIndex {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates an index whose treap priorities come from a fixed seed, so
    /// tree shapes are reproducible between runs.
    pub fn with_seed(seed: u64) -> Self {
        DegreeRankIndex {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn len(&self) -> usize {
        self.size(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, entry: RankEntry) -> bool {
        let mut cursor = self.root;
        while let Some(i) = cursor {
            let node = &self.slots[i];
            cursor = match entry.cmp(&node.entry) {
                Ordering::Equal => return true,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        false
    }

    /// Inserts an entry. Returns `false` if the exact entry is already present.
    pub fn insert(&mut self, entry: RankEntry) -> bool {
        if self.contains(entry) {
            return false;
        }
        let node = self.alloc(entry);
        let root = self.root;
        let (left, right) = self.split(root, entry);
        let left = self.merge(left, Some(node));
        self.root = self.merge(left, right);
        true
    }

    /// Removes an entry. Returns `false` if it was not present.
    pub fn remove(&mut self, entry: RankEntry) -> bool {
        let root = self.root;
        let (root, found) = self.erase(root, entry);
        self.root = root;
        found
    }

    /// Moves `handle` from `old_degree` to `new_degree`. Returns `false` if no
    /// entry for `(old_degree, handle)` existed, in which case nothing changes.
    pub fn reposition(&mut self, handle: NodeHandle, old_degree: usize, new_degree: usize) -> bool {
        if old_degree == new_degree {
            return self.contains(RankEntry::new(old_degree, handle));
        }
        if !self.remove(RankEntry::new(old_degree, handle)) {
            return false;
        }
        self.insert(RankEntry::new(new_degree, handle))
    }

    /// Returns the entry at 0-based ascending rank `rank`.
    pub fn select(&self, rank: usize) -> Option<RankEntry> {
        let mut cursor = self.root;
        let mut rank = rank;
        while let Some(i) = cursor {
            let node = &self.slots[i];
            let left_size = self.size(node.left);
            match rank.cmp(&left_size) {
                Ordering::Less => cursor = node.left,
                Ordering::Equal => return Some(node.entry),
                Ordering::Greater => {
                    rank -= left_size + 1;
                    cursor = node.right;
                }
            }
        }
        None
    }

    pub fn degree_at_rank(&self, rank: usize) -> Option<usize> {
        self.select(rank).map(|entry| entry.degree)
    }

    /// All entries in ascending rank order.
    pub fn entries(&self) -> Vec<RankEntry> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut cursor = self.root;
        loop {
            while let Some(i) = cursor {
                stack.push(i);
                cursor = self.slots[i].left;
            }
            match stack.pop() {
                Some(i) => {
                    out.push(self.slots[i].entry);
                    cursor = self.slots[i].right;
                }
                None => break,
            }
        }
        out
    }

    fn size(&self, t: Option<usize>) -> usize {
        t.map_or(0, |i| self.slots[i].size)
    }

    fn update(&mut self, i: usize) {
        let size = 1 + self.size(self.slots[i].left) + self.size(self.slots[i].right);
        self.slots[i].size = size;
    }

    fn alloc(&mut self, entry: RankEntry) -> usize {
        let node = TreapNode {
            entry,
            priority: self.rng.gen(),
            left: None,
            right: None,
            size: 1,
        };
        match self.free.pop() {
            Some(i) => {
                self.slots[i] = node;
                i
            }
            None => {
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    // Left side receives entries strictly less than `key`.
    fn split(&mut self, t: Option<usize>, key: RankEntry) -> (Option<usize>, Option<usize>) {
        let Some(i) = t else {
            return (None, None);
        };
        if self.slots[i].entry < key {
            let right = self.slots[i].right;
            let (l, r) = self.split(right, key);
            self.slots[i].right = l;
            self.update(i);
            (Some(i), r)
        } else {
            let left = self.slots[i].left;
            let (l, r) = self.split(left, key);
            self.slots[i].left = r;
            self.update(i);
            (l, Some(i))
        }
    }

    // Every key in `l` must be less than every key in `r`.
    fn merge(&mut self, l: Option<usize>, r: Option<usize>) -> Option<usize> {
        match (l, r) {
            (None, r) => r,
            (l, None) => l,
            (Some(a), Some(b)) => {
                if self.slots[a].priority > self.slots[b].priority {
                    let a_right = self.slots[a].right;
                    let merged = self.merge(a_right, Some(b));
                    self.slots[a].right = merged;
                    self.update(a);
                    Some(a)
                } else {
                    let b_left = self.slots[b].left;
                    let merged = self.merge(Some(a), b_left);
                    self.slots[b].left = merged;
                    self.update(b);
                    Some(b)
                }
            }
        }
    }

    fn erase(&mut self, t: Option<usize>, key: RankEntry) -> (Option<usize>, bool) {
        let Some(i) = t else {
            return (None, false);
        };
        match key.cmp(&self.slots[i].entry) {
            Ordering::Equal => {
                let (left, right) = (self.slots[i].left, self.slots[i].right);
                let merged = self.merge(left, right);
                self.free.push(i);
                (merged, true)
            }
            Ordering::Less => {
                let left = self.slots[i].left;
                let (new_left, found) = self.erase(left, key);
                self.slots[i].left = new_left;
                if found {
                    self.update(i);
                }
                (Some(i), found)
            }
            Ordering::Greater => {
                let right = self.slots[i].right;
                let (new_right, found) = self.erase(right, key);
                self.slots[i].right = new_right;
                if found {
                    self.update(i);
                }
                (Some(i), found)
            }
        }
    }
}
