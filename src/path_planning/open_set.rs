//! Open set with decrease-key for best-first search
//!
//! Entries are ordered by `(priority, discovery rank, node)`. The rank is
//! handed out when a node first enters the set and survives priority updates,
//! so among equal priorities the node discovered first is popped first.

use std::collections::{BTreeSet, HashMap};

use ordered_float::OrderedFloat;

type Key = (OrderedFloat<f64>, u64, usize);

#[derive(Debug, Default)]
pub struct OpenSet {
    queue: BTreeSet<Key>,
    keys: HashMap<usize, Key>,
    next_rank: u64,
}

impl OpenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn contains(&self, node: usize) -> bool {
        self.keys.contains_key(&node)
    }

    /// Insert `node`, or move it to `priority` if it is already open
    pub fn push(&mut self, node: usize, priority: f64) {
        let rank = match self.keys.get(&node) {
            Some(&old) => {
                self.queue.remove(&old);
                old.1
            }
            None => {
                let rank = self.next_rank;
                self.next_rank += 1;
                rank
            }
        };
        let key = (OrderedFloat(priority), rank, node);
        self.queue.insert(key);
        self.keys.insert(node, key);
    }

    /// Remove and return the node with the lowest priority
    pub fn pop_min(&mut self) -> Option<(usize, f64)> {
        let key = *self.queue.iter().next()?;
        self.queue.remove(&key);
        self.keys.remove(&key.2);
        Some((key.2, key.0.into_inner()))
    }
}
