//! Decrease-key frontier with lazy deletion.
//!
//! A `BinaryHeap` cannot lower the priority of an entry in place, so a
//! relaxation pushes a fresh entry and leaves the old one behind. The side map
//! holds each state's current best priority; on extraction any heap entry that
//! disagrees with the side map, or whose state is already finalized, is stale
//! and silently dropped.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use tracing::trace;
use waymark_kernel::cost::Cost;

use crate::error::SearchError;

/// The heap ordering key: `(priority, insertion_order)`.
///
/// Lower priority first, then older insertion, which makes extraction order
/// (and therefore tie-breaking between equally cheap paths) deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierKey {
    pub priority: Cost,
    pub insertion_order: u64,
}

/// `BinaryHeap` is a max-heap, so entries carry `Reverse<FrontierKey>`.
#[derive(Debug)]
struct FrontierEntry<S> {
    key: Reverse<FrontierKey>,
    state: S,
}

impl<S> PartialEq for FrontierEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<S> Eq for FrontierEntry<S> {}

impl<S> PartialOrd for FrontierEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for FrontierEntry<S> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Side-map record for a state the queue has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// In the frontier with this best-known priority.
    Live(Cost),
    /// Extracted; the cost is final.
    Done(Cost),
}

/// Min-priority queue over states with strict-improvement relaxation.
///
/// Maintains:
/// - a `BinaryHeap` for O(log n) insert and extract-min
/// - a `HashMap<S, Slot>` for O(1) duplicate detection and the finalized set
#[derive(Debug)]
pub struct PriorityQueue<S> {
    heap: BinaryHeap<FrontierEntry<S>>,
    slots: HashMap<S, Slot>,
    next_insertion: u64,
    high_water: u64,
    stale_discarded: u64,
}

impl<S: Clone + Eq + Hash> PriorityQueue<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            slots: HashMap::new(),
            next_insertion: 0,
            high_water: 0,
            stale_discarded: 0,
        }
    }

    /// Insert `state`, or lower its priority.
    ///
    /// - unseen state: inserted with `priority`
    /// - live state: replaced only if `priority` is strictly lower
    /// - finalized state: never changed
    ///
    /// Returns `true` if the queue changed.
    pub fn update(&mut self, state: S, priority: Cost) -> bool {
        match self.slots.entry(state.clone()) {
            Entry::Occupied(mut occupied) => match *occupied.get() {
                Slot::Done(_) => return false,
                Slot::Live(current) if priority >= current => return false,
                Slot::Live(_) => {
                    occupied.insert(Slot::Live(priority));
                }
            },
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::Live(priority));
            }
        }

        self.heap.push(FrontierEntry {
            key: Reverse(FrontierKey {
                priority,
                insertion_order: self.next_insertion,
            }),
            state,
        });
        self.next_insertion += 1;

        let size = self.heap.len() as u64;
        if size > self.high_water {
            self.high_water = size;
        }
        true
    }

    /// Extract the live state with the lowest priority and finalize it.
    ///
    /// Stale heap entries encountered on the way are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Exhausted`] when no live entry remains.
    pub fn remove_min(&mut self) -> Result<(S, Cost), SearchError> {
        while let Some(entry) = self.heap.pop() {
            let priority = entry.key.0.priority;
            match self.slots.get_mut(&entry.state) {
                Some(slot) if *slot == Slot::Live(priority) => {
                    *slot = Slot::Done(priority);
                    return Ok((entry.state, priority));
                }
                _ => {
                    trace!(priority = %priority, "discarded stale frontier entry");
                    self.stale_discarded += 1;
                }
            }
        }
        Err(SearchError::Exhausted)
    }

    /// Whether `state` has been extracted.
    #[must_use]
    pub fn is_done(&self, state: &S) -> bool {
        matches!(self.slots.get(state), Some(Slot::Done(_)))
    }

    /// Best-known priority of a state still in the frontier.
    #[must_use]
    pub fn priority(&self, state: &S) -> Option<Cost> {
        match self.slots.get(state) {
            Some(Slot::Live(p)) => Some(*p),
            _ => None,
        }
    }

    /// Final cost of an extracted state.
    #[must_use]
    pub fn finalized_cost(&self, state: &S) -> Option<Cost> {
        match self.slots.get(state) {
            Some(Slot::Done(p)) => Some(*p),
            _ => None,
        }
    }

    /// Heap entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// States currently in the frontier (stale duplicates not counted).
    #[must_use]
    pub fn live_len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }

    /// High-water mark of heap size.
    #[must_use]
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    /// Number of stale entries dropped by [`Self::remove_min`].
    #[must_use]
    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded
    }
}

impl<S: Clone + Eq + Hash> Default for PriorityQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}
