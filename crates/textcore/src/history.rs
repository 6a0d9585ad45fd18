//! Bounded undo/redo history.
//!
//! History is a doubly-linked chain of `(document, cursor)` snapshots with a
//! movable head. The chain lives in an arena of nodes addressed by index,
//! with explicit `prev`/`next` fields instead of owning pointers, so there is
//! no cyclic ownership to manage. Undoing moves the head backwards; a new
//! recording after an undo abandons the redo branch; once the number of
//! undoable steps exceeds the limit the oldest node is evicted by advancing
//! the tail boundary. Snapshots are cheap: documents share unedited lines.

use crate::cursor::Cursor;
use crate::document::Document;

pub const DEFAULT_MAX_UNDO: usize = 50;

// Compact the arena once abandoned nodes outnumber live ones past this size.
const COMPACT_FLOOR: usize = 32;

/// One recorded editor state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub document: Document,
    pub cursor: Cursor,
}

#[derive(Debug)]
struct Node {
    snapshot: Snapshot,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
pub struct History {
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
    // Nodes currently on the chain from tail to its newest end.
    live: usize,
    max_undo: usize,
}

impl History {
    /// Creates a history rooted at `initial`, retaining at most `max_undo`
    /// undoable steps.
    pub fn new(initial: Snapshot, max_undo: usize) -> Self {
        Self {
            nodes: vec![Node {
                snapshot: initial,
                prev: None,
                next: None,
            }],
            head: 0,
            tail: 0,
            live: 1,
            max_undo,
        }
    }

    /// The snapshot the head currently points at.
    pub fn current(&self) -> &Snapshot {
        &self.nodes[self.head].snapshot
    }

    pub fn can_undo(&self) -> bool {
        self.nodes[self.head].prev.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.nodes[self.head].next.is_some()
    }

    /// Appends `snapshot` as the new head. Any redo branch beyond the old
    /// head is abandoned, and the oldest states are evicted once the chain
    /// exceeds the undo limit.
    pub fn record(&mut self, snapshot: Snapshot) {
        let mut abandoned = self.nodes[self.head].next;
        while let Some(idx) = abandoned {
            self.live -= 1;
            abandoned = self.nodes[idx].next;
        }

        let new_idx = self.nodes.len();
        self.nodes.push(Node {
            snapshot,
            prev: Some(self.head),
            next: None,
        });
        self.nodes[self.head].next = Some(new_idx);
        self.head = new_idx;
        self.live += 1;

        while self.live > self.max_undo + 1 {
            self.evict_oldest();
        }
        self.maybe_compact();
    }

    pub fn max_undo(&self) -> usize {
        self.max_undo
    }

    /// Shrinks the undo limit, evicting anything already past it.
    pub fn set_max_undo(&mut self, max_undo: usize) {
        self.max_undo = max_undo;
        while self.live > self.max_undo + 1 {
            self.evict_oldest();
        }
    }

    /// Moves the head one step back and returns the newly current snapshot,
    /// or `None` when there is nothing left to undo.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let prev = self.nodes[self.head].prev?;
        self.head = prev;
        Some(&self.nodes[self.head].snapshot)
    }

    /// Moves the head one step forward and returns the newly current
    /// snapshot, or `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let next = self.nodes[self.head].next?;
        self.head = next;
        Some(&self.nodes[self.head].snapshot)
    }

    fn evict_oldest(&mut self) {
        if let Some(next) = self.nodes[self.tail].next {
            self.nodes[next].prev = None;
            self.tail = next;
            self.live -= 1;
        }
    }

    // Rebuilds the arena keeping only the chain. Evicted and abandoned nodes
    // are unreachable but still occupy slots until this runs.
    fn maybe_compact(&mut self) {
        if self.nodes.len() <= COMPACT_FLOOR || self.nodes.len() < 2 * self.live {
            return;
        }

        // Chain indices ascend (nodes are pushed in creation order), so a
        // single forward walk visits them in order.
        let mut chain = Vec::with_capacity(self.live);
        let mut idx = Some(self.tail);
        while let Some(i) = idx {
            chain.push(i);
            idx = self.nodes[i].next;
        }

        let new_head = chain
            .binary_search(&self.head)
            .expect("head is on the chain");

        let old = std::mem::take(&mut self.nodes);
        let mut keep = chain.iter().peekable();
        for (i, node) in old.into_iter().enumerate() {
            if keep.peek() == Some(&&i) {
                keep.next();
                let pos = self.nodes.len();
                self.nodes.push(Node {
                    snapshot: node.snapshot,
                    prev: pos.checked_sub(1),
                    next: Some(pos + 1),
                });
            }
        }
        if let Some(last) = self.nodes.last_mut() {
            last.next = None;
        }
        self.tail = 0;
        self.head = new_head;
    }
}
