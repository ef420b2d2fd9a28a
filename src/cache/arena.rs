//! Record Arena Module
//!
//! Stores records in slots addressed by stable handles and threads two
//! independent doubly-linked orderings through them:
//! - Recency: head = most recently used, tail = least recently used
//! - Insertion: head = oldest still present, tail = newest still present
//!
//! Links are slot indices, so no node is ever aliased and every
//! link/unlink is O(1).

use crate::cache::Record;

/// Stable address of a record inside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

/// Which of the two orderings to operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Recency,
    Insertion,
}

impl Order {
    fn index(self) -> usize {
        match self {
            Order::Recency => 0,
            Order::Insertion => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Link {
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Ends {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

#[derive(Debug)]
struct Node {
    record: Record,
    links: [Link; 2],
}

// == Record Arena ==
/// Slot arena holding records and both orderings over them.
#[derive(Debug)]
pub struct RecordArena {
    slots: Vec<Option<Node>>,
    /// Vacant slot indices available for reuse
    free: Vec<usize>,
    ends: [Ends; 2],
}

impl RecordArena {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            ends: [Ends::default(); 2],
        }
    }

    /// Number of live records.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of records linked into `order`.
    pub fn order_len(&self, order: Order) -> usize {
        self.ends[order.index()].len
    }

    // == Insert ==
    /// Stores a new record as both most recently used and newest inserted.
    pub fn insert(&mut self, record: Record) -> Handle {
        let node = Node {
            record,
            links: [Link::default(); 2],
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.push_head(Order::Recency, idx);
        self.push_tail(Order::Insertion, idx);
        Handle(idx)
    }

    // == Remove ==
    /// Unlinks the record from both orderings and frees its slot.
    pub fn remove(&mut self, handle: Handle) -> Option<Record> {
        self.node(handle.0)?;
        self.unlink(Order::Recency, handle.0);
        self.unlink(Order::Insertion, handle.0);
        let node = self.slots[handle.0].take()?;
        self.free.push(handle.0);
        Some(node.record)
    }

    // == Touch ==
    /// Moves the record to the head of the recency order.
    /// Its insertion-order position is left untouched.
    pub fn touch(&mut self, handle: Handle) {
        if self.ends[Order::Recency.index()].head == Some(handle.0) || self.node(handle.0).is_none() {
            return;
        }
        self.unlink(Order::Recency, handle.0);
        self.push_head(Order::Recency, handle.0);
    }

    pub fn get(&self, handle: Handle) -> Option<&Record> {
        self.node(handle.0).map(|node| &node.record)
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Record> {
        self.slots
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.record)
    }

    pub fn head(&self, order: Order) -> Option<Handle> {
        self.ends[order.index()].head.map(Handle)
    }

    pub fn tail(&self, order: Order) -> Option<Handle> {
        self.ends[order.index()].tail.map(Handle)
    }

    /// Walks `order` from head to tail.
    #[cfg(test)]
    pub fn iter(&self, order: Order) -> impl Iterator<Item = &Record> + '_ {
        let mut cursor = self.ends[order.index()].head;
        std::iter::from_fn(move || {
            let node = self.node(cursor?)?;
            cursor = node.links[order.index()].next;
            Some(&node.record)
        })
    }

    fn node(&self, idx: usize) -> Option<&Node> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn link_mut(&mut self, idx: usize, order: Order) -> &mut Link {
        match self.slots[idx].as_mut() {
            Some(node) => &mut node.links[order.index()],
            None => unreachable!("linked slot {idx} is vacant"),
        }
    }

    fn push_head(&mut self, order: Order, idx: usize) {
        let old_head = self.ends[order.index()].head;
        *self.link_mut(idx, order) = Link {
            prev: None,
            next: old_head,
        };
        match old_head {
            Some(head) => self.link_mut(head, order).prev = Some(idx),
            None => self.ends[order.index()].tail = Some(idx),
        }
        let ends = &mut self.ends[order.index()];
        ends.head = Some(idx);
        ends.len += 1;
    }

    fn push_tail(&mut self, order: Order, idx: usize) {
        let old_tail = self.ends[order.index()].tail;
        *self.link_mut(idx, order) = Link {
            prev: old_tail,
            next: None,
        };
        match old_tail {
            Some(tail) => self.link_mut(tail, order).next = Some(idx),
            None => self.ends[order.index()].head = Some(idx),
        }
        let ends = &mut self.ends[order.index()];
        ends.tail = Some(idx);
        ends.len += 1;
    }

    fn unlink(&mut self, order: Order, idx: usize) {
        let Link { prev, next } = std::mem::take(self.link_mut(idx, order));
        match prev {
            Some(prev) => self.link_mut(prev, order).next = next,
            None => self.ends[order.index()].head = next,
        }
        match next {
            Some(next) => self.link_mut(next, order).prev = prev,
            None => self.ends[order.index()].tail = prev,
        }
        self.ends[order.index()].len -= 1;
    }
}
