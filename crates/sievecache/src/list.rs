//! Eviction list for the SIEVE policy
//!
//! Entries live in a slot arena and are linked by slot index, newest at the
//! head and oldest at the tail. Freed slots go on a free list and are reused
//! by the next insertion, so churn never grows the arena past the number of
//! entries that were live at once.

use tracing::trace;

/// Node in the eviction list
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) visited: bool,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked list of entries plus the SIEVE hand
pub(crate) struct SieveList<K, V> {
    nodes: Vec<Option<Entry<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    /// Eviction cursor, kept between evictions. `None` restarts at the tail.
    hand: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> SieveList<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` slots
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            hand: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Entry<K, V>> {
        self.nodes.get_mut(idx).and_then(Option::as_mut)
    }

    /// Insert a fresh, unvisited entry at the head. Returns its slot.
    pub(crate) fn push_front(&mut self, key: K, value: V) -> usize {
        let idx = self.alloc_slot();
        self.nodes[idx] = Some(Entry {
            key,
            value,
            visited: false,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.len += 1;
        idx
    }

    /// Unlink the entry in `idx` and hand it back.
    ///
    /// If the hand was on the removed entry it steps to the entry's
    /// predecessor, the same place an eviction leaves it.
    pub(crate) fn remove(&mut self, idx: usize) -> Option<Entry<K, V>> {
        let node = self.nodes.get_mut(idx)?.take()?;

        match node.prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = node.next;
                }
            }
            None => {
                self.head = node.next;
            }
        }

        match node.next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = node.prev;
                }
            }
            None => {
                self.tail = node.prev;
            }
        }

        if self.hand == Some(idx) {
            self.hand = node.prev;
        }

        self.free_list.push(idx);
        self.len -= 1;
        Some(node)
    }

    /// Run the hand sweep and remove exactly one entry.
    ///
    /// Visited entries under the hand lose their flag and are skipped; the
    /// first unvisited entry is the victim. The hand moves towards the head
    /// and wraps to the tail. Returns `None` only when the list is empty.
    pub(crate) fn evict(&mut self) -> Option<Entry<K, V>> {
        let mut hand = self.hand.or(self.tail)?;
        let mut scanned = 1usize;

        loop {
            let node = self.nodes[hand].as_mut()?;
            if !node.visited {
                break;
            }
            node.visited = false;
            hand = match node.prev {
                Some(prev_idx) => prev_idx,
                None => self.tail?,
            };
            scanned += 1;
        }

        trace!(slot = hand, scanned, "sieve hand evicting entry");
        self.hand = Some(hand);
        self.remove(hand)
    }

    /// Drop every entry. Arena storage is kept for reuse.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.hand = None;
        self.len = 0;
    }

    /// Entries from head (newest) to tail (oldest)
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            next: self.head,
            remaining: self.len,
        }
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }
}

#[cfg(test)]
impl<K, V> SieveList<K, V> {
    pub(crate) fn get(&self, idx: usize) -> Option<&Entry<K, V>> {
        self.nodes.get(idx).and_then(Option::as_ref)
    }

    pub(crate) fn hand(&self) -> Option<usize> {
        self.hand
    }

    pub(crate) fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Verify linkage, length and hand placement
    pub(crate) fn check_links(&self) -> Result<(), String> {
        if self.len == 0 {
            if self.head.is_some() || self.tail.is_some() || self.hand.is_some() {
                return Err("empty list with head, tail or hand set".to_string());
            }
            return Ok(());
        }

        let head = self.head.ok_or("non-empty list without head")?;
        if self.get(head).and_then(|n| n.prev).is_some() {
            return Err(format!("head {} has a predecessor", head));
        }

        let mut count = 0;
        let mut prev = None;
        let mut current = Some(head);
        let mut hand_seen = self.hand.is_none();

        while let Some(idx) = current {
            count += 1;
            if count > self.len {
                return Err(format!("more than {} nodes reachable from head", self.len));
            }
            let node = self.get(idx).ok_or(format!("slot {} linked but empty", idx))?;
            if node.prev != prev {
                return Err(format!(
                    "slot {} prev is {:?}, expected {:?}",
                    idx, node.prev, prev
                ));
            }
            if self.hand == Some(idx) {
                hand_seen = true;
            }
            prev = Some(idx);
            current = node.next;
        }

        if count != self.len {
            return Err(format!("reached {} nodes, len is {}", count, self.len));
        }
        if prev != self.tail {
            return Err(format!("walk ended at {:?}, tail is {:?}", prev, self.tail));
        }
        if !hand_seen {
            return Err(format!("hand {:?} is not a live node", self.hand));
        }

        let live = self.nodes.iter().filter(|n| n.is_some()).count();
        if live != self.len || live + self.free_list.len() != self.nodes.len() {
            return Err(format!(
                "{} live slots and {} free slots for {} total",
                live,
                self.free_list.len(),
                self.nodes.len()
            ));
        }

        Ok(())
    }
}

/// Iterator over list entries, head to tail
pub(crate) struct Iter<'a, K, V> {
    nodes: &'a [Option<Entry<K, V>>],
    next: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.nodes[idx].as_ref()?;
        self.next = node.next;
        self.remaining -= 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
