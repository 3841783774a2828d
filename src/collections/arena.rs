cfg_if::cfg_if! {
    if #[cfg(feature = "no-std")] {
        use alloc::vec::Vec;
    } else {
        use std::vec::Vec;
    }
}

/// a stable slot index into a [`NodeArena`]. links between nodes are stored
/// as indices rather than pointers so the node graph can be cyclic without
/// any node owning another
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(usize);

impl NodeIndex {
    /// marks the open end of a list that does not wrap around. a ring never
    /// stores this value
    pub(crate) const NIL: NodeIndex = NodeIndex(usize::MAX);
}

/// a node in a linked container. sentinels are ordinary nodes that carry no
/// value, so link manipulation never has to distinguish them from data
pub(crate) struct Node<T> {
    value: Option<T>,
    next: NodeIndex,
    prev: NodeIndex,
}

/// owns the storage of every node of a single container. freed slots are
/// kept on a free list and handed out again by `alloc`
pub(crate) struct NodeArena<T> {
    slots: Vec<Node<T>>,
    free: Vec<NodeIndex>,
}

impl<T> NodeArena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// allocate a node holding `value`. the node starts out linked to
    /// itself on both sides, which is already a valid one element ring
    pub(crate) fn alloc(&mut self, value: Option<T>) -> NodeIndex {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx.0] = Node {
                    value,
                    next: idx,
                    prev: idx,
                };
                idx
            }
            None => {
                let idx = NodeIndex(self.slots.len());
                self.slots.push(Node {
                    value,
                    next: idx,
                    prev: idx,
                });
                idx
            }
        }
    }

    /// release the slot at `idx`, moving its value out. the caller must have
    /// unlinked the node first, its stale links are left untouched
    pub(crate) fn free(&mut self, idx: NodeIndex) -> Option<T> {
        let value = self.slots[idx.0].value.take();
        self.free.push(idx);
        value
    }

    /// the number of slots currently holding a node, sentinels included
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn next(&self, idx: NodeIndex) -> NodeIndex {
        self.slots[idx.0].next
    }

    pub(crate) fn prev(&self, idx: NodeIndex) -> NodeIndex {
        self.slots[idx.0].prev
    }

    pub(crate) fn set_next(&mut self, idx: NodeIndex, next: NodeIndex) {
        self.slots[idx.0].next = next;
    }

    pub(crate) fn set_prev(&mut self, idx: NodeIndex, prev: NodeIndex) {
        self.slots[idx.0].prev = prev;
    }

    /// exchange the `next` and `prev` links of a single node
    pub(crate) fn swap_links(&mut self, idx: NodeIndex) {
        let node = &mut self.slots[idx.0];
        core::mem::swap(&mut node.next, &mut node.prev);
    }

    /// borrow the value of a data node
    pub(crate) fn data(&self, idx: NodeIndex) -> &T {
        match &self.slots[idx.0].value {
            Some(value) => value,
            None => unreachable!("sentinels are never read as data"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_nodes_are_self_linked() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Some(7));
        assert_eq!(arena.next(a), a);
        assert_eq!(arena.prev(a), a);
        assert_eq!(*arena.data(a), 7);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Some(1));
        let _b = arena.alloc(Some(2));
        assert_eq!(arena.live(), 2);

        assert_eq!(arena.free(a), Some(1));
        assert_eq!(arena.live(), 1);

        let c = arena.alloc(Some(3));
        assert_eq!(c, a);
        assert_eq!(arena.live(), 2);
        assert_eq!(*arena.data(c), 3);
        assert_eq!(arena.next(c), c);
    }

    #[test]
    fn freeing_a_sentinel_yields_no_value() {
        let mut arena = NodeArena::<u32>::new();
        let s = arena.alloc(None);
        assert_eq!(arena.free(s), None);
        assert_eq!(arena.live(), 0);
    }

    #[test]
    fn swap_links_exchanges_next_and_prev() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Some('a'));
        let b = arena.alloc(Some('b'));
        let c = arena.alloc(Some('c'));
        arena.set_next(a, b);
        arena.set_prev(a, c);
        arena.swap_links(a);
        assert_eq!(arena.next(a), c);
        assert_eq!(arena.prev(a), b);
    }

    #[test]
    #[should_panic]
    fn reading_a_sentinel_as_data_panics() {
        let mut arena = NodeArena::<u32>::new();
        let s = arena.alloc(None);
        arena.data(s);
    }
}
