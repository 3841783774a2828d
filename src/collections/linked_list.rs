use core::fmt::{Debug, Display};

use super::arena::{NodeArena, NodeIndex};
use super::error::{contract, DequeError, DequeResult};

/// a doubly-linked list bounded by a front and a back sentinel, usable both
/// as a deque and as a bag.
///
/// unlike [`CircularList`](super::CircularList) the ends do not wrap: the
/// front sentinel has no `prev` and the back sentinel has no `next`. all
/// mutations go through `insert_before` and `unlink`.
pub struct LinkedList<T> {
    nodes: NodeArena<T>,
    front: NodeIndex,
    back: NodeIndex,
    len: usize,
}

impl<T> LinkedList<T> {
    /// create an empty list with the two sentinels linked to each other
    pub fn new() -> Self {
        Self::from_arena(NodeArena::new())
    }

    /// create an empty list with room for `capacity` elements before the
    /// node storage has to grow
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(NodeArena::with_capacity(capacity.saturating_add(2)))
    }

    fn from_arena(mut nodes: NodeArena<T>) -> Self {
        let front = nodes.alloc(None);
        let back = nodes.alloc(None);
        nodes.set_prev(front, NodeIndex::NIL);
        nodes.set_next(front, back);
        nodes.set_prev(back, front);
        nodes.set_next(back, NodeIndex::NIL);
        tracing::trace!(?front, ?back, "created linked list");
        Self {
            nodes,
            front,
            back,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Before: (anchor.prev) <-> (anchor)
    // After: (anchor.prev) <-> (new) <-> (anchor)
    fn insert_before(&mut self, anchor: NodeIndex, value: T) {
        debug_assert_ne!(anchor, self.front, "nothing goes before the front sentinel");

        let new = self.nodes.alloc(Some(value));
        let anchor_prev = self.nodes.prev(anchor);

        self.nodes.set_next(new, anchor);
        self.nodes.set_prev(new, anchor_prev);
        self.nodes.set_prev(anchor, new);
        self.nodes.set_next(anchor_prev, new);

        self.len += 1;
    }

    fn unlink(&mut self, node: NodeIndex) -> T {
        debug_assert!(
            node != self.front && node != self.back,
            "sentinels are never unlinked"
        );

        let prev = self.nodes.prev(node);
        let next = self.nodes.next(node);
        self.nodes.set_next(prev, next);
        self.nodes.set_prev(next, prev);

        self.len -= 1;
        match self.nodes.free(node) {
            Some(value) => value,
            None => unreachable!("only data nodes are unlinked"),
        }
    }

    pub fn add_front(&mut self, value: T) {
        self.insert_before(self.nodes.next(self.front), value);
    }

    pub fn add_back(&mut self, value: T) {
        self.insert_before(self.back, value);
    }

    /// borrow the front element, panicking if the list is empty
    #[track_caller]
    pub fn front(&self) -> &T {
        contract(self.try_front())
    }

    pub fn try_front(&self) -> DequeResult<&T> {
        self.require_data("front")?;
        Ok(self.nodes.data(self.nodes.next(self.front)))
    }

    /// borrow the back element, panicking if the list is empty
    #[track_caller]
    pub fn back(&self) -> &T {
        contract(self.try_back())
    }

    pub fn try_back(&self) -> DequeResult<&T> {
        self.require_data("back")?;
        Ok(self.nodes.data(self.nodes.prev(self.back)))
    }

    #[track_caller]
    pub fn remove_front(&mut self) -> T {
        contract(self.try_remove_front())
    }

    pub fn try_remove_front(&mut self) -> DequeResult<T> {
        self.require_data("remove_front")?;
        Ok(self.unlink(self.nodes.next(self.front)))
    }

    #[track_caller]
    pub fn remove_back(&mut self) -> T {
        contract(self.try_remove_back())
    }

    pub fn try_remove_back(&mut self) -> DequeResult<T> {
        self.require_data("remove_back")?;
        Ok(self.unlink(self.nodes.prev(self.back)))
    }

    /// add `value` to the bag. bags are unordered, it goes to the front
    pub fn add(&mut self, value: T) {
        self.add_front(value);
    }

    /// returns true if some element equals `value`
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.find(value).is_some()
    }

    /// remove the first element, front to back, that equals `value`.
    /// returns false and leaves the list untouched if there is none
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self.find(value) {
            Some(node) => {
                self.unlink(node);
                true
            }
            None => false,
        }
    }

    fn find(&self, value: &T) -> Option<NodeIndex>
    where
        T: PartialEq,
    {
        let mut curr = self.nodes.next(self.front);
        while curr != self.back {
            if self.nodes.data(curr) == value {
                return Some(curr);
            }
            curr = self.nodes.next(curr);
        }
        None
    }

    /// tear the list down, releasing every node front to back and then both
    /// sentinels. dropping the list does the same
    pub fn destroy(self) {
        drop(self);
    }

    /// write the elements front to back, one per line, or a single line
    /// saying the list is empty
    pub fn write_to<W: core::fmt::Write>(&self, out: &mut W) -> core::fmt::Result
    where
        T: Display,
    {
        super::write_front_to_back(out, self.walk())
    }

    #[cfg(not(feature = "no-std"))]
    pub fn print(&self)
    where
        T: Display,
    {
        let mut out = std::string::String::new();
        // writing into a String cannot fail
        let _ = self.write_to(&mut out);
        std::print!("{out}");
    }

    fn require_data(&self, operation: &'static str) -> DequeResult<()> {
        if self.is_empty() {
            Err(DequeError::Empty { operation })
        } else {
            Ok(())
        }
    }

    fn walk(&self) -> Walk<'_, T> {
        Walk {
            list: self,
            curr: self.nodes.next(self.front),
        }
    }
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LinkedList<T> {
    fn drop(&mut self) {
        let len = self.len;
        while !self.is_empty() {
            self.unlink(self.nodes.next(self.front));
        }
        self.nodes.free(self.front);
        self.nodes.free(self.back);
        tracing::trace!(len, "destroyed linked list");
    }
}

impl<T: Debug> Debug for LinkedList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.walk()).finish()
    }
}

struct Walk<'a, T> {
    list: &'a LinkedList<T>,
    curr: NodeIndex,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.curr == self.list.back {
            return None;
        }
        let value = self.list.nodes.data(self.curr);
        self.curr = self.list.nodes.next(self.curr);
        Some(value)
    }
}

#[cfg(test)]
impl<T> LinkedList<T> {
    fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.walk().cloned().collect()
    }

    /// walk from each sentinel to the other and check every link pairs up
    fn assert_links_are_valid(&self) {
        assert_eq!(self.nodes.prev(self.front), NodeIndex::NIL);
        assert_eq!(self.nodes.next(self.back), NodeIndex::NIL);

        let mut curr = self.front;
        for _ in 0..=self.len {
            let next = self.nodes.next(curr);
            assert_eq!(self.nodes.prev(next), curr, "next.prev must link back");
            curr = next;
        }
        assert_eq!(curr, self.back, "next walk must reach the back sentinel");

        for _ in 0..=self.len {
            let prev = self.nodes.prev(curr);
            assert_eq!(self.nodes.next(prev), curr, "prev.next must link back");
            curr = prev;
        }
        assert_eq!(curr, self.front, "prev walk must reach the front sentinel");

        assert_eq!(self.nodes.live(), self.len + 2);
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;
    use std::string::String;

    use super::*;

    #[test]
    fn linked_lists_are_sendable() {
        fn send<S: Send>(_: S) {}
        send(LinkedList::<u32>::new());
    }

    #[test]
    fn new_list_is_empty() {
        let ll = LinkedList::<u32>::new();
        assert!(ll.is_empty());
        assert_eq!(ll.try_front(), Err(DequeError::Empty { operation: "front" }));
        assert_eq!(ll.try_back(), Err(DequeError::Empty { operation: "back" }));
        ll.assert_links_are_valid();
    }

    #[test]
    fn smoke_test() {
        let mut ll = LinkedList::new();
        ll.add_front(1);
        ll.add_back(2);
        ll.add_back(3);
        ll.add_front(4);
        ll.add_front(5);
        ll.add_back(6);
        assert_eq!(ll.values(), [5, 4, 1, 2, 3, 6]);
        assert_eq!(*ll.front(), 5);
        assert_eq!(*ll.back(), 6);

        assert_eq!(ll.remove_front(), 5);
        assert_eq!(ll.remove_back(), 6);
        assert_eq!(ll.values(), [4, 1, 2, 3]);
        ll.assert_links_are_valid();

        let mut out = String::new();
        ll.write_to(&mut out).unwrap();
        assert_eq!(out, "4\n1\n2\n3\n");
    }

    #[test]
    fn can_drain_from_both_ends() {
        let mut ll = LinkedList::new();
        ll.add_back(73);
        ll.add_back(42);
        assert_eq!(ll.remove_back(), 42);
        assert_eq!(ll.remove_front(), 73);
        assert!(ll.is_empty());
        assert_eq!(
            ll.try_remove_front(),
            Err(DequeError::Empty {
                operation: "remove_front"
            })
        );
        assert_eq!(
            ll.try_remove_back(),
            Err(DequeError::Empty {
                operation: "remove_back"
            })
        );
        ll.assert_links_are_valid();
    }

    #[test]
    fn bag_remove_takes_the_first_match_only() {
        let mut bag = LinkedList::new();
        for value in [10, 11, 13, 14, 11] {
            bag.add(value);
        }
        assert_eq!(bag.values(), [11, 14, 13, 11, 10]);

        assert!(bag.remove(&11));
        assert_eq!(bag.values(), [14, 13, 11, 10]);
        assert!(bag.contains(&10));
        assert!(bag.contains(&11));
        bag.assert_links_are_valid();

        let mut out = String::new();
        bag.write_to(&mut out).unwrap();
        assert_eq!(out, "14\n13\n11\n10\n");
    }

    #[test]
    fn bag_remove_of_missing_value_is_a_no_op() {
        let mut bag = LinkedList::new();
        bag.add(1);
        assert!(!bag.remove(&2));
        assert!(!bag.contains(&2));
        assert_eq!(bag.values(), [1]);

        let mut empty = LinkedList::<u32>::new();
        assert!(!empty.remove(&1));
        assert!(!empty.contains(&1));
        empty.assert_links_are_valid();
    }

    #[test]
    fn write_to_on_empty_list_prints_empty_message() {
        let ll = LinkedList::<i32>::new();
        let mut out = String::new();
        ll.write_to(&mut out).unwrap();
        assert_eq!(out, "Deque is empty\n");
    }

    #[test]
    #[should_panic(expected = "`front` called on an empty deque")]
    fn front_on_empty_list_panics() {
        LinkedList::<u32>::new().front();
    }

    #[test]
    #[should_panic(expected = "`remove_back` called on an empty deque")]
    fn remove_back_on_empty_list_panics() {
        LinkedList::<u32>::new().remove_back();
    }

    #[test]
    fn destroy_releases_every_value() {
        let value = Rc::new(());
        let mut ll = LinkedList::with_capacity(3);
        ll.add(Rc::clone(&value));
        ll.add_front(Rc::clone(&value));
        ll.add_back(Rc::clone(&value));
        assert_eq!(Rc::strong_count(&value), 4);
        ll.destroy();
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn debug_lists_values() {
        let mut ll = LinkedList::new();
        ll.add_back("a");
        ll.add_back("b");
        assert_eq!(format!("{ll:?}"), r#"["a", "b"]"#);
    }
}

#[cfg(all(not(miri), test))]
mod proptests {
    use std::collections::VecDeque;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest_derive::Arbitrary;
    use rand::Rng;

    use super::*;

    #[derive(Arbitrary, Debug)]
    enum Operation {
        AddFront(u8),
        AddBack(u8),
        Add(u8),
        RemoveFront,
        RemoveBack,
        RemoveExisting,
        RemoveAny(u8),
    }

    proptest! {
        #[test]
        fn matches_reference_deque(ops in vec(any::<Operation>(), 1..256)) {
            let mut reference = VecDeque::new();
            let mut ll = LinkedList::new();

            fn get_random(reference: &VecDeque<u8>) -> Option<u8> {
                if reference.is_empty() {
                    return None;
                }
                let index = rand::thread_rng().gen_range(0..reference.len());
                reference.get(index).copied()
            }

            fn remove_first(reference: &mut VecDeque<u8>, value: u8) -> bool {
                match reference.iter().position(|v| *v == value) {
                    Some(index) => {
                        reference.remove(index);
                        true
                    }
                    None => false,
                }
            }

            for op in ops.iter() {
                match op {
                    Operation::AddFront(v) | Operation::Add(v) => {
                        reference.push_front(*v);
                        if matches!(op, Operation::Add(_)) {
                            ll.add(*v);
                        } else {
                            ll.add_front(*v);
                        }
                    }
                    Operation::AddBack(v) => {
                        reference.push_back(*v);
                        ll.add_back(*v);
                    }
                    Operation::RemoveFront => {
                        prop_assert_eq!(ll.try_remove_front().ok(), reference.pop_front());
                    }
                    Operation::RemoveBack => {
                        prop_assert_eq!(ll.try_remove_back().ok(), reference.pop_back());
                    }
                    Operation::RemoveExisting => {
                        if let Some(value) = get_random(&reference) {
                            prop_assert!(ll.contains(&value));
                            prop_assert!(remove_first(&mut reference, value));
                            prop_assert!(ll.remove(&value));
                        }
                    }
                    Operation::RemoveAny(v) => {
                        prop_assert_eq!(ll.remove(v), remove_first(&mut reference, *v));
                    }
                }

                ll.assert_links_are_valid();
                prop_assert_eq!(ll.len(), reference.len());
                prop_assert_eq!(ll.values(), reference.iter().copied().collect::<Vec<_>>());
            }
        }
    }
}
