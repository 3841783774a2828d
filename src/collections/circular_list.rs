use core::fmt::{Debug, Display};

use super::arena::{NodeArena, NodeIndex};
use super::error::{contract, DequeError, DequeResult};

/// a circular doubly-linked deque anchored by a single sentinel node.
///
/// the sentinel is an ordinary member of the ring: its `next` is the front
/// element and its `prev` is the back element, or itself when the deque is
/// empty. every mutation is composed from two primitives, `insert_after` and
/// `unlink`, neither of which needs to know whether it is touching the
/// sentinel or a data node.
///
/// operations that need an element (`front`, `back`, `remove_front`,
/// `remove_back`, `reverse`) panic when the deque is empty. each has a
/// `try_` twin that reports [`DequeError::Empty`] instead.
pub struct CircularList<T> {
    /// storage for the sentinel and every data node
    nodes: NodeArena<T>,
    /// the node closing the ring, never holds a value
    sentinel: NodeIndex,
    /// the number of non-sentinel nodes in the ring
    len: usize,
}

impl<T> CircularList<T> {
    /// create an empty deque whose sentinel links to itself
    pub fn new() -> Self {
        Self::from_arena(NodeArena::new())
    }

    /// create an empty deque with room for `capacity` elements before the
    /// node storage has to grow
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(NodeArena::with_capacity(capacity.saturating_add(1)))
    }

    fn from_arena(mut nodes: NodeArena<T>) -> Self {
        let sentinel = nodes.alloc(None);
        tracing::trace!(?sentinel, "created circular list");
        Self {
            nodes,
            sentinel,
            len: 0,
        }
    }

    /// get the length of the deque, not including the sentinel node
    pub fn len(&self) -> usize {
        self.len
    }

    /// returns true if the length of the deque is 0
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Before: (anchor) <-> (anchor.next)
    // After: (anchor) <-> (new) <-> (anchor.next)
    fn insert_after(&mut self, anchor: NodeIndex, value: T) -> NodeIndex {
        let new = self.nodes.alloc(Some(value));
        let anchor_next = self.nodes.next(anchor);

        self.nodes.set_next(new, anchor_next);
        self.nodes.set_prev(anchor_next, new);
        self.nodes.set_prev(new, anchor);
        self.nodes.set_next(anchor, new);

        self.len += 1;
        new
    }

    /// splice `node` out of the ring and release its slot. `node` must be a
    /// data node of this ring, never the sentinel
    fn unlink(&mut self, node: NodeIndex) -> T {
        debug_assert_ne!(node, self.sentinel, "the sentinel is never unlinked");

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

    /// add `value` as the new front element
    pub fn add_front(&mut self, value: T) {
        self.insert_after(self.sentinel, value);
    }

    /// add `value` as the new back element
    pub fn add_back(&mut self, value: T) {
        let back = self.nodes.prev(self.sentinel);
        self.insert_after(back, value);
    }

    /// borrow the front element, panicking if the deque is empty
    #[track_caller]
    pub fn front(&self) -> &T {
        contract(self.try_front())
    }

    pub fn try_front(&self) -> DequeResult<&T> {
        self.require_data("front")?;
        Ok(self.nodes.data(self.nodes.next(self.sentinel)))
    }

    /// borrow the back element, panicking if the deque is empty
    #[track_caller]
    pub fn back(&self) -> &T {
        contract(self.try_back())
    }

    pub fn try_back(&self) -> DequeResult<&T> {
        self.require_data("back")?;
        Ok(self.nodes.data(self.nodes.prev(self.sentinel)))
    }

    /// remove the front element and hand its value back, panicking if the
    /// deque is empty
    #[track_caller]
    pub fn remove_front(&mut self) -> T {
        contract(self.try_remove_front())
    }

    pub fn try_remove_front(&mut self) -> DequeResult<T> {
        self.require_data("remove_front")?;
        Ok(self.unlink(self.nodes.next(self.sentinel)))
    }

    /// remove the back element and hand its value back, panicking if the
    /// deque is empty
    #[track_caller]
    pub fn remove_back(&mut self) -> T {
        contract(self.try_remove_back())
    }

    pub fn try_remove_back(&mut self) -> DequeResult<T> {
        self.require_data("remove_back")?;
        Ok(self.unlink(self.nodes.prev(self.sentinel)))
    }

    /// reverse the order of the elements in place, without allocating.
    ///
    /// panics if the deque is empty, see [`CircularList::try_reverse`].
    #[track_caller]
    pub fn reverse(&mut self) {
        contract(self.try_reverse())
    }

    /// reverse the order of the elements in place.
    ///
    /// every node of the ring, the sentinel included, has its `next` and
    /// `prev` links exchanged exactly once. swapping the sentinel's links is
    /// what turns the old back into the new front, so the loop body has no
    /// special case for it. the successor is read before the node's links
    /// are rewritten, and the walk stops once it arrives back at the
    /// sentinel after `len + 1` swaps.
    pub fn try_reverse(&mut self) -> DequeResult<()> {
        self.require_data("reverse")?;

        let mut curr = self.sentinel;
        loop {
            let next = self.nodes.next(curr);
            self.nodes.swap_links(curr);
            curr = next;
            if curr == self.sentinel {
                break;
            }
        }

        tracing::trace!(len = self.len, "reversed circular list");
        Ok(())
    }

    /// tear the deque down, releasing every node front to back and then the
    /// sentinel. dropping the deque does the same
    pub fn destroy(self) {
        drop(self);
    }

    /// write the elements front to back, one per line, or a single line
    /// saying the deque is empty
    pub fn write_to<W: core::fmt::Write>(&self, out: &mut W) -> core::fmt::Result
    where
        T: Display,
    {
        super::write_front_to_back(out, self.walk())
    }

    /// print the elements to stdout, see [`CircularList::write_to`]
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
            curr: self.nodes.next(self.sentinel),
        }
    }
}

impl<T> Default for CircularList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for CircularList<T> {
    fn drop(&mut self) {
        let len = self.len;
        while !self.is_empty() {
            self.unlink(self.nodes.next(self.sentinel));
        }
        self.nodes.free(self.sentinel);
        tracing::trace!(len, "destroyed circular list");
    }
}

impl<T: Debug> Debug for CircularList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.walk()).finish()
    }
}

/// front to back walk over the values of the ring, stopping at the sentinel
struct Walk<'a, T> {
    list: &'a CircularList<T>,
    curr: NodeIndex,
}

impl<'a, T> Iterator for Walk<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.curr == self.list.sentinel {
            return None;
        }
        let value = self.list.nodes.data(self.curr);
        self.curr = self.list.nodes.next(self.curr);
        Some(value)
    }
}

#[cfg(test)]
impl<T> CircularList<T> {
    fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.walk().cloned().collect()
    }

    /// walk the ring `len + 1` steps in both directions and check that every
    /// step lands on a node that links back
    fn assert_ring_is_valid(&self) {
        let mut curr = self.sentinel;
        for _ in 0..=self.len {
            let next = self.nodes.next(curr);
            assert_eq!(self.nodes.prev(next), curr, "next.prev must link back");
            curr = next;
        }
        assert_eq!(curr, self.sentinel, "next walk must close the ring");

        for _ in 0..=self.len {
            let prev = self.nodes.prev(curr);
            assert_eq!(self.nodes.next(prev), curr, "prev.next must link back");
            curr = prev;
        }
        assert_eq!(curr, self.sentinel, "prev walk must close the ring");

        assert_eq!(self.nodes.live(), self.len + 1);
        if self.is_empty() {
            assert_eq!(self.nodes.next(self.sentinel), self.sentinel);
            assert_eq!(self.nodes.prev(self.sentinel), self.sentinel);
        }
    }
}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use std::collections::VecDeque;

    use proptest::collection::vec;
    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};

    use super::*;

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            failure_persistence: None,
            .. Config::default()
        })]

        #[test]
        fn circular_list_state_machine_test(
            sequential
            100..500
            =>
            CircularList<u32>
        );
    }

    #[derive(Clone, Debug)]
    pub enum Transition {
        AddFront(u32),
        RemoveFront,
        AddBack(u32),
        RemoveBack,
        Reverse,
    }

    pub struct CircularListStateMachine;

    impl ReferenceStateMachine for CircularListStateMachine {
        type State = VecDeque<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(VecDeque::new()).boxed()
        }

        fn transitions(_state: &Self::State) -> BoxedStrategy<Self::Transition> {
            prop_oneof![
                1 => Just(Transition::RemoveFront),
                2 => (any::<u32>()).prop_map(Transition::AddFront),
                1 => Just(Transition::RemoveBack),
                2 => (any::<u32>()).prop_map(Transition::AddBack),
                1 => Just(Transition::Reverse),
            ]
            .boxed()
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            match transition {
                Transition::RemoveFront => {
                    state.pop_front();
                }
                Transition::AddFront(value) => state.push_front(*value),
                Transition::RemoveBack => {
                    state.pop_back();
                }
                Transition::AddBack(value) => state.push_back(*value),
                Transition::Reverse => state.make_contiguous().reverse(),
            }
            state
        }
    }

    impl StateMachineTest for CircularList<u32> {
        type SystemUnderTest = Self;
        type Reference = CircularListStateMachine;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            Self::new()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            match transition {
                Transition::AddFront(value) => state.add_front(value),
                Transition::RemoveFront => {
                    let _ = state.try_remove_front();
                }
                Transition::AddBack(value) => state.add_back(value),
                Transition::RemoveBack => {
                    let _ = state.try_remove_back();
                }
                Transition::Reverse => {
                    let _ = state.try_reverse();
                }
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            state.assert_ring_is_valid();
            assert_eq!(state.len(), ref_state.len());
            assert_eq!(state.is_empty(), ref_state.is_empty());
            assert_eq!(state.try_front().ok(), ref_state.front());
            assert_eq!(state.try_back().ok(), ref_state.back());

            for (value, ref_value) in state.walk().zip(ref_state.iter()) {
                assert_eq!(value, ref_value);
            }
        }
    }

    proptest! {
        #[test]
        fn reversing_twice_restores_the_order(values in vec(any::<i32>(), 1..64)) {
            let mut ll = CircularList::new();
            for value in &values {
                ll.add_back(*value);
            }

            ll.reverse();
            let reversed: Vec<i32> = values.iter().rev().copied().collect();
            prop_assert_eq!(ll.values(), reversed);
            ll.assert_ring_is_valid();

            ll.reverse();
            prop_assert_eq!(ll.values(), values);
            ll.assert_ring_is_valid();
        }
    }
}
