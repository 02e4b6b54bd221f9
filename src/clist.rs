//! A circular doubly-linked list anchored on a sentinel node.
//!
//! Nodes live in an arena and refer to each other by address, so `prev` and
//! `next` never own anything. The sentinel sits at [`ROOT_ADDR`]: its `next`
//! is the first element and its `prev` is the last one, which is itself when
//! the list is empty.

use std::fmt;

use crate::{
    error::{ListError, Result},
    mem::{Mem, Node},
};

pub const ROOT_ADDR: usize = 0;

/// An empty vector with room for exactly `n` items, or `Alloc` if that much
/// can't be reserved.
fn alloc_buf<U>(n: usize) -> Result<Vec<U>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(n).map_err(|_| ListError::Alloc)?;
    Ok(buf)
}

#[derive(Clone)]
pub struct CList<T> {
    mem: Mem<Node<T>>,
    len: usize,
}

/// A handle that was declared but never initialized. Positional operations on
/// it report [`ListError::NotInitialized`] until it's replaced by an
/// initialized list.
impl<T> Default for CList<T> {
    fn default() -> Self {
        Self {
            mem: Mem::default(),
            len: 0,
        }
    }
}

impl<T> CList<T> {
    /// Allocates the sentinel and returns an empty list.
    #[inline]
    pub fn init() -> Result<Self> {
        Self::with_capacity(0)
    }

    /// Like [`CList::init`], but reserves room for `n` elements upfront.
    pub fn with_capacity(n: usize) -> Result<Self> {
        let mut mem = Mem::with_capacity(n.saturating_add(1))?;
        let root_addr = mem.intern(Node::root())?;
        debug_assert_eq!(root_addr, ROOT_ADDR);
        Ok(Self { mem, len: 0 })
    }

    pub fn from_slice(slice: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_exact_iter(slice.iter().cloned())
    }

    pub fn from_vec(vec: Vec<T>) -> Result<Self> {
        Self::from_exact_iter(vec.into_iter())
    }

    /// Builds the ring in a single allocation: element `i` lands at address
    /// `i + 1`.
    fn from_exact_iter<I: ExactSizeIterator<Item = T>>(data: I) -> Result<Self> {
        let len = data.len();
        let mut nodes = alloc_buf(len.checked_add(1).ok_or(ListError::Alloc)?)?;
        let mut root = Node::root();
        root.prev = len;
        root.next = len.min(1);
        nodes.push(root);
        nodes.extend(data.enumerate().map(|(i, t)| {
            let next = if i + 1 == len { ROOT_ADDR } else { i + 2 };
            Node::init(t, i, next)
        }));
        Ok(Self {
            mem: Mem::raw(nodes),
            len,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        !self.mem.is_empty()
    }

    fn ensure_init(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(ListError::NotInitialized)
        }
    }

    #[inline]
    fn next(&self, addr: usize) -> usize {
        self.mem.get(addr).next
    }

    #[inline]
    fn prev(&self, addr: usize) -> usize {
        self.mem.get(addr).prev
    }

    fn data(&self, addr: usize) -> &T {
        self.mem
            .get(addr)
            .data
            .as_ref()
            .expect("Address doesn't contain data.")
    }

    fn data_mut(&mut self, addr: usize) -> &mut T {
        self.mem
            .get_mut(addr)
            .data
            .as_mut()
            .expect("Address doesn't contain data.")
    }

    /// Address of the node at `pos`, for `pos <= len`. `pos == len` yields
    /// the sentinel. Walks from whichever end is closer.
    fn walk(&self, pos: usize) -> usize {
        if pos <= self.len / 2 {
            (0..=pos).fold(ROOT_ADDR, |addr, _| self.next(addr))
        } else {
            (pos..self.len).fold(ROOT_ADDR, |addr, _| self.prev(addr))
        }
    }

    /// Address of the element at `pos`, which must satisfy `pos < len`.
    fn locate(&self, pos: usize) -> Result<usize> {
        self.ensure_init()?;
        if pos >= self.len {
            return Err(ListError::OutOfRange { pos, len: self.len });
        }
        Ok(self.walk(pos))
    }

    fn check_range(&self, start: usize, stop: usize) -> Result<()> {
        self.ensure_init()?;
        if start > stop || stop > self.len {
            return Err(ListError::InvalidRange {
                start,
                stop,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Splices a new node right before `next_addr`.
    fn link_before(&mut self, t: T, next_addr: usize) -> Result<usize> {
        let prev_addr = self.prev(next_addr);
        let addr = self.mem.intern(Node::init(t, prev_addr, next_addr))?;
        self.mem.get_mut(prev_addr).next = addr;
        self.mem.get_mut(next_addr).prev = addr;
        self.len += 1;
        Ok(addr)
    }

    /// Takes the value out of a real node and hands its slot back to the
    /// arena. Links are left for the caller to fix.
    fn release(&mut self, addr: usize) -> T {
        let t = self
            .mem
            .get_mut(addr)
            .data
            .take()
            .expect("Address doesn't contain data.");
        self.mem.free(addr);
        t
    }

    fn unlink(&mut self, addr: usize) -> T {
        let (left, right) = (self.prev(addr), self.next(addr));
        self.mem.get_mut(left).next = right;
        self.mem.get_mut(right).prev = left;
        self.len -= 1;
        self.release(addr)
    }

    /// Drops every element but keeps the sentinel, so the list stays usable.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_init()?;
        self.mem.truncate(1);
        let root = self.mem.get_mut(ROOT_ADDR);
        root.prev = ROOT_ADDR;
        root.next = ROOT_ADDR;
        self.len = 0;
        Ok(())
    }

    /// Releases every element and the sentinel itself. Afterwards the handle
    /// behaves like [`CList::default`].
    pub fn teardown(&mut self) -> Result<()> {
        self.ensure_init()?;
        self.mem = Mem::default();
        self.len = 0;
        Ok(())
    }

    pub fn add_to_end(&mut self, t: T) -> Result<()> {
        self.ensure_init()?;
        self.link_before(t, ROOT_ADDR).map(|_| ())
    }

    /// Inserts `t` so that it ends up at `pos`. `pos == len` appends.
    pub fn insert_at_pos(&mut self, pos: usize, t: T) -> Result<()> {
        self.ensure_init()?;
        if pos > self.len {
            return Err(ListError::OutOfRange { pos, len: self.len });
        }
        let next_addr = self.walk(pos);
        self.link_before(t, next_addr).map(|_| ())
    }

    /// Appends every item in order, stopping at the first failure.
    pub fn append_iter<I: IntoIterator<Item = T>>(&mut self, data: I) -> Result<()> {
        data.into_iter().try_for_each(|t| self.add_to_end(t))
    }

    /// Replaces the element at `pos`, returning the previous value.
    pub fn set(&mut self, pos: usize, t: T) -> Result<T> {
        let addr = self.locate(pos)?;
        Ok(std::mem::replace(self.data_mut(addr), t))
    }

    /// Removes the element at `pos` and returns it.
    pub fn delete(&mut self, pos: usize) -> Result<T> {
        let addr = self.locate(pos)?;
        Ok(self.unlink(addr))
    }

    /// Removes the first element equal to `t`. Returns whether one was found.
    pub fn remove_first_of(&mut self, t: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        self.ensure_init()?;
        let mut addr = self.next(ROOT_ADDR);
        while addr != ROOT_ADDR {
            if self.data(addr) == t {
                self.unlink(addr);
                return Ok(true);
            }
            addr = self.next(addr);
        }
        Ok(false)
    }

    /// Removes the elements at positions `start..stop` by linking the node
    /// before `start` directly to the node at `stop`.
    pub fn remove_range(&mut self, start: usize, stop: usize) -> Result<()> {
        self.check_range(start, stop)?;
        if start == stop {
            return Ok(());
        }
        let mut addr = self.walk(start);
        let left = self.prev(addr);
        for _ in start..stop {
            let next = self.next(addr);
            self.release(addr);
            addr = next;
        }
        self.mem.get_mut(left).next = addr;
        self.mem.get_mut(addr).prev = left;
        self.len -= stop - start;
        Ok(())
    }

    pub fn get(&self, pos: usize) -> Result<&T> {
        let addr = self.locate(pos)?;
        Ok(self.data(addr))
    }

    pub fn get_mut(&mut self, pos: usize) -> Result<&mut T> {
        let addr = self.locate(pos)?;
        Ok(self.data_mut(addr))
    }

    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Copies the elements at positions `start..stop` into a new vector.
    pub fn get_sub_list(&self, start: usize, stop: usize) -> Result<Vec<T>>
    where
        T: Clone,
    {
        self.check_range(start, stop)?;
        let mut buf = alloc_buf(stop - start)?;
        if start == stop {
            return Ok(buf);
        }
        let mut addr = self.walk(start);
        for _ in start..stop {
            buf.push(self.data(addr).clone());
            addr = self.next(addr);
        }
        Ok(buf)
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn index_of(&self, t: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|x| x == t)
    }

    /// Like [`CList::index_of`], but the scan starts at `start`, which must be
    /// a valid position.
    pub fn index_after(&self, start: usize, t: &T) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        let mut addr = self.locate(start)?;
        for pos in start..self.len {
            if self.data(addr) == t {
                return Ok(Some(pos));
            }
            addr = self.next(addr);
        }
        Ok(None)
    }

    /// Same length and pairwise-equal elements in position order.
    #[inline]
    pub fn equals(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        self == other
    }

    pub fn iter(&self) -> Iter<'_, T> {
        if self.is_empty() {
            return Iter {
                list: self,
                front: ROOT_ADDR,
                back: ROOT_ADDR,
                remaining: 0,
            };
        }
        Iter {
            list: self,
            front: self.next(ROOT_ADDR),
            back: self.prev(ROOT_ADDR),
            remaining: self.len,
        }
    }
}

/// A list always equals itself, even when its elements don't (e.g. `NaN`).
impl<T: PartialEq> PartialEq for CList<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || (self.len == other.len && self.iter().eq(other.iter()))
    }
}

impl<T: Eq> Eq for CList<T> {}

impl<T: fmt::Debug> fmt::Debug for CList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over a [`CList`] in position order.
pub struct Iter<'a, T> {
    list: &'a CList<T>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let addr = self.front;
        self.front = self.list.next(addr);
        self.remaining -= 1;
        Some(self.list.data(addr))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let addr = self.back;
        self.back = self.list.prev(addr);
        self.remaining -= 1;
        Some(self.list.data(addr))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a CList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


// proptest doesn't run under miri with default config
#[cfg(all(not(miri), test))]
mod proptests {
    use proptest::prelude::*;
    use proptest::test_runner::Config;
    use proptest_state_machine::{ReferenceStateMachine, StateMachineTest};

    use super::{CList, ListError};

    // Small values so that searches actually hit.
    const MAX_VALUE: u32 = 8;

    proptest_state_machine::prop_state_machine! {
        #![proptest_config(Config {
            failure_persistence: None,
            .. Config::default()
        })]

        #[test]
        fn clist_state_machine_test(
            sequential
            1..200
            =>
            CListTest
        );
    }

    #[derive(Clone, Debug)]
    pub enum Transition {
        AddToEnd(u32),
        InsertAtPos(usize, u32),
        Set(usize, u32),
        Delete(usize),
        RemoveFirstOf(u32),
        RemoveRange(usize, usize),
        Clear,
    }

    pub struct VecModel;

    impl ReferenceStateMachine for VecModel {
        type State = Vec<u32>;
        type Transition = Transition;

        fn init_state() -> BoxedStrategy<Self::State> {
            Just(Vec::new()).boxed()
        }

        fn transitions(state: &Self::State) -> BoxedStrategy<Self::Transition> {
            // Positions may overshoot by one so the range checks get exercised.
            let len = state.len();
            prop_oneof![
                4 => (0..MAX_VALUE).prop_map(Transition::AddToEnd),
                4 => (0..=len + 1, 0..MAX_VALUE).prop_map(|(p, v)| Transition::InsertAtPos(p, v)),
                2 => (0..=len, 0..MAX_VALUE).prop_map(|(p, v)| Transition::Set(p, v)),
                2 => (0..=len).prop_map(Transition::Delete),
                2 => (0..MAX_VALUE).prop_map(Transition::RemoveFirstOf),
                1 => (0..=len + 1, 0..=len + 1).prop_map(|(a, b)| Transition::RemoveRange(a, b)),
                1 => Just(Transition::Clear),
            ]
            .boxed()
        }

        fn apply(mut state: Self::State, transition: &Self::Transition) -> Self::State {
            let len = state.len();
            match *transition {
                Transition::AddToEnd(v) => state.push(v),
                Transition::InsertAtPos(p, v) if p <= len => state.insert(p, v),
                Transition::Set(p, v) if p < len => state[p] = v,
                Transition::Delete(p) if p < len => {
                    state.remove(p);
                }
                Transition::RemoveFirstOf(v) => {
                    if let Some(p) = state.iter().position(|x| *x == v) {
                        state.remove(p);
                    }
                }
                Transition::RemoveRange(a, b) if a <= b && b <= len => {
                    state.drain(a..b);
                }
                Transition::Clear => state.clear(),
                _ => (),
            }
            state
        }
    }

    pub struct CListTest;

    impl StateMachineTest for CListTest {
        type SystemUnderTest = CList<u32>;
        type Reference = VecModel;

        fn init_test(
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) -> Self::SystemUnderTest {
            CList::init().unwrap()
        }

        fn apply(
            mut state: Self::SystemUnderTest,
            _ref_state: &<Self::Reference as ReferenceStateMachine>::State,
            transition: Transition,
        ) -> Self::SystemUnderTest {
            let len = state.len();
            let out_of_range = |pos| ListError::OutOfRange { pos, len };
            match transition {
                Transition::AddToEnd(v) => state.add_to_end(v).unwrap(),
                Transition::InsertAtPos(p, v) => {
                    let res = state.insert_at_pos(p, v);
                    if p <= len {
                        assert_eq!(res, Ok(()));
                    } else {
                        assert_eq!(res, Err(out_of_range(p)));
                    }
                }
                Transition::Set(p, v) => {
                    let old = state.get(p).copied();
                    let res = state.set(p, v);
                    if p < len {
                        assert_eq!(res, old);
                        assert_eq!(state.get(p), Ok(&v));
                    } else {
                        assert_eq!(res, Err(out_of_range(p)));
                    }
                }
                Transition::Delete(p) => {
                    let old = state.get(p).copied();
                    let res = state.delete(p);
                    if p < len {
                        assert_eq!(res, old);
                    } else {
                        assert_eq!(res, Err(out_of_range(p)));
                    }
                }
                Transition::RemoveFirstOf(v) => {
                    let found = state.index_of(&v).is_some();
                    assert_eq!(state.remove_first_of(&v), Ok(found));
                }
                Transition::RemoveRange(a, b) => {
                    let res = state.remove_range(a, b);
                    if a <= b && b <= len {
                        assert_eq!(res, Ok(()));
                        assert_eq!(state.len(), len - (b - a));
                    } else {
                        assert_eq!(
                            res,
                            Err(ListError::InvalidRange {
                                start: a,
                                stop: b,
                                len
                            })
                        );
                    }
                }
                Transition::Clear => state.clear().unwrap(),
            }
            state
        }

        fn check_invariants(
            state: &Self::SystemUnderTest,
            ref_state: &<Self::Reference as ReferenceStateMachine>::State,
        ) {
            state.assert_ring();
            assert_eq!(state.len(), ref_state.len());
            assert_eq!(&state.to_vec(), ref_state);
            assert_eq!(&state.collect_rev(), ref_state);
            assert_eq!(state.get_sub_list(0, state.len()).as_ref(), Ok(ref_state));
            for v in 0..MAX_VALUE {
                assert_eq!(state.index_of(&v), ref_state.iter().position(|x| *x == v));
            }
        }
    }
}
