//! Doubly linked stack
//!
//! A LIFO container whose nodes live in an arena and link to each other by
//! handle. Besides the usual push/pop/peek it supports [`LinkedStack::extract_nth`],
//! which removes the k-th element from the top in O(k) without moving any
//! other element.
//!
//! ```text
//!   bottom                               top
//!   [a] <-prev- [b] <-prev- [c] <-prev- [d]
//!   [a] -next-> [b] -next-> [c] -next-> [d]
//! ```

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("The stack is empty")]
    Empty,

    #[error("Invalid index {index}: expected 1..={len}")]
    InvalidIndex { index: usize, len: usize },
}

/// Arena handle of a node
type Handle = usize;

#[derive(Debug)]
struct Node<T> {
    item: T,
    /// Toward the bottom
    prev: Option<Handle>,
    /// Toward the top
    next: Option<Handle>,
}

/// A stack implemented as a doubly linked chain of arena nodes
#[derive(Debug)]
pub struct LinkedStack<T> {
    /// Node storage; `None` marks a free slot
    slots: Vec<Option<Node<T>>>,

    /// Free slots available for reuse
    free: Vec<Handle>,

    top: Option<Handle>,
    bottom: Option<Handle>,
    len: usize,
}

impl<T> Default for LinkedStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkedStack<T> {
    /// Creates an empty stack
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            top: None,
            bottom: None,
            len: 0,
        }
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the stack holds no elements
    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Pushes an element on top
    pub fn push(&mut self, item: T) {
        let handle = self.alloc(Node {
            item,
            prev: self.top,
            next: None,
        });

        match self.top {
            Some(old_top) => self.node_mut(old_top).next = Some(handle),
            None => self.bottom = Some(handle),
        }
        self.top = Some(handle);
        self.len += 1;

        self.debug_check();
    }

    /// Removes and returns the top element
    pub fn pop(&mut self) -> Result<T, StackError> {
        let top = self.top.ok_or(StackError::Empty)?;
        let item = self.unlink(top);
        self.debug_check();
        Ok(item)
    }

    /// Returns the top element without removing it
    pub fn peek(&self) -> Result<&T, StackError> {
        let top = self.top.ok_or(StackError::Empty)?;
        Ok(&self.node(top).item)
    }

    /// Removes and returns the k-th element counted from the top.
    ///
    /// `k = 1` is the top itself, in which case this is the same as [`pop`](Self::pop).
    /// Fails with [`StackError::InvalidIndex`] when the stack is empty or `k`
    /// is outside `1..=len`.
    pub fn extract_nth(&mut self, k: usize) -> Result<T, StackError> {
        if self.is_empty() || k < 1 || k > self.len {
            return Err(StackError::InvalidIndex {
                index: k,
                len: self.len,
            });
        }

        let mut target = self.top.ok_or(StackError::Empty)?;
        for _ in 1..k {
            target = self
                .node(target)
                .prev
                .ok_or(StackError::InvalidIndex { index: k, len: self.len })?;
        }

        let item = self.unlink(target);
        self.debug_check();
        Ok(item)
    }

    /// Iterates from top to bottom
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: self,
            cursor: self.top,
            remaining: self.len,
            downward: true,
        }
    }

    /// Iterates from bottom to top
    pub fn iter_from_bottom(&self) -> Iter<'_, T> {
        Iter {
            stack: self,
            cursor: self.bottom,
            remaining: self.len,
            downward: false,
        }
    }

    /// Returns clones of all elements ordered bottom to top
    pub fn to_vec_bottom_up(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter_from_bottom().cloned().collect()
    }

    fn alloc(&mut self, node: Node<T>) -> Handle {
        match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Splices a node out of the chain and releases its slot
    fn unlink(&mut self, handle: Handle) -> T {
        let node = self.slots[handle]
            .take()
            .unwrap_or_else(|| unreachable!("handle {handle} points at a free slot"));
        self.free.push(handle);

        match node.next {
            Some(next) => self.node_mut(next).prev = node.prev,
            None => self.top = node.prev,
        }
        match node.prev {
            Some(prev) => self.node_mut(prev).next = node.next,
            None => self.bottom = node.next,
        }

        self.len -= 1;
        node.item
    }

    fn node(&self, handle: Handle) -> &Node<T> {
        self.slots[handle]
            .as_ref()
            .unwrap_or_else(|| unreachable!("handle {handle} points at a free slot"))
    }

    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.slots[handle]
            .as_mut()
            .unwrap_or_else(|| unreachable!("handle {handle} points at a free slot"))
    }

    #[inline]
    fn debug_check(&self) {
        debug_assert!(self.is_consistent(), "linked stack chain is corrupt");
    }

    /// Walks the chain from the top and verifies every link invariant
    fn is_consistent(&self) -> bool {
        if (self.len == 0) != self.top.is_none() || self.top.is_none() != self.bottom.is_none() {
            return false;
        }

        let mut seen = 0;
        let mut cursor = self.top;
        let mut above: Option<Handle> = None;
        while let Some(handle) = cursor {
            let node = match self.slots.get(handle).and_then(Option::as_ref) {
                Some(node) => node,
                None => return false,
            };
            if node.next != above {
                return false;
            }
            seen += 1;
            if seen > self.len {
                // Cycle or stray nodes
                return false;
            }
            if node.prev.is_none() && self.bottom != Some(handle) {
                return false;
            }
            above = Some(handle);
            cursor = node.prev;
        }

        seen == self.len
    }
}

/// Iterator over stack elements in either direction
pub struct Iter<'a, T> {
    stack: &'a LinkedStack<T>,
    cursor: Option<Handle>,
    remaining: usize,
    downward: bool,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.cursor?;
        let node = self.stack.node(handle);
        self.cursor = if self.downward { node.prev } else { node.next };
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T: fmt::Display> fmt::Display for LinkedStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stack_of(items: &[i32]) -> LinkedStack<i32> {
        let mut stack = LinkedStack::new();
        for &item in items {
            stack.push(item);
        }
        stack
    }

    fn top_down(stack: &LinkedStack<i32>) -> Vec<i32> {
        stack.iter().copied().collect()
    }

    #[test]
    fn empty_stack() {
        let stack: LinkedStack<i32> = LinkedStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
        assert_eq!(stack.to_string(), "[]");
    }

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = stack_of(&[1, 2, 3]);

        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.pop(), Ok(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn peek_does_not_remove() {
        let stack = stack_of(&[1, 2]);

        assert_eq!(stack.peek(), Ok(&2));
        assert_eq!(stack.peek(), Ok(&2));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn pop_and_peek_fail_when_empty() {
        let mut stack: LinkedStack<i32> = LinkedStack::new();
        assert_eq!(stack.pop(), Err(StackError::Empty));
        assert_eq!(stack.peek(), Err(StackError::Empty));

        stack.push(7);
        stack.pop().unwrap();
        assert_eq!(stack.pop(), Err(StackError::Empty));
        assert_eq!(stack.peek(), Err(StackError::Empty));
    }

    #[test]
    fn extract_first_is_pop() {
        let mut a = stack_of(&[1, 2, 3]);
        let mut b = stack_of(&[1, 2, 3]);

        assert_eq!(a.extract_nth(1), b.pop());
        assert_eq!(a.len(), b.len());
        assert_eq!(top_down(&a), top_down(&b));
    }

    #[test]
    fn extract_interior_keeps_chain_linked() {
        let mut stack = stack_of(&[1, 2, 3, 4, 5]);

        // 5 4 [3] 2 1
        assert_eq!(stack.extract_nth(3), Ok(3));
        assert_eq!(stack.len(), 4);
        assert_eq!(top_down(&stack), vec![5, 4, 2, 1]);
        assert_eq!(stack.iter_from_bottom().copied().collect::<Vec<_>>(), vec![1, 2, 4, 5]);
        assert!(stack.is_consistent());
    }

    #[test]
    fn extract_bottom_promotes_new_bottom() {
        let mut stack = stack_of(&[1, 2, 3]);

        assert_eq!(stack.extract_nth(3), Ok(1));
        assert_eq!(stack.to_vec_bottom_up(), vec![2, 3]);

        // The new bottom must be fully detached from the removed node
        assert_eq!(stack.pop(), Ok(3));
        assert_eq!(stack.pop(), Ok(2));
        assert!(stack.is_empty());
    }

    #[test]
    fn extract_only_element() {
        let mut stack = stack_of(&[9]);
        assert_eq!(stack.extract_nth(1), Ok(9));
        assert!(stack.is_empty());
        assert_eq!(stack.peek(), Err(StackError::Empty));
    }

    #[test]
    fn extract_rejects_out_of_range() {
        let mut stack = stack_of(&[1, 2]);

        assert_eq!(
            stack.extract_nth(0),
            Err(StackError::InvalidIndex { index: 0, len: 2 })
        );
        assert_eq!(
            stack.extract_nth(3),
            Err(StackError::InvalidIndex { index: 3, len: 2 })
        );
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn extract_rejects_any_index_when_empty() {
        let mut stack: LinkedStack<i32> = LinkedStack::new();
        for k in 0..4 {
            assert!(matches!(
                stack.extract_nth(k),
                Err(StackError::InvalidIndex { len: 0, .. })
            ));
        }
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut stack = stack_of(&[1, 2, 3]);
        stack.extract_nth(2).unwrap();
        stack.push(4);

        assert_eq!(stack.slots.len(), 3);
        assert_eq!(top_down(&stack), vec![4, 3, 1]);
    }

    #[test]
    fn display_lists_top_to_bottom() {
        let stack = stack_of(&[1, 2, 3]);
        assert_eq!(stack.to_string(), "[3 2 1]");
    }

    proptest! {
        #[test]
        fn size_after_pushes_and_pops(n in 0usize..64, m in 0usize..64) {
            let m = m.min(n);
            let mut stack = LinkedStack::new();
            for i in 0..n {
                stack.push(i);
            }
            for _ in 0..m {
                stack.pop().unwrap();
            }
            prop_assert_eq!(stack.len(), n - m);
            prop_assert_eq!(stack.is_empty(), n == m);
            prop_assert_eq!(stack.pop().is_err(), n == m);
        }

        #[test]
        fn extract_nth_matches_vec_model(
            items in proptest::collection::vec(any::<i32>(), 1..48),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut stack = LinkedStack::new();
            for &item in &items {
                stack.push(item);
            }

            let k = pick.index(items.len()) + 1;
            let mut model = items.clone();
            let expected = model.remove(items.len() - k);

            prop_assert_eq!(stack.extract_nth(k), Ok(expected));
            prop_assert!(stack.is_consistent());
            prop_assert_eq!(stack.to_vec_bottom_up(), model.clone());
            prop_assert_eq!(stack.iter().count(), stack.len());
            // Walking previous links from the top ends at the bottom element
            let bottom = stack.iter().last().copied();
            prop_assert_eq!(bottom, model.first().copied());
        }
    }
}
