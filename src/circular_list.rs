use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::iter::FusedIterator;

use crate::errors::*;
use crate::link::*;

/// Handle of a node in a [`CircularList`].
///
/// A handle stays valid until the next operation that removes or splices out its node, after that
/// every use fails with [`ListError::InvalidNode`], even once the slot holds another value. Handles
/// of spliced nodes do not follow them into the new list.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct NodeId {
    idx: usize,
    generation: u32,
}

/// Doubly-linked circular list backed by an arena of slots.
///
/// The tail is always the predecessor of the head, so a list is fully described by its head and
/// its length. Freed slots are recycled by later insertions.
#[derive(Debug, Clone)]
pub struct CircularList<T> {
    slots: Vec<Slot<T>>,
    freelist: VecDeque<usize>,
    head: Option<usize>,
    len: usize,
}

impl<T> Default for CircularList<T> {
    fn default() -> Self {
        CircularList::new()
    }
}

impl<T> CircularList<T> {
    pub fn new() -> CircularList<T> {
        CircularList { slots: Vec::new(), freelist: VecDeque::new(), head: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head.map(|head| self.handle(head))
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.head.map(|head| self.handle(self.slots[head].prev()))
    }

    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.release().is_some() {
                self.freelist.push_back(idx);
            }
        }
        self.head = None;
        self.len = 0;
    }

    pub fn value(&self, node: NodeId) -> Result<&T, ListError> {
        let idx = self.live(node)?;
        Ok(self.slot_value(idx))
    }

    pub fn value_mut(&mut self, node: NodeId) -> Result<&mut T, ListError> {
        let idx = self.live(node)?;
        Ok(self.slots[idx].value.as_mut().expect("broken slot links"))
    }

    pub fn next(&self, node: NodeId) -> Result<NodeId, ListError> {
        self.advance(node, 1)
    }

    pub fn prev(&self, node: NodeId) -> Result<NodeId, ListError> {
        self.retreat(node, 1)
    }

    /// Moves `steps` nodes forward, wrapping around the circle as many times as needed.
    pub fn advance(&self, node: NodeId, steps: usize) -> Result<NodeId, ListError> {
        let idx = self.live(node)?;
        Ok(self.handle(self.walk(idx, Direction::Next, steps)))
    }

    /// Moves `steps` nodes backward, wrapping around the circle as many times as needed.
    pub fn retreat(&self, node: NodeId, steps: usize) -> Result<NodeId, ListError> {
        let idx = self.live(node)?;
        Ok(self.handle(self.walk(idx, Direction::Prev, steps)))
    }

    /// Node `pos` steps after the head, `None` on an empty list.
    pub fn node_at(&self, pos: usize) -> Option<NodeId> {
        self.head.map(|head| self.handle(self.walk(head, Direction::Next, pos)))
    }

    pub fn get(&self, pos: usize) -> Result<&T, ListError> {
        let node = self.node_at(pos).ok_or(ListError::EmptyList)?;
        self.value(node)
    }

    pub fn prepend(&mut self, value: T) -> NodeId {
        match self.head {
            None => self.insert_first(value),
            Some(head) => {
                let idx = self.link_between(self.slots[head].prev(), head, value);
                self.head = Some(idx);
                self.handle(idx)
            }
        }
    }

    pub fn append(&mut self, value: T) -> NodeId {
        match self.head {
            None => self.insert_first(value),
            Some(head) => {
                let idx = self.link_between(self.slots[head].prev(), head, value);
                self.handle(idx)
            }
        }
    }

    /// Inserts before the node at `pos`. Position 0 and every multiple of the length address the
    /// head, so the value becomes the new head there.
    pub fn insert(&mut self, pos: usize, value: T) -> NodeId {
        match self.node_at(pos) {
            Some(node) if pos != 0 => self.insert_before(node, value).expect("broken node lookup"),
            _ => self.prepend(value),
        }
    }

    pub fn insert_before(&mut self, node: NodeId, value: T) -> Result<NodeId, ListError> {
        let idx = self.live(node)?;
        let new = self.link_between(self.slots[idx].prev(), idx, value);
        if self.head == Some(idx) {
            self.head = Some(new);
        }
        Ok(self.handle(new))
    }

    pub fn insert_after(&mut self, node: NodeId, value: T) -> Result<NodeId, ListError> {
        let idx = self.live(node)?;
        let new = self.link_between(idx, self.slots[idx].next(), value);
        Ok(self.handle(new))
    }

    /// Moves every value of `list`, in order, in front of `node`.
    pub fn insert_list_before(&mut self, node: NodeId, list: CircularList<T>) -> Result<(), ListError> {
        let idx = self.live(node)?;
        let first = self.graft(self.slots[idx].prev(), idx, list);
        if first.is_some() && self.head == Some(idx) {
            self.head = first;
        }
        Ok(())
    }

    /// Moves every value of `list`, in order, right after `node`.
    pub fn insert_list_after(&mut self, node: NodeId, list: CircularList<T>) -> Result<(), ListError> {
        let idx = self.live(node)?;
        self.graft(idx, self.slots[idx].next(), list);
        Ok(())
    }

    pub fn remove(&mut self, node: NodeId) -> Result<T, ListError> {
        let idx = self.live(node)?;
        if self.len == 1 {
            self.head = None;
        } else {
            let (prev, next) = (self.slots[idx].prev(), self.slots[idx].next());
            self.link(prev, next);
            if self.head == Some(idx) {
                self.head = Some(next);
            }
        }
        self.len -= 1;
        Ok(self.recycle_slot(idx))
    }

    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        Some(self.remove(self.handle(head)).expect("broken head link"))
    }

    /// Cuts `count` consecutive nodes starting at `from` out of the list and returns them as a list
    /// of their own. The gap is closed, and the head moves past the cut run if the run covered it.
    pub fn splice(&mut self, from: NodeId, count: usize) -> Result<CircularList<T>, ListError> {
        if count == 0 {
            return Ok(CircularList::new());
        }

        let first = self.live(from)?;
        if count > self.len {
            return Err(ListError::SpliceOutOfRange { requested: count, len: self.len });
        }

        let mut run = Vec::with_capacity(count);
        let mut after = first;
        for _ in 0..count {
            run.push(after);
            after = self.slots[after].next();
        }

        if count == self.len {
            self.head = None;
        } else {
            let before = self.slots[first].prev();
            self.link(before, after);
            if let Some(head) = self.head {
                if run.contains(&head) {
                    self.head = Some(after);
                }
            }
        }
        self.len -= count;

        Ok(run.into_iter().map(|idx| self.recycle_slot(idx)).collect())
    }

    pub fn find_by<P: FnMut(&T) -> bool>(&self, predicate: P) -> Option<NodeId> {
        self.search(self.head, Direction::Next, predicate)
    }

    /// Backward counterpart of [`CircularList::find_by`], starting at the tail.
    pub fn find_last_by<P: FnMut(&T) -> bool>(&self, predicate: P) -> Option<NodeId> {
        self.search(self.tail().map(|tail| tail.idx), Direction::Prev, predicate)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { list: self, next: self.head.unwrap_or(DETACHED), remaining: self.len }
    }

    /// Iterates the whole circle once, starting at `node`.
    pub fn iter_from(&self, node: NodeId) -> Result<Iter<'_, T>, ListError> {
        let idx = self.live(node)?;
        Ok(Iter { list: self, next: idx, remaining: self.len })
    }

    fn live(&self, node: NodeId) -> Result<usize, ListError> {
        match self.slots.get(node.idx) {
            Some(slot) if slot.is_live() && slot.generation == node.generation => Ok(node.idx),
            _ => Err(ListError::InvalidNode(node)),
        }
    }

    fn handle(&self, idx: usize) -> NodeId {
        NodeId { idx, generation: self.slots[idx].generation }
    }

    fn slot_value(&self, idx: usize) -> &T {
        self.slots[idx].value.as_ref().expect("broken slot links")
    }

    fn walk(&self, mut idx: usize, direction: Direction, steps: usize) -> usize {
        for _ in 0..steps % self.len {
            idx = self.slots[idx].links[direction];
        }
        idx
    }

    fn search<P>(&self, start: Option<usize>, direction: Direction, mut predicate: P) -> Option<NodeId>
    where
        P: FnMut(&T) -> bool,
    {
        let start = start?;
        let mut it = start;
        loop {
            if predicate(self.slot_value(it)) {
                return Some(self.handle(it));
            }
            it = self.slots[it].links[direction];
            if it == start {
                return None;
            }
        }
    }

    fn add_slot(&mut self, value: T) -> usize {
        if let Some(free) = self.freelist.pop_front() {
            self.slots[free].value = Some(value);
            free
        } else {
            self.slots.push(Slot::new(value));
            self.slots.len() - 1
        }
    }

    fn recycle_slot(&mut self, idx: usize) -> T {
        let value = self.slots[idx].release().expect("broken slot links");
        self.freelist.push_back(idx);
        value
    }

    fn link(&mut self, from: usize, to: usize) {
        self.slots[from].links[Direction::Next] = to;
        self.slots[to].links[Direction::Next.opposite()] = from;
    }

    fn insert_first(&mut self, value: T) -> NodeId {
        debug_assert_eq!(self.len, 0);
        let idx = self.add_slot(value);
        self.slots[idx].self_link(idx);
        self.head = Some(idx);
        self.len = 1;
        self.handle(idx)
    }

    fn link_between(&mut self, prev: usize, next: usize, value: T) -> usize {
        let idx = self.add_slot(value);
        self.link(prev, idx);
        self.link(idx, next);
        self.len += 1;
        idx
    }

    /// Links the values of `list` between `prev` and `next`, returns the first grafted slot.
    fn graft(&mut self, prev: usize, next: usize, list: CircularList<T>) -> Option<usize> {
        let mut first = None;
        let mut last = prev;
        for value in list {
            let idx = self.add_slot(value);
            self.link(last, idx);
            self.len += 1;
            first.get_or_insert(idx);
            last = idx;
        }
        self.link(last, next);
        first
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let live = self.slots.iter().filter(|s| s.is_live()).count();
        assert_eq!(live, self.len, "live slots and length disagree");
        assert_eq!(live + self.freelist.len(), self.slots.len(), "leaked slots");

        let head = match self.head {
            None => {
                assert_eq!(self.len, 0);
                return;
            }
            Some(head) => head,
        };

        let mut it = head;
        for _ in 0..self.len {
            let next = self.slots[it].next();
            assert!(self.slots[next].is_live(), "link into a free slot");
            assert_eq!(self.slots[next].prev(), it, "prev is not the inverse of next");
            it = next;
        }
        assert_eq!(it, head, "forward walk does not close the circle");

        for _ in 0..self.len {
            it = self.slots[it].prev();
        }
        assert_eq!(it, head, "backward walk does not close the circle");
    }
}

impl<T: PartialEq> CircularList<T> {
    pub fn find(&self, value: &T) -> Option<NodeId> {
        self.find_by(|v| v == value)
    }

    pub fn find_last(&self, value: &T) -> Option<NodeId> {
        self.find_last_by(|v| v == value)
    }
}

pub struct Iter<'a, T> {
    list: &'a CircularList<T>,
    next: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.next = self.list.slots[current].next();
        self.remaining -= 1;
        Some(self.list.slot_value(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a CircularList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

pub struct IntoIter<T> {
    list: CircularList<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for CircularList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { list: self }
    }
}

impl<T> FromIterator<T> for CircularList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = CircularList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for CircularList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        iter.into_iter().for_each(|value| {
            self.append(value);
        });
    }
}

impl<T: Display> Display for CircularList<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for value in self {
            write!(f, " {} ", value)?;
        }
        write!(f, ")")
    }
}
