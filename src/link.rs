use enum_map::{enum_map, Enum, EnumMap};

pub(crate) const DETACHED: usize = usize::MAX;

#[derive(Debug, Enum, Eq, PartialEq, Copy, Clone)]
pub(crate) enum Direction {
    Next,
    Prev,
}

impl Direction {
    #[must_use]
    pub(crate) fn opposite(self) -> Direction {
        match self {
            Direction::Next => Direction::Prev,
            Direction::Prev => Direction::Next,
        }
    }
}

/// Arena slot of a circular list, `value` is `None` while the slot sits in the freelist.
/// `generation` changes on every release, so handles to a released node never match again.
#[derive(Debug, Clone)]
pub(crate) struct Slot<T> {
    pub(crate) value: Option<T>,
    pub(crate) links: EnumMap<Direction, usize>,
    pub(crate) generation: u32,
}

impl<T> Slot<T> {
    pub(crate) fn new(value: T) -> Slot<T> {
        Slot { value: Some(value), links: detached(), generation: 0 }
    }

    pub(crate) fn release(&mut self) -> Option<T> {
        self.detach();
        self.generation = self.generation.wrapping_add(1);
        self.value.take()
    }

    pub(crate) fn is_live(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn next(&self) -> usize {
        self.links[Direction::Next]
    }

    pub(crate) fn prev(&self) -> usize {
        self.links[Direction::Prev]
    }

    pub(crate) fn self_link(&mut self, idx: usize) {
        self.links = enum_map! { _ => idx };
    }

    pub(crate) fn detach(&mut self) {
        self.links = detached();
    }
}

fn detached() -> EnumMap<Direction, usize> {
    enum_map! { _ => DETACHED }
}
