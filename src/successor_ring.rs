use crate::cups::*;
use crate::errors::*;

/// Cup circle stored as a successor table: `next[label]` is the label of the cup clockwise of
/// `label`. Slot 0 is unused, so the table holds labels `1..=cup_count`.
#[derive(Debug, Clone)]
pub struct SuccessorRing {
    next: Vec<u32>,
    current: u32,
}

impl SuccessorRing {
    /// Builds the circle `prefix` followed by `prefix.len() + 1 ..= cup_count` in increasing order.
    ///
    /// `prefix` must be a permutation of `1..=prefix.len()`, and the circle needs at least four cups.
    pub fn new(prefix: &[u32], cup_count: u32) -> Result<SuccessorRing, CupsError> {
        check_dense_labels(prefix, cup_count)?;

        let first = prefix[0];
        let last = prefix[prefix.len() - 1];
        let pad_start = prefix.len() as u32 + 1;

        // padding cups already point at their successor
        let end = cup_count.checked_add(1).ok_or(CupsError::LabelOutOfRange(cup_count))?;
        let mut next: Vec<u32> = (1..=end).collect();
        for pair in prefix.windows(2) {
            next[pair[0] as usize] = pair[1];
        }
        if pad_start <= cup_count {
            next[last as usize] = pad_start;
            next[cup_count as usize] = first;
        } else {
            next[last as usize] = first;
        }

        Ok(SuccessorRing { next, current: first })
    }

    pub fn product_after_one(&self) -> u64 {
        let first = self.next[1];
        let second = self.next[first as usize];
        first as u64 * second as u64
    }

    fn highest(&self) -> u32 {
        (self.next.len() - 1) as u32
    }
}

impl CupCircle for SuccessorRing {
    fn advance_round(&mut self) {
        let current = self.current as usize;
        let first = self.next[current];
        let second = self.next[first as usize];
        let third = self.next[second as usize];
        let after_pick_up = self.next[third as usize];

        let picked = [first, second, third];
        let destination = destination_label(self.current, &picked, self.highest()) as usize;
        // with MIN_CUPS cups the destination is the current cup and the pick up goes back in place
        let after_destination = if destination == current { after_pick_up } else { self.next[destination] };

        self.next[current] = after_pick_up;
        self.next[destination] = first;
        self.next[third as usize] = after_destination;
        self.current = self.next[current];
    }

    fn current(&self) -> u32 {
        self.current
    }

    fn cup_count(&self) -> usize {
        self.next.len() - 1
    }

    fn successor(&self, label: u32) -> Option<u32> {
        match label {
            0 => None,
            _ => self.next.get(label as usize).copied(),
        }
    }
}

/// First label below `current`, wrapping from 1 to `highest`, that was not picked up.
pub(crate) fn destination_label(current: u32, picked: &[u32; PICK_UP], highest: u32) -> u32 {
    descending_labels(current, highest)
        .find(|label| !picked.contains(label))
        .expect("every label picked up")
}

fn check_dense_labels(prefix: &[u32], cup_count: u32) -> Result<(), CupsError> {
    if prefix.is_empty() {
        return Err(CupsError::EmptyInput);
    }
    if (cup_count as usize) < MIN_CUPS {
        return Err(CupsError::TooFewCups(cup_count as usize));
    }

    let mut seen = vec![false; prefix.len() + 1];
    for &label in prefix {
        let slot = match seen.get_mut(label as usize) {
            Some(slot) if label != 0 => slot,
            _ => return Err(CupsError::LabelOutOfRange(label)),
        };
        if *slot {
            return Err(CupsError::DuplicateLabel(label));
        }
        *slot = true;
    }

    if prefix.len() > cup_count as usize {
        return Err(CupsError::LabelOutOfRange(prefix.len() as u32));
    }
    Ok(())
}
