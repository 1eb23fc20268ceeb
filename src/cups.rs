use std::collections::HashSet;
use std::iter;

use log::{debug, trace};

use crate::circular_list::*;
use crate::errors::*;
use crate::successor_ring::SuccessorRing;

/// Cups picked up after the current cup every round.
pub const PICK_UP: usize = 3;

/// Smallest circle where the destination search cannot run into the picked up cups.
pub const MIN_CUPS: usize = PICK_UP + 1;

/// How many rounds to play, and how many cups the circle is padded to.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Rules {
    pub rounds: usize,
    /// Labels above the highest input label up to this count are appended in increasing order.
    pub cup_count: Option<u32>,
}

impl Rules {
    pub const fn short() -> Rules {
        Rules { rounds: 100, cup_count: None }
    }

    pub const fn long() -> Rules {
        Rules { rounds: 10_000_000, cup_count: Some(1_000_000) }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules::short()
    }
}

/// A circle of uniquely labelled cups played round by round.
///
/// Each round picks up the [`PICK_UP`] cups clockwise of the current cup, puts them back in the
/// same order after the destination cup (the nearest lower label not picked up, wrapping from the
/// lowest to the highest label) and makes the cup clockwise of the current cup the new current cup.
pub trait CupCircle {
    fn advance_round(&mut self);

    fn current(&self) -> u32;

    fn cup_count(&self) -> usize;

    /// Label clockwise of `label`, `None` if there is no such cup.
    fn successor(&self, label: u32) -> Option<u32>;

    fn play(&mut self, rounds: usize) {
        debug!("playing {} rounds with {} cups, current cup {}", rounds, self.cup_count(), self.current());
        for _ in 0..rounds {
            self.advance_round();
        }
        debug!("finished {} rounds, current cup {}", rounds, self.current());
    }

    /// All other labels clockwise from `label`.
    fn cycle_after(&self, label: u32) -> Option<Vec<u32>> {
        let mut order = Vec::with_capacity(self.cup_count().saturating_sub(1));
        let mut it = self.successor(label)?;
        while it != label {
            order.push(it);
            it = self.successor(it)?;
        }
        Some(order)
    }
}

/// Cup game over a [`CircularList`], labels don't need to be dense.
#[derive(Debug, Clone)]
pub struct ListGame {
    cups: CircularList<u32>,
    current: NodeId,
    highest: u32,
}

impl ListGame {
    pub fn new(labels: &[u32]) -> Result<ListGame, CupsError> {
        check_labels(labels)?;
        let cups: CircularList<u32> = labels.iter().copied().collect();
        let current = cups.head().ok_or(CupsError::EmptyInput)?;
        let highest = labels.iter().copied().max().ok_or(CupsError::EmptyInput)?;
        Ok(ListGame { cups, current, highest })
    }

    pub fn cups(&self) -> &CircularList<u32> {
        &self.cups
    }
}

impl CupCircle for ListGame {
    fn advance_round(&mut self) {
        let current = *self.cups.value(self.current).expect("broken current cup");
        let first = self.cups.next(self.current).expect("broken current cup");
        let picked = self.cups.splice(first, PICK_UP).expect("not enough cups to pick up");

        let (label, destination) = descending_labels(current, self.highest)
            .find_map(|label| self.cups.find(&label).map(|node| (label, node)))
            .expect("destination cup not found");
        trace!("current {}, pick up {}, destination {}", current, picked, label);

        self.cups.insert_list_after(destination, picked).expect("broken destination cup");
        self.current = self.cups.next(self.current).expect("broken current cup");
    }

    fn current(&self) -> u32 {
        *self.cups.value(self.current).expect("broken current cup")
    }

    fn cup_count(&self) -> usize {
        self.cups.len()
    }

    fn successor(&self, label: u32) -> Option<u32> {
        let node = self.cups.next(self.cups.find(&label)?).ok()?;
        self.cups.value(node).ok().copied()
    }

    fn cycle_after(&self, label: u32) -> Option<Vec<u32>> {
        let node = self.cups.find(&label)?;
        Some(self.cups.iter_from(node).ok()?.skip(1).copied().collect())
    }
}

/// Labels below `current` in decreasing order, wrapping from 1 to `highest`. Never ends, and
/// reaches `current` again after `highest` steps.
pub(crate) fn descending_labels(current: u32, highest: u32) -> impl Iterator<Item = u32> {
    iter::successors(Some(current), move |&label| Some(if label <= 1 { highest } else { label - 1 })).skip(1)
}

/// Labels from the first line of `input`, one per digit.
pub fn parse_labels(input: &str) -> Result<Vec<u32>, CupsError> {
    let line = input.lines().next().map(str::trim).filter(|l| !l.is_empty()).ok_or(CupsError::EmptyInput)?;

    let labels = line
        .chars()
        .map(|c| c.to_digit(10).filter(|&d| d != 0).ok_or(CupsError::InvalidLabel(c)))
        .collect::<Result<Vec<u32>, CupsError>>()?;
    check_unique(&labels)?;
    Ok(labels)
}

/// Labels clockwise of cup 1, concatenated.
pub fn labels_after_one<C: CupCircle>(circle: &C) -> Result<String, CupsError> {
    let order = circle.cycle_after(1).ok_or(CupsError::MissingLabel(1))?;
    Ok(order.iter().map(u32::to_string).collect())
}

/// Plays `labels` on a [`ListGame`] and reads the labels after cup 1.
pub fn play_short(labels: &[u32], rules: &Rules) -> Result<String, CupsError> {
    let highest = labels.iter().copied().max().ok_or(CupsError::EmptyInput)?;
    let padding = highest + 1..=rules.cup_count.unwrap_or(highest);
    let cups: Vec<u32> = labels.iter().copied().chain(padding).collect();

    let mut game = ListGame::new(&cups)?;
    game.play(rules.rounds);
    labels_after_one(&game)
}

/// Plays `labels` on a [`SuccessorRing`] and multiplies the two labels after cup 1.
pub fn play_long(labels: &[u32], rules: &Rules) -> Result<u64, CupsError> {
    let cup_count = rules.cup_count.unwrap_or(labels.len() as u32);
    let mut ring = SuccessorRing::new(labels, cup_count)?;
    ring.play(rules.rounds);
    Ok(ring.product_after_one())
}

fn check_labels(labels: &[u32]) -> Result<(), CupsError> {
    if labels.is_empty() {
        return Err(CupsError::EmptyInput);
    }
    if labels.len() < MIN_CUPS {
        return Err(CupsError::TooFewCups(labels.len()));
    }
    if labels.contains(&0) {
        return Err(CupsError::LabelOutOfRange(0));
    }
    check_unique(labels)
}

fn check_unique(labels: &[u32]) -> Result<(), CupsError> {
    let mut seen = HashSet::with_capacity(labels.len());
    match labels.iter().find(|&&label| !seen.insert(label)) {
        Some(&label) => Err(CupsError::DuplicateLabel(label)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: [u32; 9] = [3, 8, 9, 1, 2, 5, 4, 6, 7];

    #[test]
    fn parses_first_line() {
        assert_eq!(parse_labels("389125467\nrest"), Ok(EXAMPLE.to_vec()));
        assert_eq!(parse_labels("  4321 \n"), Ok(vec![4, 3, 2, 1]));
        assert_eq!(parse_labels(""), Err(CupsError::EmptyInput));
        assert_eq!(parse_labels("\n123"), Err(CupsError::EmptyInput));
        assert_eq!(parse_labels("12a4"), Err(CupsError::InvalidLabel('a')));
        assert_eq!(parse_labels("1204"), Err(CupsError::InvalidLabel('0')));
        assert_eq!(parse_labels("12324"), Err(CupsError::DuplicateLabel(2)));
    }

    #[test]
    fn descending_labels_wrap() {
        let labels: Vec<u32> = descending_labels(3, 5).take(6).collect();
        assert_eq!(labels, vec![2, 1, 5, 4, 3, 2]);
        assert_eq!(descending_labels(1, 5).next(), Some(5));
    }

    #[test]
    fn list_game_rejects_bad_labels() {
        assert_eq!(ListGame::new(&[]).unwrap_err(), CupsError::EmptyInput);
        assert_eq!(ListGame::new(&[3, 1, 2]).unwrap_err(), CupsError::TooFewCups(3));
        assert_eq!(ListGame::new(&[3, 0, 2, 1]).unwrap_err(), CupsError::LabelOutOfRange(0));
        assert_eq!(ListGame::new(&[3, 4, 2, 4]).unwrap_err(), CupsError::DuplicateLabel(4));
    }

    #[test]
    fn list_game_first_round() {
        let mut game = ListGame::new(&EXAMPLE).unwrap();
        assert_eq!(game.current(), 3);
        game.advance_round();
        assert_eq!(game.current(), 2);
        assert_eq!(game.cups().iter().copied().collect::<Vec<_>>(), vec![3, 2, 8, 9, 1, 5, 4, 6, 7]);
        assert_eq!(game.cup_count(), 9);
    }

    #[test]
    fn list_game_sparse_labels() {
        let mut game = ListGame::new(&[30, 10, 40, 20, 50]).unwrap();
        game.advance_round();
        // 30 picks up 10 40 20, nothing below 30 is left, so 50 is the destination
        assert_eq!(game.cycle_after(30), Some(vec![50, 10, 40, 20]));
        assert_eq!(game.current(), 50);
        assert_eq!(game.successor(20), Some(30));
        assert_eq!(game.successor(7), None);
    }

    #[test]
    fn four_cups_put_back_in_place() {
        let mut game = ListGame::new(&[2, 4, 1, 3]).unwrap();
        game.advance_round();
        assert_eq!(game.cycle_after(2), Some(vec![4, 1, 3]));
        assert_eq!(game.current(), 4);
    }

    #[test]
    fn four_cups_match_ring() {
        for labels in [[2, 4, 1, 3], [1, 2, 3, 4], [4, 3, 2, 1]] {
            let mut game = ListGame::new(&labels).unwrap();
            let mut ring = SuccessorRing::new(&labels, 4).unwrap();
            for _ in 0..12 {
                game.advance_round();
                ring.advance_round();
                assert_eq!(game.current(), ring.current());
                assert_eq!(game.cycle_after(game.current()), ring.cycle_after(ring.current()));
            }
        }
    }

    #[test]
    fn example_rounds() {
        let mut game = ListGame::new(&EXAMPLE).unwrap();
        game.play(10);
        assert_eq!(labels_after_one(&game), Ok("92658374".to_string()));
        game.play(90);
        assert_eq!(labels_after_one(&game), Ok("67384529".to_string()));
    }

    #[test]
    fn answers_for_example() {
        assert_eq!(play_short(&EXAMPLE, &Rules::short()), Ok("67384529".to_string()));
        assert_eq!(play_short(&EXAMPLE, &Rules { rounds: 10, cup_count: None }), Ok("92658374".to_string()));
        assert_eq!(play_long(&EXAMPLE, &Rules { rounds: 10, cup_count: None }), Ok(9 * 2));
    }

    #[test]
    fn missing_label_one() {
        let game = ListGame::new(&[5, 3, 4, 2]).unwrap();
        assert_eq!(labels_after_one(&game), Err(CupsError::MissingLabel(1)));
    }

    #[test]
    fn padded_short_game_matches_ring() {
        let rules = Rules { rounds: 50, cup_count: Some(25) };
        let mut ring = SuccessorRing::new(&EXAMPLE, 25).unwrap();
        ring.play(rules.rounds);
        assert_eq!(play_short(&EXAMPLE, &rules), labels_after_one(&ring));
    }
}
