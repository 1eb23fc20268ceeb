pub use self::circular_list::*;
pub use self::cups::*;
pub use self::errors::*;
pub use self::successor_ring::*;

mod circular_list;
mod cups;
mod errors;
mod link;
mod successor_ring;

#[cfg(test)]
mod tests {
    use crate::{labels_after_one, CircularList, CupCircle, ListGame, SuccessorRing};

    fn round(list: &mut CircularList<u32>, current: u32, highest: u32) -> u32 {
        let node = list.find(&current).unwrap();
        let picked = list.splice(list.next(node).unwrap(), 3).unwrap();

        let mut target = current;
        let destination = loop {
            target = if target == 1 { highest } else { target - 1 };
            if let Some(destination) = list.find(&target) {
                break destination;
            }
        };
        println!("cups: {list}  pick up: {picked}  destination: {target}");

        list.insert_list_after(destination, picked).unwrap();
        *list.value(list.next(node).unwrap()).unwrap()
    }

    #[test]
    fn example_moves_by_hand() {
        let mut list: CircularList<u32> = [3, 8, 9, 1, 2, 5, 4, 6, 7].into_iter().collect();
        let mut current = 3;
        for _ in 0..10 {
            current = round(&mut list, current, 9);
            list.assert_consistent();
        }
        println!("final: {list}");

        let one = list.find(&1).unwrap();
        let after_one = list.iter_from(one).unwrap().skip(1).map(|c| c.to_string()).collect::<String>();
        assert_eq!(after_one, "92658374");
        assert_eq!(current, 8);
    }

    #[test]
    fn list_and_ring_agree_on_example() {
        let labels = [3, 8, 9, 1, 2, 5, 4, 6, 7];
        let mut game = ListGame::new(&labels).unwrap();
        let mut ring = SuccessorRing::new(&labels, 9).unwrap();

        for _ in 0..100 {
            game.advance_round();
            ring.advance_round();
            assert_eq!(game.current(), ring.current());
            assert_eq!(game.cycle_after(1), ring.cycle_after(1));
        }
        assert_eq!(labels_after_one(&game), labels_after_one(&ring));
        assert_eq!(labels_after_one(&ring).unwrap(), "67384529");
    }
}
