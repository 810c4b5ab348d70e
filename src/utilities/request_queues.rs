/// ----- REQUEST QUEUES -----
/// Pending stops of one car, split in two buckets. The ascending bucket is
/// served lowest floor first while the car travels up, the descending bucket
/// highest floor first while it travels down. A floor is pending at most once
/// per bucket; the first request for a floor is the one kept.

use std::collections::BTreeMap;

use super::direction::Direction;
use super::request::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct RequestQueues {
    ascending: BTreeMap<u8, Request>,
    descending: BTreeMap<u8, Request>,
}

impl RequestQueues {
    pub fn new() -> Self {
        RequestQueues::default()
    }

    pub fn bucket_for(request: &Request, current_floor: u8) -> Bucket {
        if request.floor > current_floor
            || (request.floor == current_floor && request.direction == Direction::Up) {
            Bucket::Ascending
        } else {
            Bucket::Descending
        }
    }

    /// Returns `false` when the floor was already pending in that bucket.
    pub fn insert(&mut self, request: Request, current_floor: u8) -> bool {
        let bucket = match Self::bucket_for(&request, current_floor) {
            Bucket::Ascending => &mut self.ascending,
            Bucket::Descending => &mut self.descending,
        };
        if bucket.contains_key(&request.floor) {
            return false
        }
        bucket.insert(request.floor, request);
        true
    }

    pub fn pop_ascending(&mut self) -> Option<Request> {
        self.ascending.pop_first().map(|(_, request)| request)
    }

    pub fn pop_descending(&mut self) -> Option<Request> {
        self.descending.pop_last().map(|(_, request)| request)
    }

    pub fn has_ascending(&self) -> bool {
        !self.ascending.is_empty()
    }

    pub fn has_descending(&self) -> bool {
        !self.descending.is_empty()
    }

    pub fn has_pending(&self, bucket: Bucket) -> bool {
        match bucket {
            Bucket::Ascending => self.has_ascending(),
            Bucket::Descending => self.has_descending(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ascending.is_empty() && self.descending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ascending.len() + self.descending.len()
    }

    /// Pending ascending floors in service order (lowest first).
    pub fn ascending_floors(&self) -> Vec<u8> {
        self.ascending.keys().copied().collect()
    }

    /// Pending descending floors in service order (highest first).
    pub fn descending_floors(&self) -> Vec<u8> {
        self.descending.keys().rev().copied().collect()
    }

    /// Empties both buckets, oldest request first.
    pub fn drain(&mut self) -> Vec<Request> {
        let mut requests: Vec<Request> = std::mem::take(&mut self.ascending)
            .into_values()
            .chain(std::mem::take(&mut self.descending).into_values())
            .collect();
        requests.sort_by_key(|request| request.created_at);
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn floors_above_go_up_and_floors_below_go_down() {
        let mut queues = RequestQueues::new();
        assert!(queues.insert(Request::hall(6, Direction::Down), 3));
        assert!(queues.insert(Request::hall(1, Direction::Up), 3));

        assert_eq!(queues.ascending_floors(), vec![6]);
        assert_eq!(queues.descending_floors(), vec![1]);
    }

    #[test]
    fn current_floor_bucket_depends_on_direction() {
        let up = Request::hall(3, Direction::Up);
        let down = Request::hall(3, Direction::Down);
        assert_eq!(RequestQueues::bucket_for(&up, 3), Bucket::Ascending);
        assert_eq!(RequestQueues::bucket_for(&down, 3), Bucket::Descending);
    }

    #[test]
    fn duplicate_floor_is_a_no_op_and_keeps_first_request() {
        let mut queues = RequestQueues::new();
        let first = Request::hall(5, Direction::Up);
        assert!(queues.insert(first, 0));
        assert!(!queues.insert(Request::car_panel(5, 0), 0));

        assert_eq!(queues.len(), 1);
        assert_eq!(queues.pop_ascending(), Some(first));
        assert!(queues.is_empty());
    }

    #[test]
    fn same_floor_may_be_pending_in_both_buckets() {
        let mut queues = RequestQueues::new();
        assert!(queues.insert(Request::hall(2, Direction::Up), 2));
        assert!(queues.insert(Request::hall(2, Direction::Down), 2));
        assert_eq!(queues.len(), 2);
    }

    #[test]
    fn buckets_pop_in_sweep_order() {
        let mut queues = RequestQueues::new();
        for floor in [7, 3, 5] {
            queues.insert(Request::hall(floor, Direction::Up), 1);
        }
        for floor in [1, 4, 2] {
            queues.insert(Request::hall(floor, Direction::Down), 9);
        }

        let up: Vec<u8> = std::iter::from_fn(|| queues.pop_ascending()).map(|r| r.floor).collect();
        let down: Vec<u8> = std::iter::from_fn(|| queues.pop_descending()).map(|r| r.floor).collect();
        assert_eq!(up, vec![3, 5, 7]);
        assert_eq!(down, vec![4, 2, 1]);
    }

    #[test]
    fn drain_empties_both_buckets_oldest_first() {
        let mut queues = RequestQueues::new();
        let first = Request::hall(8, Direction::Down);
        let second = Request::hall(1, Direction::Up);
        queues.insert(first, 4);
        queues.insert(second, 4);

        let drained = queues.drain();
        assert!(queues.is_empty());
        assert_eq!(drained.len(), 2);
        assert!(drained[0].created_at <= drained[1].created_at);
    }

    proptest! {
        #[test]
        fn repeated_presses_never_duplicate_a_floor(
            floors in proptest::collection::vec(1u8..20, 1..60),
            current in 0u8..20,
        ) {
            let mut queues = RequestQueues::new();
            for floor in &floors {
                queues.insert(Request::hall(*floor, Direction::Up), current);
                queues.insert(Request::hall(*floor, Direction::Up), current);
            }
            let mut distinct = floors.clone();
            distinct.sort();
            distinct.dedup();
            prop_assert_eq!(queues.len(), distinct.len());

            let ascending = queues.ascending_floors();
            prop_assert!(ascending.windows(2).all(|pair| pair[0] < pair[1]));
            let descending = queues.descending_floors();
            prop_assert!(descending.windows(2).all(|pair| pair[0] > pair[1]));
        }
    }
}
