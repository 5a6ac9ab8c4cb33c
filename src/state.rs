//! Seat selection and sold-set reconciliation
use super::error::{SeatError, StorageError};
use super::seat::{SeatId, SeatStatus, Toggle};
use super::storage::{SELECTED_SEATS_KEY, SOLD_SEATS_KEY, SnapshotStore, SnapshotWrite};
use std::collections::HashSet;
use tracing::{debug, warn};

/// The authoritative record of sold and selected seats for one session.
///
/// Status is never stored: it is derived from the two sets, which are kept
/// disjoint by `toggle` and `commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatState {
    rows: u32,
    cols: u32,
    sold: HashSet<SeatId>,
    selected: HashSet<SeatId>,
}

/// Outcome of reading a snapshot entry by entry
#[derive(Debug)]
pub struct Rehydrated {
    pub state: SeatState,
    pub sold_error: Option<StorageError>,
    pub selected_error: Option<StorageError>,
}

impl SeatState {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            sold: HashSet::new(),
            selected: HashSet::new(),
        }
    }

    /// Seeds seats that were sold outside this session. Off-grid seats are refused.
    pub fn with_sold<I>(mut self, seats: I) -> Result<Self, SeatError>
    where
        I: IntoIterator<Item = SeatId>,
    {
        for seat in seats {
            seat.within(self.rows, self.cols)?;
            self.selected.remove(&seat);
            self.sold.insert(seat);
        }
        Ok(self)
    }

    /// Rehydrates both sets from a snapshot, defaulting to empty when a key is
    /// absent. Fails if either entry cannot be read.
    pub fn load<S: SnapshotStore + ?Sized>(
        store: &S,
        rows: u32,
        cols: u32,
    ) -> Result<Self, StorageError> {
        let Rehydrated {
            state,
            sold_error,
            selected_error,
        } = Self::rehydrate(store, rows, cols);

        match sold_error.or(selected_error) {
            Some(e) => Err(e),
            None => Ok(state),
        }
    }

    /// Reads each snapshot entry on its own, so one unreadable entry only
    /// empties its own set.
    pub fn rehydrate<S: SnapshotStore + ?Sized>(store: &S, rows: u32, cols: u32) -> Rehydrated {
        let mut state = Self::new(rows, cols);

        let (sold, sold_error) = split(store.get(SOLD_SEATS_KEY));
        let (selected, selected_error) = split(store.get(SELECTED_SEATS_KEY));

        let sold = state.parse_keys(SOLD_SEATS_KEY, &sold);
        let selected: HashSet<SeatId> = state
            .parse_keys(SELECTED_SEATS_KEY, &selected)
            .into_iter()
            .filter(|seat| !sold.contains(seat))
            .collect();

        state.sold = sold;
        state.selected = selected;
        Rehydrated {
            state,
            sold_error,
            selected_error,
        }
    }

    fn parse_keys(&self, key: &str, raw: &[String]) -> HashSet<SeatId> {
        raw.iter()
            .filter_map(|entry| {
                match entry
                    .parse::<SeatId>()
                    .and_then(|seat| seat.within(self.rows, self.cols).map(|_| seat))
                {
                    Ok(seat) => Some(seat),
                    Err(e) => {
                        warn!(key, %e, "skipping snapshot entry");
                        None
                    }
                }
            })
            .collect()
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Flips the seat in the selection. Sold seats are left alone.
    pub fn toggle(&mut self, seat: SeatId) -> Result<Toggle, SeatError> {
        seat.within(self.rows, self.cols)?;

        if self.sold.contains(&seat) {
            debug!(%seat, "toggle ignored, seat is sold");
            return Ok(Toggle::Unavailable);
        }
        if self.selected.remove(&seat) {
            return Ok(Toggle::Deselected);
        }
        self.selected.insert(seat);
        Ok(Toggle::Selected)
    }

    /// Moves every selected seat into the sold set and returns them in grid order.
    ///
    /// Callers validate the order first; an empty selection commits nothing.
    pub fn commit(&mut self) -> Vec<SeatId> {
        let mut newly_sold: Vec<SeatId> = self.selected.drain().collect();
        newly_sold.sort();
        self.sold.extend(newly_sold.iter().copied());
        newly_sold
    }

    /// Drops the current selection without selling anything
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.sold.clear();
    }

    pub fn status(&self, seat: &SeatId) -> SeatStatus {
        if self.sold.contains(seat) {
            SeatStatus::Sold
        } else if self.selected.contains(seat) {
            SeatStatus::Selected
        } else {
            SeatStatus::Available
        }
    }

    /// Saturates rather than wrapping; `VenueConfig::validate` keeps a full
    /// hall below the ceiling.
    pub fn total_price(&self, unit_price: u64) -> u64 {
        (self.selected.len() as u64).saturating_mul(unit_price)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }
    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }
    pub fn is_sold(&self, seat: &SeatId) -> bool {
        self.sold.contains(seat)
    }
    pub fn is_selected(&self, seat: &SeatId) -> bool {
        self.selected.contains(seat)
    }

    pub fn selected_seats(&self) -> Vec<SeatId> {
        sorted(&self.selected)
    }
    pub fn sold_seats(&self) -> Vec<SeatId> {
        sorted(&self.sold)
    }

    /// Row-major statuses for the whole grid
    pub fn seat_map(&self) -> Vec<Vec<SeatStatus>> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.status(&SeatId::new(row, col)))
                    .collect()
            })
            .collect()
    }

    /// Overwrites the `selectedSeats` entry
    pub fn persist_selection<S: SnapshotStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), StorageError> {
        store.set(SELECTED_SEATS_KEY, &keys(&self.selected))
    }

    /// Overwrites `soldSeats` and removes `selectedSeats` in one apply
    pub fn persist_commit<S: SnapshotStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), StorageError> {
        store.apply(vec![
            SnapshotWrite::Set {
                key: SOLD_SEATS_KEY.to_string(),
                seats: keys(&self.sold),
            },
            SnapshotWrite::Remove {
                key: SELECTED_SEATS_KEY.to_string(),
            },
        ])
    }

    /// Writes both entries, as used after seeding sold seats
    pub fn persist_all<S: SnapshotStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), StorageError> {
        store.apply(vec![
            SnapshotWrite::Set {
                key: SOLD_SEATS_KEY.to_string(),
                seats: keys(&self.sold),
            },
            SnapshotWrite::Set {
                key: SELECTED_SEATS_KEY.to_string(),
                seats: keys(&self.selected),
            },
        ])
    }

    pub fn persist_reset<S: SnapshotStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<(), StorageError> {
        store.apply(vec![
            SnapshotWrite::Remove {
                key: SOLD_SEATS_KEY.to_string(),
            },
            SnapshotWrite::Remove {
                key: SELECTED_SEATS_KEY.to_string(),
            },
        ])
    }
}

fn split(
    entry: Result<Option<Vec<String>>, StorageError>,
) -> (Vec<String>, Option<StorageError>) {
    match entry {
        Ok(seats) => (seats.unwrap_or_default(), None),
        Err(e) => (Vec::new(), Some(e)),
    }
}

fn sorted(set: &HashSet<SeatId>) -> Vec<SeatId> {
    let mut seats: Vec<SeatId> = set.iter().copied().collect();
    seats.sort();
    seats
}

fn keys(set: &HashSet<SeatId>) -> Vec<String> {
    sorted(set).iter().map(SeatId::key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn toggle_selects_then_deselects() {
        let mut state = SeatState::new(5, 8);
        let seat = SeatId::new(0, 0);

        assert_eq!(state.toggle(seat), Ok(Toggle::Selected));
        assert_eq!(state.status(&seat), SeatStatus::Selected);
        assert_eq!(state.toggle(seat), Ok(Toggle::Deselected));
        assert_eq!(state.status(&seat), SeatStatus::Available);
    }

    #[test]
    fn sold_seat_cannot_be_selected() {
        let seat = SeatId::new(3, 4);
        let mut state = SeatState::new(5, 8).with_sold([seat]).unwrap();
        let before = state.clone();

        assert_eq!(state.toggle(seat), Ok(Toggle::Unavailable));
        assert_eq!(state, before);
    }

    #[test]
    fn commit_moves_selection_into_sold() {
        let mut state = SeatState::new(5, 8);
        state.toggle(SeatId::new(1, 2)).unwrap();
        state.toggle(SeatId::new(0, 5)).unwrap();

        let sold = state.commit();

        assert_eq!(sold, vec![SeatId::new(0, 5), SeatId::new(1, 2)]);
        assert!(!state.has_selection());
        assert_eq!(state.status(&SeatId::new(1, 2)), SeatStatus::Sold);
        assert_eq!(state.total_price(50_000), 0);
    }

    #[test]
    fn load_drops_bad_and_overlapping_entries() {
        let mut store = MemoryStore::new();
        store
            .set(SOLD_SEATS_KEY, &["0-0".into(), "9-9".into(), "junk".into()])
            .unwrap();
        store
            .set(SELECTED_SEATS_KEY, &["0-0".into(), "1-1".into()])
            .unwrap();

        let state = SeatState::load(&store, 5, 8).unwrap();

        assert_eq!(state.sold_seats(), vec![SeatId::new(0, 0)]);
        assert_eq!(state.selected_seats(), vec![SeatId::new(1, 1)]);
    }

    // a store whose selection entry cannot be read
    struct UnreadableSelection(MemoryStore);

    impl SnapshotStore for UnreadableSelection {
        fn get(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
            if key == SELECTED_SEATS_KEY {
                return Err(StorageError::Unavailable("selection unreadable".into()));
            }
            self.0.get(key)
        }
        fn set(&mut self, key: &str, seats: &[String]) -> Result<(), StorageError> {
            self.0.set(key, seats)
        }
        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.remove(key)
        }
    }

    #[test]
    fn rehydrate_keeps_sold_when_selection_unreadable() {
        let mut inner = MemoryStore::new();
        inner
            .set(SOLD_SEATS_KEY, &["3-4".into(), "3-5".into()])
            .unwrap();
        let store = UnreadableSelection(inner);

        let rehydrated = SeatState::rehydrate(&store, 5, 8);

        assert!(rehydrated.sold_error.is_none());
        assert!(rehydrated.selected_error.is_some());
        assert_eq!(
            rehydrated.state.sold_seats(),
            vec![SeatId::new(3, 4), SeatId::new(3, 5)]
        );
        assert!(!rehydrated.state.has_selection());
        assert!(SeatState::load(&store, 5, 8).is_err());
    }

    #[test]
    fn total_price_saturates() {
        let mut state = SeatState::new(5, 8);
        state.toggle(SeatId::new(0, 0)).unwrap();
        state.toggle(SeatId::new(0, 1)).unwrap();

        assert_eq!(state.total_price(u64::MAX / 2 + 1), u64::MAX);
    }

    #[test]
    fn seat_map_is_row_major() {
        let mut state = SeatState::new(2, 3);
        state.toggle(SeatId::new(1, 2)).unwrap();

        let map = state.seat_map();
        assert_eq!(map.len(), 2);
        assert!(map.iter().all(|row| row.len() == 3));
        assert_eq!(map[1][2], SeatStatus::Selected);
        assert_eq!(map[0][0], SeatStatus::Available);
    }
}
