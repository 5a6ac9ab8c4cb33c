//! Property-based tests for seat state and pricing invariants
//!
//! Toggle sequences are generated over a 5x8 hall so that repeats, sold seats
//! and re-selections all show up often.

use proptest::prelude::*;
use seat_reservation::{OrderForm, SeatId, SeatState, SeatStatus, Toggle};
use std::collections::HashSet;

const ROWS: u32 = 5;
const COLS: u32 = 8;
const UNIT_PRICE: u64 = 50_000;

// PROPERTY TEST STRATEGIES

/// Strategy to generate an on-grid seat
fn seat_strategy() -> impl Strategy<Value = SeatId> {
    (0..ROWS, 0..COLS).prop_map(|(row, col)| SeatId::new(row, col))
}

/// Strategy to generate a state with some seats sold and some selected
fn state_strategy() -> impl Strategy<Value = SeatState> {
    (
        prop::collection::vec(seat_strategy(), 0..12),
        prop::collection::vec(seat_strategy(), 0..12),
    )
        .prop_map(|(sold, toggles)| {
            let mut state = SeatState::new(ROWS, COLS)
                .with_sold(sold)
                .expect("strategy only yields on-grid seats");
            for seat in toggles {
                state.toggle(seat).expect("on-grid toggle");
            }
            state
        })
}

fn valid_form() -> OrderForm {
    OrderForm::new()
        .set_full_name("Ali Valiyev")
        .set_age(20)
        .set_card_number("1234123412341234")
}

// PROPERTY TESTS
proptest! {
    /// Property: toggling a sold seat never changes either set
    #[test]
    fn prop_sold_seat_toggle_is_noop(state in state_strategy(), seat in seat_strategy()) {
        let mut state = state.with_sold([seat]).unwrap();
        let before = state.clone();

        prop_assert_eq!(state.toggle(seat).unwrap(), Toggle::Unavailable);
        prop_assert_eq!(state, before);
    }

    /// Property: two toggles of an unsold seat restore the selection
    #[test]
    fn prop_double_toggle_restores_selection(state in state_strategy(), seat in seat_strategy()) {
        prop_assume!(!state.is_sold(&seat));
        let mut toggled = state.clone();

        toggled.toggle(seat).unwrap();
        toggled.toggle(seat).unwrap();

        prop_assert_eq!(toggled, state);
    }

    /// Property: the sold and selected sets never overlap
    #[test]
    fn prop_sets_stay_disjoint(state in state_strategy()) {
        let sold: HashSet<SeatId> = state.sold_seats().into_iter().collect();
        for seat in state.selected_seats() {
            prop_assert!(!sold.contains(&seat));
            prop_assert_eq!(state.status(&seat), SeatStatus::Selected);
        }
    }

    /// Property: total price is selection size times unit price, empty included
    #[test]
    fn prop_total_price_matches_selection(state in state_strategy()) {
        prop_assert_eq!(
            state.total_price(UNIT_PRICE),
            state.selected_seats().len() as u64 * UNIT_PRICE
        );
    }

    /// Property: a validated commit sells exactly the selection and empties it
    #[test]
    fn prop_commit_unions_selection_into_sold(state in state_strategy()) {
        let report = valid_form().validate(state.selected_count());
        prop_assume!(report.is_valid());

        let mut committed = state.clone();
        let newly_sold = committed.commit();

        let expected: HashSet<SeatId> = state
            .sold_seats()
            .into_iter()
            .chain(state.selected_seats())
            .collect();
        let sold: HashSet<SeatId> = committed.sold_seats().into_iter().collect();

        prop_assert_eq!(newly_sold, state.selected_seats());
        prop_assert_eq!(sold, expected);
        prop_assert!(committed.selected_seats().is_empty());
        prop_assert_eq!(committed.total_price(UNIT_PRICE), 0);
    }

    /// Property: card numbers pass whatever separators surround the 16 digits
    #[test]
    fn prop_card_separators_are_ignored(
        digits in "[0-9]{16}",
        separator in prop_oneof![Just(" "), Just("-"), Just("")],
    ) {
        let spaced: String = digits
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(separator);

        let report = valid_form().set_card_number(spaced).validate(1);
        prop_assert!(report.is_valid());
    }
}
