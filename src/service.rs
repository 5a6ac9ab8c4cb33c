//! Service layer API for the two booking intents: toggle a seat, submit an order
use super::config::VenueConfig;
use super::confirmation::{Confirmation, TimeStamp};
use super::error::{SeatError, StorageError};
use super::order::{OrderForm, ValidationReport};
use super::seat::{SeatId, SeatStatus, Toggle};
use super::state::{Rehydrated, SeatState};
use super::storage::{MemoryStore, SledStore, SnapshotStore};
use super::utils;
use anyhow::Context;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Result of a submit intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
    Confirmed(Confirmation),
    // form handed back untouched so the buyer can fix it
    Rejected {
        form: OrderForm,
        report: ValidationReport,
    },
}

/// Everything the rendering side needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub seat_map: Vec<Vec<SeatStatus>>,
    pub selected: Vec<SeatId>,
    pub total_price: u64,
    pub banner: Option<Confirmation>,
    pub persistence_degraded: bool,
}

pub struct BookingService {
    config: VenueConfig,
    state: SeatState,
    store: Box<dyn SnapshotStore>,
    banner: Option<Confirmation>,
    degraded: bool,
    // false once `soldSeats` could not be read; writing then would clobber it
    writable: bool,
}

impl BookingService {
    /// Starts a session, rehydrating seats from the store entry by entry.
    ///
    /// An unreadable `selectedSeats` only empties the selection. An unreadable
    /// `soldSeats` leaves the store untouched for the rest of the session, which
    /// then runs in memory only.
    pub fn new(config: VenueConfig, store: Box<dyn SnapshotStore>) -> Self {
        let Rehydrated {
            state,
            sold_error,
            selected_error,
        } = SeatState::rehydrate(&*store, config.rows, config.cols);

        if let Some(e) = &selected_error {
            warn!(%e, "selection snapshot unreadable, starting with no selection");
        }
        let writable = match &sold_error {
            Some(e) => {
                warn!(%e, "sold snapshot unreadable, continuing in memory");
                false
            }
            None => true,
        };
        info!(
            sold = state.sold_seats().len(),
            selected = state.selected_count(),
            writable,
            "rehydrated seat snapshot"
        );

        Self {
            config,
            state,
            store,
            banner: None,
            degraded: !writable || selected_error.is_some(),
            writable,
        }
    }

    /// Opens the store named by `snapshot_path`, or an in-memory store when unset
    pub fn open(config: VenueConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let store: Box<dyn SnapshotStore> = match &config.snapshot_path {
            Some(path) => Box::new(
                SledStore::open(path)
                    .with_context(|| format!("Failed to open snapshot at {}", path.display()))?,
            ),
            None => Box::new(MemoryStore::new()),
        };

        Ok(Self::new(config, store))
    }

    /// Seeds seats sold elsewhere and persists them
    pub fn with_sold<I>(mut self, seats: I) -> Result<Self, SeatError>
    where
        I: IntoIterator<Item = SeatId>,
    {
        self.state = self.state.with_sold(seats)?;
        self.write_through(|state, store| state.persist_all(store));
        Ok(self)
    }

    pub fn config(&self) -> &VenueConfig {
        &self.config
    }
    pub fn state(&self) -> &SeatState {
        &self.state
    }
    /// True once any snapshot read or write has failed. It latches: a failed
    /// write may leave the snapshot behind the session even if later writes land.
    pub fn persistence_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether intents are still written through to the store
    pub fn persistence_enabled(&self) -> bool {
        self.writable
    }

    pub fn status(&self, seat: &SeatId) -> SeatStatus {
        self.state.status(seat)
    }

    pub fn total_price(&self) -> u64 {
        self.state.total_price(self.config.unit_price)
    }

    /// Toggle intent from the seat map
    pub fn toggle_seat(&mut self, seat: SeatId) -> Result<Toggle, SeatError> {
        let outcome = self.state.toggle(seat)?;
        debug!(%seat, ?outcome, "seat toggled");

        if outcome != Toggle::Unavailable {
            self.write_through(|state, store| state.persist_selection(store));
        }
        Ok(outcome)
    }

    /// Toggle intent carrying the `"<row>-<col>"` key
    pub fn toggle_seat_key(&mut self, key: &str) -> Result<Toggle, SeatError> {
        self.toggle_seat(key.parse::<SeatId>()?)
    }

    /// Submit intent. Either every check passes and the whole selection is sold,
    /// or nothing changes.
    pub fn submit_order(&mut self, form: OrderForm) -> anyhow::Result<OrderOutcome> {
        self.submit_order_at(form, TimeStamp::new())
    }

    pub fn submit_order_at(
        &mut self,
        form: OrderForm,
        now: TimeStamp<Utc>,
    ) -> anyhow::Result<OrderOutcome> {
        let report = form.validate(self.state.selected_count());
        if !report.is_valid() {
            debug!(fields = ?report.fields(), "order rejected");
            return Ok(OrderOutcome::Rejected { form, report });
        }

        // generated before the commit so a failure here leaves seats untouched
        let order_ref = utils::new_order_ref().context("Failed to generate order reference")?;
        let amount = self.total_price();

        let seats = self.state.commit();
        self.write_through(|state, store| state.persist_commit(store));

        info!(%order_ref, seats = seats.len(), amount, "order committed");

        let confirmation = Confirmation::new(order_ref, seats, amount, now, self.config.banner_ttl);
        self.banner = Some(confirmation.clone());

        Ok(OrderOutcome::Confirmed(confirmation))
    }

    /// Drops the selection without buying
    pub fn cancel_selection(&mut self) {
        self.state.clear_selection();
        self.write_through(|state, store| state.persist_selection(store));
    }

    /// Clears sold and selected seats along with their snapshot
    pub fn reset(&mut self) {
        self.state.reset();
        self.banner = None;
        self.write_through(|state, store| state.persist_reset(store));
    }

    /// The last confirmation, while its banner is still up
    pub fn banner(&self, now: &TimeStamp<Utc>) -> Option<&Confirmation> {
        self.banner.as_ref().filter(|b| b.is_visible_at(now))
    }

    pub fn view(&self, now: &TimeStamp<Utc>) -> BookingView {
        BookingView {
            seat_map: self.state.seat_map(),
            selected: self.state.selected_seats(),
            total_price: self.total_price(),
            banner: self.banner(now).cloned(),
            persistence_degraded: self.degraded,
        }
    }

    // storage failures never abort an intent; the session carries on in memory
    fn write_through<F>(&mut self, write: F)
    where
        F: FnOnce(&SeatState, &mut dyn SnapshotStore) -> Result<(), StorageError>,
    {
        if !self.writable {
            return;
        }
        if let Err(e) = write(&self.state, &mut *self.store) {
            if !self.degraded {
                warn!(%e, "snapshot write failed, continuing in memory");
            }
            self.degraded = true;
        }
    }
}
