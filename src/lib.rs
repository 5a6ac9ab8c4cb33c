//! Seat reservation core: a fixed seat grid with selection and sold tracking,
//! buyer order validation, and snapshot persistence behind a storage port.

pub mod config;
pub mod confirmation;
pub mod error;
pub mod order;
pub mod seat;
pub mod service;
pub mod state;
pub mod storage;
pub mod utils;

pub use config::VenueConfig;
pub use order::{Field, OrderForm, ValidationReport};
pub use seat::{SeatId, SeatStatus, Toggle};
pub use service::{BookingService, BookingView, OrderOutcome};
pub use state::SeatState;
