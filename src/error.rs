//! Error types for seat handling, order validation and snapshot storage

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid full name: {0}")]
    InvalidName(NameIssue),
    #[error("Invalid age: {0}")]
    InvalidAge(AgeIssue),
    #[error("Invalid card number: {0}")]
    InvalidCard(CardIssue),
    #[error("At least one seat must be selected")]
    NoSeatsSelected,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameIssue {
    #[error("full name is required")]
    Empty,
    #[error("full name must be at least 3 characters")]
    TooShort,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeIssue {
    #[error("age is required")]
    Missing,
    #[error("age must be a whole number")]
    NotNumeric,
    #[error("buyers under 18 cannot purchase tickets")]
    Underage,
    #[error("age must not exceed 120")]
    OutOfRange,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardIssue {
    #[error("card number is required")]
    Missing,
    #[error("card number must have 16 digits, found {0}")]
    WrongLength(usize),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SeatError {
    #[error("Malformed seat id {0:?}, expected \"<row>-<col>\"")]
    Malformed(String),
    #[error("Seat {row}-{col} lies outside the {rows}x{cols} grid")]
    OutOfGrid {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Snapshot backend failure: {0}")]
    Backend(#[from] sled::Error),
    #[error("Failed to encode snapshot: {0}")]
    Encode(String),
    #[error("Failed to decode snapshot: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("Snapshot store unavailable: {0}")]
    Unavailable(String),
}
