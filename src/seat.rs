//! Seat identifiers and the statuses derived for them
use super::error::SeatError;
use std::fmt;
use std::str::FromStr;

/// A single grid position. Rows and columns are 0-based.
///
/// The canonical form is the string key `"<row>-<col>"`, which is what gets
/// persisted and what the rendering side sends back with a toggle intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId {
    pub row: u32,
    pub col: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatStatus {
    Available,
    Selected,
    Sold,
}

/// What a toggle did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
    // seat is sold, nothing changed
    Unavailable,
}

impl SeatId {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Checks the seat against an R x C grid
    pub fn within(&self, rows: u32, cols: u32) -> Result<(), SeatError> {
        if self.row < rows && self.col < cols {
            return Ok(());
        }
        Err(SeatError::OutOfGrid {
            row: self.row,
            col: self.col,
            rows,
            cols,
        })
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for SeatId {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SeatError::Malformed(s.to_string());

        let (row, col) = s.split_once('-').ok_or_else(malformed)?;
        let row = parse_index(row).ok_or_else(malformed)?;
        let col = parse_index(col).ok_or_else(malformed)?;

        Ok(SeatId { row, col })
    }
}

// canonical decimal only: no sign, no leading zeros
fn parse_index(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

impl From<(u32, u32)> for SeatId {
    fn from((row, col): (u32, u32)) -> Self {
        SeatId { row, col }
    }
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Selected => "selected",
            SeatStatus::Sold => "sold",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_key_parses_back() {
        let seat = SeatId::new(3, 7);
        assert_eq!(seat.key(), "3-7");
        assert_eq!("3-7".parse::<SeatId>().unwrap(), seat);
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in [
            "", "3", "3-", "-7", "a-b", "3-7-1", "-1-2", "+1-2", "01-02", "+0-+0", " 1-2",
        ] {
            assert!(bad.parse::<SeatId>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn zero_is_canonical() {
        assert_eq!("0-0".parse::<SeatId>().unwrap(), SeatId::new(0, 0));
        assert_eq!("10-20".parse::<SeatId>().unwrap(), SeatId::new(10, 20));
    }

    #[test]
    fn grid_bounds_are_exclusive() {
        assert!(SeatId::new(4, 7).within(5, 8).is_ok());
        assert_eq!(
            SeatId::new(5, 0).within(5, 8),
            Err(SeatError::OutOfGrid {
                row: 5,
                col: 0,
                rows: 5,
                cols: 8
            })
        );
        assert!(SeatId::new(0, 8).within(5, 8).is_err());
    }
}
