//! Confirmation banner shown after a successful purchase
use super::seat::SeatId;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(TimeStamp)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
    pub fn after(&self, delta: TimeDelta) -> Self {
        Self(self.0 + delta)
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

/// Receipt for one committed order. Purely cosmetic once issued: dismissing it
/// never touches seat state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub order_ref: String, // bech32 encoded uuid7
    pub seats: Vec<SeatId>,
    pub amount: u64,
    pub issued_at: TimeStamp<Utc>,
    pub ttl: TimeDelta,
}

impl Confirmation {
    pub fn new(
        order_ref: String,
        seats: Vec<SeatId>,
        amount: u64,
        issued_at: TimeStamp<Utc>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            order_ref,
            seats,
            amount,
            issued_at,
            ttl,
        }
    }

    pub fn expires_at(&self) -> TimeStamp<Utc> {
        self.issued_at.after(self.ttl)
    }

    /// Visible from issue until the TTL has elapsed
    pub fn is_visible_at(&self, now: &TimeStamp<Utc>) -> bool {
        let now = now.to_datetime_utc();
        now >= self.issued_at.to_datetime_utc() && now < self.expires_at().to_datetime_utc()
    }

    pub fn message(&self) -> String {
        let seats: Vec<String> = self.seats.iter().map(SeatId::key).collect();
        format!(
            "Order {} confirmed: {} seat(s) [{}], total {}",
            self.order_ref,
            self.seats.len(),
            seats.join(", "),
            self.amount
        )
    }
}
