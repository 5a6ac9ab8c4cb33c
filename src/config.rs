//! Venue configuration: grid size, pricing and banner timing
use anyhow::Context;
use chrono::TimeDelta;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_ROWS: u32 = 5;
pub const DEFAULT_COLS: u32 = 8;
pub const DEFAULT_UNIT_PRICE: u64 = 50_000;
pub const DEFAULT_BANNER_TTL_SECS: i64 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueConfig {
    pub rows: u32,
    pub cols: u32,
    pub unit_price: u64, // integer currency units per seat
    pub banner_ttl: TimeDelta,
    // None keeps the snapshot in memory only
    pub snapshot_path: Option<PathBuf>,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            unit_price: DEFAULT_UNIT_PRICE,
            banner_ttl: TimeDelta::seconds(DEFAULT_BANNER_TTL_SECS),
            snapshot_path: None,
        }
    }
}

impl VenueConfig {
    pub fn new(rows: u32, cols: u32, unit_price: u64) -> Self {
        Self {
            rows,
            cols,
            unit_price,
            ..Self::default()
        }
    }

    /// Overlays `SEAT_ROWS`, `SEAT_COLS`, `SEAT_PRICE`, `BANNER_TTL_SECS` and
    /// `SEAT_SNAPSHOT_PATH` on top of the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let ttl_secs = env_or("BANNER_TTL_SECS", DEFAULT_BANNER_TTL_SECS)?;
        let banner_ttl = TimeDelta::try_seconds(ttl_secs)
            .with_context(|| format!("BANNER_TTL_SECS out of range: {ttl_secs}"))?;

        let config = Self {
            rows: env_or("SEAT_ROWS", defaults.rows)?,
            cols: env_or("SEAT_COLS", defaults.cols)?,
            unit_price: env_or("SEAT_PRICE", defaults.unit_price)?,
            banner_ttl,
            snapshot_path: env::var_os("SEAT_SNAPSHOT_PATH").map(PathBuf::from),
        };
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rows == 0 || self.cols == 0 {
            anyhow::bail!("Seat grid must be non-empty, got {}x{}", self.rows, self.cols);
        }
        if self.capacity().checked_mul(self.unit_price).is_none() {
            anyhow::bail!(
                "Seat price {} overflows the total for a full {}x{} hall",
                self.unit_price,
                self.rows,
                self.cols
            );
        }
        if self.banner_ttl < TimeDelta::zero() {
            anyhow::bail!("Banner TTL must not be negative");
        }
        Ok(())
    }

    pub fn capacity(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}
