//! Utility functions for identifiers

use bech32::Bech32m;
use uuid7::uuid7;

pub const ORDER_HRP: &str = "order_";

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Order references shown on the confirmation banner
pub fn new_order_ref() -> anyhow::Result<String> {
    new_uuid_to_bech32(ORDER_HRP)
}
