//! Conversions between USD-per-TB-per-month prices and the contract's per-byte-per-epoch rates.
//!
//! The forward conversion floors, so a price converted to a rate and back can come out slightly
//! lower than the original.
use crate::{
    constants::{BYTES_PER_TB, EPOCHS_PER_MONTH, USD_DECIMALS},
    error::InputError,
};
use alloy::primitives::{U256, utils::parse_units};

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Number of byte-epochs in one TB-month.
fn tb_month() -> U256 {
    U256::from(BYTES_PER_TB) * U256::from(EPOCHS_PER_MONTH)
}

/// Converts a USD-per-TB-per-month price into token units per byte per epoch.
///
/// The price is scaled by `10^18`; fractional digits beyond that are dropped.
pub fn usd_per_tb_per_month_to_bytes_per_epoch(usd: &str) -> Result<U256, InputError> {
    let invalid = || InputError::InvalidPriceFormat(usd.to_string());

    let trimmed = usd.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(invalid());
    }

    let truncated = match trimmed.split_once('.') {
        Some((_, fraction)) if !fraction.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(invalid());
        }
        Some((whole, fraction)) if fraction.len() > USD_DECIMALS as usize => {
            format!("{whole}.{}", &fraction[..USD_DECIMALS as usize])
        }
        _ => trimmed.to_string(),
    };

    let scaled = parse_units(&truncated, USD_DECIMALS).map_err(|_| invalid())?;
    let scaled = U256::try_from(scaled).map_err(|_| invalid())?;

    Ok(scaled / tb_month())
}

/// Converts token units per byte per epoch back into USD per TB per month, with two decimals.
pub fn bytes_per_epoch_to_usd_per_tb_per_month(units: U256) -> String {
    let scaled = units.saturating_mul(tb_month());
    let cent = U256::from(10).pow(U256::from(USD_DECIMALS - 2));
    // round half up to the cent
    let cents = scaled.saturating_add(cent / U256::from(2)) / cent;
    let (dollars, rem) = cents.div_rem(U256::from(100));
    format!("{dollars}.{:02}", rem.as_limbs()[0])
}

/// Formats a rate in both the USD and the raw representation.
pub fn format_price(units: U256) -> String {
    format!(
        "${} USD per TB per month ({units} token units per byte per epoch)",
        bytes_per_epoch_to_usd_per_tb_per_month(units)
    )
}

/// Formats a byte count with binary units, e.g. `1.50 KB`.
pub fn format_bytes(bytes: U256) -> String {
    if bytes < U256::from(1024) {
        return format!("{bytes} B");
    }

    let mut value = f64::from(bytes);
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.2} {}", BYTE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes() {
        assert_eq!(format_bytes(U256::ZERO), "0 B");
        assert_eq!(format_bytes(U256::from(1023)), "1023 B");
        assert_eq!(format_bytes(U256::from(1024)), "1.00 KB");
        assert_eq!(format_bytes(U256::from(1536)), "1.50 KB");
        assert_eq!(format_bytes(U256::from(BYTES_PER_TB)), "1.00 TB");
        assert_eq!(format_bytes(U256::from(BYTES_PER_TB) * U256::from(1024 * 1024)), "1024.00 PB");
    }

    #[test]
    fn usd_to_rate() {
        // 10.50e18 / (1024^4 * 86400) = 110.53..
        assert_eq!(usd_per_tb_per_month_to_bytes_per_epoch("10.50").unwrap(), U256::from(110));
        assert_eq!(usd_per_tb_per_month_to_bytes_per_epoch("0").unwrap(), U256::ZERO);
        assert_eq!(
            usd_per_tb_per_month_to_bytes_per_epoch("0.0000000000000000019").unwrap(),
            U256::ZERO
        );

        for bad in ["", "abc", "-1", "1,5", "1.00000000000000000é", "1.5x"] {
            assert!(
                matches!(
                    usd_per_tb_per_month_to_bytes_per_epoch(bad),
                    Err(InputError::InvalidPriceFormat(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rate_to_usd() {
        assert_eq!(bytes_per_epoch_to_usd_per_tb_per_month(U256::ZERO), "0.00");
        // 110 * 1024^4 * 86400 = 10.4497..e18
        assert_eq!(bytes_per_epoch_to_usd_per_tb_per_month(U256::from(110)), "10.45");
    }

    #[test]
    fn round_trip_is_within_one_rate_unit() {
        for usd in ["10.50", "1", "0.25", "123.456", "5000"] {
            let rate = usd_per_tb_per_month_to_bytes_per_epoch(usd).unwrap();
            let scaled = U256::try_from(parse_units(usd, USD_DECIMALS).unwrap()).unwrap();

            let back = rate * tb_month();
            assert!(back <= scaled, "{usd}: conversion must floor");
            assert!(scaled - back < tb_month(), "{usd}: lost more than one rate unit");
        }
    }

    #[test]
    fn price_both_formats() {
        assert_eq!(
            format_price(U256::from(110)),
            "$10.45 USD per TB per month (110 token units per byte per epoch)"
        );
    }
}
