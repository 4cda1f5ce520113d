//! Client constants.

use std::time::Duration;

/// Number of epochs in a month, as used by the allocation contract.
pub const EPOCHS_PER_MONTH: u64 = 86_400;

/// Number of epochs in a day.
pub const EPOCHS_PER_DAY: u64 = 2_880;

/// Number of bytes in a (binary) terabyte.
pub const BYTES_PER_TB: u64 = 1024 * 1024 * 1024 * 1024;

/// Decimals assumed for USD-denominated token prices.
pub const USD_DECIMALS: u8 = 18;

/// Default JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// Default expiration offset for new allocations, in epochs.
pub const DEFAULT_EXPIRATION_OFFSET: i64 = 172_800;

/// How long to wait for a submitted transaction to be mined.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Max lockup period applied by `payments set-operator-allowance --unlimited`.
///
/// One year of epochs at 30s block time.
pub const UNLIMITED_MAX_LOCKUP_PERIOD: u64 = 525_600;
