//! Snapshots of allocation contract state.
use super::abi::{IDDO, RailView, TokenConfig};
use alloy::primitives::{Address, U256};
use serde::Serialize;

/// Registration parameters of a storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpConfig {
    pub payment_address: Address,
    pub min_piece_size: u64,
    pub max_piece_size: u64,
    pub min_term_length: i64,
    pub max_term_length: i64,
    pub is_active: bool,
}

impl SpConfig {
    /// Unregistered providers read back with a zero payment address.
    pub fn is_registered(&self) -> bool {
        !self.payment_address.is_zero()
    }
}

impl From<IDDO::spConfigsReturn> for SpConfig {
    fn from(ret: IDDO::spConfigsReturn) -> Self {
        Self {
            payment_address: ret.paymentAddress,
            min_piece_size: ret.minPieceSize,
            max_piece_size: ret.maxPieceSize,
            min_term_length: ret.minTermLength,
            max_term_length: ret.maxTermLength,
            is_active: ret.isActive,
        }
    }
}

/// Condensed provider info returned by `getSPBasicInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpBasicInfo {
    pub payment_address: Address,
    pub is_active: bool,
    pub supported_token_count: U256,
    pub min_piece_size: u64,
    pub max_piece_size: u64,
}

impl From<IDDO::getSPBasicInfoReturn> for SpBasicInfo {
    fn from(ret: IDDO::getSPBasicInfoReturn) -> Self {
        Self {
            payment_address: ret.paymentAddress,
            is_active: ret.isActive,
            supported_token_count: ret.supportedTokenCount,
            min_piece_size: ret.minPieceSize,
            max_piece_size: ret.maxPieceSize,
        }
    }
}

/// Parameters for `registerSP`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpRegistration {
    pub actor_id: u64,
    pub config: SpConfig,
    pub tokens: Vec<TokenConfig>,
}

/// The rail backing an allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRail {
    pub rail_id: U256,
    pub provider_id: u64,
    pub rail: RailView,
}

impl From<IDDO::getAllocationRailInfoReturn> for AllocationRail {
    fn from(ret: IDDO::getAllocationRailInfoReturn) -> Self {
        Self { rail_id: ret.railId, provider_id: ret.providerId, rail: ret.railView }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_payment_address_is_unregistered() {
        let mut config = SpConfig {
            payment_address: Address::ZERO,
            min_piece_size: 128,
            max_piece_size: 1 << 35,
            min_term_length: 86_400,
            max_term_length: 5_256_000,
            is_active: false,
        };
        assert!(!config.is_registered());

        config.payment_address = Address::with_last_byte(1);
        assert!(config.is_registered());
    }
}
