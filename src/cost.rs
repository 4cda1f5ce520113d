//! Storage cost calculation for a batch of pieces.
use crate::{contracts::StoragePricing, error::CostError, types::PieceRequest};
use alloy::primitives::U256;
use serde::Serialize;
use tracing::{debug, instrument};

/// Aggregated cost of a batch of pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCostResult {
    /// Sum of the per-piece quotes, in the token's smallest unit.
    pub total_cost: U256,
    /// Price of the first piece's provider and token.
    pub price_per_byte_per_epoch: U256,
    /// Sum of the piece sizes.
    pub total_bytes: u64,
    /// Sum of the minimum terms.
    pub total_epochs: i64,
}

/// Quotes every piece with the allocation contract and sums the results.
///
/// Each piece is quoted on its own, so the total is exactly what the contract will charge. The
/// reported price is the one of the first piece's `(provider, token)` pair; batches mixing
/// providers or tokens with different rates only report that first rate.
#[instrument(skip_all, fields(pieces = pieces.len()))]
pub async fn calculate_storage_costs(
    pricing: &dyn StoragePricing,
    pieces: &[PieceRequest],
) -> Result<StorageCostResult, CostError> {
    let first = pieces.first().ok_or(CostError::NoPiecesProvided)?;

    let mut total_cost = U256::ZERO;
    let mut total_bytes = 0u64;
    let mut total_epochs = 0i64;
    let mut price_per_byte_per_epoch = None;

    if let Some(piece) = pieces.iter().find(|piece| piece.term_min <= 0) {
        return Err(CostError::InvalidTermLength { provider: piece.provider, term: piece.term_min });
    }
    if let Some(piece) = pieces.iter().find(|piece| piece.size == 0) {
        return Err(CostError::InvalidPieceSize { provider: piece.provider });
    }

    for piece in pieces {
        let cost = pricing
            .calculate_storage_cost(piece.provider, piece.payment_token, piece.size, piece.term_min)
            .await
            .map_err(|source| CostError::Quote { provider: piece.provider, source })?;

        if price_per_byte_per_epoch.is_none() {
            let price = pricing
                .sp_price(first.provider, first.payment_token)
                .await
                .map_err(|source| CostError::Price { provider: first.provider, source })?;
            price_per_byte_per_epoch = Some(price);
        }

        debug!(provider = piece.provider, size = piece.size, %cost, "Quoted piece");

        total_cost = total_cost.saturating_add(cost);
        total_bytes = total_bytes.saturating_add(piece.size);
        total_epochs = total_epochs.saturating_add(piece.term_min);
    }

    Ok(StorageCostResult {
        total_cost,
        price_per_byte_per_epoch: price_per_byte_per_epoch.unwrap_or_default(),
        total_bytes,
        total_epochs,
    })
}
