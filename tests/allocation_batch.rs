//! Allocation batch preparation through the public library API: a JSON piece file is loaded,
//! quoted against a pricing backend and summarized the way `allocations create` prints it.
#![allow(missing_docs)]

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use ddo::{
    contracts::StoragePricing,
    cost::calculate_storage_costs,
    error::{ContractError, CostError},
    price::{format_price, usd_per_tb_per_month_to_bytes_per_epoch},
    types::{load_pieces_file, pieces_from_json},
};

const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
const TOKEN: Address = Address::repeat_byte(0xaa);

/// Prices every provider at the same USD rate.
#[derive(Debug)]
struct FlatRate(U256);

#[async_trait]
impl StoragePricing for FlatRate {
    async fn calculate_storage_cost(
        &self,
        _provider: u64,
        _token: Address,
        size: u64,
        term: i64,
    ) -> Result<U256, ContractError> {
        Ok(self.0 * U256::from(size) * U256::from(term))
    }

    async fn sp_price(&self, _provider: u64, _token: Address) -> Result<U256, ContractError> {
        Ok(self.0)
    }
}

fn batch_json() -> String {
    format!(
        r#"[
            {{"pieceCid": "{CID_V0}", "size": 2048, "provider": 1000, "termMin": 518400}},
            {{"pieceCid": "{CID_V0}", "size": 4096, "provider": 1000, "termMin": 518400,
              "termMax": 1036800, "downloadURL": "https://example.com/piece.car"}}
        ]"#
    )
}

#[tokio::test]
async fn quote_json_batch() -> eyre::Result<()> {
    let pieces = pieces_from_json(&batch_json(), Some(TOKEN))?;
    assert!(pieces.iter().all(|piece| piece.payment_token == TOKEN));

    let rate = usd_per_tb_per_month_to_bytes_per_epoch("10.50")?;
    let costs = calculate_storage_costs(&FlatRate(rate), &pieces).await?;

    assert_eq!(costs.total_bytes, 6144);
    assert_eq!(costs.total_epochs, 2 * 518_400);
    assert_eq!(costs.total_cost, rate * U256::from(6144u64 * 518_400));
    assert_eq!(
        format_price(costs.price_per_byte_per_epoch),
        "$10.45 USD per TB per month (110 token units per byte per epoch)"
    );
    Ok(())
}

#[tokio::test]
async fn zero_term_in_file_is_rejected() -> eyre::Result<()> {
    let json = format!(r#"[{{"pieceCid": "{CID_V0}", "size": 1, "provider": 9, "termMin": 0}}]"#);
    let pieces = pieces_from_json(&json, Some(TOKEN))?;

    let err = calculate_storage_costs(&FlatRate(U256::from(1)), &pieces).await.unwrap_err();
    assert!(matches!(err, CostError::InvalidTermLength { provider: 9, term: 0 }));
    Ok(())
}

#[tokio::test]
async fn empty_piece_in_file_is_rejected() -> eyre::Result<()> {
    let json = format!(r#"[{{"pieceCid": "{CID_V0}", "size": 0, "provider": 4, "termMin": 10}}]"#);
    let pieces = pieces_from_json(&json, Some(TOKEN))?;

    let err = calculate_storage_costs(&FlatRate(U256::from(1)), &pieces).await.unwrap_err();
    assert!(matches!(err, CostError::InvalidPieceSize { provider: 4 }));
    Ok(())
}

#[test]
fn load_batch_from_disk() -> eyre::Result<()> {
    let path = std::env::temp_dir().join(format!("ddo-batch-{}.json", std::process::id()));
    std::fs::write(&path, batch_json())?;

    let loaded = load_pieces_file(&path, Some(TOKEN));
    std::fs::remove_file(&path)?;

    assert_eq!(loaded?.len(), 2);
    assert!(load_pieces_file(&path, Some(TOKEN)).is_err());
    Ok(())
}
