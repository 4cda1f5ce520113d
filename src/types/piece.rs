//! Piece requests, built from command line flags or a JSON file.
use super::abi::PieceInfo;
use crate::{constants::DEFAULT_EXPIRATION_OFFSET, error::InputError};
use alloy::primitives::{Address, Bytes};
use cid::Cid;
use serde::Deserialize;
use std::{path::Path, str::FromStr};

/// A piece to be allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceRequest {
    /// Binary form of the piece CID.
    pub piece_cid: Bytes,
    /// Padded piece size in bytes.
    pub size: u64,
    /// Storage provider actor id.
    pub provider: u64,
    /// Minimum term in epochs.
    pub term_min: i64,
    /// Maximum term in epochs.
    pub term_max: i64,
    /// Epochs from now after which the allocation expires if unclaimed.
    pub expiration_offset: i64,
    /// Where the provider can fetch the piece from.
    pub download_url: String,
    /// Token used to pay for the piece. Zero for the native token.
    pub payment_token: Address,
}

impl From<&PieceRequest> for PieceInfo {
    fn from(piece: &PieceRequest) -> Self {
        Self {
            pieceCid: piece.piece_cid.clone(),
            size: piece.size,
            provider: piece.provider,
            termMin: piece.term_min,
            termMax: piece.term_max,
            expirationOffset: piece.expiration_offset,
            downloadURL: piece.download_url.clone(),
            paymentTokenAddress: piece.payment_token,
        }
    }
}

/// Decodes a textual CID into its binary form.
pub fn parse_piece_cid(cid: &str) -> Result<Bytes, InputError> {
    Cid::try_from(cid)
        .map(|parsed| parsed.to_bytes().into())
        .map_err(|source| InputError::InvalidCid { cid: cid.to_string(), source })
}

/// A piece entry of an input file. The CID is kept in its textual form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PieceEntry {
    piece_cid: String,
    size: u64,
    provider: u64,
    term_min: i64,
    #[serde(default)]
    term_max: i64,
    #[serde(default = "default_expiration_offset")]
    expiration_offset: i64,
    #[serde(default, rename = "downloadURL")]
    download_url: String,
    #[serde(default)]
    payment_token_address: String,
}

fn default_expiration_offset() -> i64 {
    DEFAULT_EXPIRATION_OFFSET
}

/// Parses a JSON array of pieces.
///
/// Pieces without a `paymentTokenAddress` fall back to `default_token`.
pub fn pieces_from_json(
    json: &str,
    default_token: Option<Address>,
) -> Result<Vec<PieceRequest>, InputError> {
    let entries: Vec<PieceEntry> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let payment_token = if entry.payment_token_address.is_empty() {
                default_token.ok_or(InputError::MissingPaymentToken(idx + 1))?
            } else {
                Address::from_str(&entry.payment_token_address)
                    .map_err(|_| InputError::InvalidAddress(entry.payment_token_address.clone()))?
            };

            Ok(PieceRequest {
                piece_cid: parse_piece_cid(&entry.piece_cid)?,
                size: entry.size,
                provider: entry.provider,
                term_min: entry.term_min,
                term_max: entry.term_max,
                expiration_offset: entry.expiration_offset,
                download_url: entry.download_url,
                payment_token,
            })
        })
        .collect()
}

/// Reads and parses a JSON piece file.
pub fn load_pieces_file(
    path: &Path,
    default_token: Option<Address>,
) -> Result<Vec<PieceRequest>, InputError> {
    let json = std::fs::read_to_string(path)
        .map_err(|source| InputError::Io { path: path.display().to_string(), source })?;
    pieces_from_json(&json, default_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    #[test]
    fn cid_to_bytes() {
        let bytes = parse_piece_cid(CID_V0).unwrap();
        // sha2-256 multihash
        assert_eq!(bytes.len(), 34);
        assert_eq!(&bytes[..2], &[0x12, 0x20]);

        assert!(matches!(parse_piece_cid("not-a-cid"), Err(InputError::InvalidCid { .. })));
    }

    #[test]
    fn parse_file_entries() {
        let token = Address::with_last_byte(0xaa);
        let json = format!(
            r#"[
                {{
                    "pieceCid": "{CID_V0}",
                    "size": 2048,
                    "provider": 17,
                    "termMin": 518400,
                    "termMax": 5256000,
                    "expirationOffset": 1000,
                    "downloadURL": "https://example.com/piece.car",
                    "paymentTokenAddress": "{token}"
                }},
                {{
                    "pieceCid": "{CID_V0}",
                    "size": 4096,
                    "provider": 18,
                    "termMin": 86400
                }}
            ]"#
        );

        let default_token = Address::with_last_byte(0xbb);
        let pieces = pieces_from_json(&json, Some(default_token)).unwrap();
        assert_eq!(pieces.len(), 2);

        assert_eq!(pieces[0].payment_token, token);
        assert_eq!(pieces[0].download_url, "https://example.com/piece.car");
        assert_eq!(pieces[0].expiration_offset, 1000);

        assert_eq!(pieces[1].payment_token, default_token);
        assert_eq!(pieces[1].expiration_offset, DEFAULT_EXPIRATION_OFFSET);
        assert_eq!(pieces[1].term_max, 0);

        let info = PieceInfo::from(&pieces[0]);
        assert_eq!(info.size, 2048);
        assert_eq!(info.provider, 17);
        assert_eq!(info.paymentTokenAddress, token);
    }

    #[test]
    fn missing_token_names_piece() {
        let json = format!(r#"[{{"pieceCid": "{CID_V0}", "size": 1, "provider": 1, "termMin": 1}}]"#);
        let err = pieces_from_json(&json, None).unwrap_err();
        assert!(matches!(err, InputError::MissingPaymentToken(1)));
    }
}
