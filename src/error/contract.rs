use alloy::sol_types::SolInterface;
use core::fmt;
use thiserror::Error;

/// Errors related to contract calls.
#[derive(Debug, Error)]
pub enum ContractError {
    /// A write call was attempted without a signing key.
    #[error("{call} requires a signing key (set PRIVATE_KEY or --private-key)")]
    UnauthorizedForWrite {
        /// The contract function.
        call: &'static str,
    },
    /// The call returned data that does not match the function's ABI.
    #[error("malformed response from {call}: expected {expected}, got {actual}")]
    MalformedResponse {
        /// The contract function.
        call: &'static str,
        /// The ABI return shape.
        expected: &'static str,
        /// What could not be decoded.
        actual: String,
    },
    /// The contract reverted with a known custom error.
    #[error("{call} reverted: {reason}")]
    Reverted {
        /// The contract function.
        call: &'static str,
        /// The decoded custom error.
        reason: String,
    },
    /// The call failed on the transport or node side.
    #[error("call to {call} failed")]
    Call {
        /// The contract function.
        call: &'static str,
        /// The underlying error.
        #[source]
        source: alloy::contract::Error,
    },
}

impl ContractError {
    /// Classifies an error returned by a contract call.
    ///
    /// ABI decoding failures become [`ContractError::MalformedResponse`]; everything else is kept
    /// as [`ContractError::Call`].
    pub fn read(call: &'static str, expected: &'static str, err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::AbiError(err) => {
                Self::MalformedResponse { call, expected, actual: err.to_string() }
            }
            alloy::contract::Error::ZeroData(..) => {
                Self::MalformedResponse { call, expected, actual: "empty return data".to_string() }
            }
            source => Self::Call { call, source },
        }
    }

    /// Wraps an error returned while submitting a transaction.
    pub fn write(call: &'static str, source: alloy::contract::Error) -> Self {
        Self::Call { call, source }
    }

    /// Replaces a raw revert with the matching custom error of `E`, if the revert data decodes.
    pub fn with_revert_reason<E: SolInterface + fmt::Debug>(self) -> Self {
        match self {
            Self::Call { call, source } => match source.as_decoded_interface_error::<E>() {
                Some(reason) => Self::Reverted { call, reason: format!("{reason:?}") },
                None => Self::Call { call, source },
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IDDO::IDDOErrors;
    use alloy::{sol_types, transports::TransportErrorKind};

    #[test]
    fn undecodable_return_is_malformed() {
        let err = ContractError::read(
            "getAccount",
            "Account",
            alloy::contract::Error::AbiError(sol_types::Error::Overrun.into()),
        );
        assert!(matches!(
            err,
            ContractError::MalformedResponse { call: "getAccount", expected: "Account", .. }
        ));
    }

    #[test]
    fn empty_return_is_malformed() {
        let err = ContractError::read(
            "balanceOf",
            "uint256",
            alloy::contract::Error::ZeroData(
                "balanceOf".to_string(),
                sol_types::Error::Overrun.into(),
            ),
        );
        match err {
            ContractError::MalformedResponse { call, expected, actual } => {
                assert_eq!((call, expected), ("balanceOf", "uint256"));
                assert_eq!(actual, "empty return data");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn transport_failure_stays_a_call_error() {
        let err = ContractError::read(
            "getSPPrice",
            "uint256",
            alloy::contract::Error::TransportError(TransportErrorKind::custom_str(
                "connection refused",
            )),
        );
        assert!(matches!(err, ContractError::Call { call: "getSPPrice", .. }));
        // no revert data to decode, so the error is left as is
        assert!(matches!(err.with_revert_reason::<IDDOErrors>(), ContractError::Call { .. }));
    }
}
