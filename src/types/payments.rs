//! Snapshots of payments contract state.
use super::abi::IPayments;
use alloy::primitives::{Address, U256};
use serde::Serialize;

/// Funds held by an owner for one token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Total deposited funds.
    pub funds: U256,
    /// Funds currently locked by rails.
    pub lockup_current: U256,
    /// Rate at which lockup accrues per epoch.
    pub lockup_rate: U256,
    /// Epoch up to which lockup was last settled.
    pub lockup_last_settled_at: U256,
}

impl Account {
    /// Funds that are not locked.
    pub fn available(&self) -> U256 {
        self.funds.saturating_sub(self.lockup_current)
    }
}

impl From<IPayments::accountsReturn> for Account {
    fn from(ret: IPayments::accountsReturn) -> Self {
        Self {
            funds: ret.funds,
            lockup_current: ret.lockupCurrent,
            lockup_rate: ret.lockupRate,
            lockup_last_settled_at: ret.lockupLastSettledAt,
        }
    }
}

/// What an operator may spend or lock on behalf of a client for one token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorApproval {
    /// Whether the operator is approved at all.
    pub is_approved: bool,
    /// Ceiling on the summed payment rate of the operator's rails.
    pub rate_allowance: U256,
    /// Ceiling on the summed lockup of the operator's rails.
    pub lockup_allowance: U256,
    /// Rate already in use.
    pub rate_usage: U256,
    /// Lockup already in use.
    pub lockup_usage: U256,
    /// Longest lockup period the operator may set.
    pub max_lockup_period: U256,
}

impl OperatorApproval {
    /// Rate allowance not yet in use.
    pub fn rate_headroom(&self) -> U256 {
        self.rate_allowance.saturating_sub(self.rate_usage)
    }

    /// Lockup allowance not yet in use.
    pub fn lockup_headroom(&self) -> U256 {
        self.lockup_allowance.saturating_sub(self.lockup_usage)
    }
}

impl From<IPayments::operatorApprovalsReturn> for OperatorApproval {
    fn from(ret: IPayments::operatorApprovalsReturn) -> Self {
        Self {
            is_approved: ret.isApproved,
            rate_allowance: ret.rateAllowance,
            lockup_allowance: ret.lockupAllowance,
            rate_usage: ret.rateUsage,
            lockup_usage: ret.lockupUsage,
            max_lockup_period: ret.maxLockupPeriod,
        }
    }
}

/// Account state projected as if all rails were settled now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettledAccountInfo {
    pub funded_until_epoch: U256,
    pub current_funds: U256,
    pub available_funds: U256,
    pub current_lockup_rate: U256,
}

impl From<IPayments::getAccountInfoIfSettledReturn> for SettledAccountInfo {
    fn from(ret: IPayments::getAccountInfoIfSettledReturn) -> Self {
        Self {
            funded_until_epoch: ret.fundedUntilEpoch,
            current_funds: ret.currentFunds,
            available_funds: ret.availableFunds,
            current_lockup_rate: ret.currentLockupRate,
        }
    }
}

/// Fees accumulated by the payments contract, per token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedFees {
    pub fees: Vec<(Address, U256)>,
    pub count: U256,
}

impl From<IPayments::getAllAccumulatedFeesReturn> for AccumulatedFees {
    fn from(ret: IPayments::getAllAccumulatedFeesReturn) -> Self {
        Self { fees: ret.tokens.into_iter().zip(ret.amounts).collect(), count: ret.count }
    }
}
