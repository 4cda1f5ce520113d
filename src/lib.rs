//! # DDO client
//!
//! Library for interacting with the DDO allocation and payments contracts: price conversion,
//! storage cost calculation, payment setup and typed contract clients.

pub mod cli;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod contracts;
pub mod cost;
pub mod error;
pub mod payment;
pub mod price;
pub mod session;
pub mod types;
