use thiserror::Error;

/// Errors raised while validating local input, before any network call.
#[derive(Debug, Error)]
pub enum InputError {
    /// A USD price is not a valid non-negative decimal.
    #[error("invalid price format: {0:?}")]
    InvalidPriceFormat(String),
    /// A piece CID could not be decoded.
    #[error("invalid piece CID {cid:?}")]
    InvalidCid {
        /// The rejected input.
        cid: String,
        /// The decoding error.
        #[source]
        source: cid::Error,
    },
    /// An address could not be parsed.
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),
    /// A piece has no payment token, neither in the file nor on the command line.
    #[error("payment token address required for piece {0}")]
    MissingPaymentToken(usize),
    /// Neither an input file nor a piece CID was provided.
    #[error("either --input-file or --piece-cid must be provided")]
    MissingPieceSource,
    /// A `--tokens` entry is not of the form `address:price`.
    #[error("invalid token format {0:?}, expected 'address:priceUSDPerTBPerMonth'")]
    InvalidTokenSpec(String),
    /// No token configuration was provided for registration.
    #[error("at least one token configuration is required")]
    NoTokens,
    /// A min/max pair is empty or inverted.
    #[error("invalid {what} range: min={min}, max={max}")]
    InvalidRange {
        /// Which range was rejected.
        what: &'static str,
        /// Lower bound.
        min: i128,
        /// Upper bound.
        max: i128,
    },
    /// An input file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// An input file is not valid JSON for its schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
