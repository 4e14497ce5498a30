//! Domain error types.

use super::asset::Asset;
use chrono::NaiveDate;

/// Top-level error type for portfolio-figures.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error("price store error: {reason}")]
    Database { reason: String },

    #[error("price store query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("missing request field {field}")]
    MissingField { field: String },

    #[error("invalid request field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unknown symbol {symbol:?} (expected BTC, ETH or GOLD)")]
    UnknownSymbol { symbol: String },

    #[error("price series is empty")]
    EmptySeries,

    #[error("incomplete universe on {timestamp}: no {asset} price")]
    IncompleteUniverse { timestamp: NaiveDate, asset: Asset },

    #[error("duplicate {asset} price on {timestamp}")]
    DuplicatePrice { timestamp: NaiveDate, asset: Asset },

    #[error("invalid {asset} price on {timestamp}: {price}")]
    InvalidPrice {
        timestamp: NaiveDate,
        asset: Asset,
        price: f64,
    },

    #[error("insufficient history: have {observations} return observations, need {minimum}")]
    InsufficientHistory { observations: usize, minimum: usize },

    #[error("invalid horizon: {years} years (must be positive)")]
    InvalidHorizon { years: f64 },

    #[error("portfolio volatility is zero, sharpe ratio is undefined")]
    ZeroVolatility,

    #[error("covariance matrix is indefinite for these weights (variance {variance})")]
    IndefiniteCovariance { variance: f64 },

    #[error("portfolio value is not positive on {timestamp} (growth {growth})")]
    NonPositiveGrowth { timestamp: NaiveDate, growth: f64 },

    #[error("{figure} is not a finite number")]
    NonFiniteFigure { figure: &'static str },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;

impl PortfolioError {
    /// Errors caused by the price data rather than the caller or the store.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            PortfolioError::UnknownSymbol { .. }
                | PortfolioError::EmptySeries
                | PortfolioError::IncompleteUniverse { .. }
                | PortfolioError::DuplicatePrice { .. }
                | PortfolioError::InvalidPrice { .. }
                | PortfolioError::InsufficientHistory { .. }
        )
    }

    /// Errors raised by the metrics engine when a figure is undefined.
    pub fn is_numeric_error(&self) -> bool {
        matches!(
            self,
            PortfolioError::InvalidHorizon { .. }
                | PortfolioError::ZeroVolatility
                | PortfolioError::IndefiniteCovariance { .. }
                | PortfolioError::NonPositiveGrowth { .. }
                | PortfolioError::NonFiniteFigure { .. }
        )
    }
}

impl From<&PortfolioError> for std::process::ExitCode {
    fn from(err: &PortfolioError) -> Self {
        let code: u8 = match err {
            PortfolioError::Io(_) => 1,
            PortfolioError::ConfigParse { .. }
            | PortfolioError::ConfigMissing { .. }
            | PortfolioError::ConfigInvalid { .. }
            | PortfolioError::MissingField { .. }
            | PortfolioError::InvalidField { .. } => 2,
            PortfolioError::Database { .. } | PortfolioError::DatabaseQuery { .. } => 3,
            e if e.is_data_error() => 5,
            _ => 6,
        };
        std::process::ExitCode::from(code)
    }
}
