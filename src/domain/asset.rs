//! The fixed three-asset universe.

use super::error::PortfolioError;
use std::fmt;
use std::str::FromStr;

/// One of the three tracked assets. Discriminants are the column slots used by
/// every per-asset array in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Asset {
    Btc = 0,
    Eth = 1,
    Gold = 2,
}

/// Number of assets in the universe.
pub const ASSET_COUNT: usize = 3;

/// A value per asset, indexed by [`Asset::index`].
pub type AssetVector = [f64; ASSET_COUNT];

impl Asset {
    /// Column order.
    pub const ALL: [Asset; ASSET_COUNT] = [Asset::Btc, Asset::Eth, Asset::Gold];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Gold => "GOLD",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" => Ok(Asset::Btc),
            "ETH" => Ok(Asset::Eth),
            "GOLD" => Ok(Asset::Gold),
            _ => Err(PortfolioError::UnknownSymbol {
                symbol: s.to_string(),
            }),
        }
    }
}
