//! Domain primitives: AssetId, PairId, Fingerprint, Token, Pair.

use serde::{Deserialize, Serialize};

/// Asset id of the native coin in offer summaries and token lists.
pub const NATIVE_ASSET_ID: &str = "xch";

/// Asset identifier (CAT tail hash, or `xch` for the native coin).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    pub fn native() -> Self {
        AssetId(NATIVE_ASSET_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        self.0 == NATIVE_ASSET_ID
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pool identifier (the pair's launcher id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairId(pub String);

impl PairId {
    pub fn new(id: impl Into<String>) -> Self {
        PairId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wallet key fingerprint used to log in to a specific wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u32);

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A listed fungible asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub asset_id: AssetId,
    pub symbol: String,
    pub display_name: String,
    pub verified: bool,
}

impl Token {
    /// The native coin pseudo-token. Always verified.
    pub fn native() -> Self {
        Token {
            asset_id: AssetId::native(),
            symbol: NATIVE_ASSET_ID.to_string(),
            display_name: NATIVE_ASSET_ID.to_string(),
            verified: true,
        }
    }
}

/// A liquidity pool of one token against the native coin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub pair_id: PairId,
    pub token: Token,
    pub liquidity_token_id: AssetId,
}

impl Pair {
    pub fn new(pair_id: PairId, token: Token, liquidity_token_id: AssetId) -> Self {
        Pair {
            pair_id,
            token,
            liquidity_token_id,
        }
    }

    /// Human-readable pool name, e.g. `TIBET-DBX-XCH`.
    pub fn display_name(&self) -> String {
        format!("TIBET-{}-XCH", self.token.symbol)
    }

    /// Case-insensitive match against the pool token's symbol.
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.token.symbol.eq_ignore_ascii_case(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dbx_pair() -> Pair {
        Pair::new(
            PairId::new("pair-dbx"),
            Token {
                asset_id: AssetId::new("db1a9020"),
                symbol: "DBX".to_string(),
                display_name: "dexie bucks".to_string(),
                verified: true,
            },
            AssetId::new("lp-dbx"),
        )
    }

    #[test]
    fn test_native_asset_id() {
        assert!(AssetId::native().is_native());
        assert!(!AssetId::new("db1a9020").is_native());
        assert!(Token::native().verified);
    }

    #[test]
    fn test_pair_display_name() {
        assert_eq!(dbx_pair().display_name(), "TIBET-DBX-XCH");
    }

    #[test]
    fn test_pair_matches_symbol_ignores_case() {
        let pair = dbx_pair();
        assert!(pair.matches_symbol("dbx"));
        assert!(pair.matches_symbol("DBX"));
        assert!(!pair.matches_symbol("SBX"));
    }

    #[test]
    fn test_fingerprint_display() {
        assert_eq!(Fingerprint(3_141_592).to_string(), "3141592");
    }
}
