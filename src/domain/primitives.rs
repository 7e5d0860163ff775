//! Domain primitives: TxId, TxHash, AssetId, AssetUnit, Lovelace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Separator between the policy id and the asset name in a composite asset id.
pub const ASSET_ID_SEPARATOR: char = '.';

/// Number of lovelace in one ADA.
pub const LOVELACE_PER_ADA: u64 = 1_000_000;

/// Ledger transaction identifier as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxId(pub String);

impl TxId {
    /// Create a TxId from a string.
    pub fn new(id: String) -> Self {
        TxId(id)
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash of a transaction we submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: String) -> Self {
        TxHash(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite native-asset identifier: `policyId.assetName`.
///
/// Assets without a name are delivered as the bare policy id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    /// Create an AssetId from its composite string.
    pub fn new(id: String) -> Self {
        AssetId(id)
    }

    /// Build the composite id from its two components.
    pub fn from_parts(policy_id: &str, asset_name: &str) -> Self {
        AssetId(format!("{}{}{}", policy_id, ASSET_ID_SEPARATOR, asset_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The issuer prefix: everything before the first separator.
    pub fn policy_id(&self) -> &str {
        self.0
            .split_once(ASSET_ID_SEPARATOR)
            .map(|(policy, _)| policy)
            .unwrap_or(&self.0)
    }

    /// Canonical trading identifier with the separator removed.
    pub fn to_unit(&self) -> AssetUnit {
        AssetUnit(self.0.replacen(ASSET_ID_SEPARATOR, "", 1))
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical asset identifier (`policyId ++ assetName`), the key we trade by.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetUnit(pub String);

impl AssetUnit {
    pub fn new(unit: String) -> Self {
        AssetUnit(unit)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex asset name: the characters after a policy id of `policy_id_len` characters.
    ///
    /// Units shorter than the policy id have an empty name.
    pub fn asset_name_hex(&self, policy_id_len: usize) -> &str {
        self.0.get(policy_id_len..).unwrap_or("")
    }

    /// Human readable asset name, if the hex name decodes to UTF-8.
    pub fn ticker(&self, policy_id_len: usize) -> Option<String> {
        hex::decode(self.asset_name_hex(policy_id_len))
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .filter(|name| !name.is_empty())
    }
}

impl std::fmt::Display for AssetUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount of the base currency in its smallest unit.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Lovelace(pub u64);

impl Lovelace {
    pub fn new(amount: u64) -> Self {
        Lovelace(amount)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Amount expressed in whole ADA, without rounding.
    pub fn as_ada(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(LOVELACE_PER_ADA)
    }
}

impl std::fmt::Display for Lovelace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ADA", self.as_ada().normalize())
    }
}
