//! Extracting the newly listed asset from a pool output.

use crate::domain::{AssetUnit, Output};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The pool output carries no asset with quantity above one, so there is
    /// no paired token to buy.
    #[error("pool output has no asset with quantity > 1 ({asset_count} assets)")]
    NoListedAsset { asset_count: usize },
}

/// Return the canonical unit of the pool's paired token.
///
/// The NFT marker and housekeeping tokens have quantity 1; the listed token
/// is the first asset, in output order, with a larger quantity.
pub fn extract_listed_asset(output: &Output) -> Result<AssetUnit, ClassificationError> {
    output
        .assets
        .iter()
        .find(|(_, quantity)| *quantity > 1)
        .map(|(asset, _)| asset.to_unit())
        .ok_or(ClassificationError::NoListedAsset {
            asset_count: output.assets.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetId, Lovelace};

    const NFT: &str = "0be55d262b29f564998ff81efe21bdc0022621c12f15af08d0f2ddb1";
    const TOKEN: &str = "a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235";
    const OTHER: &str = "c0ee29a85b13209423b10447d3c2e6a50641a15c57770e27cb9d5073";

    #[test]
    fn test_extracts_first_asset_above_one() {
        let output = Output::new(
            Lovelace::new(5_000_000_000),
            vec![
                (AssetId::from_parts(NFT, "01"), 1),
                (AssetId::from_parts(TOKEN, "5350494359"), 42),
                (AssetId::from_parts(OTHER, "77"), 99),
            ],
        );
        let unit = extract_listed_asset(&output).unwrap();
        assert_eq!(unit.as_str(), format!("{}5350494359", TOKEN));
    }

    #[test]
    fn test_quantity_one_is_not_listed_asset() {
        let output = Output::new(
            Lovelace::new(5_000_000_000),
            vec![
                (AssetId::from_parts(NFT, "01"), 1),
                (AssetId::from_parts(TOKEN, "02"), 1),
                (AssetId::from_parts(OTHER, "03"), 1),
            ],
        );
        assert_eq!(
            extract_listed_asset(&output),
            Err(ClassificationError::NoListedAsset { asset_count: 3 })
        );
    }

    #[test]
    fn test_error_message() {
        let err = ClassificationError::NoListedAsset { asset_count: 3 };
        assert_eq!(
            err.to_string(),
            "pool output has no asset with quantity > 1 (3 assets)"
        );
    }
}
