use serde::{Deserialize, Serialize};

use crate::errors::BarqError;
use crate::utils::reverse_complement;

///
/// One row of the barcode design table: the target (gene/construct) a
/// synthetic barcode identifies, the barcode sequence, and its reverse
/// complement.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeRecord {
    pub target: String,
    pub barcode: String,
    pub revcomp: String,
}

impl BarcodeRecord {
    /// Build a record from a raw (target, barcode) pair, deriving the
    /// reverse complement.
    pub fn new(target: String, barcode: String) -> Result<Self, BarqError> {
        let revcomp = reverse_complement(&barcode)?;

        Ok(Self {
            target,
            barcode,
            revcomp,
        })
    }

    /// Rebuild a record from a previously augmented table row. The stored
    /// reverse complement must agree with the barcode.
    pub fn from_augmented(
        target: String,
        barcode: String,
        revcomp: String,
    ) -> Result<Self, BarqError> {
        if reverse_complement(&barcode)? != revcomp {
            return Err(BarqError::StoredRevcompMismatch(target));
        }

        Ok(Self {
            target,
            barcode,
            revcomp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_new_derives_revcomp() {
        let record = BarcodeRecord::new("GeneA".to_string(), "ACGTACGTA".to_string()).unwrap();
        assert_eq!(record.revcomp, "TACGTACGT");
    }

    #[rstest]
    fn test_new_rejects_invalid_barcode() {
        let record = BarcodeRecord::new("GeneA".to_string(), "ACGTN".to_string());
        assert!(record.is_err());
    }

    #[rstest]
    fn test_from_augmented_validates_stored_revcomp() {
        let record = BarcodeRecord::from_augmented(
            "GeneA".to_string(),
            "ACGTACGTA".to_string(),
            "AAAAAAAAA".to_string(),
        );
        match record {
            Err(BarqError::StoredRevcompMismatch(target)) => assert_eq!(target, "GeneA"),
            _ => panic!("expected a StoredRevcompMismatch error"),
        }
    }
}
