//! Asset data model and its stored byte encoding

use crate::error::{LedgerError, Result};

/// A dealer account as stored in world state. The asset id is the state
/// key and is not part of the encoded value.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub dealer_id: String,
    pub msisdn: String,
    pub mpin: String,
    pub balance: f64,
    pub status: String,
    pub trans_amount: f64,
    pub trans_type: String,
    pub remarks: String,
}

impl Asset {
    /// Encode to the JSON byte form written to the store.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored value. Fails if the bytes are not a well-formed
    /// asset record (missing fields, wrong types).
    pub fn from_bytes(bytes: &[u8]) -> Result<Asset> {
        serde_json::from_slice(bytes)
            .map_err(|e| LedgerError::Serialization(format!("Failed to decode asset: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asset() -> Asset {
        Asset {
            dealer_id: "D001".to_string(),
            msisdn: "9999999999".to_string(),
            mpin: "1234".to_string(),
            balance: 5000.0,
            status: "ACTIVE".to_string(),
            trans_amount: 0.0,
            trans_type: "INIT".to_string(),
            remarks: "Created".to_string(),
        }
    }

    #[test]
    fn test_round_trip() {
        let asset = sample_asset();
        let bytes = asset.to_bytes().unwrap();
        let decoded = Asset::from_bytes(&bytes).unwrap();
        assert_eq!(asset, decoded);
    }

    #[test]
    fn test_round_trip_boundary_values() {
        let asset = Asset {
            dealer_id: "D002".to_string(),
            msisdn: String::new(),
            mpin: "0000".to_string(),
            balance: 0.0,
            status: "SUSPENDED".to_string(),
            trans_amount: -250.75,
            trans_type: "REFUND".to_string(),
            remarks: String::new(),
        };
        let decoded = Asset::from_bytes(&asset.to_bytes().unwrap()).unwrap();
        assert_eq!(asset, decoded);
    }

    #[test]
    fn test_wire_field_names() {
        let json: serde_json::Value =
            serde_json::from_slice(&sample_asset().to_bytes().unwrap()).unwrap();
        assert_eq!(json["dealerId"], "D001");
        assert_eq!(json["transAmount"], 0.0);
        assert_eq!(json["transType"], "INIT");
        assert_eq!(json["balance"], 5000.0);
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(Asset::from_bytes(b"not json").is_err());
        // Wrong type for balance
        let bad = br#"{"dealerId":"D1","msisdn":"1","mpin":"1","balance":"lots","status":"A","transAmount":0,"transType":"INIT","remarks":""}"#;
        match Asset::from_bytes(bad) {
            Err(LedgerError::Serialization(_)) => {}
            other => panic!("Expected Serialization error, got {:?}", other),
        }
    }
}
