use crate::error::{IndexError, IndexResult};

/// Codec for the stored ID sequence.
///
/// An index is a JSON array of strings. A JSON `null` decodes as the empty
/// sequence because that is how an empty index was written by older
/// bootstrap code.
pub struct IndexCodec;

impl IndexCodec {
    /// Encode an ID sequence.
    pub fn encode(ids: &[String]) -> IndexResult<Vec<u8>> {
        serde_json::to_vec(ids).map_err(|e| IndexError::Encode(e.to_string()))
    }

    /// Decode the bytes stored under index `key`.
    pub fn decode(key: &str, bytes: &[u8]) -> IndexResult<Vec<String>> {
        let ids: Option<Vec<String>> =
            serde_json::from_slice(bytes).map_err(|e| IndexError::Decode {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Ok(ids.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_as_json_array() {
        let bytes = IndexCodec::encode(&["a".into(), "b".into()]).unwrap();
        assert_eq!(bytes, br#"["a","b"]"#);
        assert_eq!(IndexCodec::encode(&[]).unwrap(), b"[]");
    }

    #[test]
    fn decode_preserves_order() {
        let ids = IndexCodec::decode("images", br#"["3","1","2"]"#).unwrap();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn null_decodes_as_empty() {
        assert!(IndexCodec::decode("users", b"null").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_string_members() {
        let err = IndexCodec::decode("users", b"[1,2]").unwrap_err();
        assert!(matches!(err, IndexError::Decode { ref key, .. } if key == "users"));
    }

    #[test]
    fn rejects_empty_bytes() {
        assert!(matches!(
            IndexCodec::decode("users", b""),
            Err(IndexError::Decode { .. })
        ));
    }
}
