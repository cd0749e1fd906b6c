use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::types::{read_discriminant, read_object_id, EventKind, RawEventRecord};

/// A raw record whose discriminant has been read and width-normalized
#[derive(Debug, Clone)]
pub struct ParsedRecord<'a> {
    /// The discriminant as found on the record
    pub code: i64,
    /// `None` when the discriminant is outside the closed set we normalize
    pub kind: Option<EventKind>,
    pub object_id: Option<String>,
    pub record: &'a RawEventRecord,
}

impl<'a> ParsedRecord<'a> {
    /// Convenience accessor for a string field on the underlying record
    pub fn str_field(&self, field: &str) -> Option<&'a str> {
        self.record.get(field).and_then(Value::as_str)
    }
}

/// Read the discriminant and identify which normalizer owns this record.
pub fn classify(record: &RawEventRecord) -> Result<ParsedRecord<'_>> {
    let code = read_discriminant(record)?;
    let kind = EventKind::from_code(code);
    let object_id = read_object_id(record);

    debug!(code, kind = ?kind, object_id = ?object_id, "classified record");

    Ok(ParsedRecord {
        code,
        kind,
        object_id,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use serde_json::json;

    #[test]
    fn test_classify_known_kinds() {
        let record = json!({"_id": {"$oid": "abc"}, "code": 551});
        let parsed = classify(&record).unwrap();
        assert_eq!(parsed.kind, Some(EventKind::Earthquake));
        assert_eq!(parsed.object_id.as_deref(), Some("abc"));

        let record = json!({"code": 9611.0, "started_at": "2024/01/01 00:00:00"});
        let parsed = classify(&record).unwrap();
        assert_eq!(parsed.kind, Some(EventKind::FeltReport));
        assert_eq!(parsed.str_field("started_at"), Some("2024/01/01 00:00:00"));
    }

    #[test]
    fn test_classify_unknown_code() {
        let record = json!({"code": 561});
        let parsed = classify(&record).unwrap();
        assert_eq!(parsed.code, 561);
        assert_eq!(parsed.kind, None);
    }

    #[test]
    fn test_classify_missing_code() {
        let record = json!({"time": "2024/01/01 00:00:00"});
        assert!(matches!(classify(&record), Err(NormalizeError::MissingDiscriminant)));
    }
}
