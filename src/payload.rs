use serde_json::Value;

use crate::{
    error::{Result, SweepError},
    types::Payload,
};

/// Fields the destination API requires on every certificate
///
/// Part of the integration contract: extraction fails when any of these is
/// absent or null in the structured export.
pub const REQUIRED_FIELDS: &[&str] = &["registration_number", "chassis_number", "expiry_date"];

/// Fields forwarded when present but not required
pub const OPTIONAL_FIELDS: &[&str] = &["owner_name", "model", "issued_at"];

/// Extract the normalized payload from a structured file's content
///
/// The content must be a JSON object. Required fields are copied, then any
/// optional fields that are present. Extraction has no side effects; the
/// same content always yields the same payload.
pub fn extract_payload(content: &[u8]) -> Result<Payload> {
    let value: Value =
        serde_json::from_slice(content).map_err(|e| SweepError::MalformedStructuredData {
            message: e.to_string(),
        })?;

    let object = value
        .as_object()
        .ok_or_else(|| SweepError::MalformedStructuredData {
            message: "top-level value is not an object".to_string(),
        })?;

    let mut fields = serde_json::Map::new();

    for &name in REQUIRED_FIELDS {
        match object.get(name) {
            Some(value) if !value.is_null() => {
                fields.insert(name.to_string(), value.clone());
            }
            _ => {
                return Err(SweepError::MissingRequiredField {
                    field: name.to_string(),
                })
            }
        }
    }

    for &name in OPTIONAL_FIELDS {
        if let Some(value) = object.get(name) {
            if !value.is_null() {
                fields.insert(name.to_string(), value.clone());
            }
        }
    }

    Ok(Payload { fields })
}
