use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::datasets::ValidationErrors;
use crate::db::models::Dataset;

/// Wire form of a dataset. Identical to the stored record, except that a
/// rejected entity additionally carries its `errors` map; the key is
/// omitted entirely on well-formed records.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatasetDto {
    pub id: Uuid,
    pub device: String,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub pressure: Option<String>,
    /// RFC 3339 text form of the stored timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// Per-field validation messages, present only on 422 responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl From<Dataset> for DatasetDto {
    fn from(d: Dataset) -> Self {
        Self {
            id: d.id,
            device: d.device,
            temperature: d.temperature,
            humidity: d.humidity,
            pressure: d.pressure,
            timestamp: d.timestamp,
            errors: None,
        }
    }
}

impl DatasetDto {
    /// Serializes a rejected entity together with what was wrong with it.
    pub fn with_errors(dataset: Dataset, errors: ValidationErrors) -> Self {
        Self {
            errors: Some(errors),
            ..dataset.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> Dataset {
        Dataset {
            id: "c96f4f82-0f95-4d32-9161-ae32f8b45f2e".parse().unwrap(),
            device: "sensor-1".into(),
            temperature: Some("21.5".into()),
            humidity: None,
            pressure: None,
            timestamp: Some("2024-01-01T00:00:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn serializes_without_errors_key_when_valid() {
        let value = serde_json::to_value(DatasetDto::from(dataset())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "c96f4f82-0f95-4d32-9161-ae32f8b45f2e",
                "device": "sensor-1",
                "temperature": "21.5",
                "humidity": null,
                "pressure": null,
                "timestamp": "2024-01-01T00:00:00Z",
            })
        );
    }

    #[test]
    fn serializes_errors_map_when_present() {
        let mut errors = ValidationErrors::new();
        errors.insert("device".into(), vec!["can't be blank".into()]);

        let value = serde_json::to_value(DatasetDto::with_errors(dataset(), errors)).unwrap();
        assert_eq!(value["errors"], json!({ "device": ["can't be blank"] }));
    }
}
