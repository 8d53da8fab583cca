use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::filter::DatasetFilter;
use crate::db::models::Dataset;

/// Field name → list of human-readable violation messages.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found")]
    NotFound,
    #[error("dataset failed validation")]
    Validation {
        /// The rejected entity state, returned to the client verbatim.
        dataset: Dataset,
        errors: ValidationErrors,
    },
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Request-body attributes for create and partial update. Every field is
/// optional; on update, absent fields leave the stored value untouched.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct DatasetAttributes {
    pub device: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub pressure: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

const SELECT_COLUMNS: &str =
    r#"SELECT id, device, temperature, humidity, pressure, "timestamp" FROM datasets"#;

/// CRUD over the `datasets` table. Holds the connection pool; handlers get
/// a clone of this as their axum state.
#[derive(Debug, Clone)]
pub struct DatasetService {
    pool: PgPool,
}

impl DatasetService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns every dataset matching `filter`, in store order (no ORDER BY;
    /// the API leaves result ordering unspecified).
    pub async fn list(&self, filter: &DatasetFilter) -> Result<Vec<Dataset>, DatasetError> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("{SELECT_COLUMNS} WHERE TRUE"));
        filter.apply(&mut query);

        let rows = query
            .build_query_as::<Dataset>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Dataset, DatasetError> {
        sqlx::query_as::<_, Dataset>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatasetError::NotFound)
    }

    /// Validates and persists a new dataset. The id is assigned here, before
    /// validation, so a rejected entity is reported with the id it would
    /// have been stored under.
    pub async fn create(&self, attrs: DatasetAttributes) -> Result<Dataset, DatasetError> {
        let dataset = Dataset {
            id: Uuid::new_v4(),
            device: attrs.device.unwrap_or_default(),
            temperature: attrs.temperature,
            humidity: attrs.humidity,
            pressure: attrs.pressure,
            timestamp: attrs.timestamp,
        };
        validate(&dataset)?;

        sqlx::query(
            r#"INSERT INTO datasets (id, device, temperature, humidity, pressure, "timestamp")
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(dataset.id)
        .bind(&dataset.device)
        .bind(&dataset.temperature)
        .bind(&dataset.humidity)
        .bind(&dataset.pressure)
        .bind(dataset.timestamp)
        .execute(&self.pool)
        .await?;

        info!(id = %dataset.id, device = %dataset.device, "Dataset created");
        Ok(dataset)
    }

    /// Partial update: fields absent from `attrs` keep their stored value.
    /// The merged record is re-validated before anything is written.
    pub async fn update(&self, id: Uuid, attrs: DatasetAttributes) -> Result<Dataset, DatasetError> {
        let mut dataset = self.get(id).await?;
        apply_partial(&mut dataset, attrs);
        validate(&dataset)?;

        sqlx::query(
            r#"UPDATE datasets
               SET device = $2, temperature = $3, humidity = $4, pressure = $5, "timestamp" = $6
               WHERE id = $1"#,
        )
        .bind(dataset.id)
        .bind(&dataset.device)
        .bind(&dataset.temperature)
        .bind(&dataset.humidity)
        .bind(&dataset.pressure)
        .bind(dataset.timestamp)
        .execute(&self.pool)
        .await?;

        info!(id = %dataset.id, "Dataset updated");
        Ok(dataset)
    }

    /// Hard delete. Deleting an id that does not exist is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), DatasetError> {
        let result = sqlx::query("DELETE FROM datasets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(id = %id, "Dataset deleted");
        }
        Ok(())
    }
}

fn apply_partial(dataset: &mut Dataset, attrs: DatasetAttributes) {
    if let Some(device) = attrs.device {
        dataset.device = device;
    }
    if let Some(temperature) = attrs.temperature {
        dataset.temperature = Some(temperature);
    }
    if let Some(humidity) = attrs.humidity {
        dataset.humidity = Some(humidity);
    }
    if let Some(pressure) = attrs.pressure {
        dataset.pressure = Some(pressure);
    }
    if let Some(timestamp) = attrs.timestamp {
        dataset.timestamp = Some(timestamp);
    }
}

/// The single domain rule: `device` must not be blank.
fn validate(dataset: &Dataset) -> Result<(), DatasetError> {
    let mut errors = ValidationErrors::new();
    if dataset.device.trim().is_empty() {
        errors
            .entry("device".to_owned())
            .or_default()
            .push("can't be blank".to_owned());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::Validation {
            dataset: dataset.clone(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset {
            id: Uuid::new_v4(),
            device: "sensor-1".into(),
            temperature: Some("21.5".into()),
            humidity: Some("40".into()),
            pressure: Some("1012".into()),
            timestamp: Some("2024-01-01T00:00:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn validate_accepts_non_empty_device() {
        assert!(validate(&sample()).is_ok());
    }

    #[test]
    fn validate_rejects_empty_device() {
        let mut dataset = sample();
        dataset.device = String::new();

        match validate(&dataset).unwrap_err() {
            DatasetError::Validation { errors, .. } => {
                assert_eq!(errors["device"], vec!["can't be blank".to_owned()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_whitespace_only_device() {
        let mut dataset = sample();
        dataset.device = "   ".into();
        assert!(validate(&dataset).is_err());
    }

    #[test]
    fn validation_error_carries_rejected_state() {
        let mut dataset = sample();
        dataset.device = String::new();

        match validate(&dataset).unwrap_err() {
            DatasetError::Validation { dataset: rejected, .. } => {
                assert_eq!(rejected, dataset);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn apply_partial_changes_only_supplied_fields() {
        let mut dataset = sample();
        let before = dataset.clone();

        apply_partial(
            &mut dataset,
            DatasetAttributes {
                temperature: Some("25.0".into()),
                ..Default::default()
            },
        );

        assert_eq!(dataset.temperature.as_deref(), Some("25.0"));
        assert_eq!(dataset.device, before.device);
        assert_eq!(dataset.humidity, before.humidity);
        assert_eq!(dataset.pressure, before.pressure);
        assert_eq!(dataset.timestamp, before.timestamp);
    }

    #[test]
    fn apply_partial_with_empty_attrs_is_a_no_op() {
        let mut dataset = sample();
        let before = dataset.clone();
        apply_partial(&mut dataset, DatasetAttributes::default());
        assert_eq!(dataset, before);
    }
}
