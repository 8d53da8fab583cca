use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `datasets` table — a single stored sensor reading.
///
/// The three measurement fields are free-form text, not numbers. The
/// upstream data format stores them as strings and filters them by string
/// prefix, so converting to a numeric type would silently change query
/// semantics. Kept as `TEXT` on purpose.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub device: String,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub pressure: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}
