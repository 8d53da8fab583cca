use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use utoipa::IntoParams;

/// Optional query-string filters for `GET /api/database`.
///
/// Each present, non-empty field adds a case-sensitive prefix constraint on
/// the column of the same name; constraints combine with AND. Unknown query
/// parameters are dropped during deserialization. No parameters means
/// "match everything".
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
pub struct DatasetFilter {
    pub device: Option<String>,
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub pressure: Option<String>,
    /// Matched against the text form of the stored timestamp, so a partial
    /// value like `2024-01` selects a whole month.
    pub timestamp: Option<String>,
}

impl DatasetFilter {
    /// Static field-name → column mapping. `timestamp` is a TIMESTAMPTZ
    /// column but is filtered through its text rendering to keep the
    /// string-prefix semantics of the other fields.
    fn constraints(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            ("device", self.device.as_deref()),
            ("temperature", self.temperature.as_deref()),
            ("humidity", self.humidity.as_deref()),
            ("pressure", self.pressure.as_deref()),
            (r#""timestamp"::text"#, self.timestamp.as_deref()),
        ]
        .into_iter()
        .filter_map(|(col, value)| {
            value.filter(|v| !v.is_empty()).map(|v| (col, v))
        })
    }

    /// Appends `AND <column> LIKE <prefix>%` for every active constraint.
    /// The base query must already carry a WHERE clause.
    pub fn apply(&self, query: &mut QueryBuilder<'_, Postgres>) {
        for (column, value) in self.constraints() {
            query
                .push(" AND ")
                .push(column)
                .push(" LIKE ")
                .push_bind(prefix_pattern(value))
                .push(r" ESCAPE '\'");
        }
    }
}

/// Builds the LIKE pattern for a prefix match. The user-supplied part is
/// escaped so `%`, `_` and `\` in it match themselves instead of acting as
/// wildcards; only the trailing `%` we append here is a metacharacter.
fn prefix_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 1);
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
