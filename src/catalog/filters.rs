//! Pet search filters.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::catalog::pet::{PetGender, PetSize};

/// Criteria for browsing pets. Absent fields do not filter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetFilters {
    /// Exact species.
    pub species: Option<String>,
    /// Case-insensitive breed substring.
    pub breed: Option<String>,
    /// Inclusive lower age bound.
    pub min_age: Option<u32>,
    /// Inclusive upper age bound.
    pub max_age: Option<u32>,
    /// Exact size class.
    pub size: Option<PetSize>,
    /// Exact gender.
    pub gender: Option<PetGender>,
    /// Adoption state.
    pub is_adopted: Option<bool>,
}

/// Raw query-string form of [`PetFilters`].
///
/// Every field is kept as text so a malformed value drops that single
/// filter instead of rejecting the whole request.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetFilterParams {
    /// `species`
    pub species: Option<String>,
    /// `breed`
    pub breed: Option<String>,
    /// `minAge`
    pub min_age: Option<String>,
    /// `maxAge`
    pub max_age: Option<String>,
    /// `size`
    pub size: Option<String>,
    /// `gender`
    pub gender: Option<String>,
    /// `adopted`, only `"true"` or `"false"` filter.
    pub adopted: Option<String>,
}

impl From<PetFilterParams> for PetFilters {
    fn from(params: PetFilterParams) -> Self {
        Self {
            species: non_empty(params.species),
            breed: non_empty(params.breed),
            min_age: params.min_age.and_then(|v| v.trim().parse().ok()),
            max_age: params.max_age.and_then(|v| v.trim().parse().ok()),
            size: params.size.and_then(|v| v.parse().ok()),
            gender: params.gender.and_then(|v| v.parse().ok()),
            is_adopted: match params.adopted.as_deref() {
                Some("true") => Some(true),
                Some("false") => Some(false),
                _ => None,
            },
        }
    }
}

impl PetFilters {
    /// Build the `WHERE` clause and its positional parameters.
    ///
    /// Returns an empty clause when nothing filters.
    #[must_use]
    pub fn where_clause(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(species) = &self.species {
            params.push(Value::Text(species.clone()));
            conditions.push(format!("species = ?{}", params.len()));
        }
        if let Some(breed) = &self.breed {
            params.push(Value::Text(format!("%{}%", escape_like(breed))));
            conditions.push(format!("breed LIKE ?{} ESCAPE '\\'", params.len()));
        }
        if let Some(min_age) = self.min_age {
            params.push(Value::Integer(i64::from(min_age)));
            conditions.push(format!("age >= ?{}", params.len()));
        }
        if let Some(max_age) = self.max_age {
            params.push(Value::Integer(i64::from(max_age)));
            conditions.push(format!("age <= ?{}", params.len()));
        }
        if let Some(size) = self.size {
            params.push(Value::Text(size.as_str().to_string()));
            conditions.push(format!("size = ?{}", params.len()));
        }
        if let Some(gender) = self.gender {
            params.push(Value::Text(gender.as_str().to_string()));
            conditions.push(format!("gender = ?{}", params.len()));
        }
        if let Some(is_adopted) = self.is_adopted {
            params.push(Value::Integer(i64::from(is_adopted)));
            conditions.push(format!("is_adopted = ?{}", params.len()));
        }

        if conditions.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", conditions.join(" AND ")), params)
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
