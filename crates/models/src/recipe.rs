use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::ModelError;
use crate::input::{coerce_like_count, coerce_number, coerce_text, to_sequence};

/// Largest integer an f64 represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A stored number. Integral values stay integers so `"20"` round-trips as `20`, not `20.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn from_f64(v: f64) -> Self {
        if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT {
            Numeric::Int(v as i64)
        } else {
            Numeric::Float(v)
        }
    }
}

/// Recipe document as persisted in the `recipe` collection.
///
/// Decoding is lenient: older documents may hold numbers or booleans where
/// text is expected, a fractional `likeCount`, or scalar sequences.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_number")]
    pub prep_time: Option<Numeric>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub like_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub user_id: Option<String>,
}

/// Older documents carry `ingredients`/`categories` as a bare scalar (or null).
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .map(to_sequence)
        .unwrap_or_default())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(coerce_text))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Numeric>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(coerce_number))
}

/// Int32, Int64 or Double; truncated and clamped to zero like request input.
fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_like_count(Option::<Value>::deserialize(deserializer)?.as_ref()))
}

/// Parse a path segment into an ObjectId. Anything but 24 hex chars is rejected.
pub fn parse_id(raw: &str) -> Result<ObjectId, ModelError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| ModelError::InvalidId(raw.to_string()))
}

/// JSON shape returned to clients: `_id` as hex, `createdAt` as RFC 3339.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<Numeric>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub like_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl From<Recipe> for RecipeView {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id.to_hex(),
            image: r.image,
            title: r.title,
            ingredients: r.ingredients,
            instructions: r.instructions,
            cuisine: r.cuisine,
            prep_time: r.prep_time,
            categories: r.categories,
            like_count: r.like_count,
            created_at: r.created_at.map(|d| d.to_chrono()),
            user_id: r.user_id,
        }
    }
}
