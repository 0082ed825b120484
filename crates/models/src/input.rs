//! Request field normalisation.
//!
//! Bodies arrive either as JSON objects or as url-encoded forms; both are
//! folded into a [`Fields`] map first, then coerced into [`NewRecipe`] or
//! [`RecipePatch`]. Coercion is lenient: missing or unusable values are left
//! absent rather than rejected.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::recipe::{Numeric, Recipe};

/// Raw request fields keyed by name.
pub type Fields = Map<String, Value>;

pub const IMAGE: &str = "image";
pub const TITLE: &str = "title";
pub const INGREDIENTS: &str = "ingredients";
pub const INSTRUCTIONS: &str = "instructions";
pub const CUISINE: &str = "cuisine";
pub const PREP_TIME: &str = "prepTime";
pub const CATEGORIES: &str = "categories";
pub const LIKE_COUNT: &str = "likeCount";
pub const USER_ID: &str = "userId";

/// Fold url-encoded pairs into a field map.
///
/// A repeated key, or a key written as `name[]` (checkbox groups), becomes an array.
pub fn fields_from_pairs<I>(pairs: I) -> Fields
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut fields = Fields::new();
    for (key, value) in pairs {
        let (name, forced_array) = match key.strip_suffix("[]") {
            Some(stripped) => (stripped.to_string(), true),
            None => (key, false),
        };
        let value = Value::String(value);
        match fields.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None if forced_array => {
                fields.insert(name, Value::Array(vec![value]));
            }
            None => {
                fields.insert(name, value);
            }
        }
    }
    fields
}

/// Scalar to text. Arrays yield their first usable element; objects and null yield nothing.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.iter().find_map(coerce_text),
        Value::Null | Value::Object(_) => None,
    }
}

/// Numeric coercion in the permissive style form posts need:
/// `"20"` → 20, `""` → 0, `true` → 1, `"abc"` → none.
pub fn coerce_number(value: &Value) -> Option<Numeric> {
    let v = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => return Some(Numeric::Int(i)),
            None => n.as_f64()?,
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Array(items) if items.len() == 1 => return coerce_number(&items[0]),
        _ => return None,
    };
    v.is_finite().then(|| Numeric::from_f64(v))
}

/// Like counts are non-negative integers; anything unusable counts as 0.
pub fn coerce_like_count(value: Option<&Value>) -> i64 {
    match value.and_then(coerce_number) {
        Some(Numeric::Int(i)) => i.max(0),
        Some(Numeric::Float(f)) => (f.trunc() as i64).max(0),
        None => 0,
    }
}

/// Scalar or array to a sequence of text.
pub fn to_sequence(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(coerce_text).collect(),
        other => coerce_text(other).into_iter().collect(),
    }
}

/// Payload of the create operation, before id and timestamp are assigned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewRecipe {
    pub image: Option<String>,
    pub title: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
    pub cuisine: Option<String>,
    pub prep_time: Option<Numeric>,
    pub categories: Vec<String>,
    pub like_count: i64,
    pub user_id: Option<String>,
}

impl NewRecipe {
    pub fn from_fields(fields: &Fields) -> Self {
        let text = |key: &str| fields.get(key).and_then(coerce_text);
        Self {
            image: text(IMAGE),
            title: text(TITLE),
            ingredients: fields.get(INGREDIENTS).map(to_sequence).unwrap_or_default(),
            instructions: text(INSTRUCTIONS),
            cuisine: text(CUISINE),
            prep_time: fields.get(PREP_TIME).and_then(coerce_number),
            categories: fields.get(CATEGORIES).map(to_sequence).unwrap_or_default(),
            like_count: coerce_like_count(fields.get(LIKE_COUNT)),
            user_id: text(USER_ID),
        }
    }

    pub fn into_recipe(self, id: ObjectId, created_at: DateTime<Utc>) -> Recipe {
        Recipe {
            id,
            image: self.image,
            title: self.title,
            ingredients: self.ingredients,
            instructions: self.instructions,
            cuisine: self.cuisine,
            prep_time: self.prep_time,
            categories: self.categories,
            like_count: self.like_count,
            created_at: Some(bson::DateTime::from_chrono(created_at)),
            user_id: self.user_id,
        }
    }
}

/// Partial update. Only supplied fields serialize, so the BSON form is a ready `$set` body.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<Numeric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl RecipePatch {
    /// `_id`, `createdAt` and unknown keys are ignored.
    pub fn from_fields(fields: &Fields) -> Self {
        let text = |key: &str| fields.get(key).and_then(coerce_text);
        Self {
            image: text(IMAGE),
            title: text(TITLE),
            ingredients: fields.get(INGREDIENTS).filter(|v| !v.is_null()).map(to_sequence),
            instructions: text(INSTRUCTIONS),
            cuisine: text(CUISINE),
            prep_time: fields.get(PREP_TIME).and_then(coerce_number),
            categories: fields.get(CATEGORIES).filter(|v| !v.is_null()).map(to_sequence),
            like_count: fields
                .get(LIKE_COUNT)
                .filter(|v| coerce_number(v).is_some())
                .map(|v| coerce_like_count(Some(v))),
            user_id: text(USER_ID),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `$set` document for the supplied fields.
    pub fn to_set_document(&self) -> Result<bson::Document, bson::ser::Error> {
        bson::to_document(self)
    }

    /// Apply the supplied fields in place.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *slot = value.clone();
            }
        }
        set_opt(&mut recipe.image, &self.image);
        set_opt(&mut recipe.title, &self.title);
        set(&mut recipe.ingredients, &self.ingredients);
        set_opt(&mut recipe.instructions, &self.instructions);
        set_opt(&mut recipe.cuisine, &self.cuisine);
        set_opt(&mut recipe.prep_time, &self.prep_time);
        set(&mut recipe.categories, &self.categories);
        set(&mut recipe.like_count, &self.like_count);
        set_opt(&mut recipe.user_id, &self.user_id);
    }
}
