use bson::{doc, oid::ObjectId};
use chrono::{TimeZone, Utc};
use serde_json::json;

use crate::errors::ModelError;
use crate::input::NewRecipe;
use crate::recipe::*;

#[test]
fn parse_id_accepts_hex_and_rejects_garbage() {
    let id = ObjectId::new();
    assert_eq!(parse_id(&id.to_hex()), Ok(id));
    assert_eq!(
        parse_id("not-an-id"),
        Err(ModelError::InvalidId("not-an-id".into()))
    );
    assert!(parse_id("").is_err());
    assert!(parse_id("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
}

#[test]
fn numeric_keeps_integers_integral() {
    assert_eq!(Numeric::from_f64(20.0), Numeric::Int(20));
    assert_eq!(Numeric::from_f64(2.5), Numeric::Float(2.5));
    assert_eq!(serde_json::to_value(Numeric::Int(20)).unwrap(), json!(20));
}

#[test]
fn legacy_document_with_scalar_ingredients_decodes() {
    let id = ObjectId::new();
    let d = doc! {
        "_id": id,
        "title": "Old",
        "ingredients": "flour, water",
        "prepTime": 30_i32,
        "likeCount": 2_i32,
    };
    let recipe: Recipe = bson::from_document(d).unwrap();
    assert_eq!(recipe.id, id);
    assert_eq!(recipe.ingredients, vec!["flour, water"]);
    assert!(recipe.categories.is_empty());
    assert_eq!(recipe.prep_time, Some(Numeric::Int(30)));
    assert_eq!(recipe.like_count, 2);
    assert_eq!(recipe.created_at, None);
}

#[test]
fn legacy_document_with_fractional_like_count_decodes() {
    let d = doc! { "_id": ObjectId::new(), "title": "Pie", "likeCount": 2.5_f64 };
    let recipe: Recipe = bson::from_document(d).unwrap();
    assert_eq!(recipe.like_count, 2);

    let d = doc! { "_id": ObjectId::new(), "likeCount": -4.0_f64 };
    let recipe: Recipe = bson::from_document(d).unwrap();
    assert_eq!(recipe.like_count, 0);

    let d = doc! { "_id": ObjectId::new(), "likeCount": f64::NAN };
    let recipe: Recipe = bson::from_document(d).unwrap();
    assert_eq!(recipe.like_count, 0);
}

#[test]
fn legacy_document_with_non_text_fields_decodes() {
    let d = doc! {
        "_id": ObjectId::new(),
        "title": 123_i32,
        "cuisine": true,
        "instructions": bson::Bson::Null,
        "userId": 42_i64,
        "prepTime": "15",
        "categories": [1_i32, "dinner"],
    };
    let recipe: Recipe = bson::from_document(d).unwrap();
    assert_eq!(recipe.title.as_deref(), Some("123"));
    assert_eq!(recipe.cuisine.as_deref(), Some("true"));
    assert_eq!(recipe.instructions, None);
    assert_eq!(recipe.user_id.as_deref(), Some("42"));
    assert_eq!(recipe.prep_time, Some(Numeric::Int(15)));
    assert_eq!(recipe.categories, vec!["1", "dinner"]);
}

#[test]
fn fractional_prep_time_stays_fractional() {
    let d = doc! { "_id": ObjectId::new(), "prepTime": 2.5_f64 };
    let recipe: Recipe = bson::from_document(d).unwrap();
    assert_eq!(recipe.prep_time, Some(Numeric::Float(2.5)));
}

#[test]
fn null_categories_decode_as_empty() {
    let d = doc! { "_id": ObjectId::new(), "categories": bson::Bson::Null };
    let recipe: Recipe = bson::from_document(d).unwrap();
    assert!(recipe.categories.is_empty());
}

#[test]
fn document_round_trips_through_bson() {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let fields = match json!({"title": "Soup", "prepTime": "20", "categories": "dinner"}) {
        serde_json::Value::Object(m) => m,
        _ => unreachable!(),
    };
    let recipe = NewRecipe::from_fields(&fields).into_recipe(ObjectId::new(), created);

    let d = bson::to_document(&recipe).unwrap();
    assert_eq!(d.get_i64("prepTime").unwrap(), 20);
    assert_eq!(d.get_i64("likeCount").unwrap(), 0);
    assert!(d.get("image").is_none());

    let back: Recipe = bson::from_document(d).unwrap();
    assert_eq!(back, recipe);
}

#[test]
fn view_serializes_hex_id_and_rfc3339_timestamp() {
    let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let id = ObjectId::new();
    let fields = match json!({"title": "Soup", "prepTime": "20", "categories": "dinner"}) {
        serde_json::Value::Object(m) => m,
        _ => unreachable!(),
    };
    let view = RecipeView::from(NewRecipe::from_fields(&fields).into_recipe(id, created));
    let v = serde_json::to_value(&view).unwrap();

    assert_eq!(v["_id"], json!(id.to_hex()));
    assert_eq!(v["prepTime"], json!(20));
    assert_eq!(v["categories"], json!(["dinner"]));
    assert_eq!(v["likeCount"], json!(0));
    assert_eq!(v["createdAt"], json!("2024-05-01T12:00:00Z"));
    assert!(v.get("cuisine").is_none());
}
