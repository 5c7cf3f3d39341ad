//! Second-chance item document
//!
//! Items are stored whole as JSON documents. The known fields are typed;
//! anything else the client sent on create rides along in `extra`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::ValidationError;

/// Fields the server owns. Client-supplied values for these are dropped on create.
const RESERVED_FIELDS: &[&str] = &["id", "date_added", "age_years", "updatedAt", "filePath"];

/// Numeric fields that may arrive as text (multipart forms only carry strings).
const NUMERIC_FIELDS: &[&str] = &["age_days"];

const DAYS_PER_YEAR: f64 = 365.0;

/// A listing of a reusable or donated good
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Kept as a JSON number so `365` reads back as `365`, not `365.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_days: Option<Number>,

    /// `age_days / 365` to one decimal place; only written by updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_years: Option<f64>,

    /// Unix seconds at creation.
    pub date_added: i64,

    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Public path of the image uploaded with the listing.
    #[serde(rename = "filePath", default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Build a new listing from client fields plus the server-assigned values.
    pub fn new_listing(
        id: String,
        date_added: i64,
        mut fields: Map<String, Value>,
        file_path: Option<String>,
    ) -> Result<Self, ValidationError> {
        for key in RESERVED_FIELDS {
            fields.remove(*key);
        }
        normalize_numbers(&mut fields)?;

        fields.insert("id".into(), Value::String(id));
        fields.insert("date_added".into(), Value::from(date_added));
        if let Some(path) = file_path {
            fields.insert("filePath".into(), Value::String(path));
        }

        serde_json::from_value(Value::Object(fields)).map_err(|e| ValidationError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Merge an update into this item.
    ///
    /// The patch only carries supplied, truthy values (see
    /// [`ItemPatch::from_fields`]), so a field can never be cleared through an
    /// update. `age_years` is recomputed every time, from whatever `age_days`
    /// ends up being.
    pub fn apply_patch(&mut self, patch: ItemPatch, now: DateTime<Utc>) {
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(condition) = patch.condition {
            self.condition = Some(condition);
        }
        if let Some(age_days) = patch.age_days {
            self.age_days = Some(age_days);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }

        self.age_years = self
            .age_days
            .as_ref()
            .and_then(Number::as_f64)
            .map(age_in_years);
        self.updated_at = Some(now);
    }
}

/// Partial update accepted by PUT
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub age_days: Option<Number>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemPatch {
    /// Parse a patch from a JSON object.
    ///
    /// Falsy values (`null`, `""`, numeric `0`) count as "not supplied".
    /// Truthiness is judged on the value as sent: the string `"0"` is
    /// non-empty, so it is kept and stored as the number 0.
    pub fn from_fields(mut fields: Map<String, Value>) -> Result<Self, ValidationError> {
        let age_days = match fields.remove("age_days") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) if raw.is_empty() => None,
            Some(Value::String(raw)) => Some(parse_number("age_days", &raw)?),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
            Some(Value::Number(n)) => Some(n),
            Some(other) => {
                return Err(ValidationError::NotANumber {
                    field: "age_days".to_owned(),
                    value: other.to_string(),
                })
            }
        };

        let mut patch: ItemPatch = serde_json::from_value(Value::Object(fields))
            .map_err(|e| ValidationError::Malformed {
                reason: e.to_string(),
            })?;
        patch.age_days = age_days;
        patch.category = patch.category.filter(|s| !s.is_empty());
        patch.condition = patch.condition.filter(|s| !s.is_empty());
        patch.description = patch.description.filter(|s| !s.is_empty());
        Ok(patch)
    }
}

/// Convert an age in days to years, rounded to one decimal place.
pub fn age_in_years(age_days: f64) -> f64 {
    (age_days / DAYS_PER_YEAR * 10.0).round() / 10.0
}

/// Parse numeric text, keeping integers as integers.
fn parse_number(field: &str, raw: &str) -> Result<Number, ValidationError> {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(n.into());
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n.into());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| ValidationError::NotANumber {
            field: field.to_owned(),
            value: raw.to_owned(),
        })
}

/// Turn numeric strings into JSON numbers; blank strings are dropped.
fn normalize_numbers(fields: &mut Map<String, Value>) -> Result<(), ValidationError> {
    for key in NUMERIC_FIELDS {
        let Some(Value::String(raw)) = fields.get(*key) else {
            continue;
        };

        if raw.trim().is_empty() {
            fields.remove(*key);
            continue;
        }

        let number = parse_number(key, raw)?;
        fields.insert((*key).to_owned(), Value::Number(number));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn listing() -> Item {
        Item::new_listing(
            "1".into(),
            1_700_000_000,
            fields(json!({"category": "furniture", "condition": "used", "age_days": 365})),
            None,
        )
        .unwrap()
    }

    #[test]
    fn age_rounds_to_one_decimal() {
        assert_eq!(age_in_years(365.0), 1.0);
        assert_eq!(age_in_years(730.0), 2.0);
        assert_eq!(age_in_years(400.0), 1.1);
        assert_eq!(age_in_years(30.0), 0.1);
    }

    #[test]
    fn new_listing_sets_server_fields() {
        let item = Item::new_listing(
            "4".into(),
            42,
            fields(json!({
                "category": "toys",
                "id": "999",
                "date_added": 1,
                "updatedAt": "yesterday",
                "age_years": 9,
                "filePath": "/etc/passwd",
                "zipcode": "10001"
            })),
            Some("/images/bear.png".into()),
        )
        .unwrap();

        assert_eq!(item.id, "4");
        assert_eq!(item.date_added, 42);
        assert_eq!(item.updated_at, None);
        assert_eq!(item.age_years, None);
        assert_eq!(item.file_path.as_deref(), Some("/images/bear.png"));
        assert_eq!(item.extra.get("zipcode"), Some(&json!("10001")));
    }

    #[test]
    fn new_listing_accepts_form_text_numbers() {
        let item = Item::new_listing(
            "1".into(),
            0,
            fields(json!({"age_days": " 120 "})),
            None,
        )
        .unwrap();
        assert_eq!(item.age_days, Some(Number::from(120)));

        let blank = Item::new_listing("1".into(), 0, fields(json!({"age_days": ""})), None).unwrap();
        assert_eq!(blank.age_days, None);
    }

    #[test]
    fn new_listing_rejects_non_numeric_age() {
        let err = Item::new_listing("1".into(), 0, fields(json!({"age_days": "old"})), None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { .. }));
    }

    #[test]
    fn serializes_with_original_field_names() {
        let mut item = listing();
        item.apply_patch(ItemPatch::default(), Utc::now());
        let value = serde_json::to_value(&item).unwrap();

        assert!(value.get("updatedAt").is_some());
        assert!(value.get("updated_at").is_none());
        assert!(value.get("filePath").is_none());
        assert_eq!(value["age_years"], json!(1.0));
    }

    #[test]
    fn patch_keeps_unsupplied_and_falsy_fields() {
        let mut item = listing();
        let patch = ItemPatch::from_fields(fields(json!({
            "category": "",
            "condition": "like new",
            "age_days": 0,
            "description": null
        })))
        .unwrap();
        item.apply_patch(patch, Utc::now());

        assert_eq!(item.category.as_deref(), Some("furniture"));
        assert_eq!(item.condition.as_deref(), Some("like new"));
        assert_eq!(item.age_days, Some(Number::from(365)));
        assert_eq!(item.age_years, Some(1.0));
        assert!(item.updated_at.is_some());
    }

    #[test]
    fn zero_as_text_is_a_real_update() {
        let mut item = listing();
        let patch = ItemPatch::from_fields(fields(json!({"age_days": "0"}))).unwrap();
        assert_eq!(patch.age_days, Some(Number::from(0)));

        item.apply_patch(patch, Utc::now());
        assert_eq!(item.age_days, Some(Number::from(0)));
        assert_eq!(item.age_years, Some(0.0));
    }

    #[test]
    fn blank_age_text_falls_back() {
        let patch = ItemPatch::from_fields(fields(json!({"age_days": ""}))).unwrap();
        assert_eq!(patch.age_days, None);
    }

    #[test]
    fn patch_never_touches_identity() {
        let mut item = listing();
        let before = item.clone();
        item.apply_patch(
            ItemPatch {
                age_days: Some(Number::from(730)),
                ..ItemPatch::default()
            },
            Utc::now(),
        );

        assert_eq!(item.id, before.id);
        assert_eq!(item.date_added, before.date_added);
        assert_eq!(item.age_years, Some(2.0));
    }

    #[test]
    fn age_years_absent_without_age_days() {
        let mut item =
            Item::new_listing("1".into(), 0, fields(json!({"category": "books"})), None).unwrap();
        item.apply_patch(ItemPatch::default(), Utc::now());
        assert_eq!(item.age_years, None);
    }

    #[test]
    fn patch_from_fields_parses_text_age() {
        let patch = ItemPatch::from_fields(fields(json!({"age_days": "730", "color": "red"}))).unwrap();
        assert_eq!(patch.age_days, Some(Number::from(730)));
        assert_eq!(patch.category, None);
    }

    #[test]
    fn integer_age_round_trips_without_fraction() {
        let value = serde_json::to_value(listing()).unwrap();
        assert_eq!(value["age_days"], json!(365));
        assert_eq!(value["age_days"].to_string(), "365");

        let fractional =
            Item::new_listing("2".into(), 0, fields(json!({"age_days": "12.5"})), None).unwrap();
        assert_eq!(serde_json::to_value(fractional).unwrap()["age_days"], json!(12.5));
    }

    #[test]
    fn patch_from_fields_rejects_wrong_types() {
        let err = ItemPatch::from_fields(fields(json!({"category": 5}))).unwrap_err();
        assert!(matches!(err, ValidationError::Malformed { .. }));

        let err = ItemPatch::from_fields(fields(json!({"age_days": "old"}))).unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { .. }));
    }
}
