//! Daily symptom entries.

use super::{user_base, RecordKind};
use crate::serde_ext::{backend_date, null_as_default, to_backend_date, to_backend_date_patch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Daily symptom entries. Routes use action suffixes (`/add`, `/edit`, `/delete`).
#[derive(Debug, Clone, Copy)]
pub struct Symptoms;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    #[serde(default)]
    pub symptoms_id: i64,
    #[serde(default, deserialize_with = "backend_date")]
    pub recorded_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub type_of_symptom: String,
    #[serde(default)]
    pub weight_lbs: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymptomInput {
    #[serde(serialize_with = "to_backend_date")]
    pub recorded_on: Option<DateTime<Utc>>,
    pub severity: i32,
    pub type_of_symptom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SymptomUpdate {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "to_backend_date_patch"
    )]
    pub recorded_on: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_of_symptom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_lbs: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RecordKind for Symptoms {
    type Record = Symptom;
    type Create = SymptomInput;
    type Update = SymptomUpdate;

    const NOUN: &'static str = "symptom";
    const PLURAL: &'static str = "symptoms";
    const LIST_KEY: &'static str = "symptoms";
    const TOTAL_KEY: &'static str = "total_num_of_symptoms";
    const ITEM_KEY: &'static str = "symptom";

    fn list_path(user_id: &str) -> String {
        format!("{}/my-symptoms", user_base(user_id))
    }

    fn item_path(user_id: &str, id: i64) -> String {
        format!("{}/symptom/{}", user_base(user_id), id)
    }

    fn create_path(user_id: &str) -> String {
        format!("{}/symptom/add", user_base(user_id))
    }

    fn update_path(user_id: &str, id: i64) -> String {
        format!("{}/edit", Self::item_path(user_id, id))
    }

    fn delete_path(user_id: &str, id: i64) -> String {
        format!("{}/delete", Self::item_path(user_id, id))
    }

    fn record_id(record: &Symptom) -> i64 {
        record.symptoms_id
    }
}
