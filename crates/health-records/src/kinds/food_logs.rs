//! Daily food logs.

use super::{user_base, RecordKind};
use crate::serde_ext::{backend_date, null_as_default, to_backend_date, to_backend_date_patch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct FoodLogs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLog {
    #[serde(default)]
    pub foodlog_id: i64,
    #[serde(default, deserialize_with = "backend_date")]
    pub recorded_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub breakfast: Option<String>,
    #[serde(default)]
    pub lunch: Option<String>,
    #[serde(default)]
    pub dinner: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_calories: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FoodLogInput {
    #[serde(serialize_with = "to_backend_date")]
    pub recorded_on: Option<DateTime<Utc>>,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<f64>,
}

/// Only fields that are `Some` are sent; `Some(None)` clears a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FoodLogUpdate {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "to_backend_date_patch"
    )]
    pub recorded_on: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakfast: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lunch: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dinner: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<f64>,
}

impl RecordKind for FoodLogs {
    type Record = FoodLog;
    type Create = FoodLogInput;
    type Update = FoodLogUpdate;

    const NOUN: &'static str = "food log";
    const PLURAL: &'static str = "food logs";
    const LIST_KEY: &'static str = "foodlogs";
    const TOTAL_KEY: &'static str = "total_num_of_foodlogs";
    const ITEM_KEY: &'static str = "foodlog";

    fn list_path(user_id: &str) -> String {
        format!("{}/food-logs", user_base(user_id))
    }

    fn item_path(user_id: &str, id: i64) -> String {
        format!("{}/food-logs/{}", user_base(user_id), id)
    }

    fn create_path(user_id: &str) -> String {
        Self::list_path(user_id)
    }

    fn update_path(user_id: &str, id: i64) -> String {
        format!("{}/edit", Self::item_path(user_id, id))
    }

    fn delete_path(user_id: &str, id: i64) -> String {
        format!("{}/delete", Self::item_path(user_id, id))
    }

    fn record_id(record: &FoodLog) -> i64 {
        record.foodlog_id
    }
}
