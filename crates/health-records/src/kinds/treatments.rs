//! Scheduled treatments.

use super::{user_base, RecordKind};
use crate::serde_ext::{backend_date, null_as_default, to_backend_date, to_backend_date_patch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheduled treatments, addressed REST-style.
#[derive(Debug, Clone, Copy)]
pub struct Treatments;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    #[serde(default)]
    pub treatment_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub treatment_name: String,
    #[serde(default, deserialize_with = "backend_date")]
    pub scheduled_on: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentInput {
    pub treatment_name: String,
    #[serde(serialize_with = "to_backend_date")]
    pub scheduled_on: Option<DateTime<Utc>>,
    pub notes: String,
    pub is_completed: bool,
}

/// Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreatmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "to_backend_date_patch"
    )]
    pub scheduled_on: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl RecordKind for Treatments {
    type Record = Treatment;
    type Create = TreatmentInput;
    type Update = TreatmentUpdate;

    const NOUN: &'static str = "treatment";
    const PLURAL: &'static str = "treatments";
    const LIST_KEY: &'static str = "treatments";
    const TOTAL_KEY: &'static str = "total_num_of_treatments";
    const ITEM_KEY: &'static str = "treatment";

    fn list_path(user_id: &str) -> String {
        format!("{}/treatments", user_base(user_id))
    }

    fn item_path(user_id: &str, id: i64) -> String {
        format!("{}/treatments/{}", user_base(user_id), id)
    }

    fn create_path(user_id: &str) -> String {
        Self::list_path(user_id)
    }

    fn update_path(user_id: &str, id: i64) -> String {
        Self::item_path(user_id, id)
    }

    fn delete_path(user_id: &str, id: i64) -> String {
        Self::item_path(user_id, id)
    }

    fn record_id(record: &Treatment) -> i64 {
        record.treatment_id
    }
}
