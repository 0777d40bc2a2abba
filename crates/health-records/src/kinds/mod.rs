//! Record kinds: routes, envelope keys and shapes per entity.

mod food_logs;
mod symptoms;
mod treatments;

pub use food_logs::{FoodLog, FoodLogInput, FoodLogUpdate, FoodLogs};
pub use symptoms::{Symptom, SymptomInput, SymptomUpdate, Symptoms};
pub use treatments::{Treatment, TreatmentInput, TreatmentUpdate, Treatments};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Describes one CRUD entity under `/api/user/{user_id}`.
///
/// Implementors are zero-sized markers; all behaviour lives in
/// [`RecordsClient`](crate::RecordsClient) and
/// [`RecordCollection`](crate::RecordCollection).
pub trait RecordKind: Send + Sync + 'static {
    type Record: DeserializeOwned + Serialize + Clone + Debug + Send + Sync;
    type Create: Serialize + Debug + Send + Sync;
    type Update: Serialize + Debug + Send + Sync;

    /// Singular noun for messages ("treatment").
    const NOUN: &'static str;
    /// Plural noun for messages ("treatments").
    const PLURAL: &'static str;
    /// Envelope key holding the page of records.
    const LIST_KEY: &'static str;
    /// Envelope key holding the total record count.
    const TOTAL_KEY: &'static str;
    /// Envelope key holding a single record.
    const ITEM_KEY: &'static str;

    fn list_path(user_id: &str) -> String;
    fn item_path(user_id: &str, id: i64) -> String;
    fn create_path(user_id: &str) -> String;
    fn update_path(user_id: &str, id: i64) -> String;
    fn delete_path(user_id: &str, id: i64) -> String;

    fn record_id(record: &Self::Record) -> i64;
}

fn user_base(user_id: &str) -> String {
    format!("/api/user/{}", user_id)
}
