//! Health records for the Med Assist API.
//!
//! Every call is routed through
//! [`SessionClient::authenticated_fetch`](session_client::SessionClient::authenticated_fetch),
//! so token attachment and the 401 refresh-and-retry apply uniformly.
//!
//! The three record kinds share one generic client ([`RecordsClient`]) and
//! one paged state holder ([`RecordCollection`]); each kind only describes
//! its routes, envelope keys and shapes through [`RecordKind`].

mod client;
mod collection;
pub mod date;
mod error;
mod kinds;
mod page;
mod profile;
mod serde_ext;

#[cfg(test)]
mod test_support;

pub use client::RecordsClient;
pub use collection::RecordCollection;
pub use error::{RecordsError, RecordsResult};
pub use kinds::{
    FoodLog, FoodLogInput, FoodLogUpdate, FoodLogs, RecordKind, Symptom, SymptomInput,
    SymptomUpdate, Symptoms, Treatment, TreatmentInput, TreatmentUpdate, Treatments,
};
pub use page::{Page, PageRequest, DEFAULT_PER_PAGE};
pub use profile::{Profile, UserInfo};
