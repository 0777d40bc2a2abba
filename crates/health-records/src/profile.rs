//! Profile reads: the required account fields and the optional health details.

use crate::serde_ext::null_as_default;
use crate::{RecordsClient, RecordsError, RecordsResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use session_client::{ApiRequest, UserRecord};

/// Optional health details a user may have filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub user_info_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight_lbs: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height_ft: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height_in: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_diagnoses: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medical_history: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub insurance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user: UserRecord,
    pub info: Option<UserInfo>,
}

impl RecordsClient {
    /// `GET /api/user-required-info/{id}` → `{ user }`.
    pub async fn required_info(&self) -> RecordsResult<UserRecord> {
        let request = ApiRequest::get(format!("/api/user-required-info/{}", self.user_id()));
        let mut body = self
            .send(request, "Failed to fetch user".to_string())
            .await?
            .json::<Value>()?;

        match body.get_mut("user").map(Value::take) {
            None | Some(Value::Null) => Err(RecordsError::MissingField("user")),
            Some(user) => Ok(UserRecord::new(user)),
        }
    }

    /// `GET /api/user-info/{id}` → `{ user_info | null }`.
    pub async fn user_info(&self) -> RecordsResult<Option<UserInfo>> {
        let request = ApiRequest::get(format!("/api/user-info/{}", self.user_id()));
        let mut body = self
            .send(request, "Failed to fetch user info".to_string())
            .await?
            .json::<Value>()?;

        match body.get_mut("user_info").map(Value::take) {
            None | Some(Value::Null) => Ok(None),
            Some(info) => Ok(Some(serde_json::from_value(info)?)),
        }
    }

    pub async fn profile(&self) -> RecordsResult<Profile> {
        let user = self.required_info().await?;
        let info = self.user_info().await?;
        Ok(Profile { user, info })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{fixture, Fixture};
    use crate::RecordsError;
    use serde_json::json;
    use session_client::Method;

    #[tokio::test]
    async fn test_profile_combines_both_reads() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(
            Method::GET,
            "/api/user-required-info/7",
            200,
            json!({ "user": { "id": 7, "first_name": "Ada", "username": "ada" } }),
        );
        transport.respond_json(
            Method::GET,
            "/api/user-info/7",
            200,
            json!({ "user_info": { "age": 36, "gender": "F", "height_ft": 5, "height_in": 6, "insurance": null } }),
        );

        let profile = records.profile().await.unwrap();

        assert_eq!(profile.user.display_name(), "Ada");
        let info = profile.info.unwrap();
        assert_eq!(info.age, 36);
        assert_eq!(info.height_in, 6);
        assert_eq!(info.insurance, "");
    }

    #[tokio::test]
    async fn test_user_info_null_is_none() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(Method::GET, "/api/user-info/7", 200, json!({ "user_info": null }));

        assert_eq!(records.user_info().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_forbidden_profile_is_api_error() {
        let Fixture { transport, records } = fixture();
        transport.respond_json(
            Method::GET,
            "/api/user-required-info/7",
            403,
            json!({ "error": "Unauthorized access" }),
        );

        let err = records.required_info().await.unwrap_err();

        assert!(matches!(err, RecordsError::Api { status: 403, ref message } if message == "Unauthorized access"));
    }
}
