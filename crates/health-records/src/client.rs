//! Generic CRUD over any [`RecordKind`].

use crate::{Page, PageRequest, RecordKind, RecordsError, RecordsResult};
use serde_json::Value;
use session_client::{ApiRequest, ApiResponse, CurrentUser, SessionClient};
use std::sync::Arc;
use tracing::{debug, warn};

/// Record access for one user, over a shared session.
#[derive(Clone)]
pub struct RecordsClient {
    session: Arc<SessionClient>,
    user_id: String,
}

impl RecordsClient {
    pub fn new(session: Arc<SessionClient>, user_id: impl Into<String>) -> Self {
        Self {
            session,
            user_id: user_id.into(),
        }
    }

    /// Resolve the signed-in user and scope the client to them.
    pub async fn for_current_user(session: Arc<SessionClient>) -> RecordsResult<Self> {
        match session.current_user().await {
            CurrentUser::Authenticated(user) => {
                let user_id = user.id().ok_or_else(|| {
                    RecordsError::UserUnavailable("user record has no id".to_string())
                })?;
                Ok(Self::new(session, user_id))
            }
            CurrentUser::SignedOut => Err(session_client::SessionError::NoSession.into()),
            CurrentUser::Unavailable { reason } => Err(RecordsError::UserUnavailable(reason)),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session(&self) -> &Arc<SessionClient> {
        &self.session
    }

    pub async fn list<K: RecordKind>(&self, page: PageRequest) -> RecordsResult<Page<K::Record>> {
        let request = ApiRequest::get(K::list_path(&self.user_id)).query(&page.query());
        let body = self
            .send(request, format!("Failed to fetch {}", K::PLURAL))
            .await?
            .json::<Value>()?;

        let page = Page::from_envelope(&body, K::LIST_KEY, K::TOTAL_KEY, page)?;
        debug!(
            kind = K::PLURAL,
            count = page.items.len(),
            total = page.total_count,
            "Listed records"
        );
        Ok(page)
    }

    pub async fn get<K: RecordKind>(&self, id: i64) -> RecordsResult<K::Record> {
        let request = ApiRequest::get(K::item_path(&self.user_id, id));
        let mut body = self
            .send(request, format!("Failed to fetch {}", K::NOUN))
            .await?
            .json::<Value>()?;

        match body.get_mut(K::ITEM_KEY).map(Value::take) {
            None | Some(Value::Null) => Err(RecordsError::MissingField(K::ITEM_KEY)),
            Some(item) => Ok(serde_json::from_value(item)?),
        }
    }

    pub async fn create<K: RecordKind>(&self, input: &K::Create) -> RecordsResult<()> {
        let request = ApiRequest::post(K::create_path(&self.user_id))
            .json(input)?;
        self.send(request, format!("Failed to create {}", K::NOUN))
            .await?;
        debug!(kind = K::NOUN, "Created record");
        Ok(())
    }

    pub async fn update<K: RecordKind>(&self, id: i64, input: &K::Update) -> RecordsResult<()> {
        let request = ApiRequest::patch(K::update_path(&self.user_id, id))
            .json(input)?;
        self.send(request, format!("Failed to update {}", K::NOUN))
            .await?;
        debug!(kind = K::NOUN, id, "Updated record");
        Ok(())
    }

    pub async fn delete<K: RecordKind>(&self, id: i64) -> RecordsResult<()> {
        let request = ApiRequest::delete(K::delete_path(&self.user_id, id));
        self.send(request, format!("Failed to delete {}", K::NOUN))
            .await?;
        debug!(kind = K::NOUN, id, "Deleted record");
        Ok(())
    }

    /// Send through the session and turn non-success into [`RecordsError::Api`].
    pub(crate) async fn send(
        &self,
        request: ApiRequest,
        failure: String,
    ) -> RecordsResult<ApiResponse> {
        let response = self.session.authenticated_fetch(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let status = response.status.as_u16();
        let message = response.error_message().unwrap_or(failure);
        warn!(status, message = %message, "Records request failed");
        Err(RecordsError::Api { status, message })
    }
}
