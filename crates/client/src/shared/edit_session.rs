use std::sync::{Mutex, MutexGuard};

use contracts::domain::common::Resource;

use crate::shared::error::ApiError;
use crate::shared::resource_client::ResourceClient;

/// Состояние формы редактирования
#[derive(Debug, Clone, PartialEq)]
pub enum EditState<R> {
    Idle,
    Editing { draft: R, error: Option<String> },
    Submitting { draft: R },
}

/// Create/edit cycle for one record:
/// `Idle -> Editing -> Submitting -> (Idle | Editing with error)`.
///
/// Nothing is changed locally until the backend accepts the save.
pub struct EditSession<R: Resource> {
    state: Mutex<EditState<R>>,
}

impl<R: Resource> Default for EditSession<R> {
    fn default() -> Self {
        Self {
            state: Mutex::new(EditState::Idle),
        }
    }
}

impl<R: Resource> EditSession<R> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EditState<R>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> EditState<R> {
        self.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(*self.lock(), EditState::Submitting { .. })
    }

    pub fn error(&self) -> Option<String> {
        match &*self.lock() {
            EditState::Editing { error, .. } => error.clone(),
            _ => None,
        }
    }

    /// Open the form for a record that does not exist yet
    pub fn open_new(&self, draft: R) {
        *self.lock() = EditState::Editing { draft, error: None };
    }

    /// Open the form pre-filled with a loaded record
    pub fn open_existing(&self, record: R) {
        self.open_new(record);
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut R)) -> Result<(), ApiError> {
        match &mut *self.lock() {
            EditState::Editing { draft, .. } => {
                edit(draft);
                Ok(())
            }
            EditState::Submitting { .. } => Err(ApiError::Validation("Guardado en curso".into())),
            EditState::Idle => Err(ApiError::Validation("No hay formulario abierto".into())),
        }
    }

    /// Close the form. Ignored while a save is in flight.
    pub fn cancel(&self) {
        let mut state = self.lock();
        if !matches!(*state, EditState::Submitting { .. }) {
            *state = EditState::Idle;
        }
    }

    /// Validate and save the draft. On success the form closes; on failure it
    /// stays open with the error message and the draft untouched.
    pub async fn submit(&self, client: &ResourceClient<R>) -> Result<R, ApiError> {
        let draft = {
            let mut state = self.lock();
            let (draft, error) = match &mut *state {
                EditState::Editing { draft, error } => (draft, error),
                EditState::Submitting { .. } => {
                    tracing::warn!("{}: duplicate submit ignored", R::collection_name());
                    return Err(ApiError::Validation("Guardado en curso".into()));
                }
                EditState::Idle => {
                    return Err(ApiError::Validation("No hay formulario abierto".into()));
                }
            };
            if let Err(message) = draft.validate() {
                *error = Some(message.clone());
                return Err(ApiError::Validation(message));
            }
            let draft = draft.clone();
            *state = EditState::Submitting {
                draft: draft.clone(),
            };
            draft
        };

        let result = client.save(&draft).await;

        let mut state = self.lock();
        match &result {
            Ok(_) => *state = EditState::Idle,
            Err(e) => {
                tracing::error!("{}: save failed: {}", R::collection_name(), e);
                *state = EditState::Editing {
                    draft,
                    error: Some(e.user_message()),
                };
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::http::fake::FakeTransport;
    use crate::shared::http::Method;
    use crate::shared::resource_client::test_support::client;
    use contracts::domain::a006_zone::Zone;
    use contracts::shared::{RawRecord, RecordId};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn zone(value: Value) -> Zone {
        Zone::from_record(&RawRecord::from_value(value))
    }

    #[tokio::test]
    async fn test_validation_failure_stays_editing_without_request() {
        let fake = FakeTransport::new();
        let zones = client::<Zone>(&fake).await;
        let session = EditSession::new();
        session.open_new(zone(json!({})));

        let err = session.submit(&zones).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(session.error().is_some());
        assert!(matches!(session.state(), EditState::Editing { .. }));
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_returns_to_idle() {
        let fake = FakeTransport::new();
        fake.on(Method::Put, "zonas/3/", 200, json!({"id": 3, "nombre": "Piscina norte"}));
        let zones = client::<Zone>(&fake).await;
        let session = EditSession::new();
        session.open_existing(zone(json!({"id": 3, "nombre": "Piscina"})));
        session.update_draft(|z| z.name = "Piscina norte".into()).unwrap();

        let saved = session.submit(&zones).await.unwrap();
        assert_eq!(saved.id, Some(RecordId::Int(3)));
        assert_eq!(session.state(), EditState::Idle);
        let body = fake.last(Method::Put, "zonas/3/").and_then(|c| c.body).unwrap();
        assert_eq!(body["nombre"], json!("Piscina norte"));
    }

    #[tokio::test]
    async fn test_failure_reopens_with_backend_message() {
        let fake = FakeTransport::new();
        fake.on(Method::Post, "zonas/", 400, json!({"nombre": ["ya existe"]}));
        let zones = client::<Zone>(&fake).await;
        let session = EditSession::new();
        session.open_new(zone(json!({"nombre": "Piscina"})));

        assert!(session.submit(&zones).await.is_err());
        match session.state() {
            EditState::Editing { draft, error } => {
                assert_eq!(draft.name, "Piscina");
                assert!(error.unwrap().contains("ya existe"));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_submit_is_rejected_while_in_flight() {
        let fake = FakeTransport::new();
        let gate = Arc::new(Notify::new());
        fake.on_gated(Method::Post, "zonas/", 201, json!({"id": 1, "nombre": "Sauna"}), gate.clone());
        let zones = client::<Zone>(&fake).await;
        let session = EditSession::new();
        session.open_new(zone(json!({"nombre": "Sauna"})));

        let second = async {
            tokio::task::yield_now().await;
            assert!(session.is_submitting());
            let result = session.submit(&zones).await;
            gate.notify_one();
            result
        };
        let (first, second) = tokio::join!(session.submit(&zones), second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(ApiError::Validation(_))));
        assert_eq!(fake.count(Method::Post, "zonas/"), 1);
        assert_eq!(session.state(), EditState::Idle);
    }

    #[test]
    fn test_cancel_and_idle_guards() {
        let session: EditSession<Zone> = EditSession::new();
        assert!(session.update_draft(|_| {}).is_err());
        session.open_new(zone(json!({"nombre": "Sauna"})));
        session.cancel();
        assert_eq!(session.state(), EditState::Idle);
    }
}
