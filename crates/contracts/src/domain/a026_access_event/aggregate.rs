use serde::{Deserialize, Serialize};

use crate::shared::field_adapter::RawRecord;
use crate::shared::record_id::RecordId;

const METHOD: &[&str] = &["metodo", "method"];
const USERNAME: &[&str] = &["usuario_username", "username"];
const USER: &[&str] = &["usuario", "user", "usuario_id"];
const SCORE: &[&str] = &["score", "similarity", "distancia"];
const SUCCESS: &[&str] = &["exito", "success", "match"];
const TERMINAL: &[&str] = &["terminal_nombre", "terminal"];
const CREATED_AT: &[&str] = &["creado_en", "created_at", "fecha"];

/// Similarity a face must reach to count as a match
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Событие доступа, записанное терминалом распознавания лиц
///
/// Events are written by terminals, so the client only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AccessEvent {
    pub id: Option<RecordId>,
    pub method: String,
    pub username: Option<String>,
    pub user: Option<RecordId>,
    pub score: Option<f64>,
    pub success: bool,
    pub terminal: String,
    pub created_at: Option<String>,
}

impl AccessEvent {
    pub fn from_record(raw: &RawRecord) -> Self {
        Self {
            id: raw.pick_id(&["id", "uuid", "pk"]),
            method: raw.pick_str(METHOD, ""),
            username: raw.pick_opt_str(USERNAME),
            user: raw.pick_ref(USER).map(|r| r.id),
            score: raw.pick_opt_f64(SCORE),
            success: raw.pick_bool(SUCCESS, false),
            terminal: raw.pick_str(TERMINAL, ""),
            created_at: raw.pick_opt_str(CREATED_AT),
        }
    }

    /// Username for the events table, `—` when nobody was recognized
    pub fn user_display(&self) -> String {
        self.username.clone().unwrap_or_else(|| "—".to_string())
    }
}

/// Body of an identify (1:N) or verify (1:1) request.
///
/// Either a base64 image or a precomputed embedding is required; `usuario`
/// is set only when verifying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usuario: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_b64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
    pub threshold: f64,
}

impl FaceMatchRequest {
    pub fn from_image(image_b64: impl Into<String>) -> Self {
        Self {
            usuario: None,
            image_b64: Some(image_b64.into()),
            embedding: None,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn from_embedding(embedding: Vec<f64>) -> Self {
        Self {
            usuario: None,
            image_b64: None,
            embedding: Some(embedding),
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn for_user(mut self, user: RecordId) -> Self {
        self.usuario = Some(user);
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let has_image = self.image_b64.as_deref().is_some_and(|i| !i.trim().is_empty());
        let has_embedding = self.embedding.as_deref().is_some_and(|e| !e.is_empty());
        if !has_image && !has_embedding {
            return Err("Se requiere una imagen o un embedding".into());
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err("El umbral debe estar entre 0 y 1".into());
        }
        Ok(())
    }
}
