//! Modelo de Notification
//!
//! Las notificaciones se persisten dentro de la misma transacción que la
//! asignación; el envío (push/email) lo hace un colaborador externo
//! después del commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification - mapea a la tabla notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Crear una notificación nueva sin leer
    pub fn new(user_id: Uuid, title: String, message: String, tags: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            message,
            read: false,
            tags,
            created_at: Utc::now(),
        }
    }
}
