//! Envío de notificaciones
//!
//! El envío (push/email) lo hace un gateway externo. Es fire-and-forget
//! respecto de la transacción de asignación: un fallo de entrega se
//! registra en el log y nunca revierte ni falla la asignación ya
//! confirmada.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Mensaje saliente para el gateway de notificaciones
#[derive(Debug, Clone, Serialize)]
pub struct OutboundNotification {
    pub title: String,
    pub message: String,
    pub email: String,
}

/// Colaborador externo de entrega de notificaciones
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_single(&self, notification: &OutboundNotification) -> Result<()>;
}

/// Sender real: POST al gateway configurado
pub struct PushGatewaySender {
    client: reqwest::Client,
    gateway_url: String,
}

impl PushGatewaySender {
    pub fn new(gateway_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            gateway_url,
        }
    }
}

#[async_trait]
impl NotificationSender for PushGatewaySender {
    async fn send_single(&self, notification: &OutboundNotification) -> Result<()> {
        let response = self
            .client
            .post(&self.gateway_url)
            .json(notification)
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }
}

/// Sender deshabilitado: se usa cuando no hay gateway configurado
pub struct DisabledSender;

#[async_trait]
impl NotificationSender for DisabledSender {
    async fn send_single(&self, notification: &OutboundNotification) -> Result<()> {
        debug!(
            "🔕 Notificación descartada (gateway no configurado): {}",
            notification.title
        );
        Ok(())
    }
}
