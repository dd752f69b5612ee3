//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::assignment::AssignmentConfig;
use crate::config::environment::EnvironmentConfig;
use crate::services::notification_sender::{
    DisabledSender, NotificationSender, PushGatewaySender,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub assignment: AssignmentConfig,
    pub notifier: Arc<dyn NotificationSender>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, assignment: AssignmentConfig) -> Self {
        let notifier: Arc<dyn NotificationSender> = match &assignment.notify_gateway_url {
            Some(url) => Arc::new(PushGatewaySender::new(url.clone())),
            None => Arc::new(DisabledSender),
        };

        Self {
            pool,
            config,
            assignment,
            notifier,
        }
    }
}
