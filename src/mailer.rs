//! Activation mail seam.
//!
//! Actual email delivery belongs to the host application; this crate only
//! hands the activation link over the trait boundary.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::models::AuthError;

#[async_trait]
pub trait ActivationMailer: Send + Sync {
    async fn send_activation(
        &self,
        email: &str,
        username: &str,
        activation_url: &str,
    ) -> Result<(), AuthError>;
}

pub type DynActivationMailer = Arc<dyn ActivationMailer>;

/// Logs the activation link instead of delivering it. Useful for local
/// development and as the default until a real mailer is injected.
pub struct LogMailer;

#[async_trait]
impl ActivationMailer for LogMailer {
    async fn send_activation(
        &self,
        email: &str,
        username: &str,
        activation_url: &str,
    ) -> Result<(), AuthError> {
        info!(
            email = %email,
            username = %username,
            activation_url = %activation_url,
            "activation mail (log-only delivery)"
        );
        Ok(())
    }
}
