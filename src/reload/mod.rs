//! Service reload trigger.
//!
//! # Responsibilities
//! - Restart the dependent podsync service so it rereads its config
//! - Clear the pending-change tracker only after a confirmed restart
//!
//! # Design Decisions
//! - The restart has its own timeout; a timed-out restart is a failure
//! - On failure pending changes are kept so the operator can retry

pub mod command;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::changes::ChangeLog;
use crate::observability::metrics;

pub use command::CommandReloader;

/// Errors from a reload attempt.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reload exited with {status}: {output}")]
    Failed { status: String, output: String },

    #[error("reload timed out after {0:?}")]
    Timeout(Duration),
}

/// Something that can restart the dependent service.
#[async_trait]
pub trait ServiceReloader: Send + Sync {
    /// Name of the restarted process or container, for messages.
    fn target(&self) -> &str;

    async fn reload(&self) -> Result<(), ReloadError>;
}

/// Reload the service and, on success, clear the changes that were pending
/// when it started. Changes recorded while the reload runs stay pending,
/// since the service may have read its config before they were written.
pub async fn reload_and_clear(
    reloader: &dyn ServiceReloader,
    changes: &ChangeLog,
) -> Result<(), ReloadError> {
    let pending = changes.len();
    tracing::info!(target_service = %reloader.target(), pending, "Reloading service");

    match reloader.reload().await {
        Ok(()) => {
            changes.clear_first(pending);
            metrics::record_reload("ok");
            tracing::info!(
                target_service = %reloader.target(),
                applied = pending,
                still_pending = changes.len(),
                "Service reloaded"
            );
            Ok(())
        }
        Err(e) => {
            metrics::record_reload(match e {
                ReloadError::Timeout(_) => "timeout",
                _ => "error",
            });
            tracing::error!(target_service = %reloader.target(), error = %e, "Service reload failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ChangeRecord;
    use std::sync::Arc;

    struct Fixed(bool);

    #[async_trait]
    impl ServiceReloader for Fixed {
        fn target(&self) -> &str {
            "fixed"
        }

        async fn reload(&self) -> Result<(), ReloadError> {
            if self.0 {
                Ok(())
            } else {
                Err(ReloadError::Failed {
                    status: "exit status: 1".into(),
                    output: String::new(),
                })
            }
        }
    }

    #[tokio::test]
    async fn test_success_clears_changes() {
        let changes = ChangeLog::new();
        changes.add_change(ChangeRecord::added("a"));
        reload_and_clear(&Fixed(true), &changes).await.unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_changes() {
        let changes = ChangeLog::new();
        changes.add_change(ChangeRecord::added("a"));
        assert!(reload_and_clear(&Fixed(false), &changes).await.is_err());
        assert_eq!(changes.len(), 1);
    }

    /// Records an edit while the restart is in flight.
    struct EditDuringRestart(Arc<ChangeLog>);

    #[async_trait]
    impl ServiceReloader for EditDuringRestart {
        fn target(&self) -> &str {
            "racing"
        }

        async fn reload(&self) -> Result<(), ReloadError> {
            self.0.add_change(ChangeRecord::added("late"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_change_recorded_during_reload_stays_pending() {
        let changes = Arc::new(ChangeLog::new());
        changes.add_change(ChangeRecord::added("early"));

        let reloader = EditDuringRestart(changes.clone());
        reload_and_clear(&reloader, &changes).await.unwrap();

        assert_eq!(changes.messages(), vec!["Added feed 'late'".to_string()]);
    }
}
