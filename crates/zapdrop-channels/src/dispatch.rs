//! One firing of a dispatch job: resolve each target, send the attachment
//! with its caption, throttle between sends, then remove the file.
//!
//! Failure policy (per target vs per firing):
//! - a resolution miss skips that target and continues;
//! - a transport error (listing or send) aborts the remaining targets;
//! - the attachment is removed exactly once after the loop ends, whether
//!   zero, some, or all targets succeeded.

use std::time::Duration;

use tracing::{error, info, warn};

use zapdrop_core::action::DispatchAction;

use crate::{channel::ChatTransport, directory, error::ChannelError};

/// Outcome of a single firing — consumed by logs and tests; nothing is
/// reported back to the registrant (fire-and-forget).
#[derive(Debug, Default)]
pub struct FiringReport {
    /// Targets that received the attachment, in send order.
    pub sent: Vec<String>,
    /// Targets skipped because no chat matched.
    pub skipped: Vec<String>,
    /// Transport error that aborted the remaining targets, if any.
    pub aborted: Option<String>,
    /// Whether the attachment file was removed during cleanup.
    pub cleaned_up: bool,
}

/// Execute one firing of `action` against `transport`.
///
/// `send_delay` separates the end of one successful send from the start of
/// the next target. Cleanup always runs, including after an abort.
pub async fn run_firing(
    transport: &dyn ChatTransport,
    action: &DispatchAction,
    send_delay: Duration,
) -> FiringReport {
    let mut report = deliver_all(transport, action, send_delay).await;
    report.cleaned_up = remove_attachment(action);
    report
}

async fn deliver_all(
    transport: &dyn ChatTransport,
    action: &DispatchAction,
    send_delay: Duration,
) -> FiringReport {
    let mut report = FiringReport::default();
    let last = action.targets.len().saturating_sub(1);

    for (i, target) in action.targets.iter().enumerate() {
        let chat = match directory::resolve(transport, target).await {
            Ok(Some(chat)) => chat,
            Ok(None) => {
                let miss = ChannelError::ChatNotFound {
                    name: target.clone(),
                };
                warn!(target = %target, error = %miss, "skipping target");
                report.skipped.push(target.clone());
                continue;
            }
            Err(e) => {
                error!(target = %target, error = %e, "chat listing failed, aborting firing");
                report.aborted = Some(e.to_string());
                break;
            }
        };

        let doc = crate::types::OutboundDocument {
            chat_id: chat.id.clone(),
            caption: action.caption.clone(),
            path: action.attachment.clone(),
        };

        match transport.send_document(&doc).await {
            Ok(()) => {
                info!(target = %target, chat_id = %chat.id, "attachment sent");
                report.sent.push(target.clone());
                // Throttle before the next target. Targets are processed one
                // at a time, in registration order; no parallel fan-out.
                if i < last {
                    tokio::time::sleep(send_delay).await;
                }
            }
            Err(e) => {
                error!(target = %target, error = %e, "send failed, aborting firing");
                report.aborted = Some(e.to_string());
                break;
            }
        }
    }

    report
}

/// Remove the attachment file. Missing files are logged, not fatal: a daily
/// trigger outlives its attachment, so every firing after the first finds
/// nothing to delete.
fn remove_attachment(action: &DispatchAction) -> bool {
    match std::fs::remove_file(&action.attachment) {
        Ok(()) => {
            info!(path = %action.attachment.display(), "attachment removed after firing");
            true
        }
        Err(e) => {
            warn!(
                path = %action.attachment.display(),
                error = %e,
                "attachment cleanup failed"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelError;
    use crate::types::{Chat, ChannelStatus, OutboundDocument};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct MockTransport {
        chats: Vec<Chat>,
        sends: Mutex<Vec<(String, Instant)>>,
        fail_send_to: Option<String>,
        fail_listing: bool,
    }

    impl MockTransport {
        fn with_chats(names: &[&str]) -> Self {
            let chats = names
                .iter()
                .enumerate()
                .map(|(i, n)| Chat {
                    id: format!("{i}@g.us"),
                    name: (*n).to_string(),
                })
                .collect();
            Self {
                chats,
                sends: Mutex::new(Vec::new()),
                fail_send_to: None,
                fail_listing: false,
            }
        }

        fn sent_ids(&self) -> Vec<String> {
            self.sends
                .lock()
                .unwrap()
                .iter()
                .map(|(id, _)| id.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ChatTransport for MockTransport {
        fn name(&self) -> &str {
            "mock"
        }

        async fn probe(&self) -> Result<(), ChannelError> {
            Ok(())
        }

        async fn list_chats(&self) -> Result<Vec<Chat>, ChannelError> {
            if self.fail_listing {
                return Err(ChannelError::ConnectionFailed("listing down".into()));
            }
            Ok(self.chats.clone())
        }

        async fn send_document(&self, doc: &OutboundDocument) -> Result<(), ChannelError> {
            if let Some(ref bad) = self.fail_send_to {
                if doc.chat_id == *bad {
                    return Err(ChannelError::SendFailed("rejected".into()));
                }
            }
            self.sends
                .lock()
                .unwrap()
                .push((doc.chat_id.clone(), Instant::now()));
            Ok(())
        }

        fn status(&self) -> ChannelStatus {
            ChannelStatus::Connected
        }
    }

    fn temp_attachment(tag: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("zapdrop-dispatch-{tag}.pdf"));
        std::fs::write(&path, b"%PDF-1.4 test").unwrap();
        path
    }

    fn action(targets: &[&str], path: PathBuf) -> DispatchAction {
        DispatchAction {
            targets: targets.iter().map(|s| s.to_string()).collect(),
            caption: "Hello".into(),
            attachment: path,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn all_targets_resolvable_sends_in_order_and_cleans_up() {
        let transport = MockTransport::with_chats(&["Family", "Work"]);
        let path = temp_attachment("all-ok");
        let action = action(&["Family", "Work"], path.clone());

        let report = run_firing(&transport, &action, Duration::from_secs(10)).await;

        assert_eq!(report.sent, vec!["Family", "Work"]);
        assert!(report.skipped.is_empty());
        assert!(report.aborted.is_none());
        assert_eq!(transport.sent_ids(), vec!["0@g.us", "1@g.us"]);
        assert!(report.cleaned_up);
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn sends_are_separated_by_the_configured_delay() {
        let transport = MockTransport::with_chats(&["Family", "Work", "Friends"]);
        let path = temp_attachment("throttle");
        let action = action(&["Family", "Work", "Friends"], path);

        run_firing(&transport, &action, Duration::from_secs(10)).await;

        let sends = transport.sends.lock().unwrap();
        assert_eq!(sends.len(), 3);
        for pair in sends.windows(2) {
            let gap = pair[1].1.duration_since(pair[0].1);
            assert!(gap >= Duration::from_secs(10), "gap was {gap:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unresolvable_target_is_skipped_order_preserved() {
        let transport = MockTransport::with_chats(&["Family", "Work"]);
        let path = temp_attachment("skip");
        let action = action(&["Family", "Ghost", "Work"], path.clone());

        let report = run_firing(&transport, &action, Duration::from_secs(10)).await;

        assert_eq!(report.sent, vec!["Family", "Work"]);
        assert_eq!(report.skipped, vec!["Ghost"]);
        assert!(report.aborted.is_none());
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn sole_unresolvable_target_sends_nothing_but_still_cleans_up() {
        let transport = MockTransport::with_chats(&["Family"]);
        let path = temp_attachment("ghost-only");
        let action = action(&["Ghost"], path.clone());

        let report = run_firing(&transport, &action, Duration::from_secs(10)).await;

        assert!(report.sent.is_empty());
        assert_eq!(report.skipped, vec!["Ghost"]);
        assert!(report.cleaned_up);
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn send_failure_aborts_remaining_targets_cleanup_still_runs() {
        let mut transport = MockTransport::with_chats(&["Family", "Work", "Friends"]);
        transport.fail_send_to = Some("1@g.us".into()); // "Work"
        let path = temp_attachment("abort");
        let action = action(&["Family", "Work", "Friends"], path.clone());

        let report = run_firing(&transport, &action, Duration::from_secs(10)).await;

        assert_eq!(report.sent, vec!["Family"]);
        assert!(report.aborted.is_some());
        // "Friends" was never attempted.
        assert_eq!(transport.sent_ids(), vec!["0@g.us"]);
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn listing_failure_aborts_firing_cleanup_still_runs() {
        let mut transport = MockTransport::with_chats(&["Family"]);
        transport.fail_listing = true;
        let path = temp_attachment("listing-down");
        let action = action(&["Family"], path.clone());

        let report = run_firing(&transport, &action, Duration::from_secs(10)).await;

        assert!(report.sent.is_empty());
        assert!(report.aborted.is_some());
        assert!(!path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_attachment_cleanup_is_not_fatal() {
        let transport = MockTransport::with_chats(&["Family"]);
        let path = std::env::temp_dir().join("zapdrop-dispatch-never-created.pdf");
        let action = action(&["Family"], path);

        let report = run_firing(&transport, &action, Duration::from_secs(10)).await;

        assert_eq!(report.sent, vec!["Family"]);
        assert!(!report.cleaned_up);
    }
}
