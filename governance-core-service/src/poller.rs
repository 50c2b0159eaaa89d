use std::time::Duration;

use governance_core_api::{ActorContext, ApprovalStatus, GovernanceError, GovernanceResult};
use governance_core_db::repository::UnitOfWork;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::governance_service::GovernanceService;

/// Live view of a polled approval request. Polling stops when the handle is dropped.
#[derive(Debug)]
pub struct PollHandle {
    receiver: watch::Receiver<ApprovalStatus>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Latest observed status.
    pub fn status(&self) -> ApprovalStatus {
        *self.receiver.borrow()
    }

    /// Waits for the next status change. Fails once polling has ended.
    pub async fn changed(&mut self) -> Result<ApprovalStatus, watch::error::RecvError> {
        self.receiver.changed().await?;
        Ok(*self.receiver.borrow_and_update())
    }

    /// Whether the background poll has stopped (terminal status, request gone or aborted).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Periodic status refresh for callers that need to follow a request.
pub struct StatusPoller<U: UnitOfWork> {
    service: GovernanceService<U>,
}

impl<U: UnitOfWork + 'static> StatusPoller<U> {
    pub fn new(service: GovernanceService<U>) -> Self {
        Self { service }
    }

    /// Polls at the configured default interval.
    pub async fn watch(&self, actor: ActorContext, id: Uuid) -> GovernanceResult<PollHandle> {
        let interval = self.service.config().poll_interval();
        self.watch_approval(actor, id, interval).await
    }

    /// Reads the request once, then re-reads it every `interval` until it becomes
    /// terminal. Errors of the first read are returned; later read errors are
    /// logged and retried on the next tick.
    pub async fn watch_approval(
        &self,
        actor: ActorContext,
        id: Uuid,
        interval: Duration,
    ) -> GovernanceResult<PollHandle> {
        if interval.is_zero() {
            return Err(GovernanceError::Validation(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        let initial = self.service.query_approval(&actor, id).await?.status;
        let (sender, receiver) = watch::channel(initial);

        let service = self.service.clone();
        let task = tokio::spawn(async move {
            if initial.is_terminal() {
                return;
            }
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let status = match service.query_approval(&actor, id).await {
                    Ok(request) => request.status,
                    Err(GovernanceError::NotFound(_)) => {
                        debug!(request_id = %id, "Polled request no longer visible");
                        break;
                    }
                    Err(err) => {
                        warn!(request_id = %id, error = %err, "Status poll failed");
                        continue;
                    }
                };
                sender.send_if_modified(|current| {
                    if *current == status {
                        false
                    } else {
                        *current = status;
                        true
                    }
                });
                if status.is_terminal() || sender.is_closed() {
                    break;
                }
            }
        });

        Ok(PollHandle { receiver, task })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::*;
    use governance_core_api::StageMutationCommand;
    use serde_json::json;

    const TICK: Duration = Duration::from_millis(10);

    async fn staged_plant(h: &Harness) -> Uuid {
        h.service
            .stage_mutation(
                &requester(),
                StageMutationCommand::create("plant", "plant", json!({"plant_name": "NASHIK"})),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_poller_observes_decision() {
        let h = Harness::new();
        let id = staged_plant(&h).await;
        let poller = StatusPoller::new(h.service.clone());

        let mut handle = poller.watch_approval(requester(), id, TICK).await.unwrap();
        assert_eq!(handle.status(), ApprovalStatus::Pending);

        h.service
            .approve(&approver(MASTER_DATA_APPROVER), id, None)
            .await
            .unwrap();

        let observed = tokio::time::timeout(Duration::from_secs(5), handle.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(observed, ApprovalStatus::Approved);

        tokio::time::sleep(TICK * 5).await;
        assert!(handle.is_finished());
    }

    #[tokio::test]
    async fn test_terminal_request_is_not_polled() {
        let h = Harness::new();
        let id = staged_plant(&h).await;
        h.service
            .reject(
                &approver(MASTER_DATA_APPROVER),
                id,
                governance_core_api::RejectCommand::new("Duplicate"),
            )
            .await
            .unwrap();

        let mut handle = StatusPoller::new(h.service.clone())
            .watch(requester(), id)
            .await
            .unwrap();
        assert_eq!(handle.status(), ApprovalStatus::Rejected);
        assert!(handle.changed().await.is_err());
    }

    #[tokio::test]
    async fn test_watch_rejects_bad_input() {
        let h = Harness::new();
        let poller = StatusPoller::new(h.service.clone());

        let result = poller.watch_approval(requester(), Uuid::new_v4(), TICK).await;
        assert!(matches!(result, Err(GovernanceError::NotFound(_))));

        let id = staged_plant(&h).await;
        let result = poller.watch_approval(requester(), id, Duration::ZERO).await;
        assert!(matches!(result, Err(GovernanceError::Validation(_))));
    }
}
