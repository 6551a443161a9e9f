//! Tailoring Request Orchestrator — runs one tailoring request at a time.
//!
//! Flow: submit → snapshot résumé/selection/credential → spawn backend call →
//!       on completion, re-lock the workspace and apply the outcome.
//!
//! Each request carries a sequence number. Cancel and reset abort the task and
//! clear the pending slot, so a late completion finds a different (or no)
//! pending sequence and is dropped instead of applied.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::{JobDescription, JobId};
use crate::models::resume::TailoredResume;
use crate::tailoring::tailor::{Tailor, TailorError, TailorErrorKind, TailorRequest};
use crate::workspace::SharedWorkspace;

const DEFAULT_TITLE: &str = "Tailored Resume";

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

/// A non-fatal tailoring failure, kept until the next request or reset.
#[derive(Debug, Clone, Serialize)]
pub struct TailoringFailure {
    pub kind: TailorErrorKind,
    pub message: String,
    pub job_id: JobId,
    pub occurred_at: DateTime<Utc>,
}

struct PendingRequest {
    seq: u64,
    job_id: JobId,
    started_at: DateTime<Utc>,
    abort: AbortHandle,
}

/// Tailoring part of the workspace: the in-flight request and the last outcome.
#[derive(Default)]
pub struct TailoringState {
    next_seq: u64,
    pending: Option<PendingRequest>,
    tailored: Option<TailoredResume>,
    last_error: Option<TailoringFailure>,
}

impl TailoringState {
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    fn begin(&mut self, seq: u64, job_id: JobId, abort: AbortHandle) {
        self.last_error = None;
        self.pending = Some(PendingRequest {
            seq,
            job_id,
            started_at: Utc::now(),
            abort,
        });
    }

    fn allocate_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Applies an outcome if `seq` is still the pending request.
    /// Returns `None` when the outcome is stale and was dropped.
    fn complete(
        &mut self,
        seq: u64,
        job: &JobDescription,
        backend: &str,
        outcome: &Result<String, TailorError>,
    ) -> Option<Result<TailoredResume, TailorError>> {
        match &self.pending {
            Some(pending) if pending.seq == seq => {}
            _ => return None,
        }
        self.pending = None;

        match outcome {
            Ok(text) => {
                let tailored = TailoredResume {
                    text: text.clone(),
                    job_id: job.id.clone(),
                    company: job.company.clone(),
                    position: job.position.clone(),
                    backend: backend.to_string(),
                    generated_at: Utc::now(),
                };
                self.tailored = Some(tailored.clone());
                self.last_error = None;
                Some(Ok(tailored))
            }
            Err(e) => {
                self.last_error = Some(TailoringFailure {
                    kind: e.kind(),
                    message: e.to_string(),
                    job_id: job.id.clone(),
                    occurred_at: Utc::now(),
                });
                Some(Err(e.clone()))
            }
        }
    }

    /// Aborts the in-flight request, if any.
    fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.abort.abort();
                true
            }
            None => false,
        }
    }

    fn clear_output(&mut self) {
        self.tailored = None;
        self.last_error = None;
    }
}

/// Snapshot returned by every tailoring endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TailoringStatus {
    pub busy: bool,
    pub can_submit: bool,
    pub pending_job_id: Option<JobId>,
    pub started_at: Option<DateTime<Utc>>,
    pub title: String,
    pub tailored: Option<TailoredResume>,
    pub last_error: Option<TailoringFailure>,
}

impl TailoringStatus {
    pub fn new(state: &TailoringState, has_selection: bool) -> Self {
        let pending = state.pending.as_ref();
        Self {
            busy: pending.is_some(),
            can_submit: pending.is_none() && has_selection,
            pending_job_id: pending.map(|p| p.job_id.clone()),
            started_at: pending.map(|p| p.started_at),
            title: state
                .tailored
                .as_ref()
                .map(TailoredResume::title)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            tailored: state.tailored.clone(),
            last_error: state.last_error.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// An accepted submission. Awaiting [`Submission::outcome`] is optional; the
/// request runs to completion either way.
pub struct Submission {
    pub status: TailoringStatus,
    outcome: oneshot::Receiver<Result<TailoredResume, TailorError>>,
}

impl Submission {
    /// Waits for the request to resolve.
    pub async fn outcome(self) -> Result<TailoredResume, AppError> {
        match self.outcome.await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AppError::Conflict(
                "tailoring request was cancelled".to_string(),
            )),
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    workspace: SharedWorkspace,
    tailor: Arc<dyn Tailor>,
}

impl Orchestrator {
    pub fn new(workspace: SharedWorkspace, tailor: Arc<dyn Tailor>) -> Self {
        Self { workspace, tailor }
    }

    pub fn backend(&self) -> &'static str {
        self.tailor.name()
    }

    pub async fn status(&self) -> TailoringStatus {
        self.workspace.lock().await.tailoring_status()
    }

    /// Starts a tailoring request for the selected job description.
    ///
    /// Refused with `Conflict` when nothing is selected or a request is
    /// already pending.
    pub async fn submit(&self) -> Result<Submission, AppError> {
        let mut ws = self.workspace.lock().await;

        if ws.tailoring.is_busy() {
            return Err(AppError::Conflict(
                "a tailoring request is already in progress".to_string(),
            ));
        }
        let job = ws.registry.selected().cloned().ok_or_else(|| {
            AppError::Conflict("select a job description before tailoring".to_string())
        })?;

        let request = TailorRequest {
            resume: ws.resume.text().to_string(),
            job,
            credential: ws.credential.get().map(str::to_string),
        };
        let seq = ws.tailoring.allocate_seq();
        let job_id = request.job.id.clone();
        let (tx, rx) = oneshot::channel();

        let tailor = Arc::clone(&self.tailor);
        let workspace = Arc::clone(&self.workspace);
        // The task cannot apply its outcome before `begin` below: it needs the
        // workspace lock, which is held until this function returns.
        let handle = tokio::spawn(async move {
            let outcome = tailor.tailor(&request).await;
            let mut ws = workspace.lock().await;
            match ws
                .tailoring
                .complete(seq, &request.job, tailor.name(), &outcome)
            {
                Some(applied) => {
                    match &applied {
                        Ok(_) => info!("Tailoring #{seq} for {} succeeded", request.job.label()),
                        Err(e) => warn!("Tailoring #{seq} for {} failed: {e}", request.job.label()),
                    }
                    let _ = tx.send(applied);
                }
                None => info!("Dropping stale tailoring result #{seq}"),
            }
        });

        ws.tailoring.begin(seq, job_id.clone(), handle.abort_handle());
        info!("Tailoring #{seq} started for job {job_id} ({})", self.tailor.name());

        Ok(Submission {
            status: ws.tailoring_status(),
            outcome: rx,
        })
    }

    /// Submits and waits: resolves to the tailored résumé or the classified error.
    pub async fn run(&self) -> Result<TailoredResume, AppError> {
        self.submit().await?.outcome().await
    }

    /// Aborts the in-flight request. Returns whether one was pending.
    pub async fn cancel(&self) -> (bool, TailoringStatus) {
        let mut ws = self.workspace.lock().await;
        let cancelled = ws.tailoring.cancel();
        if cancelled {
            info!("Tailoring request cancelled");
        }
        (cancelled, ws.tailoring_status())
    }

    /// Aborts the in-flight request and clears the displayed result and error.
    /// Entered résumé, jobs, selection, and credential are kept.
    pub async fn reset(&self) -> TailoringStatus {
        let mut ws = self.workspace.lock().await;
        ws.tailoring.cancel();
        ws.tailoring.clear_output();
        info!("Tailoring output reset");
        ws.tailoring_status()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::tailoring::tailor::StubTailor;
    use crate::workspace::{self, Workspace};

    const STUB_DELAY: Duration = Duration::from_secs(2);

    /// Always fails with the given error after the same delay as the stub.
    struct FailingTailor(TailorError);

    #[async_trait]
    impl Tailor for FailingTailor {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn tailor(&self, _request: &TailorRequest) -> Result<String, TailorError> {
            tokio::time::sleep(STUB_DELAY).await;
            Err(self.0.clone())
        }
    }

    async fn setup(tailor: Arc<dyn Tailor>) -> (SharedWorkspace, Orchestrator) {
        let shared = workspace::shared(Workspace::new("unused-credential"));
        {
            let mut ws = shared.lock().await;
            ws.resume.save("R".to_string());
            let id = ws
                .registry
                .add("Acme".to_string(), "Engineer".to_string(), "D".to_string())
                .map(|job| job.id.clone())
                .unwrap();
            ws.registry.select(id.as_str()).unwrap();
        }
        let orchestrator = Orchestrator::new(shared.clone(), tailor);
        (shared, orchestrator)
    }

    fn stub() -> Arc<dyn Tailor> {
        Arc::new(StubTailor::new(STUB_DELAY))
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_yields_placeholder_for_selected_job() {
        let (_, orchestrator) = setup(stub()).await;
        let tailored = orchestrator.run().await.unwrap();
        assert!(!tailored.text.is_empty());
        assert!(tailored.text.contains("Acme"));
        assert!(tailored.text.contains("Engineer"));
        assert_eq!(tailored.company, "Acme");
        assert_eq!(tailored.title(), "My Resume for Acme");

        let status = orchestrator.status().await;
        assert!(!status.busy);
        assert!(status.can_submit);
        assert_eq!(status.tailored, Some(tailored));
        assert_eq!(status.title, "My Resume for Acme");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_without_selection_is_refused() {
        let (shared, orchestrator) = setup(stub()).await;
        shared.lock().await.registry.select("").unwrap();

        assert!(!orchestrator.status().await.can_submit);
        let err = orchestrator.submit().await.err().unwrap();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(!orchestrator.status().await.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_while_pending_is_refused() {
        let (_, orchestrator) = setup(stub()).await;
        let first = orchestrator.submit().await.unwrap();
        assert!(first.status.busy);
        assert!(!first.status.can_submit);

        let err = orchestrator.submit().await.err().unwrap();
        assert!(matches!(err, AppError::Conflict(_)));

        first.outcome().await.unwrap();
        assert!(orchestrator.status().await.can_submit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_result() {
        let (_, orchestrator) = setup(stub()).await;
        let submission = orchestrator.submit().await.unwrap();

        let (cancelled, status) = orchestrator.cancel().await;
        assert!(cancelled);
        assert!(!status.busy);

        let err = submission.outcome().await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        tokio::time::sleep(STUB_DELAY * 2).await;
        let status = orchestrator.status().await;
        assert!(status.tailored.is_none());
        assert_eq!(status.title, DEFAULT_TITLE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_when_idle_reports_nothing_cancelled() {
        let (_, orchestrator) = setup(stub()).await;
        let (cancelled, _) = orchestrator.cancel().await;
        assert!(!cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_previous_result_and_pending() {
        let (shared, orchestrator) = setup(stub()).await;
        orchestrator.run().await.unwrap();

        let _pending = orchestrator.submit().await.unwrap();
        let status = orchestrator.reset().await;
        assert!(!status.busy);
        assert!(status.tailored.is_none());

        tokio::time::sleep(STUB_DELAY * 2).await;
        assert!(orchestrator.status().await.tailored.is_none());

        // Entered data survives a reset.
        let ws = shared.lock().await;
        assert_eq!(ws.resume.text(), "R");
        assert!(ws.registry.selected().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_from_cancelled_request_is_not_applied_to_next() {
        let (_, orchestrator) = setup(stub()).await;
        let _first = orchestrator.submit().await.unwrap();
        tokio::time::sleep(STUB_DELAY / 2).await;
        orchestrator.cancel().await;

        let second = orchestrator.submit().await.unwrap();
        let tailored = second.outcome().await.unwrap();
        assert_eq!(orchestrator.status().await.tailored, Some(tailored));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_non_fatal_and_keeps_data() {
        let (shared, orchestrator) = setup(stub()).await;
        let previous = orchestrator.run().await.unwrap();

        let failing = Orchestrator::new(
            shared.clone(),
            Arc::new(FailingTailor(TailorError::Network("connection reset".to_string()))),
        );
        let err = failing.run().await.unwrap_err();
        assert!(matches!(err, AppError::Tailoring(TailorError::Network(_))));

        let status = failing.status().await;
        assert!(!status.busy);
        assert!(status.can_submit);
        assert_eq!(status.tailored, Some(previous));
        let failure = status.last_error.unwrap();
        assert_eq!(failure.kind, TailorErrorKind::Network);

        let ws = shared.lock().await;
        assert_eq!(ws.resume.text(), "R");
        assert_eq!(ws.registry.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_retry_clears_last_error() {
        let (shared, _) = setup(stub()).await;
        let failing = Orchestrator::new(
            shared.clone(),
            Arc::new(FailingTailor(TailorError::MissingCredential)),
        );
        failing.run().await.unwrap_err();

        let working = Orchestrator::new(shared, stub());
        working.run().await.unwrap();
        assert!(working.status().await.last_error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_keeps_company_after_job_removed() {
        let (shared, orchestrator) = setup(stub()).await;
        let submission = orchestrator.submit().await.unwrap();
        {
            let mut ws = shared.lock().await;
            let id = ws.registry.list()[0].id.clone();
            ws.registry.remove(&id);
        }
        let tailored = submission.outcome().await.unwrap();
        assert_eq!(tailored.company, "Acme");
        assert!(!orchestrator.status().await.can_submit);
    }
}
