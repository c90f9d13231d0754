// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Upload -> poll -> fetch state machine.
//!
//! `SubmissionProtocol` lives on the UI thread and owns the
//! `SubmissionState`. Network work runs on a background worker thread
//! which reports `ProtocolEvent`s over a channel; the UI drains them with
//! [`SubmissionProtocol::process_events`] once per frame, so every state
//! transition happens on the UI thread in the order the worker observed it.
//!
//! The poll loop waits `interval` between status checks and never has more
//! than one request in flight. It stops on the first `"done"` status, when
//! the attempt limit is reached, or when the protocol is reset (which drops
//! the cancel channel and wakes the worker out of its wait).

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::client::{ProcessedImages, ProcessingService, UploadRequest};
use super::error::{ApiError, FailureReason};
use crate::config::ServiceConfig;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Uploading,
    Processing,
    Done,
    Failed(FailureReason),
}

impl SubmissionState {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Uploading => "Uploading",
            SubmissionState::Processing => "Processing",
            SubmissionState::Done => "Done",
            SubmissionState::Failed(_) => "Failed",
        }
    }
}

/// How often and how long to poll for completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until the backend reports done.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from(&ServiceConfig::default())
    }
}

impl From<&ServiceConfig> for PollPolicy {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_attempts: config.poll_limit(),
        }
    }
}

/// Message sent from a worker thread back to the protocol.
#[derive(Debug)]
enum ProtocolEvent {
    Uploaded,
    UploadFailed(ApiError),
    Polled { attempt: u32, status: String },
    PollFailed { attempt: u32, error: ApiError },
    Finished { attempt: u32 },
    TimedOut { attempts: u32 },
    Fetched(Result<ProcessedImages, ApiError>),
}

pub struct SubmissionProtocol {
    service: Arc<dyn ProcessingService>,
    policy: PollPolicy,
    state: SubmissionState,
    /// Events from the running submission worker.
    events: Option<Receiver<ProtocolEvent>>,
    /// Dropping this ends the poll loop.
    cancel: Option<Sender<()>>,
    /// Events from the running fetch worker.
    fetch: Option<Receiver<ProtocolEvent>>,
}

impl SubmissionProtocol {
    pub fn new(service: Arc<dyn ProcessingService>, policy: PollPolicy) -> Self {
        Self {
            service,
            policy,
            state: SubmissionState::Idle,
            events: None,
            cancel: None,
            fetch: None,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// True while an upload or poll cycle is running.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SubmissionState::Uploading | SubmissionState::Processing
        )
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch.is_some()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_busy()
    }

    pub fn can_fetch(&self) -> bool {
        self.state == SubmissionState::Done && !self.is_fetching()
    }

    /// Start an upload + poll cycle.
    ///
    /// Returns `false` (and does nothing) if a cycle is already running.
    pub fn submit(&mut self, request: UploadRequest) -> bool {
        if self.is_busy() {
            log::warn!("Submit ignored: a submission is already {}", self.state.label());
            return false;
        }

        self.stop_workers();
        let (event_tx, event_rx) = mpsc::channel();
        let (cancel_tx, cancel_rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let policy = self.policy;

        log::info!(
            "Submitting {} ({} bytes, {} bytes of strokes)",
            request.file_name,
            request.image_bytes.len(),
            request.strokes_json.len()
        );

        let spawned = thread::Builder::new()
            .name("submission".to_string())
            .spawn(move || run_submission(service.as_ref(), &request, policy, &event_tx, &cancel_rx));

        match spawned {
            Ok(_) => {
                self.events = Some(event_rx);
                self.cancel = Some(cancel_tx);
                self.transition(SubmissionState::Uploading);
            }
            Err(e) => {
                log::error!("Failed to spawn submission worker: {}", e);
                self.transition(SubmissionState::Failed(FailureReason::WorkerLost));
                return false;
            }
        }
        true
    }

    /// Fetch the result images of a finished run.
    ///
    /// Only valid in `Done`; the results arrive through `process_events`.
    pub fn fetch_results(&mut self) -> bool {
        if !self.can_fetch() {
            log::warn!(
                "Fetch ignored in state {}{}",
                self.state.label(),
                if self.is_fetching() { " (fetch in flight)" } else { "" }
            );
            return false;
        }

        let (event_tx, event_rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let spawned = thread::Builder::new()
            .name("fetch-results".to_string())
            .spawn(move || {
                let _ = event_tx.send(ProtocolEvent::Fetched(service.processed_images()));
            });

        match spawned {
            Ok(_) => {
                log::info!("Fetching processed images");
                self.fetch = Some(event_rx);
                true
            }
            Err(e) => {
                log::error!("Failed to spawn fetch worker: {}", e);
                false
            }
        }
    }

    /// Return to `Idle`, abandoning any running cycle or fetch.
    pub fn reset(&mut self) {
        self.stop_workers();
        if self.state != SubmissionState::Idle {
            self.transition(SubmissionState::Idle);
        }
    }

    /// Apply all queued worker events. Returns newly fetched results, if any.
    pub fn process_events(&mut self) -> Option<ProcessedImages> {
        let mut fetched = None;

        while let Some(rx) = &self.events {
            match rx.try_recv() {
                Ok(event) => {
                    if let Some(images) = self.apply(event) {
                        fetched = Some(images);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => self.worker_gone(),
            }
        }

        while let Some(rx) = &self.fetch {
            match rx.try_recv() {
                Ok(event) => {
                    if let Some(images) = self.apply(event) {
                        fetched = Some(images);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::error!("Fetch worker exited without a result");
                    self.fetch = None;
                }
            }
        }

        fetched
    }

    fn apply(&mut self, event: ProtocolEvent) -> Option<ProcessedImages> {
        match event {
            ProtocolEvent::Uploaded => {
                log::info!("Upload accepted, polling for completion");
                self.transition(SubmissionState::Processing);
            }
            ProtocolEvent::UploadFailed(error) => {
                log::error!("Upload failed: {}", error);
                self.stop_workers();
                self.transition(SubmissionState::Failed(FailureReason::Upload(error)));
            }
            ProtocolEvent::Polled { attempt, status } => {
                if status == "error" {
                    log::warn!("Backend reports an error status (check {}), still polling", attempt);
                } else {
                    log::info!("Processing status: {} (check {})", status, attempt);
                }
            }
            ProtocolEvent::PollFailed { attempt, error } => {
                log::warn!("Status check {} failed: {}", attempt, error);
            }
            ProtocolEvent::Finished { attempt } => {
                log::info!("Processing finished after {} status checks", attempt);
                self.stop_workers();
                self.transition(SubmissionState::Done);
            }
            ProtocolEvent::TimedOut { attempts } => {
                log::error!("Gave up waiting for processing after {} status checks", attempts);
                self.stop_workers();
                self.transition(SubmissionState::Failed(FailureReason::TimedOut { attempts }));
            }
            ProtocolEvent::Fetched(result) => {
                self.fetch = None;
                match result {
                    Ok(images) => {
                        log::info!("Fetched {} processed images", images.artifacts.len());
                        return Some(images);
                    }
                    Err(error) => log::error!("Failed to fetch processed images: {}", error),
                }
            }
        }
        None
    }

    /// The submission worker's channel closed before a terminal event.
    fn worker_gone(&mut self) {
        self.stop_workers();
        if self.is_busy() {
            log::error!("Submission worker exited during {}", self.state.label());
            self.transition(SubmissionState::Failed(FailureReason::WorkerLost));
        }
    }

    fn stop_workers(&mut self) {
        self.cancel = None;
        self.events = None;
        self.fetch = None;
    }

    fn transition(&mut self, next: SubmissionState) {
        log::info!("Submission {} -> {}", self.state.label(), next.label());
        if let SubmissionState::Failed(reason) = &next {
            log::debug!("Failure reason: {}", reason);
        }
        self.state = next;
    }
}

impl Drop for SubmissionProtocol {
    fn drop(&mut self) {
        self.stop_workers();
    }
}

/// Worker body: upload once, then poll until done, cancelled or out of attempts.
fn run_submission(
    service: &dyn ProcessingService,
    request: &UploadRequest,
    policy: PollPolicy,
    events: &Sender<ProtocolEvent>,
    cancel: &Receiver<()>,
) {
    if let Err(error) = service.upload(request) {
        let _ = events.send(ProtocolEvent::UploadFailed(error));
        return;
    }
    if events.send(ProtocolEvent::Uploaded).is_err() {
        return;
    }

    let mut attempt = 0;
    loop {
        if policy.max_attempts.is_some_and(|max| attempt >= max) {
            let _ = events.send(ProtocolEvent::TimedOut { attempts: attempt });
            return;
        }

        match cancel.recv_timeout(policy.interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                log::debug!("Poll loop cancelled after {} checks", attempt);
                return;
            }
        }

        attempt += 1;
        let event = match service.processing_status() {
            Ok(status) if status.is_done() => {
                let _ = events.send(ProtocolEvent::Finished { attempt });
                return;
            }
            Ok(status) => ProtocolEvent::Polled {
                attempt,
                status: status.status,
            },
            Err(error) => ProtocolEvent::PollFailed { attempt, error },
        };
        if events.send(event).is_err() {
            return;
        }
    }
}
