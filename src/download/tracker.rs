//! Per-download lifecycle tracking.
//!
//! The engine owns the transfer itself. The tracker only observes its
//! notifications, decides where the file goes, and reports progress. Each
//! download moves `Started -> InProgress* -> Finished | Failed`; terminal
//! states are absorbing and the record is dropped once reached.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::destination::{destination_uri, resolve_destination_with};

/// Engine-assigned download identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DownloadId(pub u64);

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification emitted by the engine for one download.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    Started { suggested_filename: String },
    ReceivedData {
        /// Cumulative bytes received so far.
        received_bytes: u64,
        /// Estimated completion in `0.0..=1.0`.
        estimated_progress: f64,
    },
    Finished,
    Failed { message: String },
}

/// Lifecycle state of a tracked download.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DownloadState {
    Started,
    InProgress {
        received_bytes: u64,
        estimated_progress: f64,
    },
    Finished,
    Failed {
        message: String,
    },
}

impl DownloadState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed { .. })
    }
}

/// What the tracker knows about one download.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadRecord {
    pub id: DownloadId,
    pub suggested_filename: String,
    pub destination: PathBuf,
    pub state: DownloadState,
}

impl DownloadRecord {
    #[must_use]
    pub fn received_bytes(&self) -> u64 {
        match self.state {
            DownloadState::InProgress { received_bytes, .. } => received_bytes,
            _ => 0,
        }
    }
}

/// Side effect the shell performs on the tracker's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEffect {
    /// Register the destination with the engine.
    SetDestination { id: DownloadId, path: PathBuf, uri: String },
    /// Report a lifecycle notice (logging only).
    Notify(DownloadNotice),
}

/// Lifecycle notice for logs. Never surfaced to window chrome.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadNotice {
    Started {
        id: DownloadId,
        suggested_filename: String,
        destination: PathBuf,
    },
    Progress {
        id: DownloadId,
        received_bytes: u64,
        estimated_progress: f64,
    },
    Finished {
        id: DownloadId,
        destination: PathBuf,
    },
    Failed {
        id: DownloadId,
        destination: PathBuf,
        message: String,
    },
}

/// Tracks in-flight downloads and resolves their destinations.
#[derive(Debug)]
pub struct DownloadTracker {
    downloads_dir: PathBuf,
    active: HashMap<DownloadId, DownloadRecord>,
    finished: usize,
    failed: usize,
}

impl DownloadTracker {
    #[must_use]
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            active: HashMap::new(),
            finished: 0,
            failed: 0,
        }
    }

    #[must_use]
    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    #[must_use]
    pub fn get(&self, id: DownloadId) -> Option<&DownloadRecord> {
        self.active.get(&id)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn finished_count(&self) -> usize {
        self.finished
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Applies one engine notification and returns the effects to perform.
    ///
    /// Notifications for unknown ids (never started, or already terminal)
    /// and repeated `Started` events produce no effects.
    pub fn handle(&mut self, id: DownloadId, event: DownloadEvent) -> Vec<DownloadEffect> {
        match event {
            DownloadEvent::Started { suggested_filename } => self.start(id, suggested_filename),
            DownloadEvent::ReceivedData {
                received_bytes,
                estimated_progress,
            } => {
                let Some(record) = self.active.get_mut(&id) else {
                    warn!(download = %id, "Progress for unknown download ignored");
                    return Vec::new();
                };
                record.state = DownloadState::InProgress {
                    received_bytes,
                    estimated_progress,
                };
                vec![DownloadEffect::Notify(DownloadNotice::Progress {
                    id,
                    received_bytes,
                    estimated_progress,
                })]
            }
            DownloadEvent::Finished => {
                let Some(record) = self.active.remove(&id) else {
                    warn!(download = %id, "Finish for unknown download ignored");
                    return Vec::new();
                };
                self.finished += 1;
                vec![DownloadEffect::Notify(DownloadNotice::Finished {
                    id,
                    destination: record.destination,
                })]
            }
            DownloadEvent::Failed { message } => {
                let Some(record) = self.active.remove(&id) else {
                    warn!(download = %id, "Failure for unknown download ignored");
                    return Vec::new();
                };
                self.failed += 1;
                vec![DownloadEffect::Notify(DownloadNotice::Failed {
                    id,
                    destination: record.destination,
                    message,
                })]
            }
        }
    }

    fn start(&mut self, id: DownloadId, suggested_filename: String) -> Vec<DownloadEffect> {
        if self.active.contains_key(&id) {
            warn!(download = %id, "Duplicate start for download ignored");
            return Vec::new();
        }

        let destination =
            resolve_destination_with(&suggested_filename, &self.downloads_dir, |candidate| {
                self.active.values().any(|r| r.destination.as_path() == candidate)
            });
        let uri = destination_uri(&destination);
        debug!(download = %id, destination = %destination.display(), "Destination resolved");

        self.active.insert(
            id,
            DownloadRecord {
                id,
                suggested_filename: suggested_filename.clone(),
                destination: destination.clone(),
                state: DownloadState::Started,
            },
        );

        vec![
            DownloadEffect::SetDestination {
                id,
                path: destination.clone(),
                uri,
            },
            DownloadEffect::Notify(DownloadNotice::Started {
                id,
                suggested_filename,
                destination,
            }),
        ]
    }
}
