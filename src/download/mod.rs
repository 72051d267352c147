//! Download destination handling and lifecycle tracking.
//!
//! The embedded engine performs the transfer and writes the file. This
//! module decides where the file goes and follows the engine's
//! started/progress/finished/failed notifications.
//!
//! # Example
//!
//! ```no_run
//! use keyshell_core::download::{DownloadEvent, DownloadId, DownloadTracker};
//!
//! let mut tracker = DownloadTracker::new("/home/user/Downloads");
//! let effects = tracker.handle(
//!     DownloadId(1),
//!     DownloadEvent::Started { suggested_filename: "report.pdf".to_string() },
//! );
//! println!("{effects:?}");
//! ```

mod destination;
mod tracker;

pub use destination::{
    FALLBACK_FILENAME, destination_uri, resolve_destination, resolve_destination_with,
};
pub use tracker::{
    DownloadEffect, DownloadEvent, DownloadId, DownloadNotice, DownloadRecord, DownloadState,
    DownloadTracker,
};
