use crate::model::{DocumentSnapshot, SessionId};
use serde::{Deserialize, Serialize};

/// How a captured process ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitStatus {
    pub success: bool,
    pub exit_code: Option<u32>,
    /// True when the harness killed the process (deadline or cancellation).
    pub terminated_by_harness: bool,
}

/// Result of capturing a command into a log document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub session_id: SessionId,
    pub command: String,
    pub args: Vec<String>,
    pub exit_status: ExitStatus,
    /// Bytes read from the PTY.
    pub output_bytes: u64,
    pub duration_ms: u64,
    pub document: DocumentSnapshot,
}
