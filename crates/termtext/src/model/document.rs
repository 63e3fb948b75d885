use crate::model::{SnapshotId, TextFormat};
use serde::{Deserialize, Serialize};

/// Version of the document snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Captured state of a rich-text log document.
///
/// `blocks` holds one entry per line; the plain text of block `n` is
/// `blocks[n].text`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Format version for compatibility checking.
    pub snapshot_version: u32,
    /// Unique identifier for this snapshot.
    pub snapshot_id: SnapshotId,
    /// Write position (in characters, block separators count as one).
    pub cursor: usize,
    /// Document blocks, top to bottom.
    pub blocks: Vec<BlockSnapshot>,
}

impl DocumentSnapshot {
    /// Block texts, one per line.
    pub fn lines(&self) -> Vec<&str> {
        self.blocks.iter().map(|block| block.text.as_str()).collect()
    }
}

/// One line of the document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    /// Plain text of the block.
    pub text: String,
    /// Formatted runs making up the block.
    pub runs: Vec<RunSnapshot>,
}

/// A span of text sharing one format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub text: String,
    pub format: TextFormat,
}
