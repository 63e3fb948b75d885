pub mod document;
pub mod format;
pub mod ids;
pub mod session;

pub use document::*;
pub use format::*;
pub use ids::{SessionId, SnapshotId};
pub use session::*;
