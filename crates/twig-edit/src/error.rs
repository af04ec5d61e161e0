use thiserror::Error;

/// Misuse of the edit API. Parse failures never surface here: they drive
/// the reparse climb and structural rollbacks instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("position {position} is out of bounds for a text of length {len}")]
    OutOfBounds { position: u32, len: u32 },
    #[error("the node was replaced by a reparse and no longer exists")]
    StaleNode,
}
