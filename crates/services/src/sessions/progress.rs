use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    /// 1-based index of the question on screen, 0 before the first one.
    pub index: u32,
    pub total: u32,
    pub answered: u32,
    pub remaining: u32,
    pub is_complete: bool,
}
