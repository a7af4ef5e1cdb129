use crate::DisplayStats;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub stats: DisplayStats,
    /// True while counting calls are in flight for the current generation.
    pub counting: bool,
    pub attachment_name: Option<String>,
    pub dirty: bool,
}

/// Renderable projection of the display stats. Pure; no upstream mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub tokens: String,
    pub chars: String,
    pub error: Option<String>,
}

impl StatsView {
    pub fn project(stats: &DisplayStats) -> Self {
        Self {
            tokens: stats
                .tokens
                .map(|tokens| tokens.to_string())
                .unwrap_or_else(|| "0".to_string()),
            chars: stats.chars.to_string(),
            error: stats.error.clone(),
        }
    }
}
