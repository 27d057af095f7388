// Stage results

use std::fmt::Display;

/// Result of one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    /// Every step produced model output
    Success(T),
    /// At least one step used its fallback
    Degraded { record: T, reasons: Vec<String> },
    /// Not even the fallback path produced a record
    Failed { reason: String },
}

impl<T> StageOutcome<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Success(record) | Self::Degraded { record, .. } => Some(record),
            Self::Failed { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Self::Success(record) | Self::Degraded { record, .. } => Some(record),
            Self::Failed { .. } => None,
        }
    }

    /// Why steps fell back, or why the stage failed.
    pub fn reasons(&self) -> Vec<&str> {
        match self {
            Self::Success(_) => Vec::new(),
            Self::Degraded { reasons, .. } => reasons.iter().map(String::as_str).collect(),
            Self::Failed { reason } => vec![reason.as_str()],
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Degraded { .. } => "degraded",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Collects fallback reasons while a stage runs its steps.
#[derive(Debug, Default)]
pub struct StageTracker {
    stage: &'static str,
    reasons: Vec<String>,
}

impl StageTracker {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            reasons: Vec::new(),
        }
    }

    /// Keep `result` on success, otherwise log, record the reason and use
    /// `fallback`.
    pub fn step<T, E: Display>(
        &mut self,
        step: &str,
        result: Result<T, E>,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(stage = self.stage, step, "Using fallback: {:#}", e);
                self.reasons.push(format!("{}: {:#}", step, e));
                fallback()
            }
        }
    }

    pub fn finish<T>(self, record: T) -> StageOutcome<T> {
        if self.reasons.is_empty() {
            StageOutcome::Success(record)
        } else {
            StageOutcome::Degraded {
                record,
                reasons: self.reasons,
            }
        }
    }
}
