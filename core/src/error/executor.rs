use thiserror::Error;

/// Structural errors raised while building or configuring a run.
///
/// These are fatal to the whole call: no task is dispatched once one of
/// them is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Duplicate task ID: {0}")]
    DuplicateTaskId(String),

    #[error("Unknown dependency: task '{task_id}' depends on '{missing_dep}'")]
    UnknownDependency {
        task_id: String,
        missing_dep: String,
    },

    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CyclicDependency(Vec<String>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SchedulerError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateTaskId(_) => "duplicate_task_id",
            Self::UnknownDependency { .. } => "unknown_dependency",
            Self::CyclicDependency(_) => "cyclic_dependency",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }

    /// The witness cycle, if this is a cycle error.
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            Self::CyclicDependency(path) => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_display_joins_path() {
        let err = SchedulerError::CyclicDependency(vec!["a".into(), "b".into(), "a".into()]);
        assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
        assert_eq!(err.kind(), "cyclic_dependency");
        assert_eq!(err.cycle().map(|c| c.len()), Some(3));
    }

    #[test]
    fn test_unknown_dependency_names_missing_id() {
        let err = SchedulerError::UnknownDependency {
            task_id: "build".into(),
            missing_dep: "fetch".into(),
        };
        assert!(err.to_string().contains("'fetch'"));
        assert!(err.cycle().is_none());
    }
}
