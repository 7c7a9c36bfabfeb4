use playground_core::error::PlaygroundError;
use reqwest::StatusCode;

/// Every failure mode of a Runway API call.
#[derive(Debug, thiserror::Error)]
pub enum RunwayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t (de)serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Runway returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Runway format error: {0}")]
    Format(String),

    #[error("task {task_id} ended as {status}: {failure}")]
    TaskFailed {
        task_id: String,
        status: &'static str,
        failure: String,
        code: Option<String>,
    },

    #[error("task {task_id} did not finish within {seconds}s")]
    TaskTimedOut { task_id: String, seconds: u64 },
}

impl From<RunwayError> for PlaygroundError {
    fn from(value: RunwayError) -> Self {
        match value {
            RunwayError::TaskFailed {
                task_id,
                failure,
                code,
                ..
            } => PlaygroundError::RemoteGenerationFailed {
                task_id,
                failure,
                code,
            },
            other => PlaygroundError::Backend(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_tasks_become_remote_generation_failures() {
        let err: PlaygroundError = RunwayError::TaskFailed {
            task_id: "t-1".into(),
            status: "FAILED",
            failure: "content moderation".into(),
            code: Some("SAFETY.INPUT.TEXT".into()),
        }
        .into();

        match err {
            PlaygroundError::RemoteGenerationFailed { task_id, failure, code } => {
                assert_eq!(task_id, "t-1");
                assert_eq!(failure, "content moderation");
                assert_eq!(code.as_deref(), Some("SAFETY.INPUT.TEXT"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn transport_errors_are_backend_errors() {
        let err: PlaygroundError = RunwayError::Format("no id".into()).into();
        assert!(matches!(err, PlaygroundError::Backend(_)));
    }
}
