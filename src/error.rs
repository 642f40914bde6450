use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    #[error("{operation} failed for {target}: {source}")]
    RemoteCall {
        operation: &'static str,
        target: String,
        #[source]
        source: RemoteFailure,
    },

    #[error("missing configuration value: {0}")]
    ConfigurationMissing(&'static str),

    #[error("invalid cell reference: {0:?}")]
    InvalidCellRef(String),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What went wrong underneath a remote call.
#[derive(Debug, Error)]
pub enum RemoteFailure {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl SyncError {
    pub fn remote(
        operation: &'static str,
        target: impl Into<String>,
        source: impl Into<RemoteFailure>,
    ) -> Self {
        SyncError::RemoteCall {
            operation,
            target: target.into(),
            source: source.into(),
        }
    }

    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        SyncError::NotFound {
            what,
            name: name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_call_names_operation_and_target() {
        let err = SyncError::remote(
            "append_children",
            "page-123",
            RemoteFailure::Status {
                status: 400,
                body: "bad".into(),
            },
        );
        let msg = err.to_string();
        assert!(msg.contains("append_children"));
        assert!(msg.contains("page-123"));
        assert!(msg.contains("400"));
    }

    #[test]
    fn not_found_message() {
        let err = SyncError::not_found("sheet", "Week 4");
        assert_eq!(err.to_string(), "sheet not found: Week 4");
    }
}
