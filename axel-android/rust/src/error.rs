use axel_rs::AxelError;
use jni::JNIEnv;
use thiserror::Error;

/// Errors crossing the JNI boundary
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Native bridge not initialized")]
    NotInitialized,

    #[error(transparent)]
    Core(#[from] AxelError),

    /// User-facing failure; the message is shown as a toast
    #[error("{0}")]
    Rejected(&'static str),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("JNI error: {0}")]
    JniError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<jni::errors::Error> for BridgeError {
    fn from(e: jni::errors::Error) -> Self {
        BridgeError::JniError(e.to_string())
    }
}

/// Result type for JNI operations
pub type JResult<T> = Result<T, BridgeError>;

/// Java exception class for an error
pub fn exception_class(error: &BridgeError) -> &'static str {
    match error {
        BridgeError::NotInitialized
        | BridgeError::Core(AxelError::AlreadyRecording)
        | BridgeError::Core(AxelError::NotRecording) => "java/lang/IllegalStateException",
        BridgeError::InvalidParameters(_)
        | BridgeError::Core(AxelError::InvalidFileName(_))
        | BridgeError::Core(AxelError::Config(_)) => "java/lang/IllegalArgumentException",
        BridgeError::Core(AxelError::FileExists(_))
        | BridgeError::Core(AxelError::Io { .. })
        | BridgeError::Core(AxelError::Preferences(_))
        | BridgeError::Core(AxelError::Parse { .. })
        | BridgeError::Rejected(_) => "java/io/IOException",
        BridgeError::JniError(_) | BridgeError::Internal(_) => "java/lang/RuntimeException",
    }
}

/// Throw Java exception from Rust error
pub fn throw_java_exception(env: &mut JNIEnv, error: &BridgeError) -> JResult<()> {
    log::warn!("Throwing {}: {}", exception_class(error), error);
    env.throw_new(exception_class(error), error.to_string())
        .map_err(|_| BridgeError::JniError("Failed to throw exception".to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exception_classes() {
        assert_eq!(
            exception_class(&BridgeError::NotInitialized),
            "java/lang/IllegalStateException"
        );
        assert_eq!(
            exception_class(&BridgeError::Core(AxelError::InvalidFileName("..".into()))),
            "java/lang/IllegalArgumentException"
        );
        assert_eq!(
            exception_class(&BridgeError::Core(AxelError::FileExists(PathBuf::from("a.csv")))),
            "java/io/IOException"
        );
        assert_eq!(
            exception_class(&BridgeError::Internal("poisoned".into())),
            "java/lang/RuntimeException"
        );
    }

    #[test]
    fn test_core_message_passes_through() {
        let err = BridgeError::from(AxelError::NotRecording);
        assert_eq!(err.to_string(), "Recording not running");
    }
}
