// Error types for the Mood Light application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the Mood Light application
#[derive(Debug, Error)]
pub enum MoodLightError {
    #[error("Failed to load mood dataset {path:?}: {reason}")]
    DatasetLoad { path: PathBuf, reason: String },

    #[error("Camera unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Failed to read frame: {0}")]
    FrameRead(String),

    #[error("Frame processing failed: {0}")]
    FrameProcessing(String),

    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Face detection failed: {0}")]
    FaceDetection(String),

    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(String),

    #[error("OpenCV error: {0}")]
    OpenCV(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MoodLightError {
    pub(crate) fn dataset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MoodLightError::DatasetLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// One-line message for the terminal when the app cannot start
    pub fn report(&self) -> String {
        format!("[ERROR] {self}")
    }
}

/// Result type alias for Mood Light operations
pub type Result<T> = std::result::Result<T, MoodLightError>;

// Conversion from nokhwa errors
impl From<nokhwa::NokhwaError> for MoodLightError {
    fn from(err: nokhwa::NokhwaError) -> Self {
        match err {
            nokhwa::NokhwaError::OpenDeviceError(device, error) => {
                MoodLightError::CaptureUnavailable(format!("Device {device}: {error}"))
            }
            nokhwa::NokhwaError::OpenStreamError(error) => {
                MoodLightError::CaptureUnavailable(format!("Stream: {error}"))
            }
            nokhwa::NokhwaError::ReadFrameError(error) => MoodLightError::FrameRead(error),
            _ => MoodLightError::CaptureUnavailable(err.to_string()),
        }
    }
}

// Conversion from OpenCV errors
impl From<opencv::Error> for MoodLightError {
    fn from(err: opencv::Error) -> Self {
        MoodLightError::OpenCV(err.to_string())
    }
}

// Conversion from ONNX Runtime errors
impl From<ort::Error> for MoodLightError {
    fn from(err: ort::Error) -> Self {
        MoodLightError::OnnxRuntime(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_error_names_path_and_reason() {
        let err = MoodLightError::dataset("moods.csv", "line 3: column `r` is not an integer");
        let msg = err.to_string();
        assert!(msg.contains("moods.csv"));
        assert!(msg.contains("line 3"));
    }

    #[test]
    fn device_open_failure_is_capture_unavailable() {
        let err: MoodLightError =
            nokhwa::NokhwaError::OpenDeviceError("0".into(), "busy".into()).into();
        match err {
            MoodLightError::CaptureUnavailable(msg) => assert!(msg.contains("busy"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stream_open_failure_is_capture_unavailable() {
        let err: MoodLightError = nokhwa::NokhwaError::OpenStreamError("denied".into()).into();
        assert!(matches!(err, MoodLightError::CaptureUnavailable(_)));
    }

    #[test]
    fn read_failure_is_frame_read() {
        let err: MoodLightError = nokhwa::NokhwaError::ReadFrameError("x".into()).into();
        assert!(matches!(err, MoodLightError::FrameRead(ref msg) if msg == "x"));
    }

    #[test]
    fn other_nokhwa_errors_are_capture_unavailable() {
        let err: MoodLightError = nokhwa::NokhwaError::GeneralError("no backend".into()).into();
        assert!(matches!(err, MoodLightError::CaptureUnavailable(_)));
    }

    #[test]
    fn report_uses_display_form() {
        let report = MoodLightError::dataset("moods.csv", "missing required column `r`").report();
        assert!(report.starts_with("[ERROR] Failed to load mood dataset"), "{report}");
        assert!(!report.contains("DatasetLoad"), "{report}");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MoodLightError = io.into();
        assert!(matches!(err, MoodLightError::Io(_)));
    }
}
