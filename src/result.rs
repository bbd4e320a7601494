use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ErrorKind, HandfontError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStatus {
    Success,
    Warning,
    Error,
}

/// Outcome of one `segment` call. Callers always receive one of these, never a
/// propagated error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationResult {
    pub status: SegmentationStatus,
    pub letter_count: usize,
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SegmentationResult {
    /// Success when every expected letter was written, Warning otherwise.
    pub fn completed(letter_count: usize, expected: usize, output_dir: PathBuf) -> Self {
        if letter_count < expected {
            Self {
                status: SegmentationStatus::Warning,
                letter_count,
                output_dir: Some(output_dir),
                kind: None,
                message: Some(format!(
                    "Expected {expected} letters, but only {letter_count} were detected."
                )),
            }
        } else {
            Self {
                status: SegmentationStatus::Success,
                letter_count,
                output_dir: Some(output_dir),
                kind: None,
                message: None,
            }
        }
    }

    /// Error outcome. A failed run keeps no letters, so the count is always 0.
    pub fn failed(error: &HandfontError, output_dir: Option<PathBuf>) -> Self {
        Self {
            status: SegmentationStatus::Error,
            letter_count: 0,
            output_dir,
            kind: Some(error.kind()),
            message: Some(error.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == SegmentationStatus::Error
    }
}
