//! Upload gate: holds the selected CSV until the user confirms analysis.

use axum::body::Bytes;

use crate::model::AnalysisResult;

pub const CSV_MIME: &str = "text/csv";

/// A file picked or dropped by the user.
#[derive(Debug, Clone)]
pub struct UploadSelection {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadSelection {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size in kibibytes with one decimal, e.g. `1.5 KB`.
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.size() as f64 / 1024.0)
    }

    pub fn is_csv(&self) -> bool {
        is_csv(&self.content_type)
    }
}

/// True when the essence of `mime` is `text/csv`. Parameters are ignored.
pub fn is_csv(mime: &str) -> bool {
    mime.split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case(CSV_MIME))
        .unwrap_or(false)
}

/// Dashboard session state: the held file, the in-flight flag and the
/// outcome of the last run.
#[derive(Debug, Default)]
pub struct UploadGate {
    held: Option<UploadSelection>,
    in_flight: bool,
    last_result: Option<AnalysisResult>,
    last_error: Option<String>,
    notice: Option<String>,
}

impl UploadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `candidate` if it is a CSV. Anything else is ignored and leaves
    /// the currently held file in place.
    pub fn offer(&mut self, candidate: UploadSelection) -> bool {
        if !candidate.is_csv() {
            self.notice = Some(format!(
                "{} was not accepted: only CSV files can be analyzed.",
                candidate.name
            ));
            return false;
        }
        self.notice = None;
        self.held = Some(candidate);
        true
    }

    /// Start a run with the held file. `None` while a run is in flight or
    /// when nothing is held.
    pub fn confirm(&mut self) -> Option<UploadSelection> {
        if self.in_flight {
            return None;
        }
        let selection = self.held.clone()?;
        self.in_flight = true;
        Some(selection)
    }

    /// Finish the current run. A success replaces the previous result
    /// wholesale; a failure keeps it and records the error.
    pub fn complete(&mut self, outcome: Result<AnalysisResult, String>) {
        self.in_flight = false;
        match outcome {
            Ok(result) => {
                self.last_result = Some(result);
                self.last_error = None;
            }
            Err(message) => self.last_error = Some(message),
        }
    }

    pub fn held(&self) -> Option<&UploadSelection> {
        self.held.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_result(&self) -> Option<&AnalysisResult> {
        self.last_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}
