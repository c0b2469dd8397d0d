use crate::model::{FileRecord, Finding};
use anyhow::{Context, Result};
use reqwest::blocking::multipart;
use std::sync::mpsc;
use std::time::Duration;

/// Result of one submission, delivered over the channel from the
/// background thread. The error side is the user-facing message.
pub type AnalysisOutcome = std::result::Result<Vec<Finding>, String>;

/// Submit the file set to the analysis service as one multipart
/// request (each file under the `files` part name) and parse the
/// findings array it returns.
pub fn submit(endpoint: &str, timeout: Duration, files: &[FileRecord]) -> Result<Vec<Finding>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;

    let mut form = multipart::Form::new();
    for file in files {
        let part = multipart::Part::text(file.file_content.clone())
            .file_name(file.file_name.clone())
            .mime_str("text/plain")?;
        form = form.part("files", part);
    }

    let response = client
        .post(endpoint)
        .multipart(form)
        .send()
        .with_context(|| format!("could not reach analysis service at {}", endpoint))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        anyhow::bail!("{}", error_detail(status, &body));
    }

    response
        .json::<Vec<Finding>>()
        .context("analysis response was not a findings array")
}

/// Error message for a non-success response: the body verbatim when the
/// service sent one, a generic status line otherwise.
fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Analysis service returned {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Run `submit` on a background thread so the event loop never blocks,
/// reporting the outcome over `tx`. The receiver is polled with
/// `try_recv` from the UI tick.
pub fn spawn_submit(
    endpoint: String,
    timeout: Duration,
    files: Vec<FileRecord>,
    tx: mpsc::Sender<AnalysisOutcome>,
) {
    std::thread::spawn(move || {
        let outcome = submit(&endpoint, timeout, &files).map_err(|e| format!("{:#}", e));
        let _ = tx.send(outcome);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn error_detail_surfaces_body_verbatim() {
        let detail = error_detail(
            StatusCode::BAD_REQUEST,
            "Error reading file notes.bin: invalid UTF-8\n",
        );
        assert_eq!(detail, "Error reading file notes.bin: invalid UTF-8");
    }

    #[test]
    fn error_detail_falls_back_to_status_line() {
        let detail = error_detail(StatusCode::BAD_GATEWAY, "   \n");
        assert!(detail.contains("502"));
    }

    #[test]
    fn findings_array_parses() {
        let json = r#"[
            {"complexity": 2.0, "complexity_header": "a", "complexity_reasoning": "", "file_name": "a.py", "line_number": 1},
            {"complexity": 8.0, "complexity_header": "b", "complexity_reasoning": "", "file_name": "b.py", "line_number": 2}
        ]"#;
        let findings: Vec<Finding> = serde_json::from_str(json).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[1].file_name, "b.py");
    }
}
