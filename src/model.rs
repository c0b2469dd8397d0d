use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One complexity observation attributed to a file and line, as emitted
/// by the analysis service. Field names match the wire format exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub complexity: f64,
    pub complexity_header: String,
    pub complexity_reasoning: String,
    pub file_name: String,
    pub line_number: u32,
}

/// Name and verbatim text of one selected file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_name: String,
    pub file_content: String,
}

impl FileRecord {
    /// SHA-256 of the file content, used to dedupe identical intake entries.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.file_content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

// Severity thresholds are presentation policy, not derived from the
// analysis service. Both cut points are strict: exactly 3.0 bands as
// low, exactly 6.0 as medium.
pub const MEDIUM_OVER: f64 = 3.0;
pub const HIGH_OVER: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn band(complexity: f64) -> Severity {
        if complexity > HIGH_OVER {
            Severity::High
        } else if complexity > MEDIUM_OVER {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banding_boundaries_are_strict() {
        assert_eq!(Severity::band(3.0), Severity::Low);
        assert_eq!(Severity::band(3.01), Severity::Medium);
        assert_eq!(Severity::band(6.0), Severity::Medium);
        assert_eq!(Severity::band(6.01), Severity::High);
    }

    #[test]
    fn banding_extremes() {
        assert_eq!(Severity::band(0.0), Severity::Low);
        assert_eq!(Severity::band(-1.0), Severity::Low);
        assert_eq!(Severity::band(10.0), Severity::High);
    }

    #[test]
    fn content_hash_tracks_content_not_name() {
        let a = FileRecord {
            file_name: "a.rs".into(),
            file_content: "fn main() {}".into(),
        };
        let b = FileRecord {
            file_name: "b.rs".into(),
            file_content: "fn main() {}".into(),
        };
        let c = FileRecord {
            file_name: "a.rs".into(),
            file_content: "fn main() { }".into(),
        };
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn finding_parses_wire_format() {
        let json = r#"{
            "complexity": 7.5,
            "complexity_header": "Deeply nested loop",
            "complexity_reasoning": "Three nested loops over the same collection.",
            "file_name": "worker.py",
            "line_number": 42
        }"#;
        let f: Finding = serde_json::from_str(json).unwrap();
        assert_eq!(f.file_name, "worker.py");
        assert_eq!(f.line_number, 42);
        assert_eq!(Severity::band(f.complexity), Severity::High);
    }
}
