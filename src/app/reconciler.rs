use crate::model::{FileRecord, Finding, Severity};
use std::collections::HashMap;

/// Aggregate stats for one file's findings. `mean` is None when there
/// are no findings — a "no data" sentinel, distinct from a real 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub count: usize,
    pub mean: Option<f64>,
}

impl FileSummary {
    pub fn severity(&self) -> Option<Severity> {
        self.mean.map(Severity::band)
    }

    /// Badge text: mean to one decimal, or "-" when there is no data.
    pub fn mean_label(&self) -> String {
        match self.mean {
            Some(mean) => format!("{:.1}", mean),
            None => "-".to_string(),
        }
    }
}

/// Joins the stored findings to the stored files and tracks which file
/// tab is active. Construction never fails: empty findings, empty
/// files, or an out-of-range selection all degrade to a neutral view.
pub struct Reconciler {
    files: Vec<FileRecord>,
    findings: Vec<Finding>,

    /// file_name → indices into `findings`, in original order.
    /// Built once per load so per-tab lookups avoid a full scan.
    by_file: HashMap<String, Vec<usize>>,

    /// Active tab. Signed so stale or garbage indices stay representable;
    /// anything outside 0..files.len() means "no active file" — no
    /// clamping, by policy.
    selected: isize,
}

impl Reconciler {
    pub fn new(findings: Vec<Finding>, files: Vec<FileRecord>) -> Self {
        let mut by_file: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, finding) in findings.iter().enumerate() {
            by_file.entry(finding.file_name.clone()).or_default().push(idx);
        }
        Reconciler {
            files,
            findings,
            by_file,
            // First tab active whenever there are files at all
            selected: 0,
        }
    }

    pub fn empty() -> Self {
        Reconciler::new(Vec::new(), Vec::new())
    }

    pub fn has_data(&self) -> bool {
        !self.files.is_empty() && !self.findings.is_empty()
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn total_findings(&self) -> usize {
        self.findings.len()
    }

    pub fn selected(&self) -> isize {
        self.selected
    }

    /// Any integer is accepted; out-of-range values are tolerated and
    /// simply mean no tab is active.
    pub fn set_selected(&mut self, index: isize) {
        self.selected = index;
    }

    pub fn select_next(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let last = self.files.len() as isize - 1;
        if self.active_index().is_none() {
            self.selected = 0;
        } else if self.selected < last {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.files.is_empty() {
            return;
        }
        if self.active_index().is_none() {
            self.selected = 0;
        } else if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn active_index(&self) -> Option<usize> {
        usize::try_from(self.selected)
            .ok()
            .filter(|&i| i < self.files.len())
    }

    pub fn active_file(&self) -> Option<&FileRecord> {
        self.active_index().map(|i| &self.files[i])
    }

    /// Findings whose file_name matches the active file exactly
    /// (case-sensitive), in original relative order. Empty when no
    /// file is active.
    pub fn findings_for_active(&self) -> Vec<&Finding> {
        let Some(file) = self.active_file() else {
            return Vec::new();
        };
        self.by_file
            .get(&file.file_name)
            .map(|indices| indices.iter().map(|&i| &self.findings[i]).collect())
            .unwrap_or_default()
    }

    pub fn summary(findings: &[&Finding]) -> FileSummary {
        if findings.is_empty() {
            return FileSummary { count: 0, mean: None };
        }
        let sum: f64 = findings.iter().map(|f| f.complexity).sum();
        FileSummary {
            count: findings.len(),
            mean: Some(sum / findings.len() as f64),
        }
    }

    pub fn summary_for_active(&self) -> FileSummary {
        Reconciler::summary(&self.findings_for_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(name: &str, complexity: f64, line: u32) -> Finding {
        Finding {
            complexity,
            complexity_header: format!("header {}", line),
            complexity_reasoning: String::new(),
            file_name: name.to_string(),
            line_number: line,
        }
    }

    fn file(name: &str) -> FileRecord {
        FileRecord {
            file_name: name.to_string(),
            file_content: format!("// {}", name),
        }
    }

    fn sample() -> Reconciler {
        // Findings for a given file are deliberately non-contiguous
        Reconciler::new(
            vec![
                finding("a.py", 8.0, 1),
                finding("b.py", 1.0, 2),
                finding("a.py", 2.0, 9),
                finding("c.py", 4.0, 3),
            ],
            vec![file("a.py"), file("b.py")],
        )
    }

    #[test]
    fn first_file_is_active_on_load() {
        let rec = sample();
        assert_eq!(rec.selected(), 0);
        assert_eq!(rec.active_file().unwrap().file_name, "a.py");
    }

    #[test]
    fn in_range_selection_returns_that_file() {
        let mut rec = sample();
        rec.set_selected(1);
        assert_eq!(rec.active_file().unwrap().file_name, "b.py");
    }

    #[test]
    fn out_of_range_selection_is_neutral_not_error() {
        let mut rec = sample();
        for bad in [-1, 2, 100, isize::MIN, isize::MAX] {
            rec.set_selected(bad);
            assert!(rec.active_file().is_none(), "index {} should be neutral", bad);
            assert!(rec.findings_for_active().is_empty());
            assert_eq!(rec.summary_for_active(), FileSummary { count: 0, mean: None });
        }
    }

    #[test]
    fn findings_filter_by_exact_name_preserving_order() {
        let rec = sample();
        let active = rec.findings_for_active();
        assert_eq!(active.len(), 2);
        // Original relative order: line 1 before line 9
        assert_eq!(active[0].line_number, 1);
        assert_eq!(active[1].line_number, 9);
        assert!(active.iter().all(|f| f.file_name == "a.py"));
    }

    #[test]
    fn name_matching_is_case_sensitive() {
        let rec = Reconciler::new(vec![finding("A.py", 5.0, 1)], vec![file("a.py")]);
        assert!(rec.findings_for_active().is_empty());
    }

    #[test]
    fn file_without_findings_has_empty_list() {
        let mut rec = sample();
        rec.set_selected(1); // b.py has one finding
        assert_eq!(rec.findings_for_active().len(), 1);

        let rec = Reconciler::new(Vec::new(), vec![file("a.py")]);
        assert!(rec.findings_for_active().is_empty());
    }

    #[test]
    fn summary_of_empty_is_sentinel_not_zero() {
        let summary = Reconciler::summary(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.severity(), None);
        assert_eq!(summary.mean_label(), "-");
    }

    #[test]
    fn summary_computes_count_and_mean() {
        let high = finding("a.py", 8.0, 1);
        let low = finding("a.py", 2.0, 2);
        let summary = Reconciler::summary(&[&high, &low]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, Some(5.0));
        assert_eq!(summary.severity(), Some(Severity::Medium));
        assert_eq!(summary.mean_label(), "5.0");
        assert_eq!(Severity::band(high.complexity), Severity::High);
        assert_eq!(Severity::band(low.complexity), Severity::Low);
    }

    #[test]
    fn genuine_zero_mean_is_not_the_sentinel() {
        let zero = finding("a.py", 0.0, 1);
        let summary = Reconciler::summary(&[&zero]);
        assert_eq!(summary.mean, Some(0.0));
        assert_eq!(summary.mean_label(), "0.0");
    }

    #[test]
    fn empty_reconciler_is_valid_and_neutral() {
        let rec = Reconciler::empty();
        assert!(!rec.has_data());
        assert!(rec.active_file().is_none());
        assert!(rec.findings_for_active().is_empty());
        assert_eq!(rec.summary_for_active().mean, None);
    }

    #[test]
    fn select_next_prev_stay_in_range() {
        let mut rec = sample();
        rec.select_prev();
        assert_eq!(rec.selected(), 0);
        rec.select_next();
        assert_eq!(rec.selected(), 1);
        rec.select_next();
        assert_eq!(rec.selected(), 1);
    }

    #[test]
    fn select_next_recovers_from_invalid_selection() {
        let mut rec = sample();
        rec.set_selected(-7);
        rec.select_next();
        assert_eq!(rec.selected(), 0);
        rec.set_selected(50);
        rec.select_prev();
        assert_eq!(rec.selected(), 0);
    }
}
