use crate::app::Reconciler;
use crate::client::{self, AnalysisOutcome};
use crate::config::CxConfig;
use crate::intake;
use crate::store::{ResultStore, Snapshot};
use anyhow::Result;
use std::sync::mpsc;
use std::time::Duration;

// ── Enums ──

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Intake,
    Results,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Intake => "INTAKE",
            View::Results => "RESULTS",
        }
    }
}

/// Whether we're navigating or typing in the filter input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

// ── App state ──

pub struct App {
    pub config: CxConfig,
    pub view: View,
    pub input_mode: InputMode,
    pub should_quit: bool,

    // ── Intake state ──

    /// Path arguments as given on the command line; re-walked when the
    /// filter changes
    intake_paths: Vec<String>,

    /// Active filter expression (user-visible string)
    pub filter_expr: String,

    /// Text buffer for filter input while typing
    pub filter_input: String,

    /// Files currently slated for analysis
    pub candidates: Vec<crate::model::FileRecord>,

    /// Cursor within the candidate list
    pub selected_candidate: usize,

    /// Dismissible inline error (intake or submission failure)
    pub error: Option<String>,

    /// A submission is in flight
    pub loading: bool,

    /// Frame counter, drives the loading spinner and notification expiry
    pub frame: usize,

    /// Channel from the in-flight submission thread, if any
    analysis_rx: Option<mpsc::Receiver<AnalysisOutcome>>,

    // ── Results state ──

    pub reconciler: Reconciler,

    /// Timestamp of the loaded snapshot, shown in the top bar
    pub snapshot_created_at: String,

    /// Cursor within the active file's finding list
    pub findings_cursor: usize,

    /// Vertical scroll offset within the code pane
    pub code_scroll: u16,

    /// Horizontal scroll offset within the code pane (for long lines)
    pub h_scroll: u16,

    store: ResultStore,

    // ── Notifications ──

    pub notification: Option<String>,
    notification_expires_at: usize,
}

impl App {
    pub fn new(
        config: CxConfig,
        store: ResultStore,
        paths: Vec<String>,
        filter_expr: String,
    ) -> Result<Self> {
        let mut app = App {
            config,
            view: View::Intake,
            input_mode: InputMode::Normal,
            should_quit: false,
            intake_paths: paths,
            filter_expr,
            filter_input: String::new(),
            candidates: Vec::new(),
            selected_candidate: 0,
            error: None,
            loading: false,
            frame: 0,
            analysis_rx: None,
            reconciler: Reconciler::empty(),
            snapshot_created_at: String::new(),
            findings_cursor: 0,
            code_scroll: 0,
            h_scroll: 0,
            store,
            notification: None,
            notification_expires_at: 0,
        };
        app.refresh_candidates()?;
        Ok(app)
    }

    // ── Intake ──

    pub fn refresh_candidates(&mut self) -> Result<()> {
        let rules = intake::parse_filter_expr(&self.filter_expr);
        self.candidates = intake::collect(
            &self.intake_paths,
            &rules,
            self.config.intake.max_file_bytes,
        )?;
        if self.selected_candidate >= self.candidates.len() {
            self.selected_candidate = self.candidates.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn apply_filter_expr(&mut self, expr: &str) {
        self.filter_expr = expr.trim().to_string();
        if let Err(e) = self.refresh_candidates() {
            self.error = Some(format!("{:#}", e));
        }
    }

    pub fn next_candidate(&mut self) {
        if !self.candidates.is_empty() && self.selected_candidate + 1 < self.candidates.len() {
            self.selected_candidate += 1;
        }
    }

    pub fn prev_candidate(&mut self) {
        self.selected_candidate = self.selected_candidate.saturating_sub(1);
    }

    pub fn remove_candidate(&mut self) {
        if self.selected_candidate < self.candidates.len() {
            self.candidates.remove(self.selected_candidate);
            if self.selected_candidate >= self.candidates.len() {
                self.selected_candidate = self.candidates.len().saturating_sub(1);
            }
        }
    }

    // ── Submission ──

    /// Kick off analysis of the candidate set on a background thread.
    /// An empty set is an intake error, recovered inline.
    pub fn start_analysis(&mut self) {
        if self.loading {
            return;
        }
        if self.candidates.is_empty() {
            self.error = Some("Please select at least one file.".to_string());
            return;
        }
        self.error = None;
        self.loading = true;

        let (tx, rx) = mpsc::channel::<AnalysisOutcome>();
        self.analysis_rx = Some(rx);
        client::spawn_submit(
            self.config.analysis.endpoint.clone(),
            Duration::from_secs(self.config.analysis.timeout_secs),
            self.candidates.clone(),
            tx,
        );
    }

    /// Non-blocking check for a finished submission. On success the
    /// snapshot is persisted before the view switches, so the results
    /// view always reads a complete pair.
    pub fn poll_analysis(&mut self) {
        let Some(rx) = &self.analysis_rx else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.analysis_rx = None;
                self.loading = false;
                self.error = Some("Analysis worker exited unexpectedly.".to_string());
                return;
            }
        };
        self.analysis_rx = None;
        self.loading = false;

        match outcome {
            Ok(findings) => {
                let snapshot = Snapshot::new(findings, self.candidates.clone());
                if let Err(e) = self.store.save(&snapshot) {
                    log::warn!("Could not persist result snapshot: {:#}", e);
                    self.notify("Results not persisted (see log)");
                }
                self.enter_results(snapshot);
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
    }

    // ── Navigation ──

    /// Open the results view from the stored snapshot. With no valid
    /// snapshot the view still opens and renders its guidance message.
    pub fn open_results(&mut self) {
        match self.store.load() {
            Some(snapshot) => self.enter_results(snapshot),
            None => {
                self.reconciler = Reconciler::empty();
                self.snapshot_created_at = String::new();
                self.view = View::Results;
            }
        }
    }

    fn enter_results(&mut self, snapshot: Snapshot) {
        self.snapshot_created_at = snapshot.created_at.clone();
        self.reconciler = Reconciler::new(snapshot.findings, snapshot.files);
        self.findings_cursor = 0;
        self.code_scroll = 0;
        self.h_scroll = 0;
        self.view = View::Results;
    }

    /// Back to intake. Clears the store so stale results never leak
    /// into a fresh session.
    pub fn back_to_intake(&mut self) {
        if let Err(e) = self.store.clear() {
            log::warn!("Could not clear result snapshot: {:#}", e);
        }
        self.reconciler = Reconciler::empty();
        self.snapshot_created_at = String::new();
        self.view = View::Intake;
    }

    // ── Results navigation ──

    pub fn next_file(&mut self) {
        self.reconciler.select_next();
        self.reset_result_cursors();
    }

    pub fn prev_file(&mut self) {
        self.reconciler.select_prev();
        self.reset_result_cursors();
    }

    fn reset_result_cursors(&mut self) {
        self.findings_cursor = 0;
        self.code_scroll = 0;
        self.h_scroll = 0;
    }

    pub fn next_finding(&mut self) {
        let count = self.reconciler.findings_for_active().len();
        if count > 0 && self.findings_cursor + 1 < count {
            self.findings_cursor += 1;
        }
        self.jump_code_to_cursor();
    }

    pub fn prev_finding(&mut self) {
        self.findings_cursor = self.findings_cursor.saturating_sub(1);
        self.jump_code_to_cursor();
    }

    /// Scroll the code pane so the cursor's finding line sits near the
    /// top, with a few lines of context above.
    fn jump_code_to_cursor(&mut self) {
        let line = self
            .reconciler
            .findings_for_active()
            .get(self.findings_cursor)
            .map(|f| f.line_number);
        if let Some(line) = line {
            let line = line.saturating_sub(1);
            self.code_scroll = line.saturating_sub(4).min(u32::from(u16::MAX)) as u16;
        }
    }

    /// Line number of the cursor's finding in the active file, if any
    pub fn cursor_line(&self) -> Option<u32> {
        self.reconciler
            .findings_for_active()
            .get(self.findings_cursor)
            .map(|f| f.line_number)
    }

    pub fn scroll_code_down(&mut self, amount: u16) {
        self.code_scroll = self.code_scroll.saturating_add(amount);
    }

    pub fn scroll_code_up(&mut self, amount: u16) {
        self.code_scroll = self.code_scroll.saturating_sub(amount);
    }

    pub fn scroll_right(&mut self, amount: u16) {
        self.h_scroll = self.h_scroll.saturating_add(amount);
    }

    pub fn scroll_left(&mut self, amount: u16) {
        self.h_scroll = self.h_scroll.saturating_sub(amount);
    }

    // ── Notifications ──

    pub fn notify(&mut self, message: &str) {
        self.notification = Some(message.to_string());
        // ~3s at a 100ms poll interval
        self.notification_expires_at = self.frame + 30;
    }

    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        if self.notification.is_some() && self.frame >= self.notification_expires_at {
            self.notification = None;
        }
    }
}
