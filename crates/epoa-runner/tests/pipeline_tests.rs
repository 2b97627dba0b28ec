use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use epoa_core::{EpoaError, EvidenceLocation, FetchError, RoleRow, RowState};
use epoa_evidence::FsEvidenceStore;
use epoa_render::Renderer;
use epoa_runner::Pipeline;
use epoa_scan::fixture::write_text_pdf;
use epoa_scan::TriggerWordRule;
use tempfile::tempdir;

#[derive(Default)]
struct FakeRenderer {
    pages: HashMap<String, String>,
    fail: HashSet<String>,
    garbage: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRenderer {
    fn page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    fn failing(mut self, url: &str) -> Self {
        self.fail.insert(url.to_string());
        self
    }

    fn garbage(mut self, url: &str) -> Self {
        self.garbage.insert(url.to_string());
        self
    }
}

impl Renderer for FakeRenderer {
    fn render(&self, url: &str, output: &Path) -> Result<(), FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if self.fail.contains(url) {
            std::fs::write(output, b"partial").unwrap();
            return Err(FetchError::ExitStatus { status: "exit status: 1".into(), detail: "boom".into() });
        }
        if self.garbage.contains(url) {
            std::fs::write(output, b"<html>login wall</html>").unwrap();
            return Ok(());
        }
        let text = self.pages.get(url).map(String::as_str).unwrap_or("Engineer role\nGreat team, flexible hours");
        write_text_pdf(output, &[text]).map_err(|e| FetchError::Io(e.to_string()))
    }

    fn describe(&self) -> String {
        "fake".into()
    }
}

fn pipeline(root: &Path, renderer: FakeRenderer, words: &[&str]) -> Pipeline {
    Pipeline {
        evidence_root: root.to_path_buf(),
        store: Box::new(FsEvidenceStore::new(root.to_path_buf())),
        renderer: Box::new(renderer),
        rule: TriggerWordRule::new(words),
        resume: None,
    }
}

fn url(n: usize) -> String {
    format!("https://example.com/job/{n}")
}

fn five_rows() -> Vec<RoleRow> {
    let applied = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
    (1..=5)
        .map(|n| {
            let row = RoleRow::new(n, "Acme", format!("Engineer {n}"), url(n));
            if n == 2 || n == 4 { row.applied_on(applied) } else { row }
        })
        .collect()
}

#[test]
fn applied_rows_are_skipped_and_order_is_kept() {
    let dir = tempdir().unwrap();
    let renderer = FakeRenderer::default().failing(&url(3));
    let calls = renderer.calls.clone();
    let report = pipeline(dir.path(), renderer, &["salary"]).run(&five_rows()).unwrap();

    let skipped: Vec<usize> = report.skipped.iter().map(|r| r.row_number).collect();
    assert_eq!(skipped, vec![2, 4]);
    let processed: Vec<usize> = report.processed.iter().map(|p| p.row.row_number).collect();
    assert_eq!(processed, vec![1, 5]);
    let failed: Vec<usize> = report.failed.iter().map(|o| o.row.row_number).collect();
    assert_eq!(failed, vec![3]);

    let states: Vec<(usize, RowState)> = report.states.iter().map(|s| (s.row_number, s.state)).collect();
    assert_eq!(
        states,
        vec![
            (1, RowState::Scanned),
            (2, RowState::Skipped),
            (3, RowState::FetchFailed),
            (4, RowState::Skipped),
            (5, RowState::Scanned),
        ]
    );

    // skipped rows never reach the renderer
    assert_eq!(*calls.lock().unwrap(), vec![url(1), url(3), url(5)]);
    assert!(!dir.path().join("acme-engineer-2").exists());
}

#[test]
fn second_run_reuses_every_posting() {
    let dir = tempdir().unwrap();
    let rows = five_rows();

    let first = FakeRenderer::default().page(&url(1), "Base salary: competitive");
    let first_calls = first.calls.clone();
    let run1 = pipeline(dir.path(), first, &["salary"]).run(&rows).unwrap();
    assert_eq!(first_calls.lock().unwrap().len(), 3);

    let second = FakeRenderer::default().page(&url(1), "Base salary: competitive");
    let second_calls = second.calls.clone();
    let run2 = pipeline(dir.path(), second, &["salary"]).run(&rows).unwrap();

    assert!(second_calls.lock().unwrap().is_empty());
    assert!(run2.processed.iter().all(|p| p.fetch.reused_existing));
    let v1: Vec<_> = run1.processed.iter().map(|p| &p.verdict).collect();
    let v2: Vec<_> = run2.processed.iter().map(|p| &p.verdict).collect();
    assert_eq!(v1, v2);
    assert_eq!(run1.processed[0].fetch.pdf_sha256, run2.processed[0].fetch.pdf_sha256);
}

#[test]
fn duplicate_company_and_title_abort_before_any_fetch() {
    let dir = tempdir().unwrap();
    let rows = vec![
        RoleRow::new(1, "Acme", "Engineer I", url(1)),
        RoleRow::new(2, "Acme", "Engineer I", url(2)),
    ];
    let renderer = FakeRenderer::default();
    let calls = renderer.calls.clone();
    let err = pipeline(dir.path(), renderer, &["salary"]).run(&rows).unwrap_err();

    assert!(matches!(err, EpoaError::PathCollision { first_row: 1, second_row: 2, .. }));
    assert!(calls.lock().unwrap().is_empty());
    assert!(!dir.path().join("acme-engineer-i").exists());
}

#[test]
fn duplicate_rows_with_one_row_number_still_collide() {
    let dir = tempdir().unwrap();
    let first = RoleRow::new(0, "Acme", "Engineer I", url(1));
    let mut second = first.clone();
    second.role_url = url(2);
    let renderer = FakeRenderer::default();
    let calls = renderer.calls.clone();
    let err = pipeline(dir.path(), renderer, &["salary"]).run(&[first, second]).unwrap_err();

    assert!(matches!(err, EpoaError::PathCollision { .. }));
    assert!(calls.lock().unwrap().is_empty());
    assert!(!dir.path().join("acme-engineer-i").exists());
}

#[test]
fn non_latin_names_get_their_own_directories() {
    let dir = tempdir().unwrap();
    let rows = vec![
        RoleRow::new(1, "株式会社ソニー", "エンジニア", url(1)),
        RoleRow::new(2, "Яндекс", "Аналитик", url(2)),
    ];
    let report = pipeline(dir.path(), FakeRenderer::default(), &["salary"]).run(&rows).unwrap();

    assert_eq!(report.processed.len(), 2);
    assert!(report.failed.is_empty());
    assert!(dir.path().join("株式会社ソニー-エンジニア").join("posting.pdf").is_file());
    assert!(dir.path().join("яндекс-аналитик").join("posting.pdf").is_file());
}

#[test]
fn salary_posting_is_flagged_and_clean_one_is_not() {
    let dir = tempdir().unwrap();
    let rows = vec![
        RoleRow::new(1, "Acme", "Engineer I", url(1)),
        RoleRow::new(2, "Globex", "Analyst", url(2)),
    ];
    let renderer = FakeRenderer::default()
        .page(&url(1), "Engineer I\nCompetitive salary package")
        .page(&url(2), "Analyst\nWe love spreadsheets");
    let report = pipeline(dir.path(), renderer, &["salary"]).run(&rows).unwrap();

    let flagged = &report.processed[0].verdict;
    assert!(flagged.flagged);
    assert_eq!(flagged.matched_terms, BTreeSet::from(["salary".to_string()]));
    assert_eq!(flagged.matches[0].line, "Competitive salary package");

    let clean = &report.processed[1].verdict;
    assert!(!clean.flagged);
    assert!(clean.matched_terms.is_empty());
    assert_eq!(report.needs_attention_count(), 1);
}

#[test]
fn fetch_failure_leaves_no_file_and_run_continues() {
    let dir = tempdir().unwrap();
    let rows = vec![
        RoleRow::new(1, "Acme", "Engineer I", "https://example.com/job/123"),
        RoleRow::new(2, "Globex", "Analyst", url(2)),
    ];
    let renderer = FakeRenderer::default().failing("https://example.com/job/123");
    let report = pipeline(dir.path(), renderer, &["salary"]).run(&rows).unwrap();

    assert_eq!(report.failed.len(), 1);
    let failed = &report.failed[0];
    assert!(!failed.succeeded);
    assert!(failed.error_detail.as_deref().unwrap().contains("boom"));
    let loc = EvidenceLocation::for_row(dir.path(), &rows[0]);
    assert!(!loc.posting_pdf_path.exists());

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].row.row_number, 2);
}

#[test]
fn unreadable_posting_stays_in_processed() {
    let dir = tempdir().unwrap();
    let rows = vec![RoleRow::new(1, "Acme", "Engineer I", url(1))];
    let renderer = FakeRenderer::default().garbage(&url(1));
    let report = pipeline(dir.path(), renderer, &["salary"]).run(&rows).unwrap();

    assert!(report.failed.is_empty());
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].state(), RowState::ScanFailed);
    assert!(report.processed[0].verdict.error_detail.is_some());
    assert!(!report.is_clean());
}

#[test]
fn resume_is_staged_once_per_role() {
    let dir = tempdir().unwrap();
    let evidence = dir.path().join("evidence");
    let resume = dir.path().join("resume.pdf");
    std::fs::write(&resume, "my resume").unwrap();
    let mut p = pipeline(&evidence, FakeRenderer::default(), &["salary"]);
    p.resume = Some(resume.clone());

    let rows = vec![RoleRow::new(1, "Acme", "Engineer I", url(1))];
    p.run(&rows).unwrap();
    let staged: PathBuf = evidence.join("acme-engineer-i").join("resume.pdf");
    assert_eq!(std::fs::read_to_string(&staged).unwrap(), "my resume");
    assert!(evidence.join("acme-engineer-i").join("posting.pdf").is_file());
}

#[test]
fn missing_resume_does_not_fail_the_row() {
    let dir = tempdir().unwrap();
    let mut p = pipeline(dir.path(), FakeRenderer::default(), &["salary"]);
    p.resume = Some(dir.path().join("gone.pdf"));
    let report = p.run(&[RoleRow::new(1, "Acme", "Engineer I", url(1))]).unwrap();
    assert_eq!(report.processed.len(), 1);
    assert!(report.failed.is_empty());
}
