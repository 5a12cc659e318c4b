use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

const DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("iso date regex"));

/// Date of the latest commit in `repo_dir`, or today when git can't tell us.
pub fn last_updated(repo_dir: &Path) -> NaiveDate {
    match git_commit_date(repo_dir) {
        Some(date) => {
            tracing::debug!(%date, "last updated from git history");
            date
        }
        None => {
            let today = chrono::Local::now().date_naive();
            tracing::info!(
                repo = %repo_dir.display(),
                %today,
                "no git history available; using build date"
            );
            today
        }
    }
}

fn git_commit_date(repo_dir: &Path) -> Option<NaiveDate> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(["log", "-1", "--format=%cd", "--date=format:%Y-%m-%d"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    let output = match output {
        Ok(o) => o,
        Err(e) => {
            tracing::debug!(error = %e, "failed to spawn git");
            return None;
        }
    };
    if !output.status.success() {
        tracing::debug!(status = %output.status, "git log failed");
        return None;
    }
    parse_git_date(&String::from_utf8_lossy(&output.stdout))
}

/// Accepts exactly `YYYY-MM-DD`, tolerating surrounding whitespace and quotes.
pub fn parse_git_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim().replace('"', "");
    parse_date(&cleaned)
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// CLI value parser for `--last-updated`.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("expected a YYYY-MM-DD date, got {s:?}"))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
