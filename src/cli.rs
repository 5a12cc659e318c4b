use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::last_updated::parse_date_arg;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Dir,
    Single,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressMode {
    /// Enable progress UI when stderr is a TTY.
    Auto,
    /// Always enable progress UI (even when piped).
    Always,
    /// Never show progress UI.
    Never,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Site content JSON file (profile, experience, skills, projects, page metadata).
    #[arg(long)]
    pub input: PathBuf,

    /// Output mode: `dir` (index.html + assets/) or `single` (one self-contained HTML).
    #[arg(long, value_enum, default_value = "dir")]
    pub mode: Mode,

    /// Output path. For `dir` mode: a directory. For `single` mode: an HTML file path.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Local stylesheet replacing the built-in light/dark theme CSS.
    ///
    /// It should style `:root[data-theme="light"]` and `:root[data-theme="dark"]`.
    #[arg(long)]
    pub css: Option<PathBuf>,

    /// Git working tree used to stamp the "last updated" date.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,

    /// Fixed "last updated" date (`YYYY-MM-DD`); skips the git lookup.
    #[arg(long, value_parser = parse_date_arg)]
    pub last_updated: Option<NaiveDate>,

    /// Theme attribute baked into the markup for clients without scripting.
    #[arg(long, value_enum)]
    pub initial_theme: Option<Theme>,

    /// Assets directory name for `dir` mode.
    #[arg(long, default_value = "assets")]
    pub assets_dir_name: String,

    /// Progress display: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["cv-page-render", "--input", "site.json"]).unwrap();
        assert!(matches!(args.mode, Mode::Dir));
        assert_eq!(args.repo, PathBuf::from("."));
        assert_eq!(args.assets_dir_name, "assets");
        assert!(args.last_updated.is_none());
        assert!(args.initial_theme.is_none());
    }

    #[test]
    fn parses_theme_and_date() {
        let args = Args::try_parse_from([
            "cv-page-render",
            "--input",
            "site.json",
            "--initial-theme",
            "dark",
            "--last-updated",
            "2025-04-30",
        ])
        .unwrap();
        assert_eq!(args.initial_theme, Some(Theme::Dark));
        assert_eq!(args.last_updated, NaiveDate::from_ymd_opt(2025, 4, 30));
    }

    #[test]
    fn rejects_unknown_theme_and_bad_date() {
        assert!(
            Args::try_parse_from(["x", "--input", "a", "--initial-theme", "sepia"]).is_err()
        );
        assert!(Args::try_parse_from(["x", "--input", "a", "--last-updated", "today"]).is_err());
    }
}
