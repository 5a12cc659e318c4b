mod builtin;
mod cli;
mod html;
mod last_updated;
mod progress;
mod script;
mod site;
mod strict;
pub mod theme;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cli::Args;

pub use cli::ProgressMode;
pub use cli::{Args as CliArgs, Mode};
pub use last_updated::last_updated;
pub use site::SiteContent;

pub fn run(args: Args) -> anyhow::Result<()> {
    use std::io::IsTerminal as _;

    let progress_enabled = match args.progress {
        ProgressMode::Always => true,
        ProgressMode::Never => false,
        ProgressMode::Auto => std::io::stderr().is_terminal(),
    };
    let progress = progress::Progress::new(progress_enabled);

    let res = render(&args, &progress);
    progress.finish();
    res
}

fn render(args: &Args, progress: &progress::Progress) -> anyhow::Result<()> {
    progress.set_stage("reading site content");
    let site = load_site(&args.input)?;

    progress.set_stage("stamping last updated date");
    let date = match args.last_updated {
        Some(date) => date,
        None => last_updated::last_updated(&args.repo),
    };
    let last_updated = last_updated::format_date(date);

    progress.set_stage("loading stylesheet");
    let css_text = load_css(args)?;

    match args.mode {
        Mode::Dir => render_dir(&site, args, &css_text, &last_updated, progress),
        Mode::Single => render_single(&site, args, &css_text, &last_updated, progress),
    }
}

fn render_dir(
    site: &SiteContent,
    args: &Args,
    css_text: &str,
    last_updated: &str,
    progress: &progress::Progress,
) -> anyhow::Result<()> {
    let out_dir = args.out.clone().unwrap_or_else(|| PathBuf::from("out"));
    let css_rel = css_rel_path(&args.assets_dir_name);

    progress.set_stage("rendering page");
    let html = html::build_page(
        site,
        &html::PageOptions {
            css: "",
            css_link_href: Some(&css_rel),
            last_updated,
            initial_theme: args.initial_theme,
        },
    );
    strict::assert_page_contract(&html, css_text)?;

    progress.set_stage("writing output");
    std::fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    write_css_file(&out_dir, &css_rel, css_text)?;
    let html_path = out_dir.join("index.html");
    std::fs::write(&html_path, html).with_context(|| format!("write {}", html_path.display()))?;
    tracing::info!(path = %html_path.display(), css = %css_rel, "page written");
    Ok(())
}

fn render_single(
    site: &SiteContent,
    args: &Args,
    css_text: &str,
    last_updated: &str,
    progress: &progress::Progress,
) -> anyhow::Result<()> {
    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from("index.html"));

    progress.set_stage("rendering page");
    let html = html::build_page(
        site,
        &html::PageOptions {
            css: css_text,
            css_link_href: None,
            last_updated,
            initial_theme: args.initial_theme,
        },
    );
    strict::assert_page_contract(&html, css_text)?;

    progress.set_stage("writing output");
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    std::fs::write(&out_path, html).with_context(|| format!("write {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), "page written");
    Ok(())
}

pub fn load_site(path: &Path) -> anyhow::Result<SiteContent> {
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))
}

fn load_css(args: &Args) -> anyhow::Result<String> {
    match &args.css {
        Some(path) => {
            tracing::info!(path = %path.display(), "using custom stylesheet");
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => Ok(builtin::BUILTIN_CSS.to_string()),
    }
}

fn css_rel_path(assets_dir_name: &str) -> String {
    format!("{}/css/site.css", assets_dir_name)
}

fn write_css_file(out_dir: &Path, rel: &str, css: &str) -> anyhow::Result<()> {
    let abs = out_dir.join(rel);
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(&abs, css).with_context(|| format!("write {}", abs.display()))?;
    Ok(())
}
