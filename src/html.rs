use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::script;
use crate::site::{Experience, Highlight, Link, PageMeta, Project, SiteContent, SkillCategory, Stat};
use crate::theme::Theme;

pub struct PageOptions<'a> {
    /// Inline stylesheet text; ignored when `css_link_href` is set.
    pub css: &'a str,
    pub css_link_href: Option<&'a str>,
    pub last_updated: &'a str,
    /// Theme attribute baked into `<html>` for clients without scripting.
    pub initial_theme: Option<Theme>,
}

pub fn build_page(site: &SiteContent, opts: &PageOptions<'_>) -> String {
    let meta = &site.meta;
    let initial_theme = opts.initial_theme.map(Theme::as_str);

    let markup: Markup = html! {
        (DOCTYPE)
        html lang=(meta.lang) data-theme=[initial_theme] {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="color-scheme" content="light dark";
                script data-theme-bootstrap { (PreEscaped(script::bootstrap_script())) }
                title { (meta.title) }
                (render_meta(meta))
                @if let Some(href) = opts.css_link_href {
                    link rel="stylesheet" href=(href);
                } @else {
                    style { (PreEscaped(opts.css)) }
                }
            }
            body class="cv" {
                button type="button" id=(script::TOGGLE_BUTTON_ID) class="cv-toggle"
                    aria-label="Toggle theme" title="Toggle theme" { "◐" }
                main class="cv-container" {
                    (render_hero(site))
                    (render_stats(&site.stats))
                    (render_experience(&site.sections.experience, &site.experience))
                    (render_skills(&site.sections.skills, &site.skills))
                    (render_projects(&site.sections.projects, &site.projects))
                    (render_highlights(&site.sections.highlights, &site.highlights))
                    footer class="cv-footer" {
                        @for line in &site.footer.lines {
                            p { (line) }
                        }
                        p class="cv-updated" {
                            (site.sections.last_updated_label) ": "
                            time datetime=(opts.last_updated) { (opts.last_updated) }
                        }
                    }
                }
                script { (PreEscaped(script::toggle_script())) }
            }
        }
    };
    markup.into_string()
}

fn render_meta(meta: &PageMeta) -> Markup {
    let canonical = meta.site_url.as_str();
    let keywords = meta.keywords.join(", ");
    let twitter_description = meta.twitter_description.as_deref().unwrap_or(&meta.description);
    let og_image = meta
        .og_image
        .as_ref()
        .map(|img| (img, absolutize(meta, &img.url)));

    html! {
        meta name="description" content=(meta.description);
        @if !keywords.is_empty() {
            meta name="keywords" content=(keywords);
        }
        @if let Some(author) = &meta.author {
            meta name="author" content=(author);
            meta name="creator" content=(author);
        }
        @if let Some(publisher) = &meta.publisher {
            meta name="publisher" content=(publisher);
        }
        meta name="robots" content=(meta.robots.content());
        link rel="canonical" href=(canonical);

        meta property="og:type" content="profile";
        meta property="og:url" content=(canonical);
        meta property="og:title" content=(meta.title);
        meta property="og:description" content=(meta.description);
        @if let Some(locale) = &meta.locale {
            meta property="og:locale" content=(locale);
        }
        @if let Some(site_name) = &meta.site_name {
            meta property="og:site_name" content=(site_name);
        }
        @if let Some((img, url)) = &og_image {
            meta property="og:image" content=(url);
            @if let Some(w) = img.width {
                meta property="og:image:width" content=(w);
            }
            @if let Some(h) = img.height {
                meta property="og:image:height" content=(h);
            }
            @if let Some(alt) = &img.alt {
                meta property="og:image:alt" content=(alt);
            }
        }

        meta name="twitter:card" content=(meta.twitter_card);
        meta name="twitter:title" content=(meta.title);
        meta name="twitter:description" content=(twitter_description);
        @if let Some((_, url)) = &og_image {
            meta name="twitter:image" content=(url);
        }
    }
}

/// Social cards need absolute image URLs.
fn absolutize(meta: &PageMeta, raw: &str) -> String {
    meta.site_url
        .join(raw.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn render_hero(site: &SiteContent) -> Markup {
    let profile = &site.profile;
    html! {
        header class="cv-hero" {
            h1 { (profile.name) }
            @if let Some(headline) = &profile.headline {
                p class="cv-headline" { (headline) }
            }
            @if let Some(summary) = &profile.summary {
                p class="cv-summary" { (summary) }
            }
            @if !profile.contacts.is_empty() {
                nav class="cv-contacts" {
                    @for c in &profile.contacts {
                        (render_link(c, "cv-contact"))
                    }
                }
            }
        }
    }
}

fn render_link(link: &Link, class: &str) -> Markup {
    html! {
        @if link.is_external() {
            a class=(class) href=(link.url) target="_blank" rel="noopener noreferrer" { (link.text) }
        } @else {
            a class=(class) href=(link.url) { (link.text) }
        }
    }
}

fn render_stats(stats: &[Stat]) -> Markup {
    html! {
        @if !stats.is_empty() {
            section class="cv-stats" {
                @for s in stats {
                    div class="cv-stat" {
                        span class="cv-stat-value" { (s.value) }
                        span class="cv-stat-label" { (s.label) }
                    }
                }
            }
        }
    }
}

fn render_experience(title: &str, items: &[Experience]) -> Markup {
    html! {
        @if !items.is_empty() {
            section class="cv-section" id="experience" {
                h2 { (title) }
                div class="cv-timeline" {
                    @for exp in items {
                        (render_job(exp))
                    }
                }
            }
        }
    }
}

fn render_job(exp: &Experience) -> Markup {
    let logo_alt = exp.logo_alt.as_deref().unwrap_or(&exp.company);
    html! {
        article class="cv-job" {
            div class="cv-job-head" {
                @if let Some(logo) = &exp.logo {
                    img class="cv-logo" src=(logo) alt=(logo_alt) width="80" height="80" loading="lazy";
                }
                div {
                    div class="cv-job-title" { (exp.title) }
                    div class="cv-company" { (exp.company) }
                }
            }
            div class="cv-job-meta" {
                span { (exp.period) }
                @if let Some(location) = &exp.location {
                    span { (location) }
                }
                @if let Some(employment) = &exp.employment {
                    span { (employment) }
                }
                @if let Some(highlight) = &exp.highlight {
                    span class="cv-badge" { (highlight) }
                }
            }
            @for para in exp.paragraphs() {
                p { (para) }
            }
            (render_tags(&exp.skills))
        }
    }
}

fn render_tags(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            div class="cv-tags" {
                @for t in tags {
                    span class="cv-tag" { (t) }
                }
            }
        }
    }
}

fn render_skills(title: &str, categories: &[SkillCategory]) -> Markup {
    html! {
        @if !categories.is_empty() {
            section class="cv-section" id="skills" {
                h2 { (title) }
                div class="cv-grid" {
                    @for cat in categories {
                        div class="cv-card" {
                            h3 { (cat.title) }
                            (render_tags(&cat.skills))
                        }
                    }
                }
            }
        }
    }
}

fn render_projects(title: &str, projects: &[Project]) -> Markup {
    html! {
        @if !projects.is_empty() {
            section class="cv-section" id="projects" {
                h2 { (title) }
                div class="cv-grid" {
                    @for p in projects {
                        article class="cv-card" {
                            h3 { (p.title) }
                            @if !p.description.is_empty() {
                                p { (p.description) }
                            }
                            @if !p.links.is_empty() {
                                div class="cv-links" {
                                    @for l in &p.links {
                                        (render_link(l, "cv-project-link"))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_highlights(title: &str, highlights: &[Highlight]) -> Markup {
    html! {
        @if !highlights.is_empty() {
            section class="cv-section" id="highlights" {
                h2 { (title) }
                div class="cv-grid" {
                    @for h in highlights {
                        div class="cv-card" {
                            h3 { (h.title) }
                            ul {
                                @for point in &h.points {
                                    li { (point) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
