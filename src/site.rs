use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
pub struct SiteContent {
    pub meta: PageMeta,
    pub profile: Profile,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub footer: Footer,
    #[serde(default)]
    pub sections: SectionTitles,
}

#[derive(Debug, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub locale: Option<String>,
    pub site_url: Url,
    #[serde(default)]
    pub site_name: Option<String>,
    #[serde(default)]
    pub og_image: Option<OgImage>,
    #[serde(default = "default_twitter_card")]
    pub twitter_card: String,
    /// Shorter description for Twitter cards; falls back to `description`.
    #[serde(default)]
    pub twitter_description: Option<String>,
    #[serde(default)]
    pub robots: Robots,
}

#[derive(Debug, Deserialize)]
pub struct OgImage {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Robots {
    #[serde(default = "yes")]
    pub index: bool,
    #[serde(default = "yes")]
    pub follow: bool,
}

impl Default for Robots {
    fn default() -> Self {
        Self {
            index: true,
            follow: true,
        }
    }
}

impl Robots {
    pub fn content(&self) -> String {
        format!(
            "{}, {}",
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" }
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub contacts: Vec<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    #[serde(alias = "label")]
    pub text: String,
    pub url: String,
}

impl Link {
    /// Off-site links open in a new tab.
    pub fn is_external(&self) -> bool {
        let u = self.url.trim().to_ascii_lowercase();
        u.starts_with("http://") || u.starts_with("https://")
    }
}

#[derive(Debug, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub period: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub employment: Option<String>,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub logo_alt: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Experience {
    /// Description split on blank lines. CRLF line endings are accepted.
    pub fn paragraphs(&self) -> Vec<String> {
        self.description
            .replace("\r\n", "\n")
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct SkillCategory {
    pub title: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Highlight {
    pub title: String,
    #[serde(default)]
    pub points: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Footer {
    #[serde(default)]
    pub lines: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SectionTitles {
    pub experience: String,
    pub skills: String,
    pub projects: String,
    pub highlights: String,
    pub last_updated_label: String,
}

impl Default for SectionTitles {
    fn default() -> Self {
        Self {
            experience: "Experience".to_string(),
            skills: "Skills".to_string(),
            projects: "Projects".to_string(),
            highlights: "Highlights".to_string(),
            last_updated_label: "Last updated".to_string(),
        }
    }
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_twitter_card() -> String {
    "summary_large_image".to_string()
}

fn yes() -> bool {
    true
}
