//! Project configuration. A project is a directory holding a `vita.yaml`
//! file, a `content/` tree (publications live under
//! `content/publications/`), optionally a `static/` directory copied into
//! the output verbatim, and optionally a `theme/` directory overriding the
//! built-in templates and stylesheet.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The site author, used for feed metadata.
#[derive(Deserialize, Clone)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct Project {
    /// Absolute base URL of the site. Must end in a trailing slash so URL
    /// joins append to it.
    site_root: Url,

    /// Path of the home page relative to `site_root`.
    #[serde(default)]
    home_page: String,

    #[serde(default = "default_title")]
    title: String,

    #[serde(default)]
    author: Option<Author>,
}

fn default_title() -> String {
    String::from("Publications")
}

#[derive(Deserialize, Default)]
struct ThemeFiles {
    /// Template files concatenated into the listing-page template. Empty
    /// means the built-in template.
    #[serde(default)]
    listing_template: Vec<PathBuf>,

    /// Template files concatenated into the detail-page template. Empty
    /// means the built-in template.
    #[serde(default)]
    publication_template: Vec<PathBuf>,

    /// Stylesheet copied to `static/style.css`. Absent means the built-in
    /// stylesheet.
    #[serde(default)]
    stylesheet: Option<PathBuf>,
}

pub struct Config {
    pub title: String,
    pub author: Option<Author>,
    pub content_source_directory: PathBuf,
    pub static_source_directory: PathBuf,
    pub listing_template: Vec<PathBuf>,
    pub publication_template: Vec<PathBuf>,
    pub stylesheet: Option<PathBuf>,
    pub home_page: Url,
    pub publications_url: Url,
    pub static_url: Url,
    pub thumbnails_url: Url,
    pub publications_output_directory: PathBuf,
    pub static_output_directory: PathBuf,
    pub thumbnails_output_directory: PathBuf,
    pub root_output_directory: PathBuf,
}

impl Config {
    /// Looks for a `vita.yaml` in `dir` or any of its ancestors and loads
    /// the configuration from the first one found.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join("vita.yaml");
        if path.exists() {
            match Config::from_project_file(&path, output_directory) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent, output_directory),
                None => Err(anyhow!(
                    "Could not find `vita.yaml` in any parent directory"
                )),
            }
        }
    }

    pub fn from_project_file(
        path: &Path,
        output_directory: &Path,
    ) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;

        let theme_dir = project_root.join("theme");
        let theme_file = theme_dir.join("theme.yaml");
        let theme: ThemeFiles = if theme_file.is_file() {
            serde_yaml::from_reader(open(&theme_file, "theme")?)?
        } else {
            ThemeFiles::default()
        };

        let static_output_directory = output_directory.join("static");
        Ok(Config {
            title: project.title,
            author: project.author,
            content_source_directory: project_root.join("content"),
            static_source_directory: project_root.join("static"),
            listing_template: theme
                .listing_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            publication_template: theme
                .publication_template
                .iter()
                .map(|relpath| theme_dir.join(relpath))
                .collect(),
            stylesheet: theme.stylesheet.map(|relpath| theme_dir.join(relpath)),
            home_page: project.site_root.join(&project.home_page)?,
            publications_url: project.site_root.join("publications/")?,
            static_url: project.site_root.join("static/")?,
            thumbnails_url: project.site_root.join("static/thumbnails/")?,
            publications_output_directory: output_directory.join("publications"),
            thumbnails_output_directory: static_output_directory.join("thumbnails"),
            static_output_directory,
            root_output_directory: output_directory.to_owned(),
        })
    }
}

fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!(
            "Opening {} file `{}`: {}",
            kind,
            path.display(),
            e
        )),
        Ok(file) => Ok(file),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_project_file() -> Result<()> {
        let config = Config::from_project_file(
            Path::new("./testdata/site/vita.yaml"),
            Path::new("/tmp/out"),
        )?;
        assert_eq!(config.title, "Publications");
        assert_eq!(
            config.publications_url.as_str(),
            "https://example.org/publications/"
        );
        assert_eq!(
            config.thumbnails_url.as_str(),
            "https://example.org/static/thumbnails/"
        );
        assert_eq!(
            config.content_source_directory,
            Path::new("./testdata/site/content")
        );
        // no theme directory: built-in templates and stylesheet
        assert!(config.listing_template.is_empty());
        assert!(config.publication_template.is_empty());
        assert!(config.stylesheet.is_none());
        Ok(())
    }

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let config = Config::from_directory(
            Path::new("./testdata/site/content/publications"),
            Path::new("/tmp/out"),
        )?;
        assert_eq!(config.home_page.as_str(), "https://example.org/");
        Ok(())
    }
}
