//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the output site: running the content query
//! ([`crate::query`]), rendering the listing and detail pages
//! ([`crate::write`]), copying static assets and thumbnail files into the
//! static output directory, and generating the Atom feed.

use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::image::{StaticFile, StaticImageResolver};
use crate::query::{Error as QueryError, Query};
use crate::theme;
use crate::write::{Error as WriteError, Writer};
use gtmpl::Template;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Builds the site from a [`Config`] object. This calls into [`Query::run`]
/// and [`Writer::write_pages`] which do the heavy-lifting. This function
/// also copies the static assets and the thumbnails collected by the query
/// into the output directory.
pub fn build_site(config: Config) -> Result<()> {
    let resolver = StaticImageResolver {
        thumbnails_url: config.thumbnails_url.clone(),
        thumbnails_output_directory: config
            .thumbnails_output_directory
            .clone(),
    };

    // run the content query
    let (result, static_files) =
        Query::new(&resolver).run(&config.content_source_directory)?;
    info!(publications = result.edges.len(), "content query complete");

    // Parse the template files; an empty file list means the built-in
    // template.
    let listing_template = parse_template(
        config.listing_template.iter(),
        theme::DEFAULT_LISTING_TEMPLATE,
    )?;
    let publication_template = parse_template(
        config.publication_template.iter(),
        theme::DEFAULT_PUBLICATION_TEMPLATE,
    )?;

    // Blow away the old output directories so we don't have any collisions.
    // We don't naively delete the whole root output directory in case the
    // user accidentally passes the wrong directory.
    rmdir(&config.publications_output_directory)?;
    rmdir(&config.static_output_directory)?;
    std::fs::create_dir_all(&config.root_output_directory)?;

    // write the listing and detail pages
    let writer = Writer {
        listing_template: &listing_template,
        publication_template: &publication_template,
        publications_output_directory: &config.publications_output_directory,
        home_page: &config.home_page,
        static_url: &config.static_url,
    };
    writer.write_pages(&result.edges)?;
    info!(
        pages = result.edges.len() + 1,
        "wrote listing and detail pages"
    );

    // copy the static directory, then lay the stylesheet and the thumbnail
    // files on top
    if config.static_source_directory.is_dir() {
        copy_dir(
            &config.static_source_directory,
            &config.static_output_directory,
        )?;
    } else {
        std::fs::create_dir_all(&config.static_output_directory)?;
    }
    write_stylesheet(&config)?;
    copy_static_files(&static_files)?;

    // create the atom feed
    write_feed(
        FeedConfig {
            title: config.title,
            id: config.home_page.to_string(),
            author: config.author,
            home_page: config.home_page,
            publications_url: config.publications_url,
        },
        &result.edges,
        File::create(config.root_output_directory.join("feed.atom"))?,
    )?;
    info!("site build complete");

    Ok(())
}

fn write_stylesheet(config: &Config) -> Result<()> {
    let target = config.static_output_directory.join("style.css");
    match &config.stylesheet {
        Some(source) => {
            std::fs::copy(source, &target)?;
        }
        None => std::fs::write(&target, theme::DEFAULT_STYLESHEET)?,
    }
    Ok(())
}

fn copy_static_files(files: &[StaticFile]) -> Result<()> {
    for (source, target) in files {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, target)?;
    }
    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            copy_dir(
                &src.join(entry.file_name()),
                &dst.join(entry.file_name()),
            )?;
        } else {
            std::fs::copy(
                src.join(entry.file_name()),
                dst.join(entry.file_name()),
            )?;
        }
    }

    Ok(())
}

// Loads the template file contents, concatenates them, and parses the
// result into a template. An empty file list falls back to the provided
// built-in template source.
fn parse_template<P: AsRef<Path>>(
    template_files: impl Iterator<Item = P>,
    default_source: &str,
) -> Result<Template> {
    let mut contents = String::new();
    for template_file in template_files {
        use std::io::Read;
        let template_file = template_file.as_ref();
        File::open(&template_file)
            .map_err(|e| Error::OpenTemplateFile {
                path: template_file.to_owned(),
                err: e,
            })?
            .read_to_string(&mut contents)?;
        contents.push(' ');
    }
    if contents.is_empty() {
        contents.push_str(default_source);
    }

    let mut template = Template::default();
    template.parse(&contents).map_err(Error::ParseTemplate)?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during querying,
/// writing, cleaning output directories, parsing template files, and other
/// I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors running the content query.
    Query(QueryError),

    /// Returned for errors writing pages to disk as HTML files.
    Write(WriteError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Query(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Query(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<QueryError> for Error {
    /// Converts [`QueryError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: QueryError) -> Error {
        Error::Query(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}
