//! The content query: the build-time step that selects publication source
//! files and materializes them into the edge/node result shape consumed by
//! [`crate::publication::project`]. A source file is selected when it is a
//! markdown file with a `publications` directory somewhere in its path
//! (the `*/publications/*` pattern). Each file must be structured as
//! follows:
//!
//! 1. Initial frontmatter fence (`---`)
//! 2. YAML frontmatter with optional fields `title`, `year`, and `thumbnail`
//! 3. Terminal frontmatter fence (`---`)
//! 4. Markdown body
//!
//! For example:
//!
//! ```md
//! ---
//! title: Attention Is All You Need
//! year: 2017
//! thumbnail: attention.png
//! ---
//! We propose a new simple network architecture, the Transformer.
//! ```
//!
//! Absent frontmatter fields are not errors--they default to empty strings
//! or an omitted thumbnail. A *malformed* file (missing fences, invalid
//! YAML) fails the build; that is a contract violation between the content
//! source and this query, not a condition the renderer recovers from.

use std::fmt;
use std::fs::File;
use std::path::Path;

use pulldown_cmark::{html, Parser as MarkdownParser};
use serde::{Deserialize, Deserializer};
use tracing::debug;
use walkdir::WalkDir;

use crate::image::{ImageResolver, StaticFile};
use crate::publication::{
    ChildImageSharp, Edge, Frontmatter, Publication, QueryResult, Thumbnail,
};

const MARKDOWN_EXTENSION: &str = "md";

/// Runs the publications content query against a source directory. The
/// [`ImageResolver`] is injected so the thumbnail pipeline can be swapped
/// out.
pub struct Query<'a> {
    resolver: &'a dyn ImageResolver,
}

impl<'a> Query<'a> {
    pub fn new(resolver: &'a dyn ImageResolver) -> Query<'a> {
        Query { resolver }
    }

    /// Walks `content_source_directory` (sorted by file name, so the result
    /// order is the deterministic file-system order--no further sorting is
    /// applied downstream) and parses every matching file. Returns the query
    /// result plus the thumbnail files that must be copied into the output
    /// tree.
    pub fn run(
        &self,
        content_source_directory: &Path,
    ) -> Result<(QueryResult, Vec<StaticFile>)> {
        let mut edges = Vec::new();
        let mut static_files = Vec::new();
        for result in
            WalkDir::new(content_source_directory).sort_by_file_name()
        {
            let entry = result?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !is_publication_source(entry.path()) {
                continue;
            }
            debug!(path = %entry.path().display(), "parsing publication");
            edges.push(Edge {
                node: self.parse_publication(entry.path(), &mut static_files)?,
            });
        }
        Ok((QueryResult { edges }, static_files))
    }

    fn parse_publication(
        &self,
        path: &Path,
        static_files: &mut Vec<StaticFile>,
    ) -> Result<Publication> {
        match self._parse_publication(path, static_files) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing publication `{:?}`", path),
                Box::new(e),
            )),
        }
    }

    fn _parse_publication(
        &self,
        path: &Path,
        static_files: &mut Vec<StaticFile>,
    ) -> Result<Publication> {
        fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
            const FENCE: &str = "---";
            if !input.starts_with(FENCE) {
                return Err(Error::FrontmatterMissingStartFence);
            }
            match input[FENCE.len()..].find("---") {
                None => Err(Error::FrontmatterMissingEndFence),
                Some(offset) => Ok((
                    FENCE.len(),                        // yaml_start
                    FENCE.len() + offset,               // yaml_stop
                    FENCE.len() + offset + FENCE.len(), // body_start
                )),
            }
        }

        use std::io::Read;
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let input: &str = &contents;

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let raw: RawFrontmatter =
            serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        // a file we just read always has a parent directory
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let thumbnail = raw.thumbnail.as_deref().and_then(|reference| {
            self.resolver.resolve(base_dir, reference)
        });
        let thumbnail = thumbnail.map(|resolved| {
            static_files.extend(resolved.files);
            Thumbnail {
                child_image_sharp: Some(ChildImageSharp {
                    fluid: Some(resolved.fluid),
                }),
            }
        });

        let mut body = String::new();
        html::push_html(&mut body, MarkdownParser::new(&input[body_start..]));

        Ok(Publication {
            html: body,
            frontmatter: Frontmatter {
                title: raw.title,
                year: raw.year,
                thumbnail,
            },
        })
    }
}

/// True for markdown files with a `publications` directory component in
/// their path, i.e. the `*/publications/*` pattern. The check runs against
/// the parent path so a file merely *named* `publications.md` doesn't match.
fn is_publication_source(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == MARKDOWN_EXTENSION)
        && path.parent().map_or(false, |parent| {
            parent
                .components()
                .any(|c| c.as_os_str() == "publications")
        })
}

#[derive(Deserialize)]
struct RawFrontmatter {
    #[serde(default)]
    title: String,

    #[serde(default, deserialize_with = "deserialize_year")]
    year: String,

    #[serde(default)]
    thumbnail: Option<String>,
}

/// Accepts `year: 2017` as well as `year: "2017"`. Authors write both, and
/// YAML parses the former as a number.
fn deserialize_year<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("`year` must be a string or a number")),
    }
}

/// Represents the result of a content-query operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error running the content query.
#[derive(Debug)]
pub enum Error {
    /// Returned when a publication source file is missing its starting
    /// frontmatter fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a publication source file is missing its terminal
    /// frontmatter fence (`---` i.e., the starting fence was found but the
    /// ending one was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Publication must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator when walking the content directory.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::image::{FluidImage, Resolved};

    /// Resolves every reference to a fixed descriptor without touching the
    /// file system.
    struct FakeResolver;

    impl ImageResolver for FakeResolver {
        fn resolve(
            &self,
            _base_dir: &Path,
            reference: &str,
        ) -> Option<Resolved> {
            if reference.starts_with("missing") {
                return None;
            }
            Some(Resolved {
                fluid: FluidImage {
                    base64: String::from("data:image/svg+xml;charset=utf-8,"),
                    aspect_ratio: 800.0 / 1040.0,
                    src: format!("https://example.org/static/{}", reference),
                    src_set: format!(
                        "https://example.org/static/{} 800w",
                        reference
                    ),
                    sizes: String::from("(max-width: 800px) 100vw, 800px"),
                },
                files: Vec::new(),
            })
        }
    }

    #[test]
    fn test_run() -> Result<()> {
        let resolver = FakeResolver;
        let (result, _) = Query::new(&resolver)
            .run(Path::new("./testdata/site/content"))?;

        // file-name order within the publications directory; the note under
        // content/notes/ and the stray content/publications.md don't match
        // the `*/publications/*` pattern
        let titles: Vec<&str> = result
            .edges
            .iter()
            .map(|e| e.node.frontmatter.title.as_str())
            .collect();
        assert_eq!(
            titles,
            vec![
                "Attention Is All You Need",
                "GPT-3: Language Models",
                "Missing Thumb",
            ]
        );

        // `year: 2017` is a YAML number and still arrives as a string
        assert_eq!(result.edges[0].node.frontmatter.year, "2017");
        // absent year defaults to the empty string
        assert_eq!(result.edges[1].node.frontmatter.year, "");
        assert_eq!(result.edges[2].node.frontmatter.year, "2019");

        assert!(result.edges[0].node.frontmatter.thumbnail.is_some());
        assert!(result.edges[1].node.frontmatter.thumbnail.is_none());
        // referenced thumbnail that fails to resolve is omitted, not an
        // error
        assert!(result.edges[2].node.frontmatter.thumbnail.is_none());

        assert!(result.edges[0].node.html.contains("<p>"));
        Ok(())
    }

    #[test]
    fn test_missing_start_fence() {
        let resolver = FakeResolver;
        let err = Query::new(&resolver)
            .run(Path::new("./testdata/broken"))
            .expect_err("unfenced file should fail the query");
        assert!(format!("{}", err).contains("must begin with `---`"));
    }

    #[test]
    fn test_is_publication_source() {
        assert!(is_publication_source(Path::new(
            "content/publications/paper.md"
        )));
        assert!(is_publication_source(Path::new(
            "content/publications/2021/paper.md"
        )));
        assert!(!is_publication_source(Path::new("content/publications.md")));
        assert!(!is_publication_source(Path::new("content/notes/note.md")));
        assert!(!is_publication_source(Path::new(
            "content/publications/thumb.png"
        )));
    }
}
