//! Responsible for templating and writing the output HTML pages: the
//! listing page built from the projected [`PublicationTile`]s and one detail
//! page per publication. Rendering itself is a pure function of the
//! projected records into any [`io::Write`]; only [`Writer::write_pages`]
//! touches the file system.

use crate::publication::{self, Edge, PublicationTile};
use gtmpl::{Context, Template, Value};
use std::fmt;
use std::io;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Renders and writes the publications pages.
pub struct Writer<'a> {
    /// The template for the listing page.
    pub listing_template: &'a Template,

    /// The template for detail pages.
    pub publication_template: &'a Template,

    /// The directory in which the pages are written. The listing lands at
    /// `{dir}/index.html`; each detail page at `{dir}/{slug}/index.html` so
    /// the extensionless `/publications/{slug}` route resolves statically.
    pub publications_output_directory: &'a Path,

    /// The URL for the site's home page, made available to every template.
    pub home_page: &'a Url,

    /// The URL prefix for static assets (the stylesheet lives under it).
    /// Made available to every template.
    pub static_url: &'a Url,
}

impl Writer<'_> {
    /// Renders the listing page for a set of tiles. Zero tiles renders the
    /// header over an empty container; that is the accepted empty state, not
    /// an error.
    pub fn render_listing<W: io::Write>(
        &self,
        tiles: &[PublicationTile],
        w: &mut W,
    ) -> Result<()> {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "tiles".to_owned(),
            Value::Array(tiles.iter().map(|t| t.to_value()).collect()),
        );
        m.insert(
            "home_page".to_owned(),
            Value::String(self.home_page.to_string()),
        );
        m.insert(
            "static_url".to_owned(),
            Value::String(self.static_url.to_string()),
        );
        self.listing_template.execute(
            w,
            &Context::from(Value::Object(m)).map_err(Error::Template)?,
        )?;
        Ok(())
    }

    /// Renders the detail page for a single publication.
    pub fn render_publication<W: io::Write>(
        &self,
        edge: &Edge,
        w: &mut W,
    ) -> Result<()> {
        let mut value = edge.node.to_value();
        if let Value::Object(obj) = &mut value {
            obj.insert(
                "home_page".to_owned(),
                Value::String(self.home_page.to_string()),
            );
            obj.insert(
                "static_url".to_owned(),
                Value::String(self.static_url.to_string()),
            );
        }
        self.publication_template
            .execute(w, &Context::from(value).map_err(Error::Template)?)?;
        Ok(())
    }

    /// Projects the query edges and writes the listing plus one detail page
    /// per publication. A tile whose slug is empty (empty title) gets no
    /// detail page--its degenerate `/publications/` route already resolves
    /// to the listing. Slugs are not deduplicated; colliding titles write to
    /// the same path and the last one wins.
    pub fn write_pages(&self, edges: &[Edge]) -> Result<()> {
        let tiles = publication::project(edges);

        std::fs::create_dir_all(self.publications_output_directory)?;
        let listing_path =
            self.publications_output_directory.join("index.html");
        debug!(path = %listing_path.display(), "writing listing page");
        self.render_listing(
            &tiles,
            &mut std::fs::File::create(&listing_path)?,
        )?;

        for (tile, edge) in tiles.iter().zip(edges.iter()) {
            if tile.slug.is_empty() {
                continue;
            }
            let dir = self.publications_output_directory.join(&tile.slug);
            std::fs::create_dir_all(&dir)?;
            let path = dir.join("index.html");
            debug!(path = %path.display(), "writing detail page");
            self.render_publication(
                edge,
                &mut std::fs::File::create(&path)?,
            )?;
        }
        Ok(())
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`].
    /// This allows us to use the `?` operator for fallible template
    /// operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::image::FluidImage;
    use crate::theme;

    fn template(source: &str) -> Template {
        let mut t = Template::default();
        t.parse(source).expect("template should parse");
        t
    }

    fn render(tiles: &[PublicationTile]) -> String {
        let listing = template(theme::DEFAULT_LISTING_TEMPLATE);
        let detail = template(theme::DEFAULT_PUBLICATION_TEMPLATE);
        let home_page = Url::parse("https://example.org/").unwrap();
        let static_url = Url::parse("https://example.org/static/").unwrap();
        let writer = Writer {
            listing_template: &listing,
            publication_template: &detail,
            publications_output_directory: Path::new("/tmp/unused"),
            home_page: &home_page,
            static_url: &static_url,
        };
        let mut out = Vec::new();
        writer
            .render_listing(tiles, &mut out)
            .expect("rendering should succeed");
        String::from_utf8(out).expect("output should be UTF-8")
    }

    fn tile(title: &str, year: &str) -> PublicationTile {
        PublicationTile {
            title: title.to_owned(),
            year: year.to_owned(),
            thumbnail: None,
            slug: publication::slug(title),
        }
    }

    #[test]
    fn test_render_listing_empty() {
        let html = render(&[]);
        assert!(html.contains("<h1>Publications</h1>"));
        assert!(html.contains(r#"class="publications-container""#));
        assert!(!html.contains(r#"class="publication""#));
    }

    #[test]
    fn test_render_listing_route() {
        let html = render(&[tile("My Paper", "2021")]);
        assert!(html.contains(r#"href="/publications/my-paper""#));
        assert!(html.contains(r#"<span class="publication-title">My Paper</span>"#));
        assert!(html.contains(r#"<span class="publication-year">2021</span>"#));
    }

    #[test]
    fn test_render_listing_no_thumbnail_no_image_slot() {
        let html = render(&[tile("Plain", "")]);
        assert!(!html.contains("<img"));
        // the year caption is present but empty
        assert!(html.contains(r#"<span class="publication-year"></span>"#));
    }

    #[test]
    fn test_render_listing_with_thumbnail() {
        let mut t = tile("Pictured", "2018");
        t.thumbnail = Some(FluidImage {
            base64: String::from("data:image/svg+xml;charset=utf-8,"),
            aspect_ratio: 800.0 / 1040.0,
            src: String::from("https://example.org/static/pictured.png"),
            src_set: String::from(
                "https://example.org/static/pictured.png 800w",
            ),
            sizes: String::from("(max-width: 800px) 100vw, 800px"),
        });
        let html = render(&[t]);
        assert!(html
            .contains(r#"src="https://example.org/static/pictured.png""#));
        assert!(html
            .contains(r#"srcset="https://example.org/static/pictured.png 800w""#));
    }

    #[test]
    fn test_render_listing_preserves_order() {
        let html = render(&[
            tile("Zebra Stripes", "2021"),
            tile("Aardvark Habits", "2019"),
        ]);
        let zebra = html.find("Zebra Stripes").unwrap();
        let aardvark = html.find("Aardvark Habits").unwrap();
        assert!(zebra < aardvark);
    }

    #[test]
    fn test_render_publication() {
        let listing = template(theme::DEFAULT_LISTING_TEMPLATE);
        let detail = template(theme::DEFAULT_PUBLICATION_TEMPLATE);
        let home_page = Url::parse("https://example.org/").unwrap();
        let static_url = Url::parse("https://example.org/static/").unwrap();
        let writer = Writer {
            listing_template: &listing,
            publication_template: &detail,
            publications_output_directory: Path::new("/tmp/unused"),
            home_page: &home_page,
            static_url: &static_url,
        };
        let edge = Edge {
            node: crate::publication::Publication {
                html: String::from("<p>We propose things.</p>"),
                frontmatter: crate::publication::Frontmatter {
                    title: String::from("My Paper"),
                    year: String::from("2021"),
                    thumbnail: None,
                },
            },
        };
        let mut out = Vec::new();
        writer
            .render_publication(&edge, &mut out)
            .expect("rendering should succeed");
        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("<h1>My Paper</h1>"));
        assert!(html.contains("<p>We propose things.</p>"));
    }
}
