//! Support for creating an Atom feed from the publications list. Each
//! publication with a non-empty `year` becomes one feed entry dated January
//! 1st of that year; undated publications are omitted from the feed rather
//! than failing the build.

use crate::config::Author;
use crate::publication::{slug, Edge};
use atom_syndication::{Entry, Error as AtomError, Feed, Link, Person};
use chrono::{
    FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, ParseError, ParseResult, TimeZone, Utc,
};
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub id: String,
    pub author: Option<Author>,
    pub home_page: Url,

    /// Base URL for publication detail pages. Must end in a trailing slash.
    pub publications_url: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and the query
/// edges, and writes the result to a [`std::io::Write`]. This function takes
/// ownership of the provided [`FeedConfig`].
pub fn write_feed<W: Write>(
    config: FeedConfig,
    edges: &[Edge],
    w: W,
) -> Result<()> {
    feed(config, edges)?.write_to(w)?;
    Ok(())
}

fn feed(config: FeedConfig, edges: &[Edge]) -> ParseResult<Feed> {
    use std::collections::HashMap;
    Ok(Feed {
        entries: feed_entries(&config, edges)?,
        title: config.title,
        id: config.id,
        updated: FixedOffset::east(0).from_utc_datetime(&Utc::now().naive_utc()),
        authors: author_to_people(config.author),
        categories: Vec::new(),
        contributors: Vec::new(),
        generator: None,
        icon: None,
        logo: None,
        rights: None,
        subtitle: None,
        extensions: HashMap::new(),
        namespaces: HashMap::new(),
        links: vec![Link {
            href: config.home_page.to_string(),
            rel: "alternate".to_string(),
            title: None,
            hreflang: None,
            mime_type: None,
            length: None,
        }],
    })
}

fn feed_entries(config: &FeedConfig, edges: &[Edge]) -> ParseResult<Vec<Entry>> {
    use std::collections::HashMap;
    let mut entries: Vec<Entry> = Vec::with_capacity(edges.len());

    for edge in edges {
        let frontmatter = &edge.node.frontmatter;
        if frontmatter.year.is_empty() {
            // undated publications have no place on a timeline
            continue;
        }

        // Publications carry a year, not a date, and chrono refuses to parse
        // anything less precise than a full date in a known timezone. So:
        // pin the entry to January 1st, midnight, UTC.
        let naive_date = NaiveDate::parse_from_str(
            &format!("{}-01-01", frontmatter.year),
            "%Y-%m-%d",
        )?;
        let naive_time = NaiveTime::from_hms(0, 0, 0);
        let naive_date_time = NaiveDateTime::new(naive_date, naive_time);
        let offset = FixedOffset::east(0);
        let date = offset.from_utc_datetime(&naive_date_time);

        let url = config
            .publications_url
            .join(&format!("{}/", slug(&frontmatter.title)))
            .unwrap_or_else(|_| config.publications_url.clone());

        entries.push(Entry {
            id: url.to_string(),
            title: frontmatter.title.clone(),
            updated: date,
            authors: author_to_people(config.author.clone()),
            links: vec![Link {
                href: url.to_string(),
                rel: "alternate".to_owned(),
                title: None,
                mime_type: None,
                hreflang: None,
                length: None,
            }],
            rights: None,
            summary: Some(edge.node.html.clone()),
            categories: Vec::new(),
            contributors: Vec::new(),
            published: Some(date),
            source: None,
            content: None,
            extensions: HashMap::new(),
        })
    }
    Ok(entries)
}

fn author_to_people(author: Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name,
            email: author.email,
            uri: None,
        }],
        None => Vec::new(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, Atom, and
/// date-time parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when there is an issue parsing a publication's year.
    DateTimeParse(ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::DateTimeParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::DateTimeParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: ParseError) -> Error {
        Error::DateTimeParse(err)
    }
}
