//! Defines the publication data model and the projection from raw query
//! nodes to presentation records. The raw side mirrors the content-query
//! result shape ([`QueryResult`] holding `edges`, each wrapping a `node`);
//! the presentation side is the flat [`PublicationTile`] the renderer
//! consumes. [`project`] is the only bridge between them: a pure,
//! order-preserving function that never fails--every absent field collapses
//! to an empty string or an omitted thumbnail.

use crate::image::FluidImage;
use gtmpl::Value;

/// A raw publication entry. `html` is the rendered body; the listing page
/// doesn't use it, but the per-publication detail page does.
#[derive(Clone, Debug, Default)]
pub struct Publication {
    pub html: String,
    pub frontmatter: Frontmatter,
}

/// The frontmatter fields the query selects for each publication. All of
/// them are optional in the source file.
#[derive(Clone, Debug, Default)]
pub struct Frontmatter {
    pub title: String,
    pub year: String,
    pub thumbnail: Option<Thumbnail>,
}

/// The thumbnail link chain. Each hop is optional; [`project`] navigates the
/// chain without ever failing.
#[derive(Clone, Debug)]
pub struct Thumbnail {
    pub child_image_sharp: Option<ChildImageSharp>,
}

#[derive(Clone, Debug)]
pub struct ChildImageSharp {
    pub fluid: Option<FluidImage>,
}

/// The edge/node wrapper convention of the query result: each list item
/// wraps the actual record.
#[derive(Clone, Debug)]
pub struct Edge {
    pub node: Publication,
}

/// The full content-query result.
#[derive(Clone, Debug, Default)]
pub struct QueryResult {
    pub edges: Vec<Edge>,
}

impl Publication {
    /// Converts a [`Publication`] into a [`Value`] for the detail-page
    /// template. Fields: `title`, `year`, `html`, `thumbnail`.
    pub fn to_value(&self) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "title".to_owned(),
            Value::String(self.frontmatter.title.clone()),
        );
        m.insert(
            "year".to_owned(),
            Value::String(self.frontmatter.year.clone()),
        );
        m.insert("html".to_owned(), Value::String(self.html.clone()));
        m.insert(
            "thumbnail".to_owned(),
            option_to_value(fluid(&self.frontmatter)),
        );
        Value::Object(m)
    }
}

/// A single entry of the listing page: everything a tile needs, flattened.
/// Recomputed on every render pass and never persisted.
#[derive(Clone, Debug)]
pub struct PublicationTile {
    pub title: String,
    pub year: String,
    pub thumbnail: Option<FluidImage>,
    pub slug: String,
}

impl PublicationTile {
    /// The tile's detail route. An empty title yields the degenerate
    /// `/publications/` route, which falls through to the listing page.
    pub fn href(&self) -> String {
        format!("/publications/{}", self.slug)
    }

    /// Converts a [`PublicationTile`] into a [`Value`] for the listing
    /// template. Fields: `title`, `year`, `slug`, `href`, `thumbnail`
    /// (an object, or nil when the publication has none).
    pub fn to_value(&self) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::String(self.title.clone()));
        m.insert("year".to_owned(), Value::String(self.year.clone()));
        m.insert("slug".to_owned(), Value::String(self.slug.clone()));
        m.insert("href".to_owned(), Value::String(self.href()));
        m.insert(
            "thumbnail".to_owned(),
            option_to_value(self.thumbnail.as_ref()),
        );
        Value::Object(m)
    }
}

fn option_to_value(opt: Option<&FluidImage>) -> Value {
    match opt {
        Some(img) => img.to_value(),
        None => Value::Nil,
    }
}

fn fluid(frontmatter: &Frontmatter) -> Option<&FluidImage> {
    frontmatter
        .thumbnail
        .as_ref()
        .and_then(|t| t.child_image_sharp.as_ref())
        .and_then(|c| c.fluid.as_ref())
}

/// Derives a URL slug from a publication title: lowercase the title, then
/// replace every maximal run of non-word characters (anything outside
/// `[A-Za-z0-9_]`) with a single hyphen. Leading or trailing punctuation
/// therefore produces a leading or trailing hyphen, and an empty title
/// produces an empty slug. There is no uniqueness check; two titles that
/// normalize to the same slug collide on the same detail route.
pub fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_run = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out
}

/// Projects raw query edges into presentation tiles. Preserves the order of
/// `edges` exactly as supplied by the query (no re-sort), and raises no
/// errors: missing fields have already collapsed to their defaults on the
/// node, and a broken thumbnail chain simply yields `None`.
pub fn project(edges: &[Edge]) -> Vec<PublicationTile> {
    edges
        .iter()
        .map(|edge| {
            let frontmatter = &edge.node.frontmatter;
            PublicationTile {
                title: frontmatter.title.clone(),
                year: frontmatter.year.clone(),
                thumbnail: fluid(frontmatter).cloned(),
                slug: slug(&frontmatter.title),
            }
        })
        .collect()
}
