//! The library code for the `vita` static site generator, which renders the
//! "Publications" section of a personal academic website. The architecture
//! can be generally broken down into three distinct steps:
//!
//! 1. Querying publication entries from markdown source files on disk
//!    ([`crate::query`])
//! 2. Projecting each entry into a flat presentation record--a "tile" with a
//!    title, a year, an optional responsive thumbnail, and a URL slug
//!    ([`crate::publication`])
//! 3. Rendering the tiles into output files on disk ([`crate::write`])
//!
//! The first step plays the role a content-query engine would play in a
//! framework-based site: it selects every markdown file whose path matches
//! `*/publications/*`, parses its YAML frontmatter, and renders its body to
//! HTML, producing the conventional edge/node query-result shape. The second
//! step is a pure function; all tolerance for missing data lives there
//! (absent fields default to empty strings or omitted thumbnails, never
//! errors). The third step applies the theme templates ([`crate::theme`]) to
//! produce the listing page, one detail page per publication, and an Atom
//! feed ([`crate::feed`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod image;
pub mod publication;
pub mod query;
pub mod theme;
pub mod write;
