//! The responsive-image boundary. A publication's frontmatter references its
//! thumbnail by file path; an [`ImageResolver`] turns that reference into a
//! [`FluidImage`] descriptor, the shape the theme templates consume. The
//! heavy lifting of actually producing resized variants belongs to an
//! external image pipeline; the built-in [`StaticImageResolver`] only
//! advertises the variants that already exist next to the source file.

use gtmpl::Value;
use std::path::{Path, PathBuf};
use url::Url;

/// The variant widths a resolver looks for, in pixels.
pub const WIDTHS: [u32; 3] = [200, 400, 800];

/// Thumbnail tile geometry. The aspect ratio of every fluid descriptor is
/// derived from these.
const MAX_WIDTH: u32 = 800;
const MAX_HEIGHT: u32 = 1040;

/// A responsive-image descriptor: multiple resolution variants, a
/// low-resolution placeholder for the blur-up slot, and layout hints.
#[derive(Clone, Debug, PartialEq)]
pub struct FluidImage {
    /// Inline data URI rendered while the real image loads.
    pub base64: String,

    /// Width over height.
    pub aspect_ratio: f64,

    /// URL of the fallback (largest) image.
    pub src: String,

    /// `srcset` attribute value listing the available width variants.
    pub src_set: String,

    /// `sizes` attribute value.
    pub sizes: String,
}

impl FluidImage {
    /// Converts a [`FluidImage`] into a [`Value`] for templating. Keys use
    /// the descriptor's wire names (`aspectRatio`, `srcSet`, ...).
    pub fn to_value(&self) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("base64".to_owned(), Value::String(self.base64.clone()));
        m.insert("aspectRatio".to_owned(), Value::from(self.aspect_ratio));
        m.insert("src".to_owned(), Value::String(self.src.clone()));
        m.insert("srcSet".to_owned(), Value::String(self.src_set.clone()));
        m.insert("sizes".to_owned(), Value::String(self.sizes.clone()));
        Value::Object(m)
    }
}

/// A `(source, destination)` pair for a file that must be copied into the
/// output tree verbatim.
pub type StaticFile = (PathBuf, PathBuf);

/// The result of resolving a thumbnail reference: the descriptor plus the
/// files backing it.
pub struct Resolved {
    pub fluid: FluidImage,
    pub files: Vec<StaticFile>,
}

/// The capability of turning a thumbnail reference from frontmatter into a
/// [`FluidImage`]. Injected into the query step so the image pipeline can be
/// swapped out (notably by tests).
pub trait ImageResolver {
    /// Resolves `reference` (a path relative to `base_dir`, the directory of
    /// the markdown file that mentioned it). Returns `None` when the
    /// referenced file doesn't exist; a missing thumbnail is omitted, never
    /// an error.
    fn resolve(&self, base_dir: &Path, reference: &str) -> Option<Resolved>;
}

/// An [`ImageResolver`] that serves thumbnails as static files. The fallback
/// `src` is the source file itself; `srcset` entries are added for each
/// pre-generated `{stem}-{width}w.{ext}` variant found beside it.
pub struct StaticImageResolver {
    /// Base URL under which thumbnail files are served. Must end in a
    /// trailing slash so [`Url::join`] appends rather than replaces.
    pub thumbnails_url: Url,

    /// Directory into which thumbnail files are copied.
    pub thumbnails_output_directory: PathBuf,
}

impl StaticImageResolver {
    fn variant_name(file_name: &str, width: u32) -> String {
        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match path.extension() {
            Some(ext) => {
                format!("{}-{}w.{}", stem, width, ext.to_string_lossy())
            }
            None => format!("{}-{}w", stem, width),
        }
    }
}

impl ImageResolver for StaticImageResolver {
    fn resolve(&self, base_dir: &Path, reference: &str) -> Option<Resolved> {
        let source = base_dir.join(reference);
        if !source.is_file() {
            return None;
        }
        let file_name = source.file_name()?.to_str()?.to_owned();
        let src = self.thumbnails_url.join(&file_name).ok()?.to_string();

        let mut files = vec![(
            source.clone(),
            self.thumbnails_output_directory.join(&file_name),
        )];
        let mut variants = Vec::new();
        for &width in WIDTHS.iter() {
            let variant = Self::variant_name(&file_name, width);
            let candidate = base_dir.join(&variant);
            if candidate.is_file() {
                let url = self.thumbnails_url.join(&variant).ok()?;
                variants.push(format!("{} {}w", url, width));
                files.push((
                    candidate,
                    self.thumbnails_output_directory.join(&variant),
                ));
            }
        }
        if variants.is_empty() {
            variants.push(format!("{} {}w", src, MAX_WIDTH));
        }

        Some(Resolved {
            fluid: FluidImage {
                base64: placeholder(),
                aspect_ratio: f64::from(MAX_WIDTH) / f64::from(MAX_HEIGHT),
                src,
                src_set: variants.join(", "),
                sizes: format!(
                    "(max-width: {}px) 100vw, {}px",
                    MAX_WIDTH, MAX_WIDTH
                ),
            },
            files,
        })
    }
}

/// Builds the inline placeholder for the blur-up slot. A real pipeline would
/// embed a downscaled copy of the image; this stands in with a blank SVG of
/// the right proportions so the layout doesn't shift on load.
fn placeholder() -> String {
    format!(
        "data:image/svg+xml;charset=utf-8,%3Csvg xmlns='http://www.w3.org/2000/svg' width='{}' height='{}'%3E%3C/svg%3E",
        MAX_WIDTH, MAX_HEIGHT
    )
}

#[cfg(test)]
mod test {
    use super::*;

    fn resolver() -> StaticImageResolver {
        StaticImageResolver {
            thumbnails_url: Url::parse(
                "https://example.org/static/thumbnails/",
            )
            .unwrap(),
            thumbnails_output_directory: PathBuf::from(
                "/tmp/out/static/thumbnails",
            ),
        }
    }

    #[test]
    fn test_resolve_missing_file() {
        assert!(resolver()
            .resolve(Path::new("./testdata/site/content/publications"), "no-such.png")
            .is_none());
    }

    #[test]
    fn test_resolve_with_variants() {
        let resolved = resolver()
            .resolve(
                Path::new("./testdata/site/content/publications"),
                "attention.png",
            )
            .expect("thumbnail should resolve");
        assert_eq!(
            resolved.fluid.src,
            "https://example.org/static/thumbnails/attention.png"
        );
        // the 400w variant exists in testdata; 200w and 800w don't
        assert_eq!(
            resolved.fluid.src_set,
            "https://example.org/static/thumbnails/attention-400w.png 400w"
        );
        assert_eq!(resolved.files.len(), 2);
        assert!(resolved.fluid.base64.starts_with("data:image/svg+xml"));
    }

    #[test]
    fn test_resolve_without_variants_falls_back_to_src() {
        let resolved = resolver()
            .resolve(
                Path::new("./testdata/site/content/publications"),
                "plain.png",
            )
            .expect("thumbnail should resolve");
        assert_eq!(
            resolved.fluid.src_set,
            "https://example.org/static/thumbnails/plain.png 800w"
        );
        assert_eq!(resolved.files.len(), 1);
    }
}
