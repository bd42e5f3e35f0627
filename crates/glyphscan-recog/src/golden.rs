//! Golden template sets
//!
//! A golden template is a reference glyph image whose file name starts
//! with the character it shows. Pixels darker than
//! [`GOLDEN_THRESHOLD`] belong to the glyph. Each template keeps three
//! views of the same data:
//!
//! - the gray image as loaded
//! - a binary target raster (1 on glyph pixels) used for matching
//! - the glyph as a [`Cluster`] carrying class name, id and centroid
//!
//! A [`GoldenSet`] is loaded once and only read afterwards.

use crate::error::RecogResult;
use glyphscan_core::PixelBuffer;
use glyphscan_region::{Cluster, GOLDEN_THRESHOLD};
use std::path::{Path, PathBuf};

/// A reference glyph.
#[derive(Debug, Clone)]
pub struct GoldenTemplate {
    /// Name the class was taken from (usually the file stem)
    pub name: String,
    /// Gray template image
    pub image: PixelBuffer,
    /// 1 where the template image is darker than the threshold, else 0
    pub target: PixelBuffer,
    /// Glyph pixels with class name, id and centroid
    pub cluster: Cluster,
}

impl GoldenTemplate {
    /// Build a template from an image; RGB is converted to gray.
    pub fn from_image(name: &str, image: &PixelBuffer) -> Self {
        let gray = image.to_gray();
        // v < threshold  <=>  255 - v >= 256 - threshold
        let target = gray.invert().binarize((256 - GOLDEN_THRESHOLD as u16) as u8);
        let cluster = Cluster::from_golden_image(name, &gray);
        Self {
            name: name.to_string(),
            image: gray,
            target,
            cluster,
        }
    }

    /// Load a template file; the class comes from the file stem.
    pub fn load<P: AsRef<Path>>(path: P) -> RecogResult<Self> {
        let path = path.as_ref();
        let image = glyphscan_io::read_image(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::from_image(&name, &image))
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        &self.cluster.class_name
    }

    #[inline]
    pub fn class_id(&self) -> i32 {
        self.cluster.class_id
    }
}

/// Ordered, read-only collection of golden templates.
#[derive(Debug, Clone, Default)]
pub struct GoldenSet {
    templates: Vec<GoldenTemplate>,
}

impl GoldenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(templates: Vec<GoldenTemplate>) -> Self {
        Self { templates }
    }

    /// Load every decodable image in `dir`, in file name order.
    ///
    /// Files that cannot be read or decoded are logged and skipped, so an
    /// empty or unusable folder gives an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error only when the directory itself cannot be listed.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> RecogResult<Self> {
        let dir = dir.as_ref();
        let mut templates = Vec::new();
        for path in list_files(dir)? {
            match GoldenTemplate::load(&path) {
                Ok(t) if t.name.is_empty() => {
                    tracing::warn!(path = %path.display(), "skipping template without a name");
                }
                Ok(t) => templates.push(t),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping template");
                }
            }
        }
        tracing::debug!(dir = %dir.display(), templates = templates.len(), "loaded golden set");
        Ok(Self { templates })
    }

    pub fn push(&mut self, template: GoldenTemplate) {
        self.templates.push(template);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GoldenTemplate> {
        self.templates.get(index)
    }

    pub fn templates(&self) -> &[GoldenTemplate] {
        &self.templates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GoldenTemplate> {
        self.templates.iter()
    }
}

impl<'a> IntoIterator for &'a GoldenSet {
    type Item = &'a GoldenTemplate;
    type IntoIter = std::slice::Iter<'a, GoldenTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

/// Regular files directly inside `dir`, sorted by path.
pub(crate) fn list_files(dir: &Path) -> RecogResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
