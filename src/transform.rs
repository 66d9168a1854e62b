//! Page geometry transformations.
//!
//! Options are applied strictly left-to-right; each transformation acts
//! on the page as already modified by the ones before it. Rotations are
//! recorded in the page's `/Rotate` entry, reduced mod 360. Flips mirror
//! the content by prepending a transformation matrix that negates one
//! scale axis and translates by the media-box extent on that axis, so the
//! page stays inside its original media box.

use lopdf::content::Operation;
use lopdf::{Document, Object, ObjectId};

use crate::error::{MergeError, Result};
use crate::output::Reporter;
use crate::resolve::RECURSIVE_OPTION;

/// US Letter, used when no media box can be resolved for a page.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// The closed set of recognized page transformations.
///
/// Unrecognized option names map to [`PageTransform::Unknown`], which is
/// a no-op with a warning rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTransform {
    Rotate90,
    Rotate180,
    Rotate270,
    FlipVertical,
    FlipHorizontal,
    /// Traversal directive, consumed during resolution; no geometric
    /// effect.
    Recursive,
    Unknown,
}

impl PageTransform {
    pub fn from_name(name: &str) -> Self {
        match name {
            "rotate90" => Self::Rotate90,
            "rotate180" => Self::Rotate180,
            "rotate270" => Self::Rotate270,
            "flipV" => Self::FlipVertical,
            "flipH" => Self::FlipHorizontal,
            RECURSIVE_OPTION => Self::Recursive,
            _ => Self::Unknown,
        }
    }
}

/// Applies ordered option lists to page geometry.
pub struct TransformEngine<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> TransformEngine<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }

    /// Apply every option in `options`, in order, to one page.
    pub fn apply_all(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        options: &[String],
    ) -> Result<()> {
        for name in options {
            match PageTransform::from_name(name) {
                PageTransform::Rotate90 => self.rotate(doc, page_id, 90)?,
                PageTransform::Rotate180 => self.rotate(doc, page_id, 180)?,
                PageTransform::Rotate270 => self.rotate(doc, page_id, 270)?,
                PageTransform::FlipVertical => {
                    let (_, height) = self.page_size(doc, page_id);
                    self.prepend_matrix(doc, page_id, [1.0, 0.0, 0.0, -1.0, 0.0, height])?;
                }
                PageTransform::FlipHorizontal => {
                    let (width, _) = self.page_size(doc, page_id);
                    self.prepend_matrix(doc, page_id, [-1.0, 0.0, 0.0, 1.0, width, 0.0])?;
                }
                PageTransform::Recursive => {}
                PageTransform::Unknown => {
                    self.reporter
                        .warn(&format!("Unknown transformation option: {name}"));
                }
            }
        }

        Ok(())
    }

    /// Add `degrees` to the page's `/Rotate` value, reduced mod 360.
    fn rotate(&self, doc: &mut Document, page_id: ObjectId, degrees: i64) -> Result<()> {
        let page = doc.get_object_mut(page_id)?;

        if let Object::Dictionary(dict) = page {
            let current = dict.get(b"Rotate").and_then(|r| r.as_i64()).unwrap_or(0);
            dict.set("Rotate", Object::Integer((current + degrees).rem_euclid(360)));
            Ok(())
        } else {
            Err(MergeError::assembly_failed(
                "Page object is not a dictionary",
            ))
        }
    }

    /// Prepend a `cm` operator to the page's content stream.
    ///
    /// The newest matrix goes in front of earlier ones, so a later option
    /// transforms the page as already modified by previous options.
    fn prepend_matrix(&self, doc: &mut Document, page_id: ObjectId, matrix: [f32; 6]) -> Result<()> {
        let mut content = doc.get_and_decode_page_content(page_id)?;
        content.operations.insert(
            0,
            Operation::new("cm", matrix.iter().map(|v| Object::Real(*v)).collect()),
        );
        doc.change_page_content(page_id, content.encode()?)?;
        Ok(())
    }

    /// Media-box extent for a page, following the `Parent` chain for
    /// inherited boxes.
    fn page_size(&self, doc: &Document, page_id: ObjectId) -> (f32, f32) {
        match resolve_media_box(doc, page_id) {
            Some(size) => size,
            None => {
                self.reporter.warn(&format!(
                    "No media box found for page {page_id:?}; assuming {} x {}",
                    DEFAULT_PAGE_SIZE.0, DEFAULT_PAGE_SIZE.1
                ));
                DEFAULT_PAGE_SIZE
            }
        }
    }
}

/// Walk a page's `Parent` chain looking for a `/MediaBox` and return its
/// (width, height). The chain bound guards against reference cycles.
fn resolve_media_box(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let mut current = page_id;

    for _ in 0..16 {
        let dict = match doc.get_object(current) {
            Ok(Object::Dictionary(dict)) => dict,
            _ => return None,
        };

        if let Ok(media_box) = dict.get(b"MediaBox") {
            let array = match media_box {
                Object::Array(array) => array,
                Object::Reference(id) => match doc.get_object(*id) {
                    Ok(Object::Array(array)) => array,
                    _ => return None,
                },
                _ => return None,
            };

            if array.len() < 4 {
                return None;
            }
            let coords: Vec<f32> = array.iter().filter_map(|v| v.as_float().ok()).collect();
            if coords.len() < 4 {
                return None;
            }
            return Some((coords[2] - coords[0], coords[3] - coords[1]));
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => current = *id,
            _ => return None,
        }
    }

    None
}
