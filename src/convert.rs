//! Conversion of source files into PDF documents.
//!
//! PDFs are loaded as-is. Raster images are decoded, normalized to 8-bit
//! RGB, and wrapped into a one-page PDF sized one point per pixel. The
//! wrapping goes through a named temporary file that is read back and
//! removed on every exit path, so a failed conversion never leaves an
//! intermediate artifact behind.

use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream};
use std::path::Path;

use crate::error::{MergeError, Result};
use crate::output::Reporter;

/// Raster extensions handled by the image conversion path.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tiff", "bmp"];

/// How a source file will be turned into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Image,
    Unsupported,
}

/// Classify a source file by its extension, case-insensitively.
pub fn classify(path: &Path) -> SourceKind {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if extension == "pdf" {
        SourceKind::Pdf
    } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        SourceKind::Image
    } else {
        SourceKind::Unsupported
    }
}

/// Turn one source file into a PDF document.
///
/// Returns `Ok(None)` for unsupported extensions (already reported as a
/// per-file error). Load and decode failures are returned as errors for
/// the caller to report and skip; they never abort the run.
pub fn load_source(path: &Path, reporter: &dyn Reporter) -> Result<Option<Document>> {
    match classify(path) {
        SourceKind::Pdf => {
            reporter.debug(&format!("Reading PDF directly: {}", path.display()));
            Ok(Some(Document::load(path)?))
        }
        SourceKind::Image => {
            reporter.debug(&format!("Converting image to PDF: {}", path.display()));
            image_to_pdf(path, reporter).map(Some)
        }
        SourceKind::Unsupported => {
            reporter.error(&format!("Unsupported file type: {}", path.display()));
            Ok(None)
        }
    }
}

/// Decode an image and wrap it into a single-page PDF.
fn image_to_pdf(path: &Path, reporter: &dyn Reporter) -> Result<Document> {
    let decoded = image::open(path).map_err(|source| MergeError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = match decoded {
        DynamicImage::ImageRgb8(buffer) => buffer,
        other => {
            reporter.debug("Normalizing image to 8-bit RGB");
            other.to_rgb8()
        }
    };

    let mut doc = wrap_pixels(&rgb)?;

    // Round-trip through a scoped temporary so the loaded document is
    // backed by real serialized bytes; the guard removes the file even
    // when the read-back fails.
    let intermediate = tempfile::Builder::new()
        .prefix("pdfbind-")
        .suffix(".pdf")
        .tempfile()?;
    doc.save(intermediate.path())?;
    let loaded = Document::load(intermediate.path())?;

    Ok(loaded)
}

/// Build a one-page document embedding the pixels as a DeviceRGB image
/// XObject, page size one point per pixel.
fn wrap_pixels(pixels: &image::RgbImage) -> Result<Document> {
    let (width, height) = pixels.dimensions();
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        lopdf::dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        pixels.as_raw().clone(),
    ));

    let operations = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    (width as i64).into(),
                    0.into(),
                    0.into(),
                    (height as i64).into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(lopdf::dictionary! {}, operations.encode()?));

    let page_id = doc.add_object(lopdf::dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
        "Contents" => content_id,
        "Resources" => lopdf::dictionary! {
            "XObject" => lopdf::dictionary! { "Im0" => image_id },
        },
    });

    let pages = lopdf::dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    Ok(doc)
}
