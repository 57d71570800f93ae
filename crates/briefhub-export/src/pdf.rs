//! Chart PDF assembly.
//!
//! One page per chart. Pages are kept in memory as (geometry, draw ops) and
//! only turned into PDF objects by [`ChartDocument::save`], so the page tree
//! is written once with its final `Count`.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::ExportError;
use crate::layout::{PageLayout, Placement};
use crate::raster::{decode_png, Raster};

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = concat!("briefhub ", env!("CARGO_PKG_VERSION"));

/// A PNG registered with the document as an image XObject.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    id: ObjectId,
    name: String,
}

/// Handle to a page returned by [`ChartDocument::add_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageId(usize);

struct PageEntry {
    id: ObjectId,
    width: f32,
    height: f32,
    xobjects: Dictionary,
    operations: Vec<Operation>,
}

pub struct ChartDocument {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<PageEntry>,
    images: usize,
    title: String,
    max_bytes: Option<usize>,
}

impl ChartDocument {
    pub fn new(title: impl Into<String>) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
            images: 0,
            title: title.into(),
            max_bytes: None,
        }
    }

    /// Reject the serialized document in [`save`](Self::save) when it would
    /// exceed `limit` bytes.
    pub fn with_size_limit(mut self, limit: Option<usize>) -> Self {
        self.max_bytes = limit;
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Decode PNG bytes and register them as an image XObject.
    pub fn embed_png(&mut self, bytes: &[u8]) -> Result<EmbeddedImage, ExportError> {
        let raster = decode_png(bytes)?;
        self.embed_raster(&raster)
    }

    fn embed_raster(&mut self, raster: &Raster) -> Result<EmbeddedImage, ExportError> {
        let mut dict = image_dict(raster.width, raster.height, raster.color_space.pdf_name());

        if let Some(alpha) = &raster.alpha {
            let mask = image_stream(
                image_dict(raster.width, raster.height, b"DeviceGray"),
                alpha,
            )?;
            let mask_id = self.doc.add_object(mask);
            dict.set("SMask", Object::Reference(mask_id));
        }

        let id = self.doc.add_object(image_stream(dict, &raster.samples)?);
        self.images += 1;

        Ok(EmbeddedImage {
            width: raster.width,
            height: raster.height,
            id,
            name: format!("Im{}", self.images),
        })
    }

    /// Append an empty page of the given size in PDF user units.
    pub fn add_page(&mut self, width: f32, height: f32) -> PageId {
        let id = self.doc.new_object_id();
        self.pages.push(PageEntry {
            id,
            width,
            height,
            xobjects: Dictionary::new(),
            operations: Vec::new(),
        });
        PageId(self.pages.len() - 1)
    }

    /// Draw an embedded image onto a page.
    pub fn draw_image(
        &mut self,
        page: PageId,
        image: &EmbeddedImage,
        at: Placement,
    ) -> Result<(), ExportError> {
        let entry = self
            .pages
            .get_mut(page.0)
            .ok_or_else(|| ExportError::Pdf(format!("no page with index {}", page.0)))?;

        entry
            .xobjects
            .set(image.name.as_bytes(), Object::Reference(image.id));
        entry.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    number(at.width),
                    0.into(),
                    0.into(),
                    number(at.height),
                    number(at.x),
                    number(at.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(image.name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    /// Embed a chart as a new page laid out per `layout`.
    pub fn add_chart(&mut self, png: &[u8], layout: PageLayout) -> Result<PageId, ExportError> {
        let image = self.embed_png(png)?;
        let geometry = layout.geometry(image.width, image.height);

        let page = self.add_page(geometry.width, geometry.height);
        if geometry.background {
            self.fill_white(page, geometry.width, geometry.height);
        }
        self.draw_image(page, &image, geometry.placement)?;
        Ok(page)
    }

    fn fill_white(&mut self, page: PageId, width: f32, height: f32) {
        if let Some(entry) = self.pages.get_mut(page.0) {
            entry.operations.extend([
                Operation::new("q", vec![]),
                Operation::new("g", vec![1.into()]),
                Operation::new(
                    "re",
                    vec![0.into(), 0.into(), number(width), number(height)],
                ),
                Operation::new("f", vec![]),
                Operation::new("Q", vec![]),
            ]);
        }
    }

    /// Write the page tree, catalog and info dictionary, then serialize.
    ///
    /// No timestamp or file identifier is written, so identical charts give
    /// identical bytes.
    pub fn save(mut self) -> Result<Vec<u8>, ExportError> {
        if self.pages.is_empty() {
            return Err(ExportError::EmptyDocument);
        }

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in std::mem::take(&mut self.pages) {
            let content = Content {
                operations: page.operations,
            }
            .encode()?;
            let content_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), content));

            let resources = Dictionary::from_iter([("XObject", Object::Dictionary(page.xobjects))]);
            let page_dict = Dictionary::from_iter([
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(self.pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        0.into(),
                        0.into(),
                        number(page.width),
                        number(page.height),
                    ]),
                ),
                ("Resources", Object::Dictionary(resources)),
                ("Contents", Object::Reference(content_id)),
            ]);
            self.doc
                .objects
                .insert(page.id, Object::Dictionary(page_dict));
            kids.push(Object::Reference(page.id));
        }

        let count = kids.len() as i64;
        let pages_dict = Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        let info_id = self.doc.add_object(Dictionary::from_iter([
            ("Title", Object::string_literal(self.title.as_str())),
            ("Producer", Object::string_literal(PRODUCER)),
        ]));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));
        self.doc.trailer.set("Info", Object::Reference(info_id));

        // Content streams only; image streams are already Flate-encoded.
        self.doc.compress();

        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| ExportError::Pdf(format!("failed to write PDF: {e}")))?;

        if let Some(limit) = self.max_bytes
            && output.len() > limit
        {
            return Err(ExportError::TooLarge {
                size: output.len(),
                limit,
            });
        }

        tracing::info!(pages = count, bytes = output.len(), "chart PDF assembled");
        Ok(output)
    }
}

fn image_dict(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter([
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(width))),
        ("Height", Object::Integer(i64::from(height))),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ])
}

fn image_stream(dict: Dictionary, samples: &[u8]) -> Result<Stream, ExportError> {
    Ok(Stream::new(dict, flate_compress(samples)?).with_compression(false))
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    let compress_error = |e: std::io::Error| ExportError::Pdf(format!("flate compression failed: {e}"));
    encoder.write_all(data).map_err(compress_error)?;
    encoder.finish().map_err(compress_error)
}

/// Whole values are written as integers so native-layout pages carry exact
/// pixel dimensions.
fn number(value: f32) -> Object {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f32 {
        Object::Integer(value as i64)
    } else {
        Object::Real(value)
    }
}
