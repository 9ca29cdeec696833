//! Paystub document rendering.
//!
//! One fixed-layout A4 page per record, assembled directly from lopdf
//! objects: base-14 Helvetica fonts with WinAnsi encoding, a text content
//! stream, and an optional company logo XObject. The output carries no
//! invocation-dependent content, so rendering the same record twice yields
//! byte-identical documents.

use std::path::PathBuf;

use lopdf::{Dictionary, Document, Object, Stream, dictionary, xobject};
use thiserror::Error;
use tracing::{debug, warn};

use paystub_model::{AmountError, BatchContext, Labels, MoneyAmounts, PayrollRecord};

use crate::page::{Font, PageContent};

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

/// Bounding box the logo is fitted into, preserving aspect ratio.
const LOGO_BOX: (f32, f32, f32, f32) = (200.0, 750.0, 150.0, 50.0);

/// An immutable rendered paystub. Never mutated after creation; consumed by
/// the dispatcher and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
}

impl RenderedDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("amount coercion: {0}")]
    Amount(#[from] AmountError),
    #[error("logo asset {path}: {source}")]
    Logo {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    #[error("pdf assembly: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Renders paystub documents for one deployment.
///
/// `assets_dir` holds per-company logos named `<company>.png`; a company
/// without one falls back to `default_logo` when configured, otherwise the
/// logo is omitted. A missing logo never fails a render; an unreadable one
/// does (and only for that row).
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    assets_dir: Option<PathBuf>,
    default_logo: Option<PathBuf>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = Some(dir.into());
        self
    }

    pub fn with_default_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_logo = Some(path.into());
        self
    }

    /// Render one record into a single-page paystub document.
    pub fn render(
        &self,
        record: &PayrollRecord,
        context: &BatchContext,
    ) -> Result<RenderedDocument, RenderError> {
        let amounts = record.amounts()?;
        let logo = self.load_logo(context.company())?;
        let bytes = assemble_document(
            record,
            &amounts,
            context.labels(),
            context.company(),
            logo,
        )?;
        debug!(recipient = %record.email, size = bytes.len(), "paystub rendered");
        Ok(RenderedDocument { bytes })
    }

    fn load_logo(&self, company: &str) -> Result<Option<Stream>, RenderError> {
        let Some(path) = self.resolve_logo_path(company) else {
            return Ok(None);
        };
        let stream = xobject::image(&path).map_err(|source| RenderError::Logo { path, source })?;
        Ok(Some(stream))
    }

    fn resolve_logo_path(&self, company: &str) -> Option<PathBuf> {
        if let Some(dir) = &self.assets_dir {
            let candidate = dir.join(format!("{company}.png"));
            if candidate.is_file() {
                return Some(candidate);
            }
            debug!(path = %candidate.display(), "company logo not found");
        }
        if let Some(fallback) = &self.default_logo
            && fallback.is_file()
        {
            return Some(fallback.clone());
        }
        if self.assets_dir.is_some() || self.default_logo.is_some() {
            warn!(company, "no logo asset available, omitting");
        }
        None
    }
}

fn assemble_document(
    record: &PayrollRecord,
    amounts: &MoneyAmounts,
    labels: &Labels,
    company: &str,
    logo: Option<Stream>,
) -> Result<Vec<u8>, lopdf::Error> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let mut resources: Dictionary = dictionary! {
        "Font" => dictionary! { "F1" => font_regular, "F2" => font_bold },
    };

    let mut page = PageContent::new();
    draw_page(
        &mut page,
        record,
        amounts,
        labels,
        company,
        logo.as_ref().map(image_dimensions),
    );

    if let Some(stream) = logo {
        let logo_id = doc.add_object(stream);
        resources.set("XObject", dictionary! { "Logo" => logo_id });
    }

    let content_id = doc.add_object(Stream::new(dictionary! {}, page.finish().encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        "Contents" => content_id,
        "Resources" => resources,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

fn draw_page(
    page: &mut PageContent,
    record: &PayrollRecord,
    amounts: &MoneyAmounts,
    labels: &Labels,
    company: &str,
    logo_dims: Option<(i64, i64)>,
) {
    page.text(
        Font::Bold,
        14.0,
        200.0,
        800.0,
        &format!("{company} - {}", labels.title),
    );
    if let Some(dims) = logo_dims {
        let (x, y, width, height) = logo_placement(dims);
        page.image("Logo", x, y, width, height);
    }

    let period = record.period.format("%Y-%m-%d");
    page.text(Font::Regular, 12.0, 100.0, 700.0, &format!("{}: {period}", labels.period));
    page.text(
        Font::Regular,
        12.0,
        100.0,
        680.0,
        &format!("{}: {}", labels.full_name, record.full_name),
    );
    page.text(
        Font::Regular,
        12.0,
        100.0,
        660.0,
        &format!("{}: {}", labels.email, record.email),
    );
    page.text(
        Font::Regular,
        12.0,
        100.0,
        640.0,
        &format!("{}: {}", labels.position, record.position),
    );

    page.text(Font::Bold, 12.0, 100.0, 610.0, &format!("{}:", labels.gross_salary));
    page.text(Font::Bold, 12.0, 250.0, 610.0, &money(amounts.gross_salary));
    page.text(Font::Bold, 12.0, 100.0, 590.0, &format!("{}:", labels.gross_payment));
    page.text(Font::Bold, 12.0, 250.0, 590.0, &money(amounts.gross_payment));

    page.text(Font::Bold, 12.0, 100.0, 560.0, &format!("{}:", labels.discounts));

    // Values bind to labels by field name, whatever the display order.
    page.text(
        Font::Regular,
        12.0,
        120.0,
        540.0,
        &format!("{}: {}", labels.health_discount, money(amounts.health_discount)),
    );
    page.text(
        Font::Regular,
        12.0,
        120.0,
        520.0,
        &format!("{}: {}", labels.social_discount, money(amounts.social_discount)),
    );
    page.text(
        Font::Regular,
        12.0,
        120.0,
        500.0,
        &format!("{}: {}", labels.taxes_discount, money(amounts.taxes_discount)),
    );
    page.text(
        Font::Regular,
        12.0,
        120.0,
        480.0,
        &format!("{}: {}", labels.other_discount, money(amounts.other_discount)),
    );
    page.text(
        Font::Regular,
        12.0,
        120.0,
        460.0,
        &format!(
            "{}: {}",
            labels.total_discounts,
            money(amounts.total_discounts())
        ),
    );

    page.text(Font::Bold, 12.0, 100.0, 430.0, &format!("{}:", labels.net_payment));
    page.text(Font::Bold, 12.0, 250.0, 430.0, &money(amounts.net_payment));
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn image_dimensions(stream: &Stream) -> (i64, i64) {
    let dimension = |key: &[u8]| {
        stream
            .dict
            .get(key)
            .ok()
            .and_then(|object| object.as_i64().ok())
            .unwrap_or(1)
            .max(1)
    };
    (dimension(b"Width"), dimension(b"Height"))
}

fn logo_placement((width, height): (i64, i64)) -> (f32, f32, f32, f32) {
    let (box_x, box_y, box_w, box_h) = LOGO_BOX;
    let scale = (box_w / width as f32).min(box_h / height as f32);
    let scaled_w = width as f32 * scale;
    let scaled_h = height as f32 * scale;
    (box_x, box_y + (box_h - scaled_h) / 2.0, scaled_w, scaled_h)
}
