//! Pdfium-backed document rasterizer, behind the `pdfium` feature.

use std::mem;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use pdfium_render::prelude::*;

use slidepdf_core::geom::SizeF;

use crate::pipeline::{PageRasterizer, RasterError, RasterImage};

pub struct PdfiumRasterizer {
    // Declared before `pdfium` so the document drops first; the transmuted
    // 'static lifetime below relies on this order.
    document: Mutex<PdfDocument<'static>>,
    #[allow(dead_code)]
    pdfium: Arc<Pdfium>,
    page_count: usize,
}

impl PdfiumRasterizer {
    pub fn open(path: &Path) -> Result<Self> {
        let pdfium = Arc::new(bind_pdfium()?);
        let document = pdfium
            .load_pdf_from_file(path, None)
            .with_context(|| format!("failed to open {:?}", path))?;
        // SAFETY: the returned PdfDocument borrows the Pdfium bindings owned
        // by `pdfium`, which lives in the same struct. The document field is
        // declared first, so it drops before the bindings, keeping the
        // borrow valid for the document's whole lifetime.
        let document =
            unsafe { mem::transmute::<PdfDocument<'_>, PdfDocument<'static>>(document) };
        let page_count = document.pages().len() as usize;
        Ok(Self {
            document: Mutex::new(document),
            pdfium,
            page_count,
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_size_points(&self, index: usize) -> Result<SizeF, RasterError> {
        let page_index: PdfPageIndex =
            index.try_into().map_err(|_| RasterError::OutOfRange(index))?;
        let document = self.document.lock();
        let page = document
            .pages()
            .get(page_index)
            .map_err(|_| RasterError::OutOfRange(index))?;
        Ok(SizeF::new(
            page.width().value as f64,
            page.height().value as f64,
        ))
    }

    fn rasterize(&self, index: usize, dpi: f64) -> Result<RasterImage, RasterError> {
        let page_index: PdfPageIndex =
            index.try_into().map_err(|_| RasterError::OutOfRange(index))?;
        let document = self.document.lock();
        let page = document
            .pages()
            .get(page_index)
            .map_err(|_| RasterError::OutOfRange(index))?;

        let config = PdfRenderConfig::new().scale_page_by_factor(((dpi / 72.0) as f32).max(0.1));
        let bitmap = page
            .render_with_config(&config)
            .with_context(|| format!("failed to render page {index}"))?;
        let image = bitmap.as_image().to_rgba8();
        Ok(RasterImage {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        })
    }
}

fn bind_pdfium() -> Result<Pdfium> {
    // Prefer a library dropped next to the binary, then the system one.
    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    if let Ok(bindings) = Pdfium::bind_to_library(&local) {
        return Ok(Pdfium::new(bindings));
    }
    match Pdfium::bind_to_system_library() {
        Ok(bindings) => Ok(Pdfium::new(bindings)),
        Err(error) => Err(anyhow!(
            "failed to bind to a pdfium library; ensure it is installed ({error})"
        )),
    }
}
