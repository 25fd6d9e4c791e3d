//! Ahead-of-time page rendering: a pre-sized pixel cache, a background
//! render pipeline over any [`PageRasterizer`], and the optional
//! pdfium-backed rasterizer.

pub mod cache;
#[cfg(feature = "pdfium")]
pub mod pdfium;
pub mod pipeline;

pub use cache::{max_size_bytes, Bitmap, CacheError, PixelCache};
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;
pub use pipeline::{
    PageHandle, PageRasterizer, PipelineState, RasterError, RasterImage, RenderPipeline,
};
