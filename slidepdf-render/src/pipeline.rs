//! Background rendering of a whole document into the pixel cache. One worker
//! thread walks the pages front to back, publishes each finished page
//! through a write-once slot and notifies the shell over a channel.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{debug, info, warn};

use slidepdf_core::canvas::{BitmapView, PageStore};
use slidepdf_core::geom::{Size, SizeF};

use crate::cache::{max_size_bytes, Bitmap, CacheError, PixelCache, BYTES_PER_PIXEL};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("page index {0} out of range")]
    OutOfRange(usize),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// A rasterized page as the backend hands it over: tightly packed RGBA.
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// The document backend. Page sizes are in points (72 per inch); `rasterize`
/// renders at the requested resolution.
pub trait PageRasterizer: Send + Sync {
    fn page_count(&self) -> usize;
    fn page_size_points(&self, index: usize) -> Result<SizeF, RasterError>;
    fn rasterize(&self, index: usize, dpi: f64) -> Result<RasterImage, RasterError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    /// Cache reserved, worker not yet started.
    Preparing,
    Running,
    /// Done, either on request or after the last page.
    Stopped,
    /// The cache filled up; pages rendered so far stay available.
    Exhausted,
}

const STATE_PREPARING: u8 = 1;
const STATE_RUNNING: u8 = 2;
const STATE_STOPPED: u8 = 3;
const STATE_EXHAUSTED: u8 = 4;

fn decode_state(raw: u8) -> PipelineState {
    match raw {
        STATE_PREPARING => PipelineState::Preparing,
        STATE_RUNNING => PipelineState::Running,
        STATE_STOPPED => PipelineState::Stopped,
        STATE_EXHAUSTED => PipelineState::Exhausted,
        _ => PipelineState::Idle,
    }
}

#[derive(Debug, Clone, Copy)]
struct RenderedPage {
    main: Bitmap,
    thumbnail: Bitmap,
    dimmed: Bitmap,
}

struct Shared {
    cache: PixelCache,
    /// One write-once slot per page; setting the slot publishes the bitmaps.
    slots: Vec<OnceCell<RenderedPage>>,
    stop: AtomicBool,
    state: AtomicU8,
    image_size: Size,
    thumb_size: Size,
    document: Arc<dyn PageRasterizer>,
    sender: flume::Sender<usize>,
}

pub struct RenderPipeline {
    shared: Arc<Shared>,
    receiver: flume::Receiver<usize>,
    worker: Option<JoinHandle<()>>,
}

impl RenderPipeline {
    /// Sizes and reserves the cache for the whole document. The bound is
    /// one full-size image plus two thumbnails per page, with one spare
    /// page of headroom.
    pub fn prepare(
        document: Arc<dyn PageRasterizer>,
        image_size: Size,
        thumb_size: Size,
    ) -> Result<Self, CacheError> {
        let per_page = max_size_bytes(image_size) + 2 * max_size_bytes(thumb_size);
        let capacity = per_page * (document.page_count() + 1);
        Self::with_capacity(document, image_size, thumb_size, capacity)
    }

    fn with_capacity(
        document: Arc<dyn PageRasterizer>,
        image_size: Size,
        thumb_size: Size,
        capacity: usize,
    ) -> Result<Self, CacheError> {
        let page_count = document.page_count();
        let cache = PixelCache::reserve(capacity)?;
        info!(
            pages = page_count,
            megabytes = capacity / (1024 * 1024),
            "reserved render cache"
        );
        let (sender, receiver) = flume::unbounded();
        let shared = Arc::new(Shared {
            cache,
            slots: (0..page_count).map(|_| OnceCell::new()).collect(),
            stop: AtomicBool::new(false),
            state: AtomicU8::new(STATE_PREPARING),
            image_size,
            thumb_size,
            document,
            sender,
        });
        Ok(Self {
            shared,
            receiver,
            worker: None,
        })
    }

    /// Spawns the render worker.
    pub fn start(&mut self) -> anyhow::Result<()> {
        let shared = self.shared.clone();
        let handle = thread::Builder::new()
            .name("slidepdf-render".into())
            .spawn(move || render_loop(&shared))?;
        self.worker = Some(handle);
        Ok(())
    }

    /// Runs the whole render loop on the calling thread.
    pub fn run_blocking(&self) {
        render_loop(&self.shared);
    }

    /// Asks the worker to stop and waits for it.
    pub fn stop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("render worker panicked");
            }
        }
    }

    /// The next freshly rendered page index, if any.
    pub fn try_next_rendered(&self) -> Option<usize> {
        self.receiver.try_recv().ok()
    }

    /// A shareable read handle over the rendered pages.
    pub fn handle(&self) -> PageHandle {
        PageHandle {
            shared: self.shared.clone(),
        }
    }

    pub fn state(&self) -> PipelineState {
        decode_state(self.shared.state.load(Ordering::Acquire))
    }

    pub fn page_count(&self) -> usize {
        self.shared.slots.len()
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read access to published pages; cheap to clone, safe to hold on any
/// thread while the worker keeps rendering.
#[derive(Clone)]
pub struct PageHandle {
    shared: Arc<Shared>,
}

impl PageHandle {
    fn slot(&self, index: usize) -> Option<&RenderedPage> {
        self.shared.slots.get(index)?.get()
    }
}

impl PageStore for PageHandle {
    fn page_count(&self) -> usize {
        self.shared.slots.len()
    }

    fn page(&self, index: usize) -> Option<BitmapView<'_>> {
        self.slot(index).map(|page| self.shared.cache.view(&page.main))
    }

    fn thumbnail(&self, index: usize) -> Option<BitmapView<'_>> {
        self.slot(index)
            .map(|page| self.shared.cache.view(&page.thumbnail))
    }

    fn dimmed_thumbnail(&self, index: usize) -> Option<BitmapView<'_>> {
        self.slot(index)
            .map(|page| self.shared.cache.view(&page.dimmed))
    }
}

/// Resolution at which a page of `page` points fills `target` pixels on at
/// least one axis without overflowing the other.
fn fit_dpi(page: SizeF, target: Size) -> f64 {
    let width_in = page.width / 72.0;
    let height_in = page.height / 72.0;
    (target.width as f64 / width_in).min(target.height as f64 / height_in)
}

fn fit_size(width: u32, height: u32, bounds: Size) -> (u32, u32) {
    let scale =
        (bounds.width as f64 / width as f64).min(bounds.height as f64 / height as f64);
    (
        ((width as f64 * scale) as u32).max(1),
        ((height as f64 * scale) as u32).max(1),
    )
}

fn render_loop(shared: &Shared) {
    shared.state.store(STATE_RUNNING, Ordering::Release);
    for index in 0..shared.document.page_count() {
        if shared.stop.load(Ordering::Acquire) {
            shared.state.store(STATE_STOPPED, Ordering::Release);
            return;
        }
        match render_page(shared, index) {
            Ok(Some(rendered)) => {
                let _ = shared.slots[index].set(rendered);
                let _ = shared.sender.send(index);
                debug!(page = index, "page rendered");
            }
            Ok(None) => {}
            Err(error) => {
                warn!(page = index, %error, "stopping early");
                shared.state.store(STATE_EXHAUSTED, Ordering::Release);
                return;
            }
        }
    }
    shared.state.store(STATE_STOPPED, Ordering::Release);
}

/// Renders one page plus its two thumbnails. `Ok(None)` skips a page the
/// backend could not deliver; only cache exhaustion aborts the run.
fn render_page(shared: &Shared, index: usize) -> Result<Option<RenderedPage>, CacheError> {
    let size = match shared.document.page_size_points(index) {
        Ok(size) if size.width > 0.0 && size.height > 0.0 => size,
        Ok(_) => {
            warn!(page = index, "page has no size, skipping");
            return Ok(None);
        }
        Err(error) => {
            warn!(page = index, %error, "unable to query page size, skipping");
            return Ok(None);
        }
    };

    let dpi = fit_dpi(size, shared.image_size);
    let image = match shared.document.rasterize(index, dpi) {
        Ok(image) => image,
        Err(error) => {
            warn!(page = index, %error, "unable to rasterize page, skipping");
            return Ok(None);
        }
    };
    let expected = image.width as usize * image.height as usize * BYTES_PER_PIXEL;
    if image.pixels.len() != expected {
        warn!(page = index, "backend returned a malformed bitmap, skipping");
        return Ok(None);
    }

    let main = shared.cache.store(image.width, image.height, &image.pixels)?;

    let (thumb_width, thumb_height) = fit_size(image.width, image.height, shared.thumb_size);
    let Some(buffer) = image::RgbaImage::from_raw(image.width, image.height, image.pixels) else {
        return Ok(None);
    };
    let thumb = image::imageops::resize(
        &buffer,
        thumb_width,
        thumb_height,
        image::imageops::FilterType::Lanczos3,
    );
    let thumbnail = shared.cache.store(thumb_width, thumb_height, thumb.as_raw())?;

    let mut dimmed = thumb.into_raw();
    for byte in &mut dimmed {
        *byte /= 2;
    }
    let dimmed = shared.cache.store(thumb_width, thumb_height, &dimmed)?;

    Ok(Some(RenderedPage {
        main,
        thumbnail,
        dimmed,
    }))
}
