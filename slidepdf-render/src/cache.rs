//! A pre-sized append-only pixel arena. All bitmaps of one presentation are
//! rendered once and stay resident; the arena is sized up front from the
//! page count and target sizes, so rendering never reallocates.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

use slidepdf_core::canvas::BitmapView;
use slidepdf_core::geom::Size;

pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("unable to allocate {0} bytes for the render cache")]
    AllocationFailed(usize),
    #[error("render cache exhausted: requested {requested} bytes, {remaining} remaining")]
    OutOfSpace { requested: usize, remaining: usize },
}

/// Descriptor of one stored bitmap: an offset into the arena plus its
/// dimensions. Plain data, valid for the lifetime of the owning cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap {
    offset: usize,
    pub width: u32,
    pub height: u32,
    /// Bytes per row.
    pub stride: usize,
}

/// Upper bound on the bytes a bitmap rendered for `size` can occupy,
/// including headroom for rounding and row padding.
pub fn max_size_bytes(size: Size) -> usize {
    let base = BYTES_PER_PIXEL * (size.width as usize + 1) * (size.height as usize + 1);
    base + 100 + base / 8
}

/// Bump allocator over one large zeroed region. `store` hands out disjoint
/// regions via an atomic cursor; a stored region is never rewritten, which
/// is what makes lock-free reads sound.
pub struct PixelCache {
    ptr: NonNull<u8>,
    layout: Layout,
    capacity: usize,
    cursor: AtomicUsize,
}

// SAFETY: the arena is plain bytes behind an atomic cursor. Writers get
// disjoint regions from `allocate` and readers only see regions that were
// fully written before their `Bitmap` descriptor was published.
unsafe impl Send for PixelCache {}
unsafe impl Sync for PixelCache {}

impl PixelCache {
    pub fn reserve(capacity: usize) -> Result<Self, CacheError> {
        let layout = Layout::from_size_align(capacity.max(1), 64)
            .map_err(|_| CacheError::AllocationFailed(capacity))?;
        // SAFETY: the layout has non-zero size.
        let ptr = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr).ok_or(CacheError::AllocationFailed(capacity))?;
        Ok(Self {
            ptr,
            layout,
            capacity,
            cursor: AtomicUsize::new(0),
        })
    }

    fn allocate(&self, len: usize) -> Result<usize, CacheError> {
        self.cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cursor| {
                let end = cursor.checked_add(len)?;
                (end <= self.capacity).then_some(end)
            })
            .map_err(|cursor| CacheError::OutOfSpace {
                requested: len,
                remaining: self.capacity - cursor,
            })
    }

    /// Copies tightly packed RGBA rows into the arena. `src` must hold
    /// exactly `4 * width * height` bytes.
    pub fn store(&self, width: u32, height: u32, src: &[u8]) -> Result<Bitmap, CacheError> {
        let stride = width as usize * BYTES_PER_PIXEL;
        let len = stride * height as usize;
        debug_assert_eq!(src.len(), len);
        let offset = self.allocate(len)?;
        // SAFETY: `allocate` just reserved `offset..offset + len` and never
        // hands a region out twice, so this is the sole writer and no reader
        // has a descriptor for it yet.
        unsafe {
            std::ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.as_ptr().add(offset), len);
        }
        Ok(Bitmap {
            offset,
            width,
            height,
            stride,
        })
    }

    /// The pixel bytes of a stored bitmap.
    pub fn bytes(&self, bitmap: &Bitmap) -> &[u8] {
        let len = bitmap.stride * bitmap.height as usize;
        // SAFETY: a `Bitmap` only comes out of `store`, which fully wrote
        // the region before returning it, and stored regions are immutable
        // from then on.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().add(bitmap.offset), len) }
    }

    pub fn view(&self, bitmap: &Bitmap) -> BitmapView<'_> {
        BitmapView {
            width: bitmap.width,
            height: bitmap.height,
            stride: bitmap.stride,
            pixels: self.bytes(bitmap),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used()
    }
}

impl Drop for PixelCache {
    fn drop(&mut self) {
        // SAFETY: allocated in `reserve` with this exact layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(width: u32, height: u32, value: u8) -> Vec<u8> {
        vec![value; width as usize * height as usize * BYTES_PER_PIXEL]
    }

    #[test]
    fn stores_and_reads_back_pixels() {
        let cache = PixelCache::reserve(1024).unwrap();
        let bitmap = cache.store(4, 4, &rgba(4, 4, 7)).unwrap();
        assert_eq!(bitmap.width, 4);
        assert_eq!(bitmap.stride, 16);
        assert!(cache.bytes(&bitmap).iter().all(|&b| b == 7));

        let view = cache.view(&bitmap);
        assert_eq!(view.width, 4);
        assert_eq!(view.pixels.len(), 64);
    }

    #[test]
    fn allocations_are_disjoint_and_monotone() {
        let cache = PixelCache::reserve(1024).unwrap();
        let a = cache.store(4, 4, &rgba(4, 4, 1)).unwrap();
        let b = cache.store(4, 4, &rgba(4, 4, 2)).unwrap();
        assert_eq!(cache.used(), 128);
        assert!(cache.bytes(&a).iter().all(|&v| v == 1));
        assert!(cache.bytes(&b).iter().all(|&v| v == 2));
    }

    #[test]
    fn exhaustion_fails_cleanly_and_keeps_earlier_data() {
        let cache = PixelCache::reserve(64).unwrap();
        let first = cache.store(2, 2, &rgba(2, 2, 9)).unwrap();
        let err = cache.store(8, 8, &rgba(8, 8, 0)).unwrap_err();
        match err {
            CacheError::OutOfSpace {
                requested,
                remaining,
            } => {
                assert_eq!(requested, 256);
                assert_eq!(remaining, 48);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(cache.bytes(&first).iter().all(|&v| v == 9));
    }

    #[test]
    fn size_bound_covers_the_exact_bitmap() {
        let size = Size::new(1920, 1080);
        let exact = 1920 * 1080 * BYTES_PER_PIXEL;
        assert!(max_size_bytes(size) > exact);
    }
}
