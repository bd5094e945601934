use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use num::Zero;

use crate::error::{Result, SimdError};
use crate::DEFAULT_ALIGNMENT;

/// Alignment of a 128-bit SSE register in bytes.
pub const SSE_ALIGNMENT: usize = 16;

/// Alignment of a 256-bit AVX register in bytes.
pub const AVX_ALIGNMENT: usize = 32;

/// Returns `true` if `ptr` is a multiple of `align` bytes.
///
/// `align` must be a power of two.
#[inline(always)]
pub fn is_aligned<T>(ptr: *const T, align: usize) -> bool {
    debug_assert!(align.is_power_of_two(), "alignment must be a power of two");
    (ptr as usize) & (align - 1) == 0
}

/// Returns `true` if `ptr` may be passed to the aligned load/store of a 128-bit vector.
#[inline(always)]
pub fn sse_aligned<T>(ptr: *const T) -> bool {
    is_aligned(ptr, SSE_ALIGNMENT)
}

/// Returns `true` if `ptr` may be passed to the aligned load/store of a 256-bit vector.
#[inline(always)]
pub fn avx_aligned<T>(ptr: *const T) -> bool {
    is_aligned(ptr, AVX_ALIGNMENT)
}

/// A heap buffer with a caller-chosen alignment.
///
/// The buffer owns its allocation and frees it with the exact layout it was
/// allocated with, so aligned memory never reaches a mismatched deallocator.
/// It dereferences to `[T]`, which makes it usable everywhere a slice is.
///
/// Any buffer created with the default alignment ([`DEFAULT_ALIGNMENT`], 32
/// bytes) may be handed to the aligned `load`/`store` of every native and
/// emulated vector type, as long as the accessed range is a whole number of
/// vectors.
///
/// # Example
///
/// ```rust
/// use simdtype::simd::{float8, SimdVec};
/// use simdtype::utils::AlignedBuf;
///
/// let mut buf = AlignedBuf::<f32>::zeroed(16);
/// let v = float8::splat(2.0);
/// unsafe {
///     v.store(buf.as_mut_ptr());
///     v.store(buf.as_mut_ptr().add(8));
/// }
/// assert!(buf.iter().all(|&x| x == 2.0));
/// ```
pub struct AlignedBuf<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

impl<T: Copy + Zero> AlignedBuf<T> {
    /// Allocates `len` zeroed elements at [`DEFAULT_ALIGNMENT`].
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`] if the allocator fails, like
    /// the standard collections do.
    pub fn zeroed(len: usize) -> Self {
        match Self::layout_for(len, DEFAULT_ALIGNMENT) {
            Ok(layout) => match Self::allocate(len, layout) {
                Some(buf) => buf,
                None => handle_alloc_error(layout),
            },
            Err(err) => panic!("{err}"),
        }
    }

    /// Allocates `len` zeroed elements at `align` bytes, reporting failures as errors.
    pub fn try_zeroed(len: usize, align: usize) -> Result<Self> {
        let layout = Self::layout_for(len, align)?;
        Self::allocate(len, layout).ok_or_else(|| {
            log::error!(
                "aligned allocation of {} bytes at {} failed",
                layout.size(),
                layout.align()
            );
            SimdError::AllocationFailed {
                bytes: layout.size(),
                align: layout.align(),
            }
        })
    }

    /// Copies `data` into a new buffer at [`DEFAULT_ALIGNMENT`].
    pub fn from_slice(data: &[T]) -> Self {
        let mut buf = Self::zeroed(data.len());
        buf.copy_from_slice(data);
        buf
    }

    fn layout_for(len: usize, align: usize) -> Result<Layout> {
        let invalid = |reason| SimdError::InvalidLayout { len, align, reason };
        if !align.is_power_of_two() {
            return Err(invalid("alignment must be a power of two"));
        }
        // The alignment must never be weaker than the element type's own.
        let effective = align.max(mem::align_of::<T>());
        let size = len
            .checked_mul(mem::size_of::<T>())
            .ok_or_else(|| invalid("total size overflows usize"))?;
        Layout::from_size_align(size, effective)
            .map_err(|_| invalid("size exceeds isize::MAX when rounded"))
    }

    fn allocate(len: usize, layout: Layout) -> Option<Self> {
        if layout.size() == 0 {
            // Zero-sized buffers never touch the allocator; any aligned non-null address works.
            let ptr = NonNull::new(layout.align() as *mut T)?;
            return Some(Self { ptr, len, layout });
        }

        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc(layout) } as *mut T;
        let ptr = NonNull::new(raw)?;

        for i in 0..len {
            // SAFETY: `i < len` and the allocation holds `len` elements of `T`.
            unsafe { ptr.as_ptr().add(i).write(T::zero()) };
        }

        Some(Self { ptr, len, layout })
    }
}

impl<T> AlignedBuf<T> {
    /// Alignment of the buffer in bytes.
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        // Deallocate memory using the same layout used for allocation
        if self.layout.size() > 0 {
            unsafe {
                dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
            }
        }
    }
}

impl<T> Deref for AlignedBuf<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        // SAFETY: `ptr` is valid for `len` initialised elements for the lifetime of `self`.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for AlignedBuf<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as in `deref`, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy + Zero> Clone for AlignedBuf<T> {
    fn clone(&self) -> Self {
        let mut copy = match Self::allocate(self.len, self.layout) {
            Some(buf) => buf,
            None => handle_alloc_error(self.layout),
        };
        copy.copy_from_slice(self);
        copy
    }
}

impl<T: fmt::Debug> fmt::Debug for AlignedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("alignment", &self.layout.align())
            .field("data", &self.deref())
            .finish()
    }
}

// SAFETY: `AlignedBuf` uniquely owns its allocation, exactly like `Vec<T>`.
unsafe impl<T: Send> Send for AlignedBuf<T> {}
unsafe impl<T: Sync> Sync for AlignedBuf<T> {}
