//! The fixed-length contract shared by every per-section array.

use crate::SECTION_VOLUME;
use crate::error::ArrayError;

/// An index-addressed array of exactly [`SECTION_VOLUME`] elements.
///
/// Implemented independently by [`BlockArray`](crate::BlockArray) and
/// [`LightArray`](crate::LightArray); the index layout (for example
/// `y * 256 + z * 16 + x`) is chosen by the caller.
pub trait SectionArray {
    /// Element type handed to and returned from callers.
    type Value: Copy;

    /// Returns the element at `index`.
    fn get(&self, index: usize) -> Result<Self::Value, ArrayError>;

    /// Stores `value` at `index`.
    fn set(&mut self, index: usize, value: Self::Value) -> Result<(), ArrayError>;

    /// Number of elements; always [`SECTION_VOLUME`].
    fn len(&self) -> usize {
        SECTION_VOLUME
    }

    /// Section arrays are never empty.
    fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over all elements in index order, yielding decode errors
    /// instead of skipping them.
    fn values(&self) -> Values<'_, Self>
    where
        Self: Sized,
    {
        Values {
            array: self,
            next: 0,
        }
    }
}

/// Iterator returned by [`SectionArray::values`].
///
/// Yields the first decode error and then ends. Errors only occur for arrays
/// whose storage references codes the palette does not hold.
#[derive(Debug)]
pub struct Values<'a, A> {
    array: &'a A,
    next: usize,
}

impl<A: SectionArray> Iterator for Values<'_, A> {
    type Item = Result<A::Value, ArrayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.array.len() {
            return None;
        }
        let value = self.array.get(self.next);
        self.next = match value {
            Ok(_) => self.next + 1,
            Err(_) => self.array.len(),
        };
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.array.len().saturating_sub(self.next)))
    }
}
