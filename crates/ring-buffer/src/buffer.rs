//! Ring Buffer Implementation

use crate::RingBufferError;

/// Fixed-capacity ring buffer (single owner, overwrites oldest when full)
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Pre-allocated storage
    storage: Box<[Option<T>]>,
    /// Next write position
    head: usize,
    /// Number of occupied slots
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    pub fn new(capacity: usize) -> Result<Self, RingBufferError> {
        if capacity == 0 {
            return Err(RingBufferError::ZeroCapacity);
        }
        let storage: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        Ok(Self {
            storage: storage.into_boxed_slice(),
            head: 0,
            len: 0,
        })
    }

    /// Push an item, returning the evicted oldest item if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let capacity = self.capacity();
        let evicted = self.storage[self.head].replace(item);
        self.head = (self.head + 1) % capacity;

        if self.len < capacity {
            self.len += 1;
            None
        } else {
            evicted
        }
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buffer: self,
            offset: 0,
        }
    }

    /// Drop every held item
    pub fn clear(&mut self) {
        self.storage.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }

    fn oldest_index(&self) -> usize {
        (self.head + self.capacity() - self.len) % self.capacity()
    }
}

/// Oldest-to-newest iterator over a [`RingBuffer`]
pub struct Iter<'a, T> {
    buffer: &'a RingBuffer<T>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.buffer.len {
            return None;
        }
        let idx = (self.buffer.oldest_index() + self.offset) % self.buffer.capacity();
        self.offset += 1;
        self.buffer.storage[idx].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len - self.offset;
        (remaining, Some(remaining))
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_read() {
        let mut buffer = RingBuffer::new(10).unwrap();

        for i in 0..5u16 {
            buffer.push(i * 100);
        }

        assert_eq!(buffer.len(), 5);
        assert!(!buffer.is_full());
        assert_eq!(
            buffer.iter().copied().collect::<Vec<_>>(),
            vec![0, 100, 200, 300, 400]
        );
    }

    #[test]
    fn test_overwrite_oldest() {
        let mut buffer = RingBuffer::new(5).unwrap();

        let mut evicted = Vec::new();
        for i in 0..8 {
            if let Some(old) = buffer.push(i) {
                evicted.push(old);
            }
        }

        // Full capacity is usable
        assert_eq!(buffer.len(), 5);
        assert!(buffer.is_full());
        assert_eq!(evicted, vec![0, 1, 2]);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_clear_resets_window() {
        let mut buffer = RingBuffer::new(3).unwrap();
        buffer.push('a');
        buffer.push('b');
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.iter().count(), 0);

        buffer.push('c');
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec!['c']);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            RingBuffer::<u8>::new(0).unwrap_err(),
            RingBufferError::ZeroCapacity
        );
    }

    proptest! {
        #[test]
        fn holds_most_recent_items(capacity in 1usize..32, items in prop::collection::vec(any::<u8>(), 0..100)) {
            let mut buffer = RingBuffer::new(capacity).unwrap();
            for item in &items {
                buffer.push(*item);
            }

            prop_assert!(buffer.len() <= capacity);
            let expected: Vec<u8> = items.iter().skip(items.len().saturating_sub(capacity)).copied().collect();
            prop_assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), expected);
        }
    }
}
