/// A simple slab allocator.
///
/// A `Slab` stores values of type `T` in a contiguous vector and returns
/// stable keys that are reused after removal.
///
/// Keys stay valid until the value is removed, either through
/// [`remove`](Self::remove) or [`drain`](Self::drain).
pub(crate) struct Slab<T> {
    /// Storage; `None` marks a free slot.
    items: Vec<Option<T>>,
    /// Stack of free keys that can be reused.
    free: Vec<usize>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Slab<T> {
    /// Creates an empty `Slab` with room for `size` values.
    pub(crate) fn new(size: usize) -> Self {
        Self {
            items: Vec::with_capacity(size),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Inserts a value and returns its key.
    ///
    /// Free slots are reused before the storage grows.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        self.len += 1;

        if let Some(key) = self.free.pop() {
            self.items[key] = Some(item);
            return key;
        }

        self.items.push(Some(item));
        self.items.len() - 1
    }

    /// Removes and returns the value stored at `key`, if any.
    pub(crate) fn remove(&mut self, key: usize) -> Option<T> {
        let item = self.items.get_mut(key)?.take()?;

        self.free.push(key);
        self.len -= 1;

        Some(item)
    }

    /// Returns a mutable reference to the value at `key`, if any.
    pub(crate) fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.items.get_mut(key)?.as_mut()
    }

    /// Removes every value, returning them in key order.
    ///
    /// All keys handed out so far become invalid.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        self.free.clear();
        self.len = 0;

        self.items.drain(..).flatten().collect()
    }

    /// Returns the number of stored values.
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::Slab;

    #[test]
    fn keys_are_reused_after_removal() {
        let mut slab = Slab::new(2);
        let a = slab.insert("a");
        let b = slab.insert("b");

        assert_eq!(slab.remove(a), Some("a"));
        assert_eq!(slab.remove(a), None);

        let c = slab.insert("c");
        assert_eq!(c, a);
        assert_eq!(slab.get_mut(b).copied(), Some("b"));
        assert_eq!(slab.len(), 2);
    }

    #[test]
    fn drain_empties_the_slab() {
        let mut slab = Slab::new(0);
        let first = slab.insert(1);
        slab.insert(2);
        slab.insert(3);
        slab.remove(first);

        assert_eq!(slab.drain(), vec![2, 3]);
        assert_eq!(slab.len(), 0);
        assert_eq!(slab.insert(4), 0);
    }
}
