//! Object pool
//!
//! Arena of reusable instances addressed by handle. Instances are created
//! lazily by an injected factory and recycled rather than dropped; the pool
//! never shrinks.

/// Creates new pool instances on demand.
pub trait Factory<T> {
    fn create(&mut self) -> T;
}

impl<T, F: FnMut() -> T> Factory<T> for F {
    fn create(&mut self) -> T {
        self()
    }
}

/// Handle to an instance owned by an [`ObjectPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

impl PoolHandle {
    /// Slot index inside the pool.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A growable pool of reusable instances.
#[derive(Debug)]
pub struct ObjectPool<T> {
    slots: Vec<T>,
    in_use: Vec<bool>,
    free: Vec<usize>,
}

impl<T> ObjectPool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty pool with room for `capacity` instances.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            in_use: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
        }
    }

    /// Take a free instance, or create one with `factory` if none is free.
    pub fn allocate<F: Factory<T> + ?Sized>(&mut self, factory: &mut F) -> PoolHandle {
        if let Some(index) = self.free.pop() {
            self.in_use[index] = true;
            return PoolHandle(index);
        }

        let index = self.slots.len();
        self.slots.push(factory.create());
        self.in_use.push(true);
        tracing::debug!(size = self.slots.len(), "object pool grew");
        PoolHandle(index)
    }

    /// Return an instance to the pool. Releasing a free handle is ignored.
    pub fn release(&mut self, handle: PoolHandle) {
        match self.in_use.get_mut(handle.0) {
            Some(in_use) if *in_use => {
                *in_use = false;
                self.free.push(handle.0);
            }
            _ => tracing::warn!(slot = handle.0, "released a pool slot that was not allocated"),
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots.get_mut(handle.0)
    }

    /// Number of instances ever created.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of instances ready for reuse.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_creates_lazily() {
        let mut created = 0;
        let mut factory = || {
            created += 1;
            created
        };
        let mut pool = ObjectPool::new();

        let a = pool.allocate(&mut factory);
        let b = pool.allocate(&mut factory);
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(a), Some(&1));
        assert_eq!(pool.get(b), Some(&2));
    }

    #[test]
    fn test_release_recycles_without_growth() {
        let mut factory = || String::from("batch");
        let mut pool = ObjectPool::new();

        let a = pool.allocate(&mut factory);
        pool.get_mut(a).unwrap().push_str("-dirty");
        pool.release(a);
        assert_eq!(pool.available(), 1);

        let b = pool.allocate(&mut factory);
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
        // Instances are recycled as-is; resetting is the caller's job.
        assert_eq!(pool.get(b).map(String::as_str), Some("batch-dirty"));
    }

    #[test]
    fn test_double_release_is_ignored() {
        let mut factory = || 0u8;
        let mut pool = ObjectPool::new();

        let a = pool.allocate(&mut factory);
        pool.release(a);
        pool.release(a);
        assert_eq!(pool.available(), 1);
    }
}
