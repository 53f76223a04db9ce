/// A cached value with a staleness bit.
///
/// The owner marks the value dirty when its inputs change and rebuilds it
/// lazily through [`DirtyFlag::refresh_with`].
#[derive(Debug, Clone)]
pub struct DirtyFlag<T> {
    is_dirty: bool,
    data: T,
}

impl<T> DirtyFlag<T> {
    pub fn new(data: T) -> Self {
        Self { is_dirty: false, data }
    }

    /// Start out stale so the first access rebuilds.
    pub fn dirty(data: T) -> Self {
        Self { is_dirty: true, data }
    }

    /// The cached value, or `None` while it is stale.
    pub fn read(&self) -> Option<&T> {
        (!self.is_dirty).then_some(&self.data)
    }

    pub fn unchecked_read(&self) -> &T {
        &self.data
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn set_dirty(&mut self) {
        self.is_dirty = true;
    }

    /// Rebuild the value if stale and return it.
    pub fn refresh_with<F: FnOnce() -> T>(&mut self, rebuild: F) -> &T {
        if self.is_dirty {
            self.data = rebuild();
            self.is_dirty = false;
        }

        &self.data
    }
}
