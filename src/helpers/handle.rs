use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Capability of carrying an intrusive reference count.
///
/// Implementors embed a [`RefCount`] and delegate to it; [`Handle`] drives
/// the count and destroys the object when it reaches zero.
pub trait RefCounted {
    /// Increments the count, returning the new value.
    fn retain(&self) -> usize;

    /// Decrements the count, returning the new value. Saturates at zero.
    fn release(&self) -> usize;

    /// Returns the current count.
    fn ref_count(&self) -> usize;
}

/// Embeddable atomic reference counter.
#[derive(Debug, Default)]
pub struct RefCount {
    count: AtomicUsize,
}

impl RefCount {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefCounted for RefCount {
    fn retain(&self) -> usize {
        self.count.fetch_add(1, AtomicOrdering::Relaxed) + 1
    }

    fn release(&self) -> usize {
        // fetch_update keeps the floor at zero for unbalanced releases.
        match self.count.fetch_update(
            AtomicOrdering::AcqRel,
            AtomicOrdering::Acquire,
            |count| Some(count.saturating_sub(1)),
        ) {
            Ok(previous) => previous.saturating_sub(1),
            Err(previous) => previous,
        }
    }

    fn ref_count(&self) -> usize {
        self.count.load(AtomicOrdering::Acquire)
    }
}

/// Owning smart handle over an intrusively counted object.
///
/// `Handle::new` is the only way to put an object under handle management;
/// clones retain, drops release, and the last drop destroys the object.
/// Comparison and hashing use the object's address, so handles key ordered
/// containers by identity rather than value.
pub struct Handle<T: RefCounted> {
    target: NonNull<T>,
}

impl<T: RefCounted> Handle<T> {
    /// Moves `target` to the heap under handle management, with an initial
    /// count of one.
    pub fn new(target: T) -> Self {
        let target = NonNull::from(Box::leak(Box::new(target)));
        // Safety: the pointer was just created from a live Box.
        unsafe { target.as_ref() }.retain();
        Self { target }
    }

    fn as_ptr(&self) -> *const T {
        self.target.as_ptr()
    }
}

impl<T: RefCounted> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: the target outlives every handle by construction.
        unsafe { self.target.as_ref() }
    }
}

impl<T: RefCounted> Clone for Handle<T> {
    fn clone(&self) -> Self {
        self.retain();
        Self {
            target: self.target,
        }
    }
}

impl<T: RefCounted> Drop for Handle<T> {
    fn drop(&mut self) {
        if self.release() == 0 {
            // Safety: the count reached zero, so this is the last handle
            // and the Box may be reclaimed exactly once.
            drop(unsafe { Box::from_raw(self.target.as_ptr()) });
        }
    }
}

impl<T: RefCounted> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl<T: RefCounted> Eq for Handle<T> {}

impl<T: RefCounted> PartialOrd for Handle<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: RefCounted> Ord for Handle<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.as_ptr() as usize).cmp(&(other.as_ptr() as usize))
    }
}

impl<T: RefCounted> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.as_ptr() as usize).hash(state);
    }
}

impl<T: RefCounted + fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(self.deref()).finish()
    }
}

// Safety: the handle only hands out shared references, so sharing and
// sending it is as safe as sharing and sending &T / T.
unsafe impl<T: RefCounted + Send + Sync> Send for Handle<T> {}
unsafe impl<T: RefCounted + Send + Sync> Sync for Handle<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct Probe {
        count: RefCount,
        dropped: Arc<AtomicBool>,
    }

    impl Probe {
        fn new(dropped: Arc<AtomicBool>) -> Self {
            Self {
                count: RefCount::new(),
                dropped,
            }
        }
    }

    impl RefCounted for Probe {
        fn retain(&self) -> usize {
            self.count.retain()
        }

        fn release(&self) -> usize {
            self.count.release()
        }

        fn ref_count(&self) -> usize {
            self.count.ref_count()
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn clone_retains_and_drop_releases() {
        let dropped = Arc::new(AtomicBool::new(false));
        let first = Handle::new(Probe::new(dropped.clone()));
        assert_eq!(first.ref_count(), 1);
        let second = first.clone();
        assert_eq!(first.ref_count(), 2);
        drop(second);
        assert_eq!(first.ref_count(), 1);
        assert!(!dropped.load(Ordering::SeqCst));
        drop(first);
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn assignment_retains_before_releasing() {
        let dropped = Arc::new(AtomicBool::new(false));
        let mut handle = Handle::new(Probe::new(dropped.clone()));
        handle = handle.clone();
        assert_eq!(handle.ref_count(), 1);
        assert!(!dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn handles_compare_by_identity() {
        let dropped = Arc::new(AtomicBool::new(false));
        let first = Handle::new(Probe::new(dropped.clone()));
        let alias = first.clone();
        let other = Handle::new(Probe::new(dropped.clone()));
        assert!(first == alias);
        assert!(first != other);
        assert_eq!(first.cmp(&alias), std::cmp::Ordering::Equal);
    }

    #[test]
    fn release_saturates_at_zero() {
        let counter = RefCount::new();
        assert_eq!(counter.release(), 0);
        counter.retain();
        assert_eq!(counter.release(), 0);
        assert_eq!(counter.ref_count(), 0);
    }
}
