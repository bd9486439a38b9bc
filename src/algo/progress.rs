//! Progress reporting for multi-step operations.
//!
//! ```
//! use hedron::algo::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     eprintln!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(0, 2, "subdividing");
//! ```

/// A callback that receives `(current, total, message)` updates.
///
/// `current` counts completed steps, so the last report of an operation has
/// `current == total`.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str)>,
}

impl Progress {
    /// Create a progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// A reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
