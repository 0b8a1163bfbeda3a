//! Monotonic time source

/// Monotonic millisecond clock
///
/// Must never go backward. The origin is arbitrary (usually boot).
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
