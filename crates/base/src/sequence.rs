/// Monotonic request counter.
///
/// Every submission takes a fresh number from `issue()`. A response may only
/// touch shared state while its number is still the latest one.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    latest: u64,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of the most recently issued request (0 if none yet).
    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// Issue the next request number.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Check if the given request number is still the latest.
    pub fn is_current(&self, number: u64) -> bool {
        number != 0 && number == self.latest
    }
}

/// A value stamped with the request number it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Stamped<T> {
    pub number: u64,
    pub inner: T,
}

impl<T> Stamped<T> {
    pub fn new(number: u64, inner: T) -> Self {
        Self { number, inner }
    }
}
