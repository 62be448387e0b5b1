use std::fmt;

/// Monotonically increasing id for explanation requests.
///
/// Each stage transition issues a fresh sequence number; a response is
/// applied only when its sequence still matches the latest one issued,
/// which is what keeps a slow request for a stale stage from overwriting
/// the explanation for the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    pub const ZERO: RequestSeq = RequestSeq(0);

    #[must_use]
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::RequestSeq;

    #[test]
    fn next_is_strictly_greater() {
        let seq = RequestSeq::ZERO;
        assert!(seq.next() > seq);
        assert_eq!(seq.next().value(), 1);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let max = RequestSeq::new(u64::MAX);
        assert_eq!(max.next(), max);
    }
}
