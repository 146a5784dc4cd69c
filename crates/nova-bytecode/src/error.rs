use thiserror::Error;

pub type Result<T> = std::result::Result<T, RangeError>;

/// Malformed index range input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("index range {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },
    #[error("index range {from}..{to} exceeds code length {code_len}")]
    OutOfBounds {
        from: usize,
        to: usize,
        code_len: usize,
    },
    #[error("index range {from}..{to} starts before the previous range end {previous_end}")]
    Overlapping {
        from: usize,
        to: usize,
        previous_end: usize,
    },
    #[error("index list must contain from/to pairs, got {0} entries")]
    OddPairCount(usize),
}
