use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum RevealError {
    #[error("Reveal threshold must be within 0.0..=1.0, got {0}")]
    InvalidThreshold(f64),
}
