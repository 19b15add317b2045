use thiserror::Error;

/// Errors returned by the frame compositor and ray generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TracerError {
    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("{0} transform is not invertible")]
    SingularTransform(&'static str),
}
