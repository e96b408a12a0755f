use thiserror::Error;

/// Library error type for image loading.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened or read.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The file was read but its contents are not a decodable image.
    #[error(transparent)]
    Decode(#[from] image::ImageError),
}
