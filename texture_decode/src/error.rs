use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface dimensions {width} x {height} contain no pixels")]
    ZeroSizedSurface { width: u32, height: u32 },

    #[error("surface pixel count {width} x {height} would overflow")]
    PixelCountWouldOverflow { width: u32, height: u32 },

    #[error("expected surface to have at least {expected} bytes but found {actual}")]
    NotEnoughData { expected: usize, actual: usize },

    #[error("ASTC block size {block_size} x {block_size} is not supported")]
    UnsupportedBlockSize { block_size: u32 },
}

#[cfg(feature = "image")]
#[derive(Debug, Error)]
pub enum CreateImageError {
    #[error("data length {data_length} is not valid for a {width}x{height} image")]
    InvalidSurfaceDimensions {
        width: u32,
        height: u32,
        data_length: usize,
    },

    #[error("error decoding surface: {0}")]
    DecodeSurface(#[from] SurfaceError),
}
