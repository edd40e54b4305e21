use crate::error::{EtcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channels per pixel, always in R, G, B order
pub const CHANNELS: usize = 3;

/// Width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest dimensions that are multiples of `block_size` and cover `self`
    pub fn padded_to(&self, block_size: usize) -> Dimensions {
        Dimensions {
            width: self.width + pad_amount(self.width, block_size),
            height: self.height + pad_amount(self.height, block_size),
        }
    }

    pub fn is_aligned(&self, block_size: usize) -> bool {
        self.width % block_size == 0 && self.height % block_size == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Dimensions {
    type Err = EtcError;
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let (w, h) = lower
            .split_once('x')
            .ok_or_else(|| EtcError::InvalidSize(s.to_string()))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| EtcError::InvalidSize(s.to_string()))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| EtcError::InvalidSize(s.to_string()))?;
        Ok(Self { width, height })
    }
}

/// Rows/columns of zero padding needed to reach the next multiple of `block_size`
pub fn pad_amount(dim: usize, block_size: usize) -> usize {
    (block_size - dim % block_size) % block_size
}

/// Row-major RGB8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    dims: Dimensions,
    data: Vec<u8>,
}

impl PixelGrid {
    /// All-black grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            dims: Dimensions::new(width, height),
            data: vec![0u8; width * height * CHANNELS],
        }
    }

    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(EtcError::InvalidDimensions(format!(
                "{}x{} RGB grid needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            dims: Dimensions::new(width, height),
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of row `y`
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.dims.width * CHANNELS;
        &self.data[y * stride..(y + 1) * stride]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.dims.width * CHANNELS;
        &mut self.data[y * stride..(y + 1) * stride]
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; CHANNELS]) {
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.dims.width + x) * CHANNELS
    }

    /// Zero-pad on the bottom and right up to the next multiple of `block_size`.
    /// An already aligned grid is returned untouched.
    pub fn pad_to_block(self, block_size: usize) -> Self {
        let padded = self.dims.padded_to(block_size);
        if padded == self.dims {
            return self;
        }

        let mut out = PixelGrid::new(padded.width, padded.height);
        for y in 0..self.dims.height {
            out.row_mut(y)[..self.dims.width * CHANNELS].copy_from_slice(self.row(y));
        }
        out
    }

    /// Keep the top-left `dims` region
    pub fn crop(self, dims: Dimensions) -> Result<Self> {
        if dims.width > self.dims.width || dims.height > self.dims.height {
            return Err(EtcError::InvalidDimensions(format!(
                "cannot crop {} grid to {}",
                self.dims, dims
            )));
        }
        if dims == self.dims {
            return Ok(self);
        }

        let mut data = Vec::with_capacity(dims.width * dims.height * CHANNELS);
        for y in 0..dims.height {
            data.extend_from_slice(&self.row(y)[..dims.width * CHANNELS]);
        }
        Ok(Self { dims, data })
    }
}
