use crate::error::{EtcError, Result};
use crate::grid::{Dimensions, PixelGrid, CHANNELS};

/// Square `size x size` RGB tile, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    size: usize,
    data: Vec<u8>,
}

impl Block {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0u8; size * size * CHANNELS],
        }
    }

    pub fn from_raw(size: usize, data: Vec<u8>) -> Result<Self> {
        let expected = size * size * CHANNELS;
        if data.len() != expected {
            return Err(EtcError::InvalidDimensions(format!(
                "{}x{} RGB block needs {} bytes, got {}",
                size,
                size,
                expected,
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        let i = (y * self.size + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; CHANNELS]) {
        let i = (y * self.size + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Iterate over `[R, G, B]` pixel slices
    pub fn pixels_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(CHANNELS)
    }
}

/// Block grid geometry of a padded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub rows: usize,
    pub cols: usize,
    pub block_size: usize,
}

impl BlockLayout {
    /// Layout for an aligned grid of `dims`
    pub fn for_dimensions(dims: Dimensions, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(EtcError::InvalidBlockSize(block_size));
        }
        if !dims.is_aligned(block_size) {
            return Err(EtcError::InvalidDimensions(format!(
                "{} is not a multiple of block size {}",
                dims, block_size
            )));
        }
        Ok(Self {
            rows: dims.height / block_size,
            cols: dims.width / block_size,
            block_size,
        })
    }

    pub fn num_blocks(&self) -> usize {
        self.rows * self.cols
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.cols * self.block_size, self.rows * self.block_size)
    }
}

/// Split an aligned grid into blocks in row-major block order
pub fn partition(grid: &PixelGrid, block_size: usize) -> Result<Vec<Block>> {
    let layout = BlockLayout::for_dimensions(grid.dimensions(), block_size)?;
    let row_bytes = block_size * CHANNELS;
    let mut blocks = Vec::with_capacity(layout.num_blocks());

    for r in 0..layout.rows {
        for c in 0..layout.cols {
            let mut data = Vec::with_capacity(block_size * row_bytes);
            for y in r * block_size..(r + 1) * block_size {
                let start = c * row_bytes;
                data.extend_from_slice(&grid.row(y)[start..start + row_bytes]);
            }
            blocks.push(Block {
                size: block_size,
                data,
            });
        }
    }

    Ok(blocks)
}

/// Write block `i` into cell `(i / cols, i % cols)`; exact inverse of [`partition`]
pub fn reassemble(blocks: &[Block], layout: BlockLayout) -> Result<PixelGrid> {
    if blocks.len() != layout.num_blocks() {
        return Err(EtcError::InvalidDimensions(format!(
            "expected {} blocks for a {}x{} layout, got {}",
            layout.num_blocks(),
            layout.cols,
            layout.rows,
            blocks.len()
        )));
    }

    let dims = layout.dimensions();
    let mut grid = PixelGrid::new(dims.width, dims.height);
    let bs = layout.block_size;
    let row_bytes = bs * CHANNELS;

    for (i, block) in blocks.iter().enumerate() {
        if block.size != bs {
            return Err(EtcError::InvalidBlockSize(block.size));
        }
        let (r, c) = (i / layout.cols, i % layout.cols);
        for (dy, src) in block.data.chunks_exact(row_bytes).enumerate() {
            let start = c * row_bytes;
            grid.row_mut(r * bs + dy)[start..start + row_bytes].copy_from_slice(src);
        }
    }

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_grid(width: usize, height: usize) -> PixelGrid {
        let mut grid = PixelGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set_pixel(x, y, [x as u8, y as u8, (x + y) as u8]);
            }
        }
        grid
    }

    #[test]
    fn test_partition_row_major_order() {
        let grid = numbered_grid(4, 4);
        let blocks = partition(&grid, 2).unwrap();
        assert_eq!(blocks.len(), 4);

        // Top-left pixel of each block
        assert_eq!(blocks[0].pixel(0, 0), [0, 0, 0]);
        assert_eq!(blocks[1].pixel(0, 0), [2, 0, 2]);
        assert_eq!(blocks[2].pixel(0, 0), [0, 2, 2]);
        assert_eq!(blocks[3].pixel(1, 1), [3, 3, 6]);
    }

    #[test]
    fn test_partition_reassemble_roundtrip() {
        let grid = numbered_grid(48, 32);
        let blocks = partition(&grid, 16).unwrap();
        let layout = BlockLayout::for_dimensions(grid.dimensions(), 16).unwrap();
        assert_eq!(layout.rows, 2);
        assert_eq!(layout.cols, 3);
        assert_eq!(reassemble(&blocks, layout).unwrap(), grid);
    }

    #[test]
    fn test_partition_requires_aligned_grid() {
        let grid = numbered_grid(17, 16);
        assert!(matches!(
            partition(&grid, 16),
            Err(EtcError::InvalidDimensions(_))
        ));
        assert!(matches!(
            partition(&grid, 0),
            Err(EtcError::InvalidBlockSize(0))
        ));
    }

    #[test]
    fn test_reassemble_wrong_count() {
        let layout = BlockLayout {
            rows: 2,
            cols: 2,
            block_size: 4,
        };
        let blocks = vec![Block::new(4); 3];
        assert!(reassemble(&blocks, layout).is_err());
    }

    #[test]
    fn test_empty_grid_has_no_blocks() {
        let grid = PixelGrid::new(0, 0);
        assert!(partition(&grid, 8).unwrap().is_empty());
    }

    #[test]
    fn test_block_from_raw_length_mismatch() {
        assert!(matches!(
            Block::from_raw(2, vec![0; 5]),
            Err(EtcError::InvalidDimensions(_))
        ));
        let block = Block::from_raw(2, vec![7; 12]).unwrap();
        assert_eq!(block.pixel(1, 1), [7, 7, 7]);
    }
}
