use crate::error::{EtcError, Result};
use crate::grid::pad_amount;
use crate::header::EtcHeader;
use crate::image_io::image_dimensions;
use std::path::Path;

/// Describe how an image maps onto the block grid
pub fn show_info(path: &Path, block_size: usize, header: Option<&Path>) -> Result<String> {
    if block_size == 0 {
        return Err(EtcError::InvalidBlockSize(block_size));
    }
    let dims = image_dimensions(path)?;
    let padded = dims.padded_to(block_size);

    let mut output = String::new();

    output.push_str("EtC Image Information\n");
    output.push_str("=====================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Size: {}\n", dims));
    output.push_str("\n");

    output.push_str(&format!("Block Layout (block size {}):\n", block_size));
    output.push_str(&format!("  Padded size: {}\n", padded));
    output.push_str(&format!(
        "  Padding: {} right, {} bottom\n",
        pad_amount(dims.width, block_size),
        pad_amount(dims.height, block_size)
    ));
    output.push_str(&format!(
        "  Grid: {} x {} blocks\n",
        padded.width / block_size,
        padded.height / block_size
    ));
    output.push_str(&format!(
        "  Total blocks: {}\n",
        (padded.width / block_size) * (padded.height / block_size)
    ));

    if let Some(header_path) = header {
        let header = EtcHeader::read(header_path)?;
        output.push_str("\n");
        output.push_str(&format!("Header: {}\n", header_path.display()));
        output.push_str(&format!("  Original size: {}\n", header.original()));
        output.push_str(&format!("  Padded size: {}\n", header.padded()));
        output.push_str(&format!("  Block size: {}\n", header.block_size));
        output.push_str(&format!("  Key schedule: {}\n", header.schedule));
        let status = if header.padded() == dims && header.block_size == block_size {
            "matches this image"
        } else {
            "does NOT match this image"
        };
        output.push_str(&format!("  Status: {}\n", status));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Dimensions, PixelGrid};
    use crate::header::KeySchedule;
    use crate::image_io::{save_grid, DEFAULT_QUALITY};
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image.png");
        save_grid(&PixelGrid::new(17, 40), &path, DEFAULT_QUALITY).unwrap();

        let info = show_info(&path, 16, None).unwrap();
        assert!(info.contains("Size: 17x40"));
        assert!(info.contains("Padded size: 32x48"));
        assert!(info.contains("Padding: 15 right, 8 bottom"));
        assert!(info.contains("Grid: 2 x 3 blocks"));
        assert!(info.contains("Total blocks: 6"));
    }

    #[test]
    fn test_show_info_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image.png");
        let header_path = dir.path().join("image.json");
        save_grid(&PixelGrid::new(32, 32), &path, DEFAULT_QUALITY).unwrap();
        EtcHeader::new(Dimensions::new(17, 30), 16, KeySchedule::Mt19937)
            .unwrap()
            .write(&header_path)
            .unwrap();

        let info = show_info(&path, 16, Some(&header_path)).unwrap();
        assert!(info.contains("Original size: 17x30"));
        assert!(info.contains("Status: matches this image"));

        let info = show_info(&path, 8, Some(&header_path)).unwrap();
        assert!(info.contains("does NOT match"));
    }

    #[test]
    fn test_show_info_zero_block_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image.png");
        assert!(matches!(
            show_info(&path, 0, None),
            Err(EtcError::InvalidBlockSize(0))
        ));
    }
}
