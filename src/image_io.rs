use crate::error::{EtcError, Result};
use crate::grid::{Dimensions, PixelGrid};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Default JPEG quality for written images
pub const DEFAULT_QUALITY: u8 = 95;

/// Decode any supported raster image into an RGB8 grid.
/// EXIF orientation is ignored; pixels are taken as stored.
pub fn load_grid(path: &Path) -> Result<PixelGrid> {
    if !path.exists() {
        return Err(EtcError::InputNotFound(path.to_path_buf()));
    }

    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| EtcError::Decode(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| EtcError::Decode(format!("{}: {}", path.display(), e)))?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    PixelGrid::from_raw(width as usize, height as usize, rgb.into_raw())
}

/// Read only the image dimensions from the file header
pub fn image_dimensions(path: &Path) -> Result<Dimensions> {
    if !path.exists() {
        return Err(EtcError::InputNotFound(path.to_path_buf()));
    }
    let (width, height) = image::image_dimensions(path)
        .map_err(|e| EtcError::Decode(format!("{}: {}", path.display(), e)))?;
    Ok(Dimensions::new(width as usize, height as usize))
}

/// Encode a grid to `path`; the format follows the file extension.
/// JPEG is written at `quality` without chroma subsampling.
pub fn save_grid(grid: &PixelGrid, path: &Path, quality: u8) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|e| EtcError::Encode(format!("{}: {}", path.display(), e)))?;
    let width = u32::try_from(grid.width())
        .map_err(|_| EtcError::Encode(format!("width {} too large", grid.width())))?;
    let height = u32::try_from(grid.height())
        .map_err(|_| EtcError::Encode(format!("height {} too large", grid.height())))?;

    let encode_err = |e: image::ImageError| EtcError::Encode(format!("{}: {}", path.display(), e));

    match format {
        ImageFormat::Jpeg => {
            let file = File::create(path)
                .map_err(|e| EtcError::Encode(format!("{}: {}", path.display(), e)))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
            encoder
                .write_image(grid.as_raw(), width, height, ExtendedColorType::Rgb8)
                .map_err(encode_err)
        }
        other => image::save_buffer_with_format(
            path,
            grid.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
            other,
        )
        .map_err(encode_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_grid() -> PixelGrid {
        let data = (0..7 * 5 * 3).map(|i| (i * 5 % 256) as u8).collect();
        PixelGrid::from_raw(7, 5, data).unwrap()
    }

    #[test]
    fn test_png_roundtrip_is_lossless() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.png");
        let grid = sample_grid();
        save_grid(&grid, &path, DEFAULT_QUALITY).unwrap();
        assert_eq!(load_grid(&path).unwrap(), grid);
        assert_eq!(image_dimensions(&path).unwrap(), Dimensions::new(7, 5));
    }

    #[test]
    fn test_jpeg_keeps_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.jpg");
        save_grid(&sample_grid(), &path, DEFAULT_QUALITY).unwrap();
        let loaded = load_grid(&path).unwrap();
        assert_eq!(loaded.dimensions(), Dimensions::new(7, 5));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.png");
        assert!(matches!(load_grid(&path), Err(EtcError::InputNotFound(_))));
        assert!(matches!(
            image_dimensions(&path),
            Err(EtcError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_corrupt_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_grid(&path), Err(EtcError::Decode(_))));
    }

    #[test]
    fn test_unknown_output_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.unknownext");
        assert!(matches!(
            save_grid(&sample_grid(), &path, DEFAULT_QUALITY),
            Err(EtcError::Encode(_))
        ));
    }

    #[test]
    fn test_unwritable_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("grid.png");
        assert!(matches!(
            save_grid(&sample_grid(), &path, DEFAULT_QUALITY),
            Err(EtcError::Encode(_))
        ));
    }
}
