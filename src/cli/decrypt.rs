use crate::engine::{decrypt_grid, EtcConfig};
use crate::error::Result;
use crate::grid::Dimensions;
use crate::header::{EtcHeader, KeySchedule};
use crate::image_io::{load_grid, save_grid, DEFAULT_QUALITY};
use crate::pipeline::Seed;
use std::path::{Path, PathBuf};

/// Where the pre-padding image size comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginalSize {
    Exact(Dimensions),
    /// Sidecar header written at encryption time
    Header(PathBuf),
}

/// Options for the decrypt command
#[derive(Debug, Clone)]
pub struct DecryptOptions {
    pub seed: Seed,
    pub block_size: usize,
    pub schedule: KeySchedule,
    pub quality: u8,
    pub original: OriginalSize,
}

impl DecryptOptions {
    /// Default settings for an image whose original size is known
    pub fn new(original: OriginalSize) -> Self {
        Self {
            seed: Seed::default(),
            block_size: 16,
            schedule: KeySchedule::default(),
            quality: DEFAULT_QUALITY,
            original,
        }
    }

    pub fn config(&self) -> EtcConfig {
        EtcConfig {
            seed: self.seed.clone(),
            block_size: self.block_size,
            schedule: self.schedule,
        }
    }
}

/// Decrypt an image file, cropping back to the original size.
/// Returns the size of the written image.
pub fn decrypt_image(
    input_path: &Path,
    output_path: &Path,
    options: &DecryptOptions,
) -> Result<Dimensions> {
    let grid = load_grid(input_path)?;

    let original = match &options.original {
        OriginalSize::Exact(dims) => *dims,
        OriginalSize::Header(header_path) => {
            let header = EtcHeader::read(header_path)?;
            let config = options.config();
            if config.block_size > 0 {
                header.check_compatible(
                    grid.dimensions().padded_to(config.block_size),
                    config.block_size,
                    config.schedule,
                )?;
            }
            header.original()
        }
    };

    let decrypted = decrypt_grid(grid, &options.config(), original)?;
    save_grid(&decrypted, output_path, options.quality)?;
    Ok(decrypted.dimensions())
}
