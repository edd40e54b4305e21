use crate::engine::{encrypt_grid, EtcConfig};
use crate::error::Result;
use crate::grid::Dimensions;
use crate::header::{EtcHeader, KeySchedule};
use crate::image_io::{load_grid, save_grid, DEFAULT_QUALITY};
use crate::pipeline::Seed;
use std::path::{Path, PathBuf};

/// Options for the encrypt command
#[derive(Debug, Clone)]
pub struct EncryptOptions {
    pub seed: Seed,
    pub block_size: usize,
    pub schedule: KeySchedule,
    pub quality: u8,
    /// Where to write the sidecar header, if anywhere
    pub header: Option<PathBuf>,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            block_size: 16,
            schedule: KeySchedule::default(),
            quality: DEFAULT_QUALITY,
            header: None,
        }
    }
}

impl EncryptOptions {
    pub fn config(&self) -> EtcConfig {
        EtcConfig {
            seed: self.seed.clone(),
            block_size: self.block_size,
            schedule: self.schedule,
        }
    }
}

/// What an encryption run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptReport {
    pub original: Dimensions,
    pub encrypted: Dimensions,
    pub blocks: usize,
}

/// Encrypt an image file.
/// The original size is needed again for decryption; it is only persisted if
/// `options.header` is set.
pub fn encrypt_image(
    input_path: &Path,
    output_path: &Path,
    options: &EncryptOptions,
) -> Result<EncryptReport> {
    let grid = load_grid(input_path)?;
    let original = grid.dimensions();

    // Validates the block size before any work is done
    let header = EtcHeader::new(original, options.block_size, options.schedule)?;

    let encrypted = encrypt_grid(grid, &options.config())?;
    save_grid(&encrypted, output_path, options.quality)?;

    if let Some(header_path) = &options.header {
        header.write(header_path)?;
    }

    Ok(EncryptReport {
        original,
        encrypted: encrypted.dimensions(),
        blocks: header.num_blocks(),
    })
}
