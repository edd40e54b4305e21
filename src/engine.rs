use crate::error::{EtcError, Result};
use crate::grid::{Dimensions, PixelGrid};
use crate::header::{KeySchedule, Mode};
use crate::pipeline::{
    forward, generate_params, inverse, partition, reassemble, Block, BlockLayout, ParameterSet,
    Seed,
};
use rayon::prelude::*;

/// Settings shared by encryption and decryption. Both sides must agree on all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtcConfig {
    pub seed: Seed,
    pub block_size: usize,
    pub schedule: KeySchedule,
}

impl Default for EtcConfig {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            block_size: 16,
            schedule: KeySchedule::default(),
        }
    }
}

impl EtcConfig {
    pub fn new(seed: Seed, block_size: usize) -> Self {
        Self {
            seed,
            block_size,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(EtcError::InvalidBlockSize(self.block_size));
        }
        Ok(())
    }
}

/// Encrypt a grid.
/// Pipeline: Pad → Partition → Parameters → Scramble + Forward → Reassemble
///
/// The output has the padded dimensions; the original size is not recorded in it.
pub fn encrypt_grid(grid: PixelGrid, config: &EtcConfig) -> Result<PixelGrid> {
    config.validate()?;

    // Step 1: Zero-pad bottom/right to a multiple of the block size
    let padded = grid.pad_to_block(config.block_size);

    // Step 2: Split into row-major blocks
    let layout = BlockLayout::for_dimensions(padded.dimensions(), config.block_size)?;
    let blocks = partition(&padded, config.block_size)?;
    drop(padded);

    // Step 3: Derive per-block parameters (single generator, fully drained here)
    let params = generate_params(&config.seed, layout.num_blocks(), config.schedule);

    // Step 4: Slot i takes the content of block perm_target[i], then the forward transform
    let sources = gather(blocks, &params)?;
    let scrambled = transform_blocks(sources, &params, Mode::Encrypt);

    // Step 5: Reassemble
    reassemble(&scrambled, layout)
}

/// Decrypt a grid produced by [`encrypt_grid`].
/// Pipeline: Pad → Partition → Parameters → Inverse → Unscramble → Reassemble → Crop
///
/// `original` is the size of the image before encryption. It cannot be
/// recovered from the encrypted grid and must pad to exactly its shape.
pub fn decrypt_grid(grid: PixelGrid, config: &EtcConfig, original: Dimensions) -> Result<PixelGrid> {
    config.validate()?;
    if original.is_empty() {
        return Err(EtcError::InvalidDimensions(format!(
            "original size {} is empty",
            original
        )));
    }

    // Step 1: Pad (no-op for an untouched encrypted image)
    let padded = grid.pad_to_block(config.block_size);
    let expected = original.padded_to(config.block_size);
    if padded.dimensions() != expected {
        return Err(EtcError::InvalidDimensions(format!(
            "original size {} pads to {} at block size {}, but the encrypted image is {}",
            original,
            expected,
            config.block_size,
            padded.dimensions()
        )));
    }

    // Step 2: Split into row-major blocks
    let layout = BlockLayout::for_dimensions(padded.dimensions(), config.block_size)?;
    let blocks = partition(&padded, config.block_size)?;
    drop(padded);

    // Step 3: Same parameters as encryption
    let params = generate_params(&config.seed, layout.num_blocks(), config.schedule);

    // Step 4: Inverse transform each block in place
    let recovered = transform_blocks(blocks, &params, Mode::Decrypt);

    // Step 5: Put block i back at perm_target[i]
    let restored = scatter(recovered, &params)?;

    // Step 6: Reassemble and drop the padding
    reassemble(&restored, layout)?.crop(original)
}

/// Apply the per-block transform for `mode`; block i uses `params[i]`
fn transform_blocks(blocks: Vec<Block>, params: &ParameterSet, mode: Mode) -> Vec<Block> {
    blocks
        .into_par_iter()
        .zip(params.as_slice().par_iter())
        .map(|(block, p)| match mode {
            Mode::Encrypt => forward(block, p),
            Mode::Decrypt => inverse(block, p),
        })
        .collect()
}

/// `out[i] = blocks[perm_target[i]]`
fn gather(blocks: Vec<Block>, params: &ParameterSet) -> Result<Vec<Block>> {
    let mut slots: Vec<Option<Block>> = blocks.into_iter().map(Some).collect();
    params
        .iter()
        .map(|p| slots.get_mut(p.perm_target).and_then(Option::take))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(not_a_permutation)
}

/// `out[perm_target[i]] = blocks[i]`
fn scatter(blocks: Vec<Block>, params: &ParameterSet) -> Result<Vec<Block>> {
    let mut slots: Vec<Option<Block>> = vec![None; blocks.len()];
    for (block, p) in blocks.into_iter().zip(params.iter()) {
        let slot = slots.get_mut(p.perm_target).ok_or_else(not_a_permutation)?;
        if slot.replace(block).is_some() {
            return Err(not_a_permutation());
        }
    }
    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(not_a_permutation)
}

fn not_a_permutation() -> EtcError {
    EtcError::InvalidDimensions("block permutation does not cover every block exactly once".into())
}
