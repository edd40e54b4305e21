//! etcimg - Encryption-then-Compression image scrambling
//!
//! Scrambles a raster image block by block so that it stays visually
//! unrecognisable yet survives lossy recompression (e.g. JPEG 4:2:0 when the
//! block size is a multiple of 16), and can be restored exactly with the same
//! seed. This is visual obfuscation, not a cryptographically secure cipher.
//!
//! ## Transform Pipeline
//!
//! ```text
//! Encrypt: Pad → Partition → Scramble → Rotate → Flip → Invert → Color shuffle → Reassemble
//! Decrypt: Pad → Partition → Color unshuffle → Invert → Flip → Unrotate → Unscramble → Reassemble → Crop
//! ```
//!
//! - **Pad**: zero-fill bottom/right to a multiple of the block size
//! - **Partition**: split into square blocks, row-major
//! - **Scramble**: seeded permutation of block positions
//! - **Rotate / Flip**: seeded quarter turns and mirrors per block
//! - **Invert**: seeded negative-positive per block (`255 - v`)
//! - **Color shuffle**: seeded permutation of the R, G, B channels per block
//! - **Crop**: decryption needs the original size back; it is not stored in the image
//!
//! All per-block parameters come from one generator seeded once per call.
//! The default [`KeySchedule::Mt19937`] reproduces the parameter stream of
//! Python EtC tools built on `random.Random` for the same seed.
//!
//! ## Example
//!
//! ```no_run
//! use etcimg::cli::{decrypt_image, encrypt_image, DecryptOptions, EncryptOptions, OriginalSize};
//! use std::path::Path;
//!
//! let report = encrypt_image(
//!     Path::new("photo.png"),
//!     Path::new("scrambled.jpg"),
//!     &EncryptOptions::default(),
//! ).unwrap();
//!
//! let options = DecryptOptions::new(OriginalSize::Exact(report.original));
//! decrypt_image(
//!     Path::new("scrambled.jpg"),
//!     Path::new("restored.png"),
//!     &options,
//! ).unwrap();
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod grid;
pub mod header;
pub mod image_io;
pub mod pipeline;

pub use engine::{decrypt_grid, encrypt_grid, EtcConfig};
pub use error::{EtcError, Result};
pub use grid::{Dimensions, PixelGrid};
pub use header::{EtcHeader, KeySchedule, Mode};
pub use pipeline::{generate_params, ParameterSet, Seed};
