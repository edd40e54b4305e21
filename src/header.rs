use crate::error::{EtcError, Result};
use crate::grid::Dimensions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Direction of the block transform; the CLI picks it by subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Encrypt,
    Decrypt,
}

impl Mode {
    /// Progressive verb for status lines
    pub fn verb(&self) -> &'static str {
        match self {
            Mode::Encrypt => "Encrypting",
            Mode::Decrypt => "Decrypting",
        }
    }
}

/// Pseudo-random generator used to derive block parameters from a seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeySchedule {
    /// MT19937 seeded and drawn like CPython's `random` module
    #[default]
    Mt19937,
    /// SHA3-derived seed into `rand::rngs::StdRng`. Not interchangeable with `Mt19937`.
    StdRng,
}

impl fmt::Display for KeySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySchedule::Mt19937 => write!(f, "mt19937"),
            KeySchedule::StdRng => write!(f, "stdrng"),
        }
    }
}

impl std::str::FromStr for KeySchedule {
    type Err = EtcError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mt19937" | "mt" | "python" => Ok(Self::Mt19937),
            "stdrng" | "std" => Ok(Self::StdRng),
            _ => Err(EtcError::UnsupportedAlgorithm(format!(
                "key schedule: {}",
                s
            ))),
        }
    }
}

pub const HEADER_VERSION: u32 = 1;

/// Sidecar header written next to an encrypted image.
/// Records what decryption needs besides the seed; the seed itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtcHeader {
    pub version: u32,
    pub original_width: usize,
    pub original_height: usize,
    pub padded_width: usize,
    pub padded_height: usize,
    pub block_size: usize,
    pub schedule: KeySchedule,
}

impl EtcHeader {
    pub fn new(original: Dimensions, block_size: usize, schedule: KeySchedule) -> Result<Self> {
        if block_size == 0 {
            return Err(EtcError::InvalidBlockSize(block_size));
        }
        let padded = original.padded_to(block_size);
        Ok(Self {
            version: HEADER_VERSION,
            original_width: original.width,
            original_height: original.height,
            padded_width: padded.width,
            padded_height: padded.height,
            block_size,
            schedule,
        })
    }

    pub fn original(&self) -> Dimensions {
        Dimensions::new(self.original_width, self.original_height)
    }

    pub fn padded(&self) -> Dimensions {
        Dimensions::new(self.padded_width, self.padded_height)
    }

    pub fn num_blocks(&self) -> usize {
        (self.padded_width / self.block_size) * (self.padded_height / self.block_size)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.version != HEADER_VERSION {
            return Err(EtcError::InvalidHeader(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if self.block_size == 0 {
            return Err(EtcError::InvalidHeader("block size is zero".into()));
        }
        if self.original().is_empty() {
            return Err(EtcError::InvalidHeader(format!(
                "empty original size {}",
                self.original()
            )));
        }
        if self.original().padded_to(self.block_size) != self.padded() {
            return Err(EtcError::InvalidHeader(format!(
                "padded size {} does not match original {} at block size {}",
                self.padded(),
                self.original(),
                self.block_size
            )));
        }
        Ok(())
    }

    /// Check that this header describes an image of `padded` size processed with these settings
    pub fn check_compatible(
        &self,
        padded: Dimensions,
        block_size: usize,
        schedule: KeySchedule,
    ) -> Result<()> {
        if self.block_size != block_size {
            return Err(EtcError::InvalidHeader(format!(
                "header block size {} differs from requested {}",
                self.block_size, block_size
            )));
        }
        if self.schedule != schedule {
            return Err(EtcError::InvalidHeader(format!(
                "header key schedule {} differs from requested {}",
                self.schedule, schedule
            )));
        }
        if self.padded() != padded {
            return Err(EtcError::InvalidHeader(format!(
                "header expects a {} image, got {}",
                self.padded(),
                padded
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let header: EtcHeader = serde_json::from_str(json)?;
        header.validate()?;
        Ok(header)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
