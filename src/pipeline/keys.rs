use crate::error::{EtcError, Result};
use crate::header::KeySchedule;
use crate::pipeline::mt19937::Mt19937;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use sha2::Sha512;
use sha3::{Digest, Sha3_256};
use std::fmt;

/// User-supplied key material. The same seed must be used to encrypt and decrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    Int(IntSeed),
    Text(String),
}

impl Default for Seed {
    fn default() -> Self {
        Seed::int(114_514)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Int(n) => write!(f, "{}", n),
            Seed::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Decimal integers of any size become `Seed::Int`, everything else `Seed::Text`
impl std::str::FromStr for Seed {
    type Err = EtcError;
    fn from_str(s: &str) -> Result<Self> {
        Ok(Seed::from_arg(s, false))
    }
}

impl From<i128> for Seed {
    fn from(n: i128) -> Self {
        Seed::Int(IntSeed::from(n))
    }
}

impl From<&str> for Seed {
    fn from(s: &str) -> Self {
        Seed::Text(s.to_string())
    }
}

impl Seed {
    pub fn int(n: i128) -> Self {
        Seed::from(n)
    }

    /// Interpret a command-line seed. With `text` set the string is keyed
    /// as-is even when it is all digits, which is how Python EtC tools
    /// treat their `--seed` argument.
    pub fn from_arg(raw: &str, text: bool) -> Self {
        match raw.parse::<IntSeed>() {
            Ok(n) if !text => Seed::Int(n),
            _ => Seed::Text(raw.to_string()),
        }
    }

    /// Little-endian magnitude of the integer the MT19937 schedule is seeded with.
    /// Text seeds map to `int.from_bytes(utf8 || sha512(utf8), "big")`.
    fn mt_seed_bytes(&self) -> Vec<u8> {
        match self {
            Seed::Int(n) => n.magnitude.clone(),
            Seed::Text(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.extend_from_slice(&Sha512::digest(s.as_bytes()));
                bytes.reverse();
                bytes
            }
        }
    }

    /// 32-byte seed for the StdRng schedule
    fn std_seed(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(b"etcimg_stdrng_seed_v1");
        match self {
            Seed::Int(n) => {
                hasher.update([0u8, n.negative as u8]);
                hasher.update(&n.magnitude);
            }
            Seed::Text(s) => {
                hasher.update([1u8]);
                hasher.update(s.as_bytes());
            }
        }
        hasher.finalize().into()
    }
}

/// Integer seed of any size: sign plus little-endian magnitude with no
/// high zero bytes. Zero has an empty magnitude and is never negative.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntSeed {
    negative: bool,
    magnitude: Vec<u8>,
}

impl IntSeed {
    fn new(negative: bool, mut magnitude: Vec<u8>) -> Self {
        while magnitude.last() == Some(&0) {
            magnitude.pop();
        }
        let negative = negative && !magnitude.is_empty();
        Self {
            negative,
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude_le(&self) -> &[u8] {
        &self.magnitude
    }
}

impl From<i128> for IntSeed {
    fn from(n: i128) -> Self {
        IntSeed::new(n < 0, n.unsigned_abs().to_le_bytes().to_vec())
    }
}

/// Optional sign followed by one or more ASCII digits
impl std::str::FromStr for IntSeed {
    type Err = EtcError;
    fn from_str(s: &str) -> Result<Self> {
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EtcError::InvalidSeed(s.to_string()));
        }

        // magnitude = magnitude * 10 + digit, one byte limb at a time
        let mut magnitude: Vec<u8> = Vec::new();
        for digit in digits.bytes().map(|b| u32::from(b - b'0')) {
            let mut carry = digit;
            for limb in magnitude.iter_mut() {
                let v = u32::from(*limb) * 10 + carry;
                *limb = v as u8;
                carry = v >> 8;
            }
            while carry > 0 {
                magnitude.push(carry as u8);
                carry >>= 8;
            }
        }
        Ok(IntSeed::new(negative, magnitude))
    }
}

impl fmt::Display for IntSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut limbs = self.magnitude.clone();
        let mut digits = Vec::new();
        while !limbs.is_empty() {
            let mut rem = 0u32;
            for limb in limbs.iter_mut().rev() {
                let cur = (rem << 8) | u32::from(*limb);
                *limb = (cur / 10) as u8;
                rem = cur % 10;
            }
            digits.push(b'0' + rem as u8);
            while limbs.last() == Some(&0) {
                limbs.pop();
            }
        }
        if digits.is_empty() {
            digits.push(b'0');
        }
        if self.negative {
            digits.push(b'-');
        }
        digits.reverse();
        f.write_str(&String::from_utf8_lossy(&digits))
    }
}

/// Mirror applied after rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Flip {
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    /// 0 none, 1 horizontal, 2 vertical, 3 both
    pub fn from_code(code: u32) -> Self {
        match code & 3 {
            1 => Flip::Horizontal,
            2 => Flip::Vertical,
            3 => Flip::Both,
            _ => Flip::None,
        }
    }
}

/// Channel reordering: output channel `k` takes input channel `self.0[k]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPerm(pub [usize; 3]);

/// The 6 permutations of (0, 1, 2) in lexicographic order
pub const COLOR_PERMS: [ColorPerm; 6] = [
    ColorPerm([0, 1, 2]),
    ColorPerm([0, 2, 1]),
    ColorPerm([1, 0, 2]),
    ColorPerm([1, 2, 0]),
    ColorPerm([2, 0, 1]),
    ColorPerm([2, 1, 0]),
];

impl ColorPerm {
    pub const IDENTITY: ColorPerm = ColorPerm([0, 1, 2]);

    pub fn inverse(&self) -> ColorPerm {
        let mut inv = [0usize; 3];
        for (k, &src) in self.0.iter().enumerate() {
            inv[src] = k;
        }
        ColorPerm(inv)
    }
}

/// Transform parameters for one block index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockParams {
    /// Padded-grid block whose content lands in this slot on encrypt
    pub perm_target: usize,
    /// Counter-clockwise quarter turns, 0..=3
    pub rotation: u8,
    pub flip: Flip,
    pub invert: bool,
    pub color_perm: ColorPerm,
}

impl BlockParams {
    pub const IDENTITY: BlockParams = BlockParams {
        perm_target: 0,
        rotation: 0,
        flip: Flip::None,
        invert: false,
        color_perm: ColorPerm::IDENTITY,
    };
}

/// Parameters for every block of one image
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSet {
    blocks: Vec<BlockParams>,
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.blocks.serialize(serializer)
    }
}

impl ParameterSet {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BlockParams> {
        self.blocks.get(index)
    }

    pub fn as_slice(&self) -> &[BlockParams] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockParams> {
        self.blocks.iter()
    }

    /// Scrambled slot -> source block mapping
    pub fn permutation(&self) -> Vec<usize> {
        self.blocks.iter().map(|p| p.perm_target).collect()
    }
}

/// Uniform draws the parameter generator needs from a schedule
trait DrawSource {
    fn shuffle(&mut self, items: &mut [usize]);
    /// Uniform integer in `[0, n)`
    fn below(&mut self, n: u32) -> u32;
}

impl DrawSource for Mt19937 {
    fn shuffle(&mut self, items: &mut [usize]) {
        Mt19937::shuffle(self, items);
    }

    fn below(&mut self, n: u32) -> u32 {
        Mt19937::below(self, u64::from(n)) as u32
    }
}

impl DrawSource for StdRng {
    fn shuffle(&mut self, items: &mut [usize]) {
        items.shuffle(self);
    }

    fn below(&mut self, n: u32) -> u32 {
        self.gen_range(0..n)
    }
}

/// Derive the parameter set for `num_blocks` blocks.
///
/// One generator instance is seeded per call and consumed in a fixed order:
/// the permutation shuffle, then rotations, flips, inversions and colour
/// permutations, each pass in block-index order. Reordering any of these
/// changes the parameters every existing seed produces.
pub fn generate_params(seed: &Seed, num_blocks: usize, schedule: KeySchedule) -> ParameterSet {
    if num_blocks == 0 {
        return ParameterSet::default();
    }

    match schedule {
        KeySchedule::Mt19937 => {
            let mut rng = Mt19937::from_le_bytes(&seed.mt_seed_bytes());
            draw_params(&mut rng, num_blocks)
        }
        KeySchedule::StdRng => {
            let mut rng = StdRng::from_seed(seed.std_seed());
            draw_params(&mut rng, num_blocks)
        }
    }
}

fn draw_params<R: DrawSource>(rng: &mut R, num_blocks: usize) -> ParameterSet {
    let mut perm: Vec<usize> = (0..num_blocks).collect();
    rng.shuffle(&mut perm);

    let rotations: Vec<u8> = (0..num_blocks).map(|_| rng.below(4) as u8).collect();
    let flips: Vec<Flip> = (0..num_blocks)
        .map(|_| Flip::from_code(rng.below(4)))
        .collect();
    let inverts: Vec<bool> = (0..num_blocks).map(|_| rng.below(2) == 1).collect();
    let colors: Vec<ColorPerm> = (0..num_blocks)
        .map(|_| COLOR_PERMS[rng.below(COLOR_PERMS.len() as u32) as usize])
        .collect();

    let blocks = (0..num_blocks)
        .map(|i| BlockParams {
            perm_target: perm[i],
            rotation: rotations[i],
            flip: flips[i],
            invert: inverts[i],
            color_perm: colors[i],
        })
        .collect();

    ParameterSet { blocks }
}
