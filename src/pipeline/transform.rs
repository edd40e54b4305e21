use crate::pipeline::keys::{BlockParams, ColorPerm, Flip};
use crate::pipeline::partition::Block;

/// Build a new block where output pixel `(x, y)` is read from `source(x, y)`
fn remap<F>(block: &Block, source: F) -> Block
where
    F: Fn(usize, usize) -> (usize, usize),
{
    let n = block.size();
    let mut out = Block::new(n);
    for y in 0..n {
        for x in 0..n {
            let (sx, sy) = source(x, y);
            out.set_pixel(x, y, block.pixel(sx, sy));
        }
    }
    out
}

/// Rotate counter-clockwise by `turns` quarter turns
pub fn rotate_ccw(block: &Block, turns: u8) -> Block {
    let last = block.size().saturating_sub(1);
    match turns % 4 {
        1 => remap(block, |x, y| (last - y, x)),
        2 => remap(block, |x, y| (last - x, last - y)),
        3 => remap(block, |x, y| (y, last - x)),
        _ => block.clone(),
    }
}

/// Rotate clockwise by `turns` quarter turns
pub fn rotate_cw(block: &Block, turns: u8) -> Block {
    rotate_ccw(block, (4 - turns % 4) % 4)
}

/// Mirror the block. Every flip is its own inverse.
pub fn flip(block: &Block, flip: Flip) -> Block {
    let last = block.size().saturating_sub(1);
    match flip {
        Flip::None => block.clone(),
        Flip::Horizontal => remap(block, |x, y| (last - x, y)),
        Flip::Vertical => remap(block, |x, y| (x, last - y)),
        Flip::Both => remap(block, |x, y| (last - x, last - y)),
    }
}

/// Negative-positive: `v -> 255 - v` on every channel
pub fn invert(block: &mut Block) {
    for v in block.as_raw_mut() {
        *v = 255 - *v;
    }
}

/// Output channel `k` becomes input channel `perm[k]`
pub fn permute_channels(block: &mut Block, perm: ColorPerm) {
    if perm == ColorPerm::IDENTITY {
        return;
    }
    for px in block.pixels_mut() {
        let src = [px[0], px[1], px[2]];
        for (k, &from) in perm.0.iter().enumerate() {
            px[k] = src[from];
        }
    }
}

/// Encrypt-direction transform: rotate, flip, invert, shuffle channels
pub fn forward(block: Block, params: &BlockParams) -> Block {
    let mut out = flip(&rotate_ccw(&block, params.rotation), params.flip);
    if params.invert {
        invert(&mut out);
    }
    permute_channels(&mut out, params.color_perm);
    out
}

/// Decrypt-direction transform: the steps of [`forward`] undone in reverse order
pub fn inverse(block: Block, params: &BlockParams) -> Block {
    let mut out = block;
    permute_channels(&mut out, params.color_perm.inverse());
    if params.invert {
        invert(&mut out);
    }
    rotate_cw(&flip(&out, params.flip), params.rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::keys::COLOR_PERMS;

    fn test_block(size: usize) -> Block {
        let data = (0..size * size * 3)
            .map(|i| ((i * 37 + 11) % 256) as u8)
            .collect();
        Block::from_raw(size, data).unwrap()
    }

    /// 2x2 block whose pixel values are 1, 2 / 3, 4 on every channel
    fn small() -> Block {
        let mut b = Block::new(2);
        b.set_pixel(0, 0, [1; 3]);
        b.set_pixel(1, 0, [2; 3]);
        b.set_pixel(0, 1, [3; 3]);
        b.set_pixel(1, 1, [4; 3]);
        b
    }

    fn values(b: &Block) -> Vec<u8> {
        b.as_raw().chunks_exact(3).map(|px| px[0]).collect()
    }

    #[test]
    fn test_rotate_ccw_quarter_turn() {
        // [[1,2],[3,4]] -> [[2,4],[1,3]]
        assert_eq!(values(&rotate_ccw(&small(), 1)), vec![2, 4, 1, 3]);
        assert_eq!(values(&rotate_ccw(&small(), 2)), vec![4, 3, 2, 1]);
        assert_eq!(values(&rotate_ccw(&small(), 3)), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_rotate_cw_undoes_ccw() {
        let block = test_block(5);
        for turns in 0..4 {
            assert_eq!(rotate_cw(&rotate_ccw(&block, turns), turns), block);
        }
    }

    #[test]
    fn test_flip_directions() {
        assert_eq!(values(&flip(&small(), Flip::Horizontal)), vec![2, 1, 4, 3]);
        assert_eq!(values(&flip(&small(), Flip::Vertical)), vec![3, 4, 1, 2]);
        assert_eq!(values(&flip(&small(), Flip::Both)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_flip_is_self_inverse() {
        let block = test_block(6);
        for f in [Flip::None, Flip::Horizontal, Flip::Vertical, Flip::Both] {
            assert_eq!(flip(&flip(&block, f), f), block);
        }
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let block = test_block(4);
        let mut inverted = block.clone();
        invert(&mut inverted);
        assert_ne!(inverted, block);
        assert_eq!(inverted.pixel(0, 0)[0], 255 - block.pixel(0, 0)[0]);
        invert(&mut inverted);
        assert_eq!(inverted, block);
    }

    #[test]
    fn test_permute_channels() {
        let mut b = Block::new(1);
        b.set_pixel(0, 0, [10, 20, 30]);
        permute_channels(&mut b, ColorPerm([1, 2, 0]));
        assert_eq!(b.pixel(0, 0), [20, 30, 10]);
        permute_channels(&mut b, ColorPerm([1, 2, 0]).inverse());
        assert_eq!(b.pixel(0, 0), [10, 20, 30]);
    }

    #[test]
    fn test_forward_inverse_every_combination() {
        let block = test_block(4);
        for rotation in 0..4u8 {
            for code in 0..4u32 {
                for invert in [false, true] {
                    for color_perm in COLOR_PERMS {
                        let params = BlockParams {
                            perm_target: 0,
                            rotation,
                            flip: Flip::from_code(code),
                            invert,
                            color_perm,
                        };
                        let scrambled = forward(block.clone(), &params);
                        assert_eq!(inverse(scrambled, &params), block, "{:?}", params);
                    }
                }
            }
        }
    }

    #[test]
    fn test_forward_order_rotate_then_flip() {
        // Rotation and flip do not commute; forward must rotate first
        let params = BlockParams {
            rotation: 1,
            flip: Flip::Horizontal,
            ..BlockParams::IDENTITY
        };
        let out = forward(small(), &params);
        assert_eq!(values(&out), vec![4, 2, 3, 1]);
        assert_ne!(out, rotate_ccw(&flip(&small(), Flip::Horizontal), 1));
    }

    #[test]
    fn test_identity_params_leave_block_unchanged() {
        let block = test_block(3);
        assert_eq!(forward(block.clone(), &BlockParams::IDENTITY), block);
        assert_eq!(inverse(block.clone(), &BlockParams::IDENTITY), block);
    }

    #[test]
    fn test_black_block_inverts_to_white() {
        let params = BlockParams {
            invert: true,
            color_perm: ColorPerm([2, 1, 0]),
            ..BlockParams::IDENTITY
        };
        let out = forward(Block::new(4), &params);
        assert!(out.as_raw().iter().all(|&v| v == 255));
    }
}
