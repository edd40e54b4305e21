use etcimg::grid::CHANNELS;
use etcimg::pipeline::{flip, Block, Flip, COLOR_PERMS};
use etcimg::{
    decrypt_grid, encrypt_grid, generate_params, Dimensions, EtcConfig, KeySchedule, PixelGrid,
    Seed,
};
use proptest::prelude::*;

fn schedule_strategy() -> impl Strategy<Value = KeySchedule> {
    prop_oneof![Just(KeySchedule::Mt19937), Just(KeySchedule::StdRng)]
}

fn seed_strategy() -> impl Strategy<Value = Seed> {
    prop_oneof![
        any::<i64>().prop_map(|n| Seed::int(n as i128)),
        "[a-z0-9 ]{0,12}".prop_map(Seed::Text),
    ]
}

fn grid_strategy() -> impl Strategy<Value = PixelGrid> {
    (1usize..40, 1usize..40).prop_flat_map(|(w, h)| {
        proptest::collection::vec(any::<u8>(), w * h * CHANNELS)
            .prop_map(move |data| PixelGrid::from_raw(w, h, data).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn encrypt_then_decrypt_is_identity(
        grid in grid_strategy(),
        seed in seed_strategy(),
        block_size in 1usize..20,
        schedule in schedule_strategy(),
    ) {
        let config = EtcConfig { seed, block_size, schedule };
        let original = grid.dimensions();
        let encrypted = encrypt_grid(grid.clone(), &config).unwrap();
        prop_assert_eq!(encrypted.dimensions(), original.padded_to(block_size));

        let decrypted = decrypt_grid(encrypted, &config, original).unwrap();
        prop_assert_eq!(decrypted, grid);
    }

    #[test]
    fn permutation_is_a_bijection(
        seed in seed_strategy(),
        n in 0usize..300,
        schedule in schedule_strategy(),
    ) {
        let params = generate_params(&seed, n, schedule);
        prop_assert_eq!(params.len(), n);
        let mut targets = params.permutation();
        targets.sort_unstable();
        prop_assert_eq!(targets, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn parameters_are_deterministic(
        seed in seed_strategy(),
        n in 0usize..100,
        schedule in schedule_strategy(),
    ) {
        prop_assert_eq!(
            generate_params(&seed, n, schedule),
            generate_params(&seed, n, schedule)
        );
    }

    #[test]
    fn padding_aligned_grid_appends_nothing(
        cols in 1usize..5,
        rows in 1usize..5,
        block_size in 1usize..9,
    ) {
        let grid = PixelGrid::new(cols * block_size, rows * block_size);
        let padded = grid.clone().pad_to_block(block_size);
        prop_assert_eq!(padded.as_raw().len(), grid.as_raw().len());
        prop_assert_eq!(padded, grid);
    }

    #[test]
    fn flip_twice_is_identity(
        data in proptest::collection::vec(any::<u8>(), 5 * 5 * CHANNELS),
        code in 0u32..4,
    ) {
        let block = Block::from_raw(5, data).unwrap();
        let f = Flip::from_code(code);
        prop_assert_eq!(flip(&flip(&block, f), f), block);
    }
}

#[test]
fn every_color_perm_has_an_inverse() {
    for perm in COLOR_PERMS {
        let inv = perm.inverse();
        for k in 0..3 {
            assert_eq!(perm.0[inv.0[k]], k);
        }
    }
}

#[test]
fn decrypt_with_wrong_original_size_fails() {
    let config = EtcConfig::new(Seed::int(114_514), 16);
    let encrypted = encrypt_grid(PixelGrid::new(17, 17), &config).unwrap();
    assert!(decrypt_grid(encrypted, &config, Dimensions::new(33, 17)).is_err());
}
