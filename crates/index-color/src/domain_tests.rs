//! Domain-critical regression tests for index-color.
//!
//! These tests pin down the behavior callers rely on: exactness of the
//! nearest-color searches, the bit packing of the color cube, validation
//! before writes, and unity gain of the interpolation filters. Each test
//! documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::ColormapBuilder;
    use crate::color::{distance, IndexSample, Sample, SampleType};
    use crate::colormap::{Colormap, SearchMethod};
    use crate::dispatch::{color_true_to_index, QuantizeError};
    use crate::image::{ChannelLayout, ImageView, ImageViewMut};
    use crate::resample::{affine_resample, AffineTransform, Filter};
    use crate::search::{nearest_brute_force, TreeSearch};
    use crate::quantize_line;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn quantize_u8(colormap: &Colormap, rgb: &[u8], channels: usize) -> Vec<u8> {
        let width = rgb.len() / channels;
        let mut out = vec![0u8; width];
        quantize_line(rgb, &mut out, ChannelLayout::Packed, colormap).unwrap();
        out
    }

    // ========================================================================
    // Distance metric
    // ========================================================================

    /// If this breaks, it means: the distance metric depends on argument
    /// order (for example an unsigned subtraction that wraps), so searches
    /// would give different answers depending on which side a color sits.
    #[test]
    fn test_distance_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let a: [u32; 4] = std::array::from_fn(|_| rng.gen_range(0..65536));
            let b: [u32; 4] = std::array::from_fn(|_| rng.gen_range(0..65536));
            for shift in [0, 2] {
                assert_eq!(
                    distance(&a, &b, shift),
                    distance(&b, &a, shift),
                    "REGRESSION: distance({a:?}, {b:?}, {shift}) is not symmetric"
                );
            }
        }
    }

    // ========================================================================
    // Oct-tree exactness
    // ========================================================================

    /// If this breaks, it means: the oct-tree backtracking prunes a region
    /// that still holds a closer color. The tree must agree with brute force
    /// on every query, ties included, because both resolve ties to the
    /// lowest index.
    #[test]
    fn test_octree_matches_brute_force_u8() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for entries in [1usize, 2, 33, 200, 256] {
            let palette: Vec<u8> = (0..entries * 3).map(|_| rng.gen()).collect();
            let tree = ColormapBuilder::from_u8(3, &palette)
                .method(SearchMethod::OctTree)
                .build()
                .unwrap();
            let brute = ColormapBuilder::from_u8(3, &palette)
                .method(SearchMethod::BruteForce)
                .build()
                .unwrap();
            let pixels: Vec<u8> = (0..3 * 2000).map(|_| rng.gen()).collect();
            assert_eq!(
                quantize_u8(&tree, &pixels, 3),
                quantize_u8(&brute, &pixels, 3),
                "REGRESSION: oct-tree and brute force disagree for {entries} entries"
            );
        }
    }

    /// If this breaks, it means: four-channel trees (16-way nodes) miss
    /// diagonal neighbours during backtracking.
    #[test]
    fn test_octree_matches_brute_force_four_channels() {
        let mut rng = StdRng::seed_from_u64(4);
        let palette: Vec<u8> = (0..120 * 4).map(|_| rng.gen()).collect();
        let tree = ColormapBuilder::from_u8(4, &palette)
            .method(SearchMethod::OctTree)
            .build()
            .unwrap();
        let brute = ColormapBuilder::from_u8(4, &palette)
            .method(SearchMethod::BruteForce)
            .build()
            .unwrap();
        let pixels: Vec<u8> = (0..4 * 2000).map(|_| rng.gen()).collect();
        assert_eq!(
            quantize_u8(&tree, &pixels, 4),
            quantize_u8(&brute, &pixels, 4)
        );
    }

    /// If this breaks, it means: the 16-bit tree search is not exact under
    /// its own metric. Brute force scales 16-bit distances by 0.125 before
    /// truncating, which can tie entries the tree metric separates, so the
    /// tree is checked against a linear scan with the tree metric instead
    /// and against brute force by distance only.
    #[test]
    fn test_octree_exact_for_sixteen_bit_samples() {
        let mut rng = StdRng::seed_from_u64(16);
        let palette: Vec<i16> = (0..500 * 3).map(|_| rng.gen()).collect();
        let colormap = ColormapBuilder::from_s16(3, &palette)
            .method(SearchMethod::OctTree)
            .index_type(SampleType::U16)
            .build()
            .unwrap();
        let search = TreeSearch::<3>::new(
            colormap.tree().unwrap(),
            colormap.unsigned_palette(),
            <i16 as Sample>::SHIFT,
        );

        for _ in 0..500 {
            let px: [i16; 3] = std::array::from_fn(|_| rng.gen());
            let c = px.map(|s| s.to_unsigned());
            let found = search.nearest(&c);

            let best = colormap
                .unsigned_palette()
                .chunks_exact(3)
                .map(|e| distance(&c, &[e[0], e[1], e[2]], 2))
                .min()
                .unwrap();
            assert_eq!(found.distance, best, "REGRESSION: query {px:?}");

            let query = px.map(|s| s as f64);
            let k = nearest_brute_force(colormap.double_palette(), &query, 0.125);
            let e = &colormap.unsigned_palette()[k * 3..k * 3 + 3];
            let brute_distance = distance(&c, &[e[0], e[1], e[2]], 2);
            // Per-term `>> 2` and whole-sum `* 0.125` truncate differently
            assert!(brute_distance >= found.distance, "query {px:?}");
            assert!(brute_distance - found.distance <= 4, "query {px:?}");
        }
    }

    // ========================================================================
    // Color cube
    // ========================================================================

    /// If this breaks, it means: the cube table at full precision no longer
    /// maps a palette color to its own index, so the table is either packed
    /// in a different channel order than the lookup or filled from the wrong
    /// cell centres.
    #[test]
    fn test_color_cube_idempotent_at_full_bits() {
        // 2^24 cells at 8 bits per channel
        let mut rng = StdRng::seed_from_u64(8);
        let mut palette: Vec<u8> = Vec::new();
        while palette.len() < 40 * 3 {
            let color: [u8; 3] = rng.gen();
            if !palette.chunks_exact(3).any(|e| e == color) {
                palette.extend_from_slice(&color);
            }
        }
        let colormap = ColormapBuilder::from_u8(3, &palette)
            .method(SearchMethod::ColorCube)
            .bits(8)
            .build()
            .unwrap();
        let indices = quantize_u8(&colormap, &palette, 3);
        let expected: Vec<u8> = (0..40).collect();
        assert_eq!(indices, expected);
    }

    /// If this breaks, it means: the cube index packing changed. With one
    /// bit per channel a pixel's cell is its pattern of top bits, and the
    /// cell centre lies nearer white exactly when at least two channels are
    /// 128 or more.
    #[test]
    fn test_scenario_black_white_cube_one_bit() {
        let colormap = ColormapBuilder::from_u8(3, &[0, 0, 0, 255, 255, 255])
            .method(SearchMethod::ColorCube)
            .bits(1)
            .build()
            .unwrap();

        let mut rng = StdRng::seed_from_u64(64);
        let rgb: Vec<u8> = (0..8 * 8 * 3).map(|_| rng.gen()).collect();
        let mut out = vec![0u8; 64];
        let src = ImageView::new(&rgb[..], 8, 8, 3).unwrap();
        let mut dst = ImageViewMut::new(&mut out[..], 8, 8, 1).unwrap();
        color_true_to_index(&mut dst, &src, &colormap).unwrap();

        for (px, &index) in rgb.chunks_exact(3).zip(&out) {
            let high = px.iter().filter(|&&v| v >= 128).count();
            let expected = u8::from(high >= 2);
            assert_eq!(
                index, expected,
                "REGRESSION: pixel {px:?} mapped to {index}, expected {expected}"
            );
        }
    }

    // ========================================================================
    // Round trip through every method
    // ========================================================================

    /// If this breaks, it means: some search method does not return a
    /// palette entry for its own exact color, so indexed images drift when
    /// re-quantized.
    #[test]
    fn test_round_trip_every_method() {
        // A 4x4x4 product palette is valid for all four methods
        let levels = [0u8, 85, 170, 255];
        let palette: Vec<u8> = (0..64)
            .flat_map(|k| [levels[k / 16], levels[(k / 4) % 4], levels[k % 4]])
            .collect();

        for method in [
            SearchMethod::ColorCube,
            SearchMethod::OctTree,
            SearchMethod::BruteForce,
            SearchMethod::IndependentChannel,
        ] {
            let colormap = ColormapBuilder::from_u8(3, &palette)
                .method(method)
                .offset(10)
                .build()
                .unwrap();

            let indices: Vec<u8> = (10..74).collect();
            let expanded: Vec<u8> = indices
                .iter()
                .flat_map(|&i| colormap.color(i as u32).unwrap())
                .map(|v| v as u8)
                .collect();
            assert_eq!(
                quantize_u8(&colormap, &expanded, 3),
                indices,
                "REGRESSION: {method} does not round-trip palette colors"
            );
        }
    }

    /// If this breaks, it means: the 16-bit paths (bias shift, `>>6` table
    /// reduction, 0.125 brute-force scale) lost exact matches.
    #[test]
    fn test_round_trip_sixteen_bit() {
        let levels = [-32768i16, -1000, 1000, 32767];
        let palette: Vec<i16> = (0..16)
            .flat_map(|k| [levels[k / 4], levels[k % 4], levels[(k + 1) % 4]])
            .collect();
        for method in [SearchMethod::OctTree, SearchMethod::BruteForce] {
            let colormap = ColormapBuilder::from_s16(3, &palette)
                .method(method)
                .build()
                .unwrap();
            let mut out = vec![0u8; 16];
            quantize_line(&palette, &mut out, ChannelLayout::Packed, &colormap).unwrap();
            assert_eq!(out, (0..16).collect::<Vec<u8>>(), "{method}");
        }

        let product: Vec<i16> = (0..64)
            .flat_map(|k| [levels[k / 16], levels[(k / 4) % 4], levels[k % 4]])
            .collect();
        let colormap = ColormapBuilder::from_s16(3, &product)
            .index_type(SampleType::U16)
            .build()
            .unwrap();
        assert_eq!(colormap.method(), SearchMethod::IndependentChannel);
        let mut out = vec![0u16; 64];
        quantize_line(&product, &mut out, ChannelLayout::Packed, &colormap).unwrap();
        assert_eq!(out, (0..64).collect::<Vec<u16>>());
    }

    // ========================================================================
    // Scenarios
    // ========================================================================

    /// If this breaks, it means: the oct-tree no longer finds the nearest
    /// grey, or reports a distance that is not the squared difference.
    #[test]
    fn test_scenario_grey_ramp_octree() {
        let palette: Vec<u8> = (0..=255u8).flat_map(|i| [i, i, i]).collect();
        let colormap = ColormapBuilder::from_u8(3, &palette)
            .method(SearchMethod::OctTree)
            .build()
            .unwrap();
        let tree = colormap.tree().unwrap();
        let search = TreeSearch::<3>::new(tree, colormap.unsigned_palette(), 0);
        let found = search.nearest(&[130, 130, 131]);
        assert_eq!((found.index, found.distance), (130, 1));
        assert_eq!(quantize_u8(&colormap, &[130, 130, 131], 3), vec![130]);
    }

    /// If this breaks, it means: independent-channel lookup stopped summing
    /// one table entry per channel.
    #[test]
    fn test_scenario_independent_channel_tables() {
        let tables = vec![(0..256).collect(), vec![0; 256], vec![0; 256]];
        let palette: Vec<u8> = (0..=255u8).flat_map(|i| [i, 0, 0]).collect();
        let colormap = ColormapBuilder::from_u8(3, &palette)
            .dimension_tables(tables)
            .build()
            .unwrap();
        assert_eq!(quantize_u8(&colormap, &[42, 99, 7], 3), vec![42]);
    }

    // ========================================================================
    // Dispatcher validation
    // ========================================================================

    /// If this breaks, it means: a rejected conversion wrote into the
    /// destination before failing, leaving callers with half-converted
    /// buffers.
    #[test]
    fn test_type_mismatch_writes_nothing() {
        let colormap = ColormapBuilder::from_u8(3, &[0, 0, 0, 255, 255, 255])
            .build()
            .unwrap();
        let src_px = vec![0i16; 4 * 4 * 3];
        let mut out = vec![0xAAu8; 16];
        let src = ImageView::new(&src_px[..], 4, 4, 3).unwrap();
        let mut dst = ImageViewMut::new(&mut out[..], 4, 4, 1).unwrap();
        assert_eq!(
            color_true_to_index(&mut dst, &src, &colormap),
            Err(QuantizeError::InputTypeMismatch {
                expected: SampleType::U8,
                actual: SampleType::S16
            })
        );
        assert!(out.iter().all(|&v| v == 0xAA), "REGRESSION: destination was written");
    }

    /// If this breaks, it means: wide index outputs truncate, so palettes
    /// beyond 256 entries wrap around.
    #[test]
    fn test_wide_indices_do_not_wrap() {
        let palette: Vec<u8> = (0..300u32)
            .flat_map(|i| [(i % 256) as u8, (i / 256) as u8 * 200, 7])
            .collect();
        let colormap = ColormapBuilder::from_u8(3, &palette)
            .index_type(SampleType::U16)
            .build()
            .unwrap();
        let mut out = [0u16; 1];
        quantize_line(&[40u8, 200, 7], &mut out, ChannelLayout::Packed, &colormap).unwrap();
        assert_eq!(out[0].to_index(), 296);
    }

    // ========================================================================
    // Resampling
    // ========================================================================

    /// If this breaks, it means: the filter coefficients no longer sum to
    /// unity gain, so flat regions brighten or darken under resampling.
    #[test]
    fn test_constant_image_survives_any_transform() {
        let transforms = [
            AffineTransform::scale(1.7, 1.3),
            AffineTransform::scale(0.6, 0.6).then(&AffineTransform::translate(0.37, 0.81)),
            AffineTransform::rotate(0.45).then(&AffineTransform::translate(6.0, -2.0)),
        ];
        for filter in [Filter::Bilinear, Filter::Bicubic, Filter::Bicubic2] {
            for t in &transforms {
                let src_px = vec![201u8; 16 * 16 * 3];
                let mut dst_px = vec![0u8; 16 * 16 * 3];
                let src = ImageView::new(&src_px[..], 16, 16, 3).unwrap();
                let mut dst = ImageViewMut::new(&mut dst_px[..], 16, 16, 3).unwrap();
                affine_resample(&mut dst, &src, t, filter, None).unwrap();
                assert!(
                    dst_px.iter().all(|&v| v == 0 || v == 201),
                    "REGRESSION: {filter} changed a constant image"
                );
                assert!(dst_px.contains(&201), "{filter}: nothing was written");

                let src_px = vec![-12345i16; 16 * 16 * 3];
                let mut dst_px = vec![0i16; 16 * 16 * 3];
                let src = ImageView::new(&src_px[..], 16, 16, 3).unwrap();
                let mut dst = ImageViewMut::new(&mut dst_px[..], 16, 16, 3).unwrap();
                affine_resample(&mut dst, &src, t, filter, None).unwrap();
                assert!(dst_px.iter().all(|&v| v == 0 || v == -12345));
            }
        }
    }
}
