mod tests {
    use embassy_time::Instant;
    use stagelight::source::{
        ColorShift, ColorSource, Gradient, MultiGradient, ScrollingColorSource, SourceSlot,
        StaticColor,
    };
    use stagelight::Hsv;

    const T0: Instant = Instant::from_millis(0);

    #[test]
    fn test_static_generate_uniform() {
        let source = StaticColor::new(Hsv::new(0.5, 1.0, 0.8));
        let pattern = source.generate(10, T0);
        assert_eq!(pattern.len(), 10);
        for i in 0..10 {
            assert_eq!(pattern.get(i), Hsv::new(0.5, 1.0, 0.8));
        }
    }

    #[test]
    fn test_static_source_deterministic() {
        let source = Gradient::new(Hsv::new(0.0, 1.0, 1.0), Hsv::new(0.6, 1.0, 0.4));
        let first = source.generate(30, T0);
        let second = source.generate(30, Instant::from_millis(5000));
        assert_eq!(first, second);
    }

    #[test]
    fn test_multi_gradient_matches_two_color_gradient() {
        let start = Hsv::new(0.1, 0.9, 1.0);
        let end = Hsv::new(0.7, 0.3, 0.5);
        let gradient = Gradient::new(start, end);
        let multi = MultiGradient::new([(start, 0.0), (end, 1.0)]);

        for num_leds in [2usize, 3, 7, 30, 61] {
            let a = gradient.generate(num_leds, T0);
            let b = multi.generate(num_leds, T0);
            assert_eq!(a, b, "pixel count {num_leds}");
        }
    }

    #[test]
    fn test_single_stop_degenerates_to_static() {
        let color = Hsv::new(0.33, 1.0, 0.75);
        let multi = MultiGradient::new([(color, 0.5)]);
        let uniform = StaticColor::new(color);
        assert_eq!(multi.generate(12, T0), uniform.generate(12, T0));
    }

    #[test]
    fn test_channels_stay_in_range() {
        // Out-of-range stops are sanitized at construction.
        let multi = MultiGradient::new([
            (Hsv::new(1.2, 1.5, -0.2), 0.0),
            (Hsv::new(-0.4, 0.5, 2.0), 1.3),
        ]);
        let pattern = multi.generate(40, T0);
        for i in 0..pattern.len() {
            let color = pattern.get(i);
            assert!(color.hue >= 0.0 && color.hue < 1.0, "hue {}", color.hue);
            assert!(color.sat >= 0.0 && color.sat <= 1.0, "sat {}", color.sat);
            assert!(color.val >= 0.0 && color.val <= 1.0, "val {}", color.val);
        }
    }

    #[test]
    fn test_gradient_sub_range_caps() {
        let start = Hsv::new(0.0, 1.0, 0.2);
        let end = Hsv::new(0.5, 1.0, 1.0);
        let gradient = Gradient::new(start, end).with_range(0.25, 0.75);
        let pattern = gradient.generate(5, T0);

        // Positions 0.0 and 0.25 hold the start color, 0.75 and 1.0 the
        // end color, 0.5 sits halfway up the ramp.
        assert_eq!(pattern.get(0), start);
        assert_eq!(pattern.get(1), start);
        assert_eq!(pattern.get(3), end);
        assert_eq!(pattern.get(4), end);
        let mid = pattern.get(2);
        assert!((mid.hue - 0.25).abs() < 1e-5);
        assert!((mid.val - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_gradient_reverse_flips_output() {
        let gradient = Gradient::new(Hsv::new(0.0, 1.0, 0.0), Hsv::new(0.5, 1.0, 1.0));
        let forward = gradient.generate(8, T0);
        let reversed = Gradient::new(Hsv::new(0.0, 1.0, 0.0), Hsv::new(0.5, 1.0, 1.0))
            .with_reverse()
            .generate(8, T0);
        for i in 0..8 {
            assert_eq!(forward.get(i), reversed.get(7 - i));
        }
    }

    #[test]
    fn test_scrolling_unscrolled_matches_inner() {
        let inner: SourceSlot =
            Gradient::new(Hsv::new(0.0, 1.0, 0.2), Hsv::new(0.5, 1.0, 1.0)).into();
        let scroll = ScrollingColorSource::new(&inner, 1.0)
            .with_resolution_multiplier(1)
            .mirrored();

        let direct = inner.generate(6, T0);
        let sampled = scroll.generate(6, T0);
        assert_eq!(direct, sampled);
    }

    #[test]
    fn test_scrolling_mirror_seam_continuity() {
        let inner: SourceSlot =
            Gradient::new(Hsv::new(0.0, 1.0, 0.2), Hsv::new(0.5, 1.0, 1.0)).into();
        let scroll = ScrollingColorSource::new(&inner, 1.0)
            .with_resolution_multiplier(1)
            .mirrored();

        let direct = inner.generate(6, T0);
        // After scrolling by n-1 samples the first output pixel reads the
        // mirrored pattern's midpoint, which must be the inner source's
        // last sample.
        let shifted = scroll.generate(6, Instant::from_secs(5));
        assert_eq!(shifted.get(0), direct.get(5));
        // One sample further into the mirrored half.
        assert_eq!(shifted.get(1), direct.get(4));
    }

    #[test]
    fn test_scrolling_full_cycle_returns_to_origin() {
        let inner: SourceSlot =
            Gradient::new(Hsv::new(0.0, 1.0, 0.2), Hsv::new(0.5, 1.0, 1.0)).into();
        let scroll = ScrollingColorSource::new(&inner, 1.0)
            .with_resolution_multiplier(1)
            .mirrored();

        // Mirrored pattern length is 2n-2 = 10 samples.
        let origin = scroll.generate(6, T0);
        let cycled = scroll.generate(6, Instant::from_secs(10));
        assert_eq!(origin, cycled);
    }

    #[test]
    fn test_segmented_scroll_freezes_between_segments() {
        let inner: SourceSlot =
            Gradient::new(Hsv::new(0.0, 1.0, 0.2), Hsv::new(0.5, 1.0, 1.0)).into();
        // Distance 2 LEDs per segment at 2 LEDs/sec: one second of
        // scrolling, then a one second hold.
        let scroll = ScrollingColorSource::new(&inner, 2.0)
            .with_resolution_multiplier(1)
            .mirrored()
            .with_pause_scroll(0.5, 1.0);

        let moving_a = scroll.generate(4, Instant::from_millis(0));
        let moving_b = scroll.generate(4, Instant::from_millis(500));
        assert_ne!(moving_a, moving_b);

        let held_a = scroll.generate(4, Instant::from_millis(1200));
        let held_b = scroll.generate(4, Instant::from_millis(1900));
        assert_eq!(held_a, held_b);

        // The frozen offset equals the segment endpoint, so the next
        // cycle starts exactly where the hold left off.
        let resumed = scroll.generate(4, Instant::from_millis(2000));
        assert_eq!(held_a, resumed);
    }

    #[test]
    fn test_color_shift_takes_short_hue_path() {
        // 0.9 to 0.1 is 0.2 across the wrap point, not 0.8 the long way.
        let shift = ColorShift::new(
            [
                (Hsv::new(0.9, 1.0, 1.0), 0.0),
                (Hsv::new(0.1, 1.0, 1.0), 1.0),
            ],
            1.0,
        );
        let quarter = shift.generate(4, Instant::from_millis(250));
        let color = quarter.get(0);
        assert!((color.hue - 0.95).abs() < 1e-4, "hue {}", color.hue);
        // Uniform across the strip.
        for i in 1..4 {
            assert_eq!(quarter.get(i), color);
        }

        let near_end = shift.generate(4, Instant::from_millis(875));
        assert!(
            (near_end.get(0).hue - 0.075).abs() < 1e-4,
            "hue {}",
            near_end.get(0).hue
        );
    }

    #[test]
    fn test_color_shift_repeats_cycle() {
        let shift = ColorShift::new(
            [
                (Hsv::new(0.2, 1.0, 1.0), 0.0),
                (Hsv::new(0.6, 0.5, 0.5), 1.0),
            ],
            2.0,
        );
        let first = shift.generate(3, Instant::from_millis(250));
        let repeat = shift.generate(3, Instant::from_millis(2250));
        assert_eq!(first, repeat);
    }
}
