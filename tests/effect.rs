mod tests {
    use embassy_time::Instant;
    use stagelight::color::BLACK;
    use stagelight::{
        Breathing, BreathingWave, Chase, ChaseRamp, Effect, EffectOptions, Fade, FadeDirection,
        FlickerRamp, Hsv, LiquidFill, ManualRamp, SourceSlot, StaticBrightness, StaticColor,
        DeviceId,
    };

    const DEVICE: DeviceId = DeviceId(0);

    fn white() -> SourceSlot<'static> {
        StaticColor::new(Hsv::new(0.0, 0.0, 1.0)).into()
    }

    /// Uniform gray level the pipeline produces for brightness `b` with
    /// gamma 1 over a white source.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn gray(b: f32) -> stagelight::Rgb {
        let level = (b * 255.0) as u8;
        stagelight::Rgb {
            r: level,
            g: level,
            b: level,
        }
    }

    fn linear() -> EffectOptions {
        EffectOptions::default().with_gamma(1.0)
    }

    #[test]
    fn test_chase_timing() {
        let source = white();
        let mut effect = Effect::new(DEVICE, 30, &source, Chase::new(3))
            .with_options(EffectOptions::default().with_speed(10.0));

        // Fully blank at t=0.
        let frame = effect.render(Instant::from_millis(0));
        assert!(frame.iter().all(|&pixel| pixel == BLACK));
        assert!(!effect.is_finished());

        // Head has crossed pixel 0 once elapsed × speed >= 1.
        let frame = effect.render(Instant::from_millis(100));
        assert_ne!(frame[0], BLACK);
        assert!(!effect.is_finished());

        // Not yet finished just before the tail clears the strip.
        effect.render(Instant::from_millis(3200));
        assert!(!effect.is_finished());

        // Finished once elapsed >= (30 + 3) / 10 seconds.
        let frame = effect.render(Instant::from_millis(3310));
        assert!(frame.iter().all(|&pixel| pixel == BLACK));
        assert!(effect.is_finished());

        // The terminal state is monotonic.
        effect.render(Instant::from_millis(5000));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_chase_delay_blanks_strip() {
        let source = white();
        let mut effect = Effect::new(DEVICE, 10, &source, Chase::new(2).with_delay(1.0))
            .with_options(EffectOptions::default().with_speed(20.0));

        let frame = effect.render(Instant::from_millis(900));
        assert!(frame.iter().all(|&pixel| pixel == BLACK));

        let frame = effect.render(Instant::from_millis(1100));
        assert!(frame.iter().any(|&pixel| pixel != BLACK));
    }

    #[test]
    fn test_chase_loop_interval_reruns() {
        let source = white();
        // Crossing takes (10 + 2) / 20 = 0.6s, then a 0.4s gap.
        let mut effect = Effect::new(
            DEVICE,
            10,
            &source,
            Chase::new(2).with_loop_interval(0.4),
        )
        .with_options(EffectOptions::default().with_speed(20.0));

        effect.render(Instant::from_millis(0));
        // Inside the idle gap: blank but not finished.
        let frame = effect.render(Instant::from_millis(700));
        assert!(frame.iter().all(|&pixel| pixel == BLACK));
        assert!(!effect.is_finished());

        // Next cycle: the comet runs again.
        let frame = effect.render(Instant::from_millis(1100));
        assert!(frame.iter().any(|&pixel| pixel != BLACK));
        assert!(!effect.is_finished());
    }

    #[test]
    fn test_gamma_applied_exactly() {
        let source = white();
        let mut effect = Effect::new(DEVICE, 4, &source, StaticBrightness::new(0.5))
            .with_options(EffectOptions::default().with_gamma(2.9));

        let frame = effect.render(Instant::from_millis(0));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let expected = (libm::powf(0.5, 2.9) * 255.0) as u8;
        for pixel in frame {
            assert_eq!(pixel.r, expected);
            assert_eq!(pixel.g, expected);
            assert_eq!(pixel.b, expected);
        }
    }

    #[test]
    fn test_source_value_channel_respected() {
        // A half-value source stop dims the output even at full mask
        // brightness: (1.0 × 0.5)^gamma with gamma=1 is 0.5.
        let source: SourceSlot = StaticColor::new(Hsv::new(0.0, 0.0, 0.5)).into();
        let mut effect =
            Effect::new(DEVICE, 4, &source, StaticBrightness::new(1.0)).with_options(linear());

        let frame = effect.render(Instant::from_millis(0));
        assert_eq!(frame[0], gray(0.5));
    }

    #[test]
    fn test_static_brightness_duration_from_first_update() {
        let source = white();
        let mut effect = Effect::new(
            DEVICE,
            6,
            &source,
            StaticBrightness::new(1.0).with_duration(2.0),
        );

        // First update at t=5s latches the start instant.
        effect.render(Instant::from_millis(5000));
        assert!(!effect.is_finished());

        effect.render(Instant::from_millis(6990));
        assert!(!effect.is_finished());

        effect.render(Instant::from_millis(7000));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_fade_out_holds_then_snaps() {
        let source = white();
        let mut effect = Effect::new(
            DEVICE,
            5,
            &source,
            Fade::new(FadeDirection::Out, 2.0).with_delay(1.0),
        )
        .with_options(linear());

        // Holding the pre-fade level during the delay.
        let frame = effect.render(Instant::from_millis(500));
        assert_eq!(frame[0], gray(1.0));

        // Halfway through the ramp.
        let frame = effect.render(Instant::from_millis(2000));
        assert_eq!(frame[0], gray(0.5));
        assert!(!effect.is_finished());

        // Snaps to exactly zero at the boundary and finishes.
        let frame = effect.render(Instant::from_millis(3000));
        assert_eq!(frame[0], BLACK);
        assert!(effect.is_finished());
    }

    #[test]
    fn test_fade_in_holds_then_snaps() {
        let source = white();
        let mut effect = Effect::new(
            DEVICE,
            5,
            &source,
            Fade::new(FadeDirection::In, 2.0).with_delay(1.0),
        )
        .with_options(linear());

        let frame = effect.render(Instant::from_millis(500));
        assert_eq!(frame[0], BLACK);

        let frame = effect.render(Instant::from_millis(2000));
        assert_eq!(frame[0], gray(0.5));

        let frame = effect.render(Instant::from_millis(3000));
        assert_eq!(frame[0], gray(1.0));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_breathing_cosine_peaks_at_start() {
        let source = white();
        let mut effect = Effect::new(
            DEVICE,
            4,
            &source,
            Breathing::new(BreathingWave::Cosine {
                cycle_duration: 4.0,
            })
            .with_levels(0.25, 1.0),
        )
        .with_options(linear());

        // cos(0) = 1: full brightness at the start of the cycle.
        let frame = effect.render(Instant::from_millis(0));
        assert_eq!(frame[0], gray(1.0));

        // Half a cycle later the wave bottoms out at the minimum.
        let frame = effect.render(Instant::from_millis(2000));
        assert_eq!(frame[0], gray(0.25));
    }

    #[test]
    fn test_breathing_trapezoid_phases() {
        let source = white();
        let mut effect = Effect::new(
            DEVICE,
            4,
            &source,
            Breathing::new(BreathingWave::Trapezoid {
                on_duration: 2.0,
                off_duration: 2.0,
                transition_duration: 1.0,
            })
            .with_levels(0.0, 1.0),
        )
        .with_options(linear());

        // Fade-in ramp.
        assert_eq!(effect.render(Instant::from_millis(500))[0], gray(0.5));
        // On hold.
        assert_eq!(effect.render(Instant::from_millis(1500))[0], gray(1.0));
        // Fade-out ramp.
        assert_eq!(effect.render(Instant::from_millis(3500))[0], gray(0.5));
        // Off hold.
        assert_eq!(effect.render(Instant::from_millis(5000))[0], BLACK);
        // Next cycle wraps around (cycle length 6s).
        assert_eq!(effect.render(Instant::from_millis(6500))[0], gray(0.5));
    }

    #[test]
    fn test_breathing_duration_finishes() {
        let source = white();
        let mut effect = Effect::new(
            DEVICE,
            4,
            &source,
            Breathing::new(BreathingWave::Cosine {
                cycle_duration: 1.0,
            })
            .with_duration(4.0),
        );

        effect.render(Instant::from_millis(0));
        effect.render(Instant::from_millis(3900));
        assert!(!effect.is_finished());
        effect.render(Instant::from_millis(4000));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_flicker_ramp_timeline_sums_to_total() {
        let ramp = FlickerRamp::new(8.0)
            .with_stages(6)
            .with_convergence_factor(0.7);
        assert!((ramp.total_duration() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_flicker_ramp_finishes_fully_lit() {
        let source = white();
        let ramp = FlickerRamp::new(8.0)
            .with_stages(6)
            .with_convergence_factor(0.7);
        let mut effect = Effect::new(DEVICE, 20, &source, ramp).with_options(linear());

        effect.render(Instant::from_millis(0));
        effect.render(Instant::from_millis(7900));
        assert!(!effect.is_finished());

        let frame = effect.render(Instant::from_millis(8010));
        assert!(frame.iter().all(|&pixel| pixel == gray(1.0)));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_liquid_fill_wavefront() {
        let source = white();
        let mut effect = Effect::new(DEVICE, 10, &source, LiquidFill::new(2))
            .with_options(linear().with_speed(5.0));

        // At t=1s the wavefront sits at position 5.
        let frame = effect.render(Instant::from_millis(1000));
        assert_eq!(frame[0], gray(1.0));
        assert_eq!(frame[4], gray(0.5));
        assert_eq!(frame[5], BLACK);
        assert_eq!(frame[9], BLACK);
        assert!(!effect.is_finished());

        // Finished fully lit once position >= 10 + 2.
        let frame = effect.render(Instant::from_millis(2500));
        assert!(frame.iter().all(|&pixel| pixel == gray(1.0)));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_chase_ramp_finishing_phase() {
        let source = white();
        // Max speed equals the starting speed: the ramp enters its
        // finishing phase on the first update and finishes fully lit
        // after the configured duration.
        let ramp = ChaseRamp::new()
            .with_speeds(10.0, 10.0)
            .with_finish_duration(0.5);
        let mut effect = Effect::new(DEVICE, 12, &source, ramp).with_options(linear());

        let frame = effect.render(Instant::from_millis(0));
        assert!(frame.iter().all(|&pixel| pixel == gray(1.0)));
        assert!(!effect.is_finished());

        let frame = effect.render(Instant::from_millis(600));
        assert!(frame.iter().all(|&pixel| pixel == gray(1.0)));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_chase_ramp_moves_before_finishing() {
        let source = white();
        let ramp = ChaseRamp::new()
            .with_speeds(5.0, 200.0)
            .with_acceleration(2.0)
            .with_widths(3.0, 6.0);
        let mut effect = Effect::new(DEVICE, 16, &source, ramp).with_options(linear());

        effect.render(Instant::from_millis(0));
        let early: Vec<_> = effect.render(Instant::from_millis(200)).to_vec();
        let later: Vec<_> = effect.render(Instant::from_millis(700)).to_vec();
        assert!(!effect.is_finished());
        assert_ne!(early, later);
        assert!(later.iter().any(|&pixel| pixel != BLACK));
    }

    #[test]
    fn test_manual_ramp_rises_and_finishes() {
        let source = white();
        let mut effect =
            Effect::new(DEVICE, 4, &source, ManualRamp::new(2.0)).with_options(linear());

        effect.render(Instant::from_millis(0));
        assert_eq!(effect.render(Instant::from_millis(1000))[0], gray(0.5));
        assert!(!effect.is_finished());

        let frame = effect.render(Instant::from_millis(2000));
        assert_eq!(frame[0], gray(1.0));
        assert!(effect.is_finished());
    }

    #[test]
    fn test_reverse_option_flips_brightness() {
        let source = white();
        let mut forward = Effect::new(DEVICE, 10, &source, LiquidFill::new(1))
            .with_options(linear().with_speed(2.0));
        let mut reversed = Effect::new(DEVICE, 10, &source, LiquidFill::new(1))
            .with_options(linear().with_speed(2.0).with_reverse());

        let forward_frame: Vec<_> = forward.render(Instant::from_millis(1000)).to_vec();
        let reversed_frame: Vec<_> = reversed.render(Instant::from_millis(1000)).to_vec();
        for i in 0..10 {
            assert_eq!(forward_frame[i], reversed_frame[9 - i]);
        }
    }

    #[test]
    fn test_dither_stays_in_bounds() {
        let source = white();
        let mut effect = Effect::new(DEVICE, 32, &source, StaticBrightness::new(0.5))
            .with_options(linear().with_dither_strength(0.2));

        for step in 0..16 {
            let frame = effect.render(Instant::from_millis(step * 16));
            for pixel in frame {
                // 0.5 ± 0.2 over a white source with gamma 1.
                assert!(pixel.r >= 75 && pixel.r <= 179, "level {}", pixel.r);
            }
        }
    }
}
