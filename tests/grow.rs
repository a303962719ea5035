mod tests {
    use embassy_time::{Duration, Instant};
    use fractured_light::{
        LineClaims, LineLayout, LineSet, Palette, PixelBuffer,
        color::{BLACK, Rgb},
        pattern::{GrowParams, GrowPattern, GrowPhase, Pattern, RenderContext},
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const LEDS: usize = 10;

    fn params(n: u16) -> GrowParams {
        GrowParams {
            speed: 100,
            n,
            fade_delay: Duration::from_millis(10),
            hold_delay: Duration::from_millis(50),
            palette: Palette::new(&[RED]),
            transition_speed: 100,
            offset_delay: Duration::from_millis(100),
        }
    }

    fn render(pattern: &mut GrowPattern, pixels: &mut PixelBuffer, lines: &LineSet, ms: u64) {
        let mut ctx = RenderContext {
            now: Instant::from_millis(ms),
            pixels,
            lines,
            reverse: false,
            claims: LineClaims::NONE,
        };
        pattern.update(&mut ctx);
    }

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(LineLayout::new(2, 1, LEDS as u16).unwrap())
    }

    #[test]
    fn test_grow_zero_n_is_noop() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(params(0));

        render(&mut grow, &mut pixels, &lines, 0);
        render(&mut grow, &mut pixels, &lines, 100);
        assert_eq!(grow.active_leds(0), Some(0));
        assert!(pixels.as_slice().iter().all(|pixel| *pixel == BLACK));
    }


    #[test]
    fn test_grow_zero_speed_is_noop() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(GrowParams {
            speed: 0,
            ..params(2)
        });

        render(&mut grow, &mut pixels, &lines, 0);
        assert_eq!(grow.active_leds(0), Some(0));
        assert!(pixels.as_slice().iter().all(|pixel| *pixel == BLACK));
    }

    #[test]
    fn test_grow_empty_palette_is_noop() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(GrowParams {
            palette: Palette::new(&[]),
            ..params(2)
        });

        render(&mut grow, &mut pixels, &lines, 0);
        assert_eq!(grow.active_leds(0), Some(0));
        assert!(pixels.as_slice().iter().all(|pixel| *pixel == BLACK));
    }

    #[test]
    fn test_grow_noop_keeps_interval() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut idle = GrowPattern::new(GrowParams {
            speed: 0,
            ..params(2)
        });
        let mut grow = GrowPattern::new(params(2));

        render(&mut idle, &mut pixels, &lines, 0);
        render(&mut grow, &mut pixels, &lines, 1);
        assert_eq!(grow.active_leds(0), Some(2));
        assert_eq!(pixels.line(0).unwrap()[0], Rgb { r: 15, g: 0, b: 0 });
    }

    #[test]
    fn test_grow_ranks_only_existing_lines() {
        let mut pixels = buffer();
        // Line 5 is outside the two-line layout
        let lines = LineSet::new(&[0, 5, 1]);
        let mut grow = GrowPattern::new(params(2));

        render(&mut grow, &mut pixels, &lines, 0);
        assert_eq!(grow.active_leds(0), Some(2));
        assert_eq!(grow.active_leds(1), Some(0));

        render(&mut grow, &mut pixels, &lines, 100);
        assert_eq!(grow.active_leds(1), Some(2));
        assert_eq!(grow.active_leds(5), Some(0));
    }

    #[test]
    fn test_grow_first_step_fades_in() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(params(2));

        render(&mut grow, &mut pixels, &lines, 0);
        assert_eq!(grow.active_leds(0), Some(2));
        let line = pixels.line(0).unwrap();
        assert_eq!(line[0], Rgb { r: 15, g: 0, b: 0 });
        assert_eq!(line[1], Rgb { r: 15, g: 0, b: 0 });
        assert_eq!(line[2], BLACK);
    }

    #[test]
    fn test_grow_cycle() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(params(2));

        let mut ms = 0;
        while ms < 40 {
            render(&mut grow, &mut pixels, &lines, ms);
            assert!(grow.active_leds(0).unwrap() <= LEDS);
            ms += 5;
        }
        assert_eq!(grow.phase(0), Some(GrowPhase::Growing));
        assert_eq!(grow.active_leds(0), Some(8));

        render(&mut grow, &mut pixels, &lines, 40);
        assert_eq!(grow.phase(0), Some(GrowPhase::Holding));
        assert_eq!(grow.active_leds(0), Some(LEDS));

        ms = 45;
        while ms < 90 {
            render(&mut grow, &mut pixels, &lines, ms);
            assert_eq!(grow.phase(0), Some(GrowPhase::Holding));
            ms += 5;
        }

        render(&mut grow, &mut pixels, &lines, 90);
        assert_eq!(grow.phase(0), Some(GrowPhase::Shrinking));

        ms = 95;
        while ms <= 135 {
            render(&mut grow, &mut pixels, &lines, ms);
            ms += 5;
        }
        assert_eq!(grow.phase(0), Some(GrowPhase::Growing));
        assert_eq!(grow.active_leds(0), Some(0));
    }

    #[test]
    fn test_grow_reaches_full_brightness() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(params(2));

        let mut ms = 0;
        while ms <= 85 {
            render(&mut grow, &mut pixels, &lines, ms);
            ms += 5;
        }
        // Fades move by 15 every 5 ms, the last pair only started at 40 ms
        let line = pixels.line(0).unwrap();
        assert_eq!(line[0], RED);
        assert_eq!(line[1], RED);
        assert_eq!(line[LEDS - 1], Rgb { r: 150, g: 0, b: 0 });
    }

    #[test]
    fn test_grow_line_offset() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0, 1]);
        let mut grow = GrowPattern::new(params(2));

        let mut ms = 0;
        while ms < 100 {
            render(&mut grow, &mut pixels, &lines, ms);
            assert_eq!(grow.active_leds(1), Some(0));
            assert_eq!(pixels.line(1), Some(&[BLACK; LEDS][..]));
            ms += 5;
        }

        render(&mut grow, &mut pixels, &lines, 100);
        assert_eq!(grow.active_leds(1), Some(2));
    }

    #[test]
    fn test_grow_reverse_mirrors() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(params(2));

        let mut ctx = RenderContext {
            now: Instant::from_millis(0),
            pixels: &mut pixels,
            lines: &lines,
            reverse: true,
            claims: LineClaims::NONE,
        };
        grow.update(&mut ctx);
        let line = pixels.line(0).unwrap();
        assert_eq!(line[LEDS - 1], Rgb { r: 15, g: 0, b: 0 });
        assert_eq!(line[0], BLACK);
    }

    #[test]
    fn test_grow_reset() {
        let mut pixels = buffer();
        let lines = LineSet::new(&[0]);
        let mut grow = GrowPattern::new(params(2));

        for ms in 0..10 {
            render(&mut grow, &mut pixels, &lines, ms * 5);
        }
        grow.reset();
        assert_eq!(grow.phase(0), Some(GrowPhase::Growing));
        assert_eq!(grow.active_leds(0), Some(0));
    }
}
