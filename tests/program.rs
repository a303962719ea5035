mod tests {
    use embassy_time::{Duration, Instant};
    use fractured_light::{
        InterruptRequest, InterruptState, LineLayout, Palette, PatternInstance, Program,
        ProgramConfig, RequestChannel, Segment,
        color::{BLACK, Rgb, WHITE},
        pattern::{BreathingParams, FlameParams, FlashbulbParams, PatternSlot, SpinParams},
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const LEDS: usize = 8;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn config() -> ProgramConfig {
        ProgramConfig {
            layout: LineLayout::new(2, 1, LEDS as u16).unwrap(),
            transition: Duration::from_millis(500),
            brightness: 255,
            seed: 1,
        }
    }

    fn breathing() -> BreathingParams {
        BreathingParams {
            speed: 100,
            palette: Palette::new(&[RED]),
        }
    }

    /// Solid red on every pixel, redrawn on every step
    fn solid_spin() -> SpinParams {
        SpinParams {
            speed: 75,
            separation: 0,
            span: 1,
            palette: Palette::new(&[RED]),
            looping: false,
            continuous: true,
            blend: false,
        }
    }

    fn flame() -> FlameParams {
        FlameParams {
            speed: 100,
            cooling: 55,
            sparking: 200,
            warm_base: true,
        }
    }

    fn flash() -> FlashbulbParams {
        FlashbulbParams {
            flash_duration: Duration::from_millis(100),
            fade_duration: Duration::from_millis(100),
            transition_duration: Duration::from_millis(100),
        }
    }

    fn interrupt_request() -> InterruptRequest {
        InterruptRequest::new(breathing(), &[1], Duration::from_millis(2000))
    }

    fn spin_position(program: &Program, line: u8) -> Option<usize> {
        match program.segment(0)?.patterns()[0].slot() {
            PatternSlot::Spin(pattern) => pattern.position(line),
            _ => None,
        }
    }

    #[test]
    fn test_program_needs_first_slot() {
        let mut program = Program::new(config(), 2);
        let segment = Segment::single(breathing(), &[0], Duration::from_secs(1));
        assert!(program.add_segment(1, segment).is_ok());

        program.start(at(0));
        assert!(!program.is_running());
        assert!(program.update(at(0)).iter().all(|pixel| *pixel == BLACK));
    }

    #[test]
    fn test_program_add_segment_out_of_range() {
        let mut program = Program::new(config(), 1);
        let segment = Segment::single(breathing(), &[0], Duration::from_secs(1));
        let rejected = program.add_segment(3, segment);
        assert!(rejected.is_err());
        assert_eq!(program.slot_count(), 1);
    }

    #[test]
    fn test_program_cycles_and_resets_segments() {
        let mut program = Program::new(config(), 2);
        let first = Segment::single(breathing(), &[0], Duration::from_secs(1));
        let second = Segment::single(flame(), &[1], Duration::from_secs(1));
        assert!(program.add_segment(0, first).is_ok());
        assert!(program.add_segment(1, second).is_ok());

        program.start(at(0));
        assert!(program.is_running());
        program.update(at(0));
        assert_eq!(program.current_index(), 0);

        program.update(at(1000));
        assert_eq!(program.current_index(), 1);
        assert_eq!(program.pixels().line(0), Some(&[BLACK; LEDS][..]));
        assert!(!program.segment(0).unwrap().is_active());
        assert_eq!(program.segment(1).unwrap().start_time(), at(1000));

        program.update(at(1500));
        assert!(program.segment(1).unwrap().is_active());

        program.update(at(2000));
        assert_eq!(program.current_index(), 0);
        assert_eq!(program.pixels().line(1), Some(&[BLACK; LEDS][..]));
        let restarted = program.segment(0).unwrap();
        assert_eq!(restarted.start_time(), at(2000));
        match restarted.patterns()[0].slot() {
            PatternSlot::Breathing(pattern) => {
                assert_eq!(pattern.brightness(), 0);
                assert!(pattern.increasing());
            }
            _ => panic!("expected a breathing pattern"),
        }
    }

    #[test]
    fn test_playlist_patterns_get_own_seeds() {
        let mut program = Program::new(config(), 1);
        let segment = Segment::new(
            vec![
                PatternInstance::new(flame(), &[0]),
                PatternInstance::new(flame(), &[1]),
            ],
            Duration::from_secs(60),
        );
        assert!(program.add_segment(0, segment).is_ok());
        program.start(at(0));
        for step in 0..20 {
            program.update(at(step * 30));
        }

        let patterns = program.segment(0).unwrap().patterns();
        let heat = |index: usize, line: u8| match patterns[index].slot() {
            PatternSlot::Flame(pattern) => pattern.heat(line).to_vec(),
            _ => panic!("expected a flame pattern"),
        };
        assert_eq!(heat(0, 0).len(), LEDS);
        assert_ne!(heat(0, 0), heat(1, 1));
    }

    #[test]
    fn test_program_skips_empty_slots() {
        let mut program = Program::new(config(), 3);
        let first = Segment::single(breathing(), &[0], Duration::from_secs(1));
        let third = Segment::single(breathing(), &[1], Duration::from_secs(1));
        assert!(program.add_segment(0, first).is_ok());
        assert!(program.add_segment(2, third).is_ok());

        program.start(at(0));
        program.update(at(1000));
        assert_eq!(program.current_index(), 2);
        program.update(at(2000));
        assert_eq!(program.current_index(), 0);
    }

    #[test]
    fn test_interrupt_rejected_when_not_running() {
        let mut program = Program::new(config(), 1);
        let request = interrupt_request();
        assert_eq!(program.trigger_interrupt(request.clone(), at(0)), Err(request));
        assert_eq!(program.interrupt_state(), InterruptState::None);
    }

    #[test]
    fn test_second_interrupt_rejected() {
        let mut program = Program::new(config(), 1);
        let segment = Segment::single(breathing(), &[0], Duration::from_secs(10));
        assert!(program.add_segment(0, segment).is_ok());
        program.start(at(0));

        assert!(program.trigger_interrupt(interrupt_request(), at(100)).is_ok());
        assert_eq!(program.interrupt_state(), InterruptState::TransitioningOut);

        let second = interrupt_request();
        assert_eq!(
            program.trigger_interrupt(second.clone(), at(200)),
            Err(second)
        );
        assert_eq!(program.interrupt_state(), InterruptState::TransitioningOut);
    }

    #[test]
    fn test_interrupt_pause_and_resume() {
        let mut program = Program::new(config(), 2);
        let first = Segment::single(breathing(), &[0], Duration::from_secs(10));
        let second = Segment::single(breathing(), &[0], Duration::from_secs(5));
        assert!(program.add_segment(0, first).is_ok());
        assert!(program.add_segment(1, second).is_ok());

        program.start(at(0));
        for ms in [0, 1000, 2000, 3000] {
            program.update(at(ms));
        }

        assert!(program.trigger_interrupt(interrupt_request(), at(3000)).is_ok());
        let saved = *program.saved_state().unwrap();
        assert_eq!(saved.index, 0);
        assert_eq!(saved.paused_at, at(3000));
        assert_eq!(saved.remaining, Duration::from_millis(7000));

        // Fade out, the paused frame stays in the buffer
        let frozen = program.pixels().clone();
        program.update(at(3000));
        assert_eq!(program.brightness(), 255);
        program.update(at(3250));
        assert_eq!(program.interrupt_state(), InterruptState::TransitioningOut);
        assert_eq!(program.brightness(), 128);
        assert_eq!(program.pixels(), &frozen);

        program.update(at(3500));
        assert_eq!(program.interrupt_state(), InterruptState::Active);
        assert_eq!(program.brightness(), 255);
        assert_eq!(
            program.interrupt().unwrap().segment.start_time(),
            at(3500)
        );

        program.update(at(4500));
        assert_eq!(program.interrupt_state(), InterruptState::Active);

        // Interrupt lines are blacked out and the playlist fades back in
        program.update(at(5500));
        assert_eq!(program.interrupt_state(), InterruptState::TransitioningIn);
        assert!(program.interrupt().is_none());
        assert_eq!(program.pixels().line(1), Some(&[BLACK; LEDS][..]));
        assert_eq!(program.brightness(), 0);
        assert!(program.output().iter().all(|pixel| *pixel == BLACK));

        program.update(at(5750));
        assert!(program.brightness() > 0 && program.brightness() < 255);

        program.update(at(6000));
        assert_eq!(program.interrupt_state(), InterruptState::None);
        assert_eq!(program.brightness(), 255);
        assert!(program.saved_state().is_none());
        assert_eq!(program.current_index(), 0);
        assert_eq!(program.segment(0).unwrap().start_time(), at(3000));

        program.update(at(12_999));
        assert_eq!(program.current_index(), 0);
        program.update(at(13_000));
        assert_eq!(program.current_index(), 1);
    }

    #[test]
    fn test_flashbulb_runs_over_playlist() {
        let mut program = Program::new(config(), 1);
        let segment = Segment::single(solid_spin(), &[0, 1], Duration::from_secs(60));
        assert!(program.add_segment(0, segment).is_ok());
        program.start(at(0));
        program.update(at(0));
        assert!(program.pixels().as_slice().iter().all(|pixel| *pixel == RED));

        let request = InterruptRequest::new(flash(), &[0], Duration::from_millis(0));
        assert!(program.trigger_interrupt(request, at(100)).is_ok());
        assert_eq!(program.interrupt_state(), InterruptState::Active);
        assert!(program.trigger_interrupt(interrupt_request(), at(100)).is_err());

        program.update(at(100));
        assert_eq!(program.pixels().line(0), Some(&[WHITE; LEDS][..]));
        assert_eq!(program.pixels().line(1), Some(&[RED; LEDS][..]));
        assert_eq!(program.brightness(), 255);

        program.update(at(150));
        program.update(at(200));
        assert_eq!(program.pixels().line(0), Some(&[WHITE; LEDS][..]));

        program.update(at(250));
        let gray = Rgb {
            r: 128,
            g: 128,
            b: 128,
        };
        assert_eq!(program.pixels().line(0), Some(&[gray; LEDS][..]));
        assert_eq!(program.pixels().line(1), Some(&[RED; LEDS][..]));

        program.update(at(300));
        assert_eq!(program.pixels().line(0), Some(&[BLACK; LEDS][..]));

        program.update(at(400));
        assert_eq!(program.interrupt_state(), InterruptState::None);
        assert!(program.interrupt().is_none());
        assert_eq!(program.pixels().line(0), Some(&[RED; LEDS][..]));

        // The claimed line kept rotating with the rest
        assert_eq!(spin_position(&program, 0), Some(5));
        assert_eq!(spin_position(&program, 1), Some(5));
        // Episode time does not count against the playlist
        assert_eq!(program.segment(0).unwrap().start_time(), at(300));
    }

    #[test]
    fn test_program_stop() {
        let mut program = Program::new(config(), 1);
        let segment = Segment::single(solid_spin(), &[0, 1], Duration::from_secs(60));
        assert!(program.add_segment(0, segment).is_ok());
        program.start(at(0));
        program.update(at(0));
        assert!(program.trigger_interrupt(interrupt_request(), at(100)).is_ok());

        program.stop();
        assert!(!program.is_running());
        assert_eq!(program.interrupt_state(), InterruptState::None);
        assert!(program.interrupt().is_none());
        assert_eq!(program.brightness(), 255);
        assert!(program.update(at(200)).iter().all(|pixel| *pixel == BLACK));
    }

    #[test]
    fn test_process_requests_drains_channel() {
        let channel: RequestChannel<4> = RequestChannel::new();
        let mut program = Program::new(config(), 1);
        let segment = Segment::single(breathing(), &[0], Duration::from_secs(10));
        assert!(program.add_segment(0, segment).is_ok());
        program.start(at(0));

        let sender = channel.sender();
        assert!(sender.try_send(interrupt_request()).is_ok());
        assert!(sender.try_send(interrupt_request()).is_ok());

        let accepted = program.process_requests(&channel.receiver(), at(100));
        assert_eq!(accepted, 1);
        assert!(channel.is_empty());
        assert_eq!(program.interrupt_state(), InterruptState::TransitioningOut);
    }
}
