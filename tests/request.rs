mod tests {
    use embassy_time::{Duration, Instant};
    use fractured_light::{
        FrameScheduler, InterruptRequest, InterruptState, LineLayout, OutputDriver, Palette,
        PatternType, Program, ProgramConfig, RequestChannel, Rgb, Segment,
        channel::TrySendError,
        frame_scheduler::DEFAULT_FRAME_DURATION,
        pattern::{BreathingParams, PatternSlot},
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    #[derive(Default)]
    struct RecordingDriver {
        writes: usize,
        last_len: usize,
    }

    impl OutputDriver for RecordingDriver {
        fn write(&mut self, colors: &[Rgb]) {
            self.writes += 1;
            self.last_len = colors.len();
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn breathing() -> BreathingParams {
        BreathingParams {
            speed: 50,
            palette: Palette::new(&[RED]),
        }
    }

    fn running_program() -> Program {
        let config = ProgramConfig {
            layout: LineLayout::new(2, 1, 8).unwrap(),
            ..ProgramConfig::default()
        };
        let mut program = Program::new(config, 1);
        let segment = Segment::single(breathing(), &[0, 1], Duration::from_secs(30));
        assert!(program.add_segment(0, segment).is_ok());
        program.start(at(0));
        program
    }

    #[test]
    fn test_channel_full() {
        let channel: RequestChannel<2> = RequestChannel::new();
        let sender = channel.sender();
        let request = InterruptRequest::new(breathing(), &[0], Duration::from_secs(1));

        assert!(sender.try_send(request.clone()).is_ok());
        assert!(sender.try_send(request.clone()).is_ok());
        assert_eq!(sender.try_send(request.clone()), Err(TrySendError(request)));
        assert_eq!(channel.len(), 2);

        let receiver = channel.receiver();
        assert!(receiver.has_pending());
        channel.clear();
        assert!(!receiver.has_pending());
        assert!(receiver.try_receive().is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request =
            InterruptRequest::with_defaults(PatternType::Chase, &[2, 9, 2, 0], Duration::from_secs(5));
        assert_eq!(request.pattern_type(), PatternType::Chase);
        assert_eq!(request.lines.as_slice(), &[2, 0]);
        assert_eq!(request.params, PatternType::Chase.default_params());
        assert!(!request.reverse);
    }

    #[test]
    fn test_request_into_segment() {
        let request = InterruptRequest::new(breathing(), &[1, 3], Duration::from_secs(4))
            .with_reverse(true);
        let segment = request.into_segment();

        assert_eq!(segment.duration(), Duration::from_secs(4));
        assert!(!segment.is_active());
        assert_eq!(segment.patterns().len(), 1);

        let pattern = &segment.patterns()[0];
        assert!(pattern.is_reversed());
        assert_eq!(pattern.lines().as_slice(), &[1, 3]);
        assert!(matches!(pattern.slot(), PatternSlot::Breathing(_)));
    }

    #[test]
    fn test_scheduler_writes_every_tick() {
        let channel: RequestChannel<4> = RequestChannel::new();
        let mut scheduler =
            FrameScheduler::new(running_program(), channel.receiver(), RecordingDriver::default());

        let result = scheduler.tick(at(0));
        assert_eq!(result.sleep_duration, DEFAULT_FRAME_DURATION);
        assert_eq!(result.next_deadline, at(16));

        let result = scheduler.tick(at(16));
        assert_eq!(result.next_deadline, at(32));

        // Late but within the drift window
        let result = scheduler.tick(at(40));
        assert_eq!(result.next_deadline, at(48));
        assert_eq!(result.sleep_duration, Duration::from_millis(8));

        assert_eq!(scheduler.output().writes, 3);
        assert_eq!(scheduler.output().last_len, 16);
    }

    #[test]
    fn test_scheduler_skips_backlog() {
        let channel: RequestChannel<4> = RequestChannel::new();
        let mut scheduler =
            FrameScheduler::new(running_program(), channel.receiver(), RecordingDriver::default());

        scheduler.tick(at(0));
        let result = scheduler.tick(at(1000));
        assert_eq!(result.next_deadline, at(1016));
        assert_eq!(result.sleep_duration, DEFAULT_FRAME_DURATION);
        assert_eq!(scheduler.output().writes, 2);
    }

    #[test]
    fn test_scheduler_drains_requests() {
        let channel: RequestChannel<4> = RequestChannel::new();
        let sender = channel.sender();
        let mut scheduler =
            FrameScheduler::new(running_program(), channel.receiver(), RecordingDriver::default());

        scheduler.tick(at(0));
        let request = InterruptRequest::new(breathing(), &[1], Duration::from_secs(2));
        assert!(sender.try_send(request).is_ok());

        scheduler.tick(at(16));
        assert!(channel.is_empty());
        assert_eq!(
            scheduler.program().interrupt_state(),
            InterruptState::TransitioningOut
        );

        scheduler.program_mut().stop();
        assert!(!scheduler.program().is_running());
    }
}
