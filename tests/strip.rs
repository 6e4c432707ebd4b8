mod common;

mod tests {
    use core::ptr::addr_of_mut;

    use myrtio_led_strip::{
        BitstreamTransmitter, Color, GlobalInterruptLock, GpioPin, LedStrip, OutputDriver,
        PinDriver, RegisterPin, Rgb,
    };

    use super::common::{
        Event, EventLog, MASK, RecordingClock, RecordingDelay, RecordingLock, RecordingPin,
        StepClock, TIMING, decode_bits, word_bits,
    };

    type TestStrip<const N: usize> =
        LedStrip<N, RecordingClock, RecordingPin, RecordingLock, RecordingDelay>;

    fn strip<const N: usize>(log: &EventLog) -> TestStrip<N> {
        let transmitter = BitstreamTransmitter::new(
            RecordingClock::new(log),
            RecordingPin::new(log, MASK),
            RecordingLock::new(log),
            TIMING,
        );
        LedStrip::new(transmitter, RecordingDelay::new(log))
    }

    #[test]
    fn test_new_strip_is_black_and_silent() {
        let log = EventLog::default();
        let strip = strip::<12>(&log);

        assert_eq!(strip.size(), 12);
        for index in 0..strip.size() {
            assert_eq!(strip[index], Color::BLACK);
        }
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_pixel_access() {
        let log = EventLog::default();
        let mut strip = strip::<4>(&log);

        strip[1] = Color::new(1, 2, 3);
        strip.set(3, Color::WHITE);
        strip[2] = strip[1] + 10;

        assert_eq!(strip.get(0), Color::BLACK);
        assert_eq!(strip.get(1), Color::new(1, 2, 3));
        assert_eq!(strip.get(2), Color::new(11, 12, 13));
        assert_eq!(strip.get(3), Color::WHITE);

        strip.reset();
        assert!(strip.buffer().pixels().iter().all(|pixel| *pixel == Color::BLACK));
    }

    #[test]
    fn test_reset_does_not_transmit() {
        let log = EventLog::default();
        let mut strip = strip::<3>(&log);
        strip.fill(Color::WHITE);

        strip.reset();

        assert!(log.events().is_empty());
        assert!(strip.buffer().words().all(|word| word == 0));
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range() {
        let log = EventLog::default();
        let mut strip = strip::<4>(&log);
        strip[std::hint::black_box(4)] = Color::WHITE;
    }

    #[test]
    fn test_send_transmits_buffer() {
        let log = EventLog::default();
        let mut strip = strip::<3>(&log);
        strip[0] = Color::new(0xFF, 0x00, 0x81);
        strip[2] = Color::new(0x12, 0x34, 0x56);

        strip.send();

        let words: Vec<u32> = strip.buffer().words().collect();
        assert_eq!(words, [0x00FF_8100, 0x0000_3412, 0x5600_0000]);

        let events = log.events();
        assert_eq!(events[..2], [Event::Low(MASK), Event::Acquire]);
        assert_eq!(
            events[events.len() - 3..],
            [Event::Low(MASK), Event::Release, Event::DelayUs(10_000)]
        );
        assert_eq!(decode_bits(&TIMING, &events), word_bits(&words));
    }

    #[test]
    fn test_send_async() {
        let log = EventLog::default();
        let mut strip = strip::<1>(&log);
        strip.fill(Color::WHITE);

        embassy_futures::block_on(strip.send_async());

        let events = log.events();
        assert_eq!(events.last(), Some(&Event::DelayUs(10_000)));
        assert_eq!(decode_bits(&TIMING, &events), word_bits(&[0xFFFF_FF00]));
    }

    #[test]
    fn test_write_colors() {
        let log = EventLog::default();
        let mut strip = strip::<3>(&log);
        strip.fill(Color::WHITE);

        strip.write_colors([Rgb { r: 1, g: 2, b: 3 }]);
        assert_eq!(strip[0], Color::new(1, 2, 3));
        assert_eq!(strip[1], Color::WHITE);

        strip.write_colors((0..10u8).map(|value| Color::new(value, value, value)));
        assert_eq!(strip[2], Color::new(2, 2, 2));
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_output_driver_writes_and_sends() {
        let log = EventLog::default();
        let mut strip = strip::<2>(&log);

        OutputDriver::write(
            &mut strip,
            &[Rgb { r: 255, g: 0, b: 0 }, Rgb { r: 0, g: 0, b: 255 }],
        );

        assert_eq!(strip[0], Color::new(255, 0, 0));
        assert_eq!(strip[1], Color::new(0, 0, 255));
        assert_eq!(
            decode_bits(&TIMING, &log.events()),
            word_bits(&[0x00FF_0000, 0x00FF_0000])
        );
    }

    #[test]
    fn test_send_with_register_pin_and_global_lock() {
        let log = EventLog::default();
        let mut set_register = 0u32;
        let mut clear_register = 0u32;
        // Safety: both locals outlive the strip and are only written through it
        let pin = unsafe {
            RegisterPin::new(
                GpioPin::new(4),
                addr_of_mut!(set_register) as usize,
                addr_of_mut!(clear_register) as usize,
            )
        };
        let transmitter =
            BitstreamTransmitter::new(StepClock::new(0, 1), pin, GlobalInterruptLock, TIMING);
        let mut strip: LedStrip<8, _, _, _, _> =
            LedStrip::new(transmitter, RecordingDelay::new(&log));
        strip[7] = Color::new(0, 0, 1);
        assert_eq!(strip.transmitter().pin().mask(), 0x10);

        strip.send();
        drop(strip);

        assert_eq!(set_register, 0x10);
        assert_eq!(clear_register, 0x10);
        assert_eq!(log.events(), [Event::DelayUs(10_000)]);
    }
}
