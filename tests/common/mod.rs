#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;
use myrtio_led_strip::{CycleClock, InterruptLock, PinDriver, ProtocolTiming};

pub const MASK: u32 = 0x4;
pub const TIMING: ProtocolTiming = ProtocolTiming::WS2812B_80MHZ;

/// Everything the fakes observe, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    High(u32),
    Low(u32),
    Wait(u32),
    Acquire,
    Release,
    DelayUs(u32),
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Clock that advances by `step` on every read
pub struct StepClock {
    now: Cell<u32>,
    step: u32,
}

impl StepClock {
    pub fn new(start: u32, step: u32) -> Self {
        Self {
            now: Cell::new(start),
            step,
        }
    }
}

impl CycleClock for StepClock {
    fn now(&self) -> u32 {
        let value = self.now.get();
        self.now.set(value.wrapping_add(self.step));
        value
    }
}

/// Clock that only advances when waited on, logging every wait
pub struct RecordingClock {
    log: EventLog,
    now: Cell<u32>,
}

impl RecordingClock {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            now: Cell::new(0),
        }
    }
}

impl CycleClock for RecordingClock {
    fn now(&self) -> u32 {
        self.now.get()
    }

    fn wait_cycles(&self, cycles: u32) {
        self.log.push(Event::Wait(cycles));
        self.now.set(self.now.get().wrapping_add(cycles));
    }
}

pub struct RecordingPin {
    log: EventLog,
    mask: u32,
}

impl RecordingPin {
    pub fn new(log: &EventLog, mask: u32) -> Self {
        Self {
            log: log.clone(),
            mask,
        }
    }
}

impl PinDriver for RecordingPin {
    fn mask(&self) -> u32 {
        self.mask
    }

    fn set_high(&mut self, mask: u32) {
        self.log.push(Event::High(mask));
    }

    fn set_low(&mut self, mask: u32) {
        self.log.push(Event::Low(mask));
    }
}

/// Pin that panics on the high edge after `highs_left` successful ones
pub struct FailingPin {
    inner: RecordingPin,
    highs_left: usize,
}

impl FailingPin {
    pub fn new(log: &EventLog, mask: u32, highs_left: usize) -> Self {
        Self {
            inner: RecordingPin::new(log, mask),
            highs_left,
        }
    }
}

impl PinDriver for FailingPin {
    fn mask(&self) -> u32 {
        self.inner.mask()
    }

    fn set_high(&mut self, mask: u32) {
        if self.highs_left == 0 {
            panic!("injected pin failure");
        }
        self.highs_left -= 1;
        self.inner.set_high(mask);
    }

    fn set_low(&mut self, mask: u32) {
        self.inner.set_low(mask);
    }
}

pub struct RecordingLock {
    log: EventLog,
}

impl RecordingLock {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl InterruptLock for RecordingLock {
    type State = ();

    unsafe fn acquire(&mut self) -> Self::State {
        self.log.push(Event::Acquire);
    }

    unsafe fn release(&mut self, _state: Self::State) {
        self.log.push(Event::Release);
    }
}

pub struct RecordingDelay {
    log: EventLog,
}

impl RecordingDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayUs(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayUs(ms * 1000));
    }
}

impl AsyncDelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayUs(ns / 1000));
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayUs(ms * 1000));
    }
}

/// Expected events for one word, MSB first
pub fn word_events(timing: &ProtocolTiming, mask: u32, word: u32) -> Vec<Event> {
    (0..32)
        .rev()
        .flat_map(|bit| {
            let pulse = timing.pulse(word & (1 << bit) != 0);
            [
                Event::High(mask),
                Event::Wait(pulse.high),
                Event::Low(mask),
                Event::Wait(pulse.low),
            ]
        })
        .collect()
}

/// Decode the bit values from logged high phases
pub fn decode_bits(timing: &ProtocolTiming, events: &[Event]) -> Vec<bool> {
    events
        .windows(2)
        .filter_map(|pair| match pair {
            [Event::High(_), Event::Wait(cycles)] => Some(*cycles == timing.one.high),
            _ => None,
        })
        .collect()
}

/// Bits of `words` as they should appear on the line
pub fn word_bits(words: &[u32]) -> Vec<bool> {
    words
        .iter()
        .flat_map(|word| (0..32).rev().map(move |bit| word & (1 << bit) != 0))
        .collect()
}
