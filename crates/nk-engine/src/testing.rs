//! Recording PWM channel and manual clock for unit tests.

use core::cell::{Cell, RefCell};

use crate::hal::{Clock, PwmChannel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Period(u32),
    Duty(u32),
    Update,
    Start,
}

pub struct MockPwm {
    prescaler: u32,
    period: Cell<u32>,
    duty: Cell<u32>,
    calls: RefCell<Vec<Call>>,
}

impl MockPwm {
    pub fn new(prescaler: u32) -> Self {
        Self {
            prescaler,
            period: Cell::new(0),
            duty: Cell::new(0),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn duty(&self) -> u32 {
        self.duty.get()
    }

    pub fn period(&self) -> u32 {
        self.period.get()
    }

    /// Number of notes programmed (one update event per tone).
    pub fn tones(&self) -> usize {
        self.calls.borrow().iter().filter(|c| **c == Call::Update).count()
    }
}

impl PwmChannel for MockPwm {
    fn prescaler(&self) -> u32 {
        self.prescaler
    }

    fn set_period(&self, reload: u32) {
        self.period.set(reload);
        self.calls.borrow_mut().push(Call::Period(reload));
    }

    fn set_duty(&self, compare: u32) {
        self.duty.set(compare);
        self.calls.borrow_mut().push(Call::Duty(compare));
    }

    fn generate_update(&self) {
        self.calls.borrow_mut().push(Call::Update);
    }

    fn start(&self) {
        self.calls.borrow_mut().push(Call::Start);
    }
}

#[derive(Default)]
pub struct ManualClock(Cell<u32>);

impl ManualClock {
    pub fn at(ms: u32) -> Self {
        Self(Cell::new(ms))
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u32 {
        self.0.get()
    }
}
