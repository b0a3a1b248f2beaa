//! Recording firing backend shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;

use myrtio_dimmer::{
    BindError, Duration, FiringBackend, FiringChannel, FiringCommand, MainsFrequency, SyncEdge,
};

/// Outputs the mock controller can schedule
pub const MOCK_CHANNELS: u8 = 4;

/// Highest pin the mock accepts
pub const MOCK_MAX_PIN: u8 = 39;

pub trait MainsKind {
    const MAINS: MainsFrequency;
}

pub struct Fixed50;
pub struct Fixed60;
pub struct Runtime;

impl MainsKind for Fixed50 {
    const MAINS: MainsFrequency = MainsFrequency::Fixed50Hz;
}

impl MainsKind for Fixed60 {
    const MAINS: MainsFrequency = MainsFrequency::Fixed60Hz;
}

impl MainsKind for Runtime {
    const MAINS: MainsFrequency = MainsFrequency::RuntimeDetected;
}

/// Calls the backend saw during start-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetupCall {
    SyncPin(u8),
    SyncEdge(SyncEdge),
    SyncPullup(bool),
    Begin,
}

type EventLog = Rc<RefCell<Vec<(u8, FiringCommand)>>>;

pub struct MockChannel {
    pin: u8,
    events: EventLog,
}

impl FiringChannel for MockChannel {
    fn set_delay(&mut self, delay_us: u16) {
        self.events
            .borrow_mut()
            .push((self.pin, FiringCommand::Delay(delay_us)));
    }

    fn turn_on(&mut self) {
        self.events.borrow_mut().push((self.pin, FiringCommand::On));
    }

    fn turn_off(&mut self) {
        self.events.borrow_mut().push((self.pin, FiringCommand::Off));
    }
}

pub struct MockBackend<F: MainsKind> {
    events: EventLog,
    bound: RefCell<Vec<u8>>,
    binds: Cell<usize>,
    frequency: Cell<f32>,
    detected: Cell<Option<f32>>,
    monitor_always_on: Cell<bool>,
    setup: RefCell<Vec<SetupCall>>,
    _mains: PhantomData<F>,
}

impl<F: MainsKind> MockBackend<F> {
    pub fn new() -> Self {
        let frequency = match F::MAINS {
            MainsFrequency::Fixed60Hz => 60.0,
            _ => 50.0,
        };
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            bound: RefCell::new(Vec::new()),
            binds: Cell::new(0),
            frequency: Cell::new(frequency),
            detected: Cell::new(None),
            monitor_always_on: Cell::new(false),
            setup: RefCell::new(Vec::new()),
            _mains: PhantomData,
        }
    }

    /// Every command issued so far, as `(pin, command)`
    pub fn events(&self) -> Vec<(u8, FiringCommand)> {
        self.events.borrow().clone()
    }

    /// Last command issued to `pin`
    pub fn last(&self, pin: u8) -> Option<FiringCommand> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, command)| *command)
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Number of successful `bind` calls
    pub fn binds(&self) -> usize {
        self.binds.get()
    }

    pub fn setup_calls(&self) -> Vec<SetupCall> {
        self.setup.borrow().clone()
    }

    pub fn set_detected(&self, frequency: Option<f32>) {
        self.detected.set(frequency);
    }
}

impl<F: MainsKind> FiringBackend for MockBackend<F> {
    type Channel = MockChannel;

    const MAX_CHANNELS: u8 = MOCK_CHANNELS;
    const MAINS: MainsFrequency = F::MAINS;

    fn bind(&self, pin: u8) -> Result<Self::Channel, BindError> {
        if pin > MOCK_MAX_PIN {
            return Err(BindError::InvalidPin(pin));
        }
        let mut bound = self.bound.borrow_mut();
        if bound.contains(&pin) {
            return Err(BindError::PinInUse(pin));
        }
        bound.push(pin);
        self.binds.set(self.binds.get() + 1);
        Ok(MockChannel {
            pin,
            events: Rc::clone(&self.events),
        })
    }

    fn frequency(&self) -> f32 {
        self.frequency.get()
    }

    fn set_frequency(&self, frequency: f32) {
        self.frequency.set(frequency);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn semi_period(&self) -> Duration {
        let frequency = self.frequency.get();
        if frequency <= 0.0 {
            return Duration::from_micros(0);
        }
        Duration::from_micros((500_000.0 / frequency) as u64)
    }

    fn detected_frequency(&self) -> Option<f32> {
        self.detected.get()
    }

    fn frequency_monitor_always_on(&self) -> bool {
        self.monitor_always_on.get()
    }

    fn set_frequency_monitor_always_on(&self, enable: bool) {
        self.monitor_always_on.set(enable);
    }

    fn begin(&self) {
        self.setup.borrow_mut().push(SetupCall::Begin);
    }

    fn set_sync_pin(&self, pin: u8) {
        self.setup.borrow_mut().push(SetupCall::SyncPin(pin));
    }

    fn set_sync_edge(&self, edge: SyncEdge) {
        self.setup.borrow_mut().push(SetupCall::SyncEdge(edge));
    }

    fn set_sync_pullup(&self, pullup: bool) {
        self.setup.borrow_mut().push(SetupCall::SyncPullup(pullup));
    }
}
