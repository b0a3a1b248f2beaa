#![cfg_attr(not(test), no_std)]

//! Brightness to firing delay mapping for AC phase-control (triac) dimmers.
//!
//! A [`Dimmer`] turns a user brightness into the delay after each zero
//! crossing at which a [`FiringBackend`] triggers the triac. Timers,
//! interrupts and the actual triggering stay in the backend.

pub mod backend;
pub mod dimmer;
pub mod mains;
pub mod mapping;
pub mod range;
pub mod registry;

pub use backend::{BindError, FiringBackend, FiringChannel, SyncConfig, SyncEdge, begin};
pub use dimmer::{
    DimmableLight, DimmableLightLinearized, Dimmer, DimmerConfig, DimmerError,
    LegacyDimmableLight, LegacyDimmableLightLinearized,
};
pub use mains::{MainsFrequency, PowerCurve};
pub use mapping::{FiringCommand, Mapping, PhaseDelay, PowerLinearized};
pub use range::{BrightnessRange, LegacyRange, RestrictedRange};
pub use registry::{ChannelRegistry, RegistryFull, SlotLease};

pub use embassy_time::Duration;
