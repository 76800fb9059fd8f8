//! Timed keyboard and mouse macro playback.
//!
//! The pieces compose in one direction: [`actions`] defines the validated
//! sequence model, [`runner`] plays a sequence through an [`input`] driver
//! with loop control and cooperative cancellation, [`controller`] wraps a
//! run in the countdown/start/stop state machine, and [`store`] keeps named
//! sequences on disk. [`hotkey`] and [`settings`] wire the global toggle
//! combo to a controller.

pub mod actions;
pub mod controller;
pub mod hotkey;
pub mod input;
pub mod logging;
pub mod runner;
pub mod settings;
pub mod store;
