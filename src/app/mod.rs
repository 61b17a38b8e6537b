// src/app/mod.rs

//! Board-level pieces around the console and EEPROM engine: the heartbeat
//! LED, the user button and the EEPROM demo it triggers.

pub mod blink;
pub mod button;
pub mod demo;

pub use blink::{BlinkSchedule, LedCommand};
pub use button::{ButtonEdge, ButtonEvent};
pub use demo::{DemoMode, DemoSequencer};
