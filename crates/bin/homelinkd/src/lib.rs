//! # homelinkd — homelink controller daemon
//!
//! Composition root for the controller side.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Construct the virtual GPIO driver and doorbell (adapters)
//! - Construct the command dispatcher, injecting the driver via its port trait
//! - Accept the single client connection and run the session loops on it
//! - Watch the console for `!exit` / `!ring` and handle Ctrl-C
//!
//! ## Dependency rule
//! This is the wiring layer — no domain logic belongs here.

pub mod config;
pub mod console;
pub mod session;
