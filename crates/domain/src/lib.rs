//! # homelink-domain
//!
//! Pure domain model for the homelink remote-control protocol.
//!
//! ## Responsibilities
//! - Define **Commands** (the closed set of actuator requests and their wire tokens)
//! - Define **Event notifications** (controller → client messages)
//! - Translate free-form utterances into commands
//! - Map commands to actuator actions (the dispatch table)
//! - Debounce bookkeeping for the doorbell input
//! - Connection lifecycle states and the shared error taxonomy
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;

pub mod command;
pub mod connection;
pub mod debounce;
pub mod dispatch;
pub mod notification;
pub mod translator;
