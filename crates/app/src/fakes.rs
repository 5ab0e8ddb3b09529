//! In-memory port implementations shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use homelink_domain::dispatch::PinLevel;
use homelink_domain::error::{ActuatorError, ReadError, WriteError};
use homelink_domain::notification::EventNotification;

use crate::ports::{ActuatorDriver, Edge, EdgeSource, LineSender, LineSource, NotificationSink};

// ── Actuator driver ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Level(u8, PinLevel),
    Pulse(u8, u8),
}

#[derive(Default)]
pub struct RecordingDriver {
    pub calls: Mutex<Vec<DriverCall>>,
    pub fail_pin: Option<u8>,
}

impl RecordingDriver {
    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ActuatorDriver for RecordingDriver {
    fn set_level(&self, pin: u8, level: PinLevel) -> Result<(), ActuatorError> {
        if self.fail_pin == Some(pin) {
            return Err(ActuatorError::Pin { pin });
        }
        self.calls.lock().unwrap().push(DriverCall::Level(pin, level));
        Ok(())
    }

    fn set_pulse(&self, channel: u8, duty: u8) -> Result<(), ActuatorError> {
        self.calls.lock().unwrap().push(DriverCall::Pulse(channel, duty));
        Ok(())
    }
}

// ── Line sender ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSender {
    pub lines: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LineSender for RecordingSender {
    async fn send_line(&self, text: &str) -> Result<(), WriteError> {
        if self.fail {
            return Err(WriteError::Closed);
        }
        self.lines.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ── Line source ────────────────────────────────────────────────

pub struct ScriptedSource {
    pub script: VecDeque<Result<Option<String>, ReadError>>,
}

impl ScriptedSource {
    pub fn lines(lines: &[&str]) -> Self {
        Self {
            script: lines.iter().map(|l| Ok(Some((*l).to_string()))).collect(),
        }
    }

    pub fn then_fail(mut self) -> Self {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        self.script.push_back(Err(ReadError::Io(err)));
        self
    }
}

impl LineSource for ScriptedSource {
    async fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        self.script.pop_front().unwrap_or(Ok(None))
    }
}

// ── Edge source ────────────────────────────────────────────────

/// Edge source fed through a channel. Presses made while disarmed are
/// dropped.
pub struct ChannelEdges {
    rx: mpsc::UnboundedReceiver<Edge>,
    armed: Arc<Mutex<bool>>,
}

#[derive(Clone)]
pub struct EdgeFeeder {
    tx: mpsc::UnboundedSender<Edge>,
    armed: Arc<Mutex<bool>>,
}

impl EdgeFeeder {
    pub fn press(&self) {
        if *self.armed.lock().unwrap() {
            let _ = self.tx.send(Edge { pin: 2 });
        }
    }
}

pub fn edge_channel() -> (EdgeFeeder, ChannelEdges) {
    let (tx, rx) = mpsc::unbounded_channel();
    let armed = Arc::new(Mutex::new(false));
    (
        EdgeFeeder {
            tx,
            armed: armed.clone(),
        },
        ChannelEdges { rx, armed },
    )
}

impl EdgeSource for ChannelEdges {
    async fn next_edge(&mut self) -> Option<Edge> {
        self.rx.recv().await
    }

    fn arm(&mut self) {
        while self.rx.try_recv().is_ok() {}
        *self.armed.lock().unwrap() = true;
    }

    fn disarm(&mut self) {
        *self.armed.lock().unwrap() = false;
    }
}

// ── Notification sink ──────────────────────────────────────────

#[derive(Clone, Default)]
pub struct CollectingSink {
    pub received: Arc<Mutex<Vec<EventNotification>>>,
}

impl CollectingSink {
    pub fn texts(&self) -> Vec<String> {
        self.received
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.text.clone())
            .collect()
    }
}

impl NotificationSink for CollectingSink {
    fn deliver(&mut self, notification: EventNotification) {
        self.received.lock().unwrap().push(notification);
    }
}
