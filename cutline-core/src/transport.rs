//! Host transport: the outbound `invoke(method, args)` contract.

use crossbeam_channel::{Receiver, Sender};
use serde_json::{Map, Value};

/// Method name used when the store publishes a document snapshot.
pub const PROJECT_STATE_METHOD: &str = "project_state";

/// Outbound call into the host. The return value is whatever the host
/// hands back; the store ignores it.
pub trait Transport: Send {
    fn invoke(&self, method: &str, args: Vec<Value>) -> Option<Value>;
}

/// Extract the state object from a `project_state` call's arguments.
///
/// The first argument may be the object itself or its JSON text. Anything
/// else, including unparsable text, yields an empty object.
pub fn project_state_payload(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Object(map)) => Value::Object(map.clone()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Value::Object(map),
            Ok(_) | Err(_) => {
                log::warn!(target: "transport", "project_state payload is not a JSON object");
                Value::Object(Map::new())
            }
        },
        _ => Value::Object(Map::new()),
    }
}

/// A call that crossed the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportEvent {
    pub method: String,
    pub args: Vec<Value>,
}

/// Transport that forwards every call over a channel, for hosts that drain
/// events on their own thread.
pub struct ChannelTransport {
    tx: Sender<TransportEvent>,
}

impl ChannelTransport {
    pub fn new() -> (Self, Receiver<TransportEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn invoke(&self, method: &str, args: Vec<Value>) -> Option<Value> {
        let reply = if method == PROJECT_STATE_METHOD {
            Some(project_state_payload(&args))
        } else {
            None
        };
        let event = TransportEvent {
            method: method.to_string(),
            args,
        };
        if self.tx.send(event).is_err() {
            log::warn!(target: "transport", "receiver dropped; {} not delivered", method);
        }
        reply
    }
}
