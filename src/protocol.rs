use crate::game::events::GameEvent;
use crate::game::types::GameSnapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
  /// Raw key name; the engine decides whether it steers.
  Key(String),
  Reset,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum JsonClientMessage {
  #[serde(rename = "key")]
  Key { key: Option<String> },
  #[serde(rename = "reset")]
  Reset,
}

/// Malformed frames decode to `None` and are dropped.
pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  let message = serde_json::from_str::<JsonClientMessage>(text).ok()?;
  match message {
    JsonClientMessage::Key { key } => key.map(ClientMessage::Key),
    JsonClientMessage::Reset => Some(ClientMessage::Reset),
  }
}

#[derive(Debug, Serialize)]
struct EventFrame<'a> {
  #[serde(flatten)]
  event: &'a GameEvent,
  banner: Option<&'static str>,
  shake: bool,
}

#[derive(Debug, Serialize)]
struct StateFrame<'a> {
  #[serde(rename = "type")]
  kind: &'static str,
  state: &'a GameSnapshot,
  events: Vec<EventFrame<'a>>,
}

pub fn encode_state(snapshot: &GameSnapshot, events: &[GameEvent]) -> serde_json::Result<String> {
  let frame = StateFrame {
    kind: "state",
    state: snapshot,
    events: events
      .iter()
      .map(|event| EventFrame {
        event,
        banner: event.banner(),
        shake: event.shakes_screen(),
      })
      .collect(),
  };
  serde_json::to_string(&frame)
}
