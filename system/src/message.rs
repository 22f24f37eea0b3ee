use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ConnectionId = uuid::Uuid;

/// Color of a stroke or a user. Opaque to the server (hex, hsl, ...).
pub type Color = String;

/// Sent along with a cursor update whose sender is no longer registered.
pub const DEFAULT_CURSOR_COLOR: &str = "#000";

pub fn new_connection_id() -> ConnectionId {
    uuid::Uuid::new_v4()
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A finished (or, for `draw_chunk`, in-progress) freehand stroke, shaped
/// `{points, color, width}` by well-behaved clients.
///
/// Kept as the JSON the client sent: never validated, never normalized, so
/// relays and history replays carry unknown, missing or mistyped fields
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stroke(serde_json::Value);

impl Stroke {
    pub fn new(points: Vec<Point>, color: impl Into<Color>, width: f64) -> Self {
        Self(serde_json::json!({
            "points": points,
            "color": color.into(),
            "width": width,
        }))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Stroke {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Client → server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientCommand {
    DrawChunk(Stroke),
    DrawCommit(Stroke),
    CursorMove(Point),
    Undo,
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Init {
        id: ConnectionId,
        history: Vec<Stroke>,
        color: Color,
    },
    DrawChunk(Stroke),
    CursorUpdate {
        id: ConnectionId,
        pos: Point,
        color: Color,
    },
    HistoryUpdate(Vec<Stroke>),
    UserLeft(ConnectionId),
}

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("cannot decode client command: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("cannot encode server event: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ClientCommand {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

impl ServerEvent {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn it_decodes_client_events_by_name() {
        let command = ClientCommand::decode(
            r##"{"event":"draw_commit","data":{"points":[{"x":1,"y":2},{"x":3.5,"y":4}],"color":"#ff0000","width":3}}"##,
        )
        .expect("");
        assert_eq!(
            command,
            ClientCommand::DrawCommit(Stroke::from(json!({
                "points": [{ "x": 1, "y": 2 }, { "x": 3.5, "y": 4 }],
                "color": "#ff0000",
                "width": 3
            })))
        );

        let command = ClientCommand::decode(r#"{"event":"cursor_move","data":{"x":10,"y":20}}"#)
            .expect("");
        assert_eq!(command, ClientCommand::CursorMove(Point::new(10.0, 20.0)));
    }

    #[test]
    fn it_accepts_undo_without_data() {
        assert_eq!(
            ClientCommand::decode(r#"{"event":"undo"}"#).expect(""),
            ClientCommand::Undo
        );
    }

    #[test]
    fn it_accepts_malformed_strokes_as_is() {
        let command = ClientCommand::decode(r#"{"event":"draw_commit","data":{"width":null}}"#)
            .expect("");
        assert_eq!(
            command,
            ClientCommand::DrawCommit(Stroke::from(json!({ "width": null })))
        );

        let command = ClientCommand::decode(r#"{"event":"draw_chunk","data":{"width":"3"}}"#)
            .expect("");
        assert_eq!(
            command,
            ClientCommand::DrawChunk(Stroke::from(json!({ "width": "3" })))
        );
    }

    #[test]
    fn it_relays_chunks_verbatim() {
        let text = r##"{"event":"draw_chunk","data":{"points":[{"x":1,"y":2,"pressure":0.5}],"color":"#f00"}}"##;
        let stroke = match ClientCommand::decode(text).expect("") {
            ClientCommand::DrawChunk(stroke) => stroke,
            other => panic!("unexpected command {:?}", other),
        };
        let relayed = ServerEvent::DrawChunk(stroke).encode().expect("");
        assert_eq!(relayed, text);
    }

    #[test]
    fn it_rejects_unknown_events() {
        assert!(ClientCommand::decode(r#"{"event":"redo"}"#).is_err());
        assert!(ClientCommand::decode("not json").is_err());
    }

    #[test]
    fn it_encodes_server_events_in_wire_shape() {
        let id = new_connection_id();
        let event = ServerEvent::CursorUpdate {
            id,
            pos: Point::new(1.0, 2.0),
            color: DEFAULT_CURSOR_COLOR.into(),
        };
        let value: serde_json::Value = serde_json::from_str(&event.encode().expect("")).expect("");
        assert_eq!(
            value,
            json!({
                "event": "cursor_update",
                "data": { "id": id.to_string(), "pos": { "x": 1.0, "y": 2.0 }, "color": "#000" }
            })
        );

        let value: serde_json::Value =
            serde_json::from_str(&ServerEvent::UserLeft(id).encode().expect("")).expect("");
        assert_eq!(value, json!({ "event": "user_left", "data": id.to_string() }));

        let value: serde_json::Value =
            serde_json::from_str(&ServerEvent::HistoryUpdate(vec![]).encode().expect(""))
                .expect("");
        assert_eq!(value, json!({ "event": "history_update", "data": [] }));
    }
}
