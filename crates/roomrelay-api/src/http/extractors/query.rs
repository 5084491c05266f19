//! Query parameter extractors for room endpoints.

use serde::Deserialize;

use roomrelay_types::message::resolve_room_id;

/// `?roomId=` selector shared by every room endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct RoomQuery {
    /// Missing or empty selects the default room.
    #[serde(rename = "roomId")]
    pub room_id: Option<String>,
}

impl RoomQuery {
    pub fn room_id(&self) -> String {
        resolve_room_id(self.room_id.as_deref())
    }
}
