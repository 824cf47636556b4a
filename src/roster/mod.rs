/// Player roster
///
/// Tracks community players by game id together with their contact details
/// and permission group.

mod group;
mod manager;

pub use group::PermissionGroup;
pub use manager::RosterManager;

use crate::error::{RosterError, RosterResult};
use serde::{Deserialize, Serialize};

/// Editable part of a player record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerDetails {
    /// External chat (QQ) identifier
    pub chat_id: Option<String>,
    pub email: Option<String>,
    pub permission_group: PermissionGroup,
    pub join_date: Option<String>,
    pub leave_date: Option<String>,
    pub leave_reason: Option<String>,
}

/// A full player record, keyed by game id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRecord {
    pub game_id: String,
    pub details: PlayerDetails,
}

/// Roster projection returned by listings (no leave reason)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub game_id: String,
    #[serde(rename = "qq")]
    pub chat_id: Option<String>,
    pub email: Option<String>,
    pub permission_group: PermissionGroup,
    pub join_date: Option<String>,
    pub leave_date: Option<String>,
}

/// Player fields as received; the group is still unchecked text
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayerDetailsRequest {
    #[serde(rename = "qq")]
    pub chat_id: Option<String>,
    pub email: Option<String>,
    pub permission_group: Option<String>,
    pub join_date: Option<String>,
    pub leave_date: Option<String>,
    pub leave_reason: Option<String>,
}

/// Add player request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddPlayerRequest {
    pub game_id: String,
    #[serde(flatten)]
    pub details: PlayerDetailsRequest,
}

/// Permission group change request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PermissionGroupRequest {
    pub permission_group: Option<String>,
}

/// Batch delete request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchDeleteRequest {
    pub game_ids: Vec<String>,
}

/// Search query string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub keyword: String,
}

/// Parse an optional group name; a missing group is as invalid as an unknown one
pub fn parse_group(group: Option<&str>) -> RosterResult<PermissionGroup> {
    group
        .ok_or_else(|| RosterError::InvalidGroup("missing permission group".to_string()))?
        .parse()
}

impl TryFrom<PlayerDetailsRequest> for PlayerDetails {
    type Error = RosterError;

    fn try_from(req: PlayerDetailsRequest) -> Result<Self, Self::Error> {
        let permission_group = parse_group(req.permission_group.as_deref())?;

        Ok(PlayerDetails {
            chat_id: req.chat_id,
            email: req.email,
            permission_group,
            join_date: req.join_date,
            leave_date: req.leave_date,
            leave_reason: req.leave_reason,
        })
    }
}

impl TryFrom<AddPlayerRequest> for PlayerRecord {
    type Error = RosterError;

    fn try_from(req: AddPlayerRequest) -> Result<Self, Self::Error> {
        let details = PlayerDetails::try_from(req.details)?;

        if req.game_id.trim().is_empty() {
            return Err(RosterError::Validation("Game ID is required".to_string()));
        }

        Ok(PlayerRecord {
            game_id: req.game_id,
            details,
        })
    }
}
