/// Player roster database models
use crate::{
    error::RosterError,
    roster::{PermissionGroup, PlayerSummary},
};
use sqlx::FromRow;

/// Roster projection as stored; the group is still raw text
#[derive(Debug, Clone, FromRow)]
pub struct PlayerRow {
    pub game_id: String,
    pub qq: Option<String>,
    pub email: Option<String>,
    pub permission_group: String,
    pub join_date: Option<String>,
    pub leave_date: Option<String>,
}

impl TryFrom<PlayerRow> for PlayerSummary {
    type Error = RosterError;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        let permission_group: PermissionGroup = row.permission_group.parse()?;

        Ok(PlayerSummary {
            game_id: row.game_id,
            chat_id: row.qq,
            email: row.email,
            permission_group,
            join_date: row.join_date,
            leave_date: row.leave_date,
        })
    }
}
