/// Roster manager implementation using runtime queries
use crate::{
    db::player::PlayerRow,
    error::{RosterError, RosterResult},
    roster::{PermissionGroup, PlayerDetails, PlayerRecord, PlayerSummary},
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::BTreeSet;

/// Stays well under SQLite's bound-parameter limit
const BATCH_DELETE_CHUNK: usize = 500;

const SUMMARY_COLUMNS: &str = "game_id, qq, email, permission_group, join_date, leave_date";

/// Roster manager service
#[derive(Clone)]
pub struct RosterManager {
    db: SqlitePool,
}

impl RosterManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Add a player; a taken game id is a conflict
    pub async fn add(&self, record: &PlayerRecord) -> RosterResult<()> {
        let details = &record.details;

        // Dropping the transaction on error rolls the insert back
        let mut tx = self.db.begin().await?;

        sqlx::query(
            "INSERT INTO players (game_id, qq, email, permission_group, join_date, leave_date, leave_reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&record.game_id)
        .bind(&details.chat_id)
        .bind(&details.email)
        .bind(details.permission_group.as_str())
        .bind(&details.join_date)
        .bind(&details.leave_date)
        .bind(&details.leave_reason)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            RosterError::from_insert(e, format!("Game ID {} already exists", record.game_id))
        })?;

        tx.commit().await?;

        tracing::info!(
            "Added player {} as {}",
            record.game_id,
            details.permission_group
        );

        Ok(())
    }

    /// Whole roster
    pub async fn list(&self) -> RosterResult<Vec<PlayerSummary>> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {} FROM players ORDER BY game_id",
            SUMMARY_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        into_summaries(rows)
    }

    /// Overwrite every field except the game id; unknown ids are a no-op
    pub async fn edit(&self, game_id: &str, details: &PlayerDetails) -> RosterResult<()> {
        let result = sqlx::query(
            "UPDATE players
             SET qq = ?1, email = ?2, permission_group = ?3, join_date = ?4,
                 leave_date = ?5, leave_reason = ?6
             WHERE game_id = ?7",
        )
        .bind(&details.chat_id)
        .bind(&details.email)
        .bind(details.permission_group.as_str())
        .bind(&details.join_date)
        .bind(&details.leave_date)
        .bind(&details.leave_reason)
        .bind(game_id)
        .execute(&self.db)
        .await?;

        tracing::info!("Edited player {} ({} row(s))", game_id, result.rows_affected());

        Ok(())
    }

    /// Remove one player; unknown ids are a no-op
    pub async fn delete(&self, game_id: &str) -> RosterResult<()> {
        let result = sqlx::query("DELETE FROM players WHERE game_id = ?1")
            .bind(game_id)
            .execute(&self.db)
            .await?;

        tracing::info!("Deleted player {} ({} row(s))", game_id, result.rows_affected());

        Ok(())
    }

    /// Remove every listed player, returning how many rows went away
    pub async fn batch_delete(&self, game_ids: &[String]) -> RosterResult<u64> {
        let unique: Vec<&String> = game_ids.iter().collect::<BTreeSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return Ok(0);
        }

        let mut tx = self.db.begin().await?;
        let mut deleted = 0;

        for chunk in unique.chunks(BATCH_DELETE_CHUNK) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("DELETE FROM players WHERE game_id IN (");
            let mut separated = builder.separated(", ");
            for game_id in chunk {
                separated.push_bind((*game_id).clone());
            }
            separated.push_unseparated(")");

            deleted += builder.build().execute(&mut *tx).await?.rows_affected();
        }

        tx.commit().await?;

        tracing::info!(
            "Batch deleted {} of {} requested player(s)",
            deleted,
            unique.len()
        );

        Ok(deleted)
    }

    /// Literal substring search over game id, chat id and email
    pub async fn search(&self, keyword: &str) -> RosterResult<Vec<PlayerSummary>> {
        let pattern = format!("%{}%", escape_like(keyword));

        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            r"SELECT {} FROM players
              WHERE game_id LIKE ?1 ESCAPE '\'
                 OR qq LIKE ?1 ESCAPE '\'
                 OR email LIKE ?1 ESCAPE '\'
              ORDER BY game_id",
            SUMMARY_COLUMNS
        ))
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        tracing::debug!("Search for {:?} matched {} player(s)", keyword, rows.len());

        into_summaries(rows)
    }

    /// Players whose group is one of `groups`
    pub async fn list_by_groups(
        &self,
        groups: &[PermissionGroup],
    ) -> RosterResult<Vec<PlayerSummary>> {
        let unique: BTreeSet<PermissionGroup> = groups.iter().copied().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM players WHERE permission_group IN (",
            SUMMARY_COLUMNS
        ));
        let mut separated = builder.separated(", ");
        for group in &unique {
            separated.push_bind(group.as_str());
        }
        separated.push_unseparated(") ORDER BY game_id");

        let rows = builder
            .build_query_as::<PlayerRow>()
            .fetch_all(&self.db)
            .await?;

        into_summaries(rows)
    }

    /// Move a player to another group; unknown ids are a no-op
    pub async fn update_permission_group(
        &self,
        game_id: &str,
        group: PermissionGroup,
    ) -> RosterResult<()> {
        let result = sqlx::query("UPDATE players SET permission_group = ?1 WHERE game_id = ?2")
            .bind(group.as_str())
            .bind(game_id)
            .execute(&self.db)
            .await?;

        tracing::info!(
            "Moved player {} to {} ({} row(s))",
            game_id,
            group,
            result.rows_affected()
        );

        Ok(())
    }
}

fn into_summaries(rows: Vec<PlayerRow>) -> RosterResult<Vec<PlayerSummary>> {
    rows.into_iter().map(PlayerSummary::try_from).collect()
}

/// Escape LIKE wildcards so the keyword matches literally
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, Database};

    async fn create_test_manager() -> (RosterManager, SqlitePool) {
        let db = memory_pool(Database::Players).await;
        (RosterManager::new(db.clone()), db)
    }

    fn details(group: PermissionGroup) -> PlayerDetails {
        PlayerDetails {
            chat_id: None,
            email: None,
            permission_group: group,
            join_date: Some("2024-01-01".to_string()),
            leave_date: None,
            leave_reason: None,
        }
    }

    fn player(game_id: &str, chat_id: &str, email: &str, group: PermissionGroup) -> PlayerRecord {
        PlayerRecord {
            game_id: game_id.to_string(),
            details: PlayerDetails {
                chat_id: Some(chat_id.to_string()),
                email: Some(email.to_string()),
                ..details(group)
            },
        }
    }

    async fn count(db: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM players")
            .fetch_one(db)
            .await
            .unwrap()
    }

    fn ids(players: &[PlayerSummary]) -> Vec<&str> {
        players.iter().map(|p| p.game_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (manager, _db) = create_test_manager().await;

        manager
            .add(&player("Steve", "10001", "steve@example.com", PermissionGroup::Engineer))
            .await
            .unwrap();

        let players = manager.list().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].game_id, "Steve");
        assert_eq!(players[0].chat_id.as_deref(), Some("10001"));
        assert_eq!(players[0].permission_group, PermissionGroup::Engineer);
    }

    #[tokio::test]
    async fn test_add_duplicate_game_id() {
        let (manager, db) = create_test_manager().await;

        manager
            .add(&player("Steve", "10001", "steve@example.com", PermissionGroup::Player))
            .await
            .unwrap();

        let result = manager
            .add(&player("Steve", "99999", "other@example.com", PermissionGroup::Admin))
            .await;
        assert!(matches!(result, Err(RosterError::Conflict(_))));

        assert_eq!(count(&db).await, 1);
        let players = manager.list().await.unwrap();
        assert_eq!(players[0].permission_group, PermissionGroup::Player);
    }

    #[tokio::test]
    async fn test_edit_overwrites_all_fields() {
        let (manager, db) = create_test_manager().await;

        manager
            .add(&player("Steve", "10001", "steve@example.com", PermissionGroup::Player))
            .await
            .unwrap();

        let updated = PlayerDetails {
            chat_id: None,
            email: Some("new@example.com".to_string()),
            permission_group: PermissionGroup::SeniorEngineer,
            join_date: Some("2024-01-01".to_string()),
            leave_date: Some("2024-06-30".to_string()),
            leave_reason: Some("moved on".to_string()),
        };
        manager.edit("Steve", &updated).await.unwrap();

        let players = manager.list().await.unwrap();
        assert_eq!(players[0].chat_id, None);
        assert_eq!(players[0].email.as_deref(), Some("new@example.com"));
        assert_eq!(players[0].permission_group, PermissionGroup::SeniorEngineer);
        assert_eq!(players[0].leave_date.as_deref(), Some("2024-06-30"));

        let reason: Option<String> =
            sqlx::query_scalar("SELECT leave_reason FROM players WHERE game_id = 'Steve'")
                .fetch_one(&db)
                .await
                .unwrap();
        assert_eq!(reason.as_deref(), Some("moved on"));
    }

    #[tokio::test]
    async fn test_edit_unknown_player_is_noop() {
        let (manager, db) = create_test_manager().await;

        manager
            .edit("Nobody", &details(PermissionGroup::Admin))
            .await
            .unwrap();
        assert_eq!(count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let (manager, db) = create_test_manager().await;

        manager
            .add(&player("Steve", "10001", "steve@example.com", PermissionGroup::Player))
            .await
            .unwrap();

        manager.delete("Steve").await.unwrap();
        manager.delete("Steve").await.unwrap();
        assert_eq!(count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_batch_delete_counts_existing_only() {
        let (manager, _db) = create_test_manager().await;

        for id in ["A", "B", "C"] {
            manager
                .add(&player(id, "1", "x@example.com", PermissionGroup::Player))
                .await
                .unwrap();
        }

        let deleted = manager
            .batch_delete(&[
                "A".to_string(),
                "C".to_string(),
                "Missing".to_string(),
                "A".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(ids(&manager.list().await.unwrap()), vec!["B"]);
    }

    #[tokio::test]
    async fn test_batch_delete_empty() {
        let (manager, _db) = create_test_manager().await;
        assert_eq!(manager.batch_delete(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_batch_delete_spans_chunks() {
        let (manager, db) = create_test_manager().await;

        let game_ids: Vec<String> = (0..BATCH_DELETE_CHUNK + 20)
            .map(|i| format!("player-{:04}", i))
            .collect();
        for id in &game_ids {
            manager
                .add(&PlayerRecord {
                    game_id: id.clone(),
                    details: details(PermissionGroup::Player),
                })
                .await
                .unwrap();
        }

        let deleted = manager.batch_delete(&game_ids).await.unwrap();
        assert_eq!(deleted, game_ids.len() as u64);
        assert_eq!(count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_search_matches_any_contact_field() {
        let (manager, _db) = create_test_manager().await;

        manager
            .add(&player("alice_mc", "1", "a@example.com", PermissionGroup::Player))
            .await
            .unwrap();
        manager
            .add(&player("Bob", "alice-qq", "b@example.com", PermissionGroup::Player))
            .await
            .unwrap();
        manager
            .add(&player("Carol", "3", "alice@example.com", PermissionGroup::Engineer))
            .await
            .unwrap();
        manager
            .add(&player("Dave", "4", "dave@example.com", PermissionGroup::Admin))
            .await
            .unwrap();

        let found = manager.search("alice").await.unwrap();
        assert_eq!(ids(&found), vec!["Bob", "Carol", "alice_mc"]);
    }

    #[tokio::test]
    async fn test_search_is_literal() {
        let (manager, _db) = create_test_manager().await;

        manager
            .add(&player("100%legit", "1", "a@example.com", PermissionGroup::Player))
            .await
            .unwrap();
        manager
            .add(&player("plain", "2", "b@example.com", PermissionGroup::Player))
            .await
            .unwrap();

        assert_eq!(ids(&manager.search("%").await.unwrap()), vec!["100%legit"]);
        assert!(manager.search("_x").await.unwrap().is_empty());
        assert_eq!(manager.search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_search_ascii_case_insensitive() {
        let (manager, _db) = create_test_manager().await;

        manager
            .add(&player("Alice", "1", "a@example.com", PermissionGroup::Player))
            .await
            .unwrap();

        assert_eq!(ids(&manager.search("aLIce").await.unwrap()), vec!["Alice"]);
    }

    #[tokio::test]
    async fn test_list_by_groups() {
        let (manager, _db) = create_test_manager().await;

        for (id, group) in [
            ("p", PermissionGroup::Player),
            ("g", PermissionGroup::GraduateEngineer),
            ("e", PermissionGroup::Engineer),
            ("s", PermissionGroup::SeniorEngineer),
            ("a", PermissionGroup::Admin),
        ] {
            manager
                .add(&PlayerRecord {
                    game_id: id.to_string(),
                    details: details(group),
                })
                .await
                .unwrap();
        }

        let engineers = manager
            .list_by_groups(&PermissionGroup::ENGINEERS)
            .await
            .unwrap();
        assert_eq!(ids(&engineers), vec!["e", "g", "s"]);

        let admins = manager
            .list_by_groups(&[PermissionGroup::Admin, PermissionGroup::Admin])
            .await
            .unwrap();
        assert_eq!(ids(&admins), vec!["a"]);

        assert!(manager.list_by_groups(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_any_group_transition_is_allowed() {
        let (manager, _db) = create_test_manager().await;

        manager
            .add(&player("Steve", "1", "s@example.com", PermissionGroup::Admin))
            .await
            .unwrap();

        for group in [
            PermissionGroup::Player,
            PermissionGroup::SeniorEngineer,
            PermissionGroup::GraduateEngineer,
            PermissionGroup::Admin,
        ] {
            manager.update_permission_group("Steve", group).await.unwrap();
            assert_eq!(manager.list().await.unwrap()[0].permission_group, group);
        }

        // Unknown player
        manager
            .update_permission_group("Nobody", PermissionGroup::Player)
            .await
            .unwrap();
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("alice"), "alice");
        assert_eq!(escape_like("50%_off"), r"50\%\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
    }
}
