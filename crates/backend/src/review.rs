//! Admin review desk: optimistic status transitions against the backend.
//!
//! A [`ReviewDesk`] owns a [`ReviewBoard`] loaded from the backend and a
//! reviewer's access token. [`ReviewDesk::transition`] applies a decision to
//! the board first, then commits it. When the commit fails the board is
//! resynchronised from a fresh read; only if that read fails too is the
//! single tentative change reverted.

use std::sync::Arc;

use playora_core::error::CoreError;
use playora_core::game::Game;
use playora_core::review::{ReviewBoard, Tentative};
use playora_core::status::ReviewDecision;

use crate::auth::SessionUser;
use crate::error::BackendError;
use crate::records::RecordStore;
use crate::Backend;

/// Result of [`ReviewDesk::open`].
#[derive(Debug)]
pub enum DeskOpen {
    /// The session is valid and the board is loaded.
    Ready(ReviewDesk),
    /// There is no valid session; the reviewer must sign in.
    RedirectToLogin,
}

/// Result of [`ReviewDesk::transition`].
#[derive(Debug)]
pub enum TransitionOutcome {
    /// The backend accepted the change; carries the stored record.
    Committed(Game),
    /// The backend refused or failed; the board no longer shows the change.
    RolledBack { error: BackendError },
}

pub struct ReviewDesk {
    records: Arc<dyn RecordStore>,
    access_token: String,
    reviewer: Option<SessionUser>,
    board: ReviewBoard,
}

impl std::fmt::Debug for ReviewDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewDesk")
            .field("reviewer", &self.reviewer)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

impl ReviewDesk {
    /// Check the session and load every record, concurrently.
    pub async fn open(
        backend: &Backend,
        access_token: Option<&str>,
    ) -> Result<DeskOpen, BackendError> {
        let Some(token) = access_token.filter(|t| !t.is_empty()) else {
            return Ok(DeskOpen::RedirectToLogin);
        };

        let (user, games) = tokio::join!(
            backend.auth.get_user(token),
            backend.records.list_all(token)
        );
        let Some(user) = user? else {
            return Ok(DeskOpen::RedirectToLogin);
        };

        Ok(DeskOpen::Ready(Self {
            records: backend.records.clone(),
            access_token: token.to_string(),
            reviewer: Some(user),
            board: ReviewBoard::new(games?),
        }))
    }

    /// Load every record for a session the caller has already verified.
    pub async fn load(
        records: Arc<dyn RecordStore>,
        access_token: &str,
    ) -> Result<Self, BackendError> {
        let games = records.list_all(access_token).await?;
        Ok(Self {
            records,
            access_token: access_token.to_string(),
            reviewer: None,
            board: ReviewBoard::new(games),
        })
    }

    /// Records on the board, newest first, including tentative changes.
    pub fn games(&self) -> &[Game] {
        self.board.games()
    }

    /// The session user, when the desk was opened with [`ReviewDesk::open`].
    pub fn reviewer(&self) -> Option<&SessionUser> {
        self.reviewer.as_ref()
    }

    pub fn into_games(self) -> Vec<Game> {
        self.board.games().to_vec()
    }

    /// Apply `decision` locally without contacting the backend.
    pub fn begin(&mut self, id: &str, decision: ReviewDecision) -> Result<Tentative, CoreError> {
        self.board.apply(id, decision)
    }

    /// Send a tentative change to the backend, reconciling the board if the
    /// backend does not accept it.
    pub async fn commit(&mut self, tentative: Tentative) -> TransitionOutcome {
        match self
            .records
            .update_status(&tentative.id, tentative.next, &self.access_token)
            .await
        {
            Ok(game) => {
                tracing::info!(
                    game_id = %game.id,
                    status = %game.status,
                    "Game status updated"
                );
                TransitionOutcome::Committed(game)
            }
            Err(error) => {
                tracing::warn!(
                    game_id = %tentative.id,
                    status = %tentative.next,
                    error = %error,
                    "Status update failed, resyncing review board"
                );
                match self.refresh().await {
                    Ok(()) => TransitionOutcome::RolledBack {
                        error: self.classify_refusal(&tentative.id, error),
                    },
                    Err(refetch) => {
                        tracing::warn!(
                            game_id = %tentative.id,
                            error = %refetch,
                            "Resync failed, reverting tentative change"
                        );
                        self.board.revert(&tentative);
                        TransitionOutcome::RolledBack { error }
                    }
                }
            }
        }
    }

    /// Apply `decision` to record `id` optimistically and commit it.
    ///
    /// Errors only when `id` is not on the board; backend failures are
    /// reported through [`TransitionOutcome::RolledBack`].
    pub async fn transition(
        &mut self,
        id: &str,
        decision: ReviewDecision,
    ) -> Result<TransitionOutcome, CoreError> {
        let tentative = self.begin(id, decision)?;
        Ok(self.commit(tentative).await)
    }

    /// An update that matched no row while the record is still readable was
    /// filtered out by the backend's row policies, not aimed at a missing id.
    fn classify_refusal(&self, id: &str, error: BackendError) -> BackendError {
        match error {
            BackendError::NotFound if self.board.get(id).is_some() => BackendError::Api {
                status: 403,
                message: format!("update of record {id} was not permitted"),
            },
            other => other,
        }
    }

    /// Replace the board with the backend's current records.
    pub async fn refresh(&mut self) -> Result<(), BackendError> {
        let games = self.records.list_all(&self.access_token).await?;
        self.board.resync(games);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use playora_core::category::Category;
    use playora_core::status::GameStatus;

    use super::*;
    use crate::auth::{AuthProvider, Credentials};
    use crate::memory::{InMemoryAuth, InMemoryBackend};

    const EMAIL: &str = "admin@example.com";
    const PASSWORD: &str = "correct horse";

    fn game(id: &str, status: GameStatus, age_mins: i64) -> Game {
        Game {
            id: id.to_string(),
            title: format!("Game {id}"),
            description: "A game.".into(),
            category: Category::Puzzle,
            thumbnail_url: None,
            game_url: format!("https://games.example.com/{id}"),
            developer_email: Some("dev@example.com".into()),
            status,
            created_at: Utc::now() - Duration::minutes(age_mins),
        }
    }

    async fn setup() -> (InMemoryBackend, String) {
        let memory = InMemoryBackend::new(InMemoryAuth::new().with_user(EMAIL, PASSWORD));
        memory
            .records
            .seed([
                game("x", GameStatus::Pending, 10),
                game("y", GameStatus::Approved, 5),
            ])
            .await;
        let session = memory
            .auth
            .sign_in(&Credentials {
                email: EMAIL.into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();
        (memory, session.access_token)
    }

    async fn ready(memory: &InMemoryBackend, token: &str) -> ReviewDesk {
        match ReviewDesk::open(&memory.backend(), Some(token)).await.unwrap() {
            DeskOpen::Ready(desk) => desk,
            DeskOpen::RedirectToLogin => panic!("expected an open desk"),
        }
    }

    #[tokio::test]
    async fn missing_session_redirects_to_login() {
        let (memory, _) = setup().await;
        let backend = memory.backend();

        assert_matches!(
            ReviewDesk::open(&backend, None).await,
            Ok(DeskOpen::RedirectToLogin)
        );
        assert_matches!(
            ReviewDesk::open(&backend, Some("stale-token")).await,
            Ok(DeskOpen::RedirectToLogin)
        );
    }

    #[tokio::test]
    async fn open_lists_every_status_newest_first() {
        let (memory, token) = setup().await;
        let desk = ready(&memory, &token).await;

        let ids: Vec<_> = desk.games().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["y", "x"]);
        assert_eq!(desk.reviewer().and_then(|u| u.email.as_deref()), Some(EMAIL));
    }

    #[tokio::test]
    async fn committed_transition_reaches_backend() {
        let (memory, token) = setup().await;
        let mut desk = ready(&memory, &token).await;

        let outcome = desk.transition("x", ReviewDecision::Approved).await.unwrap();
        assert_matches!(outcome, TransitionOutcome::Committed(g) if g.status == GameStatus::Approved);

        let stored = memory.records.snapshot().await;
        let x = stored.iter().find(|g| g.id == "x").unwrap();
        assert_eq!(x.status, GameStatus::Approved);
    }

    #[tokio::test]
    async fn begin_shows_change_before_commit() {
        let (memory, token) = setup().await;
        let mut desk = ready(&memory, &token).await;

        let tentative = desk.begin("x", ReviewDecision::Approved).unwrap();
        let x = desk.games().iter().find(|g| g.id == "x").unwrap();
        assert_eq!(x.status, GameStatus::Approved);
        assert_eq!(tentative.previous, GameStatus::Pending);
    }

    #[tokio::test]
    async fn failed_update_converges_to_backend_state() {
        let (memory, token) = setup().await;
        let mut desk = ready(&memory, &token).await;
        memory.records.set_fail_updates(true);

        let outcome = desk.transition("x", ReviewDecision::Approved).await.unwrap();
        assert_matches!(outcome, TransitionOutcome::RolledBack { .. });

        let x = desk.games().iter().find(|g| g.id == "x").unwrap();
        assert_eq!(x.status, GameStatus::Pending);
    }

    #[tokio::test]
    async fn failed_resync_reverts_the_single_change() {
        let (memory, token) = setup().await;
        let mut desk = ready(&memory, &token).await;
        memory.records.set_fail_updates(true);
        memory.records.set_fail_reads(true);

        let outcome = desk.transition("y", ReviewDecision::Rejected).await.unwrap();
        assert_matches!(outcome, TransitionOutcome::RolledBack { .. });

        let y = desk.games().iter().find(|g| g.id == "y").unwrap();
        assert_eq!(y.status, GameStatus::Approved);
    }

    #[tokio::test]
    async fn silently_refused_update_is_not_reported_missing() {
        let (memory, token) = setup().await;
        let mut desk = ready(&memory, &token).await;
        memory.records.set_deny_updates(true);

        let outcome = desk.transition("x", ReviewDecision::Approved).await.unwrap();
        assert_matches!(
            outcome,
            TransitionOutcome::RolledBack {
                error: BackendError::Api { status: 403, .. }
            }
        );

        let x = desk.games().iter().find(|g| g.id == "x").unwrap();
        assert_eq!(x.status, GameStatus::Pending);
    }

    #[tokio::test]
    async fn record_deleted_before_commit_stays_not_found() {
        let (memory, token) = setup().await;
        let mut desk = ready(&memory, &token).await;
        memory.records.remove("x").await;

        let outcome = desk.transition("x", ReviewDecision::Approved).await.unwrap();
        assert_matches!(
            outcome,
            TransitionOutcome::RolledBack {
                error: BackendError::NotFound
            }
        );
        assert!(desk.games().iter().all(|g| g.id != "x"));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (memory, token) = setup().await;
        let mut desk = ready(&memory, &token).await;

        assert_matches!(
            desk.transition("missing", ReviewDecision::Approved).await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn load_skips_session_check() {
        let (memory, token) = setup().await;
        let desk = ReviewDesk::load(memory.backend().records, &token)
            .await
            .unwrap();
        assert_eq!(desk.games().len(), 2);
        assert!(desk.reviewer().is_none());
    }
}
