//! Shared fixtures for service tests: an in-memory store, a league and helpers
//! that walk a season through its preseason.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{models::MemberRole, season_store::memory::MemorySeasonStore},
    dto::{
        board::{AddCategoryRequest, AddChallengeRequest},
        common::ArtistDto,
        draft::{DraftPickRequest, SelectAdvantageRequest},
        league::{AddMemberRequest, CreateLeagueRequest},
        season::{CreateSeasonRequest, JoinSeasonRequest},
        week::{SelectChallengeRequest, SubmitPlaylistRequest, VoteRequest},
    },
    services::{board_service, draft_service, league_service, season_service, week_service},
    state::{AppState, SharedState, roster::next_pick, state_machine::SeasonEvent},
};

pub(crate) struct TestLeague {
    pub state: SharedState,
    pub store: MemorySeasonStore,
    pub league_id: Uuid,
    pub commissioner: Uuid,
    pub spectator: Uuid,
    /// User ids of the league's players, in join order.
    pub players: Vec<Uuid>,
}

impl TestLeague {
    /// League with three players and one spectator.
    pub async fn new() -> Self {
        Self::with_players(3).await
    }

    pub async fn with_players(count: usize) -> Self {
        let state = AppState::new(AppConfig::default());
        let store = MemorySeasonStore::new();
        state.install_season_store(Arc::new(store.clone())).await;

        let commissioner = Uuid::new_v4();
        let league = league_service::create_league(
            &state,
            commissioner,
            CreateLeagueRequest {
                name: "Crate Diggers".into(),
                email: "boss@example.com".into(),
            },
        )
        .await
        .unwrap();

        let mut players = Vec::new();
        for index in 0..count {
            let user_id = Uuid::new_v4();
            league_service::add_member(
                &state,
                commissioner,
                league.id,
                AddMemberRequest {
                    user_id,
                    email: format!("player{index}@example.com"),
                    role: MemberRole::Player,
                },
            )
            .await
            .unwrap();
            players.push(user_id);
        }

        let spectator = Uuid::new_v4();
        league_service::add_member(
            &state,
            commissioner,
            league.id,
            AddMemberRequest {
                user_id: spectator,
                email: "fan@example.com".into(),
                role: MemberRole::Spectator,
            },
        )
        .await
        .unwrap();

        Self {
            state,
            store,
            league_id: league.id,
            commissioner,
            spectator,
            players,
        }
    }

    pub async fn season(
        &self,
        roster_size: u32,
        challenge_count: u32,
        chaos_week: Option<u32>,
    ) -> Uuid {
        season_service::create_season(
            &self.state,
            self.commissioner,
            self.league_id,
            CreateSeasonRequest {
                name: "Spring".into(),
                roster_size,
                challenge_count,
                chaos_week,
            },
        )
        .await
        .unwrap()
        .id
    }

    /// Season in setup joined by every league player.
    pub async fn season_with_players(&self, roster_size: u32, challenge_count: u32) -> Uuid {
        let season_id = self.season(roster_size, challenge_count, None).await;
        self.join_all(season_id).await;
        season_id
    }

    pub async fn join_all(&self, season_id: Uuid) {
        for (index, user_id) in self.players.iter().enumerate() {
            season_service::join_season(
                &self.state,
                *user_id,
                season_id,
                JoinSeasonRequest {
                    label_name: format!("Label {index}"),
                },
            )
            .await
            .unwrap();
        }
    }

    pub async fn fire(&self, season_id: Uuid, event: SeasonEvent) {
        season_service::transition(&self.state, self.commissioner, season_id, event)
            .await
            .unwrap();
    }

    /// User behind a season player id.
    pub async fn user_of(&self, season_id: Uuid, season_player_id: Uuid) -> Uuid {
        let season = self.state.load_season(season_id).await.unwrap();
        season.player(season_player_id).unwrap().user_id
    }

    /// Season player id of a user.
    pub async fn player_of(&self, season_id: Uuid, user_id: Uuid) -> Uuid {
        let season = self.state.load_season(season_id).await.unwrap();
        season.player_for_user(user_id).unwrap().id
    }

    /// Run the whole snake draft with generated artists.
    pub async fn run_draft(&self, season_id: Uuid) {
        let mut pick = 0;
        loop {
            let season = self.state.load_season(season_id).await.unwrap();
            let Some(next) = next_pick(&season) else {
                break;
            };
            let user_id = season.player(next.season_player_id).unwrap().user_id;
            pick += 1;
            draft_service::make_pick(
                &self.state,
                user_id,
                season_id,
                DraftPickRequest {
                    artist: ArtistDto {
                        id: format!("artist-{pick}"),
                        name: format!("Artist {pick}"),
                    },
                },
            )
            .await
            .unwrap();
        }
    }

    /// Put fifteen canonical challenges on the board.
    pub async fn fill_board(&self, season_id: Uuid) {
        let library = self.state.config().library().clone();
        for category in library.categories().iter().take(3) {
            let board = board_service::add_category(
                &self.state,
                self.commissioner,
                season_id,
                AddCategoryRequest {
                    name: category.name.clone(),
                },
            )
            .await
            .unwrap();
            let category_id = board
                .categories
                .iter()
                .find(|column| column.title == category.name)
                .unwrap()
                .id;
            for challenge in &category.challenges {
                board_service::add_challenge(
                    &self.state,
                    self.commissioner,
                    season_id,
                    category_id,
                    AddChallengeRequest {
                        canonical_challenge_id: challenge.id.clone(),
                    },
                )
                .await
                .unwrap();
            }
        }
    }

    /// Walk a fresh season through the preseason into week 1 challenge selection.
    pub async fn season_in_week_one(
        &self,
        roster_size: u32,
        challenge_count: u32,
        chaos_week: Option<u32>,
    ) -> Uuid {
        let season_id = self.season(roster_size, challenge_count, chaos_week).await;
        self.join_all(season_id).await;
        self.fire(season_id, SeasonEvent::StartDraft).await;
        self.run_draft(season_id).await;
        self.fire(season_id, SeasonEvent::CompleteDraft).await;
        for user_id in &self.players {
            draft_service::select_starting_advantage(
                &self.state,
                *user_id,
                season_id,
                SelectAdvantageRequest {
                    kind: "Veto".into(),
                },
            )
            .await
            .unwrap();
        }
        self.fire(season_id, SeasonEvent::CompleteAdvantageSelection)
            .await;
        self.fill_board(season_id).await;
        self.fire(season_id, SeasonEvent::StartSeason).await;
        season_id
    }

    /// Play the current week from challenge selection to the week end. Every
    /// player votes for the next label in join order.
    pub async fn play_week(&self, season_id: Uuid) {
        let season = self.state.load_season(season_id).await.unwrap();
        let challenge_id = season
            .board
            .as_ref()
            .unwrap()
            .challenges
            .iter()
            .find(|challenge| challenge.selected_week.is_none())
            .unwrap()
            .id;
        week_service::select_challenge(
            &self.state,
            self.commissioner,
            season_id,
            SelectChallengeRequest {
                board_challenge_id: challenge_id,
            },
        )
        .await
        .unwrap();
        self.fire(season_id, SeasonEvent::OpenSubmissions).await;

        for user_id in &self.players {
            week_service::submit_playlist(
                &self.state,
                *user_id,
                season_id,
                SubmitPlaylistRequest {
                    tracks: vec![format!("track-{user_id}")],
                },
            )
            .await
            .unwrap();
        }
        self.fire(season_id, SeasonEvent::StartPresentation).await;
        for _ in &self.players {
            week_service::next_presenter(&self.state, self.commissioner, season_id)
                .await
                .unwrap();
        }
        self.fire(season_id, SeasonEvent::OpenVoting).await;

        for (index, user_id) in self.players.iter().enumerate() {
            let target_user = self.players[(index + 1) % self.players.len()];
            let target = self.player_of(season_id, target_user).await;
            week_service::cast_vote(
                &self.state,
                *user_id,
                season_id,
                VoteRequest {
                    target_player_id: target,
                },
            )
            .await
            .unwrap();
        }
        self.fire(season_id, SeasonEvent::CloseVoting).await;
    }
}
