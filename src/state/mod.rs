pub mod board;
pub mod checkpoint;
pub mod draft;
pub mod library;
pub mod pool;
pub mod roster;
pub mod rules;
pub mod season;
mod sse;
pub mod state_machine;
pub mod transitions;

#[cfg(test)]
pub(crate) mod fixtures;

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{
        models::{LeagueEntity, SeasonEntity},
        season_store::SeasonStore,
    },
    error::ServiceError,
};

pub use self::sse::SseHub;
pub use self::state_machine::{AbortError, ApplyError, Plan, PlanError, PlanId};
use self::{
    sse::SseState,
    state_machine::{SeasonEvent, SeasonState, SeasonStateMachine},
};

pub type SharedState = Arc<AppState>;
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Central application state: storage handle, configuration, SSE hubs and the
/// per-season and per-league gates serializing units of work.
pub struct AppState {
    season_store: RwLock<Option<Arc<dyn SeasonStore>>>,
    config: Arc<AppConfig>,
    sse: SseState,
    season_gates: DashMap<Uuid, Arc<Mutex<()>>>,
    league_gates: DashMap<Uuid, Arc<Mutex<()>>>,
    degraded: watch::Sender<bool>,
    operation_timeout: Option<Duration>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_timeout(config, Some(DEFAULT_OPERATION_TIMEOUT))
    }

    /// Same as [`AppState::new`] with an explicit bound on every unit of work.
    pub fn with_timeout(config: AppConfig, operation_timeout: Option<Duration>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            season_store: RwLock::new(None),
            config: Arc::new(config),
            sse: SseState::new(32),
            season_gates: DashMap::new(),
            league_gates: DashMap::new(),
            degraded: degraded_tx,
            operation_timeout,
        })
    }

    /// Obtain a handle to the current season store, if one is installed.
    pub async fn season_store(&self) -> Option<Arc<dyn SeasonStore>> {
        let guard = self.season_store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store or [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn SeasonStore>, ServiceError> {
        self.season_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new season store implementation and leave degraded mode.
    pub async fn install_season_store(&self, store: Arc<dyn SeasonStore>) {
        {
            let mut guard = self.season_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current season store and enter degraded mode.
    pub async fn clear_season_store(&self) {
        {
            let mut guard = self.season_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Loaded application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Broadcast hub of a season, created on first use.
    pub fn season_sse(&self, season_id: Uuid) -> Arc<SseHub> {
        self.sse.hub(season_id)
    }

    /// Hub of a season only if someone subscribed to it.
    pub fn existing_season_sse(&self, season_id: Uuid) -> Option<Arc<SseHub>> {
        self.sse.existing(season_id)
    }

    /// Every season hub created so far.
    pub fn season_hubs(&self) -> Vec<Arc<SseHub>> {
        self.sse.all()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }

    /// Load a season without taking its gate.
    pub async fn load_season(&self, season_id: Uuid) -> Result<SeasonEntity, ServiceError> {
        let store = self.require_store().await?;
        store
            .find_season(season_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("season `{season_id}` not found")))
    }

    /// Run `unit` while holding the gate of `id`, bounded by the operation
    /// timeout. The gate is dropped from `gates` once nobody else holds it.
    async fn gated<T>(
        &self,
        gates: &DashMap<Uuid, Arc<Mutex<()>>>,
        id: Uuid,
        unit: impl Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, ServiceError> {
        let gate = gates
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = gate.lock().await;
            match self.operation_timeout {
                Some(limit) => timeout(limit, unit).await.unwrap_or_else(|_| {
                    warn!(id = %id, "operation timed out");
                    Err(ServiceError::Timeout)
                }),
                None => unit.await,
            }
        };

        drop(gate);
        gates.remove_if(&id, |_, gate| Arc::strong_count(gate) == 1);
        result
    }

    /// Run one unit of work against a season.
    ///
    /// Holds the season's gate, loads the stored document, lets `work` mutate an
    /// owned copy and commits it with a compare-and-swap on `version`. When
    /// `work` fails nothing is written.
    pub async fn run_season_operation<F, T>(
        &self,
        season_id: Uuid,
        work: F,
    ) -> Result<(T, SeasonEntity), ServiceError>
    where
        F: FnOnce(&mut SeasonEntity) -> Result<T, ServiceError> + Send,
        T: Send,
    {
        let unit = async {
            let store = self.require_store().await?;
            let stored = store
                .find_season(season_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("season `{season_id}` not found")))?;

            let expected_version = stored.version;
            let mut season = stored;
            let value = work(&mut season)?;

            season.version = expected_version + 1;
            season.updated_at = SystemTime::now();
            store
                .replace_season(season.clone(), expected_version)
                .await?;
            debug!(
                season_id = %season_id,
                version = season.version,
                "season committed"
            );
            Ok::<_, ServiceError>((value, season))
        };

        self.gated(&self.season_gates, season_id, unit).await
    }

    /// Run one unit of work against a league, with the same gate and
    /// compare-and-swap rules as [`AppState::run_season_operation`].
    pub async fn run_league_operation<F, T>(
        &self,
        league_id: Uuid,
        work: F,
    ) -> Result<(T, LeagueEntity), ServiceError>
    where
        F: FnOnce(&mut LeagueEntity) -> Result<T, ServiceError> + Send,
        T: Send,
    {
        let unit = async {
            let store = self.require_store().await?;
            let mut league = store
                .find_league(league_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("league `{league_id}` not found")))?;

            let expected_version = league.version;
            let value = work(&mut league)?;

            league.version = expected_version + 1;
            league.updated_at = SystemTime::now();
            store
                .replace_league(league.clone(), expected_version)
                .await?;
            debug!(league_id = %league_id, version = league.version, "league committed");
            Ok::<_, ServiceError>((value, league))
        };

        self.gated(&self.league_gates, league_id, unit).await
    }

    #[cfg(test)]
    pub(crate) fn open_gates(&self) -> usize {
        self.season_gates.len() + self.league_gates.len()
    }

    /// Run a phase transition as one unit of work.
    ///
    /// The state machine is rebuilt from the stored season, the event is
    /// planned, `work` performs the transition's preconditions and side effects
    /// and the plan is applied only if `work` succeeds. Returns the new state.
    pub async fn run_transition<F, T>(
        &self,
        season_id: Uuid,
        event: SeasonEvent,
        work: F,
    ) -> Result<(T, SeasonState, SeasonEntity), ServiceError>
    where
        F: FnOnce(&mut SeasonEntity, &Plan) -> Result<T, ServiceError> + Send,
        T: Send,
    {
        let ((value, next), season) = self
            .run_season_operation(season_id, |season| {
                let current = SeasonState {
                    position: season.position(),
                    status: season.status,
                };
                let mut machine = SeasonStateMachine::resume(current, season.challenge_count);
                let plan = machine.plan(event)?;

                let value = match work(season, &plan) {
                    Ok(value) => value,
                    Err(err) => {
                        if let Err(abort_err) = machine.abort(plan.id) {
                            warn!(
                                event = ?event,
                                plan_id = %plan.id,
                                error = ?abort_err,
                                "failed to abort transition after work error"
                            );
                        }
                        return Err(err);
                    }
                };

                let next = machine.apply(plan.id)?;
                season.current_phase = next.position.phase;
                season.current_week = next.position.week;
                season.status = next.status;
                Ok((value, next))
            })
            .await?;

        Ok((value, next, season))
    }
}
