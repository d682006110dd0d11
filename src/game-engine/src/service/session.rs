use std::time::Instant;

use common::{
    gateway::{DataGateway, HttpGateway, DEFAULT_API_URL},
    model::{
        game::{Choice, InvalidChoice},
        messages::NewRoundRecord,
    },
};
use history::{
    HistoryStore, KeyValueStore, MatchSummary, SqliteStore, Statistics, DEFAULT_CAPACITY,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    error::{GameError, Result},
    model::{
        format::{MatchFormat, DEFAULT_FORMAT},
        round::RoundOutcome,
    },
    service::{
        match_state::{Completion, MatchState, MatchStateMachine},
        resolver::Resolver,
    },
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub api_url: String,
    pub db_url: String,
    pub history_capacity: usize,
    pub format_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            api_url: DEFAULT_API_URL.to_owned(),
            db_url: "history.db".to_owned(),
            history_capacity: DEFAULT_CAPACITY,
            format_id: DEFAULT_FORMAT.to_owned(),
        }
    }
}

/// What one player pick produced.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RoundReport {
    pub outcome: RoundOutcome,
    pub state: MatchState,
    pub completion: Option<Completion>,
}

/// One player's game against the computer: plays rounds, keeps score and
/// records finished matches.
pub struct GameSession<G: DataGateway, S: KeyValueStore, R: Rng> {
    gateway: G,
    history: HistoryStore<S>,
    resolver: Resolver<R>,
    machine: MatchStateMachine,
    formats: Vec<MatchFormat>,
    catalog: Vec<Choice>,
    last_outcome: Option<RoundOutcome>,
    started_at: Option<Instant>,
}

pub type HttpSession = GameSession<HttpGateway, SqliteStore, ChaCha8Rng>;

impl HttpSession {
    pub fn connect(config: &SessionConfig) -> Result<Self> {
        let gateway = HttpGateway::new(config.api_url.clone())?;
        let store = SqliteStore::open(config.db_url.clone())?;
        let history = HistoryStore::open(store, config.history_capacity);
        let mut session = GameSession::new(gateway, history, Resolver::from_entropy());
        session.change_format(&config.format_id)?;
        Ok(session)
    }
}

impl<G: DataGateway, S: KeyValueStore, R: Rng> GameSession<G, S, R> {
    pub fn new(gateway: G, history: HistoryStore<S>, resolver: Resolver<R>) -> Self {
        GameSession {
            gateway,
            history,
            resolver,
            machine: MatchStateMachine::default(),
            formats: MatchFormat::catalog(),
            catalog: Vec::new(),
            last_outcome: None,
            started_at: None,
        }
    }

    /// Fetch the backend's choice catalog. Entries that do not name a known
    /// choice are skipped.
    pub async fn load_catalog(&mut self) -> Result<&[Choice]> {
        let entries = self.gateway.fetch_choices().await.map_err(|e| {
            error!("Failed to load choices: {}", e);
            e
        })?;
        let mut catalog = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.name.parse::<Choice>() {
                Ok(choice) if !catalog.contains(&choice) => catalog.push(choice),
                Ok(_) => {}
                Err(e) => warn!("Skipping catalog entry {}: {}", entry.id, e),
            }
        }
        debug!("Loaded choice catalog: {:?}", catalog);
        self.catalog = catalog;
        Ok(&self.catalog)
    }

    /// Play one round with the player's pick.
    ///
    /// The backend's classification of the pair is authoritative. Nothing about
    /// the match changes unless the round was both classified and stored.
    pub async fn select_choice(&mut self, input: &str) -> Result<RoundReport> {
        if self.machine.is_finished() {
            warn!("Ignoring pick {:?}: match already finished", input);
            return Err(GameError::MatchFinished);
        }
        let player = self.validate(input)?;
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }

        let local = self.resolver.resolve(player);
        let winner = self
            .gateway
            .classify_winner(player.id(), local.cpu_choice.id())
            .await
            .map_err(|e| {
                error!("Failed to classify round: {}", e);
                e
            })?;
        if winner != local.winner {
            warn!(
                "Backend says {} for {} vs {}, expected {}",
                winner, local.player_choice, local.cpu_choice, local.winner
            );
        }
        let outcome = RoundOutcome { winner, ..local };

        let record = NewRoundRecord {
            user_choice_id: outcome.player_choice.id(),
            cpu_choice_id: outcome.cpu_choice.id(),
            result_id: outcome.winner.id(),
        };
        let stored = self.gateway.submit_round(record).await.map_err(|e| {
            error!("Failed to store round: {}", e);
            e
        })?;
        if let Some(stored) = stored {
            debug!("Round stored as #{}", stored.id);
        }

        let completion = self.machine.record_round(&outcome)?;
        self.last_outcome = Some(outcome);
        if let Some(completion) = &completion {
            self.register(completion);
        }
        Ok(RoundReport {
            outcome,
            state: self.machine.state(),
            completion,
        })
    }

    fn validate(&self, input: &str) -> Result<Choice> {
        let choice = input.parse::<Choice>().map_err(|e| {
            warn!("Rejected pick: {}", e);
            e
        })?;
        if !self.catalog.is_empty() && !self.catalog.contains(&choice) {
            warn!("Rejected pick {}: not offered by the backend", choice);
            return Err(InvalidChoice(input.to_owned()).into());
        }
        Ok(choice)
    }

    fn register(&mut self, completion: &Completion) {
        let duration_seconds = self
            .started_at
            .take()
            .map(|started| started.elapsed().as_secs())
            .unwrap_or_default();
        let summary = MatchSummary::new(
            self.machine.format().name(),
            completion.winner,
            (completion.player_score, completion.cpu_score),
            completion.rounds_played,
            duration_seconds,
        );
        // The in-memory history stays authoritative when the write fails
        if let Err(e) = self.history.append(summary) {
            error!("Failed to persist match history: {}", e);
        }
    }

    pub fn change_format(&mut self, format_id: &str) -> Result<()> {
        let format = MatchFormat::find(&self.formats, format_id).ok_or_else(|| {
            warn!("Unknown match format {:?}", format_id);
            GameError::UnknownFormat(format_id.to_owned())
        })?;
        info!("Switching to {}", format.name());
        self.restart(format);
        Ok(())
    }

    /// Start a fresh match in the current format.
    pub fn reset(&mut self) {
        let format = self.machine.format().clone();
        self.restart(format);
    }

    fn restart(&mut self, format: MatchFormat) {
        self.machine.reset(format);
        self.last_outcome = None;
        self.started_at = Some(Instant::now());
    }

    pub fn state(&self) -> MatchState {
        self.machine.state()
    }

    pub fn machine(&self) -> &MatchStateMachine {
        &self.machine
    }

    pub fn format(&self) -> &MatchFormat {
        self.machine.format()
    }

    pub fn formats(&self) -> &[MatchFormat] {
        &self.formats
    }

    pub fn catalog(&self) -> &[Choice] {
        &self.catalog
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn statistics(&self) -> Statistics {
        self.history.statistics()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}
