use std::collections::VecDeque;
use std::env;

use crate::api::{
    ALL_POSITIONS, BackendHealth, CompareResponse, PlayerRow, PlayerSide,
};
use crate::heatmap::{self, MAX_HEAT_EPSILON};

pub const DEFAULT_MIN90S: f64 = 5.0;
pub const MIN90S_STEP: f64 = 0.5;

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub league: String,
    pub position: String,
    pub min90s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthStatus {
    Unknown,
    Offline,
    Ok(BackendHealth),
}

/// The comparison currently on screen. Created fresh per successful request,
/// replaced wholesale, never mutated in place.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub league: String,
    pub pos: String,
    pub min90s: f64,
    pub player_a: PlayerSide,
    pub player_b: PlayerSide,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub filters: FilterState,
    pub leagues: Vec<String>,
    pub positions: Vec<String>,
    pub players: Vec<PlayerRow>,
    pub selected: usize,
    pub player_a: Option<String>,
    pub player_b: Option<String>,
    pub comparison: Option<Comparison>,
    pub max_heat: f64,
    pub loading: bool,
    pub error: Option<String>,
    pub health: HealthStatus,
    pub radar_axis: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            filters: FilterState {
                league: String::new(),
                position: ALL_POSITIONS.to_string(),
                min90s: initial_min90s(),
            },
            leagues: Vec::new(),
            positions: Vec::new(),
            players: Vec::new(),
            selected: 0,
            player_a: None,
            player_b: None,
            comparison: None,
            max_heat: MAX_HEAT_EPSILON,
            loading: false,
            error: None,
            health: HealthStatus::Unknown,
            radar_axis: 0,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn select_next(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.players.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Puts the player under the cursor into slot A and re-runs the
    /// comparison.
    pub fn assign_slot_a(&mut self) -> Vec<ProviderCommand> {
        let Some(row) = self.players.get(self.selected) else {
            return Vec::new();
        };
        self.player_a = Some(row.name.clone());
        self.compare_command().into_iter().collect()
    }

    pub fn assign_slot_b(&mut self) -> Vec<ProviderCommand> {
        let Some(row) = self.players.get(self.selected) else {
            return Vec::new();
        };
        self.player_b = Some(row.name.clone());
        self.compare_command().into_iter().collect()
    }

    pub fn rerun_compare(&mut self) -> Vec<ProviderCommand> {
        self.compare_command().into_iter().collect()
    }

    pub fn cycle_league(&mut self) -> Vec<ProviderCommand> {
        if self.leagues.len() < 2 {
            return Vec::new();
        }
        let current = self
            .leagues
            .iter()
            .position(|l| *l == self.filters.league)
            .unwrap_or(0);
        let next = (current + 1) % self.leagues.len();
        self.filters.league = self.leagues[next].clone();
        self.push_log(format!("[INFO] League: {}", self.filters.league));
        self.filter_changed()
    }

    pub fn cycle_position(&mut self) -> Vec<ProviderCommand> {
        if self.positions.is_empty() {
            return Vec::new();
        }
        let options = self.position_options();
        let current = options
            .iter()
            .position(|p| *p == self.filters.position)
            .unwrap_or(0);
        let next = (current + 1) % options.len();
        self.filters.position = options[next].clone();
        self.push_log(format!("[INFO] Position: {}", self.filters.position));
        self.filter_changed()
    }

    /// "ALL" sentinel first, then the backend's position list.
    pub fn position_options(&self) -> Vec<String> {
        let mut options = Vec::with_capacity(self.positions.len() + 1);
        options.push(ALL_POSITIONS.to_string());
        options.extend(self.positions.iter().cloned());
        options
    }

    /// Moves the minimum-nineties threshold by `step`, floored at zero.
    /// Negative values never reach the backend.
    pub fn adjust_min90s(&mut self, step: f64) -> Vec<ProviderCommand> {
        let next = (self.filters.min90s + step).max(0.0);
        if (next - self.filters.min90s).abs() < f64::EPSILON {
            return Vec::new();
        }
        self.filters.min90s = next;
        self.filter_changed()
    }

    pub fn cycle_radar_axis(&mut self) {
        let Some(comparison) = &self.comparison else {
            return;
        };
        let axes = comparison.player_a.radar.labels.len();
        if axes == 0 {
            return;
        }
        self.radar_axis = (self.radar_axis + 1) % axes;
    }

    /// Every filter mutation goes through the same full-reload path: the
    /// player list is refetched, which cascades into reselection and a fresh
    /// comparison.
    fn filter_changed(&mut self) -> Vec<ProviderCommand> {
        self.selected = 0;
        self.players_command().into_iter().collect()
    }

    fn players_command(&self) -> Option<ProviderCommand> {
        if self.filters.league.is_empty() {
            return None;
        }
        Some(ProviderCommand::FetchPlayers {
            league: self.filters.league.clone(),
            pos: self.filters.position.clone(),
            min90s: self.filters.min90s,
        })
    }

    /// Issues a comparison when league and both slots are filled; sets the
    /// loading flag alongside, cleared by exactly one of the two completion
    /// deltas.
    fn compare_command(&mut self) -> Option<ProviderCommand> {
        let (Some(player_a), Some(player_b)) = (&self.player_a, &self.player_b) else {
            return None;
        };
        if self.filters.league.is_empty() || player_a.is_empty() || player_b.is_empty() {
            return None;
        }
        self.loading = true;
        Some(ProviderCommand::FetchCompare {
            league: self.filters.league.clone(),
            player_a: player_a.clone(),
            player_b: player_b.clone(),
            pos: self.filters.position.clone(),
            min90s: self.filters.min90s,
        })
    }
}

fn initial_min90s() -> f64 {
    env::var("FUTSCOUT_MIN90S")
        .ok()
        .and_then(|val| val.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(DEFAULT_MIN90S)
}

/// Requests issued once at startup. Leagues and positions are independent;
/// neither waits for the other.
pub fn bootstrap_commands() -> Vec<ProviderCommand> {
    vec![
        ProviderCommand::FetchHealth,
        ProviderCommand::FetchLeagues,
        ProviderCommand::FetchPositions,
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    FetchHealth,
    FetchLeagues,
    FetchPositions,
    FetchPlayers {
        league: String,
        pos: String,
        min90s: f64,
    },
    FetchCompare {
        league: String,
        player_a: String,
        player_b: String,
        pos: String,
        min90s: f64,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetHealth(HealthStatus),
    SetLeagues(Vec<String>),
    SetPositions(Vec<String>),
    SetPlayers(Vec<PlayerRow>),
    PlayersFailed(String),
    SetComparison(CompareResponse),
    CompareFailed(String),
    Log(String),
}

/// Applies one provider delta and returns the follow-up requests the
/// controller must issue next.
pub fn apply_delta(state: &mut AppState, delta: Delta) -> Vec<ProviderCommand> {
    match delta {
        Delta::SetHealth(health) => {
            state.health = health;
            Vec::new()
        }
        Delta::SetLeagues(leagues) => {
            state.filters.league = leagues.first().cloned().unwrap_or_default();
            if leagues.is_empty() {
                state.push_log("[WARN] Backend returned no leagues");
            }
            state.leagues = leagues;
            state.selected = 0;
            state.players_command().into_iter().collect()
        }
        Delta::SetPositions(positions) => {
            state.positions = positions;
            Vec::new()
        }
        Delta::SetPlayers(players) => {
            state.players = players;
            state.selected = 0;
            state.error = None;
            state.player_a = state.players.first().map(|row| row.name.clone());
            state.player_b = state
                .players
                .get(1)
                .map(|row| row.name.clone())
                .or_else(|| state.player_a.clone());
            state.compare_command().into_iter().collect()
        }
        Delta::PlayersFailed(message) => {
            // Prior player list and comparison stay on screen.
            state.error = Some(message);
            Vec::new()
        }
        Delta::SetComparison(resp) => {
            state.loading = false;
            if let Some(message) = resp.domain_error() {
                state.error = Some(message.to_string());
                state.comparison = None;
                state.max_heat = MAX_HEAT_EPSILON;
                return Vec::new();
            }
            let (Some(player_a), Some(player_b)) = (resp.player_a, resp.player_b) else {
                state.error = Some("Comparison response was missing player data.".to_string());
                state.comparison = None;
                state.max_heat = MAX_HEAT_EPSILON;
                return Vec::new();
            };
            state.max_heat = heatmap::max_heat(&player_a.heatmap.matrix, &player_b.heatmap.matrix);
            let (pos, min90s) = resp
                .filters
                .map(|f| (f.pos, f.min90s))
                .unwrap_or_else(|| (state.filters.position.clone(), state.filters.min90s));
            state.comparison = Some(Comparison {
                league: resp.league,
                pos,
                min90s,
                player_a,
                player_b,
            });
            state.error = None;
            state.radar_axis = 0;
            Vec::new()
        }
        Delta::CompareFailed(message) => {
            state.loading = false;
            state.error = Some(message);
            Vec::new()
        }
        Delta::Log(line) => {
            state.push_log(line);
            Vec::new()
        }
    }
}
