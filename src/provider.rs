use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::ApiClient;
use crate::state::{Delta, HealthStatus, ProviderCommand};

/// Runs the API client on a worker thread: commands in, deltas out. One
/// request in flight at a time; the UI thread never blocks on the network.
pub fn spawn_provider(api: ApiClient, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            if !handle_command(&api, &tx, cmd) {
                break;
            }
        }
    });
}

fn handle_command(api: &ApiClient, tx: &Sender<Delta>, cmd: ProviderCommand) -> bool {
    let deltas = match cmd {
        ProviderCommand::FetchHealth => match api.fetch_health() {
            Ok(Some(health)) => vec![Delta::SetHealth(HealthStatus::Ok(health))],
            Ok(None) => vec![Delta::SetHealth(HealthStatus::Offline)],
            Err(err) => vec![
                Delta::SetHealth(HealthStatus::Offline),
                Delta::Log(format!("[WARN] Health check failed: {err}")),
            ],
        },
        ProviderCommand::FetchLeagues => match api.fetch_leagues() {
            Ok(leagues) => vec![Delta::SetLeagues(leagues)],
            Err(err) => vec![Delta::Log(format!("[WARN] League list error: {err}"))],
        },
        ProviderCommand::FetchPositions => match api.fetch_positions() {
            Ok(positions) => vec![Delta::SetPositions(positions)],
            Err(err) => vec![Delta::Log(format!("[WARN] Position list error: {err}"))],
        },
        ProviderCommand::FetchPlayers {
            league,
            pos,
            min90s,
        } => match api.fetch_players(&league, &pos, min90s) {
            Ok(players) => vec![Delta::SetPlayers(players)],
            Err(err) => vec![
                Delta::PlayersFailed(api.connectivity_message()),
                Delta::Log(format!("[WARN] Player list error: {err}")),
            ],
        },
        ProviderCommand::FetchCompare {
            league,
            player_a,
            player_b,
            pos,
            min90s,
        } => match api.fetch_compare(&league, &player_a, &player_b, &pos, min90s) {
            Ok(resp) => vec![Delta::SetComparison(resp)],
            Err(err) => vec![
                Delta::CompareFailed(api.connectivity_message()),
                Delta::Log(format!("[WARN] Compare error: {err}")),
            ],
        },
    };

    for delta in deltas {
        if tx.send(delta).is_err() {
            return false;
        }
    }
    true
}
