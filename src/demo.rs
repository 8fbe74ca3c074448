use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::Duration;

use rand::Rng;

use crate::api::{
    ALL_POSITIONS, BackendHealth, CompareFilters, CompareResponse, HeatmapData, PlayerRow,
    PlayerSide, RadarData,
};
use crate::state::{Delta, HealthStatus, ProviderCommand};

/// Offline stand-in for the FutScout backend, selected with `FUTSCOUT_DEMO`.
/// Serves a seeded player pool and synthesizes comparison responses with the
/// same wire shapes and error messages as the real API.
pub fn demo_enabled() -> bool {
    env::var("FUTSCOUT_DEMO")
        .map(|val| {
            let val = val.trim().to_lowercase();
            val == "1" || val == "true" || val == "yes"
        })
        .unwrap_or(false)
}

const RADAR_LABELS: [&str; 11] = [
    "Goals/90",
    "Assists/90",
    "xG/90",
    "xAG/90",
    "Prog Passes/90",
    "Prog Carries/90",
    "Key Passes/90",
    "SCA/90",
    "Tkl+Int/90",
    "Touches/90",
    "Pass %",
];

const HEATMAP_X_LABELS: [&str; 2] = ["Touches share", "Tackles share"];
const HEATMAP_Y_LABELS: [&str; 3] = ["Def 3rd", "Mid 3rd", "Att 3rd"];

struct SeedPlayer {
    league: &'static str,
    name: &'static str,
    squad: &'static str,
    pos: &'static str,
    age: i64,
    minutes: i64,
}

const SEED_POOL: [SeedPlayer; 18] = [
    SeedPlayer { league: "Premier League", name: "Erling Haaland", squad: "Manchester City", pos: "FW", age: 24, minutes: 2610 },
    SeedPlayer { league: "Premier League", name: "Mohamed Salah", squad: "Liverpool", pos: "FW", age: 32, minutes: 2890 },
    SeedPlayer { league: "Premier League", name: "Bukayo Saka", squad: "Arsenal", pos: "FW,MF", age: 23, minutes: 2470 },
    SeedPlayer { league: "Premier League", name: "Declan Rice", squad: "Arsenal", pos: "MF", age: 26, minutes: 3010 },
    SeedPlayer { league: "Premier League", name: "Bruno Fernandes", squad: "Manchester Utd", pos: "MF", age: 30, minutes: 3120 },
    SeedPlayer { league: "Premier League", name: "William Saliba", squad: "Arsenal", pos: "DF", age: 24, minutes: 3240 },
    SeedPlayer { league: "Premier League", name: "Virgil van Dijk", squad: "Liverpool", pos: "DF", age: 33, minutes: 3150 },
    SeedPlayer { league: "Premier League", name: "Jordan Pickford", squad: "Everton", pos: "GK", age: 31, minutes: 3420 },
    SeedPlayer { league: "La Liga", name: "Lamine Yamal", squad: "Barcelona", pos: "FW", age: 18, minutes: 2380 },
    SeedPlayer { league: "La Liga", name: "Kylian Mbappe", squad: "Real Madrid", pos: "FW", age: 26, minutes: 2750 },
    SeedPlayer { league: "La Liga", name: "Jude Bellingham", squad: "Real Madrid", pos: "MF", age: 22, minutes: 2540 },
    SeedPlayer { league: "La Liga", name: "Pedri", squad: "Barcelona", pos: "MF", age: 22, minutes: 2310 },
    SeedPlayer { league: "La Liga", name: "Antonio Rudiger", squad: "Real Madrid", pos: "DF", age: 32, minutes: 2980 },
    SeedPlayer { league: "Bundesliga", name: "Harry Kane", squad: "Bayern Munich", pos: "FW", age: 31, minutes: 2820 },
    SeedPlayer { league: "Bundesliga", name: "Florian Wirtz", squad: "Leverkusen", pos: "MF,FW", age: 22, minutes: 2660 },
    SeedPlayer { league: "Bundesliga", name: "Xavi Simons", squad: "RB Leipzig", pos: "MF", age: 22, minutes: 2490 },
    SeedPlayer { league: "Bundesliga", name: "Nico Schlotterbeck", squad: "Dortmund", pos: "DF", age: 25, minutes: 2870 },
    SeedPlayer { league: "Bundesliga", name: "Gregor Kobel", squad: "Dortmund", pos: "GK", age: 27, minutes: 3330 },
];

pub fn spawn_demo_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        while let Ok(cmd) = cmd_rx.recv() {
            // Small pause so the loading states are visible, like a fast
            // local backend.
            thread::sleep(Duration::from_millis(120));
            let deltas = answer(cmd, &mut rng);
            for delta in deltas {
                if tx.send(delta).is_err() {
                    return;
                }
            }
        }
    });
}

fn answer(cmd: ProviderCommand, rng: &mut impl Rng) -> Vec<Delta> {
    match cmd {
        ProviderCommand::FetchHealth => vec![
            Delta::SetHealth(HealthStatus::Ok(BackendHealth {
                ok: true,
                rows: SEED_POOL.len() as u64,
                cols: 38,
            })),
            Delta::Log("[INFO] Demo provider active (no backend)".to_string()),
        ],
        ProviderCommand::FetchLeagues => vec![Delta::SetLeagues(leagues())],
        ProviderCommand::FetchPositions => vec![Delta::SetPositions(positions())],
        ProviderCommand::FetchPlayers {
            league,
            pos,
            min90s,
        } => vec![Delta::SetPlayers(players(&league, &pos, min90s))],
        ProviderCommand::FetchCompare {
            league,
            player_a,
            player_b,
            pos,
            min90s,
        } => vec![Delta::SetComparison(compare(
            &league, &player_a, &player_b, &pos, min90s, rng,
        ))],
    }
}

fn leagues() -> Vec<String> {
    let mut leagues: Vec<String> = SEED_POOL.iter().map(|p| p.league.to_string()).collect();
    leagues.sort();
    leagues.dedup();
    leagues
}

fn positions() -> Vec<String> {
    let mut positions: Vec<String> = SEED_POOL.iter().map(|p| p.pos.to_string()).collect();
    positions.sort();
    positions.dedup();
    positions
}

fn in_pool(player: &SeedPlayer, league: &str, pos: &str, min90s: f64) -> bool {
    if player.league != league {
        return false;
    }
    if nineties(player) < min90s {
        return false;
    }
    pos == ALL_POSITIONS || player.pos == pos
}

fn nineties(player: &SeedPlayer) -> f64 {
    (player.minutes as f64 / 90.0 * 10.0).round() / 10.0
}

fn players(league: &str, pos: &str, min90s: f64) -> Vec<PlayerRow> {
    let mut rows: Vec<PlayerRow> = SEED_POOL
        .iter()
        .filter(|p| in_pool(p, league, pos, min90s))
        .map(|p| PlayerRow {
            name: p.name.to_string(),
            squad: p.squad.to_string(),
            pos: p.pos.to_string(),
            age: Some(p.age),
            minutes: Some(p.minutes),
            nineties: Some(nineties(p)),
        })
        .collect();
    rows.sort_by(|a, b| (&a.squad, &a.name).cmp(&(&b.squad, &b.name)));
    rows
}

fn compare(
    league: &str,
    player_a: &str,
    player_b: &str,
    pos: &str,
    min90s: f64,
    rng: &mut impl Rng,
) -> CompareResponse {
    let pool: Vec<&SeedPlayer> = SEED_POOL
        .iter()
        .filter(|p| in_pool(p, league, pos, min90s))
        .collect();

    if pool.is_empty() {
        return error_response("No players match the filters.");
    }
    let Some(a) = pool.iter().find(|p| p.name == player_a) else {
        return error_response("Player not found in the filtered pool.");
    };
    let Some(b) = pool.iter().find(|p| p.name == player_b) else {
        return error_response("Player not found in the filtered pool.");
    };

    CompareResponse {
        error: None,
        league: league.to_string(),
        filters: Some(CompareFilters {
            pos: pos.to_string(),
            min90s,
        }),
        player_a: Some(player_side(a, rng)),
        player_b: Some(player_side(b, rng)),
    }
}

fn error_response(message: &str) -> CompareResponse {
    CompareResponse {
        error: Some(message.to_string()),
        league: String::new(),
        filters: None,
        player_a: None,
        player_b: None,
    }
}

fn player_side(player: &SeedPlayer, rng: &mut impl Rng) -> PlayerSide {
    let radar = build_radar(player, rng);
    let heatmap = build_heatmap(player, rng);
    PlayerSide {
        name: player.name.to_string(),
        squad: player.squad.to_string(),
        pos: player.pos.to_string(),
        age: Some(player.age),
        minutes: Some(player.minutes),
        nineties: Some(nineties(player)),
        radar,
        heatmap,
    }
}

fn build_radar(player: &SeedPlayer, rng: &mut impl Rng) -> RadarData {
    let mut percentiles = Vec::with_capacity(RADAR_LABELS.len());
    let mut values = Vec::with_capacity(RADAR_LABELS.len());

    for label in RADAR_LABELS {
        let base = 5.0 + (hash(player.name, label) % 90) as f64;
        let pct = (base + rng.gen_range(-4.0..4.0)).clamp(0.0, 100.0);
        percentiles.push((pct * 10.0).round() / 10.0);
        values.push(display_value(label, pct));
    }

    let overall = (percentiles.iter().sum::<f64>() / percentiles.len() as f64).round() as i64;
    RadarData {
        labels: RADAR_LABELS.iter().map(|l| l.to_string()).collect(),
        percentiles,
        values,
        overall,
    }
}

fn display_value(label: &str, pct: f64) -> f64 {
    // Rough per-90 magnitudes so the raw column reads plausibly.
    let value = match label {
        "Pass %" => 60.0 + pct * 0.35,
        "Touches/90" => 25.0 + pct * 0.6,
        "SCA/90" => pct / 18.0,
        "Tkl+Int/90" => pct / 22.0,
        _ => pct / 60.0,
    };
    (value * 100.0).round() / 100.0
}

fn build_heatmap(player: &SeedPlayer, rng: &mut impl Rng) -> HeatmapData {
    // Row weights by broad role: attackers live in the final third,
    // defenders in their own.
    let thirds = if player.pos.contains("FW") {
        [0.12, 0.33, 0.55]
    } else if player.pos.contains("MF") {
        [0.22, 0.48, 0.30]
    } else if player.pos.contains("DF") {
        [0.52, 0.34, 0.14]
    } else {
        [0.80, 0.16, 0.04]
    };

    let touches = jittered_shares(&thirds, player.name, "touch", rng);
    let tackles = jittered_shares(&thirds, player.name, "tackle", rng);
    let matrix = (0..3).map(|row| vec![touches[row], tackles[row]]).collect();

    HeatmapData {
        matrix,
        x_labels: HEATMAP_X_LABELS.iter().map(|l| l.to_string()).collect(),
        y_labels: HEATMAP_Y_LABELS.iter().map(|l| l.to_string()).collect(),
    }
}

fn jittered_shares(base: &[f64; 3], name: &str, salt: &str, rng: &mut impl Rng) -> [f64; 3] {
    let mut shares = [0.0; 3];
    for (i, weight) in base.iter().enumerate() {
        let wobble = ((hash(name, salt) >> (i * 8)) % 13) as f64 / 100.0;
        shares[i] = (weight + wobble + rng.gen_range(-0.02..0.02)).max(0.01);
    }
    let total: f64 = shares.iter().sum();
    for share in &mut shares {
        *share = (*share / total * 1000.0).round() / 1000.0;
    }
    shares
}

fn hash(name: &str, salt: &str) -> u64 {
    name.bytes()
        .chain(salt.bytes())
        .fold(0_u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_player_gets_backend_error_shape() {
        let mut rng = rand::thread_rng();
        let resp = compare("Premier League", "Nobody", "Erling Haaland", ALL_POSITIONS, 5.0, &mut rng);
        assert_eq!(resp.domain_error(), Some("Player not found in the filtered pool."));
    }

    #[test]
    fn impossible_filter_reports_empty_pool() {
        let mut rng = rand::thread_rng();
        let resp = compare("Premier League", "Erling Haaland", "Mohamed Salah", "GK", 50.0, &mut rng);
        assert_eq!(resp.domain_error(), Some("No players match the filters."));
    }

    #[test]
    fn comparison_matrices_are_three_by_two() {
        let mut rng = rand::thread_rng();
        let resp = compare(
            "Premier League",
            "Erling Haaland",
            "Mohamed Salah",
            ALL_POSITIONS,
            5.0,
            &mut rng,
        );
        let side = resp.player_a.expect("player side present");
        assert_eq!(side.heatmap.matrix.len(), 3);
        assert!(side.heatmap.matrix.iter().all(|row| row.len() == 2));
        assert_eq!(side.radar.labels.len(), side.radar.percentiles.len());
        assert_eq!(side.radar.labels.len(), side.radar.values.len());
    }
}
