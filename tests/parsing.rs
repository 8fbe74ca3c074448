use std::fs;
use std::path::PathBuf;

use futscout_terminal::api::{
    parse_compare_json, parse_health_json, parse_leagues_json, parse_players_json,
    parse_positions_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_leagues_fixture() {
    let raw = read_fixture("leagues.json");
    let leagues = parse_leagues_json(&raw).expect("fixture should parse");
    assert_eq!(leagues.len(), 4);
    assert_eq!(leagues[0], "Bundesliga");
}

#[test]
fn parses_positions_fixture() {
    let raw = read_fixture("positions.json");
    let positions = parse_positions_json(&raw).expect("fixture should parse");
    assert!(positions.contains(&"FW,MF".to_string()));
}

#[test]
fn parses_players_fixture_with_null_numerics() {
    let raw = read_fixture("players.json");
    let players = parse_players_json(&raw).expect("fixture should parse");
    assert_eq!(players.len(), 3);
    assert_eq!(players[0].name, "Bukayo Saka");
    assert_eq!(players[0].age, Some(23));

    let rice = &players[1];
    assert_eq!(rice.name, "Declan Rice");
    assert!(rice.age.is_none());
    assert!(rice.minutes.is_none());
    assert!(rice.nineties.is_none());
}

#[test]
fn parses_compare_fixture() {
    let raw = read_fixture("compare.json");
    let resp = parse_compare_json(&raw).expect("fixture should parse");
    assert!(resp.domain_error().is_none());
    assert_eq!(resp.league, "Premier League");

    let a = resp.player_a.expect("player A present");
    assert_eq!(a.name, "Erling Haaland");
    assert_eq!(a.radar.labels.len(), a.radar.percentiles.len());
    assert_eq!(a.radar.labels.len(), a.radar.values.len());
    assert_eq!(a.radar.overall, 68);
    assert_eq!(a.heatmap.matrix.len(), a.heatmap.y_labels.len());
    assert!(
        a.heatmap
            .matrix
            .iter()
            .all(|row| row.len() == a.heatmap.x_labels.len())
    );

    let b = resp.player_b.expect("player B present");
    assert_eq!(b.heatmap.matrix[1][1], 3.0);
}

#[test]
fn parses_compare_error_fixture() {
    let raw = read_fixture("compare_error.json");
    let resp = parse_compare_json(&raw).expect("fixture should parse");
    assert_eq!(
        resp.domain_error(),
        Some("Player not found in the filtered pool.")
    );
    assert!(resp.player_a.is_none());
    assert!(resp.player_b.is_none());
}

#[test]
fn blank_error_field_is_not_a_domain_error() {
    let resp = parse_compare_json(r#"{"error": "  "}"#).expect("should parse");
    assert!(resp.domain_error().is_none());
}

#[test]
fn null_bodies_are_empty() {
    assert!(parse_leagues_json("null").expect("null should parse").is_empty());
    assert!(parse_positions_json("").expect("empty should parse").is_empty());
    assert!(parse_players_json("null").expect("null should parse").is_empty());
    assert!(parse_health_json("null").expect("null should parse").is_none());

    let resp = parse_compare_json("").expect("empty should parse");
    assert!(resp.domain_error().is_some());
}

#[test]
fn parses_health_body() {
    let health = parse_health_json(r#"{"ok": true, "rows": 2854, "cols": 38}"#)
        .expect("should parse")
        .expect("body present");
    assert!(health.ok);
    assert_eq!(health.rows, 2854);
}
