use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use futscout_terminal::api::parse_compare_json;
use futscout_terminal::heatmap::{Accent, max_heat, zone_style};

const COMPARE_JSON: &str = r#"{
  "league": "Premier League",
  "filters": {"pos": "ALL", "min90s": 5.0},
  "playerA": {
    "name": "Erling Haaland", "squad": "Manchester City", "pos": "FW",
    "age": 24, "minutes": 2610, "nineties": 29.0,
    "radar": {
      "labels": ["Goals/90","Assists/90","xG/90","xAG/90","Prog Passes/90","Prog Carries/90","Key Passes/90","SCA/90","Tkl+Int/90","Touches/90","Pass %"],
      "percentiles": [97.2, 64.0, 95.8, 71.3, 32.0, 41.5, 48.2, 66.0, 12.4, 28.9, 55.1],
      "values": [1.05, 0.21, 0.98, 0.29, 3.1, 1.8, 1.2, 3.4, 0.6, 38.2, 74.2],
      "overall": 56
    },
    "heatmap": {
      "matrix": [[0.08, 0.11], [0.31, 0.42], [0.61, 0.47]],
      "xLabels": ["Touches share", "Tackles share"],
      "yLabels": ["Def 3rd", "Mid 3rd", "Att 3rd"]
    }
  },
  "playerB": {
    "name": "Mohamed Salah", "squad": "Liverpool", "pos": "FW",
    "age": 32, "minutes": 2890, "nineties": 32.1,
    "radar": {
      "labels": ["Goals/90","Assists/90","xG/90","xAG/90","Prog Passes/90","Prog Carries/90","Key Passes/90","SCA/90","Tkl+Int/90","Touches/90","Pass %"],
      "percentiles": [88.4, 91.0, 84.2, 93.6, 61.0, 72.3, 81.8, 85.5, 22.7, 47.0, 58.8],
      "values": [0.87, 0.44, 0.81, 0.47, 4.4, 3.0, 2.3, 4.6, 0.9, 44.8, 78.9],
      "overall": 71
    },
    "heatmap": {
      "matrix": [[0.05, 0.09], [0.28, 0.35], [0.67, 0.56]],
      "xLabels": ["Touches share", "Tackles share"],
      "yLabels": ["Def 3rd", "Mid 3rd", "Att 3rd"]
    }
  }
}"#;

fn bench_compare_parse(c: &mut Criterion) {
    c.bench_function("compare_parse", |b| {
        b.iter(|| {
            let resp = parse_compare_json(black_box(COMPARE_JSON)).unwrap();
            black_box(resp.league);
        })
    });
}

fn bench_normalization_range(c: &mut Criterion) {
    let resp = parse_compare_json(COMPARE_JSON).unwrap();
    let a = resp.player_a.unwrap().heatmap.matrix;
    let b = resp.player_b.unwrap().heatmap.matrix;

    c.bench_function("normalization_range", |bench| {
        bench.iter(|| black_box(max_heat(black_box(&a), black_box(&b))))
    });
}

fn bench_zone_style(c: &mut Criterion) {
    c.bench_function("zone_style_sweep", |b| {
        b.iter(|| {
            for step in 0..=100 {
                let style = zone_style(step as f64 / 100.0, Accent::Blue);
                black_box(style.glow_opacity);
            }
        })
    });
}

criterion_group!(
    benches,
    bench_compare_parse,
    bench_normalization_range,
    bench_zone_style
);
criterion_main!(benches);
