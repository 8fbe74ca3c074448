use futscout_terminal::heatmap::{
    Accent, MAX_HEAT_EPSILON, cell_style, clamp01, max_heat, pct, zone_style,
};
use futscout_terminal::radar::{RadarGeometry, RadarSeries, tooltip_label};

#[test]
fn clamp_covers_the_whole_domain() {
    assert_eq!(clamp01(-3.0), 0.0);
    assert_eq!(clamp01(0.0), 0.0);
    assert_eq!(clamp01(0.5), 0.5);
    assert_eq!(clamp01(1.0), 1.0);
    assert_eq!(clamp01(42.0), 1.0);
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(f64::NEG_INFINITY), 0.0);
    assert_eq!(clamp01(f64::INFINITY), 1.0);
}

#[test]
fn zone_style_is_monotone_in_intensity() {
    let mut prev = zone_style(0.0, Accent::Blue);
    for step in 1..=100 {
        let style = zone_style(step as f64 / 100.0, Accent::Blue);
        assert!(style.width_pct >= prev.width_pct);
        assert!(style.core_opacity >= prev.core_opacity);
        assert!(style.fade_opacity >= prev.fade_opacity);
        assert!(style.blur_px >= prev.blur_px);
        assert!(style.glow_radius >= prev.glow_radius);
        assert!(style.glow_opacity >= prev.glow_opacity);
        prev = style;
    }
}

#[test]
fn pct_rounds_to_whole_percent() {
    assert_eq!(pct(0.0), "0%");
    assert_eq!(pct(1.0), "100%");
    assert_eq!(pct(0.5), "50%");
    assert_eq!(pct(0.505), "51%");
    assert_eq!(pct(-2.0), "0%");
    assert_eq!(pct(f64::NAN), "0%");
}

#[test]
fn normalization_range_is_shared_max() {
    let a = vec![vec![0.0, 2.0], vec![4.0, 0.0]];
    let b = vec![vec![1.0, 0.0], vec![0.0, 3.0]];
    assert_eq!(max_heat(&a, &b), 4.0);

    let cell = cell_style(2.0, 4.0, Accent::Red);
    assert!((cell.opacity - 0.525).abs() < 1e-9);
}

#[test]
fn normalization_range_never_hits_zero() {
    let zeros = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
    let range = max_heat(&zeros, &zeros);
    assert_eq!(range, MAX_HEAT_EPSILON);

    // Cells normalize cleanly even against the epsilon floor.
    let cell = cell_style(0.0, range, Accent::Blue);
    assert!((cell.opacity - 0.15).abs() < 1e-9);
}

#[test]
fn cell_opacity_spans_fifteen_to_ninety() {
    let low = cell_style(0.0, 4.0, Accent::Blue);
    let high = cell_style(4.0, 4.0, Accent::Blue);
    let over = cell_style(9.0, 4.0, Accent::Blue);
    assert!((low.opacity - 0.15).abs() < 1e-9);
    assert!((high.opacity - 0.90).abs() < 1e-9);
    assert!((over.opacity - 0.90).abs() < 1e-9);
}

#[test]
fn nan_cells_style_as_cold() {
    let cell = cell_style(f64::NAN, 4.0, Accent::Red);
    assert!((cell.opacity - 0.15).abs() < 1e-9);
}

#[test]
fn radar_skips_rendering_without_labels() {
    let a = RadarSeries::new("X", vec![50.0], Accent::Blue);
    let b = RadarSeries::new("Y", vec![50.0], Accent::Red);
    assert!(RadarGeometry::build(&[], a, b).is_none());
}

#[test]
fn radar_truncates_overlong_series() {
    let labels: Vec<String> = ["one", "two"].iter().map(|s| s.to_string()).collect();
    let a = RadarSeries::new("X", vec![10.0, 20.0, 30.0, 40.0], Accent::Blue);
    let b = RadarSeries::new("Y", vec![15.0, 25.0], Accent::Red);
    let geometry = RadarGeometry::build(&labels, a, b).expect("labels present");
    assert_eq!(geometry.series[0].values.len(), 2);
    assert_eq!(geometry.polygon(0).len(), 2);
}

#[test]
fn tooltip_reads_like_the_chart_hover() {
    assert_eq!(tooltip_label("Mohamed Salah", 88.0), "Mohamed Salah: 88 percentile");
}
