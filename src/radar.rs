use std::f64::consts::PI;

use ratatui::layout::Rect;
use ratatui::prelude::*;
use ratatui::style::{Color, Style};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders};

use crate::heatmap::Accent;

pub const RADAR_MAX: f64 = 100.0;
pub const RADAR_STEP: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RadarSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub accent: Accent,
}

impl RadarSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>, accent: Accent) -> Self {
        Self {
            name: name.into(),
            values,
            accent,
        }
    }
}

/// Fully built plot geometry for a two-series radar. Rebuilt from scratch on
/// every input change; there is no incremental update path.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarGeometry {
    pub labels: Vec<String>,
    pub series: [RadarSeries; 2],
}

impl RadarGeometry {
    /// Returns `None` when the label list is empty: nothing is drawn and no
    /// plot instance survives. Each series is truncated to the label count,
    /// short series are padded with zeros.
    pub fn build(labels: &[String], a: RadarSeries, b: RadarSeries) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        Some(Self {
            labels: labels.to_vec(),
            series: [fit_series(a, labels.len()), fit_series(b, labels.len())],
        })
    }

    pub fn axis_count(&self) -> usize {
        self.labels.len()
    }

    /// Angle of axis `i`, clockwise from twelve o'clock in y-up coordinates.
    pub fn axis_angle(&self, i: usize) -> f64 {
        PI / 2.0 - 2.0 * PI * (i as f64) / (self.axis_count() as f64)
    }

    /// Polygon vertices for one series on the unit disc, one per axis.
    pub fn polygon(&self, series_idx: usize) -> Vec<(f64, f64)> {
        let series = &self.series[series_idx];
        series
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let radius = (value / RADAR_MAX).clamp(0.0, 1.0);
                let angle = self.axis_angle(i);
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect()
    }
}

fn fit_series(mut series: RadarSeries, len: usize) -> RadarSeries {
    series.values.truncate(len);
    series.values.resize(len, 0.0);
    series
}

/// Detail-line formatting for an inspected axis value.
pub fn tooltip_label(series_name: &str, value: f64) -> String {
    format!("{series_name}: {} percentile", format_value(value))
}

fn format_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// Draws the radar on a canvas: grid rings every 20 up to 100, one spoke per
/// axis, then both series polygons in their accent colors.
pub fn render(geometry: &RadarGeometry, frame: &mut Frame, area: Rect) {
    let block = Block::default().title("Radar").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width < 4 || inner.height < 4 {
        return;
    }

    let canvas = Canvas::default()
        .x_bounds([-1.45, 1.45])
        .y_bounds([-1.45, 1.45])
        .paint(|ctx| {
            let rings = (RADAR_MAX / RADAR_STEP) as usize;
            for step in 1..=rings {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: step as f64 / rings as f64,
                    color: Color::DarkGray,
                });
            }

            for i in 0..geometry.axis_count() {
                let angle = geometry.axis_angle(i);
                ctx.draw(&CanvasLine {
                    x1: 0.0,
                    y1: 0.0,
                    x2: angle.cos(),
                    y2: angle.sin(),
                    color: Color::DarkGray,
                });
            }

            for idx in [0, 1] {
                let accent = geometry.series[idx].accent.color();
                let points = geometry.polygon(idx);
                for (i, &(x1, y1)) in points.iter().enumerate() {
                    let (x2, y2) = points[(i + 1) % points.len()];
                    ctx.draw(&CanvasLine {
                        x1,
                        y1,
                        x2,
                        y2,
                        color: accent,
                    });
                }
            }

            for (i, label) in geometry.labels.iter().enumerate() {
                let angle = geometry.axis_angle(i);
                let x = angle.cos() * 1.18;
                let y = angle.sin() * 1.18;
                ctx.print(
                    x,
                    y,
                    Line::styled(short_label(label), Style::default().fg(Color::Gray)),
                );
            }
        });
    frame.render_widget(canvas, inner);
}

fn short_label(label: &str) -> String {
    const MAX: usize = 10;
    if label.chars().count() <= MAX {
        return label.to_string();
    }
    label.chars().take(MAX - 1).chain(std::iter::once('…')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_labels_build_nothing() {
        let a = RadarSeries::new("A", vec![10.0], Accent::Blue);
        let b = RadarSeries::new("B", vec![20.0], Accent::Red);
        assert!(RadarGeometry::build(&[], a, b).is_none());
    }

    #[test]
    fn long_series_truncated_to_label_count() {
        let a = RadarSeries::new("A", vec![10.0, 20.0, 30.0, 40.0, 50.0], Accent::Blue);
        let b = RadarSeries::new("B", vec![5.0], Accent::Red);
        let geometry =
            RadarGeometry::build(&labels(&["one", "two", "three"]), a, b).expect("labels present");
        assert_eq!(geometry.series[0].values, vec![10.0, 20.0, 30.0]);
        assert_eq!(geometry.series[1].values, vec![5.0, 0.0, 0.0]);
    }

    #[test]
    fn polygon_radius_follows_percentile_scale() {
        let a = RadarSeries::new("A", vec![100.0, 50.0], Accent::Blue);
        let b = RadarSeries::new("B", vec![0.0, 0.0], Accent::Red);
        let geometry = RadarGeometry::build(&labels(&["x", "y"]), a, b).expect("labels present");
        let points = geometry.polygon(0);
        let r0 = (points[0].0.powi(2) + points[0].1.powi(2)).sqrt();
        let r1 = (points[1].0.powi(2) + points[1].1.powi(2)).sqrt();
        assert!((r0 - 1.0).abs() < 1e-9);
        assert!((r1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn tooltip_formats_series_and_value() {
        assert_eq!(tooltip_label("Erling Haaland", 73.0), "Erling Haaland: 73 percentile");
        assert_eq!(tooltip_label("B", 41.25), "B: 41.2 percentile");
    }
}
