use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::api::PlayerSide;
use crate::state::Comparison;

/// Writes the comparison on screen to a timestamped workbook in `dir` and
/// returns the file path. A report artifact, not application state.
pub fn export_comparison(dir: &Path, comparison: &Comparison) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let file = format!(
        "futscout-{}-vs-{}-{stamp}.xlsx",
        slug(&comparison.player_a.name),
        slug(&comparison.player_b.name)
    );
    let path = dir.join(file);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Overview")?;
        write_rows(sheet, &overview_rows(comparison))?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Radar")?;
        write_rows(sheet, &radar_rows(comparison))?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Heatmap")?;
        write_rows(sheet, &heatmap_rows(comparison))?;
    }

    workbook
        .save(&path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(path)
}

fn overview_rows(comparison: &Comparison) -> Vec<Vec<String>> {
    let a = &comparison.player_a;
    let b = &comparison.player_b;
    vec![
        vec![String::new(), "Player A".to_string(), "Player B".to_string()],
        vec!["Name".to_string(), a.name.clone(), b.name.clone()],
        vec!["Squad".to_string(), a.squad.clone(), b.squad.clone()],
        vec!["Position".to_string(), a.pos.clone(), b.pos.clone()],
        vec!["Age".to_string(), opt_to_string(a.age), opt_to_string(b.age)],
        vec![
            "Minutes".to_string(),
            opt_to_string(a.minutes),
            opt_to_string(b.minutes),
        ],
        vec![
            "90s".to_string(),
            opt_to_string(a.nineties),
            opt_to_string(b.nineties),
        ],
        vec![
            "Overall percentile".to_string(),
            a.radar.overall.to_string(),
            b.radar.overall.to_string(),
        ],
        Vec::new(),
        vec!["League".to_string(), comparison.league.clone()],
        vec!["Position filter".to_string(), comparison.pos.clone()],
        vec!["Min 90s".to_string(), format!("{:.1}", comparison.min90s)],
    ]
}

fn radar_rows(comparison: &Comparison) -> Vec<Vec<String>> {
    let a = &comparison.player_a.radar;
    let b = &comparison.player_b.radar;
    let mut rows = vec![vec![
        "Metric".to_string(),
        "A percentile".to_string(),
        "A value".to_string(),
        "B percentile".to_string(),
        "B value".to_string(),
    ]];
    for (i, label) in a.labels.iter().enumerate() {
        rows.push(vec![
            label.clone(),
            series_cell(&a.percentiles, i),
            series_cell(&a.values, i),
            series_cell(&b.percentiles, i),
            series_cell(&b.values, i),
        ]);
    }
    rows
}

fn heatmap_rows(comparison: &Comparison) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for (title, side) in [
        ("Player A", &comparison.player_a),
        ("Player B", &comparison.player_b),
    ] {
        rows.extend(side_heatmap_rows(title, side));
        rows.push(Vec::new());
    }
    rows
}

fn side_heatmap_rows(title: &str, side: &PlayerSide) -> Vec<Vec<String>> {
    let heatmap = &side.heatmap;
    let mut rows = vec![vec![format!("{title}: {}", side.name)]];

    let mut header = vec![String::new()];
    header.extend(heatmap.x_labels.iter().cloned());
    rows.push(header);

    for (row_idx, matrix_row) in heatmap.matrix.iter().enumerate() {
        let mut row = vec![
            heatmap
                .y_labels
                .get(row_idx)
                .cloned()
                .unwrap_or_else(|| format!("Row {row_idx}")),
        ];
        row.extend(matrix_row.iter().map(|cell| format!("{cell:.3}")));
        rows.push(row);
    }
    rows
}

fn series_cell(values: &[f64], i: usize) -> String {
    values.get(i).map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn slug(name: &str) -> String {
    let mut slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    while slug.contains("--") {
        slug = slug.replace("--", "-");
    }
    slug.trim_matches('-').to_string()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_strips_non_alphanumerics() {
        assert_eq!(slug("Erling Haaland"), "erling-haaland");
        assert_eq!(slug("N'Golo Kante"), "n-golo-kante");
    }
}
