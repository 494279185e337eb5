// ============================================================
// Layer 6 — Diagnostic Plots
// ============================================================
// PNG renderings of the evaluation diagnostics, via plotters'
// bitmap backend. These are thin wrappers: every number shown
// here was computed elsewhere (ml::metrics, ml::importance) —
// this module only decides pixels.
//
// Four charts:
//   scatter_actual_vs_predicted — test scatter + identity line
//   feature_importance_bars     — importances, sorted descending
//   correlation_heatmap         — Pearson matrix, blue-white-red
//   distribution_curves         — KDE of actual vs predicted
//
// Reference: plotters crate documentation
//            Silverman (1986) Density Estimation, §3.4

use anyhow::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Canvas size for every chart
const CHART_SIZE: (u32, u32) = (800, 600);

/// Grid resolution for the density curves
const KDE_GRID_POINTS: usize = 200;

// ─── Scatter: actual vs predicted ─────────────────────────────────────────────

/// Test-set scatter with the y = x reference line. A perfect model
/// puts every dot on the red line; dots below it are players the
/// model undersold, dots above are players it oversold.
pub fn scatter_actual_vs_predicted(
    path:      &Path,
    actual:    &[f32],
    predicted: &[f32],
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (a_lo, a_hi) = padded_range(actual.iter().chain(predicted).copied());

    let mut chart = ChartBuilder::on(&root)
        .caption("Actual vs Predicted Fantasy Points", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(a_lo..a_hi, a_lo..a_hi)?;

    chart
        .configure_mesh()
        .x_desc("Actual Points per Game")
        .y_desc("Predicted Points per Game")
        .draw()?;

    chart.draw_series(
        actual
            .iter()
            .zip(predicted)
            .map(|(&a, &p)| Circle::new((a as f64, p as f64), 4, BLUE.mix(0.5).filled())),
    )?;

    // Identity line spans the actual range only, not the padded union
    let (line_lo, line_hi) = padded_range(actual.iter().copied());
    chart.draw_series(LineSeries::new(
        vec![(line_lo, line_lo), (line_hi, line_hi)],
        RED.stroke_width(2),
    ))?;

    root.present()?;
    tracing::debug!("Wrote scatter plot to '{}'", path.display());
    Ok(())
}

// ─── Bars: feature importances ────────────────────────────────────────────────

/// Importance bar chart, most important feature first.
/// Negative bars (chance-level features) hang below the axis.
pub fn feature_importance_bars(
    path:        &Path,
    names:       &[String],
    importances: &[f64],
) -> Result<()> {
    // Sort descending by importance, keeping names attached
    let mut ranked: Vec<(String, f64)> = names
        .iter()
        .cloned()
        .zip(importances.iter().copied())
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let k = ranked.len() as i32;
    let max_v = ranked.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    let min_v = ranked.iter().map(|(_, v)| *v).fold(0.0f64, f64::min);
    let span = (max_v - min_v).max(1e-9);
    let (y_lo, y_hi) = (min_v - 0.05 * span, max_v + 0.05 * span);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Permutation Feature Importances", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0..k).into_segmented(), y_lo..y_hi)?;

    let labels: Vec<String> = ranked.iter().map(|(name, _)| name.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("Increase in MSE when shuffled")
        .draw()?;

    chart.draw_series(ranked.iter().enumerate().map(|(i, (_, v))| {
        Rectangle::new(
            [
                (SegmentValue::Exact(i as i32), 0.0),
                (SegmentValue::Exact(i as i32 + 1), *v),
            ],
            BLUE.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    tracing::debug!("Wrote importance bars to '{}'", path.display());
    Ok(())
}

// ─── Heatmap: correlation matrix ──────────────────────────────────────────────

/// Pearson correlation heatmap over features + target, each cell
/// annotated with its value to two decimals. Blue is negative,
/// white is zero, red is positive.
pub fn correlation_heatmap(
    path:   &Path,
    labels: &[String],
    matrix: &[Vec<f64>],
) -> Result<()> {
    let k = labels.len() as i32;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix of Features and Target", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d((0..k).into_segmented(), (0..k).into_segmented())?;

    let x_labels: Vec<String> = labels.to_vec();
    // Row 0 renders at the TOP, so the y axis reads downwards
    let y_labels: Vec<String> = labels.iter().rev().cloned().collect();

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(labels.len())
        .y_labels(labels.len())
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => x_labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) => y_labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    // Cells
    chart.draw_series(matrix.iter().enumerate().flat_map(|(i, row)| {
        row.iter().enumerate().map(move |(j, &v)| {
            let y = (matrix.len() - 1 - i) as i32;
            Rectangle::new(
                [
                    (SegmentValue::Exact(j as i32), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(j as i32 + 1), SegmentValue::Exact(y + 1)),
                ],
                coolwarm(v).filled(),
            )
        })
    }))?;

    // Annotations on top of the cells
    chart.draw_series(matrix.iter().enumerate().flat_map(|(i, row)| {
        let k_rows = matrix.len();
        row.iter().enumerate().map(move |(j, &v)| {
            let y = (k_rows - 1 - i) as i32;
            let text = if v.is_nan() { String::new() } else { format!("{:.2}", v) };
            let color = if v.abs() > 0.6 { &WHITE } else { &BLACK };
            let style = ("sans-serif", 15)
                .into_font()
                .color(color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(
                text,
                (SegmentValue::CenterOf(j as i32), SegmentValue::CenterOf(y)),
                style,
            )
        })
    }))?;

    root.present()?;
    tracing::debug!("Wrote correlation heatmap to '{}'", path.display());
    Ok(())
}

// ─── Curves: score distributions ──────────────────────────────────────────────

/// Smoothed density curves of the actual (red) and predicted (blue)
/// test scores, filled under each curve. Close curves mean the model
/// reproduces the league's scoring shape, not just its ranking.
pub fn distribution_curves(
    path:      &Path,
    actual:    &[f32],
    predicted: &[f32],
) -> Result<()> {
    let h_actual = silverman_bandwidth(actual);
    let h_pred   = silverman_bandwidth(predicted);

    // One shared grid covering both samples plus a bandwidth margin
    let (lo, hi) = padded_range(actual.iter().chain(predicted).copied());
    let margin = 3.0 * h_actual.max(h_pred);
    let (grid_lo, grid_hi) = (lo - margin, hi + margin);
    let step = (grid_hi - grid_lo) / (KDE_GRID_POINTS - 1) as f64;
    let grid: Vec<f64> = (0..KDE_GRID_POINTS).map(|i| grid_lo + step * i as f64).collect();

    let density_actual = gaussian_kde(actual, h_actual, &grid);
    let density_pred   = gaussian_kde(predicted, h_pred, &grid);

    let peak = density_actual
        .iter()
        .chain(&density_pred)
        .fold(0.0f64, |m, &v| m.max(v));
    let y_hi = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distribution of Fantasy Points", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(grid_lo..grid_hi, 0.0..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Points per Game")
        .y_desc("Density")
        .draw()?;

    chart
        .draw_series(AreaSeries::new(
            grid.iter().zip(&density_actual).map(|(&x, &d)| (x, d)),
            0.0,
            RED.mix(0.3),
        ).border_style(RED.stroke_width(2)))?
        .label("Actual")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .draw_series(AreaSeries::new(
            grid.iter().zip(&density_pred).map(|(&x, &d)| (x, d)),
            0.0,
            BLUE.mix(0.3),
        ).border_style(BLUE.stroke_width(2)))?
        .label("Predicted")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    tracing::debug!("Wrote distribution curves to '{}'", path.display());
    Ok(())
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Min/max of a value stream with 5% padding on each side.
/// Degenerate inputs (empty, or a single repeated value) get a
/// fixed ±0.5 so the chart range is never empty.
fn padded_range(values: impl Iterator<Item = f32>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v as f64);
        hi = hi.max(v as f64);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// Silverman's rule-of-thumb bandwidth: 1.06 σ n^(-1/5),
/// floored so constant samples still render as a narrow bump.
fn silverman_bandwidth(values: &[f32]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.5;
    }
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let var = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;
    let std = var.sqrt();
    (1.06 * std * (n as f64).powf(-0.2)).max(1e-3)
}

/// Gaussian kernel density of `values` at each grid point.
fn gaussian_kde(values: &[f32], bandwidth: f64, grid: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return vec![0.0; grid.len()];
    }
    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    grid.iter()
        .map(|&x| {
            values
                .iter()
                .map(|&v| {
                    let z = (x - v as f64) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm
        })
        .collect()
}

/// Blue-white-red scale over [-1, 1], matching the usual
/// correlation-heatmap palette. NaN renders as neutral grey.
fn coolwarm(v: f64) -> RGBColor {
    if v.is_nan() {
        return RGBColor(200, 200, 200);
    }
    let t = ((v + 1.0) / 2.0).clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let (cold, mid, warm) = ((59u8, 76u8, 192u8), (240u8, 240u8, 240u8), (180u8, 4u8, 38u8));
    if t < 0.5 {
        let s = t / 0.5;
        RGBColor(lerp(cold.0, mid.0, s), lerp(cold.1, mid.1, s), lerp(cold.2, mid.2, s))
    } else {
        let s = (t - 0.5) / 0.5;
        RGBColor(lerp(mid.0, warm.0, s), lerp(mid.1, warm.1, s), lerp(mid.2, warm.2, s))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_png(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("fp_plot_tests");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn assert_written(path: &Path) {
        let meta = std::fs::metadata(path).unwrap();
        assert!(meta.len() > 0, "'{}' is empty", path.display());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_scatter_writes_png() {
        let path = temp_png("scatter.png");
        let actual: Vec<f32> = (0..40).map(|i| i as f32 * 0.5).collect();
        let predicted: Vec<f32> = actual.iter().map(|v| v * 0.9 + 1.0).collect();
        scatter_actual_vs_predicted(&path, &actual, &predicted).unwrap();
        assert_written(&path);
    }

    #[test]
    fn test_importance_bars_write_png() {
        let path = temp_png("bars.png");
        let names = vec!["games".to_string(), "yards".to_string(), "tds".to_string()];
        let importances = vec![0.2, 1.5, -0.05];
        feature_importance_bars(&path, &names, &importances).unwrap();
        assert_written(&path);
    }

    #[test]
    fn test_heatmap_writes_png() {
        let path = temp_png("heatmap.png");
        let labels = vec!["a".to_string(), "b".to_string()];
        let matrix = vec![vec![1.0, -0.4], vec![-0.4, 1.0]];
        correlation_heatmap(&path, &labels, &matrix).unwrap();
        assert_written(&path);
    }

    #[test]
    fn test_distribution_curves_write_png() {
        let path = temp_png("curves.png");
        let actual: Vec<f32> = (0..60).map(|i| (i % 20) as f32).collect();
        let predicted: Vec<f32> = actual.iter().map(|v| v + 1.5).collect();
        distribution_curves(&path, &actual, &predicted).unwrap();
        assert_written(&path);
    }

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(coolwarm(-1.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        let mid = coolwarm(0.0);
        assert_eq!(mid, RGBColor(240, 240, 240));
    }
}
