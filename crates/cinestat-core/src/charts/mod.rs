//! # Charts
//!
//! Renders the analysis results to five multi-panel PNG files with the
//! `plotters` bitmap backend. Each chart module splits into a data
//! preparation step (plain functions over result rows, unit tested) and a
//! drawing step generic over [`DrawingBackend`].
//!
//! Panels with no data still draw their caption, so a store with no rated
//! movies yields five mostly-empty images instead of an error.

mod budget;
mod director;
mod genre;
mod rating;
mod seasonal;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::analytics::AnalysisBundle;
use crate::error::{CinestatError, Result};

pub use budget::budget_chart;
pub use director::director_chart;
pub use genre::genre_chart;
pub use rating::rating_chart;
pub use seasonal::seasonal_chart;

pub const GENRE_FILE: &str = "genre_analysis.png";
pub const DIRECTOR_FILE: &str = "director_analysis.png";
pub const RATING_FILE: &str = "rating_analysis.png";
pub const SEASONAL_FILE: &str = "seasonal_analysis.png";
pub const BUDGET_FILE: &str = "budget_analysis.png";

/// Pixel size of the two-panel genre chart.
pub(crate) const WIDE_SIZE: (u32, u32) = (1500, 600);
/// Pixel size of the 2x2 charts.
pub(crate) const GRID_SIZE: (u32, u32) = (1600, 1200);

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const CAPTION_SIZE: u32 = 22;

pub(crate) const SKY: RGBColor = RGBColor(135, 206, 235);
pub(crate) const ACCENT: RGBColor = RGBColor(52, 152, 219);
pub(crate) const LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
pub(crate) const ORANGE: RGBColor = RGBColor(255, 165, 0);
pub(crate) const PURPLE: RGBColor = RGBColor(128, 0, 128);
pub(crate) const GREY: RGBColor = RGBColor(127, 140, 141);

/// Qualitative palette for stacked bars, pies and box plots.
pub(crate) const PALETTE: [RGBColor; 8] = [
    RGBColor(246, 112, 136),
    RGBColor(206, 143, 49),
    RGBColor(150, 163, 49),
    RGBColor(50, 177, 101),
    RGBColor(53, 172, 164),
    RGBColor(56, 168, 197),
    RGBColor(163, 140, 244),
    RGBColor(244, 97, 221),
];

pub(crate) type DrawResult<T, DB> =
    std::result::Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Render all five charts into `out_dir`, creating it if needed.
///
/// Returns the written paths in rendering order.
pub fn render_all(bundle: &AnalysisBundle, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir).map_err(|e| CinestatError::Output {
        message: "Failed to create chart directory".to_string(),
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    let genre = out_dir.join(GENRE_FILE);
    genre_chart(&bundle.genre_trends, &genre)?;
    tracing::info!("Chart written: {}", genre.display());

    let director = out_dir.join(DIRECTOR_FILE);
    director_chart(&bundle.director_metrics, &director)?;
    tracing::info!("Chart written: {}", director.display());

    let rating = out_dir.join(RATING_FILE);
    rating_chart(&bundle.rating_distribution, &rating)?;
    tracing::info!("Chart written: {}", rating.display());

    let seasonal = out_dir.join(SEASONAL_FILE);
    seasonal_chart(&bundle.seasonal_patterns, &seasonal)?;
    tracing::info!("Chart written: {}", seasonal.display());

    let budget = out_dir.join(BUDGET_FILE);
    budget_chart(&bundle.budget_correlation, &budget)?;
    tracing::info!("Chart written: {}", budget.display());

    Ok(vec![genre, director, rating, seasonal, budget])
}

pub(crate) fn chart_error(chart: &str, err: impl Display) -> CinestatError {
    CinestatError::Chart {
        chart: chart.to_string(),
        message: err.to_string(),
    }
}

/// Least-squares line through `points` as `(slope, intercept)`.
///
/// `None` for fewer than two points or when every x is the same.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;

    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx.abs() < f64::EPSILON {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|p| (p.0 - mean_x) * (p.1 - mean_y))
        .sum();

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

// ---------------------------------------------------------------------------
// Data shaping
// ---------------------------------------------------------------------------

/// Values for a stacked bar panel: one bar per group, one layer per series.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Stacked {
    pub groups: Vec<String>,
    /// `(series name, value per group)`, aligned with `groups`.
    pub series: Vec<(String, Vec<f64>)>,
}

impl Stacked {
    pub fn group_totals(&self) -> Vec<f64> {
        (0..self.groups.len())
            .map(|i| self.series.iter().map(|(_, v)| v[i]).sum())
            .collect()
    }
}

/// Pivot `(group, series, value)` cells into a [`Stacked`] table. Groups and
/// series are sorted by name; missing cells are zero and repeats are summed.
pub(crate) fn pivot(cells: impl IntoIterator<Item = (String, String, f64)>) -> Stacked {
    let mut groups = BTreeSet::new();
    let mut names = BTreeSet::new();
    let mut values: HashMap<(String, String), f64> = HashMap::new();
    for (group, series, value) in cells {
        groups.insert(group.clone());
        names.insert(series.clone());
        *values.entry((group, series)).or_default() += value;
    }

    let groups: Vec<String> = groups.into_iter().collect();
    let series = names
        .into_iter()
        .map(|name| {
            let column = groups
                .iter()
                .map(|g| {
                    values
                        .get(&(g.clone(), name.clone()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect();
            (name, column)
        })
        .collect();
    Stacked { groups, series }
}

/// Axis range covering `values` with a small margin. Never empty.
pub(crate) fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    if (hi - lo).abs() < f64::EPSILON {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        return (lo - pad)..(hi + pad);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Value-axis range for bars: always includes zero.
pub(crate) fn bar_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if hi - lo < f64::EPSILON {
        return 0.0..1.0;
    }
    let pad = (hi - lo) * 0.08;
    let lo = if lo < 0.0 { lo - pad } else { 0.0 };
    lo..(hi + pad)
}

/// Short money label for value axes: `$350M`, `$1.2B`, `-$40K`.
pub(crate) fn money_label(value: &f64) -> String {
    let sign = if *value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{}${:.1}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}${:.0}M", sign, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}${:.0}K", sign, abs / 1e3)
    } else {
        format!("{}${:.0}", sign, abs)
    }
}

pub(crate) fn plain_label(value: &f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Label for a category axis drawn on `-0.5..n-0.5`: only whole positions
/// carry a name.
pub(crate) fn index_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

pub(crate) fn category_axis(len: usize) -> Range<f64> {
    -0.5..(len as f64 - 0.5)
}

// ---------------------------------------------------------------------------
// Shared panels
// ---------------------------------------------------------------------------

/// Caption and a "no data" marker.
pub(crate) fn empty_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
) -> DrawResult<(), DB> {
    tracing::warn!("No data for chart panel '{}'", title);
    let inner = area.titled(title, (FONT, CAPTION_SIZE))?;
    let (w, h) = inner.dim_in_pixel();
    inner.draw(&Text::new(
        "no data",
        (w as i32 / 2 - 25, h as i32 / 2),
        (FONT, 16).into_font().color(&GREY),
    ))?;
    Ok(())
}

/// Vertical bars, one per label.
pub(crate) fn column_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    labels: &[String],
    values: &[f64],
    colors: &[RGBColor],
    y_desc: &str,
    y_format: &dyn Fn(&f64) -> String,
) -> DrawResult<(), DB> {
    if labels.is_empty() {
        return empty_panel(area, title);
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            category_axis(labels.len()),
            bar_range(values.iter().copied()),
        )?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| index_label(labels, *x))
        .y_desc(y_desc)
        .y_label_formatter(y_format)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        let x = i as f64;
        let color = colors[i % colors.len()];
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, *v)], color.filled())
    }))?;
    Ok(())
}

/// Horizontal bars, first label at the bottom.
pub(crate) fn bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    labels: &[String],
    values: &[f64],
    color: RGBColor,
    x_desc: &str,
) -> DrawResult<(), DB> {
    if labels.is_empty() {
        return empty_panel(area, title);
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(140)
        .build_cartesian_2d(
            bar_range(values.iter().copied()),
            category_axis(labels.len()),
        )?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(labels.len())
        .y_label_formatter(&|y| index_label(labels, *y))
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        let y = i as f64;
        Rectangle::new([(0.0, y - 0.35), (*v, y + 0.35)], color.filled())
    }))?;
    Ok(())
}

/// Stacked vertical bars with a legend naming each layer.
pub(crate) fn stacked_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    table: &Stacked,
    x_desc: &str,
    y_desc: &str,
) -> DrawResult<(), DB> {
    if table.groups.is_empty() {
        return empty_panel(area, title);
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            category_axis(table.groups.len()),
            bar_range(table.group_totals()),
        )?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(table.groups.len())
        .x_label_formatter(&|x| index_label(&table.groups, *x))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_label_formatter(&plain_label)
        .draw()?;

    let mut base = vec![0.0; table.groups.len()];
    for (layer, (name, column)) in table.series.iter().enumerate() {
        let color = PALETTE[layer % PALETTE.len()];
        let bars: Vec<_> = column
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let x = i as f64;
                let bar = Rectangle::new([(x - 0.35, base[i]), (x + 0.35, base[i] + v)], color.filled());
                base[i] += v;
                bar
            })
            .collect();
        chart
            .draw_series(bars)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()?;
    Ok(())
}

/// Share of each slice as a percentage of the total.
pub(crate) fn pie_shares(slices: &[(String, f64)]) -> Vec<f64> {
    let total: f64 = slices.iter().map(|s| s.1).sum();
    if total <= 0.0 {
        return vec![0.0; slices.len()];
    }
    slices.iter().map(|s| s.1 / total * 100.0).collect()
}

/// Pie with a label outside and a one-decimal percentage inside each wedge.
/// Wedges run counter-clockwise from three o'clock.
pub(crate) fn pie_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    slices: &[(String, f64)],
) -> DrawResult<(), DB> {
    let shares = pie_shares(slices);
    if shares.iter().all(|s| *s <= 0.0) {
        return empty_panel(area, title);
    }
    let inner = area.titled(title, (FONT, CAPTION_SIZE))?;
    let (w, h) = inner.dim_in_pixel();
    let center = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = w.min(h) as f64 * 0.35;

    let mut start = 0.0f64;
    for (i, ((label, _), share)) in slices.iter().zip(&shares).enumerate() {
        let sweep = share / 100.0 * std::f64::consts::TAU;
        let steps = (sweep.to_degrees().ceil() as usize).max(2);
        let mut outline = vec![polar(center, 0.0, 0.0)];
        outline.extend((0..=steps).map(|s| polar(center, radius, start + sweep * s as f64 / steps as f64)));
        inner.draw(&Polygon::new(outline, PALETTE[i % PALETTE.len()].filled()))?;

        let mid = start + sweep / 2.0;
        let (mut lx, ly) = polar(center, radius * 1.12, mid);
        if mid.cos() < 0.0 {
            lx -= label.chars().count() as i32 * 8;
        }
        inner.draw(&Text::new(label.clone(), (lx, ly - 7), (FONT, 15).into_font()))?;
        let (px, py) = polar(center, radius * 0.6, mid);
        inner.draw(&Text::new(format!("{:.1}%", share), (px - 18, py - 7), (FONT, 14).into_font()))?;
        start += sweep;
    }
    Ok(())
}

fn polar(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
    (
        (center.0 + radius * angle.cos()).round() as i32,
        (center.1 - radius * angle.sin()).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fit_exact_line() {
        let points = [(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)];
        let (slope, intercept) = linear_fit(&points).unwrap();
        assert!((slope - 2.0).abs() < 1e-9);
        assert!((intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_noisy() {
        let points = [(0.0, 1.0), (1.0, 2.0), (2.0, 2.0), (3.0, 4.0)];
        let (slope, intercept) = linear_fit(&points).unwrap();
        assert!((slope - 0.9).abs() < 1e-9);
        assert!((intercept - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert!(linear_fit(&[]).is_none());
        assert!(linear_fit(&[(1.0, 1.0)]).is_none());
        assert!(linear_fit(&[(2.0, 1.0), (2.0, 9.0)]).is_none());
    }

    #[test]
    fn test_pivot_fills_missing_cells() {
        let table = pivot(vec![
            ("2016".to_string(), "Drama".to_string(), 2.0),
            ("2015".to_string(), "Action".to_string(), 1.0),
            ("2016".to_string(), "Action".to_string(), 3.0),
            ("2016".to_string(), "Action".to_string(), 1.0),
        ]);
        assert_eq!(table.groups, vec!["2015", "2016"]);
        assert_eq!(table.series[0], ("Action".to_string(), vec![1.0, 4.0]));
        assert_eq!(table.series[1], ("Drama".to_string(), vec![0.0, 2.0]));
        assert_eq!(table.group_totals(), vec![1.0, 6.0]);
    }

    #[test]
    fn test_ranges_are_never_empty() {
        assert_eq!(padded_range(Vec::new()), 0.0..1.0);
        let r = padded_range(vec![5.0, 5.0]);
        assert!(r.start < 5.0 && r.end > 5.0);
        let r = padded_range(vec![1.0, 10.0]);
        assert!(r.start < 1.0 && r.end > 10.0);

        assert_eq!(bar_range(Vec::new()), 0.0..1.0);
        let r = bar_range(vec![3.0, 7.0]);
        assert_eq!(r.start, 0.0);
        assert!(r.end > 7.0);
        let r = bar_range(vec![-4.0, 2.0]);
        assert!(r.start < -4.0 && r.end > 2.0);
    }

    #[test]
    fn test_index_label() {
        let labels = vec!["Fall".to_string(), "Spring".to_string()];
        assert_eq!(index_label(&labels, 0.0), "Fall");
        assert_eq!(index_label(&labels, 1.0000000001), "Spring");
        assert_eq!(index_label(&labels, 0.5), "");
        assert_eq!(index_label(&labels, 2.0), "");
        assert_eq!(index_label(&labels, -1.0), "");
    }

    #[test]
    fn test_money_label() {
        assert_eq!(money_label(&350_000_000.0), "$350M");
        assert_eq!(money_label(&1_500_000_000.0), "$1.5B");
        assert_eq!(money_label(&-40_000.0), "-$40K");
        assert_eq!(money_label(&0.0), "$0");
    }

    #[test]
    fn test_pie_shares() {
        let slices = vec![("Good".to_string(), 3.0), ("Poor".to_string(), 1.0)];
        assert_eq!(pie_shares(&slices), vec![75.0, 25.0]);
        assert_eq!(pie_shares(&[("x".to_string(), 0.0)]), vec![0.0]);
    }
}
