use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    chart_error, column_panel, empty_panel, money_label, padded_range, plain_label, DrawResult,
    BUDGET_FILE, CAPTION_SIZE, FONT, GRID_SIZE, ORANGE, PURPLE,
};
use crate::analytics::rows::{BudgetCategory, BudgetCorrelationRow};
use crate::error::Result;
use crate::report::summary::mean;

/// Low, Medium and High budget in that order.
const CATEGORY_COLORS: [RGBColor; 3] = [RGBColor(0, 128, 0), ORANGE, RGBColor(220, 20, 60)];

/// Budget against rating by category, movies per category, mean ROI per
/// category and rating against profit.
pub fn budget_chart(rows: &[BudgetCorrelationRow], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    draw(&root, rows).map_err(|e| chart_error(BUDGET_FILE, e))
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rows: &[BudgetCorrelationRow],
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    budget_vs_rating(&panels[0], rows)?;

    let labels: Vec<String> = BudgetCategory::ALL.iter().map(|c| c.to_string()).collect();
    let (counts, rois): (Vec<f64>, Vec<f64>) = category_stats(rows).into_iter().unzip();
    column_panel(
        &panels[1],
        "Movies by Budget Category",
        &labels,
        &counts,
        &CATEGORY_COLORS,
        "Number of Movies",
        &plain_label,
    )?;
    column_panel(
        &panels[2],
        "Average ROI by Budget Category",
        &labels,
        &rois,
        &CATEGORY_COLORS,
        "ROI (%)",
        &plain_label,
    )?;
    rating_vs_profit(&panels[3], rows)?;

    root.present()?;
    Ok(())
}

/// `(movie count, mean ROI %)` per category in [`BudgetCategory::ALL`]
/// order. Zero-budget movies have no ROI and are left out of the mean.
fn category_stats(rows: &[BudgetCorrelationRow]) -> Vec<(f64, f64)> {
    BudgetCategory::ALL
        .iter()
        .map(|category| {
            let members: Vec<&BudgetCorrelationRow> = rows
                .iter()
                .filter(|r| r.budget_category == *category)
                .collect();
            let rois: Vec<f64> = members.iter().filter_map(|r| r.roi()).collect();
            (members.len() as f64, mean(&rois))
        })
        .collect()
}

fn budget_vs_rating<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[BudgetCorrelationRow],
) -> DrawResult<(), DB> {
    let title = "Budget vs Rating";
    if rows.is_empty() {
        return empty_panel(area, title);
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            padded_range(rows.iter().map(|r| r.budget as f64)),
            padded_range(rows.iter().map(|r| r.avg_rating)),
        )?;
    chart
        .configure_mesh()
        .x_desc("Budget ($)")
        .y_desc("Average Rating")
        .x_label_formatter(&money_label)
        .draw()?;

    for (category, color) in BudgetCategory::ALL.iter().zip(CATEGORY_COLORS) {
        let points: Vec<(f64, f64)> = rows
            .iter()
            .filter(|r| r.budget_category == *category)
            .map(|r| (r.budget as f64, r.avg_rating))
            .collect();
        if points.is_empty() {
            continue;
        }
        chart
            .draw_series(points.into_iter().map(|p| Circle::new(p, 5, color.mix(0.7).filled())))?
            .label(category.as_str())
            .legend(move |(x, y)| Circle::new((x + 5, y), 5, color.filled()));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()?;
    Ok(())
}

fn rating_vs_profit<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[BudgetCorrelationRow],
) -> DrawResult<(), DB> {
    let title = "Rating vs Profit";
    if rows.is_empty() {
        return empty_panel(area, title);
    }
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            padded_range(rows.iter().map(|r| r.avg_rating)),
            padded_range(rows.iter().map(|r| r.profit as f64)),
        )?;
    chart
        .configure_mesh()
        .x_desc("Average Rating")
        .y_desc("Profit ($)")
        .y_label_formatter(&money_label)
        .draw()?;

    chart.draw_series(
        rows.iter()
            .map(|r| Circle::new((r.avg_rating, r.profit as f64), 5, PURPLE.mix(0.6).filled())),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(budget: i64, box_office: i64) -> BudgetCorrelationRow {
        BudgetCorrelationRow {
            title: "Moonlight Path".to_string(),
            budget,
            box_office,
            profit: box_office - budget,
            avg_rating: 7.0,
            rating_count: 60,
            budget_category: BudgetCategory::from_budget(budget),
        }
    }

    #[test]
    fn test_category_stats_in_fixed_order() {
        let stats = category_stats(&[
            movie(10_000_000, 30_000_000),
            movie(150_000_000, 300_000_000),
            movie(120_000_000, 60_000_000),
        ]);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0], (1.0, 300.0));
        assert_eq!(stats[1], (0.0, 0.0));
        assert_eq!(stats[2].0, 2.0);
        assert!((stats[2].1 - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_stats_skips_zero_budget_roi() {
        let stats = category_stats(&[movie(0, 5_000_000), movie(10_000_000, 20_000_000)]);
        assert_eq!(stats[0], (2.0, 200.0));
    }
}
