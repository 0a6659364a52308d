use std::collections::BTreeMap;
use std::path::Path;

use plotters::coord::Shift;
use plotters::data::Quartiles;
use plotters::prelude::*;

use super::{
    bar_range, category_axis, chart_error, empty_panel, index_label, linear_fit, money_label,
    padded_range, pie_panel, plain_label, DrawResult, ACCENT, CAPTION_SIZE, FONT, GRID_SIZE,
    PALETTE, RATING_FILE, SKY,
};
use crate::analytics::rows::{RatingCategory, RatingDistributionRow};
use crate::error::Result;

const HISTOGRAM_BINS: usize = 20;

/// Histogram of average ratings, ratings by genre, rating against profit,
/// and the share of each rating category.
pub fn rating_chart(rows: &[RatingDistributionRow], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, GRID_SIZE).into_drawing_area();
    draw(&root, rows).map_err(|e| chart_error(RATING_FILE, e))
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rows: &[RatingDistributionRow],
) -> DrawResult<(), DB> {
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    let ratings: Vec<f64> = rows.iter().map(|r| r.avg_rating).collect();
    histogram_panel(&panels[0], &ratings)?;
    genre_box_panel(&panels[1], &ratings_by_genre(rows))?;
    profit_trend_panel(&panels[2], rows)?;
    pie_panel(&panels[3], "Movies by Rating Category", &category_counts(rows))?;

    root.present()?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bin {
    lo: f64,
    hi: f64,
    count: usize,
}

/// Equal-width bins spanning the data. The last bin includes its upper
/// edge; a constant input gets a unit-wide span centred on the value.
fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in values {
        let index = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Per-genre average ratings, genres in name order.
fn ratings_by_genre(rows: &[RatingDistributionRow]) -> Vec<(String, Vec<f64>)> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.genre.as_str()).or_default().push(row.avg_rating);
    }
    groups
        .into_iter()
        .map(|(genre, values)| (genre.to_string(), values))
        .collect()
}

/// Movies per rating category, most common first.
fn category_counts(rows: &[RatingDistributionRow]) -> Vec<(String, f64)> {
    let mut counts: Vec<(RatingCategory, usize)> = RatingCategory::ALL
        .iter()
        .map(|c| (*c, rows.iter().filter(|r| r.rating_category == *c).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(c, n)| (c.to_string(), n as f64))
        .collect()
}

/// Whisker ends: the most extreme values still inside the 1.5 IQR fences.
fn whiskers(values: &[f64], fences: (f64, f64)) -> (f64, f64) {
    let inside = values.iter().copied().filter(|v| *v >= fences.0 && *v <= fences.1);
    let (lo, hi) = inside.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        fences
    } else {
        (lo, hi)
    }
}

fn histogram_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    ratings: &[f64],
) -> DrawResult<(), DB> {
    let title = "Distribution of Movie Ratings";
    let bins = histogram(ratings, HISTOGRAM_BINS);
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return empty_panel(area, title);
    };

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(first.lo..last.hi, bar_range(bins.iter().map(|b| b.count as f64)))?;
    chart
        .configure_mesh()
        .x_desc("Average Rating")
        .y_desc("Number of Movies")
        .y_label_formatter(&plain_label)
        .draw()?;

    chart.draw_series(
        bins.iter()
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], SKY.mix(0.7).filled())),
    )?;
    chart.draw_series(
        bins.iter()
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK.stroke_width(1))),
    )?;

    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    let top = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    chart
        .draw_series(LineSeries::new(vec![(mean, 0.0), (mean, top)], RED.stroke_width(2)))?
        .label(format!("Mean: {:.2}", mean))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8).filled())
        .border_style(BLACK.stroke_width(1))
        .draw()?;
    Ok(())
}

fn genre_box_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    groups: &[(String, Vec<f64>)],
) -> DrawResult<(), DB> {
    let title = "Rating Distribution by Genre";
    if groups.is_empty() {
        return empty_panel(area, title);
    }
    let labels: Vec<String> = groups.iter().map(|g| g.0.clone()).collect();
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            category_axis(groups.len()),
            padded_range(groups.iter().flat_map(|g| g.1.iter().copied())),
        )?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| index_label(&labels, *x))
        .x_desc("Genre")
        .y_desc("Average Rating")
        .draw()?;

    for (i, (_, values)) in groups.iter().enumerate() {
        let x = i as f64;
        let [lower_fence, q1, median, q3, upper_fence] = Quartiles::new(values).values().map(f64::from);
        let (low, high) = whiskers(values, (lower_fence, upper_fence));
        let color = PALETTE[i % PALETTE.len()];

        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, q1), (x + 0.3, q3)],
            color.mix(0.8).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.3, q1), (x + 0.3, q3)],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series(
            [
                vec![(x - 0.3, median), (x + 0.3, median)],
                vec![(x, q3), (x, high)],
                vec![(x, q1), (x, low)],
                vec![(x - 0.15, high), (x + 0.15, high)],
                vec![(x - 0.15, low), (x + 0.15, low)],
            ]
            .into_iter()
            .map(|line| PathElement::new(line, BLACK.stroke_width(1))),
        )?;
        chart.draw_series(
            values
                .iter()
                .filter(|v| **v < low || **v > high)
                .map(|v| Circle::new((x, *v), 3, BLACK.stroke_width(1))),
        )?;
    }
    Ok(())
}

fn profit_trend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    rows: &[RatingDistributionRow],
) -> DrawResult<(), DB> {
    let title = "Rating vs Profit Correlation";
    if rows.is_empty() {
        return empty_panel(area, title);
    }
    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.avg_rating, r.profit as f64)).collect();
    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            padded_range(points.iter().map(|p| p.0)),
            padded_range(points.iter().map(|p| p.1)),
        )?;
    chart
        .configure_mesh()
        .x_desc("Average Rating")
        .y_desc("Profit ($)")
        .y_label_formatter(&money_label)
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new(*p, 5, ACCENT.mix(0.6).filled())),
    )?;

    if let Some((slope, intercept)) = linear_fit(&points) {
        let xs = points.iter().map(|p| p.0);
        let lo = xs.clone().fold(f64::INFINITY, f64::min);
        let hi = xs.fold(f64::NEG_INFINITY, f64::max);
        chart.draw_series(LineSeries::new(
            vec![(lo, slope * lo + intercept), (hi, slope * hi + intercept)],
            RED.mix(0.8).stroke_width(2),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(genre: &str, rating: f64) -> RatingDistributionRow {
        RatingDistributionRow {
            title: format!("{} {}", genre, rating),
            genre: genre.to_string(),
            release_year: 2020,
            director: "Bong Joon-ho".to_string(),
            avg_rating: rating,
            total_ratings: 80,
            min_rating: 1.0,
            max_rating: 10.0,
            profit: 0,
            rating_category: RatingCategory::from_avg(rating),
        }
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let values = [5.0, 5.5, 6.0, 7.25, 9.0];
        let bins = histogram(&values, 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].lo, 5.0);
        assert!((bins[19].hi - 9.0).abs() < 1e-9);
        // the maximum lands in the last bin, not past it
        assert_eq!(bins[19].count, 1);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let bins = histogram(&[7.0, 7.0], 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!((bins[0].lo - 6.5).abs() < 1e-9);
        assert!(histogram(&[], 20).is_empty());
    }

    #[test]
    fn test_ratings_by_genre_sorted() {
        let groups = ratings_by_genre(&[movie("Horror", 6.0), movie("Drama", 7.0), movie("Horror", 8.0)]);
        assert_eq!(groups[0], ("Drama".to_string(), vec![7.0]));
        assert_eq!(groups[1], ("Horror".to_string(), vec![6.0, 8.0]));
    }

    #[test]
    fn test_category_counts_most_common_first() {
        let counts = category_counts(&[
            movie("Drama", 6.5),
            movie("Drama", 6.1),
            movie("Drama", 8.4),
            movie("Drama", 5.9),
            movie("Drama", 6.9),
        ]);
        assert_eq!(counts[0], ("Average".to_string(), 3.0));
        assert_eq!(counts.len(), 3);
        assert!(counts.iter().all(|c| c.0 != "Good"));
    }

    #[test]
    fn test_whiskers_stop_at_data_inside_fences() {
        let values = [5.0, 6.0, 6.5, 7.0, 20.0];
        assert_eq!(whiskers(&values, (3.0, 9.0)), (5.0, 7.0));
        assert_eq!(whiskers(&[], (3.0, 9.0)), (3.0, 9.0));
    }
}
