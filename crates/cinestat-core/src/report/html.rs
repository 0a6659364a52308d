//! # HTML Report
//!
//! Assembles the static analysis report by direct string building. The
//! document carries its own stylesheet and needs no external assets.
//! Every piece of text taken from the store passes through
//! [`escape_html`] before it is interpolated.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use crate::analytics::AnalysisBundle;
use crate::report::summary::{genre_summary, season_summary, ReportSummary};

pub const TOP_DIRECTORS: usize = 10;
pub const TOP_MOVIES: usize = 15;
pub const TOP_COLLABORATIONS: usize = 10;
/// Shared-title strings longer than this are cut and suffixed with "...".
pub const TITLES_PREVIEW_CHARS: usize = 50;

const STYLE: &str = r#"
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .container {
            max-width: 1200px;
            margin: 0 auto;
            background-color: white;
            padding: 30px;
            border-radius: 10px;
            box-shadow: 0 0 20px rgba(0,0,0,0.1);
        }
        h1 {
            color: #2c3e50;
            text-align: center;
            border-bottom: 3px solid #3498db;
            padding-bottom: 10px;
        }
        h2 {
            color: #34495e;
            border-left: 4px solid #3498db;
            padding-left: 15px;
            margin-top: 30px;
        }
        .summary-stats {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            margin: 20px 0;
        }
        .stat-card {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 20px;
            border-radius: 10px;
            text-align: center;
        }
        .stat-number { font-size: 2em; font-weight: bold; display: block; }
        .stat-label { font-size: 0.9em; opacity: 0.9; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; background-color: white; }
        th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
        th { background-color: #3498db; color: white; }
        tr:hover { background-color: #f5f5f5; }
        .insight-box {
            background-color: #e8f4fd;
            border-left: 4px solid #3498db;
            padding: 15px;
            margin: 15px 0;
            border-radius: 5px;
        }
        .footer { text-align: center; margin-top: 40px; color: #7f8c8d; }
"#;

/// Render the full report document.
pub fn render_html(bundle: &AnalysisBundle, generated_at: NaiveDateTime) -> String {
    let summary = ReportSummary::from_bundle(bundle);
    let mut html = String::with_capacity(32 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str("    <title>Movie Rating Analysis Report</title>\n");
    let _ = writeln!(html, "    <style>{}    </style>", STYLE);
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");
    html.push_str("    <h1>🎬 Movie Rating Analysis Report</h1>\n");

    push_stat_cards(&mut html, &summary);
    push_insights(&mut html, &summary);
    push_director_table(&mut html, bundle);
    push_movie_table(&mut html, bundle);
    push_collaboration_table(&mut html, bundle);
    push_genre_table(&mut html, bundle);
    push_season_table(&mut html, bundle);
    push_methodology(&mut html);

    let _ = writeln!(
        html,
        "    <div class=\"footer\">\n        <p>Report generated on {}</p>\n        <p>Movie Rating Analysis | cinestat</p>\n    </div>",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn push_stat_cards(html: &mut String, summary: &ReportSummary) {
    let avg = summary
        .avg_rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "n/a".to_string());
    let genre = summary.top_genre.as_deref().unwrap_or("n/a");

    html.push_str("    <div class=\"summary-stats\">\n");
    for (number, label) in [
        (summary.total_movies.to_string(), "Total Movies Analyzed"),
        (avg, "Average Rating"),
        (escape_html(genre), "Most Popular Genre"),
        (summary.directors_analyzed.to_string(), "Directors Analyzed"),
    ] {
        let _ = writeln!(
            html,
            "        <div class=\"stat-card\">\n            <span class=\"stat-number\">{}</span>\n            <span class=\"stat-label\">{}</span>\n        </div>",
            number, label
        );
    }
    html.push_str("    </div>\n");
}

fn push_insights(html: &mut String, summary: &ReportSummary) {
    html.push_str("    <h2>📊 Key Insights</h2>\n");
    if let Some(director) = &summary.best_director {
        let _ = writeln!(
            html,
            "    <div class=\"insight-box\"><strong>🏆 Top Performer:</strong> {} has the highest average rating among directors with multiple films.</div>",
            escape_html(director)
        );
    }
    if let Some(movie) = &summary.most_profitable_movie {
        let _ = writeln!(
            html,
            "    <div class=\"insight-box\"><strong>💰 Most Profitable:</strong> \"{}\" generated the highest profit in the dataset.</div>",
            escape_html(movie)
        );
    }
    if let Some(genre) = &summary.top_genre {
        let _ = writeln!(
            html,
            "    <div class=\"insight-box\"><strong>🎭 Genre Leader:</strong> {} is the most frequently produced genre.</div>",
            escape_html(genre)
        );
    }
}

fn push_director_table(html: &mut String, bundle: &AnalysisBundle) {
    let mut directors: Vec<_> = bundle.director_metrics.iter().collect();
    directors.sort_by(|a, b| b.avg_director_rating.total_cmp(&a.avg_director_rating));

    html.push_str("    <h2>🎯 Director Performance Analysis</h2>\n");
    open_table(
        html,
        &["Director", "Movies", "Avg Rating", "Avg Box Office", "Total Box Office"],
    );
    for d in directors.into_iter().take(TOP_DIRECTORS) {
        push_row(
            html,
            &[
                escape_html(&d.director_name),
                d.total_movies.to_string(),
                format!("{:.1}", d.avg_director_rating),
                format_money(d.avg_box_office),
                format_money(d.total_box_office as f64),
            ],
        );
    }
    close_table(html);
}

fn push_movie_table(html: &mut String, bundle: &AnalysisBundle) {
    let mut movies: Vec<_> = bundle.rating_distribution.iter().collect();
    movies.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));

    html.push_str("    <h2>🏅 Top Rated Movies</h2>\n");
    open_table(
        html,
        &["Movie", "Director", "Genre", "Year", "Rating", "Total Ratings"],
    );
    for m in movies.into_iter().take(TOP_MOVIES) {
        push_row(
            html,
            &[
                escape_html(&m.title),
                escape_html(&m.director),
                escape_html(&m.genre),
                m.release_year.to_string(),
                format!("{:.1}", m.avg_rating),
                m.total_ratings.to_string(),
            ],
        );
    }
    close_table(html);
}

fn push_collaboration_table(html: &mut String, bundle: &AnalysisBundle) {
    html.push_str("    <h2>🤝 Actor Collaboration Network</h2>\n");
    open_table(
        html,
        &["Actor 1", "Actor 2", "Collaborations", "Avg Rating", "Movies Together"],
    );
    for c in bundle.collaborations.iter().take(TOP_COLLABORATIONS) {
        push_row(
            html,
            &[
                escape_html(&c.actor1),
                escape_html(&c.actor2),
                c.collaborations.to_string(),
                format!("{:.1}", c.avg_collab_rating),
                escape_html(&truncate_chars(&c.movies_together, TITLES_PREVIEW_CHARS)),
            ],
        );
    }
    close_table(html);
}

fn push_genre_table(html: &mut String, bundle: &AnalysisBundle) {
    html.push_str("    <h2>🎭 Genre Analysis</h2>\n");
    open_table(
        html,
        &["Genre", "Total Movies", "Avg Rating", "Total Box Office"],
    );
    for g in genre_summary(bundle) {
        push_row(
            html,
            &[
                escape_html(&g.genre),
                g.movie_count.to_string(),
                format!("{:.1}", g.avg_rating),
                format_money(g.total_box_office as f64),
            ],
        );
    }
    close_table(html);
}

fn push_season_table(html: &mut String, bundle: &AnalysisBundle) {
    html.push_str("    <h2>🌟 Seasonal Release Patterns</h2>\n");
    open_table(
        html,
        &["Season", "Movies Released", "Avg Rating", "Avg Box Office"],
    );
    for s in season_summary(bundle) {
        push_row(
            html,
            &[
                s.season.to_string(),
                s.movie_count.to_string(),
                format!("{:.1}", s.avg_rating),
                format_money(s.avg_box_office),
            ],
        );
    }
    close_table(html);
}

fn push_methodology(html: &mut String) {
    html.push_str(
        r#"    <h2>💡 Analysis Methodology</h2>
    <div class="insight-box">
        <p><strong>Data Source:</strong> SQLite store with synthetic movie data including ratings, box office, cast, and crew information.</p>
        <p><strong>Analysis Techniques:</strong> SQL joins and aggregations over per-movie rating averages.</p>
        <p><strong>Key Metrics:</strong> Average ratings, box office performance, profit margins, collaboration patterns, and seasonal trends.</p>
    </div>
    <h2>🔍 SQL Techniques Used</h2>
    <div class="insight-box">
        <ul>
            <li>JOINs across five tables, including a self-join on the cast table</li>
            <li>Aggregate functions (AVG, COUNT, SUM, MIN, MAX, GROUP_CONCAT)</li>
            <li>Aggregating subqueries</li>
            <li>Date functions (strftime)</li>
            <li>CASE expressions for categorization</li>
            <li>GROUP BY with HAVING clauses</li>
        </ul>
    </div>
"#,
    );
}

fn open_table(html: &mut String, headers: &[&str]) {
    html.push_str("    <table>\n        <thead>\n            <tr>");
    for h in headers {
        let _ = write!(html, "<th>{}</th>", h);
    }
    html.push_str("</tr>\n        </thead>\n        <tbody>\n");
}

fn push_row(html: &mut String, cells: &[String]) {
    html.push_str("            <tr>");
    for cell in cells {
        let _ = write!(html, "<td>{}</td>", cell);
    }
    html.push_str("</tr>\n");
}

fn close_table(html: &mut String) {
    html.push_str("        </tbody>\n    </table>\n");
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Whole-dollar amount with thousands separators, e.g. `$1,234,567`.
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}", sign, grouped)
}

/// Cut `text` to at most `max_chars` characters, appending "..." if cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
