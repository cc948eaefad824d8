use std::fmt::Write;

use crate::model::{AnalysisResult, Sentiment};

use super::{sentiment_icon, sentiment_slug};

/// `count` as a percentage of `total`. Zero when `total` is zero, never
/// above 100.
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 100.0).min(100.0)
}

/// Progress value for the average score tile: `|score|` capped at 1.
pub fn magnitude_percent(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.abs().min(1.0) * 100.0
}

pub fn progress_bar(value: f64) -> String {
    format!(
        "<div class=\"progress\" role=\"progressbar\" aria-valuemin=\"0\" aria-valuemax=\"100\" aria-valuenow=\"{value:.0}\"><div class=\"progress-fill\" style=\"width: {value:.1}%\"></div></div>"
    )
}

pub fn render_tiles(result: &AnalysisResult) -> String {
    let counts = &result.sentiment_analysis;
    let total = counts.total_comments;

    let mut html = String::from("<section class=\"tiles\">\n");
    let _ = writeln!(
        html,
        "<div class=\"tile tile-total\"><div class=\"tile-head\"><span class=\"icon\">&#9993;</span><span class=\"tile-label\">Total Comments</span></div><p class=\"tile-value\">{total}</p></div>"
    );

    for (sentiment, count) in [
        (Sentiment::Positive, counts.positive),
        (Sentiment::Negative, counts.negative),
        (Sentiment::Neutral, counts.neutral),
    ] {
        let share = percent(count, total);
        let _ = writeln!(
            html,
            "<div class=\"tile tile-{slug}\"><div class=\"tile-head\"><span class=\"icon sentiment-{slug}\">{icon}</span><span class=\"tile-label\">{label}</span></div><p class=\"tile-value\">{count}</p>{bar}<p class=\"tile-caption muted\">{share:.0}% of comments</p></div>",
            slug = sentiment_slug(sentiment),
            icon = sentiment_icon(sentiment),
            label = sentiment.label(),
            bar = progress_bar(share),
        );
    }

    if let Some(score) = result.average_sentiment_score {
        let _ = writeln!(
            html,
            "<div class=\"tile tile-average\"><div class=\"tile-head\"><span class=\"icon\">&#9878;</span><span class=\"tile-label\">Avg. Sentiment Score</span></div><p class=\"tile-value\">{score:.2}</p>{}</div>",
            progress_bar(magnitude_percent(score))
        );
    }

    html.push_str("</section>\n");
    html
}
