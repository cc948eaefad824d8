use std::borrow::Cow;
use std::fmt::Write;

use crate::model::{CommentSummary, Sentiment, Urgency};

use super::{escape_text, sentiment_color, sentiment_icon, sentiment_slug, urgency_color, urgency_icon};

pub const MAX_COMMENT_CARDS: usize = 5;
pub const COMMENT_PREVIEW_CHARS: usize = 200;

const UNKNOWN_URGENCY_COLOR: &str = "#64748B";

/// Cuts `text` to `limit` characters and appends `...` when it was longer.
pub fn truncate_comment(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

pub fn render_comment_cards(summaries: &[CommentSummary]) -> String {
    let mut html = String::from(
        "<section class=\"panel comments\">\n<h2 class=\"panel-title\"><span class=\"icon\">&#9776;</span> Comment Summaries</h2>\n",
    );

    if summaries.is_empty() {
        html.push_str("<p class=\"muted\">No comment summaries were returned.</p>\n</section>\n");
        return html;
    }

    if summaries.len() > MAX_COMMENT_CARDS {
        let _ = writeln!(
            html,
            "<p class=\"muted comments-caption\">Showing the first {MAX_COMMENT_CARDS} of {} comments.</p>",
            summaries.len()
        );
    }

    for summary in summaries.iter().take(MAX_COMMENT_CARDS) {
        html.push_str(&render_card(summary));
    }

    html.push_str("</section>\n");
    html
}

fn render_card(summary: &CommentSummary) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<article class=\"comment-card\" data-id=\"{}\">",
        escape_text(&summary.id)
    );

    html.push_str("<div class=\"card-head\">");
    html.push_str(&sentiment_badge(&summary.sentiment));
    if let Some(urgency) = summary.urgency.as_deref().filter(|u| !u.trim().is_empty()) {
        html.push_str(&urgency_badge(urgency));
    }
    if let Some(score) = summary.sentiment_score {
        let _ = write!(html, "<span class=\"score muted\">Score: {score:.2}</span>");
    }
    html.push_str("</div>\n");

    let _ = writeln!(
        html,
        "<div class=\"card-section\"><h4 class=\"muted\">Summary:</h4><p class=\"summary-text\">{}</p></div>",
        escape_text(&summary.summary)
    );
    let _ = writeln!(
        html,
        "<div class=\"card-section\"><h4 class=\"muted\">Original Comment:</h4><p class=\"original-comment\">{}</p></div>",
        escape_text(&truncate_comment(&summary.original_comment, COMMENT_PREVIEW_CHARS))
    );

    html.push_str("</article>\n");
    html
}

fn sentiment_badge(label: &str) -> String {
    let sentiment = Sentiment::from_label(label);
    format!(
        "<span class=\"badge badge-sentiment sentiment-{}\" style=\"--badge-color: {}\"><span class=\"icon\">{}</span> <span class=\"badge-text\">{}</span></span>",
        sentiment_slug(sentiment),
        sentiment_color(sentiment),
        sentiment_icon(sentiment),
        escape_text(label.trim())
    )
}

/// Known labels get their canonical spelling and colors; anything else is
/// shown as sent with neutral fallback styling.
fn urgency_badge(label: &str) -> String {
    match Urgency::from_label(label) {
        Some(urgency) => format!(
            "<span class=\"badge badge-urgency urgency-{}\" style=\"--badge-color: {}\"><span class=\"icon\">{}</span> <span class=\"badge-text\">{}</span></span>",
            urgency_slug(urgency),
            urgency_color(urgency),
            urgency_icon(Some(urgency)),
            urgency.label()
        ),
        None => format!(
            "<span class=\"badge badge-urgency urgency-unknown\" style=\"--badge-color: {UNKNOWN_URGENCY_COLOR}\"><span class=\"icon\">{}</span> <span class=\"badge-text\">{}</span></span>",
            urgency_icon(None),
            escape_text(label.trim())
        ),
    }
}

fn urgency_slug(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "critical",
        Urgency::Moderate => "moderate",
        Urgency::Minor => "minor",
        Urgency::NotApplicable => "not-applicable",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: usize, comment: &str, urgency: Option<&str>) -> CommentSummary {
        CommentSummary {
            id: id.to_string(),
            original_comment: comment.to_string(),
            summary: format!("Summary {id}"),
            sentiment: "negative".to_string(),
            sentiment_score: Some(0.8765),
            urgency: urgency.map(str::to_string),
        }
    }

    #[test]
    fn test_long_comment_is_truncated() {
        let comment = "x".repeat(250);
        let shown = truncate_comment(&comment, COMMENT_PREVIEW_CHARS);
        assert_eq!(shown, format!("{}...", "x".repeat(200)));
    }

    #[test]
    fn test_short_comment_is_unchanged() {
        let comment = "y".repeat(150);
        assert_eq!(truncate_comment(&comment, COMMENT_PREVIEW_CHARS), comment);
        let exact = "z".repeat(200);
        assert_eq!(truncate_comment(&exact, COMMENT_PREVIEW_CHARS), exact);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let comment = "ü".repeat(201);
        let shown = truncate_comment(&comment, COMMENT_PREVIEW_CHARS);
        assert_eq!(shown.chars().count(), 203);
        assert!(shown.ends_with("ü..."));
    }

    #[test]
    fn test_only_first_five_cards() {
        let summaries: Vec<_> = (0..7).map(|i| summary(i, "comment", None)).collect();
        let html = render_comment_cards(&summaries);
        assert_eq!(html.matches("<article class=\"comment-card\"").count(), 5);
        assert!(html.contains("data-id=\"4\""));
        assert!(!html.contains("data-id=\"5\""));
        assert!(html.contains("Showing the first 5 of 7 comments."));
    }

    #[test]
    fn test_urgency_badge_ignores_case() {
        let html = render_comment_cards(&[summary(0, "c", Some("CRITICAL"))]);
        assert!(html.contains("urgency-critical"));
        assert!(html.contains("<span class=\"badge-text\">Critical</span>"));
        assert!(html.contains("#EF4444"));
    }

    #[test]
    fn test_unknown_urgency_uses_fallback() {
        let html = render_comment_cards(&[summary(0, "c", Some("Urgent-ish"))]);
        assert!(html.contains("urgency-unknown"));
        assert!(html.contains("Urgent-ish"));
    }

    #[test]
    fn test_card_shows_score_and_full_summary() {
        let mut item = summary(0, "c", Some("minor"));
        item.summary = "s".repeat(400);
        let html = render_comment_cards(&[item]);
        assert!(html.contains("Score: 0.88"));
        assert!(html.contains(&"s".repeat(400)));
        assert!(html.contains("sentiment-negative"));
    }

    #[test]
    fn test_backend_text_is_escaped() {
        let html = render_comment_cards(&[summary(0, "<script>alert(1)</script>", None)]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
