//! Inline SVG pie charts for the distribution panels.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt::Write;

use crate::model::{Sentiment, SentimentCounts, Urgency, UrgencyCounts};

use super::{escape_text, sentiment_color, urgency_color};

const WIDTH: f64 = 460.0;
const HEIGHT: f64 = 280.0;
const CX: f64 = WIDTH / 2.0;
const CY: f64 = HEIGHT / 2.0;
const RADIUS: f64 = 100.0;
const LABEL_RADIUS: f64 = 118.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub name: &'static str,
    pub value: u64,
    pub color: &'static str,
}

pub fn sentiment_slices(counts: &SentimentCounts) -> Vec<Slice> {
    [
        (Sentiment::Positive, counts.positive),
        (Sentiment::Negative, counts.negative),
        (Sentiment::Neutral, counts.neutral),
    ]
    .into_iter()
    .map(|(sentiment, value)| Slice {
        name: sentiment.label(),
        value,
        color: sentiment_color(sentiment),
    })
    .collect()
}

pub fn urgency_slices(counts: &UrgencyCounts) -> Vec<Slice> {
    Urgency::ALL
        .into_iter()
        .zip([counts.critical, counts.moderate, counts.minor, counts.not_applicable])
        .map(|(urgency, value)| Slice {
            name: urgency.label(),
            value,
            color: urgency_color(urgency),
        })
        .collect()
}

/// Share of `value` in `total`, rounded to a whole percent.
pub fn slice_percent(value: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (value as f64 / total as f64 * 100.0).round() as u64
}

/// Slice labels read `"<Name> <pct>%"` where the percentage is relative to
/// this chart's own total.
pub fn slice_label(slice: &Slice, total: u64) -> String {
    format!("{} {}%", slice.name, slice_percent(slice.value, total))
}

pub fn pie_chart(aria_label: &str, slices: &[Slice]) -> String {
    let total: u64 = slices.iter().map(|s| s.value).sum();
    if total == 0 {
        return "<p class=\"chart-empty muted\">No data</p>".to_string();
    }

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg class=\"pie-chart\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {WIDTH:.0} {HEIGHT:.0}\" role=\"img\" aria-label=\"{}\">",
        escape_text(aria_label)
    );

    let mut start = -FRAC_PI_2;
    for slice in slices.iter().filter(|s| s.value > 0) {
        let sweep = slice.value as f64 / total as f64 * TAU;
        let end = start + sweep;

        let _ = writeln!(
            svg,
            "  <g class=\"slice\" data-name=\"{}\" data-value=\"{}\">",
            slice.name, slice.value
        );
        let _ = writeln!(svg, "    <title>{}: {}</title>", slice.name, slice.value);

        if slice.value == total {
            let _ = writeln!(
                svg,
                "    <circle cx=\"{CX:.2}\" cy=\"{CY:.2}\" r=\"{RADIUS:.2}\" fill=\"{}\"/>",
                slice.color
            );
        } else {
            let (x0, y0) = point(start, RADIUS);
            let (x1, y1) = point(end, RADIUS);
            let large_arc = u8::from(sweep > PI);
            let _ = writeln!(
                svg,
                "    <path d=\"M {CX:.2} {CY:.2} L {x0:.2} {y0:.2} A {RADIUS:.2} {RADIUS:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z\" fill=\"{}\" stroke=\"#ffffff\" stroke-width=\"1\"/>",
                slice.color
            );
        }

        let mid = start + sweep / 2.0;
        let (lx, ly) = point(mid, LABEL_RADIUS);
        let anchor = if mid.cos() >= 0.0 { "start" } else { "end" };
        let _ = writeln!(
            svg,
            "    <text class=\"slice-label\" x=\"{lx:.2}\" y=\"{ly:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"middle\" fill=\"{}\">{}</text>",
            slice.color,
            slice_label(slice, total)
        );
        let _ = writeln!(svg, "  </g>");

        start = end;
    }

    svg.push_str("</svg>");
    svg
}

fn point(angle: f64, radius: f64) -> (f64, f64) {
    (CX + radius * angle.cos(), CY + radius * angle.sin())
}
