//! Server-side rendering of the dashboard page.
//!
//! Everything is plain string building. Text that comes from the backend or
//! from upload names goes through [`escape_text`].

pub mod chart;
pub mod comments;
pub mod tiles;
pub mod word_cloud;

use std::fmt::Write;

use crate::{
    model::{AnalysisResult, Sentiment, Urgency},
    upload::UploadGate,
};

pub const POSITIVE_COLOR: &str = "#10B981";
pub const NEGATIVE_COLOR: &str = "#EF4444";
pub const NEUTRAL_COLOR: &str = "#6B7280";
pub const CRITICAL_COLOR: &str = "#EF4444";
pub const MODERATE_COLOR: &str = "#F59E0B";
pub const MINOR_COLOR: &str = "#10B981";
pub const NOT_APPLICABLE_COLOR: &str = "#6B7280";

pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn sentiment_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => POSITIVE_COLOR,
        Sentiment::Negative => NEGATIVE_COLOR,
        Sentiment::Neutral => NEUTRAL_COLOR,
    }
}

pub fn sentiment_icon(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "&#9650;",
        Sentiment::Negative => "&#9660;",
        Sentiment::Neutral => "&#8722;",
    }
}

pub fn sentiment_slug(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "positive",
        Sentiment::Negative => "negative",
        Sentiment::Neutral => "neutral",
    }
}

pub fn urgency_color(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => CRITICAL_COLOR,
        Urgency::Moderate => MODERATE_COLOR,
        Urgency::Minor => MINOR_COLOR,
        Urgency::NotApplicable => NOT_APPLICABLE_COLOR,
    }
}

pub fn urgency_icon(urgency: Option<Urgency>) -> &'static str {
    match urgency {
        Some(Urgency::Critical) => "&#9888;",
        Some(Urgency::Moderate) => "&#9888;",
        Some(Urgency::Minor) => "&#8505;",
        Some(Urgency::NotApplicable) => "&#10003;",
        None => "?",
    }
}

/// Renders the full dashboard from the current gate state.
pub fn render_page(gate: &UploadGate) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    if gate.is_in_flight() {
        html.push_str("<meta http-equiv=\"refresh\" content=\"3\">\n");
    }
    html.push_str("<title>eConsultation Analysis Platform</title>\n");
    html.push_str(STYLE);
    html.push_str("<script src=\"/static/dropzone.js\" defer></script>\n</head>\n<body>\n");

    html.push_str(HEADER);
    html.push_str("<main class=\"container\">\n");
    html.push_str(
        "<div class=\"hero\"><h1>eConsultation Analysis Platform</h1><p class=\"muted\">Upload your CSV file containing stakeholder comments to get AI-powered sentiment analysis, summaries, and word cloud visualizations.</p></div>\n",
    );

    html.push_str(&render_upload_panel(gate));

    if let Some(error) = gate.last_error() {
        let _ = writeln!(
            html,
            "<div class=\"alert alert-error\" role=\"alert\">{}. Please check the backend and try again.</div>",
            escape_text(error)
        );
    }

    if let Some(result) = gate.last_result() {
        html.push_str(&render_results(result));
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_upload_panel(gate: &UploadGate) -> String {
    let mut html = String::from("<section class=\"panel upload\">\n");
    html.push_str(
        "<form id=\"upload-form\" action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <label id=\"dropzone\" class=\"dropzone\" for=\"file-input\">\n\
         <input id=\"file-input\" type=\"file\" name=\"file\" accept=\".csv,text/csv\">\n\
         <span class=\"dropzone-icon\">&#8679;</span>\n\
         <h3 class=\"dropzone-title\" data-active-text=\"Drop your CSV file here\">Upload CSV File</h3>\n\
         <p class=\"muted\">Drag and drop your stakeholder comments CSV file, or click to browse</p>\n\
         </label>\n\
         <noscript><button type=\"submit\" class=\"secondary-button\">Upload</button></noscript>\n\
         </form>\n",
    );

    if let Some(notice) = gate.notice() {
        let _ = writeln!(
            html,
            "<div class=\"alert alert-notice\">{}</div>",
            escape_text(notice)
        );
    }

    if let Some(held) = gate.held() {
        let button = if gate.is_in_flight() {
            "<button type=\"submit\" class=\"analyze-button\" disabled><span class=\"spinner\"></span>Analyzing...</button>"
        } else {
            "<button type=\"submit\" class=\"analyze-button\">Analyze Comments</button>"
        };
        let _ = writeln!(
            html,
            "<div class=\"held-file\"><div class=\"held-file-info\"><span class=\"icon\">&#128196;</span><div><p class=\"file-name\">{}</p><p class=\"file-size muted\">{}</p></div></div><form action=\"/analyze\" method=\"post\">{button}</form></div>",
            escape_text(&held.name),
            held.size_label()
        );
    }

    html.push_str("</section>\n");
    html
}

/// Tiles, charts, word cloud and comment cards for one analysis result.
pub fn render_results(result: &AnalysisResult) -> String {
    let mut html = String::from("<div id=\"results\" class=\"results\">\n");
    html.push_str(&tiles::render_tiles(result));

    html.push_str("<div class=\"charts\">\n");
    let _ = writeln!(
        html,
        "<section class=\"panel chart sentiment-chart\"><h2 class=\"panel-title\"><span class=\"icon\">&#9684;</span> Sentiment Distribution</h2>{}</section>",
        chart::pie_chart(
            "Sentiment distribution",
            &chart::sentiment_slices(&result.sentiment_analysis)
        )
    );
    if let Some(urgency) = &result.urgency_analysis {
        let _ = writeln!(
            html,
            "<section class=\"panel chart urgency-chart\"><h2 class=\"panel-title\"><span class=\"icon\">&#9888;</span> Urgency Distribution</h2>{}</section>",
            chart::pie_chart("Urgency distribution", &chart::urgency_slices(urgency))
        );
    }
    html.push_str("</div>\n");

    html.push_str(&word_cloud::render_word_cloud(result.word_cloud.as_ref()));
    html.push_str(&comments::render_comment_cards(&result.summaries));
    html.push_str("</div>\n");
    html
}

const HEADER: &str = "<header class=\"site-header\"><div class=\"container header-row\">\
<div class=\"brand\"><span class=\"brand-mark\">&#9636;</span><div><p class=\"brand-title\">eConsultation AI</p><p class=\"muted brand-subtitle\">Ministry of Corporate Affairs</p></div></div>\
<div class=\"header-tag\"><span class=\"icon\">&#9641;</span> Analysis Dashboard</div>\
</div></header>\n";

const STYLE: &str = r#"<style>
    :root {
        --bg: #f8fafc;
        --card: #ffffff;
        --border: #e2e8f0;
        --text: #0f172a;
        --dim: #64748b;
        --primary: #2563eb;
    }
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; background: var(--bg); color: var(--text); line-height: 1.5; }
    .container { max-width: 64rem; margin: 0 auto; padding: 1rem; }
    .muted { color: var(--dim); }
    .icon { display: inline-block; min-width: 1.1em; text-align: center; }
    .site-header { background: var(--card); border-bottom: 1px solid var(--border); }
    .header-row { display: flex; align-items: center; justify-content: space-between; }
    .brand { display: flex; align-items: center; gap: 0.75rem; }
    .brand-mark { background: var(--primary); color: #fff; border-radius: 0.5rem; padding: 0.4rem 0.6rem; }
    .brand-title { font-weight: 700; font-size: 1.2rem; }
    .brand-subtitle { font-size: 0.85rem; }
    .hero { text-align: center; margin: 2rem 0; }
    .hero h1 { font-size: 2.25rem; margin-bottom: 0.75rem; }
    .panel { background: var(--card); border: 1px solid var(--border); border-radius: 0.75rem; padding: 1.5rem; margin-bottom: 1.5rem; }
    .panel-title { font-size: 1.1rem; margin-bottom: 1rem; }
    .dropzone { display: block; border: 2px dashed var(--border); border-radius: 0.5rem; padding: 2rem; text-align: center; cursor: pointer; transition: border-color 0.2s, background 0.2s; }
    .dropzone:hover { border-color: rgba(37, 99, 235, 0.5); }
    .dropzone.drag-active { border-color: var(--primary); background: rgba(37, 99, 235, 0.05); }
    .dropzone input[type=file] { display: none; }
    .dropzone-icon { font-size: 2rem; color: var(--primary); }
    .held-file { display: flex; align-items: center; justify-content: space-between; margin-top: 1.5rem; padding: 1rem; background: var(--bg); border-radius: 0.5rem; }
    .held-file-info { display: flex; align-items: center; gap: 0.75rem; }
    .file-name { font-weight: 600; }
    .analyze-button, .secondary-button { background: var(--primary); color: #fff; border: none; border-radius: 0.4rem; padding: 0.6rem 1.2rem; font-size: 0.95rem; cursor: pointer; }
    .analyze-button[disabled] { opacity: 0.6; cursor: progress; }
    .spinner { display: inline-block; width: 0.9em; height: 0.9em; margin-right: 0.5rem; border: 2px solid #fff; border-right-color: transparent; border-radius: 50%; animation: spin 0.8s linear infinite; vertical-align: -0.1em; }
    @keyframes spin { to { transform: rotate(360deg); } }
    .alert { margin-top: 1rem; padding: 0.75rem 1rem; border-radius: 0.5rem; }
    .alert-notice { background: #fef3c7; color: #92400e; }
    .alert-error { background: #fee2e2; color: #991b1b; margin-bottom: 1.5rem; }
    .tiles { display: grid; grid-template-columns: repeat(auto-fit, minmax(10rem, 1fr)); gap: 1rem; margin-bottom: 1.5rem; }
    .tile { background: var(--card); border: 1px solid var(--border); border-radius: 0.75rem; padding: 1.25rem; }
    .tile-head { display: flex; align-items: center; gap: 0.4rem; font-size: 0.85rem; color: var(--dim); }
    .tile-value { font-size: 1.6rem; font-weight: 700; margin-top: 0.4rem; }
    .tile-caption { font-size: 0.75rem; margin-top: 0.25rem; }
    .sentiment-positive { color: #10B981; }
    .sentiment-negative { color: #EF4444; }
    .sentiment-neutral { color: #6B7280; }
    .progress { height: 0.5rem; background: var(--border); border-radius: 999px; overflow: hidden; margin-top: 0.5rem; }
    .progress-fill { height: 100%; background: var(--primary); }
    .charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(20rem, 1fr)); gap: 1.5rem; }
    .pie-chart { width: 100%; height: auto; }
    .slice-label { font-size: 12px; }
    .chart-empty { text-align: center; padding: 3rem 0; }
    .word-cloud-image { display: block; max-width: 100%; margin: 0 auto; border-radius: 0.5rem; }
    .placeholder { text-align: center; padding: 3rem 0; }
    .keywords { list-style: none; }
    .keywords li { display: grid; grid-template-columns: 8rem 1fr 3rem; align-items: center; gap: 0.5rem; margin-bottom: 0.4rem; }
    .keyword-bar { display: block; height: 0.75rem; background: var(--primary); border-radius: 0.25rem; }
    .comments-caption { margin-bottom: 1rem; font-size: 0.85rem; }
    .comment-card { border: 1px solid var(--border); border-radius: 0.5rem; padding: 1rem; margin-bottom: 1rem; }
    .card-head { display: flex; align-items: center; gap: 0.5rem; margin-bottom: 0.75rem; flex-wrap: wrap; }
    .score { margin-left: auto; font-size: 0.85rem; }
    .badge { display: inline-flex; align-items: center; gap: 0.25rem; padding: 0.15rem 0.6rem; border-radius: 999px; font-size: 0.8rem; font-weight: 600; color: var(--badge-color); border: 1px solid var(--badge-color); }
    .badge-sentiment .badge-text { text-transform: capitalize; }
    .card-section h4 { font-size: 0.85rem; font-weight: 500; }
    .card-section + .card-section { margin-top: 0.5rem; }
    .original-comment { font-size: 0.9rem; font-style: italic; color: var(--dim); }
</style>
"#;
