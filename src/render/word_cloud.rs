use std::fmt::Write;

use crate::model::{WordCloud, WordCloudImage};

use super::escape_text;

const MAX_KEYWORDS: usize = 10;

pub fn render_word_cloud(cloud: Option<&WordCloud>) -> String {
    let mut html = String::from(
        "<section class=\"panel word-cloud\">\n<h2 class=\"panel-title\"><span class=\"icon\">&#9729;</span> Word Cloud</h2>\n",
    );

    match cloud {
        Some(WordCloud::Frequencies(words)) if !words.is_empty() => {
            let max = words
                .iter()
                .take(MAX_KEYWORDS)
                .map(|w| w.frequency)
                .fold(0.0_f64, f64::max);
            html.push_str("<ol class=\"keywords\">\n");
            for word in words.iter().take(MAX_KEYWORDS) {
                let width = if max > 0.0 { word.frequency / max * 100.0 } else { 0.0 };
                let _ = writeln!(
                    html,
                    "<li><span class=\"keyword\">{}</span><span class=\"keyword-bar\" style=\"width: {width:.1}%\"></span><span class=\"muted\">{}</span></li>",
                    escape_text(&word.word),
                    word.frequency
                );
            }
            html.push_str("</ol>\n");
        }
        _ => match cloud
            .and_then(WordCloud::image)
            .and_then(|image| image.data().map(|data| (image, data)))
        {
            Some((image, data)) => {
                let _ = writeln!(
                    html,
                    "<img class=\"word-cloud-image\" alt=\"Word cloud of frequent sentiment words\" src=\"data:{};base64,{}\">",
                    image_mime(image),
                    escape_text(data)
                );
            }
            None => html.push_str("<p class=\"muted placeholder\">Word cloud not available</p>\n"),
        },
    }

    html.push_str("</section>\n");
    html
}

const DEFAULT_MIME: &str = "image/png";

/// Mime type for the data URI. The backend reports the encoding
/// (`base64`) rather than the image type; that and an empty value mean PNG.
/// Anything that is not a plain `image/<subtype>` also falls back to PNG.
fn image_mime(image: &WordCloudImage) -> String {
    let format = image.format.trim().to_ascii_lowercase();
    let subtype = match format.as_str() {
        "" | "base64" | "png" => return DEFAULT_MIME.to_string(),
        "jpg" => "jpeg",
        "svg" => "svg+xml",
        other => other.strip_prefix("image/").unwrap_or(other),
    };

    if is_mime_token(subtype) {
        format!("image/{subtype}")
    } else {
        DEFAULT_MIME.to_string()
    }
}

fn is_mime_token(subtype: &str) -> bool {
    !subtype.is_empty()
        && subtype
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-'))
}
