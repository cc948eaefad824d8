//! The analysis result contract returned by the backend.
//!
//! The relay passes backend JSON through untouched; these types are only
//! used by the dashboard renderer and for the API documentation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sentiment_analysis: SentimentCounts,
    #[serde(default)]
    pub summaries: Vec<CommentSummary>,
    /// An unrecognised shape is dropped rather than failing the result.
    #[serde(default, deserialize_with = "lenient_word_cloud")]
    pub word_cloud: Option<WordCloud>,
    /// Absent in backends that predate urgency detection.
    #[serde(default)]
    pub urgency_analysis: Option<UrgencyCounts>,
    #[serde(default)]
    #[schema(example = 0.87)]
    pub average_sentiment_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentCounts {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
    /// Expected to equal the sum of the three counts; not enforced.
    pub total_comments: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyCounts {
    pub critical: u64,
    pub moderate: u64,
    pub minor: u64,
    pub not_applicable: u64,
}

/// One analyzed comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentSummary {
    #[schema(example = "0")]
    pub id: String,
    pub original_comment: String,
    pub summary: String,
    #[schema(example = "positive")]
    pub sentiment: String,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    #[schema(example = "Critical")]
    pub urgency: Option<String>,
}

/// Word cloud payload. Current backends send a rendered image, older ones a
/// frequency list. The variants are told apart by the `image` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum WordCloud {
    Image(WordCloudImage),
    Frequencies(Vec<WordFrequency>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WordCloudImage {
    /// Base64 encoded raster image.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    #[schema(example = "base64")]
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WordFrequency {
    pub word: String,
    pub frequency: f64,
}

impl WordCloud {
    /// The image payload, if this is an image cloud with actual data.
    pub fn image(&self) -> Option<&WordCloudImage> {
        match self {
            WordCloud::Image(img) if img.data().is_some() => Some(img),
            _ => None,
        }
    }
}

impl WordCloudImage {
    /// Trimmed base64 data, `None` when absent or blank.
    pub fn data(&self) -> Option<&str> {
        self.image
            .as_deref()
            .map(str::trim)
            .filter(|data| !data.is_empty())
    }
}

fn lenient_word_cloud<'de, D>(deserializer: D) -> Result<Option<WordCloud>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match serde_json::from_value(raw) {
        Ok(cloud) => Ok(Some(cloud)),
        Err(e) => {
            warn!("Ignoring unrecognised word cloud: {e}");
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Unknown labels are styled as neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Critical,
    Moderate,
    Minor,
    NotApplicable,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::Critical,
        Urgency::Moderate,
        Urgency::Minor,
        Urgency::NotApplicable,
    ];

    /// Case-insensitive match against the four known labels.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Urgency::ALL
            .into_iter()
            .find(|u| u.label().eq_ignore_ascii_case(label))
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Critical => "Critical",
            Urgency::Moderate => "Moderate",
            Urgency::Minor => "Minor",
            Urgency::NotApplicable => "Not Applicable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_current_backend_payload() {
        let payload = json!({
            "sentimentAnalysis": {"positive": 2, "negative": 1, "neutral": 0, "totalComments": 3},
            "summaries": [{
                "id": "0",
                "originalComment": "The new filing rules are confusing.",
                "summary": "Rules are confusing.",
                "sentiment": "negative",
                "sentimentScore": 0.91,
                "urgency": "moderate"
            }],
            "wordCloud": {"image": "iVBORw0KGgo=", "format": "base64"},
            "urgencyAnalysis": {"critical": 0, "moderate": 1, "minor": 0, "notApplicable": 2},
            "averageSentimentScore": 0.8
        });

        let result: AnalysisResult = serde_json::from_value(payload).unwrap();
        assert_eq!(result.sentiment_analysis.total_comments, 3);
        assert_eq!(result.summaries[0].sentiment_score, Some(0.91));
        assert_eq!(result.urgency_analysis.unwrap().not_applicable, 2);
        let cloud = result.word_cloud.unwrap();
        assert_eq!(cloud.image().unwrap().format, "base64");
    }

    #[test]
    fn test_parse_legacy_word_cloud() {
        let payload = json!({
            "sentimentAnalysis": {"positive": 1, "negative": 0, "neutral": 0, "totalComments": 1},
            "summaries": [],
            "wordCloud": [{"word": "clarity", "frequency": 4}, {"word": "delay", "frequency": 2}]
        });

        let result: AnalysisResult = serde_json::from_value(payload).unwrap();
        match result.word_cloud {
            Some(WordCloud::Frequencies(words)) => {
                assert_eq!(words.len(), 2);
                assert_eq!(words[0].word, "clarity");
            }
            other => panic!("expected frequencies, got {:?}", other),
        }
        assert!(result.urgency_analysis.is_none());
        assert!(result.average_sentiment_score.is_none());
    }

    #[test]
    fn test_empty_image_counts_as_missing() {
        let cloud = WordCloud::Image(WordCloudImage {
            image: Some("  ".to_string()),
            format: "base64".to_string(),
        });
        assert!(cloud.image().is_none());
    }

    #[test]
    fn test_word_cloud_without_image_keeps_result() {
        let shapes = [
            json!({}),
            json!({"image": null, "format": "base64"}),
            json!({"format": "base64"}),
            json!("not a cloud"),
            json!(42),
        ];
        for shape in shapes {
            let payload = json!({
                "sentimentAnalysis": {"positive": 1, "negative": 0, "neutral": 0, "totalComments": 1},
                "summaries": [],
                "wordCloud": shape
            });

            let result: AnalysisResult = serde_json::from_value(payload).unwrap();
            assert_eq!(result.sentiment_analysis.total_comments, 1);
            assert!(result.word_cloud.as_ref().and_then(WordCloud::image).is_none());
        }
    }

    #[test]
    fn test_null_word_cloud_is_none() {
        let payload = json!({
            "sentimentAnalysis": {"positive": 0, "negative": 0, "neutral": 0, "totalComments": 0},
            "wordCloud": null
        });
        let result: AnalysisResult = serde_json::from_value(payload).unwrap();
        assert!(result.word_cloud.is_none());
    }

    #[test]
    fn test_urgency_matching_ignores_case() {
        assert_eq!(Urgency::from_label("CRITICAL"), Some(Urgency::Critical));
        assert_eq!(Urgency::from_label("minor"), Some(Urgency::Minor));
        assert_eq!(Urgency::from_label("not applicable"), Some(Urgency::NotApplicable));
        assert_eq!(Urgency::from_label("urgent"), None);
    }

    #[test]
    fn test_unknown_sentiment_is_neutral() {
        assert_eq!(Sentiment::from_label("POSITIVE"), Sentiment::Positive);
        assert_eq!(Sentiment::from_label("mixed"), Sentiment::Neutral);
    }
}
