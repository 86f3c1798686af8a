//! Wire types for the analysis API.
//!
//! Field names mirror the server's JSON. Every optional section is an
//! `Option` (or a defaulted collection) so that a missing key never reaches a
//! renderer as a placeholder value. Unknown keys are ignored.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The exact label the server uses for an authentic verdict.
pub const REAL_LABEL: &str = "Real";

/// Claim type the verification service assigns to likely geopolitical hoaxes.
pub const SUSPICIOUS_GEOPOLITICAL_CLAIM: &str = "suspicious_geopolitical_claim";

/// Previews at least this long were truncated by the server.
pub const PREVIEW_TRUNCATION_CHARS: usize = 100;

/// Binary badge derived from a prediction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authentic,
    Hoax,
}

impl Verdict {
    /// `"Real"` (case-sensitive) is authentic; any other label is a hoax.
    pub fn from_label(label: &str) -> Self {
        if label == REAL_LABEL {
            Verdict::Authentic
        } else {
            Verdict::Hoax
        }
    }

    pub fn is_authentic(self) -> bool {
        self == Verdict::Authentic
    }
}

/// Body of `POST {base}/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextAnalysis {
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub suspicious_indicators: u64,
}

/// One classical model's vote (`"Real"` / `"Fake"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVote {
    pub prediction: String,
    pub confidence: f64,
}

/// One transformer model's output. Labels are upper-case (`"REAL"`, `"FAKE"`),
/// and a model that failed reports `"ERROR"` without a confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformerVote {
    pub prediction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransformerVote {
    pub fn is_real(&self) -> bool {
        self.prediction == "REAL"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HuggingfaceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub individual_results: BTreeMap<String, TransformerVote>,
}

/// A search hit from a trusted outlet or a fact-checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceArticle {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealTimeVerification {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub verification_score: f64,
    #[serde(default)]
    pub keywords_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<String>,
    #[serde(default)]
    pub trusted_articles: Vec<SourceArticle>,
    #[serde(default)]
    pub fact_checks: Vec<SourceArticle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sources_found: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_question: Option<bool>,
}

impl RealTimeVerification {
    pub fn is_suspicious_geopolitical(&self) -> bool {
        self.claim_type.as_deref() == Some(SUSPICIOUS_GEOPOLITICAL_CLAIM)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedArticle {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedNews {
    #[serde(default)]
    pub related_articles: Vec<RelatedArticle>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub keywords_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_found: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserExplanation {
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_explanation: Option<String>,
    #[serde(default)]
    pub fact_check_result: String,
    #[serde(default)]
    pub recommendation: String,
}

/// Response of `POST {base}/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub prediction: String,
    pub confidence: f64,
    #[serde(default)]
    pub decision_basis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_weight: Option<f64>,
    #[serde(default)]
    pub analysis: TextAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_sources_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_prediction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ml_confidence: Option<f64>,
    #[serde(default)]
    pub individual_predictions: BTreeMap<String, ModelVote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub huggingface_details: Option<HuggingfaceDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_time_verification: Option<RealTimeVerification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_authentic_news: Option<RelatedNews>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_explanation: Option<UserExplanation>,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(&self.prediction)
    }

    /// `true` when the raw ML vote is known and disagrees with the final label.
    pub fn overrides_ml(&self) -> bool {
        self.ml_prediction
            .as_deref()
            .is_some_and(|ml| ml != self.prediction)
    }
}

/// One row of `GET {base}/history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub prediction: String,
    pub confidence: f64,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub preview: String,
}

impl HistoryItem {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_label(&self.prediction)
    }

    /// The server stores at most 100 characters; a preview of that length was cut.
    pub fn is_truncated(&self) -> bool {
        self.preview.chars().count() >= PREVIEW_TRUNCATION_CHARS
    }

    /// Parses RFC 3339 as well as the SQL `YYYY-MM-DD HH:MM:SS` form.
    /// Offset timestamps keep their own wall-clock time.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }
}

/// Response of `GET {base}/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Percentage with one decimal, rounding ties away from zero.
pub fn percent(fraction: f64) -> f64 {
    round_tenth(fraction.clamp(0.0, 1.0) * 100.0)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `(hoax, fakta)` bar widths for a verdict and its confidence.
pub fn complement_percents(verdict: Verdict, confidence: f64) -> (f64, f64) {
    let pct = percent(confidence);
    let rest = round_tenth(100.0 - pct);
    match verdict {
        Verdict::Authentic => (rest, pct),
        Verdict::Hoax => (pct, rest),
    }
}
