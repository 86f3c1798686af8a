//! Turns API responses into display-ready view models.
//!
//! [`ResultView`] and [`HistoryPanel`] hold only what a renderer should show:
//! absent or empty server sections are already dropped here, so neither the
//! HTML templates in [`html`] nor the terminal printer in [`terminal`] has to
//! re-check optional fields.

pub mod html;
pub mod terminal;

use crate::locale::{Locale, Strings};
use crate::model::{
    complement_percents, percent, AnalysisResult, HistoryItem, RealTimeVerification,
    RelatedArticle, RelatedNews, SourceArticle, UserExplanation, Verdict,
};

/// Verification weight above which the verdict counts as verification-driven.
pub const STRONG_VERIFICATION_WEIGHT: f64 = 0.5;

pub(crate) fn fmt_percent(fraction: f64) -> String {
    format!("{:.1}", percent(fraction))
}

/// Relevance is a keyword-hit count; whole numbers print without decimals.
fn fmt_relevance(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

/// Only plain web links become anchors; anything else renders as text.
pub fn safe_href(link: &str) -> Option<String> {
    let trimmed = link.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Drops the `**` emphasis markers the explanation service embeds.
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn joined(items: &[String]) -> Option<String> {
    let parts: Vec<&str> = items
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Override,
    StrongVerification,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub css_class: &'static str,
    pub text: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct ModelRow {
    pub name: String,
    pub label: String,
    pub is_real: bool,
    pub confidence: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransformerSection {
    pub ensemble: Option<String>,
    pub rows: Vec<ModelRow>,
}

#[derive(Debug, Clone)]
pub struct LinkView {
    pub source: String,
    pub title: String,
    pub href: Option<String>,
    pub excerpt: Option<String>,
    pub relevance: Option<String>,
}

impl LinkView {
    fn from_source(a: &SourceArticle) -> Self {
        LinkView {
            source: a.source.clone(),
            title: a.title.clone(),
            href: safe_href(&a.link),
            excerpt: a.excerpt.as_deref().and_then(non_empty),
            relevance: None,
        }
    }

    fn from_related(a: &RelatedArticle) -> Self {
        LinkView {
            source: a.source.clone(),
            title: a.title.clone(),
            href: safe_href(&a.link),
            excerpt: a.excerpt.as_deref().and_then(non_empty),
            relevance: a.relevance_score.map(fmt_relevance),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinkGroup {
    pub heading: &'static str,
    pub links: Vec<LinkView>,
}

#[derive(Debug, Clone)]
pub struct VerificationSection {
    pub message: Option<String>,
    pub score: String,
    pub keywords: Option<String>,
    pub sources_found: Option<u64>,
    pub geopolitical_warning: bool,
    pub groups: Vec<LinkGroup>,
}

impl VerificationSection {
    fn build(v: &RealTimeVerification, s: &'static Strings) -> Self {
        let mut groups = Vec::new();
        if !v.trusted_articles.is_empty() {
            groups.push(LinkGroup {
                heading: s.heading_trusted_sources,
                links: v.trusted_articles.iter().map(LinkView::from_source).collect(),
            });
        }
        if !v.fact_checks.is_empty() {
            groups.push(LinkGroup {
                heading: s.heading_fact_checks,
                links: v.fact_checks.iter().map(LinkView::from_source).collect(),
            });
        }
        VerificationSection {
            message: non_empty(&v.message),
            score: fmt_percent(v.verification_score),
            keywords: joined(&v.keywords_used),
            sources_found: v.total_sources_found,
            geopolitical_warning: v.is_suspicious_geopolitical(),
            groups,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelatedSection {
    pub message: Option<String>,
    pub keywords: Option<String>,
    pub articles: Vec<LinkView>,
}

impl RelatedSection {
    fn build(r: &RelatedNews) -> Option<Self> {
        let section = RelatedSection {
            message: non_empty(&r.message),
            keywords: joined(&r.keywords_used),
            articles: r.related_articles.iter().map(LinkView::from_related).collect(),
        };
        if section.message.is_none() && section.keywords.is_none() && section.articles.is_empty() {
            None
        } else {
            Some(section)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExplanationSection {
    pub summary: Option<String>,
    pub detailed: Option<String>,
    pub fact_check_result: Option<String>,
    pub recommendation: Option<String>,
}

impl ExplanationSection {
    fn build(e: &UserExplanation) -> Option<Self> {
        let clean = |t: &str| non_empty(&strip_emphasis(t));
        let section = ExplanationSection {
            summary: clean(&e.summary),
            detailed: e.detailed_explanation.as_deref().and_then(clean),
            fact_check_result: clean(&e.fact_check_result),
            recommendation: clean(&e.recommendation),
        };
        if section.summary.is_none()
            && section.detailed.is_none()
            && section.fact_check_result.is_none()
            && section.recommendation.is_none()
        {
            None
        } else {
            Some(section)
        }
    }
}

/// Everything the detail view shows for one analysis.
#[derive(Debug, Clone)]
pub struct ResultView {
    pub s: &'static Strings,
    pub verdict: Verdict,
    pub badge_class: &'static str,
    pub badge_label: &'static str,
    pub icon_class: &'static str,
    pub confidence: String,
    pub hoax_percent: String,
    pub fakta_percent: String,
    pub decision_basis: Option<String>,
    pub word_count: u64,
    pub sentiment: String,
    pub suspicious_indicators: u64,
    pub trusted_score: Option<String>,
    pub notice: Option<Notice>,
    pub models: Vec<ModelRow>,
    pub transformers: Option<TransformerSection>,
    pub verification: Option<VerificationSection>,
    pub related: Option<RelatedSection>,
    pub explanation: Option<ExplanationSection>,
}

impl ResultView {
    pub fn build(result: &AnalysisResult, locale: Locale) -> Self {
        let s = locale.strings();
        let verdict = result.verdict();
        let (hoax, fakta) = complement_percents(verdict, result.confidence);

        ResultView {
            s,
            verdict,
            badge_class: if verdict.is_authentic() { "fakta" } else { "hoax" },
            badge_label: if verdict.is_authentic() { s.badge_authentic } else { s.badge_hoax },
            icon_class: if verdict.is_authentic() {
                "fas fa-check-circle"
            } else {
                "fas fa-exclamation-triangle"
            },
            confidence: fmt_percent(result.confidence),
            hoax_percent: format!("{hoax:.1}"),
            fakta_percent: format!("{fakta:.1}"),
            decision_basis: non_empty(&result.decision_basis),
            word_count: result.analysis.word_count,
            sentiment: result.analysis.sentiment.clone(),
            suspicious_indicators: result.analysis.suspicious_indicators,
            trusted_score: result.trusted_sources_score.map(fmt_percent),
            notice: notice_for(result, s),
            models: result
                .individual_predictions
                .iter()
                .map(|(name, vote)| ModelRow {
                    name: name.clone(),
                    label: vote.prediction.clone(),
                    is_real: Verdict::from_label(&vote.prediction).is_authentic(),
                    confidence: Some(fmt_percent(vote.confidence)),
                    error: None,
                })
                .collect(),
            transformers: result.huggingface_details.as_ref().and_then(|d| {
                let rows: Vec<ModelRow> = d
                    .individual_results
                    .iter()
                    .map(|(name, vote)| ModelRow {
                        name: name.clone(),
                        label: vote.prediction.clone(),
                        is_real: vote.is_real(),
                        confidence: vote.confidence.map(fmt_percent),
                        error: vote.error.as_deref().and_then(non_empty),
                    })
                    .collect();
                let ensemble = d.prediction.as_deref().and_then(non_empty).map(|label| {
                    match d.confidence {
                        Some(c) => format!("{label} ({}%)", fmt_percent(c)),
                        None => label,
                    }
                });
                if rows.is_empty() && ensemble.is_none() {
                    None
                } else {
                    Some(TransformerSection { ensemble, rows })
                }
            }),
            verification: result
                .real_time_verification
                .as_ref()
                .map(|v| VerificationSection::build(v, s)),
            related: result.related_authentic_news.as_ref().and_then(RelatedSection::build),
            explanation: result.user_explanation.as_ref().and_then(ExplanationSection::build),
        }
    }
}

/// The override notice wins over the strong-verification notice.
fn notice_for(result: &AnalysisResult, s: &'static Strings) -> Option<Notice> {
    if result.overrides_ml() {
        let ml = result.ml_prediction.clone().unwrap_or_default();
        let detail = match result.ml_confidence {
            Some(c) => format!("{}: {ml} ({}%)", s.label_ml_prediction, fmt_percent(c)),
            None => format!("{}: {ml}", s.label_ml_prediction),
        };
        return Some(Notice {
            kind: NoticeKind::Override,
            css_class: "notice-override",
            text: s.override_notice,
            detail,
        });
    }
    match result.verification_weight {
        Some(w) if w > STRONG_VERIFICATION_WEIGHT => Some(Notice {
            kind: NoticeKind::StrongVerification,
            css_class: "notice-verified",
            text: s.strong_verification_notice,
            detail: format!("{}: {}%", s.label_verification_weight, fmt_percent(w)),
        }),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct HistoryCard {
    pub item_class: &'static str,
    pub badge_class: &'static str,
    pub badge_label: &'static str,
    pub date: String,
    pub preview: String,
    pub ellipsis: bool,
    pub confidence: String,
}

impl HistoryCard {
    pub fn build(item: &HistoryItem, locale: Locale) -> Self {
        let s = locale.strings();
        let authentic = item.verdict().is_authentic();
        HistoryCard {
            item_class: if authentic { "" } else { "fake" },
            badge_class: if authentic { "real" } else { "fake" },
            badge_label: if authentic { s.badge_authentic } else { s.badge_hoax },
            date: item
                .parsed_timestamp()
                .map(|dt| locale.format_datetime(&dt))
                .unwrap_or_else(|| item.timestamp.trim().to_string()),
            preview: item.preview.clone(),
            ellipsis: item.is_truncated(),
            confidence: fmt_percent(item.confidence),
        }
    }
}

/// What the history panel shows.
#[derive(Debug, Clone)]
pub enum HistoryPanel {
    Items(Vec<HistoryCard>),
    Empty,
    Unavailable,
}

impl HistoryPanel {
    pub fn from_items(items: &[HistoryItem], locale: Locale) -> Self {
        if items.is_empty() {
            HistoryPanel::Empty
        } else {
            HistoryPanel::Items(items.iter().map(|i| HistoryCard::build(i, locale)).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelVote, TextAnalysis};
    use std::collections::BTreeMap;

    fn result(prediction: &str, confidence: f64) -> AnalysisResult {
        AnalysisResult {
            prediction: prediction.into(),
            confidence,
            decision_basis: "Real-time verification".into(),
            verification_weight: None,
            analysis: TextAnalysis {
                word_count: 10,
                sentiment: "Neutral".into(),
                suspicious_indicators: 0,
            },
            trusted_sources_score: None,
            ml_prediction: None,
            ml_confidence: None,
            individual_predictions: BTreeMap::new(),
            huggingface_details: None,
            real_time_verification: None,
            related_authentic_news: None,
            user_explanation: None,
        }
    }

    #[test]
    fn real_prediction_selects_authentic_badge() {
        let v = ResultView::build(&result("Real", 0.9), Locale::Id);
        assert_eq!(v.badge_class, "fakta");
        assert_eq!(v.badge_label, "FAKTA");
        assert_eq!(v.fakta_percent, "90.0");
        assert_eq!(v.hoax_percent, "10.0");
    }

    #[test]
    fn other_prediction_selects_hoax_badge() {
        let v = ResultView::build(&result("Fake", 0.75), Locale::En);
        assert_eq!(v.badge_class, "hoax");
        assert_eq!(v.hoax_percent, "75.0");
        assert_eq!(v.fakta_percent, "25.0");
    }

    #[test]
    fn override_notice_takes_priority() {
        let mut r = result("Real", 0.9);
        r.ml_prediction = Some("Fake".into());
        r.verification_weight = Some(0.8);
        let notice = ResultView::build(&r, Locale::En).notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Override);
        assert!(notice.detail.contains("Fake"));
    }

    #[test]
    fn strong_verification_notice_when_predictions_agree() {
        let mut r = result("Real", 0.9);
        r.ml_prediction = Some("Real".into());
        r.verification_weight = Some(0.6);
        let notice = ResultView::build(&r, Locale::En).notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::StrongVerification);
    }

    #[test]
    fn no_notice_at_threshold() {
        let mut r = result("Real", 0.9);
        r.verification_weight = Some(0.5);
        assert!(ResultView::build(&r, Locale::En).notice.is_none());
    }

    #[test]
    fn empty_related_news_is_dropped() {
        let mut r = result("Fake", 0.6);
        r.related_authentic_news = Some(RelatedNews::default());
        assert!(ResultView::build(&r, Locale::Id).related.is_none());
    }

    #[test]
    fn empty_explanation_is_dropped() {
        let mut r = result("Fake", 0.6);
        r.user_explanation = Some(UserExplanation::default());
        assert!(ResultView::build(&r, Locale::Id).explanation.is_none());
    }

    #[test]
    fn verification_without_articles_has_no_groups() {
        let mut r = result("Fake", 0.6);
        r.real_time_verification = Some(RealTimeVerification {
            message: "Ditemukan 0 artikel".into(),
            ..Default::default()
        });
        let v = ResultView::build(&r, Locale::Id).verification.unwrap();
        assert!(v.groups.is_empty());
        assert!(v.keywords.is_none());
        assert_eq!(v.score, "0.0");
    }

    #[test]
    fn model_rows_carry_confidence() {
        let mut r = result("Fake", 0.6);
        r.individual_predictions.insert(
            "naive_bayes".into(),
            ModelVote { prediction: "Fake".into(), confidence: 0.655 },
        );
        let v = ResultView::build(&r, Locale::Id);
        assert_eq!(v.models.len(), 1);
        assert!(!v.models[0].is_real);
        assert_eq!(v.models[0].confidence.as_deref(), Some("65.5"));
    }

    #[test]
    fn safe_href_accepts_only_web_links() {
        assert_eq!(safe_href(" https://kompas.com/a "), Some("https://kompas.com/a".into()));
        assert_eq!(safe_href("HTTP://x.id"), Some("HTTP://x.id".into()));
        assert_eq!(safe_href("javascript:alert(1)"), None);
        assert_eq!(safe_href("/relative"), None);
        assert_eq!(safe_href(""), None);
    }

    #[test]
    fn relevance_prints_whole_counts() {
        assert_eq!(fmt_relevance(3.0), "3");
        assert_eq!(fmt_relevance(2.5), "2.5");
    }

    #[test]
    fn strip_emphasis_removes_markers() {
        assert_eq!(strip_emphasis("**Konteks:** isi"), "Konteks: isi");
    }

    #[test]
    fn history_panel_empty_list() {
        assert!(matches!(HistoryPanel::from_items(&[], Locale::Id), HistoryPanel::Empty));
    }

    #[test]
    fn history_card_falls_back_to_raw_timestamp() {
        let item = HistoryItem {
            id: None,
            prediction: "Real".into(),
            confidence: 0.81,
            timestamp: "kemarin".into(),
            preview: "Berita".into(),
        };
        let card = HistoryCard::build(&item, Locale::Id);
        assert_eq!(card.date, "kemarin");
        assert_eq!(card.badge_class, "real");
        assert_eq!(card.confidence, "81.0");
        assert!(!card.ellipsis);
    }
}
