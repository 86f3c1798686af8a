//! User-facing strings and date formatting for the supported locales.
//!
//! Indonesian is the default because the analysis service and its history
//! records are Indonesian-first. Section headings keep the service's own
//! English terms in both locales.

use chrono::{Datelike, NaiveDateTime, Timelike};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Id,
    En,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Id => write!(f, "id"),
            Locale::En => write!(f, "en"),
        }
    }
}

/// Every string the renderers and the page shell put in front of a user.
#[derive(Debug)]
pub struct Strings {
    pub html_lang: &'static str,
    pub app_title: &'static str,
    pub tagline: &'static str,
    pub start_button: &'static str,
    pub back_button: &'static str,
    pub text_placeholder: &'static str,
    pub analyze_button: &'static str,
    pub loading: &'static str,
    pub heading_history: &'static str,

    pub badge_authentic: &'static str,
    pub badge_hoax: &'static str,
    pub confidence: &'static str,

    pub heading_ai_analysis: &'static str,
    pub label_decision_basis: &'static str,
    pub label_word_count: &'static str,
    pub label_sentiment: &'static str,
    pub label_suspicious: &'static str,
    pub label_trusted_score: &'static str,
    pub label_verification_weight: &'static str,
    pub label_ml_prediction: &'static str,

    pub heading_models: &'static str,
    pub heading_transformers: &'static str,
    pub label_ensemble: &'static str,

    pub heading_verification: &'static str,
    pub label_status: &'static str,
    pub label_verification_score: &'static str,
    pub label_keywords: &'static str,
    pub label_sources_found: &'static str,
    pub heading_trusted_sources: &'static str,
    pub heading_fact_checks: &'static str,
    pub geopolitical_warning: &'static str,

    pub heading_related: &'static str,
    pub label_relevance: &'static str,

    pub heading_explanation: &'static str,

    pub override_notice: &'static str,
    pub strong_verification_notice: &'static str,

    pub history_empty: &'static str,
    pub history_unavailable: &'static str,

    pub empty_text: &'static str,
    pub busy: &'static str,
    pub analyze_failed: &'static str,
}

static ID: Strings = Strings {
    html_lang: "id",
    app_title: "Hoax Lens",
    tagline: "Periksa kebenaran berita sebelum Anda membagikannya.",
    start_button: "Mulai Analisis",
    back_button: "Kembali",
    text_placeholder: "Tempel teks berita di sini...",
    analyze_button: "Analisis Berita",
    loading: "Menganalisis berita...",
    heading_history: "Riwayat Analisis",

    badge_authentic: "FAKTA",
    badge_hoax: "HOAX",
    confidence: "Confidence",

    heading_ai_analysis: "AI Analysis",
    label_decision_basis: "Decision Basis",
    label_word_count: "Word Count",
    label_sentiment: "Sentiment",
    label_suspicious: "Suspicious Indicators",
    label_trusted_score: "Trusted Source Score",
    label_verification_weight: "Verification Weight",
    label_ml_prediction: "ML Prediction",

    heading_models: "ML Models",
    heading_transformers: "Transformer Models",
    label_ensemble: "Ensemble",

    heading_verification: "Real-time Verification",
    label_status: "Status",
    label_verification_score: "Verification Score",
    label_keywords: "Keywords Used",
    label_sources_found: "Sumber ditemukan",
    heading_trusted_sources: "Trusted Sources Found:",
    heading_fact_checks: "Fact-check:",
    geopolitical_warning: "Peringatan: klaim ini terdeteksi sebagai potensi misinformasi geopolitik. \
                           Periksa pernyataan resmi sebelum mempercayai atau menyebarkannya.",

    heading_related: "Berita Terkait dari Sumber Terpercaya",
    label_relevance: "Relevansi",

    heading_explanation: "Penjelasan",

    override_notice: "Keputusan akhir mengesampingkan prediksi mentah model ML berdasarkan verifikasi real-time.",
    strong_verification_notice: "Keputusan ini didukung kuat oleh verifikasi dari sumber terpercaya.",

    history_empty: "Belum ada riwayat analisis.",
    history_unavailable: "Tidak dapat memuat riwayat analisis.",

    empty_text: "Silakan masukkan teks berita terlebih dahulu.",
    busy: "Analisis sebelumnya masih berjalan. Mohon tunggu.",
    analyze_failed: "Terjadi kesalahan saat menganalisis berita. Pastikan server backend berjalan.",
};

static EN: Strings = Strings {
    html_lang: "en",
    app_title: "Hoax Lens",
    tagline: "Check whether a news story holds up before you share it.",
    start_button: "Start Analyzing",
    back_button: "Back",
    text_placeholder: "Paste the news text here...",
    analyze_button: "Analyze News",
    loading: "Analyzing news...",
    heading_history: "Analysis History",

    badge_authentic: "FACT",
    badge_hoax: "HOAX",
    confidence: "Confidence",

    heading_ai_analysis: "AI Analysis",
    label_decision_basis: "Decision Basis",
    label_word_count: "Word Count",
    label_sentiment: "Sentiment",
    label_suspicious: "Suspicious Indicators",
    label_trusted_score: "Trusted Source Score",
    label_verification_weight: "Verification Weight",
    label_ml_prediction: "ML Prediction",

    heading_models: "ML Models",
    heading_transformers: "Transformer Models",
    label_ensemble: "Ensemble",

    heading_verification: "Real-time Verification",
    label_status: "Status",
    label_verification_score: "Verification Score",
    label_keywords: "Keywords Used",
    label_sources_found: "Sources found",
    heading_trusted_sources: "Trusted Sources Found:",
    heading_fact_checks: "Fact Checks:",
    geopolitical_warning: "Warning: this claim was flagged as likely geopolitical misinformation. \
                           Check official statements before believing or sharing it.",

    heading_related: "Related News from Trusted Sources",
    label_relevance: "Relevance",

    heading_explanation: "Explanation",

    override_notice: "The final verdict overrode the raw ML model prediction based on real-time verification.",
    strong_verification_notice: "This verdict is strongly backed by trusted-source verification.",

    history_empty: "No analysis history yet.",
    history_unavailable: "Unable to load analysis history.",

    empty_text: "Please enter some news text first.",
    busy: "An analysis is already running. Please wait.",
    analyze_failed: "Something went wrong while analyzing the news. Make sure the backend server is running.",
};

const MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::Id => &ID,
            Locale::En => &EN,
        }
    }

    /// Short date with two-digit time, e.g. `16 Okt 2026, 13.45` or
    /// `Oct 16, 2026, 01:45 PM`.
    pub fn format_datetime(self, dt: &NaiveDateTime) -> String {
        let month = dt.month0() as usize;
        match self {
            Locale::Id => format!(
                "{} {} {}, {:02}.{:02}",
                dt.day(),
                MONTHS_ID[month],
                dt.year(),
                dt.hour(),
                dt.minute()
            ),
            Locale::En => {
                let (pm, hour12) = dt.hour12();
                format!(
                    "{} {}, {}, {:02}:{:02} {}",
                    MONTHS_EN[month],
                    dt.day(),
                    dt.year(),
                    hour12,
                    dt.minute(),
                    if pm { "PM" } else { "AM" }
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn default_locale_is_indonesian() {
        assert_eq!(Locale::default(), Locale::Id);
        assert_eq!(Locale::default().strings().html_lang, "id");
    }

    #[test]
    fn display_matches_serde_name() {
        assert_eq!(Locale::En.to_string(), "en");
        let json = serde_json::to_string(&Locale::Id).unwrap();
        assert_eq!(json, "\"id\"");
    }

    #[test]
    fn indonesian_date_uses_dot_time_separator() {
        let s = Locale::Id.format_datetime(&at(2026, 10, 16, 13, 45));
        assert_eq!(s, "16 Okt 2026, 13.45");
    }

    #[test]
    fn indonesian_date_pads_hour() {
        let s = Locale::Id.format_datetime(&at(2025, 5, 3, 7, 5));
        assert_eq!(s, "3 Mei 2025, 07.05");
    }

    #[test]
    fn english_date_uses_twelve_hour_clock() {
        assert_eq!(
            Locale::En.format_datetime(&at(2026, 10, 16, 13, 45)),
            "Oct 16, 2026, 01:45 PM"
        );
        assert_eq!(
            Locale::En.format_datetime(&at(2026, 1, 2, 0, 9)),
            "Jan 2, 2026, 12:09 AM"
        );
    }

    #[test]
    fn badge_labels_differ_per_verdict() {
        for locale in [Locale::Id, Locale::En] {
            let s = locale.strings();
            assert_ne!(s.badge_authentic, s.badge_hoax);
        }
    }
}
