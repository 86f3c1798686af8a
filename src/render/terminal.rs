use colored::*;

use crate::locale::Locale;
use crate::render::{HistoryPanel, LinkView, NoticeKind, ResultView};

fn push_line(out: &mut String, line: impl std::fmt::Display) {
    out.push_str(&line.to_string());
    out.push('\n');
}

/// Server text with every control character (ESC, CR, C1, ...) removed.
/// Tabs and newlines become spaces so one field stays on one line.
pub fn plain(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\t' | '\n' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

fn push_link(out: &mut String, link: &LinkView) {
    let mut line = format!("    - {}: {}", plain(&link.source).bold(), plain(&link.title));
    if let Some(score) = &link.relevance {
        line.push_str(&format!(" [{}]", score).dimmed().to_string());
    }
    push_line(out, line);
    if let Some(href) = &link.href {
        push_line(out, format!("      {}", plain(href).bright_blue().underline()));
    }
    if let Some(excerpt) = &link.excerpt {
        push_line(out, format!("      {}", plain(excerpt).dimmed()));
    }
}

/// Colored, multi-line rendering of a result for the terminal.
pub fn format_result(view: &ResultView) -> String {
    let s = view.s;
    let mut out = String::new();

    let badge = format!(" {} ", view.badge_label);
    let badge = if view.verdict.is_authentic() {
        badge.black().on_bright_green().bold()
    } else {
        badge.white().on_red().bold()
    };
    push_line(&mut out, format!("{}  {}: {}%", badge, s.confidence, view.confidence));
    push_line(
        &mut out,
        format!(
            "  {} {}%   {} {}%",
            s.badge_hoax.red(),
            view.hoax_percent,
            s.badge_authentic.green(),
            view.fakta_percent
        ),
    );

    if let Some(notice) = &view.notice {
        let text = match notice.kind {
            NoticeKind::Override => notice.text.bright_yellow(),
            NoticeKind::StrongVerification => notice.text.bright_cyan(),
        };
        push_line(&mut out, format!("  {} ({})", text, plain(&notice.detail)));
    }

    push_line(&mut out, "");
    push_line(&mut out, s.heading_ai_analysis.bright_blue().bold());
    if let Some(basis) = &view.decision_basis {
        push_line(&mut out, format!("  {}: {}", s.label_decision_basis, plain(basis)));
    }
    push_line(&mut out, format!("  {}: {}", s.label_word_count, view.word_count));
    push_line(&mut out, format!("  {}: {}", s.label_sentiment, plain(&view.sentiment)));
    push_line(&mut out, format!("  {}: {}", s.label_suspicious, view.suspicious_indicators));
    if let Some(score) = &view.trusted_score {
        push_line(&mut out, format!("  {}: {}%", s.label_trusted_score, score));
    }

    let model_rows = [(s.heading_models, &view.models)]
        .into_iter()
        .chain(view.transformers.as_ref().map(|t| (s.heading_transformers, &t.rows)));
    for (heading, rows) in model_rows {
        if rows.is_empty() {
            continue;
        }
        push_line(&mut out, "");
        push_line(&mut out, heading.bright_blue().bold());
        for row in rows {
            let label = plain(&row.label);
            let label = if row.is_real { label.green() } else { label.red() };
            let mut line = format!("  {}: {}", plain(&row.name), label);
            if let Some(c) = &row.confidence {
                line.push_str(&format!(" ({}%)", c));
            }
            if let Some(err) = &row.error {
                line.push_str(&format!(" {}", plain(err).dimmed()));
            }
            push_line(&mut out, line);
        }
    }
    if let Some(ensemble) = view.transformers.as_ref().and_then(|t| t.ensemble.as_ref()) {
        push_line(&mut out, format!("  {}: {}", s.label_ensemble, plain(ensemble)));
    }

    if let Some(rtv) = &view.verification {
        push_line(&mut out, "");
        push_line(&mut out, s.heading_verification.bright_blue().bold());
        if rtv.geopolitical_warning {
            push_line(&mut out, format!("  {}", s.geopolitical_warning.bright_yellow().bold()));
        }
        if let Some(message) = &rtv.message {
            push_line(&mut out, format!("  {}: {}", s.label_status, plain(message)));
        }
        push_line(&mut out, format!("  {}: {}%", s.label_verification_score, rtv.score));
        if let Some(found) = rtv.sources_found {
            push_line(&mut out, format!("  {}: {}", s.label_sources_found, found));
        }
        if let Some(keywords) = &rtv.keywords {
            push_line(&mut out, format!("  {}: {}", s.label_keywords, plain(keywords)));
        }
        for group in &rtv.groups {
            push_line(&mut out, format!("  {}", group.heading.bold()));
            for link in &group.links {
                push_link(&mut out, link);
            }
        }
    }

    if let Some(related) = &view.related {
        push_line(&mut out, "");
        push_line(&mut out, s.heading_related.bright_blue().bold());
        if let Some(message) = &related.message {
            push_line(&mut out, format!("  {}", plain(message)));
        }
        if let Some(keywords) = &related.keywords {
            push_line(&mut out, format!("  {}: {}", s.label_keywords, plain(keywords)));
        }
        for link in &related.articles {
            push_link(&mut out, link);
        }
    }

    if let Some(ex) = &view.explanation {
        push_line(&mut out, "");
        push_line(&mut out, s.heading_explanation.bright_blue().bold());
        for text in [&ex.summary, &ex.detailed, &ex.fact_check_result, &ex.recommendation]
            .into_iter()
            .flatten()
        {
            for line in text.lines() {
                push_line(&mut out, format!("  {}", plain(line)));
            }
        }
    }

    out
}

pub fn format_history(panel: &HistoryPanel, locale: Locale) -> String {
    let s = locale.strings();
    let cards = match panel {
        HistoryPanel::Items(cards) => cards,
        HistoryPanel::Empty => return format!("{}\n", s.history_empty.dimmed()),
        HistoryPanel::Unavailable => return format!("{}\n", s.history_unavailable.red()),
    };

    let mut out = String::new();
    push_line(&mut out, s.heading_history.bright_blue().bold());
    for card in cards {
        let badge = format!("{:<5}", card.badge_label);
        let badge = if card.badge_class == "real" { badge.green().bold() } else { badge.red().bold() };
        push_line(
            &mut out,
            format!("  {} {}  {}%", badge, plain(&card.date).dimmed(), card.confidence),
        );
        let ellipsis = if card.ellipsis { "..." } else { "" };
        push_line(&mut out, format!("    {}{}", plain(&card.preview), ellipsis));
    }
    out
}
