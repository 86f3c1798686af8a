//! HTML fragments and the page shell.
//!
//! All markup goes through askama templates with HTML auto-escaping, so text
//! supplied by the analysis server (titles, messages, excerpts, keywords) can
//! never inject elements or attributes.

use askama::Template;

use crate::locale::{Locale, Strings};
use crate::model::{AnalysisResult, HistoryItem};
use crate::render::{HistoryCard, HistoryPanel, ResultView};

#[derive(Template)]
#[template(
    source = r#"<div class="result-selection">
  <div class="choice-box hoax-box{% if !view.verdict.is_authentic() %} selected{% endif %}" data-choice="hoax">
    <span class="choice-label">{{ view.s.badge_hoax }}</span>
    <div class="confidence-bar"><div class="confidence-fill hoax" style="width: {{ view.hoax_percent }}%"></div></div>
    <span class="choice-percent">{{ view.hoax_percent }}%</span>
  </div>
  <div class="choice-box fakta-box{% if view.verdict.is_authentic() %} selected{% endif %}" data-choice="fakta">
    <span class="choice-label">{{ view.s.badge_authentic }}</span>
    <div class="confidence-bar"><div class="confidence-fill fakta" style="width: {{ view.fakta_percent }}%"></div></div>
    <span class="choice-percent">{{ view.fakta_percent }}%</span>
  </div>
</div>
<div class="result-summary">
  <div class="result-badge {{ view.badge_class }}">
    <i class="{{ view.icon_class }}"></i>
    <h3>{{ view.badge_label }}</h3>
    <p>{{ view.s.confidence }}: {{ view.confidence }}%</p>
  </div>
</div>
{% if let Some(notice) = view.notice %}
<div class="notice {{ notice.css_class }}">
  <p>{{ notice.text }}</p>
  <small>{{ notice.detail }}</small>
</div>
{% endif %}
<div class="analysis-details">
  <div class="detail-section" data-section="analysis">
    <h5><i class="fas fa-robot"></i> {{ view.s.heading_ai_analysis }}</h5>
    {% if let Some(basis) = view.decision_basis %}<p><strong>{{ view.s.label_decision_basis }}:</strong> {{ basis }}</p>{% endif %}
    <p><strong>{{ view.s.label_word_count }}:</strong> {{ view.word_count }}</p>
    <p><strong>{{ view.s.label_sentiment }}:</strong> {{ view.sentiment }}</p>
    <p><strong>{{ view.s.label_suspicious }}:</strong> {{ view.suspicious_indicators }}</p>
    {% if let Some(score) = view.trusted_score %}<p><strong>{{ view.s.label_trusted_score }}:</strong> {{ score }}%</p>{% endif %}
  </div>
  {% if !view.models.is_empty() %}
  <div class="detail-section" data-section="models">
    <h5><i class="fas fa-chart-bar"></i> {{ view.s.heading_models }}</h5>
    <div class="model-results">
      {% for row in view.models %}
      <div class="model-result">
        <strong>{{ row.name }}:</strong>
        <span class="{% if row.is_real %}text-success{% else %}text-danger{% endif %}">{{ row.label }}</span>
        {% if let Some(c) = row.confidence %}({{ c }}%){% endif %}
      </div>
      {% endfor %}
    </div>
  </div>
  {% endif %}
  {% if let Some(tf) = view.transformers %}
  <div class="detail-section" data-section="transformers">
    <h5><i class="fas fa-brain"></i> {{ view.s.heading_transformers }}</h5>
    {% if let Some(ensemble) = tf.ensemble %}<p><strong>{{ view.s.label_ensemble }}:</strong> {{ ensemble }}</p>{% endif %}
    <div class="model-results">
      {% for row in tf.rows %}
      <div class="model-result">
        <strong>{{ row.name }}:</strong>
        <span class="{% if row.is_real %}text-success{% else %}text-danger{% endif %}">{{ row.label }}</span>
        {% if let Some(c) = row.confidence %}({{ c }}%){% endif %}
        {% if let Some(err) = row.error %}<small class="model-error">{{ err }}</small>{% endif %}
      </div>
      {% endfor %}
    </div>
  </div>
  {% endif %}
  {% if let Some(rtv) = view.verification %}
  <div class="detail-section" data-section="verification">
    <h5><i class="fas fa-search"></i> {{ view.s.heading_verification }}</h5>
    {% if rtv.geopolitical_warning %}
    <div class="warning-callout"><i class="fas fa-exclamation-triangle"></i> {{ view.s.geopolitical_warning }}</div>
    {% endif %}
    {% if let Some(message) = rtv.message %}<p><strong>{{ view.s.label_status }}:</strong> {{ message }}</p>{% endif %}
    <p><strong>{{ view.s.label_verification_score }}:</strong> {{ rtv.score }}%</p>
    {% if let Some(found) = rtv.sources_found %}<p><strong>{{ view.s.label_sources_found }}:</strong> {{ found }}</p>{% endif %}
    {% if let Some(keywords) = rtv.keywords %}<p><strong>{{ view.s.label_keywords }}:</strong> {{ keywords }}</p>{% endif %}
    {% for group in rtv.groups %}
    <div class="trusted-sources">
      <h6>{{ group.heading }}</h6>
      {% for link in group.links %}
      <div class="source-item">
        <strong>{{ link.source }}:</strong>
        {% if let Some(href) = link.href %}<a href="{{ href }}" target="_blank" rel="noopener noreferrer">{{ link.title }}</a>{% else %}<span>{{ link.title }}</span>{% endif %}
        {% if let Some(excerpt) = link.excerpt %}<p class="source-excerpt">{{ excerpt }}</p>{% endif %}
      </div>
      {% endfor %}
    </div>
    {% endfor %}
  </div>
  {% endif %}
  {% if let Some(related) = view.related %}
  <div class="detail-section" data-section="related">
    <h5><i class="fas fa-newspaper"></i> {{ view.s.heading_related }}</h5>
    {% if let Some(message) = related.message %}<p>{{ message }}</p>{% endif %}
    {% if let Some(keywords) = related.keywords %}<p><strong>{{ view.s.label_keywords }}:</strong> {{ keywords }}</p>{% endif %}
    {% for link in related.articles %}
    <div class="related-article">
      <strong>{{ link.source }}:</strong>
      {% if let Some(href) = link.href %}<a href="{{ href }}" target="_blank" rel="noopener noreferrer">{{ link.title }}</a>{% else %}<span>{{ link.title }}</span>{% endif %}
      {% if let Some(score) = link.relevance %}<small class="relevance">{{ view.s.label_relevance }}: {{ score }}</small>{% endif %}
      {% if let Some(excerpt) = link.excerpt %}<p class="source-excerpt">{{ excerpt }}</p>{% endif %}
    </div>
    {% endfor %}
  </div>
  {% endif %}
  {% if let Some(ex) = view.explanation %}
  <div class="detail-section explanation" data-section="explanation">
    <h5><i class="fas fa-info-circle"></i> {{ view.s.heading_explanation }}</h5>
    {% if let Some(text) = ex.summary %}<p class="explanation-summary">{{ text }}</p>{% endif %}
    {% if let Some(text) = ex.detailed %}<p class="explanation-text">{{ text }}</p>{% endif %}
    {% if let Some(text) = ex.fact_check_result %}<p class="explanation-text">{{ text }}</p>{% endif %}
    {% if let Some(text) = ex.recommendation %}<p class="explanation-text">{{ text }}</p>{% endif %}
  </div>
  {% endif %}
</div>"#,
    ext = "html"
)]
struct ResultTemplate<'a> {
    view: &'a ResultView,
}

#[derive(Template)]
#[template(
    source = r#"{% if let Some(text) = placeholder %}<p class="empty-history">{{ text }}</p>{% else %}{% for card in cards %}
<div class="history-item {{ card.item_class }}">
  <div class="history-header">
    <span class="history-badge {{ card.badge_class }}">{{ card.badge_label }}</span>
    <small class="history-date">{{ card.date }}</small>
  </div>
  <p class="history-preview">{{ card.preview }}{% if card.ellipsis %}...{% endif %}</p>
  <small class="history-confidence">{{ confidence_label }}: {{ card.confidence }}%</small>
</div>{% endfor %}{% endif %}"#,
    ext = "html"
)]
struct HistoryTemplate<'a> {
    placeholder: Option<&'static str>,
    cards: &'a [HistoryCard],
    confidence_label: &'static str,
}

#[derive(Template)]
#[template(
    source = r#"<div class="{{ css_class }}">
  <i class="fas fa-exclamation-circle"></i>
  <p>{{ text }}</p>
</div>"#,
    ext = "html"
)]
struct MessageTemplate<'a> {
    css_class: &'static str,
    text: &'a str,
}

/// Detail view for one analysis.
pub fn render_result(result: &AnalysisResult, locale: Locale) -> askama::Result<String> {
    render_view(&ResultView::build(result, locale))
}

pub fn render_view(view: &ResultView) -> askama::Result<String> {
    ResultTemplate { view }.render()
}

pub fn render_history(items: &[HistoryItem], locale: Locale) -> askama::Result<String> {
    render_history_panel(&HistoryPanel::from_items(items, locale), locale)
}

pub fn render_history_panel(panel: &HistoryPanel, locale: Locale) -> askama::Result<String> {
    let s = locale.strings();
    let (placeholder, cards): (Option<&'static str>, &[HistoryCard]) = match panel {
        HistoryPanel::Items(cards) => (None, cards.as_slice()),
        HistoryPanel::Empty => (Some(s.history_empty), &[]),
        HistoryPanel::Unavailable => (Some(s.history_unavailable), &[]),
    };
    HistoryTemplate {
        placeholder,
        cards,
        confidence_label: s.confidence,
    }
    .render()
}

/// Inline error box, e.g. after a failed analysis.
pub fn render_error(text: &str) -> askama::Result<String> {
    MessageTemplate {
        css_class: "error-message",
        text,
    }
    .render()
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="{{ s.html_lang }}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{ s.app_title }}</title>
<style>
*{margin:0;padding:0;box-sizing:border-box}
body{background:#0d1117;color:#c9d1d9;font-family:'Inter','Segoe UI',sans-serif;min-height:100vh}
[hidden]{display:none !important}
.landing{min-height:100vh;display:flex;flex-direction:column;align-items:center;justify-content:center;gap:18px;text-align:center;padding:24px}
.landing h1{font-size:2.4rem;color:#58a6ff}
.landing p{color:#8b949e;max-width:520px}
.btn{border:none;padding:10px 20px;border-radius:6px;font-size:.95rem;cursor:pointer;color:#fff;background:#238636}
.btn:hover{background:#2ea043}
.btn:disabled{background:#21262d;color:#484f58;cursor:not-allowed}
.btn-back{background:#30363d}.btn-back:hover{background:#484f58}
.app{max-width:960px;margin:0 auto;padding:24px;display:grid;grid-template-columns:2fr 1fr;gap:24px}
.app header{grid-column:1/-1;display:flex;justify-content:space-between;align-items:center}
.app header h1{font-size:1.3rem;color:#58a6ff}
textarea{width:100%;min-height:180px;background:#161b22;border:1px solid #30363d;color:#c9d1d9;border-radius:6px;padding:12px;font:inherit;margin-bottom:12px}
textarea:focus{outline:none;border-color:#58a6ff}
.loading{color:#e3b341;margin:12px 0}
.error-message{background:#200d0d;border:1px solid #f85149;color:#f85149;border-radius:6px;padding:12px;margin:12px 0}
.result-selection{display:grid;grid-template-columns:1fr 1fr;gap:12px;margin:16px 0}
.choice-box{background:#161b22;border:1px solid #30363d;border-radius:8px;padding:12px;cursor:pointer}
.choice-box.selected{border-color:#58a6ff;box-shadow:0 0 0 1px #58a6ff}
.choice-label{font-weight:bold;letter-spacing:1px}
.confidence-bar{height:8px;background:#21262d;border-radius:4px;margin:8px 0;overflow:hidden}
.confidence-fill{height:100%;transition:width .6s ease}
.confidence-fill.hoax{background:#f85149}.confidence-fill.fakta{background:#3fb950}
.result-badge{border-radius:8px;padding:16px;text-align:center;margin-bottom:12px}
.result-badge.fakta{background:#0d2010;color:#3fb950}
.result-badge.hoax{background:#200d0d;color:#f85149}
.notice{border-radius:6px;padding:10px 12px;margin-bottom:12px;font-size:.9rem}
.notice-override{background:#2a1f05;border:1px solid #e3b341;color:#e3b341}
.notice-verified{background:#0d1a2a;border:1px solid #58a6ff;color:#58a6ff}
.warning-callout{background:#2a1f05;border-left:3px solid #e3b341;color:#e3b341;padding:8px 10px;margin:8px 0}
.detail-section{background:#161b22;border:1px solid #21262d;border-radius:8px;padding:14px;margin-bottom:12px;line-height:1.6}
.detail-section h5{font-size:.95rem;margin-bottom:8px;color:#58a6ff}
.detail-section h6{font-size:.85rem;margin:8px 0 4px;color:#8b949e}
.text-success{color:#3fb950}.text-danger{color:#f85149}
.model-error,.relevance{color:#8b949e;margin-left:6px}
.source-item,.related-article{margin:6px 0}
.source-excerpt{color:#8b949e;font-size:.85rem}
a{color:#58a6ff}
.explanation-text{white-space:pre-line;margin-top:8px}
.history h2{font-size:1rem;margin-bottom:12px;color:#8b949e}
.history-item{background:#161b22;border-left:3px solid #3fb950;border-radius:6px;padding:10px;margin-bottom:10px}
.history-item.fake{border-left-color:#f85149}
.history-header{display:flex;justify-content:space-between;align-items:center;margin-bottom:6px}
.history-badge{font-size:.7rem;font-weight:bold;padding:2px 8px;border-radius:10px}
.history-badge.real{background:#0d2010;color:#3fb950}.history-badge.fake{background:#200d0d;color:#f85149}
.history-date,.history-confidence{color:#8b949e;font-size:.75rem}
.history-preview{font-size:.85rem;margin-bottom:4px;word-break:break-word}
.empty-history{color:#8b949e;font-size:.85rem}
</style>
</head>
<body data-empty-text="{{ s.empty_text }}" data-analyze-failed="{{ s.analyze_failed }}" data-history-unavailable="{{ s.history_unavailable }}">
<section id="landingPage" class="landing">
  <h1>{{ s.app_title }}</h1>
  <p>{{ s.tagline }}</p>
  <button class="btn" id="startBtn" type="button">{{ s.start_button }}</button>
</section>
<section id="mainApp" class="app" hidden>
  <header>
    <h1>{{ s.app_title }}</h1>
    <button class="btn btn-back" id="backBtn" type="button">{{ s.back_button }}</button>
  </header>
  <main>
    <form id="analyzeForm">
      <textarea id="newsText" name="text" placeholder="{{ s.text_placeholder }}"></textarea>
      <button class="btn" id="analyzeBtn" type="submit">{{ s.analyze_button }}</button>
    </form>
    <div id="loadingDiv" class="loading" hidden>{{ s.loading }}</div>
    <div id="messageDiv" hidden></div>
    <div id="resultContent" hidden></div>
  </main>
  <aside class="history">
    <h2>{{ s.heading_history }}</h2>
    <div id="historyDiv"></div>
  </aside>
</section>
<script>
(function () {
  'use strict';
  var el = {
    landing: document.getElementById('landingPage'),
    app: document.getElementById('mainApp'),
    start: document.getElementById('startBtn'),
    back: document.getElementById('backBtn'),
    form: document.getElementById('analyzeForm'),
    text: document.getElementById('newsText'),
    analyze: document.getElementById('analyzeBtn'),
    loading: document.getElementById('loadingDiv'),
    message: document.getElementById('messageDiv'),
    result: document.getElementById('resultContent'),
    history: document.getElementById('historyDiv')
  };
  var msg = document.body.dataset;

  function showResult(html) {
    el.result.innerHTML = html;
    el.result.hidden = false;
    el.result.querySelectorAll('.choice-box').forEach(function (box) {
      box.addEventListener('click', function () {
        el.result.querySelector('.analysis-details').scrollIntoView({ behavior: 'smooth' });
      });
    });
  }

  async function loadHistory() {
    try {
      var res = await fetch('/api/history');
      el.history.innerHTML = await res.text();
    } catch (err) {
      console.error('history', err);
      el.history.textContent = msg.historyUnavailable;
    }
  }

  async function restoreResult() {
    try {
      var res = await fetch('/api/result');
      if (res.status === 200) {
        showResult(await res.text());
      }
    } catch (err) {
      console.error('result', err);
    }
  }

  async function analyze() {
    var text = el.text.value.trim();
    if (!text) {
      alert(msg.emptyText);
      return;
    }
    el.loading.hidden = false;
    el.message.hidden = true;
    el.analyze.disabled = true;
    try {
      var res = await fetch('/api/analyze', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ text: text })
      });
      var html = await res.text();
      if (res.ok) {
        showResult(html);
        el.result.scrollIntoView({ behavior: 'smooth' });
        loadHistory();
      } else {
        el.message.innerHTML = html;
        el.message.hidden = false;
      }
    } catch (err) {
      console.error('analyze', err);
      el.message.textContent = msg.analyzeFailed;
      el.message.hidden = false;
    } finally {
      el.loading.hidden = true;
      el.analyze.disabled = false;
    }
  }

  el.start.addEventListener('click', function () {
    el.landing.hidden = true;
    el.app.hidden = false;
    loadHistory();
    restoreResult();
  });
  el.back.addEventListener('click', function () {
    el.app.hidden = true;
    el.landing.hidden = false;
    el.text.value = '';
    el.result.hidden = true;
    el.result.innerHTML = '';
    el.message.hidden = true;
    fetch('/api/reset', { method: 'POST' }).catch(function (err) { console.error('reset', err); });
  });
  el.form.addEventListener('submit', function (e) {
    e.preventDefault();
    analyze();
  });
})();
</script>
</body>
</html>"#,
    ext = "html"
)]
struct PageTemplate {
    s: &'static Strings,
}

/// The single page served at `/`.
pub fn render_page(locale: Locale) -> askama::Result<String> {
    PageTemplate { s: locale.strings() }.render()
}
