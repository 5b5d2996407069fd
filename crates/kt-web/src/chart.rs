//! Chart rendering.
//!
//! The reporting surface only hands over labels and counts; how they are
//! drawn is up to the [`ChartRenderer`].

use std::fmt::Write;

use kt_core::View;
use kt_db::ButtonCount;

/// Parallel label and value sequences of equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    labels: Vec<String>,
    counts: Vec<i64>,
}

impl Series {
    pub fn from_counts(counts: &[ButtonCount]) -> Self {
        let (labels, counts) = counts
            .iter()
            .map(|c| (c.button.clone(), c.count))
            .unzip();
        Self { labels, counts }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn counts(&self) -> &[i64] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Turns a series into a complete HTML page.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, title: &str, series: &Series) -> String;

    /// A page explaining that the chart could not be produced.
    fn render_error(&self, title: &str, message: &str) -> String;
}

/// Where the ECharts script is loaded from unless configured otherwise.
pub const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

/// Bar charts drawn client-side with ECharts.
#[derive(Debug, Clone)]
pub struct EchartsRenderer {
    script_src: String,
}

impl Default for EchartsRenderer {
    fn default() -> Self {
        Self {
            script_src: ECHARTS_CDN.to_string(),
        }
    }
}

impl EchartsRenderer {
    /// Loads ECharts from `script_src` instead of the public CDN.
    pub fn with_script_src(script_src: impl Into<String>) -> Self {
        Self {
            script_src: script_src.into(),
        }
    }
}

impl ChartRenderer for EchartsRenderer {
    fn render(&self, title: &str, series: &Series) -> String {
        let labels = script_json(series.labels());
        let counts = script_json(series.counts());
        let empty_note = if series.is_empty() {
            "<p class=\"empty\">No events recorded in this period.</p>"
        } else {
            ""
        };
        let script = format!(
            r"
const chart = echarts.init(document.getElementById('chart'));
chart.setOption({{
  tooltip: {{}},
  xAxis: {{ type: 'category', data: {labels} }},
  yAxis: {{ type: 'value' }},
  series: [{{
    type: 'bar',
    name: '',
    data: {counts},
    barCategoryGap: '60%',
    itemStyle: {{
      color: new echarts.graphic.LinearGradient(0, 0, 0, 1, [
        {{ offset: 0, color: 'rgba(0, 244, 255, 1)' }},
        {{ offset: 1, color: 'rgba(250, 177, 160, 1)' }}
      ], false),
      borderRadius: [30, 30, 30, 30],
      shadowColor: 'rgb(0, 160, 221)'
    }}
  }}]
}});
window.addEventListener('resize', () => chart.resize());
"
        );
        let body = format!(
            "{nav}\n<h1>{title}</h1>\n{empty_note}\n<div id=\"chart\" style=\"width: 100%; height: 480px;\"></div>\n<script src=\"{src}\"></script>\n<script>{script}</script>",
            nav = nav(),
            title = escape_html(title),
            src = escape_html(&self.script_src),
        );
        page(title, &body)
    }

    fn render_error(&self, title: &str, message: &str) -> String {
        let body = format!(
            "{nav}\n<h1>{title}</h1>\n<p class=\"error\">Could not load this report: {message}</p>",
            nav = nav(),
            title = escape_html(title),
            message = escape_html(message),
        );
        page(title, &body)
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

fn nav() -> String {
    let mut nav = String::from("<nav>");
    for view in View::ALL {
        let _ = write!(nav, " <a href=\"/{}\">{}</a>", view.as_str(), view.title());
    }
    nav.push_str(" </nav>");
    nav
}

/// JSON for embedding inside a `<script>` element.
fn script_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
