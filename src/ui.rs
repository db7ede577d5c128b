use crate::models::{ListItem, Region};
use crate::page::PageState;
use crate::stats::{ChartData, StatsView};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;

const PIE_CENTER: f64 = 130.0;
const PIE_RADIUS: f64 = 110.0;

pub fn render_page(page: &PageState) -> String {
    let slots = [
        ("UPLOAD_RESULT", result_block(page, Region::UploadResult)),
        ("EVENT_RESULT", result_block(page, Region::EventResult)),
        ("TEMPLATE_RESULT", result_block(page, Region::TemplateResult)),
        ("SEGMENT_RESULT", result_block(page, Region::SegmentResult)),
        ("CAMPAIGN_RESULT", result_block(page, Region::CampaignResult)),
        ("RUN_RESULT", result_block(page, Region::RunResult)),
        (
            "TEMPLATE_OPTIONS",
            options(page.list(Region::TemplateSelect), "Select a template"),
        ),
        (
            "SEGMENT_OPTIONS",
            options(page.list(Region::SegmentSelect), "Select a segment"),
        ),
        ("CAMPAIGN_ITEMS", list_items(page, Region::CampaignList)),
        ("INBOUND_ITEMS", list_items(page, Region::InboundList)),
        ("STAT_FIELDS", stat_fields(page.stats.as_ref())),
        ("STATS_ERROR", result_block(page, Region::Stats)),
        (
            "CHART",
            page.chart().map(render_pie).unwrap_or_else(empty_chart),
        ),
    ];
    fill_slots(INDEX_HTML, &slots)
}

/// Substitutes `{{NAME}}` markers of the template in one pass, so rendered
/// values are never rescanned. Unknown markers are kept as written.
fn fill_slots(template: &str, slots: &[(&str, String)]) -> String {
    let mut html = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        html.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let name = &after[..close];
        match slots.iter().find(|(slot, _)| *slot == name) {
            Some((_, value)) => html.push_str(value),
            None => {
                html.push_str("{{");
                html.push_str(name);
                html.push_str("}}");
            }
        }
        rest = &after[close + 2..];
    }
    html.push_str(rest);
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn result_block(page: &PageState, region: Region) -> String {
    match page.result(region) {
        Some(panel) => format!(
            r#"<pre id="{}" class="result" data-type="{}" title="{}">{}</pre>"#,
            region.name(),
            if panel.is_error { "error" } else { "ok" },
            panel.updated_at.format("%H:%M:%S"),
            escape_html(&panel.text())
        ),
        None => format!(r#"<pre id="{}" class="result"></pre>"#, region.name()),
    }
}

fn options(items: &[ListItem], placeholder: &str) -> String {
    let mut html = format!(r#"<option value="">{}</option>"#, escape_html(placeholder));
    for item in items {
        let _ = write!(
            html,
            r#"<option value="{}">{}</option>"#,
            escape_html(&item.value),
            escape_html(&item.label)
        );
    }
    html
}

fn list_items(page: &PageState, region: Region) -> String {
    let items = page.list(region);
    let mut html = result_block_if_error(page, region);
    if items.is_empty() {
        html.push_str(r#"<li class="hint">Nothing here yet.</li>"#);
    }
    for item in items {
        let _ = write!(
            html,
            r#"<li data-value="{}">{}</li>"#,
            escape_html(&item.value),
            escape_html(&item.label)
        );
    }
    html
}

fn result_block_if_error(page: &PageState, region: Region) -> String {
    match page.result(region) {
        Some(panel) if panel.is_error => format!(
            r#"<li class="result" data-type="error">{}</li>"#,
            escape_html(&panel.text())
        ),
        _ => String::new(),
    }
}

fn stat_fields(stats: Option<&StatsView>) -> String {
    let fields: [(&str, &str, String); 7] = match stats {
        Some(view) => [
            ("statUsers", "Total users", view.total_users.to_string()),
            ("statOptouts", "Opt-outs", view.opt_outs.to_string()),
            ("statSent", "Sent", view.sent.to_string()),
            ("statFailed", "Failed", view.failed.to_string()),
            ("statDelivery", "Delivery %", format!("{:.2}", view.delivery_pct)),
            ("statFailRate", "Failed %", format!("{:.2}", view.failed_pct)),
            ("statOptoutRate", "Opt-out %", format!("{:.2}", view.opt_out_pct)),
        ],
        None => [
            ("statUsers", "Total users", "-".into()),
            ("statOptouts", "Opt-outs", "-".into()),
            ("statSent", "Sent", "-".into()),
            ("statFailed", "Failed", "-".into()),
            ("statDelivery", "Delivery %", "-".into()),
            ("statFailRate", "Failed %", "-".into()),
            ("statOptoutRate", "Opt-out %", "-".into()),
        ],
    };

    let mut html = String::new();
    for (id, label, value) in fields {
        let _ = write!(
            html,
            r#"<div class="stat"><span class="label">{label}</span><span id="{id}" class="value">{value}</span></div>"#
        );
    }
    html
}

fn empty_chart() -> String {
    r#"<svg id="statsChart" viewBox="0 0 260 260" role="img" aria-label="Stats chart"><text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text></svg>"#
        .to_string()
}

/// Pie chart of the first dataset, slices clockwise from twelve o'clock.
pub fn render_pie(chart: &ChartData) -> String {
    let Some(dataset) = chart.datasets.first() else {
        return empty_chart();
    };
    let values: Vec<f64> = dataset
        .data
        .iter()
        .map(|value| if value.is_finite() && *value > 0.0 { *value } else { 0.0 })
        .collect();
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return empty_chart();
    }

    let mut svg = String::from(
        r#"<svg id="statsChart" viewBox="0 0 260 260" role="img" aria-label="Stats chart">"#,
    );
    let mut start = -FRAC_PI_2;
    for (index, value) in values.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let color = dataset.colors.get(index).map(String::as_str).unwrap_or("#94a3b8");
        let label = chart.labels.get(index).map(String::as_str).unwrap_or_default();
        let sweep = value / total * TAU;

        if sweep >= TAU - 1e-9 {
            let _ = write!(
                svg,
                r#"<circle cx="{PIE_CENTER}" cy="{PIE_CENTER}" r="{PIE_RADIUS}" fill="{}"><title>{}</title></circle>"#,
                escape_html(color),
                escape_html(label)
            );
            break;
        }

        let end = start + sweep;
        let (x1, y1) = point_on_circle(start);
        let (x2, y2) = point_on_circle(end);
        let large_arc = if sweep > std::f64::consts::PI { 1 } else { 0 };
        let _ = write!(
            svg,
            r#"<path d="M {PIE_CENTER} {PIE_CENTER} L {x1:.2} {y1:.2} A {PIE_RADIUS} {PIE_RADIUS} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{}"><title>{}</title></path>"#,
            escape_html(color),
            escape_html(label)
        );
        start = end;
    }
    svg.push_str("</svg>");
    svg
}

fn point_on_circle(angle: f64) -> (f64, f64) {
    (
        PIE_CENTER + PIE_RADIUS * angle.cos(),
        PIE_CENTER + PIE_RADIUS * angle.sin(),
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Campaign Console</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1080px, 100%);
      margin: 0 auto;
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 22px;
    }

    header {
      grid-column: 1 / -1;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.15rem;
      color: var(--accent-2);
    }

    .card {
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 10px;
      align-content: start;
    }

    .card.wide {
      grid-column: 1 / -1;
    }

    form {
      display: grid;
      gap: 8px;
    }

    input, textarea, select {
      font: inherit;
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
    }

    button {
      font: inherit;
      font-weight: 600;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      color: white;
      background: var(--accent-2);
      cursor: pointer;
    }

    button.danger {
      background: #c63b2b;
    }

    .result {
      margin: 0;
      white-space: pre-wrap;
      font-size: 0.85rem;
      background: #f7f4ef;
      border-radius: 12px;
      padding: 10px;
      min-height: 1.2em;
    }

    .result[data-type="error"] {
      color: #c63b2b;
      background: #fdecea;
    }

    .result[data-type="ok"] {
      color: #2d7a4b;
    }

    ul {
      margin: 0;
      padding-left: 18px;
    }

    .hint {
      color: #6f6a65;
      list-style: none;
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .stat {
      display: grid;
      gap: 4px;
    }

    .label {
      text-transform: uppercase;
      font-size: 0.75rem;
      letter-spacing: 0.08em;
      color: #7a746d;
    }

    .value {
      font-size: 1.4rem;
      font-weight: 600;
    }

    #statsChart {
      width: 260px;
      height: 260px;
    }

    .chart-label {
      fill: #7a746d;
      font-size: 13px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Campaign Console</h1>
    </header>

    <section class="card">
      <h2>Upload users</h2>
      <form method="post" action="/ingest/users" enctype="multipart/form-data">
        <input id="userFile" type="file" name="file" accept=".csv,.json" />
        <button type="submit">Upload</button>
      </form>
      {{UPLOAD_RESULT}}
    </section>

    <section class="card">
      <h2>Upload events</h2>
      <form method="post" action="/ingest/events" enctype="multipart/form-data">
        <input id="jsonlFile" type="file" name="file" accept=".jsonl" />
        <button type="submit">Upload</button>
      </form>
      {{EVENT_RESULT}}
    </section>

    <section class="card">
      <h2>Templates</h2>
      <form method="post" action="/templates">
        <input id="templateName" name="name" placeholder="Name" />
        <textarea id="templateContent" name="content" rows="3" placeholder="Hi {{name}}"></textarea>
        <button type="submit">Create template</button>
      </form>
      <form method="post" action="/templates/delete">
        <select name="id">{{TEMPLATE_OPTIONS}}</select>
        <button class="danger" type="submit">Delete template</button>
      </form>
      {{TEMPLATE_RESULT}}
    </section>

    <section class="card">
      <h2>Segments</h2>
      <form method="post" action="/segments">
        <input id="segmentName" name="name" placeholder="Name" />
        <input id="segmentTopic" name="topic" placeholder="Topic" />
        <textarea id="segmentRule" name="rule" rows="3" placeholder='{"topic": "PROMOTIONS"}'></textarea>
        <button type="submit">Create segment</button>
      </form>
      <form method="post" action="/segments/delete">
        <select name="id">{{SEGMENT_OPTIONS}}</select>
        <button class="danger" type="submit">Delete segment</button>
      </form>
      {{SEGMENT_RESULT}}
    </section>

    <section class="card">
      <h2>Campaigns</h2>
      <form method="post" action="/campaigns">
        <input id="campaignName" name="name" placeholder="Name" />
        <input id="topic" name="topic" placeholder="Topic" />
        <select id="templateSelect" name="template_id">{{TEMPLATE_OPTIONS}}</select>
        <select id="segmentSelect" name="segment_id">{{SEGMENT_OPTIONS}}</select>
        <button type="submit">Create campaign</button>
      </form>
      <ul id="campaignList">{{CAMPAIGN_ITEMS}}</ul>
      <form method="post" action="/campaigns/delete">
        <input name="id" placeholder="Campaign ID" />
        <button class="danger" type="submit">Delete campaign</button>
      </form>
      {{CAMPAIGN_RESULT}}
    </section>

    <section class="card">
      <h2>Run campaign</h2>
      <form method="post" action="/campaigns/run">
        <input id="campaignId" name="campaign_id" placeholder="Campaign ID" />
        <button type="submit">Run</button>
      </form>
      {{RUN_RESULT}}
    </section>

    <section class="card">
      <h2>Inbound messages</h2>
      <form method="post" action="/inbound/refresh">
        <button type="submit">Load inbound</button>
      </form>
      <ul id="inboundList">{{INBOUND_ITEMS}}</ul>
    </section>

    <section class="card wide">
      <h2>Delivery stats</h2>
      <form method="post" action="/stats/refresh">
        <button type="submit">Load stats</button>
      </form>
      {{STATS_ERROR}}
      <div class="stats">{{STAT_FIELDS}}</div>
      {{CHART}}
    </section>
  </main>
</body>
</html>
"#;
