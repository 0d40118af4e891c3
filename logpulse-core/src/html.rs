//! HTML report generation
//!
//! Generates a self-contained HTML dashboard with embedded CSS and
//! JavaScript. Charts are drawn on `<canvas>` from an embedded JSON
//! payload and work offline.

use crate::aggregate::TrafficSummary;

/// Render a summary as a self-contained HTML dashboard
pub fn render_html_report(summary: &TrafficSummary, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {summary_cards}
        {addresses_section}
        {hours_section}
        {footer}
    </div>
    <script>window.__lpData = {data};</script>
    <script>{js}</script>
</body>
</html>"#,
        title = html_escape(title),
        css = inline_css(),
        js = inline_javascript(),
        data = render_data_json(summary),
        header = render_header(title),
        summary_cards = render_summary(summary),
        addresses_section = render_addresses_section(summary),
        hours_section = render_hours_section(summary),
        footer = render_footer(),
    )
}

/// Serialize the summary for the inline chart script. `</` is escaped so
/// an address string lifted from a hostile log line cannot terminate the
/// script element.
fn render_data_json(summary: &TrafficSummary) -> String {
    serde_json::to_string(summary)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}

/// Inline CSS styles
fn inline_css() -> &'static str {
    r#"
/* Reset & Base */
* {
    box-sizing: border-box;
    margin: 0;
    padding: 0;
}

body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #111827;
    background: #ffffff;
}

/* Container */
.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 2rem;
}

/* Header */
header {
    margin-bottom: 2rem;
    padding-bottom: 1rem;
    border-bottom: 2px solid #e5e7eb;
}

header h1 {
    font-size: 2rem;
    font-weight: 700;
    margin-bottom: 0.5rem;
}

header .meta {
    color: #6b7280;
    font-size: 0.875rem;
}

/* Summary */
.summary {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 1rem;
    margin-bottom: 2rem;
}

.summary-card {
    background: #f9fafb;
    padding: 1rem;
    border-radius: 0.5rem;
    border-left: 4px solid #3b82f6;
}

.summary-card h3 {
    font-size: 0.875rem;
    font-weight: 600;
    color: #6b7280;
    margin-bottom: 0.5rem;
}

.summary-card .value {
    font-size: 1.5rem;
    font-weight: 700;
}

/* Section */
.section {
    margin-bottom: 2rem;
}

.section h2 {
    font-size: 1.5rem;
    font-weight: 700;
    margin-bottom: 1rem;
}

.chart-label {
    font-size: 0.875rem;
    font-weight: 600;
    color: #6b7280;
    margin: 1rem 0 0.25rem;
}

/* Table */
table {
    width: 100%;
    border-collapse: collapse;
    background: #ffffff;
    border-radius: 0.5rem;
    overflow: hidden;
}

thead {
    background: #f9fafb;
}

th {
    padding: 0.75rem;
    text-align: left;
    font-weight: 600;
    font-size: 0.875rem;
    color: #374151;
    border-bottom: 2px solid #e5e7eb;
}

td {
    padding: 0.75rem;
    border-bottom: 1px solid #e5e7eb;
    font-size: 0.875rem;
}

tr:last-child td {
    border-bottom: none;
}

tbody tr:hover {
    background: #f3f4f6;
}

/* Code/Monospace */
.monospace {
    font-family: 'Monaco', 'Courier New', monospace;
    font-size: 0.875rem;
}

/* Empty state */
.empty {
    color: #6b7280;
    font-style: italic;
}

/* Footer */
footer {
    margin-top: 3rem;
    padding-top: 1rem;
    border-top: 1px solid #e5e7eb;
    text-align: center;
    color: #6b7280;
    font-size: 0.875rem;
}

/* Mobile */
@media (max-width: 768px) {
    .container {
        padding: 1rem;
    }

    header h1 {
        font-size: 1.5rem;
    }

    .summary {
        grid-template-columns: 1fr;
    }

    table {
        font-size: 0.75rem;
    }

    th, td {
        padding: 0.5rem;
    }
}
"#
}

/// Inline JavaScript: bar charts for the top-addresses and hourly tables,
/// fed by the embedded `window.__lpData` payload.
fn inline_javascript() -> &'static str {
    r#"
(function() {
    var data = window.__lpData;
    if (!data) return;

    function isDark() { return !!(window.matchMedia && window.matchMedia('(prefers-color-scheme: dark)').matches); }

    function drawBarChart(id, entries, labelKey, color) {
        var el = document.getElementById(id);
        if (!el || !entries || entries.length === 0) return;
        el.width = el.offsetWidth || 800;
        var ctx = el.getContext('2d'), W = el.width, H = el.height, N = entries.length;
        var lP = 48, rP = 8, tP = 16;
        var cW = W - lP - rP, cH = H - tP - 28;
        var dark = isDark(), fg = dark ? '#9ca3af' : '#6b7280', grd = dark ? '#374151' : '#e5e7eb';
        var mx = 1, i, t;
        for (i = 0; i < N; i++) {
            if ((entries[i].requests || 0) > mx) mx = entries[i].requests;
        }
        ctx.clearRect(0, 0, W, H);
        ctx.font = '10px system-ui,sans-serif';
        for (t = 0; t <= 4; t++) {
            var yv = mx * t / 4, yp = tP + cH - (t / 4) * cH;
            ctx.fillStyle = fg; ctx.textAlign = 'right';
            ctx.fillText(Math.round(yv), lP - 4, yp + 4);
            ctx.strokeStyle = grd; ctx.lineWidth = 0.5;
            ctx.beginPath(); ctx.moveTo(lP, yp); ctx.lineTo(lP + cW, yp); ctx.stroke();
        }
        var bW = cW / N, gap = Math.max(2, bW * 0.2);
        for (i = 0; i < N; i++) {
            var v = entries[i].requests || 0;
            var bh = (v / mx) * cH;
            var bx = lP + i * bW + gap / 2, bwi = bW - gap;
            ctx.fillStyle = color;
            ctx.fillRect(bx, tP + cH - bh, bwi, bh);
            ctx.fillStyle = fg; ctx.textAlign = 'center'; ctx.font = '10px system-ui,sans-serif';
            ctx.fillText(v, bx + bwi / 2, tP + cH - bh - 4);
            var label = String(entries[i][labelKey] || '');
            if (label.length > 12) label = label.slice(0, 11) + '…';
            ctx.font = '9px system-ui,sans-serif';
            ctx.fillText(label, bx + bwi / 2, tP + cH + 16);
        }
    }

    function drawAll() {
        drawBarChart('lp-address-chart', data.top_addresses, 'address', '#3b82f6');
        drawBarChart('lp-hours-chart', data.hours, 'hour', '#8b5cf6');
    }

    document.addEventListener('DOMContentLoaded', function() {
        drawAll();
        window.addEventListener('resize', function() { drawAll(); });
    });
})();
"#
}

/// Render header section
fn render_header(title: &str) -> String {
    format!(
        r#"<header>
    <h1>{title}</h1>
    <div class="meta">Access-log aggregation: top clients and hourly traffic</div>
</header>"#,
        title = html_escape(title),
    )
}

/// Render summary cards
fn render_summary(summary: &TrafficSummary) -> String {
    let busiest_hour = summary
        .hours
        .iter()
        .max_by(|a, b| a.requests.cmp(&b.requests).then_with(|| b.hour.cmp(&a.hour)))
        .map(|e| format!("{} ({} requests)", html_escape(&e.hour), e.requests))
        .unwrap_or_else(|| "-".to_string());

    let top_client = summary
        .top_addresses
        .first()
        .map(|e| html_escape(&e.address))
        .unwrap_or_else(|| "-".to_string());

    format!(
        r#"<section class="summary">
    <div class="summary-card">
        <h3>Total Requests</h3>
        <div class="value">{total}</div>
    </div>
    <div class="summary-card">
        <h3>Busiest Hour</h3>
        <div class="value">{busiest_hour}</div>
    </div>
    <div class="summary-card">
        <h3>Top Client</h3>
        <div class="value monospace">{top_client}</div>
    </div>
</section>"#,
        total = summary.total_requests,
        busiest_hour = busiest_hour,
        top_client = top_client,
    )
}

/// Render the top-addresses table and bar chart
fn render_addresses_section(summary: &TrafficSummary) -> String {
    if summary.top_addresses.is_empty() {
        return r#"<section class="section">
    <h2>Top Client Addresses</h2>
    <p class="empty">No log data available.</p>
</section>"#
            .to_string();
    }

    let rows: String = summary
        .top_addresses
        .iter()
        .map(|entry| {
            format!(
                r#"        <tr>
            <td class="monospace">{address}</td>
            <td>{requests}</td>
        </tr>
"#,
                address = html_escape(&entry.address),
                requests = entry.requests,
            )
        })
        .collect();

    format!(
        r#"<section class="section">
    <h2>Top {count} Client Addresses</h2>
    <table>
        <thead>
        <tr>
            <th>Address</th>
            <th>Requests</th>
        </tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
    <div class="chart-label">Requests per client</div>
    <canvas id="lp-address-chart" height="220"></canvas>
</section>"#,
        count = summary.top_addresses.len(),
        rows = rows,
    )
}

/// Render the hourly-traffic bar chart
fn render_hours_section(summary: &TrafficSummary) -> String {
    if summary.hours.is_empty() {
        return r#"<section class="section">
    <h2>Hourly Traffic</h2>
    <p class="empty">No log data available.</p>
</section>"#
            .to_string();
    }

    r#"<section class="section">
    <h2>Hourly Traffic</h2>
    <div class="chart-label">Requests per hour of day</div>
    <canvas id="lp-hours-chart" height="220"></canvas>
</section>"#
        .to_string()
}

/// Render footer
fn render_footer() -> String {
    r#"<footer>
    <p>Generated by Logpulse</p>
</footer>"#
        .to_string()
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
