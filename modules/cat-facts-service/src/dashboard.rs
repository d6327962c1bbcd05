//! Dashboard HTML page handler for the cat facts service.

use crate::routes::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use cat_facts_types::{Fact, FactStats};
use std::sync::Arc;

const STYLE: &str = "
  body { margin: 0; padding: 24px; font-family: system-ui, sans-serif; background: #14161c; color: #ddd; }
  h1 { margin: 0 0 6px; color: #f0883e; }
  h2 { margin: 0 0 10px; font-size: 1.1em; color: #ccc; }
  .meta { margin: 0 0 20px; font-size: 0.85em; color: #888; }
  .stats { display: flex; flex-wrap: wrap; gap: 12px; margin-bottom: 24px; }
  .stat { min-width: 130px; padding: 14px 20px; border-radius: 8px; background: #1c1f27; text-align: center; }
  .val { display: block; font-size: 1.8em; font-weight: bold; color: #f0883e; }
  .red .val { color: #f85149; }
  .green .val { color: #3fb950; }
  .yellow .val { color: #d29922; }
  .lbl { display: block; margin-top: 4px; font-size: 0.8em; color: #888; }
  table { width: 100%; border-collapse: collapse; }
  th, td { padding: 8px 10px; border-bottom: 1px solid #2a2d36; text-align: left; font-size: 0.9em; }
  th { color: #888; text-transform: uppercase; font-size: 0.75em; }
  .mono { font-family: ui-monospace, monospace; font-size: 0.85em; }
  .chip { padding: 2px 8px; border-radius: 10px; background: #2a2d36; font-size: 0.8em; }
";

pub async fn dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.db.stats().ok();
    let facts = state.db.list_all().unwrap_or_default();
    let uptime = state.start_time.elapsed().as_secs();

    let html = render_page(stats.as_ref(), &facts, uptime);
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html)
}

fn render_page(stats: Option<&FactStats>, facts: &[Fact], uptime_secs: u64) -> String {
    let stats_html = if let Some(s) = stats {
        format!(
            r#"<div class="stats">
                <div class="stat"><span class="val">{}</span><span class="lbl">Total Facts</span></div>
                <div class="stat red"><span class="val">{}</span><span class="lbl">Favorites</span></div>
                <div class="stat green"><span class="val">{}</span><span class="lbl">From Users</span></div>
                <div class="stat yellow"><span class="val">{}</span><span class="lbl">From API</span></div>
            </div>"#,
            s.total, s.favorites, s.user_count, s.api_count
        )
    } else {
        "<p>No stats available.</p>".to_string()
    };

    let mut fact_rows = String::new();
    for f in facts {
        fact_rows.push_str(&format!(
            "<tr><td class=\"mono\">{}</td><td>{}{}</td><td><span class=\"chip\">{}</span></td><td class=\"mono\">{}</td></tr>\n",
            f.id,
            if f.favorite { "&#9733; " } else { "" },
            escape_html(&f.text),
            f.source.as_str(),
            escape_html(&f.created_at),
        ));
    }
    if fact_rows.is_empty() {
        fact_rows = "<tr><td colspan=\"4\">No cat facts yet.</td></tr>".to_string();
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Cat Facts Dashboard</title>
<style>{style}</style>
</head>
<body>
  <h1>Cat Facts</h1>
  <p class="meta">Uptime: {uptime_str}</p>

  {stats_html}

  <h2>Facts</h2>
  <table>
    <thead><tr><th>ID</th><th>Fact</th><th>Source</th><th>Added</th></tr></thead>
    <tbody>{fact_rows}</tbody>
  </table>

  <script>setTimeout(() => location.reload(), 30000);</script>
</body>
</html>"#,
        style = STYLE,
        uptime_str = format_uptime(uptime_secs),
        stats_html = stats_html,
        fact_rows = fact_rows,
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
