use crate::store::SearchEntry;

/// Replace the five HTML-significant characters with their entity forms.
/// Every entry field is attacker-controlled (a malicious query is stored
/// verbatim and rendered later), so everything drawn from an entry goes
/// through here before it touches markup.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

/// Reformat a stored RFC 3339 timestamp for human eyes at render time.
/// Unparseable values come back unchanged; the caller escapes either way.
fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |dt| dt.with_timezone(&chrono::Utc).format("%b %e, %Y %H:%M:%S UTC").to_string(),
    )
}

/// Render the audit log as a complete, self-contained HTML document,
/// newest entries first. An empty log renders a placeholder row instead of
/// an empty table body.
pub fn render_report(entries: &[SearchEntry]) -> String {
    let rows = if entries.is_empty() {
        r#"<tr><td colspan="4">No searches yet.</td></tr>"#.to_string()
    } else {
        entries
            .iter()
            .map(|entry| {
                format!(
                    "<tr>\n  <td>{}</td>\n  <td>{}</td>\n  <td>{}</td>\n  <td>{}</td>\n</tr>",
                    escape_html(&format_timestamp(&entry.timestamp)),
                    escape_html(&entry.query),
                    escape_html(&entry.source_address),
                    escape_html(&entry.user_agent),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Backstage | IMDb Search Monitor</title>
    <style>
      :root {{
        color-scheme: light dark;
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
      }}
      body {{
        margin: 2rem;
        background: #0f172a;
        color: #f1f5f9;
      }}
      table {{
        width: 100%;
        border-collapse: collapse;
        margin-top: 1.5rem;
        font-size: 0.95rem;
      }}
      th, td {{
        border-bottom: 1px solid rgba(255, 255, 255, 0.15);
        padding: 0.5rem 0.75rem;
        text-align: left;
      }}
      th {{
        text-transform: uppercase;
        font-size: 0.75rem;
        letter-spacing: 0.08em;
        color: #38bdf8;
      }}
    </style>
  </head>
  <body>
    <h1>Backstage</h1>
    <p>Newest searches are at the top. Reload to refresh.</p>
    <table>
      <thead>
        <tr>
          <th>Time</th>
          <th>Query</th>
          <th>IP</th>
          <th>User Agent</th>
        </tr>
      </thead>
      <tbody>
        {rows}
      </tbody>
    </table>
  </body>
</html>
"#
    )
}
