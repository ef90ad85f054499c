//! HTML panel for browsing captured requests
//!
//! Left column lists every retained request newest first; right column shows
//! the selected one in full. All request-supplied text is HTML-escaped.

use std::fmt::Write;

use crate::store::RequestRecord;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const STYLE: &str = r#"
body { margin: 0; font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; color: #1f2328; }
.layout { display: flex; height: 100vh; }
.list { width: 32%; min-width: 260px; overflow-y: auto; border-right: 1px solid #d0d7de; background: #f6f8fa; }
.list h2, .detail h2 { margin: 0; padding: 12px 16px; font-size: 16px; border-bottom: 1px solid #d0d7de; }
.list a { display: block; padding: 8px 16px; color: inherit; text-decoration: none; border-bottom: 1px solid #eaeef2; }
.list a:hover { background: #eaeef2; }
.list a.current { background: #ddf4ff; border-left: 3px solid #0969da; }
.method { display: inline-block; min-width: 56px; font-weight: 600; font-family: monospace; }
.meta { display: block; font-size: 12px; color: #656d76; }
.detail { flex: 1; overflow-y: auto; }
.detail section { padding: 12px 16px; }
.detail h3 { margin: 0 0 8px 0; font-size: 14px; }
table { border-collapse: collapse; font-family: monospace; font-size: 13px; }
td { padding: 2px 12px 2px 0; vertical-align: top; }
td.name { font-weight: 600; white-space: nowrap; }
pre { margin: 0; padding: 12px; background: #f6f8fa; border-radius: 6px; white-space: pre-wrap; word-break: break-all; }
.empty { padding: 24px 16px; color: #656d76; }
"#;

/// Render the full panel document
pub fn render_panel(
    requests: &[std::sync::Arc<RequestRecord>],
    selected: Option<&RequestRecord>,
) -> Result<String, std::fmt::Error> {
    let mut html = String::with_capacity(4096);

    write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Black Hole - captured requests</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <div class=\"layout\">\n"
    )?;

    write_list(&mut html, requests, selected.map(|r| r.id))?;
    write_detail(&mut html, selected)?;

    html.push_str("</div>\n</body>\n</html>\n");
    Ok(html)
}

fn write_list(
    html: &mut String,
    requests: &[std::sync::Arc<RequestRecord>],
    selected_id: Option<u64>,
) -> std::fmt::Result {
    writeln!(
        html,
        "<nav class=\"list\">\n<h2>Requests ({})</h2>",
        requests.len()
    )?;

    if requests.is_empty() {
        html.push_str(
            "<div class=\"empty\">No requests captured yet. Send any HTTP request to this server.</div>\n",
        );
    }

    for record in requests {
        let class = if Some(record.id) == selected_id {
            " class=\"current\""
        } else {
            ""
        };
        writeln!(
            html,
            "<a href=\"/?view_id={id}\"{class}><span class=\"method\">{method}</span> {target}\
             <span class=\"meta\">#{id} &middot; {time}</span></a>",
            id = record.id,
            method = escape_html(&record.method),
            target = escape_html(&record.target()),
            time = record.captured_at.format(TIME_FORMAT),
        )?;
    }

    html.push_str("</nav>\n");
    Ok(())
}

fn write_detail(html: &mut String, selected: Option<&RequestRecord>) -> std::fmt::Result {
    html.push_str("<main class=\"detail\">\n");

    let Some(record) = selected else {
        html.push_str("<div class=\"empty\">Select a request to see its details.</div>\n</main>\n");
        return Ok(());
    };

    writeln!(
        html,
        "<h2>#{id} {method} {target} {proto}</h2>",
        id = record.id,
        method = escape_html(&record.method),
        target = escape_html(&record.target()),
        proto = escape_html(&record.protocol_version),
    )?;

    writeln!(
        html,
        "<section><table>\
         <tr><td class=\"name\">Captured at</td><td>{time}</td></tr>\
         <tr><td class=\"name\">Remote address</td><td>{remote}</td></tr>\
         </table></section>",
        time = record.captured_at.format(TIME_FORMAT),
        remote = escape_html(&record.remote_address),
    )?;

    html.push_str("<section><h3>Headers</h3>\n");
    if record.headers.is_empty() {
        html.push_str("<div class=\"empty\">(none)</div>\n");
    } else {
        html.push_str("<table>\n");
        for (name, values) in record.headers.iter() {
            for value in values {
                writeln!(
                    html,
                    "<tr><td class=\"name\">{}</td><td>{}</td></tr>",
                    escape_html(name),
                    escape_html(value)
                )?;
            }
        }
        html.push_str("</table>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<section><h3>Body</h3>\n");
    match pretty_body(record) {
        Some(body) => writeln!(html, "<pre>{}</pre>", escape_html(&body))?,
        None => html.push_str("<div class=\"empty\">(empty)</div>\n"),
    }
    html.push_str("</section>\n</main>\n");

    Ok(())
}

/// Body text, re-indented when it parses as JSON. `None` for an empty body.
pub fn pretty_body(record: &RequestRecord) -> Option<String> {
    if record.body.is_empty() {
        return None;
    }

    match serde_json::from_slice::<serde_json::Value>(&record.body) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .ok()
            .or_else(|| Some(record.body_text().into_owned())),
        Err(_) => Some(record.body_text().into_owned()),
    }
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
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
