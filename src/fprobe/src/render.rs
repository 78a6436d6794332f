// fprobe/src/render.rs

//! HTML views of MI exchanges and of the current source location.

use gdbmirs::{Response, ResponseKind};
use std::fmt::Write;

/// Border and label color of a record kind.
pub fn kind_color(kind: ResponseKind) -> &'static str {
    match kind {
        ResponseKind::Result | ResponseKind::Done => "#388E3C",
        ResponseKind::Notify => "#1976D2",
        ResponseKind::Console => "#000000",
        ResponseKind::Log => "#757575",
        ResponseKind::Output => "#D32F2F",
        ResponseKind::Target => "#7B1FA2",
    }
}

pub fn escape_html(text: &str) -> String {
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

/// Render a command and the records it produced as one card.
///
/// Console records show their text as the message; other payloads are
/// pretty-printed as JSON.
pub fn render_transcript(command: &str, responses: &[Response]) -> String {
    let mut blocks = String::new();
    for response in responses {
        let color = kind_color(response.kind);

        let (message, payload) = match response.kind {
            ResponseKind::Console => (response.stream_text().map(str::to_string), None),
            _ => (response.message.clone(), response.payload.as_ref()),
        };

        let _ = write!(
            blocks,
            r#"<div style="margin-bottom: 0.5em; border-left: 4px solid {color}; padding-left: 0.5em;">
<span style="font-size: 11px; font-weight: bold; color: {color}; text-transform: uppercase;">{kind}</span>
"#,
            color = color,
            kind = response.kind,
        );
        if let Some(message) = message {
            let _ = writeln!(
                blocks,
                r#"<div style="font-size: 12px; margin-bottom: 0.25em; color: rgba(0, 0, 0, 0.87);">{}</div>"#,
                escape_html(&message)
            );
        }
        if let Some(payload) = payload {
            let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
            let _ = writeln!(
                blocks,
                r#"<pre style="background: #f5f5f5; padding: 0.5em; border-radius: 4px; margin: 0 0 0.5em 0; font-size: 11px; color: #333; line-height: 1.3;">{}</pre>"#,
                escape_html(pretty.trim())
            );
        }
        blocks.push_str("</div>\n");
    }

    format!(
        r#"<div style="border: 1px solid #e0e0e0; border-radius: 6px; padding: 0.75em; margin: 0.5em 0; background: #ffffff; font-family: Arial, sans-serif; color: rgba(0, 0, 0, 0.87);">
<div style="font-family: monospace; font-size: 12px; background: #f5f5f5; padding: 0.5em; border-radius: 4px; margin-bottom: 0.75em;">{}</div>
<div style="margin-left: 0.5em;">
{}</div>
</div>
"#,
        escape_html(command),
        blocks
    )
}

/// Lines `line - pad ..= line + pad` of `source`, clamped to the file, with
/// `line` highlighted. Lines are numbered from 1.
pub fn render_source_lines(source: &str, line: usize, pad: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let start = line.saturating_sub(pad).max(1);
    let end = (line + pad).min(lines.len());

    let mut html = String::new();
    for number in start..=end {
        let text = lines[number - 1];
        let highlight = if number == line { " background: #fff3e0;" } else { "" };
        let _ = writeln!(
            html,
            r#"<span style="padding: 0.25em 0; display: block;{}"><span style="display: inline-block; width: 4em; text-align: right; color: #757575; margin-right: 1em;">{}</span><span style="font-family: monospace; white-space: pre;">{}</span></span>"#,
            highlight,
            number,
            escape_html(text)
        );
    }
    html
}

/// A source window headed by the file and the stopped function and line.
pub fn render_source(source: &str, file: &str, function: &str, line: usize, pad: usize) -> String {
    format!(
        r#"<div style="border: 1px solid #e0e0e0; border-radius: 6px; padding: 0.5em; background: #fafafa; font-family: Arial, sans-serif; font-size: 0.8em; color: rgba(0, 0, 0, 0.87);">
<div style="display: flex; border-bottom: 1px solid #e0e0e0; padding: 0.25em; font-family: monospace;"><span style="flex: 1;">{}</span><span>fn: {} @ line: {}</span></div>
{}</div>
"#,
        escape_html(file),
        escape_html(function),
        line,
        render_source_lines(source, line, pad)
    )
}

/// Wrap fragments into a standalone page.
pub fn html_page(title: &str, fragments: &[String]) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        fragments.concat()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && \"c\""), "a &lt; b &amp;&amp; &quot;c&quot;");
    }

    #[test]
    fn test_transcript_colors_and_payload() {
        let responses = vec![
            Response::new(ResponseKind::Result)
                .with_message("done")
                .with_payload(json!({"value": "(1, 2)"})),
            Response::new(ResponseKind::Done),
        ];
        let html = render_transcript("-data-evaluate-expression y", &responses);
        assert!(html.contains("-data-evaluate-expression y"));
        assert!(html.contains("border-left: 4px solid #388E3C"));
        assert!(html.contains(">result</span>"));
        assert!(html.contains("&quot;value&quot;: &quot;(1, 2)&quot;"));
    }

    #[test]
    fn test_console_text_is_message() {
        let responses = vec![
            Response::new(ResponseKind::Console).with_payload(json!("Breakpoint 1 <here>\n")),
        ];
        let html = render_transcript("-break-insert simple.f90:8", &responses);
        assert!(html.contains("#000000"));
        assert!(html.contains("Breakpoint 1 &lt;here&gt;"));
        assert!(!html.contains("<pre"));
    }

    #[test]
    fn test_source_window_is_clamped_and_highlighted() {
        let source = "program simple\n  integer :: i\n  real :: y(10)\n  y = 1.0\nend program\n";
        let html = render_source_lines(source, 2, 5);
        assert_eq!(html.lines().count(), 5);
        let highlighted: Vec<&str> = html.lines().filter(|l| l.contains("#fff3e0")).collect();
        assert_eq!(highlighted.len(), 1);
        assert!(highlighted[0].contains(">2</span>"));
        assert!(highlighted[0].contains("integer :: i"));
    }

    #[test]
    fn test_source_window_pad() {
        let source: String = (1..=30).map(|i| format!("line {}\n", i)).collect();
        let html = render_source_lines(&source, 15, 2);
        assert_eq!(html.lines().count(), 5);
        assert!(html.contains(">13</span>"));
        assert!(html.contains(">17</span>"));
        assert!(!html.contains(">18</span>"));
    }

    #[test]
    fn test_render_source_header() {
        let html = render_source("x = 1\n", "simple.f90", "MAIN__", 1, 5);
        assert!(html.contains("simple.f90"));
        assert!(html.contains("fn: MAIN__ @ line: 1"));
    }
}
