// ABOUTME: Pure HTML and plain-text rendering of the current item for the browser overlay and text sink.
// ABOUTME: Deterministic string generation only; no state, no I/O, same input always yields the same bytes.

use crate::item::Item;

/// Escape text for embedding in HTML element content or attribute values.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Self-contained overlay document for the given item. No item, or a
/// disabled item, renders the placeholder document so the overlay surface
/// always has something valid to show.
pub fn html_document(item: Option<&Item>) -> String {
    match item {
        Some(item) if item.enabled => {
            let style = &item.style;
            let content = escape_html(&item.content).replace('\n', "<br>");
            format!(
                r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<style>
body {{
    margin: 0;
    padding: 0;
    overflow: hidden;
    background: transparent;
}}
.item {{
    position: absolute;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    white-space: pre-wrap;
    word-wrap: break-word;
}}
</style>
</head>
<body>
<div class="item" style="font-family: {font}; font-size: {size}px; color: {color}; background: {background}; text-align: {align}; font-weight: {weight}; font-style: {font_style};">{content}</div>
</body>
</html>
"#,
                font = escape_html(&style.font_family),
                size = style.font_size,
                color = escape_html(&style.color),
                background = escape_html(&style.background),
                align = escape_html(&style.align),
                weight = if style.bold { "bold" } else { "normal" },
                font_style = if style.italic { "italic" } else { "normal" },
            )
        }
        _ => placeholder_document(),
    }
}

/// The fixed document shown when nothing is selected.
pub fn placeholder_document() -> String {
    concat!(
        "<!DOCTYPE html>\n",
        "<html>\n",
        "<head>\n",
        "<meta charset=\"UTF-8\">\n",
        "<style>\nbody { margin: 0; background: transparent; }\n</style>\n",
        "</head>\n",
        "<body></body>\n",
        "</html>\n",
    )
    .to_string()
}

/// Plain text pushed to the external text sink. Unselected or disabled
/// items yield the empty string, which fully replaces the sink's previous
/// content.
pub fn sink_text(item: Option<&Item>) -> String {
    match item {
        Some(item) if item.enabled => item.content.clone(),
        _ => String::new(),
    }
}
