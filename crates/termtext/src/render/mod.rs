//! Export of document snapshots for display outside the launcher window.
//!
//! - [`to_plain_text`] - block texts joined by `\n`
//! - [`to_html`] - a `<pre>` element with one styled `<span>` per run

use crate::model::{Color, DocumentSnapshot, FontWeight, TextFormat};
use std::fmt::Write as _;

pub fn to_plain_text(snapshot: &DocumentSnapshot) -> String {
    snapshot.lines().join("\n")
}

/// Render the snapshot as HTML.
///
/// Runs whose format equals `defaults` are emitted without a span. Colors
/// are written as `#rrggbb`; [`Color::Default`] produces no color property.
pub fn to_html(snapshot: &DocumentSnapshot, defaults: &TextFormat) -> String {
    let mut html = String::from("<pre class=\"termtext\">");
    for (index, block) in snapshot.blocks.iter().enumerate() {
        if index > 0 {
            html.push('\n');
        }
        for run in &block.runs {
            let style = css_style(&run.format, defaults);
            if style.is_empty() {
                push_escaped(&mut html, &run.text);
            } else {
                html.push_str("<span style=\"");
                html.push_str(&style);
                html.push_str("\">");
                push_escaped(&mut html, &run.text);
                html.push_str("</span>");
            }
        }
    }
    html.push_str("</pre>\n");
    html
}

fn css_style(format: &TextFormat, defaults: &TextFormat) -> String {
    if format == defaults {
        return String::new();
    }
    let mut properties = Vec::new();
    if let Some(hex) = hex_color(format.foreground) {
        properties.push(format!("color:{hex}"));
    }
    if let Some(hex) = hex_color(format.background) {
        properties.push(format!("background-color:{hex}"));
    }
    if format.weight != FontWeight::Normal {
        properties.push(format!("font-weight:{}", format.weight.css_weight()));
    }
    if format.italic {
        properties.push("font-style:italic".to_string());
    }
    let decorations: Vec<&str> = [
        (format.underline, "underline"),
        (format.strike_out, "line-through"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if !decorations.is_empty() {
        properties.push(format!("text-decoration:{}", decorations.join(" ")));
    }
    if format.font.family != defaults.font.family {
        properties.push(format!("font-family:'{}'", format.font.family));
    }
    if let Some(style) = &format.font.style_name {
        properties.push(format!("--font-style-name:'{style}'"));
    }
    // Quotes would end the attribute value.
    properties.join(";").replace('"', "&quot;")
}

fn hex_color(color: Color) -> Option<String> {
    let (r, g, b) = color.to_rgb8()?;
    let mut hex = String::with_capacity(7);
    hex.push('#');
    for channel in [r, g, b] {
        let _ = write!(hex, "{channel:02x}");
    }
    Some(hex)
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
