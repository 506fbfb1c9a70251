//! Terminal rendering of assistant replies.
//!
//! Replies are Markdown. Only the parts that matter in a terminal are
//! styled: headings, list bullets and bold text. Everything else is
//! printed as is.

use owo_colors::OwoColorize;

/// Renders Markdown text with terminal colors.
pub fn render_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];
        out.push_str(indent);

        if let Some(heading) = heading_text(trimmed) {
            let heading = heading.replace("**", "");
            out.push_str(&heading.bold().bright_cyan().to_string());
        } else if let Some(item) = bullet_text(trimmed) {
            out.push_str(&"•".bright_cyan().to_string());
            out.push(' ');
            out.push_str(&render_inline(item));
        } else {
            out.push_str(&render_inline(trimmed));
        }
        out.push('\n');
    }
    out
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    if (1..=6).contains(&level) && rest.starts_with(' ') {
        Some(rest.trim())
    } else {
        None
    }
}

fn bullet_text(line: &str) -> Option<&str> {
    ["- ", "* ", "+ "]
        .into_iter()
        .find_map(|marker| line.strip_prefix(marker))
}

// `**bold**` spans; an unpaired marker is kept literally.
fn render_inline(text: &str) -> String {
    let segments: Vec<_> = text.split("**").collect();
    let paired = segments.len() - (segments.len() + 1) % 2;

    let mut out = String::with_capacity(text.len());
    for (idx, segment) in segments.iter().enumerate() {
        if idx >= paired {
            out.push_str("**");
            out.push_str(segment);
        } else if idx % 2 == 1 {
            out.push_str(&segment.bold().to_string());
        } else {
            out.push_str(segment);
        }
    }
    out
}
