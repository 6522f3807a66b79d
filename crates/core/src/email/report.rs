//! Deterministic plain-text report rendering.

use crate::job::ImprovedTitle;

/// Subject line for the report email.
pub fn subject(channel_name: &str) -> String {
    format!("Title Doctor - Improved Titles for {}", channel_name)
}

/// Render the report body: header naming the channel, one block per title
/// in `improved_titles` order, fixed footer.
pub fn render(channel_name: &str, titles: &[ImprovedTitle]) -> String {
    let rule = "=".repeat(50);
    let mut text = format!("Title Doctor - Improved Titles for {}\n\n{}\n\n", channel_name, rule);

    for (idx, title) in titles.iter().enumerate() {
        text.push_str(&format!("Video {}:\n", idx + 1));
        text.push_str("----------------\n");
        text.push_str(&format!("Original: {}\n", title.original));
        text.push_str(&format!("Improved: {}\n", title.improved));
        text.push_str(&format!("Why: {}\n", title.rationale));
        text.push_str(&format!("Watch: {}\n\n", title.url));
    }

    text.push_str(&format!("{}\n\nPowered by Title Doctor", rule));
    text
}
