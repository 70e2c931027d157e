use ratatui::style::Color;

use dermascan_api::Verdict;

/// Brand accent used for headers and active navigation.
pub const ACCENT: Color = Color::Magenta;

/// Color coding shared by verdict banners and ingredient pills.
pub fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Good => Color::Green,
        Verdict::Moderate => Color::Yellow,
        Verdict::Bad | Verdict::Harmful => Color::Red,
        Verdict::Unknown => Color::DarkGray,
    }
}
