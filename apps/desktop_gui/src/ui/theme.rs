use egui::Color32;
use shared::domain::ReefStatus;

use super::content::ThreatImpact;

/// Coral accent used for headings and primary actions.
pub const CORAL: Color32 = Color32::from_rgb(249, 115, 22);
/// Ocean cyan used for links and secondary emphasis.
pub const ACCENT: Color32 = Color32::from_rgb(56, 189, 248);

pub const PANEL_FILL: Color32 = Color32::from_rgb(8, 30, 50);
pub const CARD_FILL: Color32 = Color32::from_rgb(13, 42, 66);
pub const CARD_STROKE: Color32 = Color32::from_rgb(32, 74, 105);

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = PANEL_FILL;
    visuals.window_fill = CARD_FILL;
    visuals.extreme_bg_color = Color32::from_rgb(4, 20, 36);
    visuals.faint_bg_color = Color32::from_rgb(16, 48, 74);
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.55);
    visuals.hyperlink_color = ACCENT;
    visuals.widgets.noninteractive.bg_stroke =
        egui::Stroke::new(1.0, CARD_STROKE);
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    style.spacing.interact_size = egui::vec2(40.0, 30.0);

    ctx.set_style(style);
}

/// Badge colors (background, text) keyed off conservation status, with the
/// green default for anything unrecognized.
pub fn status_badge_colors(status: &ReefStatus) -> (Color32, Color32) {
    match status {
        ReefStatus::Critical => (
            Color32::from_rgb(69, 22, 22),
            Color32::from_rgb(252, 165, 165),
        ),
        ReefStatus::Threatened => (
            Color32::from_rgb(73, 39, 12),
            Color32::from_rgb(253, 186, 116),
        ),
        ReefStatus::Vulnerable => (
            Color32::from_rgb(70, 58, 10),
            Color32::from_rgb(253, 224, 71),
        ),
        _ => (
            Color32::from_rgb(16, 56, 36),
            Color32::from_rgb(134, 239, 172),
        ),
    }
}

pub fn impact_badge_colors(impact: ThreatImpact) -> (Color32, Color32) {
    match impact {
        ThreatImpact::High => (
            Color32::from_rgb(69, 22, 22),
            Color32::from_rgb(252, 165, 165),
        ),
        ThreatImpact::Medium => (
            Color32::from_rgb(70, 58, 10),
            Color32::from_rgb(253, 224, 71),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_statuses_use_the_default_badge() {
        let default = status_badge_colors(&ReefStatus::Stable);
        assert_eq!(
            status_badge_colors(&ReefStatus::Other("Bleached".to_string())),
            default
        );
        assert_eq!(status_badge_colors(&ReefStatus::Protected), default);
    }

    #[test]
    fn known_severities_have_distinct_badges() {
        let critical = status_badge_colors(&ReefStatus::Critical);
        let threatened = status_badge_colors(&ReefStatus::Threatened);
        let vulnerable = status_badge_colors(&ReefStatus::Vulnerable);
        assert_ne!(critical, threatened);
        assert_ne!(threatened, vulnerable);
        assert_ne!(critical, vulnerable);
    }
}
