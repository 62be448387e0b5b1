//! Color theme for the Venosim TUI.
//!
//! Dark clinical palette with an optional high-contrast override.

use ratatui::style::{Color, Modifier, Style};

use venosim_types::Severity;

mod colors {
    use super::Color;

    // === Backgrounds ===
    pub const BG_DARK: Color = Color::Rgb(2, 6, 23);
    pub const BG_PANEL: Color = Color::Rgb(15, 23, 42);
    pub const BG_BORDER: Color = Color::Rgb(51, 65, 85);

    // === Foregrounds ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(226, 232, 240);
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184);
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139);
    pub const TEXT_DISABLED: Color = Color::Rgb(71, 85, 105);

    // === Clinical accents ===
    pub const ACCENT: Color = Color::Rgb(34, 211, 238); // cyan
    pub const HEALTHY: Color = Color::Rgb(59, 130, 246); // arterial blue
    pub const HEALTHY_DIM: Color = Color::Rgb(30, 58, 138);
    pub const DISEASED: Color = Color::Rgb(153, 27, 27); // stasis red
    pub const DISEASED_DIM: Color = Color::Rgb(69, 26, 26);
    pub const VALVE_OK: Color = Color::Rgb(147, 197, 253);
    pub const VALVE_FAILED: Color = Color::Rgb(248, 113, 113);
    pub const CELL: Color = Color::Rgb(191, 219, 254);
    pub const CELL_SLOW: Color = Color::Rgb(252, 165, 165);
    pub const CLOT: Color = Color::Rgb(239, 68, 68);
    pub const CLOT_DIM: Color = Color::Rgb(127, 29, 29);

    // === Severity ===
    pub const INFO: Color = Color::Rgb(226, 232, 240);
    pub const WARNING: Color = Color::Rgb(251, 191, 36);
    pub const CRITICAL: Color = Color::Rgb(248, 113, 113);
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub text_disabled: Color,
    pub accent: Color,
    pub healthy: Color,
    pub healthy_dim: Color,
    pub diseased: Color,
    pub diseased_dim: Color,
    pub valve_ok: Color,
    pub valve_failed: Color,
    pub cell: Color,
    pub cell_slow: Color,
    pub clot: Color,
    pub clot_dim: Color,
    pub info: Color,
    pub warning: Color,
    pub critical: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            text_disabled: colors::TEXT_DISABLED,
            accent: colors::ACCENT,
            healthy: colors::HEALTHY,
            healthy_dim: colors::HEALTHY_DIM,
            diseased: colors::DISEASED,
            diseased_dim: colors::DISEASED_DIM,
            valve_ok: colors::VALVE_OK,
            valve_failed: colors::VALVE_FAILED,
            cell: colors::CELL,
            cell_slow: colors::CELL_SLOW,
            clot: colors::CLOT,
            clot_dim: colors::CLOT_DIM,
            info: colors::INFO,
            warning: colors::WARNING,
            critical: colors::CRITICAL,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,
            text_disabled: Color::DarkGray,
            accent: Color::Cyan,
            healthy: Color::Blue,
            healthy_dim: Color::Blue,
            diseased: Color::Red,
            diseased_dim: Color::Red,
            valve_ok: Color::LightBlue,
            valve_failed: Color::LightRed,
            cell: Color::White,
            cell_slow: Color::LightRed,
            clot: Color::LightRed,
            clot_dim: Color::Red,
            info: Color::White,
            warning: Color::Yellow,
            critical: Color::LightRed,
        }
    }

    /// Color for an explanation title at the given severity.
    #[must_use]
    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
        }
    }

    /// Clot color bucketed by opacity; `None` when invisible.
    #[must_use]
    pub fn clot_color(&self, opacity: f32) -> Option<Color> {
        if opacity <= 0.05 {
            None
        } else if opacity < 0.6 {
            Some(self.clot_dim)
        } else {
            Some(self.clot)
        }
    }
}

/// Select the palette for the app's contrast setting.
#[must_use]
pub fn palette(high_contrast: bool) -> Palette {
    if high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

pub mod styles {
    use super::{Modifier, Palette, Style};

    #[must_use]
    pub fn panel_title(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn control_enabled(palette: &Palette) -> Style {
        Style::default().fg(palette.text_primary)
    }

    #[must_use]
    pub fn control_active(palette: &Palette) -> Style {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn control_disabled(palette: &Palette) -> Style {
        Style::default().fg(palette.text_disabled)
    }
}

/// Braille spinner shown while an explanation request is in flight.
#[must_use]
pub fn spinner_frame(clock_secs: f32) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let idx = (clock_secs * 10.0) as usize % FRAMES.len();
    FRAMES[idx]
}

#[cfg(test)]
mod tests {
    use super::{Palette, palette, spinner_frame};
    use venosim_types::Severity;

    #[test]
    fn severity_colors_are_distinct() {
        let palette = Palette::standard();
        assert_ne!(
            palette.severity(Severity::Info),
            palette.severity(Severity::Critical)
        );
        assert_ne!(
            palette.severity(Severity::Warning),
            palette.severity(Severity::Critical)
        );
    }

    #[test]
    fn invisible_clot_has_no_color() {
        let palette = Palette::standard();
        assert!(palette.clot_color(0.0).is_none());
        assert!(palette.clot_color(0.3).is_some());
        assert!(palette.clot_color(1.0).is_some());
    }

    #[test]
    fn contrast_flag_selects_palette() {
        assert_eq!(palette(true).bg_dark, Palette::high_contrast().bg_dark);
        assert_eq!(palette(false).bg_dark, Palette::standard().bg_dark);
    }

    #[test]
    fn spinner_cycles_without_panicking() {
        for i in 0..50 {
            let _ = spinner_frame(i as f32 * 0.1);
        }
    }
}
