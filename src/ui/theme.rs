//! Centralized theming for the draftsmith TUI
//!
//! Single source of truth for the colors and styles used by the UI.
//! `Light` uses Rosé Pine Dawn, `Dark` uses Catppuccin Mocha, and `System`
//! picks one of the two from the desktop color scheme.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use std::sync::RwLock;

use crate::config::ThemeVariant;

/// Whether the active theme uses the dark palette (RwLock allows runtime switching)
static DARK_PALETTE: RwLock<bool> = RwLock::new(true);

/// Initialize the theme (call once at startup)
pub fn init_theme(variant: ThemeVariant) {
    set_theme(variant);
}

/// Set the theme at runtime. `System` is resolved here, not per frame.
pub fn set_theme(variant: ThemeVariant) {
    let dark = resolves_dark(variant, detect_system_dark_mode);
    if let Ok(mut guard) = DARK_PALETTE.write() {
        *guard = dark;
    }
}

/// Whether the dark palette is in use
pub fn is_dark() -> bool {
    DARK_PALETTE.read().map(|g| *g).unwrap_or(true)
}

fn resolves_dark(variant: ThemeVariant, system_dark: impl FnOnce() -> bool) -> bool {
    match variant {
        ThemeVariant::Light => false,
        ThemeVariant::Dark => true,
        ThemeVariant::System => system_dark(),
    }
}

/// Detect if the system is in dark mode
pub fn detect_system_dark_mode() -> bool {
    // DRAFTSMITH_COLOR_SCHEME overrides desktop detection
    if let Ok(val) = std::env::var("DRAFTSMITH_COLOR_SCHEME") {
        return val.to_lowercase() != "light";
    }

    // GNOME color-scheme values: 'default', 'prefer-dark', 'prefer-light'
    if let Ok(output) = std::process::Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
    {
        let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
        if stdout.contains("prefer-light") {
            return false;
        }
        if stdout.contains("prefer-dark") {
            return true;
        }
        if stdout.contains("default")
            && let Ok(theme_output) = std::process::Command::new("gsettings")
                .args(["get", "org.gnome.desktop.interface", "gtk-theme"])
                .output()
        {
            let theme = String::from_utf8_lossy(&theme_output.stdout).to_lowercase();
            return theme.contains("dark");
        }
    }

    // KDE
    if let Some(config_dir) = dirs::config_dir()
        && let Ok(content) = std::fs::read_to_string(config_dir.join("kdeglobals"))
    {
        for line in content.lines() {
            if line.starts_with("ColorScheme=") {
                return line.to_lowercase().contains("dark");
            }
        }
    }

    true
}

/// Catppuccin Mocha color palette
mod catppuccin {
    use super::Color;

    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e - main background
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825 - status bar, panels
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244 - borders
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a - selection

    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4 - primary
    pub const SUBTEXT1: Color = Color::Rgb(186, 194, 222); // #bac2de - secondary
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134); // #6c7086 - muted

    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe - focused borders
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa - accent
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1 - success
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af - key hints
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8 - errors
}

/// Rosé Pine Dawn color palette
/// Official colors from https://rosepinetheme.com/palette/ (dawn variant)
mod rose_pine_dawn {
    use super::Color;

    pub const BASE: Color = Color::Rgb(250, 244, 237); // #faf4ed - main background
    pub const SURFACE: Color = Color::Rgb(255, 250, 243); // #fffaf3 - status bar, panels
    pub const HIGHLIGHT_MED: Color = Color::Rgb(223, 218, 210); // #dfdad2 - borders

    pub const TEXT: Color = Color::Rgb(87, 82, 121); // #575279 - primary text
    pub const SUBTLE: Color = Color::Rgb(121, 117, 147); // #797593 - secondary text
    pub const MUTED: Color = Color::Rgb(152, 147, 165); // #9893a5 - muted

    pub const LOVE: Color = Color::Rgb(180, 99, 122); // #b4637a - errors
    pub const GOLD: Color = Color::Rgb(234, 157, 52); // #ea9d34 - key hints
    pub const PINE: Color = Color::Rgb(40, 105, 131); // #286983 - success
    pub const IRIS: Color = Color::Rgb(144, 122, 169); // #907aa9 - accent, focused borders
}

/// Border type helpers
pub mod borders {
    use super::*;

    /// Border type for the editable input
    pub fn input_focused() -> BorderType {
        BorderType::Rounded
    }

    pub fn panel() -> BorderType {
        BorderType::Plain
    }
}

/// Color palette - colors that vary by theme
pub mod colors {
    use super::*;

    fn pick(dark: Color, light: Color) -> Color {
        if is_dark() { dark } else { light }
    }

    pub fn bg_main() -> Color {
        pick(catppuccin::BASE, rose_pine_dawn::BASE)
    }

    pub fn bg_status() -> Color {
        pick(catppuccin::MANTLE, rose_pine_dawn::SURFACE)
    }

    pub fn bg_selection() -> Color {
        pick(catppuccin::SURFACE1, rose_pine_dawn::HIGHLIGHT_MED)
    }

    pub fn fg_primary() -> Color {
        pick(catppuccin::TEXT, rose_pine_dawn::TEXT)
    }

    pub fn fg_secondary() -> Color {
        pick(catppuccin::SUBTEXT1, rose_pine_dawn::SUBTLE)
    }

    pub fn fg_muted() -> Color {
        pick(catppuccin::OVERLAY0, rose_pine_dawn::MUTED)
    }

    pub fn fg_accent() -> Color {
        pick(catppuccin::BLUE, rose_pine_dawn::IRIS)
    }

    pub fn fg_warning() -> Color {
        pick(catppuccin::YELLOW, rose_pine_dawn::GOLD)
    }

    pub fn fg_success() -> Color {
        pick(catppuccin::GREEN, rose_pine_dawn::PINE)
    }

    pub fn fg_error() -> Color {
        pick(catppuccin::RED, rose_pine_dawn::LOVE)
    }

    pub fn border() -> Color {
        pick(catppuccin::SURFACE0, rose_pine_dawn::HIGHLIGHT_MED)
    }

    pub fn border_focused() -> Color {
        pick(catppuccin::LAVENDER, rose_pine_dawn::IRIS)
    }
}

/// Pre-composed styles for common UI elements
pub struct Theme;

impl Theme {
    // === Text Styles ===

    pub fn text() -> Style {
        Style::default()
            .fg(colors::fg_primary())
            .bg(colors::bg_main())
    }

    pub fn text_secondary() -> Style {
        Style::default()
            .fg(colors::fg_secondary())
            .bg(colors::bg_main())
    }

    pub fn text_muted() -> Style {
        Style::default()
            .fg(colors::fg_muted())
            .bg(colors::bg_main())
    }

    pub fn text_accent() -> Style {
        Style::default()
            .fg(colors::fg_accent())
            .bg(colors::bg_main())
    }

    pub fn text_success() -> Style {
        Style::default()
            .fg(colors::fg_success())
            .bg(colors::bg_main())
    }

    pub fn text_error() -> Style {
        Style::default()
            .fg(colors::fg_error())
            .bg(colors::bg_main())
    }

    /// Application title
    pub fn title() -> Style {
        Self::text_accent().add_modifier(Modifier::BOLD)
    }

    /// Field labels ("Bullet Points", "Drafted Email")
    pub fn label() -> Style {
        Self::text().add_modifier(Modifier::BOLD)
    }

    /// Submit / copy buttons
    pub fn button() -> Style {
        Style::default()
            .fg(colors::bg_main())
            .bg(colors::fg_accent())
            .add_modifier(Modifier::BOLD)
    }

    /// Buttons that can't be pressed right now
    pub fn button_disabled() -> Style {
        Style::default()
            .fg(colors::fg_muted())
            .bg(colors::bg_selection())
    }

    // === Status Bar ===

    pub fn status_bar() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_primary())
    }

    pub fn status_error() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_error())
    }

    // === Help Bar ===

    pub fn help_key() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_warning())
    }

    pub fn help_desc() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_muted())
    }

    // === Borders ===

    pub fn border() -> Style {
        Style::default().fg(colors::border()).bg(colors::bg_main())
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(colors::border_focused())
            .bg(colors::bg_main())
    }

    pub fn border_error() -> Style {
        Style::default().fg(colors::fg_error()).bg(colors::bg_main())
    }

    /// Main background style - fills the whole frame
    pub fn main_bg() -> Style {
        Style::default().bg(colors::bg_main())
    }
}
