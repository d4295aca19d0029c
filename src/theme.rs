use catppuccin::PALETTE;
use ratatui::style::Color;
use ratatui::widgets::BorderType;

const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used by the table screen, taken from a Catppuccin flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub surface0: Color,
    pub surface1: Color,
    pub surface2: Color,
    pub overlay1: Color,
    pub text: Color,
    pub subtext0: Color,
    pub subtext1: Color,
    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub lavender: Color,

    pub border_type: BorderType,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            surface2: catppuccin_to_color(&c.surface2),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            subtext1: catppuccin_to_color(&c.subtext1),
            mauve: catppuccin_to_color(&c.mauve),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            yellow: catppuccin_to_color(&c.yellow),
            green: catppuccin_to_color(&c.green),
            lavender: catppuccin_to_color(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    /// Catppuccin Mocha theme (dark).
    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    /// Catppuccin Latte theme (light).
    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    /// Catppuccin Frappé theme (dark).
    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    /// Catppuccin Macchiato theme (dark).
    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    #[must_use]
    pub const fn text(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn muted(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn accent(&self) -> Color {
        self.mauve
    }

    #[must_use]
    pub const fn key(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn success(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn error(&self) -> Color {
        self.red
    }

    #[must_use]
    pub const fn border(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn selection_bg(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn selection_fg(&self) -> Color {
        self.lavender
    }

    #[must_use]
    pub const fn header(&self) -> Color {
        self.yellow
    }

    #[must_use]
    pub const fn header_bg(&self) -> Color {
        self.surface0
    }

    #[must_use]
    pub const fn separator(&self) -> Color {
        self.surface2
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Built-in theme names as accepted in `[theme] name`.
pub const THEME_NAMES: &[&str] = &[
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappé",
    "Catppuccin Latte",
];

/// Look up a theme by name. Returns the default theme if not found.
pub fn theme_from_name(name: &str) -> Theme {
    match name {
        "Catppuccin Macchiato" => Theme::catppuccin_macchiato(),
        "Catppuccin Frappé" | "Catppuccin Frappe" => Theme::catppuccin_frappe(),
        "Catppuccin Latte" => Theme::catppuccin_latte(),
        "Catppuccin Mocha" => Theme::catppuccin_mocha(),
        other => {
            tracing::warn!(theme = other, available = ?THEME_NAMES, "Unknown theme, using Catppuccin Mocha");
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        assert_eq!(theme_from_name("Catppuccin Latte"), Theme::catppuccin_latte());
        assert_ne!(theme_from_name("Catppuccin Latte"), Theme::catppuccin_mocha());
        assert_eq!(theme_from_name("Solarized"), Theme::default());
    }

    #[test]
    fn test_all_names_resolve() {
        for name in THEME_NAMES {
            let theme = theme_from_name(name);
            assert_eq!(theme.border_type, BorderType::Rounded);
        }
        assert_eq!(theme_from_name("Catppuccin Frappé"), Theme::catppuccin_frappe());
    }
}
