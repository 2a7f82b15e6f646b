use serde::{Deserialize, Serialize};

/// Semantic colour role a piece of dashboard data asks for
///
/// Models map their closed sets onto these roles and the theme decides the
/// actual colour, so views never hard-code a colour per status or priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Primary,
    Secondary,
    Warning,
    Danger,
    Muted,
}

/// Color theme for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    pub title: Color,
    pub subtitle: Color,
    pub selected_bg: Color,
    pub tab_active: Color,
    pub tab_inactive: Color,

    // Tones
    pub primary: Color,
    pub secondary: Color,
    pub warning: Color,
    pub danger: Color,
    pub muted: Color,

    pub sidebar: Color,
    pub sidebar_accent: Color,
}

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

impl ThemeColors {
    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Primary => self.primary,
            Tone::Secondary => self.secondary,
            Tone::Warning => self.warning,
            Tone::Danger => self.danger,
            Tone::Muted => self.muted,
        }
    }
}

impl Theme {
    /// Dark navy base with the blue/green accents of the web dashboard
    pub fn default_dark() -> Self {
        Self {
            name: "Default Dark".to_string(),
            colors: ThemeColors {
                background: Color::rgb(0x0f172a),
                foreground: Color::rgb(0xe2e8f0),
                border: Color::rgb(0x334155),
                border_focused: Color::rgb(0x3b82f6),

                title: Color::rgb(0xf8fafc),
                subtitle: Color::rgb(0x94a3b8),
                selected_bg: Color::rgb(0x1e293b),
                tab_active: Color::rgb(0x3b82f6),
                tab_inactive: Color::rgb(0x64748b),

                primary: Color::rgb(0x3b82f6),
                secondary: Color::rgb(0x10b981),
                warning: Color::rgb(0xf59e0b),
                danger: Color::rgb(0xef4444),
                muted: Color::rgb(0x64748b),

                sidebar: Color::rgb(0x111827),
                sidebar_accent: Color::rgb(0x3b82f6),
            },
        }
    }

    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            colors: ThemeColors {
                background: Color::rgb(0xffffff),
                foreground: Color::rgb(0x0f172a),
                border: Color::rgb(0xcbd5e1),
                border_focused: Color::rgb(0x2563eb),

                title: Color::rgb(0x020617),
                subtitle: Color::rgb(0x475569),
                selected_bg: Color::rgb(0xe2e8f0),
                tab_active: Color::rgb(0x2563eb),
                tab_inactive: Color::rgb(0x94a3b8),

                primary: Color::rgb(0x2563eb),
                secondary: Color::rgb(0x059669),
                warning: Color::rgb(0xd97706),
                danger: Color::rgb(0xdc2626),
                muted: Color::rgb(0x94a3b8),

                sidebar: Color::rgb(0xf1f5f9),
                sidebar_accent: Color::rgb(0x2563eb),
            },
        }
    }

    pub fn nord() -> Self {
        Self {
            name: "Nord".to_string(),
            colors: ThemeColors {
                background: Color::rgb(0x2e3440),
                foreground: Color::rgb(0xeceff4),
                border: Color::rgb(0x4c566a),
                border_focused: Color::rgb(0x88c0d0),

                title: Color::rgb(0xb48ead),
                subtitle: Color::rgb(0xd8dee9),
                selected_bg: Color::rgb(0x3b4252),
                tab_active: Color::rgb(0x8fbcbb),
                tab_inactive: Color::rgb(0x4c566a),

                primary: Color::rgb(0x81a1c1),
                secondary: Color::rgb(0xa3be8c),
                warning: Color::rgb(0xebcb8b),
                danger: Color::rgb(0xbf616a),
                muted: Color::rgb(0x4c566a),

                sidebar: Color::rgb(0x3b4252),
                sidebar_accent: Color::rgb(0x88c0d0),
            },
        }
    }

    pub fn all_themes() -> Vec<Theme> {
        vec![Self::default_dark(), Self::light(), Self::nord()]
    }

    /// Case-insensitive lookup by theme name
    pub fn by_name(name: &str) -> Option<Theme> {
        Self::all_themes()
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}
