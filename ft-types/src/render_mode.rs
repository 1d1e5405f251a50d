//! Render modes and hinting load targets

/// The rendering mode requested from the rasterizer (`FT_Render_Mode`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum RenderMode {
    /// 8-bit anti-aliased bitmaps.
    #[default]
    Normal = 0,
    /// Anti-aliased, with lighter hinting.
    Light = 1,
    /// 1-bit monochrome bitmaps.
    Mono = 2,
    /// Horizontally decimated LCD displays.
    Lcd = 3,
    /// Vertically decimated LCD displays.
    LcdV = 4,
}

impl RenderMode {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => RenderMode::Normal,
            1 => RenderMode::Light,
            2 => RenderMode::Mono,
            3 => RenderMode::Lcd,
            4 => RenderMode::LcdV,
            _ => return None,
        })
    }

    /// The hinting target that best matches this render mode.
    pub const fn load_target(self) -> LoadTarget {
        LoadTarget::from_render_mode(self)
    }
}

/// Selects the hinting algorithm; OR-ed into the glyph load flags.
///
/// A load target occupies bits 16-19 of the load flags and is derived from
/// a [`RenderMode`]. Only one target can be selected at a time; they cannot
/// be combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadTarget(u32);

impl LoadTarget {
    const SHIFT: u32 = 16;
    const MASK: u32 = 15;

    /// Default hinting, optimized for gray-level rendering.
    pub const NORMAL: LoadTarget = LoadTarget::from_render_mode(RenderMode::Normal);
    /// Lighter hinting; implies forcing the auto-hinter.
    pub const LIGHT: LoadTarget = LoadTarget::from_render_mode(RenderMode::Light);
    /// Strong hinting for monochrome output.
    pub const MONO: LoadTarget = LoadTarget::from_render_mode(RenderMode::Mono);
    pub const LCD: LoadTarget = LoadTarget::from_render_mode(RenderMode::Lcd);
    pub const LCD_V: LoadTarget = LoadTarget::from_render_mode(RenderMode::LcdV);

    pub const fn from_render_mode(mode: RenderMode) -> Self {
        LoadTarget(((mode as u32) & Self::MASK) << Self::SHIFT)
    }

    /// Extracts the load target from a full set of load flags.
    pub const fn from_load_flags(flags: u32) -> Self {
        LoadTarget(flags & (Self::MASK << Self::SHIFT))
    }

    /// The render mode encoded in this target (`FT_LOAD_TARGET_MODE`).
    pub const fn render_mode(self) -> Option<RenderMode> {
        RenderMode::from_raw((self.0 >> Self::SHIFT) & Self::MASK)
    }

    /// The bits to OR into the load flags.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl Default for LoadTarget {
    fn default() -> Self {
        LoadTarget::NORMAL
    }
}

impl From<RenderMode> for LoadTarget {
    fn from(mode: RenderMode) -> Self {
        LoadTarget::from_render_mode(mode)
    }
}
