use bevy::prelude::*;

/// Dark text for light backgrounds
pub const LABEL_TEXT: Color = Color::srgb(0.1, 0.1, 0.1);

/// Dark text for headers
pub const HEADER_TEXT: Color = Color::srgb(0.05, 0.2, 0.35);

/// White text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.98, 0.98, 0.98);
/// #2e9df7
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.180, 0.616, 0.969);
/// #69b8f7
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.412, 0.722, 0.969);
/// #1f6fb0
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.122, 0.435, 0.690);

/// Pale blue behind every view
pub const SCREEN_BACKGROUND: Color = Color::srgb(0.91, 0.96, 1.0);
/// #cfe8fc
pub const PLAYFIELD_BACKGROUND: Color = Color::srgb(0.812, 0.910, 0.988);

pub const GAUGE_BACKGROUND: Color = Color::srgb(0.75, 0.78, 0.82);
/// #2e9df7
pub const GAUGE_FILL: Color = Color::srgb(0.180, 0.616, 0.969);

/// #ffc907
pub const FOCUS_OUTLINE: Color = Color::srgb(1.0, 0.788, 0.027);

#[cfg(feature = "dev")]
pub const DEBUG_TEXT: Color = Color::srgb(0.8, 0.1, 0.1);
