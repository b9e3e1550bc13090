use ratatui::style::Color;

// Centralized theme colors for the classic desktop look. Kept as small
// helpers so call sites read as roles rather than raw colors.

pub const DESKTOP_RGB: (u8, u8, u8) = (0, 128, 128);
pub const TITLE_ACTIVE_RGB: (u8, u8, u8) = (0, 0, 128);
pub const FACE_RGB: (u8, u8, u8) = (192, 192, 192);
pub const SHADOW_RGB: (u8, u8, u8) = (128, 128, 128);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

// Desktop
pub fn desktop_bg() -> Color {
    rgb_to_color(DESKTOP_RGB)
}
pub fn desktop_fg() -> Color {
    Color::White
}
pub fn icon_selected_bg() -> Color {
    rgb_to_color(TITLE_ACTIVE_RGB)
}
pub fn icon_selected_fg() -> Color {
    Color::White
}

// Windows
pub fn window_bg() -> Color {
    rgb_to_color(FACE_RGB)
}
pub fn window_fg() -> Color {
    Color::Black
}
pub fn window_border() -> Color {
    Color::Black
}
pub fn title_active_bg() -> Color {
    rgb_to_color(TITLE_ACTIVE_RGB)
}
pub fn title_active_fg() -> Color {
    Color::White
}
pub fn title_inactive_bg() -> Color {
    rgb_to_color(SHADOW_RGB)
}
pub fn title_inactive_fg() -> Color {
    rgb_to_color(FACE_RGB)
}
pub fn control_bg() -> Color {
    rgb_to_color(FACE_RGB)
}
pub fn control_fg() -> Color {
    Color::Black
}

// Content widgets
pub fn field_bg() -> Color {
    Color::White
}
pub fn field_fg() -> Color {
    Color::Black
}
pub fn button_bg() -> Color {
    rgb_to_color(FACE_RGB)
}
pub fn button_fg() -> Color {
    Color::Black
}
pub fn button_accent_fg() -> Color {
    Color::Red
}
pub fn button_pressed_bg() -> Color {
    rgb_to_color(SHADOW_RGB)
}

// Taskbar
pub fn taskbar_bg() -> Color {
    rgb_to_color(FACE_RGB)
}
pub fn taskbar_fg() -> Color {
    Color::Black
}
pub fn taskbar_active_bg() -> Color {
    Color::White
}
pub fn taskbar_active_fg() -> Color {
    Color::Black
}
pub fn tray_fg() -> Color {
    Color::Black
}

// Menus
pub fn menu_bg() -> Color {
    rgb_to_color(FACE_RGB)
}
pub fn menu_fg() -> Color {
    Color::Black
}
pub fn menu_selected_bg() -> Color {
    rgb_to_color(TITLE_ACTIVE_RGB)
}
pub fn menu_selected_fg() -> Color {
    Color::White
}
pub fn menu_banner_bg() -> Color {
    rgb_to_color(SHADOW_RGB)
}
pub fn menu_banner_fg() -> Color {
    Color::White
}
