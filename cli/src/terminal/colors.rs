use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 110, g: 190, b: 255 };
pub const SECONDARY: Color = Color::TrueColor { r: 150, g: 150, b: 220 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 200, b: 90 };
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 220, g: 220, b: 220 };
pub const SEPARATOR: Color = Color::TrueColor { r: 110, g: 110, b: 110 };

pub const IPV4_ADDR: Color = Color::TrueColor { r: 120, g: 220, b: 150 };
pub const IPV4_PREFIX: Color = Color::TrueColor { r: 80, g: 160, b: 110 };
pub const IPV6_ADDR: Color = Color::TrueColor { r: 200, g: 150, b: 255 };
pub const IPV6_PREFIX: Color = Color::TrueColor { r: 150, g: 110, b: 200 };
pub const MAC_ADDR: Color = Color::TrueColor { r: 255, g: 170, b: 120 };

pub const ROUTER: Color = Color::TrueColor { r: 255, g: 120, b: 120 };
pub const PRINTER: Color = Color::TrueColor { r: 120, g: 200, b: 255 };
pub const SET_TOP_BOX: Color = Color::TrueColor { r: 255, g: 160, b: 60 };
pub const SMART_TV: Color = Color::TrueColor { r: 230, g: 120, b: 230 };
pub const COMPUTER: Color = Color::TrueColor { r: 220, g: 220, b: 220 };
pub const UNKNOWN: Color = Color::TrueColor { r: 130, g: 130, b: 130 };
