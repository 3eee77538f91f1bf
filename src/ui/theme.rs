use ratatui::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub bg: Color,
    pub panel: Color,
    pub muted: Color,
    pub text: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub highlight: Color,
}

const DARK: Palette = Palette {
    bg: Color::Rgb(15, 20, 28),
    panel: Color::Rgb(28, 38, 52),
    muted: Color::Rgb(130, 144, 164),
    text: Color::Rgb(226, 234, 244),
    primary: Color::Rgb(111, 201, 255),
    success: Color::Rgb(112, 220, 142),
    warning: Color::Rgb(255, 210, 110),
    highlight: Color::Rgb(32, 57, 84),
};

const LIGHT: Palette = Palette {
    bg: Color::Rgb(246, 247, 250),
    panel: Color::Rgb(196, 204, 216),
    muted: Color::Rgb(98, 110, 128),
    text: Color::Rgb(24, 30, 40),
    primary: Color::Rgb(20, 110, 190),
    success: Color::Rgb(28, 140, 70),
    warning: Color::Rgb(190, 110, 0),
    highlight: Color::Rgb(214, 230, 248),
};

impl Theme {
    pub fn palette(&self) -> &'static Palette {
        match self {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}
