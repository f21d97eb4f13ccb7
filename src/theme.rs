//! 明暗主题
//!
//! 默认值来自终端环境，运行时可切换，不持久化。

use clap::ValueEnum;
use ratatui::style::Color;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// 界面使用的颜色
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub selected: Color,
    pub favorable: Color,
    pub unfavorable: Color,
    pub alert: Color,
}

impl Theme {
    /// 根据 `COLORFGBG` 判断终端背景
    pub fn detect() -> Self {
        Self::from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// 形如 "15;0" 或 "0;default;15"，最后一段是背景色号；无法判断时视为暗色
    pub fn from_colorfgbg(value: Option<&str>) -> Self {
        let bg = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());
        match bg {
            Some(7) | Some(9..=15) => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                fg: Color::White,
                bg: Color::Reset,
                muted: Color::Gray,
                accent: Color::Cyan,
                selected: Color::Yellow,
                favorable: Color::Green,
                unfavorable: Color::Red,
                alert: Color::LightRed,
            },
            Theme::Light => Palette {
                fg: Color::Black,
                bg: Color::White,
                muted: Color::DarkGray,
                accent: Color::Blue,
                selected: Color::Magenta,
                favorable: Color::Green,
                unfavorable: Color::Red,
                alert: Color::Red,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_colorfgbg() {
        assert_eq!(Theme::from_colorfgbg(Some("15;0")), Theme::Dark);
        assert_eq!(Theme::from_colorfgbg(Some("0;15")), Theme::Light);
        assert_eq!(Theme::from_colorfgbg(Some("0;default;7")), Theme::Light);
        assert_eq!(Theme::from_colorfgbg(Some("garbage")), Theme::Dark);
        assert_eq!(Theme::from_colorfgbg(None), Theme::Dark);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle().toggle(), Theme::Light);
    }
}
