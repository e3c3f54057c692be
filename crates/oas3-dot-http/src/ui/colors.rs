use std::io::IsTerminal;

use clap::{ValueEnum, builder::styling::Ansi256Color};
use comfy_table::Color as ComfyColor;
use crossterm::style::Color;
use http::Method;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
  Dark,
  Light,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
  Color::Rgb { r, g, b }
}

pub struct Colors {
  enabled: bool,
  theme: Theme,
}

pub trait IntoComfyColor {
  fn into(self) -> ComfyColor;
}

impl IntoComfyColor for Color {
  fn into(self) -> ComfyColor {
    match self {
      Color::Reset => ComfyColor::Reset,
      Color::Black => ComfyColor::Black,
      Color::DarkGrey => ComfyColor::DarkGrey,
      Color::Red => ComfyColor::Red,
      Color::DarkRed => ComfyColor::DarkRed,
      Color::Green => ComfyColor::Green,
      Color::DarkGreen => ComfyColor::DarkGreen,
      Color::Yellow => ComfyColor::Yellow,
      Color::DarkYellow => ComfyColor::DarkYellow,
      Color::Blue => ComfyColor::Blue,
      Color::DarkBlue => ComfyColor::DarkBlue,
      Color::Magenta => ComfyColor::Magenta,
      Color::DarkMagenta => ComfyColor::DarkMagenta,
      Color::Cyan => ComfyColor::Cyan,
      Color::DarkCyan => ComfyColor::DarkCyan,
      Color::White => ComfyColor::White,
      Color::Grey => ComfyColor::Grey,
      Color::Rgb { r, g, b } => ComfyColor::Rgb { r, g, b },
      Color::AnsiValue(val) => ComfyColor::AnsiValue(val),
    }
  }
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  /// `Reset` when colors are off, otherwise the variant for the active theme.
  const fn pick(&self, dark: Color, light: Color) -> Color {
    if !self.enabled {
      return Color::Reset;
    }
    match self.theme {
      Theme::Dark => dark,
      Theme::Light => light,
    }
  }

  pub const fn timestamp(&self) -> Color {
    self.pick(rgb(128, 150, 170), rgb(84, 96, 110))
  }

  pub const fn primary(&self) -> Color {
    self.pick(rgb(140, 190, 220), rgb(30, 72, 110))
  }

  pub const fn accent(&self) -> Color {
    self.pick(rgb(230, 110, 90), rgb(190, 60, 45))
  }

  pub const fn info(&self) -> Color {
    self.pick(rgb(150, 170, 200), rgb(50, 100, 160))
  }

  pub const fn success(&self) -> Color {
    self.pick(rgb(120, 200, 140), rgb(30, 130, 70))
  }

  pub const fn label(&self) -> Color {
    self.pick(rgb(100, 180, 230), rgb(40, 90, 150))
  }

  pub const fn value(&self) -> Color {
    self.pick(rgb(240, 240, 240), rgb(30, 30, 30))
  }

  /// Verb colors follow the usual REST client conventions.
  pub fn method(&self, method: &Method) -> Color {
    match *method {
      Method::GET => self.pick(rgb(120, 200, 140), rgb(30, 130, 70)),
      Method::POST => self.pick(rgb(240, 200, 90), rgb(170, 120, 10)),
      Method::PUT | Method::PATCH => self.pick(rgb(140, 190, 220), rgb(30, 72, 110)),
      Method::DELETE => self.accent(),
      _ => self.info(),
    }
  }

  const fn to_clap(color: Color) -> Option<clap::builder::styling::Color> {
    use clap::builder::styling::{AnsiColor, Color as ClapColor, RgbColor};

    match color {
      Color::Black => Some(ClapColor::Ansi(AnsiColor::Black)),
      Color::Blue | Color::DarkBlue => Some(ClapColor::Ansi(AnsiColor::Blue)),
      Color::Cyan | Color::DarkCyan => Some(ClapColor::Ansi(AnsiColor::Cyan)),
      Color::DarkGreen | Color::Green => Some(ClapColor::Ansi(AnsiColor::Green)),
      Color::DarkGrey | Color::Grey => Some(ClapColor::Ansi(AnsiColor::BrightBlack)),
      Color::DarkMagenta | Color::Magenta => Some(ClapColor::Ansi(AnsiColor::Magenta)),
      Color::DarkRed | Color::Red => Some(ClapColor::Ansi(AnsiColor::Red)),
      Color::DarkYellow | Color::Yellow => Some(ClapColor::Ansi(AnsiColor::Yellow)),
      Color::White => Some(ClapColor::Ansi(AnsiColor::White)),
      Color::AnsiValue(val) => Some(ClapColor::Ansi256(Ansi256Color(val))),
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      Color::Reset => None,
    }
  }

  pub const fn clap_styles() -> clap::builder::Styles {
    use clap::builder::styling::{Style, Styles};

    let colors = Self::new(true, Theme::Dark);

    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(colors.label())))
      .usage(Style::new().bold().fg_color(Self::to_clap(colors.label())))
      .literal(Style::new().fg_color(Self::to_clap(colors.success())))
      .placeholder(Style::new().fg_color(Self::to_clap(colors.info())))
      .error(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
      .valid(Style::new().fg_color(Self::to_clap(colors.success())))
      .invalid(Style::new().bold().fg_color(Self::to_clap(colors.accent())))
  }
}

pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stdout().is_terminal(),
  }
}

pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref()).unwrap_or(Theme::Dark),
  }
}

/// `COLORFGBG` is `<fg>;<bg>` (sometimes with a middle field); backgrounds 8
/// and up are the bright palette entries.
fn theme_from_colorfgbg(value: Option<&str>) -> Option<Theme> {
  let background = value?.split(';').next_back()?.parse::<u8>().ok()?;
  Some(if background >= 8 { Theme::Light } else { Theme::Dark })
}
