//! Style roles for CLI output
//!
//! Each logical role maps to an optional `colored::Color`. Coloring is applied
//! only when the `enabled` flag passed to `paint()` is true, so callers decide
//! once (from `--color` and the terminal) and no global state is touched.
//!
//! ```
//! use relaymq::core::styles::StyleRole;
//! assert_eq!(StyleRole::Pass.paint("ok", false), "ok");
//! assert!(StyleRole::Pass.paint("ok", true).starts_with("\x1b["));
//! ```

use clap::builder::styling::AnsiColor;
use colored::Color;

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }
        }
    };
}

style! {
    Header => Some(Color::Yellow),
    Key    => Some(Color::BrightGreen),
    Value  => None,
    Pass   => Some(Color::Green),
    Fail   => Some(Color::BrightRed),
    Dim    => Some(Color::BrightBlack),
}

impl StyleRole {
    pub fn ansi_code(self) -> Option<String> {
        self.color().map(map_color_code)
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        match self.ansi_code() {
            Some(code) if enabled => format!("\x1b[{}m{}\x1b[0m", code, text),
            _ => text.to_string(),
        }
    }

    /// Foreground style spec for prettytable cells (`"Fg"`, `"FR"`, ...)
    pub fn table_spec(self) -> Option<&'static str> {
        use Color::*;
        Some(match self.color()? {
            Black => "Fk",
            Red => "Fr",
            Green => "Fg",
            Yellow => "Fy",
            Blue => "Fb",
            Magenta => "Fm",
            Cyan => "Fc",
            White => "Fw",
            BrightBlack => "FK",
            BrightRed => "FR",
            BrightGreen => "FG",
            BrightYellow => "FY",
            BrightBlue => "FB",
            BrightMagenta => "FM",
            BrightCyan => "FC",
            BrightWhite => "FW",
            TrueColor { .. } => return None,
        })
    }
}

fn map_color_code(c: Color) -> String {
    use Color::*;
    match c {
        Black => "30".to_string(),
        Red => "31".to_string(),
        Green => "32".to_string(),
        Yellow => "33".to_string(),
        Blue => "34".to_string(),
        Magenta => "35".to_string(),
        Cyan => "36".to_string(),
        White => "37".to_string(),
        BrightBlack => "90".to_string(),
        BrightRed => "91".to_string(),
        BrightGreen => "92".to_string(),
        BrightYellow => "93".to_string(),
        BrightBlue => "94".to_string(),
        BrightMagenta => "95".to_string(),
        BrightCyan => "96".to_string(),
        BrightWhite => "97".to_string(),
        TrueColor { r, g, b } => format!("38;2;{};{};{}", r, g, b),
    }
}

fn color_to_ansi(c: Color) -> Option<AnsiColor> {
    use AnsiColor as A;
    use Color::*;
    Some(match c {
        Black => A::Black,
        Red => A::Red,
        Green => A::Green,
        Yellow => A::Yellow,
        Blue => A::Blue,
        Magenta => A::Magenta,
        Cyan => A::Cyan,
        White => A::White,
        BrightBlack => A::BrightBlack,
        BrightRed => A::BrightRed,
        BrightGreen => A::BrightGreen,
        BrightYellow => A::BrightYellow,
        BrightBlue => A::BrightBlue,
        BrightMagenta => A::BrightMagenta,
        BrightCyan => A::BrightCyan,
        BrightWhite => A::BrightWhite,
        TrueColor { .. } => return None,
    })
}

/// clap help styles built from the same roles
pub fn palette_to_clap(enabled: bool) -> clap::builder::Styles {
    use clap::builder::styling::{Color as ClapColor, Style};
    if !enabled {
        return clap::builder::Styles::plain();
    }

    let style = |role: StyleRole, bold: bool| {
        let mut s = Style::new();
        if let Some(col) = role.color().and_then(color_to_ansi) {
            s = s.fg_color(Some(ClapColor::Ansi(col)));
        }
        if bold {
            s = s.bold();
        }
        s
    };

    clap::builder::Styles::styled()
        .header(style(StyleRole::Header, true))
        .usage(style(StyleRole::Header, true))
        .literal(style(StyleRole::Key, false))
        .placeholder(style(StyleRole::Dim, false))
        .valid(style(StyleRole::Pass, false))
        .invalid(style(StyleRole::Fail, false))
        .error(style(StyleRole::Fail, true))
}
