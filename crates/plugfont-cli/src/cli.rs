//! Command-line argument definitions using Clap v4

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use plugfont::{FontDescription, FontFamily, FontWeight, TextRun, Var};

/// plugfont - match fonts, measure and draw text from the command line
#[derive(Parser, Debug)]
#[command(name = "plugfont")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra font file to install (repeatable)
    #[arg(short = 'f', long = "font", global = true, action = ArgAction::Append)]
    pub fonts: Vec<PathBuf>,

    /// Do not scan the system font directories
    #[arg(long = "no-system-fonts", global = true)]
    pub no_system_fonts: bool,

    /// Raise the log level (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the font families the host can match against
    Families,

    /// Show the face and metrics a description resolves to
    #[command(alias = "d")]
    Describe(DescribeArgs),

    /// Print the width of a text run in pixels
    #[command(alias = "m")]
    Measure(MeasureArgs),

    /// Convert between pixel and character offsets
    Hit(HitArgs),

    /// Draw a text run into a PNG image
    #[command(alias = "r")]
    Render(RenderArgs),
}

/// Which font to ask the host for
#[derive(Args, Debug, Clone)]
pub struct FontArgs {
    /// Face name to try before the generic family
    #[arg(long = "face")]
    pub face: Option<String>,

    /// Generic family
    #[arg(long = "family", value_enum, default_value = "default")]
    pub family: FamilyArg,

    /// Pixel size (0 picks the host default)
    #[arg(short = 's', long = "size", default_value = "0")]
    pub size: u32,

    /// CSS weight, 100 to 900
    #[arg(short = 'w', long = "weight", default_value = "400")]
    pub weight: u16,

    #[arg(long = "italic")]
    pub italic: bool,

    #[arg(long = "small-caps")]
    pub small_caps: bool,

    /// Extra pixels after each character
    #[arg(long = "letter-spacing", default_value = "0", allow_hyphen_values = true)]
    pub letter_spacing: i32,

    /// Extra pixels after each space
    #[arg(long = "word-spacing", default_value = "0", allow_hyphen_values = true)]
    pub word_spacing: i32,
}

impl FontArgs {
    pub fn description(&self) -> FontDescription {
        FontDescription {
            face: self.face.clone().map_or(Var::Undefined, Var::String),
            family: self.family.into(),
            size: self.size,
            weight: FontWeight::from_css(self.weight),
            italic: self.italic,
            small_caps: self.small_caps,
            letter_spacing: self.letter_spacing,
            word_spacing: self.word_spacing,
        }
    }
}

/// The text and its direction
#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// Text to lay out
    pub text: String,

    /// Right-to-left base direction
    #[arg(long = "rtl")]
    pub rtl: bool,

    /// Apply the base direction to the whole run, skipping bidi analysis
    #[arg(long = "override-direction")]
    pub override_direction: bool,
}

impl TextArgs {
    pub fn run(&self) -> TextRun {
        TextRun::new(self.text.clone())
            .rtl(self.rtl)
            .override_direction(self.override_direction)
    }
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub font: FontArgs,
}

#[derive(Args, Debug)]
pub struct MeasureArgs {
    #[command(flatten)]
    pub font: FontArgs,

    #[command(flatten)]
    pub text: TextArgs,
}

#[derive(Args, Debug)]
pub struct HitArgs {
    #[command(flatten)]
    pub font: FontArgs,

    #[command(flatten)]
    pub text: TextArgs,

    /// Pixel position to find the nearest caret for
    #[arg(short = 'x', long = "x", conflicts_with = "index", allow_hyphen_values = true)]
    pub x: Option<i32>,

    /// Character index to find the pixel offset of
    #[arg(short = 'i', long = "index", conflicts_with = "x")]
    pub index: Option<u32>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub font: FontArgs,

    #[command(flatten)]
    pub text: TextArgs,

    /// Output PNG path
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Text color (RRGGBB or RRGGBBAA)
    #[arg(short = 'c', long = "foreground", default_value = "000000FF")]
    pub foreground: String,

    /// Background color (RRGGBB or RRGGBBAA)
    #[arg(short = 'b', long = "background", default_value = "FFFFFF00")]
    pub background: String,

    /// Margin in pixels
    #[arg(short = 'm', long = "margin", default_value = "4")]
    pub margin: u32,

    /// Binary coverage instead of antialiasing
    #[arg(long = "no-antialias")]
    pub no_antialias: bool,
}

/// Generic families as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum FamilyArg {
    Default,
    Serif,
    SansSerif,
    Monospace,
}

impl From<FamilyArg> for FontFamily {
    fn from(family: FamilyArg) -> Self {
        match family {
            FamilyArg::Default => FontFamily::Default,
            FamilyArg::Serif => FontFamily::Serif,
            FamilyArg::SansSerif => FontFamily::SansSerif,
            FamilyArg::Monospace => FontFamily::Monospace,
        }
    }
}
