use chrono::Duration;

use crate::models::widget::{Font, WidgetFamily};

pub const HEADER_FONT: &str = "Formula1-Display-Wide";
pub const TITLE_FONT: &str = "Formula1-Display-Bold";
pub const BODY_FONT: &str = "Formula1-Display-Regular";

const DEFAULT_LOCALE: &str = "en-GB";
const MIN_REFRESH_MINUTES: i64 = 60;
const MAX_REFRESH_MINUTES: i64 = 365 * 24 * 60;

/// Positional fields of the widget parameter string:
/// `locale|AMPM|refreshMinutes|width|paddingLeft|paddingRight|rowSpacing|columnSpacing|headerFont|titleFont|bodyFont`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetParams {
    fields: Vec<String>,
}

impl WidgetParams {
    pub fn parse(raw: &str) -> Self {
        Self {
            fields: raw.split('|').map(|f| f.trim().to_string()).collect(),
        }
    }

    fn field(&self, idx: usize) -> Option<&str> {
        self.fields
            .get(idx)
            .map(String::as_str)
            .filter(|f| !f.is_empty())
    }

    /// Nonzero leading integer of a field; zero, empty and garbage all mean "use the default".
    fn number(&self, idx: usize) -> Option<i64> {
        self.field(idx).and_then(leading_int).filter(|n| *n != 0)
    }

    pub fn locale(&self) -> &str {
        self.field(0).unwrap_or(DEFAULT_LOCALE)
    }

    pub fn time_ampm(&self) -> bool {
        self.field(1) == Some("AMPM")
    }

    pub fn refresh_interval(&self) -> Duration {
        let minutes = self
            .field(2)
            .and_then(leading_int)
            .unwrap_or(MIN_REFRESH_MINUTES)
            .clamp(MIN_REFRESH_MINUTES, MAX_REFRESH_MINUTES);
        Duration::minutes(minutes)
    }
}

/// Integer prefix of `raw`, the way the widget host's scripting runtime reads numbers.
fn leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[derive(Clone, Copy)]
enum SizeClass {
    Lock,
    Small,
    Default,
}

impl SizeClass {
    fn of(family: WidgetFamily) -> Self {
        match family {
            WidgetFamily::AccessoryRectangular => SizeClass::Lock,
            WidgetFamily::Small => SizeClass::Small,
            WidgetFamily::Medium | WidgetFamily::Large => SizeClass::Default,
        }
    }

    fn pick(self, lock: f64, small: f64, default: f64) -> f64 {
        match self {
            SizeClass::Lock => lock,
            SizeClass::Small => small,
            SizeClass::Default => default,
        }
    }
}

/// Resolved layout knobs for the race schedule widget.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub width: f64,
    pub header_font: Font,
    pub title_font: Font,
    pub body_font: Font,
    pub padding_left: f64,
    pub padding_right: f64,
    pub space_between_rows: f64,
    pub space_between_columns: f64,
    pub locale: String,
    pub time_ampm: bool,
    pub refresh_interval: Duration,
}

impl LayoutOptions {
    pub fn resolve(params: &WidgetParams, family: WidgetFamily) -> Self {
        let size = SizeClass::of(family);
        let or = |idx: usize, default: f64| params.number(idx).map(|n| n as f64).unwrap_or(default);
        let padding = size.pick(-4.0, -4.0, -5.0);

        LayoutOptions {
            width: or(3, size.pick(170.0, 170.0, 328.0)),
            header_font: Font::new(HEADER_FONT, or(8, size.pick(10.0, 12.0, 22.0))),
            title_font: Font::new(TITLE_FONT, or(9, size.pick(9.0, 10.0, 10.0))),
            body_font: Font::new(BODY_FONT, or(10, size.pick(9.0, 10.0, 11.0))),
            padding_left: or(4, padding),
            padding_right: or(5, padding),
            space_between_rows: or(6, size.pick(2.0, 10.0, 3.6)),
            space_between_columns: or(7, 0.0),
            locale: params.locale().to_string(),
            time_ampm: params.time_ampm(),
            refresh_interval: params.refresh_interval(),
        }
    }
}
