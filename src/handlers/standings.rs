use chrono::{Duration, TimeZone};
use serde_json::Value;

use crate::handlers::{stamp, RenderContext};
use crate::models::{
    error::Error,
    params::BODY_FONT,
    race::Envelope,
    standings::StandingsEntry,
    widget::{Background, Color, Font, LinearGradient, Padding, Stack, Text, Widget, WidgetFamily},
};
use crate::utils::{
    fetcher::{DataSource, FetchRequest},
    theme::TeamColors,
};

const CACHE_DURATION_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsKind {
    Drivers,
    Constructors,
}

impl StandingsKind {
    fn endpoint(&self) -> &'static str {
        match self {
            StandingsKind::Drivers => "current/driverStandings.json",
            StandingsKind::Constructors => "current/constructorStandings.json",
        }
    }

    fn cache_key(&self) -> &'static str {
        match self {
            StandingsKind::Drivers => "f1_driver_standings",
            StandingsKind::Constructors => "f1_constructor_standings",
        }
    }

    pub fn entries(&self, data: &Value) -> Result<Vec<StandingsEntry>, Error> {
        let envelope = Envelope::parse(data)?;
        match self {
            StandingsKind::Drivers => envelope
                .into_driver_standings()?
                .iter()
                .map(StandingsEntry::try_from)
                .collect(),
            StandingsKind::Constructors => envelope
                .into_constructor_standings()?
                .iter()
                .map(StandingsEntry::try_from)
                .collect(),
        }
    }
}

fn validate_drivers(data: &Value) -> Result<(), Error> {
    StandingsKind::Drivers.entries(data).map(|_| ())
}

fn validate_constructors(data: &Value) -> Result<(), Error> {
    StandingsKind::Constructors.entries(data).map(|_| ())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowColors {
    pub position: &'static str,
    pub name: &'static str,
    pub points: &'static str,
}

impl RowColors {
    const fn uniform(hex: &'static str) -> Self {
        Self {
            position: hex,
            name: hex,
            points: hex,
        }
    }
}

/// Look of one standings widget variant.
#[derive(Debug, Clone)]
pub struct StandingsStyle {
    pub kind: StandingsKind,
    pub max_rows: usize,
    pub row_spacing: f64,
    pub row_corner_radius: f64,
    pub row_item_spacing: f64,
    pub position_width: f64,
    pub widget_padding: Padding,
    pub top3_padding: Padding,
    pub other_padding: Padding,
    pub top3_font_size: f64,
    pub other_font_size: f64,
    pub top3_colors: RowColors,
    pub other_colors: RowColors,
    pub gradient_locations: [f64; 3],
    pub gradient_opacities: [f64; 3],
}

impl StandingsStyle {
    pub fn drivers() -> Self {
        let colors = RowColors {
            position: "#f0f0f0",
            name: "#f0f0f0",
            points: "#f8f8f8",
        };
        Self {
            kind: StandingsKind::Drivers,
            max_rows: 8,
            row_spacing: 0.4,
            row_corner_radius: 2.0,
            row_item_spacing: 0.0,
            position_width: 22.0,
            widget_padding: Padding::new(0.0, 2.0, 0.0, 0.0),
            top3_padding: Padding::new(5.0, 3.0, 5.0, 13.0),
            other_padding: Padding::new(3.0, 3.0, 3.0, 15.0),
            top3_font_size: 11.0,
            other_font_size: 7.0,
            top3_colors: colors.clone(),
            other_colors: colors,
            gradient_locations: [0.0, 0.96, 0.999],
            gradient_opacities: [0.6, 1.0, 0.08],
        }
    }

    /// Nine rows, white podium and grey midfield text.
    pub fn drivers_compact() -> Self {
        Self {
            kind: StandingsKind::Drivers,
            max_rows: 9,
            row_spacing: 0.5,
            row_corner_radius: 2.0,
            row_item_spacing: 4.0,
            position_width: 18.0,
            widget_padding: Padding::new(0.0, 0.0, 0.0, 0.0),
            top3_padding: Padding::new(3.5, 4.0, 3.5, 8.0),
            other_padding: Padding::new(2.0, 4.0, 2.0, 8.0),
            top3_font_size: 11.0,
            other_font_size: 9.0,
            top3_colors: RowColors::uniform("#ffffff"),
            other_colors: RowColors::uniform("#D3D3D3"),
            gradient_locations: [0.0, 0.96, 0.999],
            gradient_opacities: [0.08, 1.0, 0.03],
        }
    }

    pub fn constructors() -> Self {
        let colors = RowColors {
            position: "#f8f8f8",
            name: "#f8f8f8",
            points: "#f0f0f0",
        };
        Self {
            kind: StandingsKind::Constructors,
            max_rows: 8,
            row_spacing: 0.4,
            row_corner_radius: 2.0,
            row_item_spacing: 0.0,
            position_width: 22.0,
            widget_padding: Padding::new(0.0, 0.0, 0.0, 2.0),
            top3_padding: Padding::new(5.0, 4.0, 5.0, 10.0),
            other_padding: Padding::new(3.0, 4.0, 3.0, 12.0),
            top3_font_size: 11.0,
            other_font_size: 7.0,
            top3_colors: colors.clone(),
            other_colors: colors,
            gradient_locations: [0.001, 0.04, 1.0],
            gradient_opacities: [0.08, 1.0, 0.6],
        }
    }

    fn team_gradient(&self, hex: &str) -> LinearGradient {
        let [faded_in, solid, faded_out] = self.gradient_opacities;
        LinearGradient::new(
            &self.gradient_locations,
            vec![
                Color::with_alpha(hex, faded_in),
                Color::with_alpha(hex, solid),
                Color::with_alpha(hex, faded_out),
            ],
        )
        .horizontal()
    }
}

pub async fn standings_widget<Tz: TimeZone>(
    source: &dyn DataSource,
    ctx: &RenderContext<'_, Tz>,
    style: &StandingsStyle,
) -> Result<Widget, Error> {
    let validate = match style.kind {
        StandingsKind::Drivers => validate_drivers,
        StandingsKind::Constructors => validate_constructors,
    };
    let request = FetchRequest::new(
        ctx.api_url(style.kind.endpoint()),
        style.kind.cache_key(),
        Duration::hours(CACHE_DURATION_HOURS),
    )
    .validated_by(validate);

    let fetched = source.fetch_json(&request).await?;
    let entries = style.kind.entries(&fetched.data)?;

    let mut widget = render_standings(&entries, style, &ctx.theme.team_colors, ctx.family);
    stamp(
        &mut widget,
        fetched.freshness,
        ctx.now,
        Duration::hours(CACHE_DURATION_HOURS),
    );
    Ok(widget)
}

/// One gradient row per entry, in API order, up to `style.max_rows`.
pub fn render_standings(
    entries: &[StandingsEntry],
    style: &StandingsStyle,
    colors: &TeamColors,
    family: WidgetFamily,
) -> Widget {
    let mut widget = Widget::new(family);
    widget.padding = Some(style.widget_padding);

    let shown = entries.len().min(style.max_rows);
    for (i, entry) in entries.iter().take(shown).enumerate() {
        widget.push(standings_row(entry, style, colors));
        if i + 1 < shown {
            widget.add_spacer(Some(style.row_spacing));
        }
    }
    widget
}

fn standings_row(entry: &StandingsEntry, style: &StandingsStyle, colors: &TeamColors) -> Stack {
    let (padding, font_size, text_colors) = if entry.is_top3() {
        (style.top3_padding, style.top3_font_size, &style.top3_colors)
    } else {
        (style.other_padding, style.other_font_size, &style.other_colors)
    };
    let font = Font::new(BODY_FONT, font_size);

    let position = Stack::horizontal().size(style.position_width, 0.0).child(
        Text::new(entry.position.to_string(), font.clone()).color(Color::hex(text_colors.position)),
    );

    Stack::horizontal()
        .spacing(style.row_item_spacing)
        .background(Background::Gradient(
            style.team_gradient(colors.color_for(&entry.team_id)),
        ))
        .corner_radius(style.row_corner_radius)
        .padding(padding)
        .child(position)
        .child(
            Text::new(entry.name.clone(), font.clone())
                .color(Color::hex(text_colors.name))
                .single_line(1.0),
        )
        .spacer(None)
        .child(Text::new(entry.points_text(), font).color(Color::hex(text_colors.points)))
}
