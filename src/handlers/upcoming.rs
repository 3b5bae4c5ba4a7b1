use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

use chrono::{Duration, TimeZone};
use serde_json::Value;

use crate::handlers::{stamp, RenderContext};
use crate::models::{
    error::Error,
    params::{BODY_FONT, HEADER_FONT},
    race::{races_from, Race},
    widget::{
        Background, Color, Font, Image, LinearGradient, Padding, Size, Stack, Text, Widget,
        WidgetFamily,
    },
};
use crate::utils::{
    cache_store::image_key,
    fetcher::{DataSource, FetchRequest},
    race_utils::{format_race_date_time, upcoming_races},
    theme::Theme,
};

const RACES_KEY: &str = "f1RacesCache";
const CACHE_DURATION_HOURS: i64 = 1;
const CIRCUIT_IMAGE_DAYS: i64 = 90;
const NO_RACES_TEXT: &str = "No upcoming races found.";
const TEXT_COLOR: &str = "#ffffff";
const DATE_COLOR: &str = "#F5F5F5";

/// What sits left of each race entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Flag,
    CircuitImage,
}

#[derive(Debug, Clone)]
pub struct UpcomingStyle {
    pub marker: Marker,
    pub skip: usize,
    pub max_races: usize,
    pub spacing_between_races: f64,
    pub entry_spacing: f64,
    pub widget_padding: Padding,
    pub background: LinearGradient,
    pub date_separator: &'static str,
}

impl UpcomingStyle {
    /// The next three races with their country flags.
    pub fn flags() -> Self {
        Self {
            marker: Marker::Flag,
            skip: 0,
            max_races: 3,
            spacing_between_races: 14.0,
            entry_spacing: 8.0,
            widget_padding: Padding::new(14.0, 12.0, 0.0, 12.0),
            background: LinearGradient::new(
                &[0.0, 0.3, 1.0],
                vec![
                    Color::clear(),
                    Color::with_alpha("#808080", 0.3),
                    Color::clear(),
                ],
            )
            .horizontal(),
            date_separator: "  •  ",
        }
    }

    /// Three races after the next one, with track outlines.
    pub fn circuits() -> Self {
        Self {
            marker: Marker::CircuitImage,
            skip: 1,
            max_races: 3,
            spacing_between_races: 8.0,
            entry_spacing: 10.0,
            widget_padding: Padding::new(10.0, 20.0, 0.0, 20.0),
            background: LinearGradient::new(
                &[0.0, 0.35, 1.0],
                vec![
                    Color::clear(),
                    Color::with_alpha("#808080", 0.23),
                    Color::clear(),
                ],
            )
            .horizontal(),
            date_separator: " • ",
        }
    }

    fn display_name(&self, race: &Race) -> String {
        match self.marker {
            Marker::Flag => format!(" {}", race.race_name.to_uppercase()),
            Marker::CircuitImage => race
                .race_name
                .replace("Grand Prix", "")
                .trim()
                .to_uppercase(),
        }
    }
}

fn validate_races(data: &Value) -> Result<(), Error> {
    races_from(data).map(|_| ())
}

fn date_gradient() -> LinearGradient {
    LinearGradient::new(
        &[0.0, 0.03, 0.5, 0.97, 1.0],
        vec![
            Color::with_alpha("#E8002D", 0.03),
            Color::with_alpha("#E8002D", 0.9),
            Color::with_alpha("#E8002D", 0.7),
            Color::with_alpha("#E8002D", 1.0),
            Color::with_alpha("#E8002D", 0.03),
        ],
    )
    .horizontal()
}

fn bar_gradient() -> LinearGradient {
    LinearGradient::new(
        &[0.0, 0.03, 0.45, 0.97, 1.0],
        vec![
            Color::with_alpha("#E8002D", 0.03),
            Color::with_alpha("#E8002D", 0.9),
            Color::with_alpha("#E8002D", 0.75),
            Color::with_alpha("#358C75", 0.6),
            Color::with_alpha("#F58020", 0.03),
        ],
    )
    .horizontal()
}

pub async fn upcoming_widget<Tz>(
    source: &dyn DataSource,
    ctx: &RenderContext<'_, Tz>,
    style: &UpcomingStyle,
) -> Result<Widget, Error>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let request = FetchRequest::new(
        ctx.api_url("current.json"),
        RACES_KEY,
        Duration::hours(CACHE_DURATION_HOURS),
    )
    .validated_by(validate_races);
    let fetched = source.fetch_json(&request).await?;
    let season = races_from(&fetched.data)?;
    let races = upcoming_races(&season, ctx.now, style.skip, style.max_races);

    let mut images = HashMap::new();
    if style.marker == Marker::CircuitImage {
        for race in &races {
            let name = &race.circuit.circuit_name;
            if images.contains_key(name) {
                continue;
            }
            let url = ctx.theme.circuit_images.url_for(name);
            let path = source
                .fetch_image(&url, &image_key(name), Some(Duration::days(CIRCUIT_IMAGE_DAYS)))
                .await;
            images.insert(name.clone(), path);
        }
    }

    let mut widget = render_upcoming(&races, &images, style, ctx.theme, &ctx.tz, ctx.family);
    stamp(
        &mut widget,
        fetched.freshness,
        ctx.now,
        Duration::hours(CACHE_DURATION_HOURS),
    );
    Ok(widget)
}

pub fn render_upcoming<Tz>(
    races: &[&Race],
    images: &HashMap<String, Option<PathBuf>>,
    style: &UpcomingStyle,
    theme: &Theme,
    tz: &Tz,
    family: WidgetFamily,
) -> Widget
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut widget = Widget::new(family);
    widget.background = Some(Background::Gradient(style.background.clone()));
    widget.padding = Some(style.widget_padding);

    if races.is_empty() {
        widget.push(Text::new(NO_RACES_TEXT, Font::new(BODY_FONT, 12.0)).color(Color::hex(TEXT_COLOR)));
        return widget;
    }

    for race in races {
        let image = images.get(&race.circuit.circuit_name).cloned().flatten();
        widget.push(race_entry(race, image, style, theme, tz));
        widget.add_spacer(Some(style.spacing_between_races));
    }
    widget
}

fn race_entry<Tz>(
    race: &Race,
    image: Option<PathBuf>,
    style: &UpcomingStyle,
    theme: &Theme,
    tz: &Tz,
) -> Stack
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let white = Color::hex(TEXT_COLOR);
    let date_line = race
        .start()
        .map(|start| format_race_date_time(start, tz, style.date_separator))
        .unwrap_or_default();

    let marker = match (style.marker, image) {
        (Marker::CircuitImage, Some(path)) => Stack::horizontal().child(Image {
            path,
            size: Size {
                width: 40.0,
                height: 40.0,
            },
            corner_radius: Some(5.0),
        }),
        (Marker::CircuitImage, None) => Stack::horizontal()
            .child(Text::new("🏎️", Font::new(BODY_FONT, 40.0)).color(white.clone())),
        (Marker::Flag, _) => Stack::horizontal().child(
            Text::new(
                theme.country_flags.flag_for(race.country_or_location()),
                Font::new(BODY_FONT, 30.0),
            )
            .color(white.clone()),
        ),
    };

    let name = Stack::horizontal()
        .padding(match style.marker {
            Marker::Flag => Padding::new(0.0, 3.0, 0.0, 0.0),
            Marker::CircuitImage => Padding::new(0.0, 10.0, 0.0, 0.0),
        })
        .child(
            Text::new(style.display_name(race), Font::new(HEADER_FONT, 10.0))
                .color(white.clone())
                .single_line(1.0),
        );

    let mut details = Stack::vertical()
        .spacing(match style.marker {
            Marker::Flag => 5.0,
            Marker::CircuitImage => 4.0,
        })
        .child(name);

    match style.marker {
        Marker::Flag => details.push(
            Stack::horizontal()
                .padding(Padding::new(2.1, 11.0, 2.1, 8.0))
                .background(Background::Gradient(date_gradient()))
                .corner_radius(0.0)
                .child(Text::new(date_line, Font::new(BODY_FONT, 11.0)).color(Color::hex(DATE_COLOR)))
                .spacer(None),
        ),
        Marker::CircuitImage => {
            details.push(
                Stack::horizontal()
                    .padding(Padding::new(0.0, 10.0, 0.0, 8.0))
                    .child(Text::new(date_line, Font::new(BODY_FONT, 11.0)).color(white)),
            );
            details.push(
                Stack::horizontal()
                    .padding(Padding::new(8.0, 11.0, 0.0, 8.0))
                    .background(Background::Gradient(bar_gradient()))
                    .corner_radius(0.0)
                    .spacer(None),
            );
        }
    }

    Stack::horizontal()
        .spacing(style.entry_spacing)
        .child(marker)
        .child(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn race(round: u32, name: &str, country: &str, date: &str) -> Race {
        serde_json::from_value(json!({
            "season": "2025",
            "round": round.to_string(),
            "raceName": name,
            "date": date,
            "time": "04:00:00Z",
            "Circuit": {
                "circuitId": format!("c{round}"),
                "circuitName": format!("Circuit {round}"),
                "Location": {"locality": "Somewhere", "country": country}
            }
        }))
        .unwrap()
    }

    #[test]
    fn flag_entries_show_country_name_and_date() {
        let races = [race(1, "Australian Grand Prix", "Australia", "2025-03-16")];
        let refs: Vec<&Race> = races.iter().collect();
        let widget = render_upcoming(
            &refs,
            &HashMap::new(),
            &UpcomingStyle::flags(),
            &Theme::new("https://img.example"),
            &Utc,
            WidgetFamily::Medium,
        );

        let texts: Vec<&str> = widget.texts().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            ["🇦🇺", " AUSTRALIAN GRAND PRIX", "Sun 16 Mar  •  04:00"]
        );
    }

    #[test]
    fn circuit_entries_drop_grand_prix_and_fall_back_to_car() {
        let races = [race(2, "Chinese Grand Prix", "China", "2025-03-23")];
        let refs: Vec<&Race> = races.iter().collect();
        let widget = render_upcoming(
            &refs,
            &HashMap::from([("Circuit 2".to_string(), None)]),
            &UpcomingStyle::circuits(),
            &Theme::new("https://img.example"),
            &Utc,
            WidgetFamily::Medium,
        );

        let texts: Vec<&str> = widget.texts().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["🏎️", "CHINESE", "Sun 23 Mar • 04:00"]);
    }

    #[test]
    fn empty_list_shows_notice() {
        let widget = render_upcoming::<Utc>(
            &[],
            &HashMap::new(),
            &UpcomingStyle::circuits(),
            &Theme::new("https://img.example"),
            &Utc,
            WidgetFamily::Medium,
        );
        assert_eq!(widget.texts()[0].text, NO_RACES_TEXT);
    }

    #[test]
    fn circuits_style_skips_the_next_race() {
        let season = [
            race(1, "Australian Grand Prix", "Australia", "2025-03-16"),
            race(2, "Chinese Grand Prix", "China", "2025-03-23"),
        ];
        let now: DateTime<Utc> = "2025-03-10T00:00:00Z".parse().unwrap();
        let style = UpcomingStyle::circuits();
        let picked = upcoming_races(&season, now, style.skip, style.max_races);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].round, "2");
    }
}
