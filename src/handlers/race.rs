use std::fmt::Display;
use std::path::PathBuf;

use chrono::TimeZone;
use serde_json::Value;

use crate::handlers::{stamp, RenderContext};
use crate::models::{
    error::Error,
    params::LayoutOptions,
    race::{next_race_from, races_from},
    session::{RaceWeekend, SessionView},
    widget::{
        Background, Color, Image, LinearGradient, Padding, Size, Spacer, Stack, Text, Widget,
        WidgetFamily,
    },
};
use crate::utils::{
    cache_store::image_key,
    fetcher::{DataSource, FetchRequest},
    race_utils::{derive_sessions, format_weekend_dates, resolve_next_race, TimeFormat},
};

const NEXT_RACE_KEY: &str = "f1DataCache";
const SEASON_KEY: &str = "f1AllRaceDataCache";
const TITLE_COLOR: &str = "#F5F5F5";
const PAST_OPACITY: f64 = 0.5;

fn validate_next_race(data: &Value) -> Result<(), Error> {
    next_race_from(data).map(|_| ())
}

fn validate_season(data: &Value) -> Result<(), Error> {
    races_from(data).map(|_| ())
}

fn title_gradient() -> LinearGradient {
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

fn widget_gradient() -> LinearGradient {
    LinearGradient::new(
        &[0.0, 0.77, 1.0],
        vec![
            Color::clear(),
            Color::with_alpha("#808080", 0.25),
            Color::clear(),
        ],
    )
}

pub async fn next_race_widget<Tz>(
    source: &dyn DataSource,
    ctx: &RenderContext<'_, Tz>,
) -> Result<Widget, Error>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let options = LayoutOptions::resolve(&ctx.params, ctx.family);
    let refresh = options.refresh_interval;

    let next = source
        .fetch_json(
            &FetchRequest::new(ctx.api_url("current/next.json"), NEXT_RACE_KEY, refresh)
                .validated_by(validate_next_race),
        )
        .await;
    let season = source
        .fetch_json(
            &FetchRequest::new(ctx.api_url("current/races.json"), SEASON_KEY, refresh)
                .validated_by(validate_season),
        )
        .await;

    let freshness = [&next, &season]
        .into_iter()
        .find_map(|fetched| fetched.as_ref().ok().map(|f| f.freshness));
    let race = resolve_next_race(
        next.and_then(|fetched| next_race_from(&fetched.data)),
        season.and_then(|fetched| races_from(&fetched.data)),
        ctx.now,
    )?;
    let weekend = RaceWeekend::try_from(&race)?;

    let format = TimeFormat::new(&options.locale, options.time_ampm);
    let sessions = derive_sessions(&weekend, ctx.now, &ctx.tz, &format);

    let image = match ctx.theme.circuit_images.known_url(&weekend.circuit_name) {
        Some(url) => {
            source
                .fetch_image(&url, &image_key(&weekend.circuit_name), None)
                .await
        }
        None => None,
    };

    let first_day = weekend.sessions[0].start.with_timezone(&ctx.tz).date_naive();
    let race_day = weekend.sessions[4].start.with_timezone(&ctx.tz).date_naive();
    let dates = format_weekend_dates(first_day, race_day);

    let mut widget = render_next_race(&weekend, &sessions, &dates, image, &options, ctx.family);
    if let Some(freshness) = freshness {
        stamp(&mut widget, freshness, ctx.now, refresh);
    }
    Ok(widget)
}

/// Header, circuit row and one column per session.
pub fn render_next_race(
    weekend: &RaceWeekend,
    sessions: &[SessionView; 5],
    dates: &str,
    image: Option<PathBuf>,
    options: &LayoutOptions,
    family: WidgetFamily,
) -> Widget {
    let mut widget = Widget::new(family);
    widget.background = Some(Background::Gradient(widget_gradient()));

    widget.push(
        Stack::horizontal()
            .size(options.width, 0.0)
            .spacer(None)
            .child(
                Text::new(weekend.race_name.to_uppercase(), options.header_font.clone())
                    .single_line(0.5),
            )
            .spacer(None),
    );

    let mut circuit = Stack::horizontal().spacing(0.0);
    if let Some(path) = image {
        circuit.push(
            Stack::horizontal().size(0.0, 38.0).centered().child(Image {
                path,
                size: Size {
                    width: 68.0,
                    height: 34.0,
                },
                corner_radius: None,
            }),
        );
    }
    circuit.push(
        Stack::vertical()
            .size(0.0, 36.0)
            .centered()
            .child(Text::new(dates, options.body_font.clone()).single_line(0.5))
            .spacer(Some(options.space_between_rows))
            .child(
                Text::new(weekend.circuit_name.clone(), options.body_font.clone())
                    .opacity(0.9)
                    .single_line(0.5),
            ),
    );
    widget.push(
        Stack::horizontal()
            .size(options.width, 40.0)
            .centered()
            .spacer(None)
            .child(circuit)
            .spacer(None),
    );

    let mut body = Stack::horizontal().size(options.width, 0.0);
    for session in sessions {
        body.push(session_column(session, options));
        body.push(Spacer {
            length: Some(options.space_between_columns),
        });
    }
    widget.push(body);
    widget
}

fn session_column(session: &SessionView, options: &LayoutOptions) -> Stack {
    let opacity = if session.is_past { PAST_OPACITY } else { 1.0 };
    let cells = [
        (session.label.to_string(), true),
        (session.weekday.clone(), false),
        (session.date.clone(), false),
        (session.time.clone(), false),
    ];

    let mut column = Stack::vertical().padding(Padding::new(
        0.0,
        options.padding_left,
        0.0,
        options.padding_right,
    ));
    for (text, is_title) in cells {
        let mut cell = Stack::horizontal().padding(Padding::new(
            options.space_between_rows,
            0.0,
            options.space_between_rows,
            0.0,
        ));
        let text = if is_title {
            cell = cell
                .background(Background::Gradient(title_gradient()))
                .corner_radius(0.0);
            Text::new(text, options.title_font.clone()).color(Color::hex(TITLE_COLOR))
        } else {
            Text::new(text, options.body_font.clone())
        };
        column.push(
            cell.spacer(None)
                .child(text.opacity(opacity).single_line(0.5))
                .spacer(None),
        );
    }
    column
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::params::WidgetParams;
    use crate::models::race::Race;
    use crate::models::widget::Node;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn weekend() -> RaceWeekend {
        let race: Race = serde_json::from_value(json!({
            "season": "2025",
            "round": "1",
            "raceName": "Australian Grand Prix",
            "date": "2025-03-16",
            "time": "04:00:00Z",
            "Circuit": {
                "circuitId": "albert_park",
                "circuitName": "Albert Park Grand Prix Circuit",
                "Location": {"locality": "Melbourne", "country": "Australia"}
            },
            "FirstPractice": {"date": "2025-03-14", "time": "01:30:00Z"},
            "SecondPractice": {"date": "2025-03-14", "time": "05:00:00Z"},
            "ThirdPractice": {"date": "2025-03-15", "time": "01:30:00Z"},
            "Qualifying": {"date": "2025-03-15", "time": "05:00:00Z"}
        }))
        .unwrap();
        RaceWeekend::try_from(&race).unwrap()
    }

    fn columns(widget: &Widget) -> Vec<&Stack> {
        let Some(Node::Stack(body)) = widget.children.last() else {
            panic!("missing body");
        };
        body.children
            .iter()
            .filter_map(|n| match n {
                Node::Stack(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn past_sessions_are_dimmed() {
        let weekend = weekend();
        let now: DateTime<Utc> = "2025-03-15T03:00:00Z".parse().unwrap();
        let options = LayoutOptions::resolve(&WidgetParams::parse(""), WidgetFamily::Medium);
        let sessions = derive_sessions(&weekend, now, &Utc, &TimeFormat::new("en-GB", false));

        let widget = render_next_race(
            &weekend,
            &sessions,
            "14 - 16 Mar",
            None,
            &options,
            WidgetFamily::Medium,
        );

        let opacities: Vec<f64> = columns(&widget)
            .iter()
            .map(|column| {
                let Node::Stack(cell) = &column.children[0] else {
                    panic!("cell is not a stack");
                };
                match &cell.children[1] {
                    Node::Text(t) => t.opacity,
                    _ => panic!("cell has no text"),
                }
            })
            .collect();
        assert_eq!(opacities, [0.5, 0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn header_and_titles() {
        let weekend = weekend();
        let now: DateTime<Utc> = "2025-03-01T00:00:00Z".parse().unwrap();
        let options = LayoutOptions::resolve(&WidgetParams::parse(""), WidgetFamily::Large);
        let sessions = derive_sessions(&weekend, now, &Utc, &TimeFormat::new("en-GB", false));
        let widget = render_next_race(
            &weekend,
            &sessions,
            "14 - 16 Mar",
            Some(PathBuf::from("/tmp/albert.png")),
            &options,
            WidgetFamily::Large,
        );

        let texts: Vec<&str> = widget.texts().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts[0], "AUSTRALIAN GRAND PRIX");
        assert_eq!(texts[1], "14 - 16 Mar");
        assert_eq!(texts[2], "Albert Park Grand Prix Circuit");
        assert_eq!(&texts[3..7], ["FP1", "Fri", "14/3", "01:30"]);
        assert_eq!(texts[texts.len() - 4], "Race");
        assert_eq!(columns(&widget).len(), 5);
    }
}
