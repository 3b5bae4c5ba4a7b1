pub mod race;
pub mod standings;
pub mod upcoming;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{
    cache::Freshness,
    error::Error,
    params::{WidgetParams, BODY_FONT},
    widget::{Background, Color, Font, LinearGradient, Stack, Text, Widget, WidgetFamily},
};
use crate::utils::{config::Config, theme::Theme};

pub const NO_STANDINGS_TITLE: &str = "No Standings Data";
pub const NO_RACES_TITLE: &str = "No Races Data";

/// Everything a widget handler needs besides its data source.
pub struct RenderContext<'a, Tz: TimeZone> {
    pub family: WidgetFamily,
    pub params: WidgetParams,
    pub now: DateTime<Utc>,
    pub tz: Tz,
    pub theme: &'a Theme,
    pub config: &'a Config,
}

impl<Tz: TimeZone> RenderContext<'_, Tz> {
    pub fn api_url(&self, path: &str) -> String {
        self.config.api_url(path)
    }
}

/// Records where the data came from and when the host should ask again.
pub fn stamp(widget: &mut Widget, freshness: Freshness, now: DateTime<Utc>, refresh: Duration) {
    widget.freshness = Some(freshness.label());
    widget.refresh_after = now.checked_add_signed(refresh);
}

/// Which family of fallback view a widget shows when it has no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorView {
    Standings,
    Races,
}

impl ErrorView {
    pub fn title(&self) -> &'static str {
        match self {
            ErrorView::Standings => NO_STANDINGS_TITLE,
            ErrorView::Races => NO_RACES_TITLE,
        }
    }
}

/// Terminal view for an unrecoverable failure: fixed title plus the error text.
pub fn error_widget(view: ErrorView, error: &Error, family: WidgetFamily, theme: &Theme) -> Widget {
    let mut widget = Widget::new(family);
    let title_size = match view {
        ErrorView::Standings => {
            widget.background = Some(Background::Color(Color::hex(
                theme.team_colors.default_color(),
            )));
            11.0
        }
        ErrorView::Races => {
            widget.background = Some(Background::Gradient(
                LinearGradient::new(
                    &[0.0, 0.3, 1.0],
                    vec![
                        Color::clear(),
                        Color::with_alpha("#808080", 0.3),
                        Color::clear(),
                    ],
                )
                .horizontal(),
            ));
            12.0
        }
    };

    widget.push(
        Stack::vertical()
            .centered()
            .child(Text::new(view.title(), Font::new(BODY_FONT, title_size)).color(Color::hex("#ff0000")))
            .child(Text::new(error.message(), Font::new(BODY_FONT, 10.0)).color(Color::hex("#ffffff"))),
    );
    widget
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_widget_carries_title_and_message() {
        let theme = Theme::new("https://img.example");
        let err = Error::Fetch("API request failed".into());
        let widget = error_widget(ErrorView::Standings, &err, WidgetFamily::Small, &theme);

        let texts: Vec<&str> = widget.texts().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["No Standings Data", "API request failed"]);
        assert_eq!(
            widget.background,
            Some(Background::Color(Color::hex("#333333")))
        );
    }

    #[test]
    fn stamp_past_the_calendar_leaves_no_refresh_date() {
        let mut widget = Widget::new(WidgetFamily::Small);
        stamp(&mut widget, Freshness::Live, DateTime::<Utc>::MAX_UTC, Duration::hours(1));
        assert_eq!(widget.refresh_after, None);
        assert_eq!(widget.freshness.as_deref(), Some("live"));
    }

    #[test]
    fn races_error_uses_races_title() {
        let theme = Theme::new("https://img.example");
        let err = Error::invalid("Invalid data structure");
        let widget = error_widget(ErrorView::Races, &err, WidgetFamily::Medium, &theme);
        assert_eq!(widget.texts()[0].text, "No Races Data");
        assert_eq!(widget.texts()[0].font.size, 12.0);
    }
}
