use std::fmt::Display;

use chrono::TimeZone;
use tracing::{error, info};

use crate::handlers::{
    error_widget,
    race::next_race_widget,
    standings::{standings_widget, StandingsStyle},
    upcoming::{upcoming_widget, UpcomingStyle},
    ErrorView, RenderContext,
};
use crate::models::widget::Widget;
use crate::utils::fetcher::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WidgetKind {
    DriverStandings,
    DriverStandingsCompact,
    ConstructorStandings,
    NextRace,
    UpcomingRaces,
    UpcomingCircuits,
}

impl WidgetKind {
    pub fn error_view(&self) -> ErrorView {
        match self {
            WidgetKind::DriverStandings
            | WidgetKind::DriverStandingsCompact
            | WidgetKind::ConstructorStandings => ErrorView::Standings,
            WidgetKind::NextRace | WidgetKind::UpcomingRaces | WidgetKind::UpcomingCircuits => {
                ErrorView::Races
            }
        }
    }
}

/// Renders one widget. Never fails: any error becomes the fallback view.
pub async fn render_widget<Tz>(
    source: &dyn DataSource,
    ctx: &RenderContext<'_, Tz>,
    kind: WidgetKind,
) -> Widget
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    info!("Rendering {kind:?} for {:?}", ctx.family);
    let result = match kind {
        WidgetKind::DriverStandings => {
            standings_widget(source, ctx, &StandingsStyle::drivers()).await
        }
        WidgetKind::DriverStandingsCompact => {
            standings_widget(source, ctx, &StandingsStyle::drivers_compact()).await
        }
        WidgetKind::ConstructorStandings => {
            standings_widget(source, ctx, &StandingsStyle::constructors()).await
        }
        WidgetKind::NextRace => next_race_widget(source, ctx).await,
        WidgetKind::UpcomingRaces => upcoming_widget(source, ctx, &UpcomingStyle::flags()).await,
        WidgetKind::UpcomingCircuits => {
            upcoming_widget(source, ctx, &UpcomingStyle::circuits()).await
        }
    };

    result.unwrap_or_else(|e| {
        error!("Failed to render {kind:?}: {e}");
        error_widget(kind.error_view(), &e, ctx.family, ctx.theme)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn kinds_parse_from_kebab_case() {
        assert_eq!(
            WidgetKind::from_str("driver-standings-compact", false),
            Ok(WidgetKind::DriverStandingsCompact)
        );
        assert_eq!(
            WidgetKind::from_str("upcoming-circuits", false),
            Ok(WidgetKind::UpcomingCircuits)
        );
    }

    #[test]
    fn kinds_map_to_error_views() {
        assert_eq!(WidgetKind::ConstructorStandings.error_view(), ErrorView::Standings);
        assert_eq!(WidgetKind::NextRace.error_view(), ErrorView::Races);
    }
}
