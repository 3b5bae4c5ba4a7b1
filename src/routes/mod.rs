pub mod widgets;

use chrono::{Local, Utc};
use tracing::{info, Level};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::{
    handlers::RenderContext,
    models::{error::Error, params::WidgetParams, widget::{Widget, WidgetFamily}},
    routes::widgets::{render_widget, WidgetKind},
    utils::{config::Config, state::AppState, theme::Theme},
};

/// Everything one invocation needs, built once before rendering.
pub struct App {
    pub state: AppState,
    pub theme: Theme,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let theme = Theme::new(&state.config.image_base_url);
        App { state, theme }
    }

    /// Renders `kind` against the wall clock and the machine's time zone.
    pub async fn render(&self, kind: WidgetKind, family: WidgetFamily, params: &str) -> Widget {
        let ctx = RenderContext {
            family,
            params: WidgetParams::parse(params),
            now: Utc::now(),
            tz: Local,
            theme: &self.theme,
            config: &self.state.config,
        };
        render_widget(&self.state.fetcher, &ctx, kind).await
    }
}

fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let level = match log_level.as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let filter = filter::Targets::new()
        .with_target("reqwest", Level::WARN)
        .with_target("hyper_util", Level::WARN)
        .with_target(env!("CARGO_PKG_NAME"), level)
        .with_default(Level::INFO);

    // stdout belongs to the widget host
    let tracing_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    Registry::default().with(tracing_layer).with(filter).init();
}

pub fn make_app() -> Result<App, Error> {
    init_tracing();

    info!("Initializing widget runtime...");
    let config = Config::init()?;
    info!("Configuration loaded, cache at {}", config.cache_dir.display());

    let state = AppState::init(config)?;
    info!("HTTP client initialized successfully");

    Ok(App::new(state))
}
