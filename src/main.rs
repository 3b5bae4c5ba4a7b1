use clap::Parser;
use f1_widgets::{
    models::widget::WidgetFamily,
    routes::{make_app, widgets::WidgetKind},
};
use tracing::error;

/// Renders one F1 home-screen widget and prints its layout as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Which widget to render
    #[arg(value_enum)]
    kind: WidgetKind,

    /// Size class the host is drawing
    #[arg(long, value_enum, default_value_t = WidgetFamily::Medium)]
    family: WidgetFamily,

    /// Pipe-delimited widget parameters
    #[arg(long, env = "WIDGET_PARAMETER", default_value = "")]
    params: String,

    /// Pretty-print the layout
    #[arg(long)]
    pretty: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let app = make_app()?;
    let widget = app.render(cli.kind, cli.family, &cli.params).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&widget)
    } else {
        serde_json::to_string(&widget)
    };
    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize widget: {e}");
            return Err(e.into());
        }
    }
    Ok(())
}
