use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tools::{
    GlobeConfig, OutputFormat, ToolError, View, legend_records, load_records, render,
    resolve_scale, summary,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render air-quality feeds into map and globe markers")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project and classify every reading of a feed
    Render {
        #[arg(long, value_enum)]
        view: View,

        /// Feed payload (JSON array or paginated `results` object)
        #[arg(long)]
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Severity scale JSON replacing the view's default scale
        #[arg(long)]
        scale_file: Option<PathBuf>,

        /// Globe radius in scene units (env: ATLAS_GLOBE_RADIUS)
        #[arg(long)]
        globe_radius: Option<f64>,

        /// Marker lift as a fraction of the globe radius (env: ATLAS_MARKER_LIFT)
        #[arg(long)]
        lift: Option<f64>,
    },

    /// Count readings per severity band
    Summary {
        #[arg(long, value_enum)]
        view: View,

        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        scale_file: Option<PathBuf>,
    },

    /// Print the legend of a view's severity scale
    Legend {
        #[arg(long, value_enum)]
        view: View,

        #[arg(long)]
        scale_file: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), ToolError> {
    let args = Args::parse();

    match args.command {
        Command::Render {
            view,
            input,
            format,
            scale_file,
            globe_radius,
            lift,
        } => {
            let scale = resolve_scale(view, scale_file.as_deref())?;
            let records = load_records(&input, view.metric())?;
            let globe = GlobeConfig::from_env().with_overrides(globe_radius, lift);
            print_json(&render(view, &records, scale, globe, format)?)
        }
        Command::Summary {
            view,
            input,
            scale_file,
        } => {
            let scale = resolve_scale(view, scale_file.as_deref())?;
            let records = load_records(&input, view.metric())?;
            print_json(&summary(&records, &scale))
        }
        Command::Legend { view, scale_file } => {
            let scale = resolve_scale(view, scale_file.as_deref())?;
            print_json(&legend_records(&scale))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ToolError> {
    let payload = serde_json::to_string_pretty(value).map_err(ToolError::Json)?;
    println!("{payload}");
    Ok(())
}
