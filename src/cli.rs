/*!
scatterviz Command Line Interface

Renders scatter-chart option JSON from a configuration file and a query
result file, and validates configurations standalone.
*/

use anyhow::Context;
use clap::{Parser, Subcommand};
use scatterviz::writer::{EChartsScatterWriter, Writer};
use scatterviz::{parse_records, ScatterFormData, VERSION};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scatterviz")]
#[command(about = "Compile scatter-chart configurations into ECharts option JSON")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render an option object from a configuration and a query result
    Render {
        /// Path to the chart configuration JSON
        #[arg(long)]
        config: PathBuf,

        /// Path to the query-result rows JSON (array of row objects)
        #[arg(long)]
        data: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Override the configured color scheme with explicit CSS colors
        #[arg(long, value_delimiter = ',')]
        colors: Option<Vec<String>>,
    },

    /// Validate a configuration without rendering
    Validate {
        /// Path to the chart configuration JSON
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config,
            data,
            output,
            colors,
        } => {
            let json = run_render(&config, &data, colors)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Option JSON written to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Validate { config } => {
            let form = read_form(&config)?;
            EChartsScatterWriter::new().validate(&form)?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}

fn read_form(path: &PathBuf) -> anyhow::Result<ScatterFormData> {
    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(ScatterFormData::from_json(&payload)?)
}

fn run_render(
    config: &PathBuf,
    data: &PathBuf,
    colors: Option<Vec<String>>,
) -> anyhow::Result<String> {
    let form = read_form(config)?;
    let payload = std::fs::read_to_string(data)
        .with_context(|| format!("Failed to read {}", data.display()))?;
    let rows = parse_records(&payload)?;

    let writer = match colors {
        Some(colors) => EChartsScatterWriter::with_colors(colors),
        None => EChartsScatterWriter::new(),
    };
    Ok(writer.write_json(&form, &rows)?)
}
