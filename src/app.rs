use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;

use crate::config::PipelineConfig;
use crate::constants::files::DEFAULT_OUTPUT_DIR;
use crate::pipeline::GoldenSourcePipeline;
use crate::source::load_inputs;
use crate::transport::{InputOverrides, OutputWriter, resolve_inputs};

#[derive(Debug, Parser)]
#[command(
    name = "golden_source",
    disable_help_subcommand = true,
    about = "Build the recruiting golden source",
    long_about = "Rebuild per-application hiring timelines from an activity report and its lookup tables, then write the golden source with its audit tables.",
    after_help = "Input tables are resolved by explicit path first, then discovered under --input-dir by file-name prefix."
)]
struct GoldenSourceCli {
    #[arg(
        long = "input-dir",
        value_name = "DIR",
        help = "Directory searched for input tables"
    )]
    input_dir: PathBuf,
    #[arg(long = "activity-report", value_name = "PATH", help = "Activity report table")]
    activity_report: Option<PathBuf>,
    #[arg(
        long = "activity-dictionary",
        value_name = "PATH",
        help = "Activity dictionary table"
    )]
    activity_dictionary: Option<PathBuf>,
    #[arg(long = "hr-names", value_name = "PATH", help = "HR roster table")]
    hr_names: Option<PathBuf>,
    #[arg(long = "process-steps", value_name = "PATH", help = "Process-step map table")]
    process_steps: Option<PathBuf>,
    #[arg(long = "targets", value_name = "PATH", help = "Stage target table")]
    targets: Option<PathBuf>,
    #[arg(long = "ranking", value_name = "PATH", help = "Rank dictionary table")]
    ranking: Option<PathBuf>,
    #[arg(
        long = "config",
        value_name = "PATH",
        help = "JSON file overriding the built-in business constants"
    )]
    config: Option<PathBuf>,
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Directory receiving the output tables"
    )]
    output_dir: PathBuf,
    #[arg(
        long = "export-segments",
        help = "Also write the moved / not-moved segment snapshots"
    )]
    export_segments: bool,
    #[arg(
        long = "run-date",
        value_name = "YYYY-MM-DD",
        help = "Date used for output file stamps (defaults to today)"
    )]
    run_date: Option<NaiveDate>,
}

/// Run the golden-source build from command-line style arguments (program name excluded).
pub fn run_golden_source<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) =
        parse_cli::<GoldenSourceCli, _>(std::iter::once("golden_source".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_path(path)?,
        None => PipelineConfig::default(),
    };
    let paths = resolve_inputs(
        &cli.input_dir,
        InputOverrides {
            activity_report: cli.activity_report,
            activity_dictionary: cli.activity_dictionary,
            hr_names: cli.hr_names,
            process_steps: cli.process_steps,
            targets: cli.targets,
            ranking: cli.ranking,
        },
    )?;
    info!("[golden_source:app] activity report: {}", paths.activity_report.display());

    let inputs = load_inputs(&paths)?;
    let output = GoldenSourcePipeline::new(config).run(&inputs)?;

    let run_date = cli.run_date.unwrap_or_else(|| Local::now().date_naive());
    let writer = OutputWriter::new(&cli.output_dir, run_date)?;
    let written = writer.write_output(&output, cli.export_segments)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
