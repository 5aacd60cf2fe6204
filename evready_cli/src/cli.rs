use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use enum_dispatch::enum_dispatch;
use evready::{
    config::Config,
    country::CountryMetrics,
    formatters::{CSVFormatter, GeoJSONFormatter, JSONFormatter, OutputFormatter, OutputGenerator},
    gap::{self, GapCategory, GapFilter, DEFAULT_MIN_STATIONS},
    geo::BBox,
    search::{CaseSensitivity, CountryFilter, MatchType, SearchConfig, SearchContext},
    sort::{self, SortDirection, SortField, DEFAULT_RANK_LIMIT},
    stats::Metric,
    view_spec::{ViewParams, ViewSpec},
    Evready,
};
use log::{debug, info};
use nonempty::nonempty;
use serde::{Deserialize, Serialize};
use spinners::{Spinner, Spinners};
use strum_macros::EnumString;

use crate::display::{
    display_census, display_countries, display_gap, display_rank, display_summary, display_table,
};
use crate::error::EvreadyCliResult;

const DEFAULT_PROGRESS_SPINNER: Spinners = Spinners::Dots;
const COMPLETE_PROGRESS_STRING: &str = "✔";
const RUNNING_TAIL_STRING: &str = "...";
const LOADING_DATASET_STRING: &str = "Loading dataset";

/// Defines the output formats we are able to produce data in.
#[derive(Clone, Debug, Deserialize, Serialize, EnumString, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum OutputFormat {
    Csv,
    Json,
    GeoJSON,
}

impl From<&OutputFormat> for OutputFormatter {
    fn from(value: &OutputFormat) -> Self {
        match value {
            OutputFormat::Csv => OutputFormatter::Csv(CSVFormatter),
            OutputFormat::Json => OutputFormatter::Json(JSONFormatter),
            OutputFormat::GeoJSON => OutputFormatter::GeoJSON(GeoJSONFormatter),
        }
    }
}

impl From<OutputFormat> for OutputFormatter {
    fn from(value: OutputFormat) -> Self {
        Self::from(&value)
    }
}

fn write_output<T, U>(
    output_generator: T,
    countries: &[&CountryMetrics],
    output_file: Option<U>,
) -> EvreadyCliResult<()>
where
    T: OutputGenerator,
    U: AsRef<Path>,
{
    if let Some(output_file) = output_file {
        let mut f = File::create(output_file).context("Failed to write output")?;
        output_generator.save(&mut f, countries)?;
    } else {
        let mut stdout_lock = std::io::stdout().lock();
        output_generator.save(&mut stdout_lock, countries)?;
    };
    Ok(())
}

/// Trait that defines what to run when a given subcommand is invoked.
#[enum_dispatch]
pub trait RunCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()>;
}

fn load_evready(config: Config, quiet: bool) -> EvreadyCliResult<Evready> {
    let sp = (!quiet).then(|| {
        Spinner::with_timer(
            DEFAULT_PROGRESS_SPINNER,
            LOADING_DATASET_STRING.to_string() + RUNNING_TAIL_STRING,
        )
    });
    let evready = Evready::new_with_config(config);
    if let Some(mut s) = sp {
        s.stop_with_symbol(COMPLETE_PROGRESS_STRING);
    }
    Ok(evready?)
}

// A simple function to manage similaries across multiple cases.
// May ultimately be generalised to a function to manage all progress UX
// that can be switched on and off.
fn print_countries_count(len_countries: usize) {
    println!("Found {len_countries} country(s).");
}

#[derive(Debug, Clone, clap::ValueEnum, Copy)]
enum MatchTypeArgs {
    Regex,
    Exact,
    Contains,
    Startswith,
}

impl From<MatchTypeArgs> for MatchType {
    fn from(value: MatchTypeArgs) -> Self {
        match value {
            MatchTypeArgs::Regex => MatchType::Regex,
            MatchTypeArgs::Exact => MatchType::Exact,
            MatchTypeArgs::Contains => MatchType::Contains,
            MatchTypeArgs::Startswith => MatchType::Startswith,
        }
    }
}

#[derive(Debug, Clone, clap::ValueEnum, Copy)]
enum CaseSensitivityArgs {
    Sensitive,
    Insensitive,
}

impl From<CaseSensitivityArgs> for CaseSensitivity {
    fn from(value: CaseSensitivityArgs) -> Self {
        match value {
            CaseSensitivityArgs::Insensitive => CaseSensitivity::Insensitive,
            CaseSensitivityArgs::Sensitive => CaseSensitivity::Sensitive,
        }
    }
}

/// These are the command-line arguments that can be parsed into `CountryFilter`s. The type is
/// slightly different because of the way we allow people to search in text fields.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(long, help="Filter by country code", num_args=0..)]
    code: Vec<String>,
    #[arg(long, help="Filter by country name", num_args=0..)]
    name: Vec<String>,
    #[arg(short, long, help="Filter by country code or name", num_args=0..)]
    text: Vec<String>,
    #[arg(
        value_enum,
        short = 'm',
        long,
        value_name = "MATCH_TYPE",
        help = "\
        Type of matching to perform on the 'code', 'name' and 'text' arguments\n\
        during the search.\n",
        default_value_t=MatchTypeArgs::Contains
    )]
    match_type: MatchTypeArgs,
    #[arg(
        value_enum,
        long,
        value_name = "CASE_SENSITIVITY",
        help = "\
        Type of case sensitivity used in matching on the 'code', 'name' and\n\
        'text' arguments during the search.\n",
        default_value_t=CaseSensitivityArgs::Insensitive
    )]
    case_sensitivity: CaseSensitivityArgs,
}

fn filters_from_args(
    code: Vec<String>,
    name: Vec<String>,
    text: Vec<String>,
    match_type: MatchType,
    case_sensitivity: CaseSensitivity,
) -> Vec<CountryFilter> {
    let mut all_filters: Vec<CountryFilter> = vec![];
    all_filters.extend(code.iter().map(|t| CountryFilter {
        text: t.clone(),
        context: nonempty![SearchContext::CountryCode],
        config: SearchConfig {
            match_type,
            case_sensitivity,
        },
    }));
    all_filters.extend(name.iter().map(|t| CountryFilter {
        text: t.clone(),
        context: nonempty![SearchContext::CountryName],
        config: SearchConfig {
            match_type,
            case_sensitivity,
        },
    }));
    all_filters.extend(text.iter().map(|t| CountryFilter {
        text: t.clone(),
        context: SearchContext::all(),
        config: SearchConfig {
            match_type,
            case_sensitivity,
        },
    }));
    all_filters
}

impl From<FilterArgs> for Vec<CountryFilter> {
    fn from(args: FilterArgs) -> Self {
        filters_from_args(
            args.code,
            args.name,
            args.text,
            args.match_type.into(),
            args.case_sensitivity.into(),
        )
    }
}

// Filters are applied conjunctively, i.e. a record has to match all of them
// to stay in the view.
fn filtered_view<'a>(
    countries: &'a [CountryMetrics],
    filters: &[CountryFilter],
) -> EvreadyCliResult<Vec<&'a CountryMetrics>> {
    let mut view: Vec<&CountryMetrics> = countries.iter().collect();
    for filter in filters {
        let compiled = filter.compile()?;
        view.retain(|country| compiled.matches(country));
    }
    Ok(view)
}

/// The `summary` command shows headline statistics for the whole dataset.
#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for SummaryCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()> {
        info!("Running `summary` subcommand");
        let evready = load_evready(config, self.quiet)?;
        display_summary(&evready.dataset.info, &evready.summary());
        Ok(())
    }
}

/// The `rank` command shows the top countries by a chosen metric.
#[derive(Args, Debug)]
pub struct RankCommand {
    #[arg(
        long,
        value_name = "eiri|stations|gap_value|availability_norm",
        help = "Metric to rank countries by",
        default_value_t = Metric::Eiri
    )]
    metric: Metric,
    #[arg(
        short = 'n',
        long,
        help = "Number of countries to show",
        default_value_t = DEFAULT_RANK_LIMIT
    )]
    limit: usize,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for RankCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()> {
        info!("Running `rank` subcommand");
        let evready = load_evready(config, self.quiet)?;
        let ranked = evready.rank(self.metric, self.limit);
        display_rank(&ranked, self.metric);
        Ok(())
    }
}

/// The `table` command lists every country ordered on a chosen column.
#[derive(Args, Debug)]
pub struct TableCommand {
    #[arg(
        long,
        value_name = "COLUMN",
        help = "Column to order the table on",
        default_value_t = SortField::Eiri
    )]
    sort_by: SortField,
    #[arg(
        long,
        value_name = "ascending|descending",
        help = "Direction to order the table in",
        default_value_t = SortDirection::Descending
    )]
    direction: SortDirection,
    #[command(flatten)]
    filter_args: FilterArgs,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for TableCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()> {
        info!("Running `table` subcommand");
        debug!("{:#?}", self);
        let evready = load_evready(config, self.quiet)?;
        let filters: Vec<CountryFilter> = self.filter_args.clone().into();
        let view = filtered_view(evready.countries(), &filters)?;
        let view = sort::sort_view(view, self.sort_by, self.direction);
        display_table(&view);
        Ok(())
    }
}

/// The `gap` command groups countries by whether demand or infrastructure is ahead.
#[derive(Args, Debug)]
pub struct GapCommand {
    #[arg(
        long,
        value_name = "all|demand|balanced|infra",
        help = "Only show countries in one bucket",
        default_value_t = GapCategory::All
    )]
    category: GapCategory,
    #[arg(
        long,
        value_name = "N",
        help = "Ignore countries with at most this many stations",
        default_value_t = DEFAULT_MIN_STATIONS
    )]
    min_stations: u64,
    #[arg(long, help = "Show counts per bucket instead of listing countries")]
    census: bool,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for GapCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()> {
        info!("Running `gap` subcommand");
        let evready = load_evready(config, self.quiet)?;
        if self.census {
            let filter = GapFilter {
                min_stations: self.min_stations,
                category: GapCategory::All,
            };
            let view = evready.gap_view(&filter);
            display_census(&gap::bucket_census(&view));
        } else {
            let filter = GapFilter {
                min_stations: self.min_stations,
                category: self.category,
            };
            display_gap(&evready.gap_view(&filter));
        }
        Ok(())
    }
}

/// The `countries` command returns the countries we have records for.
#[derive(Args, Debug)]
pub struct CountriesCommand {
    #[command(flatten)]
    filter_args: FilterArgs,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for CountriesCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()> {
        info!("Running `countries` subcommand");
        let evready = load_evready(config, self.quiet)?;
        let filters: Vec<CountryFilter> = self.filter_args.clone().into();
        let view = filtered_view(evready.countries(), &filters)?;
        let view = sort::sort_view(view, SortField::CountryCode, SortDirection::Ascending);
        println!("\nThe following countries are available:");
        display_countries(&view);
        Ok(())
    }
}

/// The `export` command outputs country records in a given format.
#[derive(Args, Debug)]
pub struct ExportCommand {
    #[arg(
        short = 'f',
        long,
        value_name = "csv|json|geojson",
        help = "Output format for the results"
    )]
    output_format: OutputFormat,
    #[arg(short = 'o', long, help = "Output file to place the results")]
    output_file: Option<String>,
    #[command(flatten)]
    filter_args: FilterArgs,
    #[arg(
        short,
        long,
        value_name = "WEST,SOUTH,EAST,NORTH",
        allow_hyphen_values = true,
        help = "\
            Bounding box to restrict the export to. Only countries with a marker\n\
            location inside the box are kept."
    )]
    bbox: Option<BBox>,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for ExportCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()> {
        info!("Running `export` subcommand");
        let evready = load_evready(config, self.quiet)?;
        let filters: Vec<CountryFilter> = self.filter_args.clone().into();
        let mut view = filtered_view(evready.countries(), &filters)?;
        if let Some(bbox) = &self.bbox {
            view.retain(|country| bbox.covers(country));
        }
        if self.output_file.is_some() {
            print_countries_count(view.len());
        }
        let formatter: OutputFormatter = (&self.output_format).into();
        write_output(formatter, &view, self.output_file.as_deref())?;
        Ok(())
    }
}

/// The `report` command loads a view spec file and renders the view it describes.
#[derive(Args, Debug)]
pub struct ReportCommand {
    #[arg(index = 1)]
    spec_file: String,
}

impl RunCommand for ReportCommand {
    fn run(&self, config: Config) -> EvreadyCliResult<()> {
        let evready = Evready::new_with_config(config)?;
        let raw = std::fs::read_to_string(&self.spec_file).context(format!(
            "Failed to read view spec from file: {}",
            self.spec_file
        ))?;
        let spec: ViewSpec = serde_json::from_str(&raw)?;
        if let Some(name) = &spec.name {
            println!("\n{name}");
        }
        let params: ViewParams = spec.try_into()?;
        match params {
            ViewParams::Summary => display_summary(&evready.dataset.info, &evready.summary()),
            ViewParams::Rank { metric, limit } => {
                display_rank(&evready.rank(metric, limit), metric)
            }
            ViewParams::Table { state, filter } => {
                let mut view: Vec<&CountryMetrics> = evready.countries().iter().collect();
                if let Some(filter) = filter {
                    let compiled = filter.compile()?;
                    view.retain(|country| compiled.matches(country));
                }
                let view = sort::sort_view(view, state.field, state.direction);
                display_table(&view);
            }
            ViewParams::Gap { filter } => display_gap(&evready.gap_view(&filter)),
        }
        Ok(())
    }
}

/// The entrypoint for the CLI.
#[derive(Parser, Debug)]
#[command(version, about="evready is a tool to quickly explore EV charging readiness by country!", long_about = None, name="evready")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[arg(
        short = 'q',
        long = "quiet",
        help = "\
            Do not print progress bar to stdout. Results and logs (when `RUST_LOG`\n\
            is set) will still be printed.",
        global = true
    )]
    quiet: bool,
    #[arg(
        long = "data",
        value_name = "PATH",
        help = "Load the dataset from a JSON file instead of the embedded release",
        global = true
    )]
    pub data: Option<PathBuf>,
}

/// Commands contains the list of subcommands avaliable for use in the CLI.
/// Each command should implmement the RunCommand trait and specify the list
/// of required args for that command.
#[derive(Subcommand, Debug)]
#[enum_dispatch(RunCommand)]
pub enum Commands {
    /// Show headline statistics for the dataset
    Summary(SummaryCommand),
    /// Show the top countries by a chosen metric
    Rank(RankCommand),
    /// Show all countries ordered on a table column. Multiple filters are applied
    /// conjunctively, i.e. this command only shows countries that match all filters.
    Table(TableCommand),
    /// Group countries by their demand/infrastructure gap
    Gap(GapCommand),
    /// List countries for which records are available
    Countries(CountriesCommand),
    /// Output the country records in a given format
    Export(ExportCommand),
    /// Render the view described by a JSON spec file
    Report(ReportCommand),
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_report_command() {
        let mut spec_file = NamedTempFile::new().unwrap();
        spec_file
            .write_all(br#"{"surface": "rank", "metric": "stations", "limit": 3}"#)
            .unwrap();
        let report_command = ReportCommand {
            spec_file: spec_file.path().to_string_lossy().to_string(),
        };
        let result = report_command.run(Config::default());
        assert!(result.is_ok())
    }

    #[test]
    fn output_type_should_deserialize_properly() {
        let output_format = OutputFormat::from_str("geojson");
        assert_eq!(
            output_format.unwrap(),
            OutputFormat::GeoJSON,
            "geojson format should be parsed correctly"
        );
        let output_format = OutputFormat::from_str("GeoJson");
        assert_eq!(
            output_format.unwrap(),
            OutputFormat::GeoJSON,
            "parsing should be case insensitive"
        );
        let output_format = OutputFormat::from_str("Csv");
        assert_eq!(
            output_format.unwrap(),
            OutputFormat::Csv,
            "correct variants should parse correctly"
        );
        let output_format = OutputFormat::from_str("awesome_tiny_model");
        assert!(output_format.is_err(), "non listed formats should fail");
    }

    #[test]
    fn rank_args_parse_metrics() {
        let cli = Cli::parse_from(["evready", "rank", "--metric", "gap_value", "-n", "3"]);
        match cli.command {
            Some(Commands::Rank(rank)) => {
                assert_eq!(rank.metric, Metric::GapValue);
                assert_eq!(rank.limit, 3);
            }
            _ => panic!("expected a rank command"),
        }
    }

    #[test]
    fn export_args_parse_bboxes() {
        let cli = Cli::parse_from([
            "evready",
            "export",
            "-f",
            "geojson",
            "--bbox",
            "-10.0,35.0,30.0,70.0",
        ]);
        match cli.command {
            Some(Commands::Export(export)) => {
                assert_eq!(export.bbox, Some(BBox([-10.0, 35.0, 30.0, 70.0])));
                assert_eq!(export.output_format, OutputFormat::GeoJSON);
            }
            _ => panic!("expected an export command"),
        }
    }

    #[test]
    fn cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
