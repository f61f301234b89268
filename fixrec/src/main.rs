use std::path::PathBuf;

use anyhow::{Context, Result};
use humansize::{file_size_opts as options, FileSize};
use regex::Regex;
use structopt::StructOpt;

use fixrec_format::{
    integrity, load_description, Endianness, ErrorPolicy, ReadResult, Record, RecordFileReader,
    RecordLayout, RuleSet,
};

#[derive(Debug)]
struct ParsePolicyError(String);

impl std::error::Error for ParsePolicyError {}

impl std::fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown error handling mode: {}", self.0)
    }
}

fn parse_policy(src: &str) -> std::result::Result<ErrorPolicy, ParsePolicyError> {
    let policy = match src {
        "strict" => ErrorPolicy::Strict,
        "skip" | "skip-invalid" => ErrorPolicy::SkipInvalid,
        "collect" | "collect-errors" => ErrorPolicy::CollectErrors,
        _ => return Err(ParsePolicyError(src.to_string())),
    };

    Ok(policy)
}

use structopt::clap::AppSettings::*;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(name = "r", visible_alias = "read", about = "Read a record file and report statistics")]
    Read {
        #[structopt(
            name = "datafile",
            parse(from_os_str),
            help = "Path to the binary record file"
        )]
        path: PathBuf,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Path to the layout description file"
        )]
        layout: PathBuf,

        #[structopt(
            short = "m",
            long,
            parse(try_from_str = parse_policy),
            default_value = "skip",
            help = "Error handling mode: strict, skip or collect"
        )]
        mode: ErrorPolicy,

        #[structopt(long, help = "Lower bound for the id field")]
        min_id: Option<i64>,

        #[structopt(long, help = "Upper bound for the id field")]
        max_id: Option<i64>,

        #[structopt(long, help = "Lower bound for the value field")]
        min_value: Option<f64>,

        #[structopt(long, help = "Upper bound for the value field")]
        max_value: Option<f64>,

        #[structopt(long, help = "Regular expression the code field must match")]
        code_pattern: Option<String>,

        #[structopt(
            long = "require",
            number_of_values = 1,
            help = "Field that must be present; may be given multiple times"
        )]
        required: Vec<String>,

        #[structopt(long, default_value = "10", help = "Width in bytes of char* fields")]
        text_width: usize,

        #[structopt(long, help = "Decode fields as big-endian")]
        big_endian: bool,

        #[structopt(
            short = "n",
            long,
            default_value = "5",
            help = "Number of accepted records to display"
        )]
        limit: usize,

        #[structopt(long, help = "Emit the full result as JSON")]
        json: bool,
    },

    #[structopt(name = "c", visible_alias = "check", about = "Run the pre-flight integrity check only")]
    Check {
        #[structopt(
            name = "datafile",
            parse(from_os_str),
            help = "Path to the binary record file"
        )]
        path: PathBuf,

        #[structopt(
            short,
            long,
            parse(from_os_str),
            help = "Path to the layout description file"
        )]
        layout: PathBuf,

        #[structopt(long, default_value = "10", help = "Width in bytes of char* fields")]
        text_width: usize,

        #[structopt(long, help = "Decode fields as big-endian")]
        big_endian: bool,
    },

    #[structopt(name = "l", visible_alias = "layout", about = "Show the record layout from a description file")]
    Layout {
        #[structopt(
            name = "description",
            parse(from_os_str),
            help = "Path to the layout description file"
        )]
        layout: PathBuf,

        #[structopt(long, default_value = "10", help = "Width in bytes of char* fields")]
        text_width: usize,

        #[structopt(long, help = "Decode fields as big-endian")]
        big_endian: bool,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "fixrec",
    about = "Read, check and describe fixed-size binary record files.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "fixrec (r|c|l) [FLAGS|OPTIONS] <datafile>"
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn endianness(big_endian: bool) -> Endianness {
    if big_endian {
        Endianness::Big
    } else {
        Endianness::Little
    }
}

fn load_layout(path: &PathBuf, text_width: usize, big_endian: bool) -> Result<RecordLayout> {
    load_description(path, text_width, endianness(big_endian))
        .with_context(|| format!("cannot load layout from {}", path.display()))
}

fn format_record(record: &Record) -> String {
    record
        .fields()
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_summary(result: &ReadResult, limit: usize) {
    let file_size = result.file_size.file_size(options::BINARY).unwrap();

    println!("File size:         {}", file_size);
    println!("Expected records:  {}", result.expected_records);
    println!("Records scanned:   {}", result.total_records);
    println!("Valid records:     {}", result.valid_records);
    println!("Invalid records:   {}", result.invalid_records);
    println!("Success rate:      {:.2}%", result.success_rate());
    println!("Errors:            {}", result.errors.len());
    println!("Warnings:          {}", result.warnings.len());

    for warning in &result.warnings {
        println!("warning: {}", warning);
    }

    if !result.records.is_empty() && limit > 0 {
        println!();
        println!("First {} records:", limit.min(result.records.len()));
        for record in result.records.iter().take(limit) {
            println!("{:>5}. {}", record.record_number(), format_record(record));
        }
    }

    if !result.errors.is_empty() {
        println!();
        println!("First {} errors:", 5.min(result.errors.len()));
        for entry in result.errors.iter().take(5) {
            println!(
                "  record {} at offset {}: {}",
                entry.record_number, entry.byte_offset, entry.error
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn read(
    path: PathBuf,
    layout: PathBuf,
    mode: ErrorPolicy,
    min_id: Option<i64>,
    max_id: Option<i64>,
    min_value: Option<f64>,
    max_value: Option<f64>,
    code_pattern: Option<String>,
    required: Vec<String>,
    text_width: usize,
    big_endian: bool,
    limit: usize,
    json: bool,
) -> Result<()> {
    let layout = load_layout(&layout, text_width, big_endian)?;

    let code_pattern = code_pattern
        .map(|pattern| {
            Regex::new(&pattern).with_context(|| format!("invalid code pattern '{}'", pattern))
        })
        .transpose()?;

    let rules = RuleSet {
        min_id,
        max_id,
        min_value,
        max_value,
        code_pattern,
        required_fields: required,
    };

    let reader = RecordFileReader::new(layout)
        .with_policy(mode)
        .with_rules(rules);

    let result = reader
        .read(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result, limit);
    }

    Ok(())
}

fn check(path: PathBuf, layout: PathBuf, text_width: usize, big_endian: bool) -> Result<()> {
    let layout = load_layout(&layout, text_width, big_endian)?;
    let report = integrity::check(&path, layout.record_size());

    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    if !report.ok() {
        for issue in &report.fatal {
            eprintln!("error: {}", issue);
        }
        std::process::exit(1);
    }

    println!(
        "{}: {} ({} records of {} bytes)",
        path.display(),
        report.file_size.file_size(options::BINARY).unwrap(),
        layout.expected_records(report.file_size),
        layout.record_size()
    );

    Ok(())
}

fn show_layout(layout: PathBuf, text_width: usize, big_endian: bool) -> Result<()> {
    let layout = load_layout(&layout, text_width, big_endian)?;

    println!("{:<24}  {:<10}  {:>5}", "Field", "Type", "Width");
    println!("{:<24}  {:<10}  {:>5}", "-----", "----", "-----");
    for field in layout.fields() {
        println!(
            "{:<24}  {:<10}  {:>5}",
            field.name,
            field.kind.to_string(),
            field.kind.width()
        );
    }
    println!();
    println!(
        "Record size: {} bytes ({})",
        layout.record_size(),
        layout.endianness()
    );

    Ok(())
}

fn main() {
    let opts = CliOpts::from_args();

    let level = if opts.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let result = match opts.cmd {
        Commands::Read {
            path,
            layout,
            mode,
            min_id,
            max_id,
            min_value,
            max_value,
            code_pattern,
            required,
            text_width,
            big_endian,
            limit,
            json,
        } => read(
            path,
            layout,
            mode,
            min_id,
            max_id,
            min_value,
            max_value,
            code_pattern,
            required,
            text_width,
            big_endian,
            limit,
            json,
        ),
        Commands::Check {
            path,
            layout,
            text_width,
            big_endian,
        } => check(path, layout, text_width, big_endian),
        Commands::Layout {
            layout,
            text_width,
            big_endian,
        } => show_layout(layout, text_width, big_endian),
    };

    if let Err(e) = result {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
