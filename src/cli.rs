use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 fuzzless version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   a pager for very large .fastq files";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one screen of soft-wrapped records
    #[command(arg_required_else_help = true)]
    View {
        /// the input .fastq file
        file: String,

        /// a JSON config file. flags given on the command line take precedence.
        #[arg(long)]
        config: Option<String>,

        /// the terminal width, including the 9 column gutter
        #[arg(short, long)]
        width: Option<usize>,

        /// the number of rows to print
        #[arg(long, default_value_t = 24)]
        height: usize,

        /// where the first row starts, as RECORD or RECORD:LINE (both 0-indexed)
        #[arg(
            long,
            value_parser = |x: &str| ArgLocation::try_from(x),
            default_value = "0:0",
            verbatim_doc_comment
        )]
        at: ArgLocation,

        /// scroll by this many display lines before printing. may be negative.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        scroll: i64,

        /// reverse complement these records, e.g. `--revcomp 0,4,5`
        #[arg(long, value_delimiter = ',')]
        revcomp: Vec<usize>,
    },

    /// Count the records in a .fastq file
    #[command(arg_required_else_help = true)]
    Count {
        /// the input .fastq file
        file: String,

        /// stop counting after this many records
        #[arg(long)]
        max_records: Option<usize>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArgLocation {
    pub record: usize,
    pub line: usize,
}

/// Error type for parsing a location string.
#[derive(Debug)]
pub struct ParseLocationErr(String);

impl std::fmt::Display for ParseLocationErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid location: {}", self.0)
    }
}

impl std::error::Error for ParseLocationErr {}

impl<'a> TryFrom<&'a str> for ArgLocation {
    type Error = ParseLocationErr;

    fn try_from(arg: &'a str) -> Result<ArgLocation, Self::Error> {
        let parts: Vec<&str> = arg.split(':').collect();

        if parts.is_empty() || parts.len() > 2 {
            return Err(ParseLocationErr(indoc::formatdoc! {"
            Expected format '<record>[:<line>]', got '{arg}'. For example:
              --at 0
              --at 120:3
            "}));
        }

        let parse = |name: &str, s: &str| {
            s.trim().parse::<usize>().map_err(|_| {
                ParseLocationErr(format!("'{}' is not a valid {name} number", s.trim()))
            })
        };

        let record = parse("record", parts[0])?;
        let line = match parts.get(1) {
            Some(s) => parse("line", s)?,
            None => 0,
        };

        Ok(ArgLocation { record, line })
    }
}
