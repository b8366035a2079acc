//! Command line arguments for the slot graph demo.

use redlilium_serial::Format;
use redlilium_serial::slot::OutputPrecision;

/// Text format selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliFormat {
    /// Compact JSON.
    #[default]
    Json,
    /// Indented JSON.
    #[value(name = "json-pretty")]
    JsonPretty,
    /// Rusty Object Notation.
    #[cfg(feature = "serialize-ron")]
    Ron,
}

impl From<CliFormat> for Format {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Json => Format::Json,
            CliFormat::JsonPretty => Format::JsonPretty,
            #[cfg(feature = "serialize-ron")]
            CliFormat::Ron => Format::Ron,
        }
    }
}

/// Precision tag for emitted shader variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliPrecision {
    Fixed,
    #[default]
    Half,
    Float,
}

impl From<CliPrecision> for OutputPrecision {
    fn from(cli: CliPrecision) -> Self {
        match cli {
            CliPrecision::Fixed => OutputPrecision::Fixed,
            CliPrecision::Half => OutputPrecision::Half,
            CliPrecision::Float => OutputPrecision::Float,
        }
    }
}

/// Slot graph serialization demo.
#[derive(clap::Parser, Debug, Clone)]
#[command(
    name = "slot_graph_demo",
    about = "Round-trips a graph of material slots through tagged elements",
    version
)]
pub struct DemoArgs {
    /// Text format for payloads and the element container.
    #[arg(long, default_value = "json", value_enum)]
    pub format: CliFormat,

    /// Number of slots to generate.
    #[arg(long, default_value = "4")]
    pub count: usize,

    /// Precision tag for the printed shader variables.
    #[arg(long, default_value = "half", value_enum)]
    pub precision: CliPrecision,

    /// Print the container text.
    #[arg(long)]
    pub print_text: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            format: CliFormat::default(),
            count: 4,
            precision: CliPrecision::default(),
            print_text: false,
        }
    }
}
