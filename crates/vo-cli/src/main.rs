//! CLI entry point for the vo-datalink tool.
//!
//! This binary inspects DataLink responses and builds SODA request URLs
//! from the service descriptors they carry.
//!
//! # Usage
//!
//! ```bash
//! vo-datalink [OPTIONS] <COMMAND>
//!
//! # List the services a response declares
//! vo-datalink services links.xml
//!
//! # List link rows of a remote response
//! vo-datalink links "http://dc.example.org/datalink?ID=ivo%3A%2F%2Fexample.org%2Fobs"
//!
//! # Build a cutout request
//! vo-datalink soda links.xml --id ivo://example.org/obs \
//!     --param "POS=CIRCLE 150.1 2.2 0.05" --interval BAND=5e-7,6e-7
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fmt::Write as _;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vo_core::{ColorScheme, Config, LinkRow, LinkTableView, ServiceRegistry, VoElement};
use vo_votable::{DocumentSource, VoTableClient};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Inspect IVOA DataLink responses and build SODA requests.
///
/// SOURCE arguments are file paths or `http(s)://` URLs of VOTable documents.
#[derive(Parser)]
#[command(name = "vo-datalink", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "VO_DATALINK_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List the service descriptors of a document.
    Services {
        /// File path or URL of the document.
        source: String,
    },

    /// List the rows of a DataLink links table.
    Links {
        /// File path or URL of the document.
        source: String,
    },

    /// Build a SODA request URL for a dataset.
    Soda {
        /// File path or URL of the document declaring the SODA service.
        source: String,

        /// Dataset identifier sent as `ID`.
        #[arg(long)]
        id: String,

        /// Scalar parameter value, as NAME=VALUE.
        #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        params: Vec<Assignment>,

        /// Interval parameter bounds, as NAME=MIN,MAX. Either bound may be empty.
        #[arg(long = "interval", value_name = "NAME=MIN,MAX", value_parser = parse_interval)]
        intervals: Vec<IntervalAssignment>,
    },
}

/// A `NAME=VALUE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Assignment {
    name: String,
    value: String,
}

/// A `NAME=MIN,MAX` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IntervalAssignment {
    name: String,
    min: String,
    max: String,
}

fn parse_assignment(arg: &str) -> Result<Assignment, String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{arg}'"));
    }
    Ok(Assignment {
        name: name.to_owned(),
        value: value.to_owned(),
    })
}

fn parse_interval(arg: &str) -> Result<IntervalAssignment, String> {
    let Assignment { name, value } = parse_assignment(arg)?;
    let (min, max) = value
        .split_once(',')
        .ok_or_else(|| format!("expected NAME=MIN,MAX, got '{arg}'"))?;
    Ok(IntervalAssignment {
        name,
        min: min.to_owned(),
        max: max.to_owned(),
    })
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: bool, use_ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn"))
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Whether log output should be colored.
fn use_ansi(no_color: bool, scheme: ColorScheme) -> bool {
    if no_color {
        return false;
    }
    match scheme {
        ColorScheme::Always => true,
        ColorScheme::Never => false,
        _ => std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Loads the configuration file, or defaults when none is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds invalid settings.
fn load_config(path: Option<&Utf8Path>) -> color_eyre::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file {path}"))?;
    Config::from_json_str(&text).wrap_err_with(|| format!("Invalid config file {path}"))
}

/// Loads the document named by `source`.
fn load_source(config: &Config, source: &str) -> color_eyre::Result<VoElement> {
    let source = DocumentSource::parse(source);
    info!(%source, "Loading document");
    let client = VoTableClient::new(&config.fetch)?;
    source
        .load(&client)
        .wrap_err_with(|| format!("Failed to load {source}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Lists the service descriptors of a document.
fn run_services(config: &Config, source: &str, json: bool) -> color_eyre::Result<()> {
    let root = load_source(config, source)?;
    let registry = ServiceRegistry::from_document(&root);

    let content = if json {
        to_json(&registry)?
    } else {
        render_services(&registry)
    };
    print(&content)
}

/// Lists the rows of a links table.
fn run_links(config: &Config, source: &str, json: bool) -> color_eyre::Result<()> {
    let source = DocumentSource::parse(source);
    info!(%source, "Loading DataLink response");
    let client = VoTableClient::new(&config.fetch)?;
    let response = source
        .load_datalink(&client)
        .wrap_err_with(|| format!("Failed to load {source}"))?;

    let content = if json {
        #[derive(Serialize)]
        struct Report<'a> {
            primary_link: Option<&'a str>,
            rows: Vec<LinkRow<'a>>,
        }

        let links = response.links();
        to_json(&Report {
            primary_link: links.primary_link().ok(),
            rows: links.rows().collect(),
        })?
    } else {
        render_links(response.links())
    };
    print(&content)
}

/// Applies parameter values to the SODA service and prints the request URL.
fn run_soda(
    config: &Config,
    source: &str,
    id: &str,
    params: &[Assignment],
    intervals: &[IntervalAssignment],
    json: bool,
) -> color_eyre::Result<()> {
    let root = load_source(config, source)?;
    let mut registry = ServiceRegistry::from_document(&root);
    if registry.find_soda_service().is_none() {
        return Err(eyre!("{source} declares no SODA service"));
    }

    for Assignment { name, value } in params {
        if !registry.set_parameter_value(name, value)? {
            warn!(parameter = %name, "SODA service has no such parameter, ignoring");
        }
    }
    for IntervalAssignment { name, min, max } in intervals {
        if !registry.set_parameter_interval(name, min, max)? {
            warn!(parameter = %name, "SODA service has no such parameter, ignoring");
        }
    }

    let url = registry
        .soda_request_url(id)
        .ok_or_else(|| eyre!("SODA service in {source} has no access URL"))?;

    let content = if json {
        #[derive(Serialize)]
        struct Request<'a> {
            id: &'a str,
            url: &'a str,
        }

        to_json(&Request { id, url: &url })?
    } else {
        format!("{url}\n")
    };
    print(&content)
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print(content: &str) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{content}")?;
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> color_eyre::Result<String> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| eyre!("Failed to serialize JSON: {}", e))?;
    json.push('\n');
    Ok(json)
}

/// Renders service descriptors and their parameters.
fn render_services(registry: &ServiceRegistry) -> String {
    let mut output = String::new();
    if registry.is_empty() {
        output.push_str("No services declared.\n");
        return output;
    }

    for service in registry {
        let label = service.reference_id().unwrap_or("(anonymous)");
        let _ = writeln!(output, "{label} [{}]", service.capability().label());
        if let Some(url) = service.access_url() {
            let _ = writeln!(output, "  access URL: {url}");
        }
        if let Some(standard) = service.standard_id() {
            let _ = writeln!(output, "  standard ID: {standard}");
        }
        if let Some(field) = service.field_ref() {
            let _ = writeln!(output, "  ID field: {field}");
        }
        if let Some(format) = service.default_format() {
            let _ = writeln!(output, "  default format: {format}");
        }

        for param in service.parameters() {
            let _ = write!(output, "  - {} ({}", param.name(), param.arity());
            if let Some(datatype) = param.datatype() {
                let _ = write!(output, ", {datatype}");
            }
            if let Some(unit) = param.unit() {
                let _ = write!(output, ", unit {unit}");
            }
            output.push(')');

            let allowed = param.allowed_values();
            if allowed.min.is_some() || allowed.max.is_some() {
                let _ = write!(
                    output,
                    " range [{}, {}]",
                    allowed.min.as_deref().unwrap_or_default(),
                    allowed.max.as_deref().unwrap_or_default()
                );
            }
            if !allowed.options.is_empty() {
                let _ = write!(output, " options {}", allowed.options.join("|"));
            }
            output.push('\n');
        }
    }
    output
}

/// Renders link rows followed by the primary link.
fn render_links(links: &LinkTableView) -> String {
    let mut output = String::new();
    for row in links.rows() {
        let semantics = row
            .semantics
            .as_ref()
            .map_or_else(|| "-".to_owned(), ToString::to_string);
        let _ = write!(output, "{}: {semantics}", row.row);

        if let Some(error) = row.error_message {
            let _ = writeln!(output, " ERROR {error}");
            continue;
        }
        let _ = write!(output, " {}", row.access_url.unwrap_or("-"));
        if let Some(content_type) = row.content_type {
            let _ = write!(output, " ({content_type})");
        }
        if let Some(service) = row.service_def {
            let _ = write!(output, " -> service {service}");
        }
        output.push('\n');
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "Primary link: {}",
        links.primary_link().unwrap_or("none")
    );
    output
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Load configuration, then initialize tracing with its color choice
    let config = load_config(cli.config.as_deref())?;
    init_tracing(cli.verbose, use_ansi(cli.no_color, config.output.color_scheme));
    let json = cli.json || config.output.json;

    // 4. Route to appropriate command
    match &cli.command {
        Commands::Services { source } => run_services(&config, source, json),
        Commands::Links { source } => run_links(&config, source, json),
        Commands::Soda {
            source,
            id,
            params,
            intervals,
        } => run_soda(&config, source, id, params, intervals, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vo_votable::DataLinkResponse;

    const DOCUMENT: &str = r##"<VOTABLE>
      <RESOURCE type="results"><TABLE>
        <FIELD name="ID"/><FIELD name="access_url"/><FIELD name="semantics"/>
        <FIELD name="content_type"/><FIELD name="service_def"/><FIELD name="error_message"/>
        <DATA><TABLEDATA>
          <TR><TD>ivo://x</TD><TD>http://h/x.fits</TD><TD>#this</TD><TD>application/fits</TD><TD/><TD/></TR>
          <TR><TD>ivo://x</TD><TD/><TD>#cutout</TD><TD/><TD>soda</TD><TD/></TR>
          <TR><TD>ivo://x</TD><TD/><TD>#preview</TD><TD/><TD/><TD>not found</TD></TR>
        </TABLEDATA></DATA>
      </TABLE></RESOURCE>
      <RESOURCE type="meta" utype="adhoc:service" ID="soda">
        <PARAM name="standardID" value="ivo://ivoa.net/std/SODA#sync-1.0"/>
        <PARAM name="accessURL" value="http://h/soda"/>
        <GROUP name="inputParams">
          <PARAM name="ID" ref="pubdid" value=""/>
          <PARAM name="BAND" datatype="double" arraysize="2" xtype="interval" unit="m" value="">
            <VALUES><MIN value="4e-7"/><MAX value="9e-7"/></VALUES>
          </PARAM>
          <PARAM name="POL" datatype="char" arraysize="*" value="">
            <VALUES><OPTION value="I"/><OPTION value="Q"/></VALUES>
          </PARAM>
        </GROUP>
      </RESOURCE>
    </VOTABLE>"##;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("POS=CIRCLE 1 2 3"),
            Ok(Assignment {
                name: "POS".to_owned(),
                value: "CIRCLE 1 2 3".to_owned(),
            })
        );
        assert!(parse_assignment("POS").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(
            parse_interval("TIME=59000,"),
            Ok(IntervalAssignment {
                name: "TIME".to_owned(),
                min: "59000".to_owned(),
                max: String::new(),
            })
        );
        assert!(parse_interval("TIME=59000").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_services() {
        let response = DataLinkResponse::parse(DOCUMENT).unwrap();
        insta::assert_snapshot!(render_services(response.services()), @r"
        soda [soda]
          access URL: http://h/soda
          standard ID: ivo://ivoa.net/std/SODA#sync-1.0
          ID field: pubdid
          - BAND (interval, double, unit m) range [4e-7, 9e-7]
          - POL (scalar, char) options I|Q
        ");
    }

    #[test]
    fn test_render_links() {
        let response = DataLinkResponse::parse(DOCUMENT).unwrap();
        insta::assert_snapshot!(render_links(response.links()), @r"
        0: #this http://h/x.fits (application/fits)
        1: #cutout - -> service soda
        2: #preview ERROR not found

        Primary link: http://h/x.fits
        ");
    }

    #[test]
    fn test_render_empty_registry() {
        assert_eq!(
            render_services(&ServiceRegistry::new()),
            "No services declared.\n"
        );
    }

    #[test]
    fn test_color_choice() {
        assert!(!use_ansi(true, ColorScheme::Always));
        assert!(use_ansi(false, ColorScheme::Always));
        assert!(!use_ansi(false, ColorScheme::Never));
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let err = load_config(Some(Utf8Path::new("/no/such/config.json"))).unwrap_err();
        assert!(err.to_string().contains("/no/such/config.json"));
    }
}
