use clap::{Parser, Subcommand};
use ripl::config::{get_config, Config};
use ripl::http;
use ripl::logging::Logger;
use ripl::view::Templates;
use std::path::PathBuf;
use std::process::ExitCode;

mod logging;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long, help = "Path to the configuration file, ripl.toml by default")]
    config: Option<PathBuf>,

    #[arg(long, help = "Fetch templates from this web server")]
    origin: Option<String>,

    #[arg(long, help = "Read templates from this folder")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    subcommands: Subcommands,
}

#[derive(Subcommand, Debug)]
enum Subcommands {
    /// Fetch a template and render it.
    Render {
        /// Template identifier, e.g. "header".
        id: String,

        #[arg(long, help = "Template context as a JSON object")]
        context: Option<String>,

        #[arg(long, help = "Read the template context from a JSON file")]
        context_file: Option<PathBuf>,
    },

    /// Fetch and compile templates, reporting any errors.
    Check {
        /// Template identifiers.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Print the URL a template is fetched from.
    Url { id: String },
}

fn config(args: &Cli) -> Result<Config, ripl::error::Error> {
    let mut config = match args.config {
        Some(ref path) => Config::from_file(path)?,
        None => Config::load_or_default()?,
    };

    if let Some(ref origin) = args.origin {
        config.transport.origin = Some(http::Url::parse(origin).map_err(http::Error::Url)?);
    }

    if let Some(ref root) = args.root {
        config.transport.root = Some(root.clone());
        config.transport.origin = None;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    match config(&args) {
        Ok(config) => {
            if let Err(err) = Config::set(config) {
                logging::warning(err);
            }
        }
        Err(err) => {
            logging::error(err);
            return ExitCode::FAILURE;
        }
    }

    Logger::init();

    let config = get_config();
    let transport = match http::transport(&config.transport) {
        Ok(transport) => transport,
        Err(err) => {
            logging::error(err);
            return ExitCode::FAILURE;
        }
    };

    let templates = Templates::from_config(transport, config);

    let result = match args.subcommands {
        Subcommands::Render {
            id,
            context,
            context_file,
        } => render::render(&templates, &id, context, context_file).await,
        Subcommands::Check { ids } => {
            return match render::check(&templates, &ids).await {
                true => ExitCode::SUCCESS,
                false => ExitCode::FAILURE,
            };
        }
        Subcommands::Url { id } => render::url(&templates, &id),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logging::error(err);
            ExitCode::FAILURE
        }
    }
}
