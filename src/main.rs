// Command-line entry point for dotkit.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use dotkit::api::GraphDto;
use dotkit::application::{CheckUsecase, FormatUsecase, RenderUsecase};
use dotkit::infrastructure::concurrency::init_thread_pool;
use dotkit::infrastructure::config::Config;
use dotkit::{DotWriter, OutputFormat, Parser, RenderRequest};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./dotkit.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print DOT files in canonical form
    Fmt {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit attributes sorted by name
        #[arg(long)]
        sort_attributes: bool,

        /// Rewrite the files instead of printing them
        #[arg(long)]
        in_place: bool,
    },

    /// Parse DOT files and report errors
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Render a DOT file with Graphviz
    Render {
        file: PathBuf,

        /// Output format (png, svg, pdf, ...)
        #[arg(short = 'T', long, default_value = "png")]
        format: String,

        /// Layout program (dot, neato, fdp, ...)
        #[arg(short = 'K', long, default_value = "dot")]
        program: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Custom shape image referenced by the graph (repeatable)
        #[arg(long = "shape-file")]
        shape_files: Vec<PathBuf>,
    },

    /// Print the parsed graphs as JSON
    Json {
        file: PathBuf,

        #[arg(long)]
        pretty: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::discover(cli.config.as_deref())?;
    let parser = Parser::new(config.parser);

    match cli.command {
        Command::Fmt {
            files,
            sort_attributes,
            in_place,
        } => {
            let mut writer_config = config.writer.clone();
            writer_config.sort_attributes |= sort_attributes;
            let writer = DotWriter::new(writer_config);
            let usecase = FormatUsecase {
                parser: &parser,
                writer: &writer,
            };

            if files.len() > 1 {
                init_thread_pool()?;
            }
            let mut failed = false;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for report in usecase.run_batch(&files, in_place) {
                match report.result {
                    Ok(bytes) if !in_place => out.write_all(&bytes)?,
                    Ok(_) => {}
                    Err(e) => {
                        failed = true;
                        eprintln!("{}: {:#}", report.path.display(), e);
                    }
                }
            }
            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }

        Command::Check { files } => {
            if files.len() > 1 {
                init_thread_pool()?;
            }
            let usecase = CheckUsecase { parser: &parser };
            let mut failed = false;
            for report in usecase.run_batch(&files) {
                match report.result {
                    Ok(count) => println!("{}: ok ({} graph(s))", report.path.display(), count),
                    Err(e) => {
                        failed = true;
                        eprintln!("{}: {:#}", report.path.display(), e);
                    }
                }
            }
            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }

        Command::Render {
            file,
            format,
            program,
            output,
            shape_files,
        } => {
            let format: OutputFormat = format.parse()?;
            let request = RenderRequest::new(format)
                .with_program(program)
                .with_shape_files(shape_files);
            let renderer = config.renderer();
            let usecase = RenderUsecase {
                parser: &parser,
                renderer: &renderer,
            };
            let written = usecase.run(&file, &request, &output)?;
            println!("Wrote {} bytes to {}", written, output.display());
            Ok(ExitCode::SUCCESS)
        }

        Command::Json { file, pretty } => {
            let graphs = parser
                .parse_file(&file)
                .with_context(|| format!("Failed to parse {}", file.display()))?
                .into_graphs();
            let dtos: Vec<GraphDto> = graphs.iter().map(GraphDto::from).collect();
            let json = if pretty {
                serde_json::to_string_pretty(&dtos)?
            } else {
                serde_json::to_string(&dtos)?
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
