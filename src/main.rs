mod cli;
mod commands;
mod formatting;
mod pipeline;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::Commands;
use commands::{run_generate, run_pdf};
use settings::PrintOverrides;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Generate {
            resume,
            browser,
            templates,
            output,
            skip_pdf,
            format,
        } => {
            run_generate(
                &raw_args,
                args.config,
                resume,
                browser,
                templates,
                output,
                skip_pdf,
                format,
            )
            .await
        }
        Commands::Pdf {
            input,
            output,
            browser,
            landscape,
            scale,
            paper_width,
            paper_height,
            margin,
            page_ranges,
            format,
        } => {
            let overrides = PrintOverrides {
                landscape,
                scale,
                paper_width,
                paper_height,
                margin,
                page_ranges,
            };
            run_pdf(
                &raw_args,
                args.config,
                input,
                output,
                browser,
                overrides,
                format,
            )
            .await
        }
    }
}
