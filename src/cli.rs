use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resumegen")]
#[command(
    version,
    about = "Resume generator - Render a YAML resume to HTML, Markdown, text, XML, JSON and PDF",
    long_about = "Resume generator\n\nModes:\n- generate: render every template, dump JSON, then print the HTML to PDF through a running browser.\n- pdf: print a single HTML file to PDF.\n\nThe PDF step needs Chrome/Chromium started with --remote-debugging-port (default endpoint http://127.0.0.1:9222).\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for browser/print/paths; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a resume through all templates, dump JSON and export PDF
    Generate {
        #[arg(long, default_value = "example.yaml", help = "Input resume (YAML)")]
        resume: PathBuf,

        #[arg(
            long,
            default_value = "http://127.0.0.1:9222",
            help = "Browser DevTools HTTP endpoint"
        )]
        browser: String,

        #[arg(
            long,
            default_value = "templates/tmpl",
            help = "Template prefix; .html, .md, .txt and .xml are appended"
        )]
        templates: String,

        #[arg(
            long,
            short,
            default_value = "output/example",
            help = "Output prefix; one file per format is written"
        )]
        output: String,

        #[arg(long, help = "Skip the PDF export (no browser needed)")]
        skip_pdf: bool,

        #[arg(long, value_enum, default_value = "json", help = "Summary format")]
        format: OutputFormat,
    },

    /// Print one HTML file to PDF through a running browser
    Pdf {
        #[arg(long, help = "HTML file to print")]
        input: PathBuf,

        #[arg(long, short, help = "PDF file to write")]
        output: PathBuf,

        #[arg(
            long,
            default_value = "http://127.0.0.1:9222",
            help = "Browser DevTools HTTP endpoint"
        )]
        browser: String,

        #[arg(long, help = "Landscape orientation")]
        landscape: bool,

        #[arg(long, help = "Rendering scale (default 1.0)")]
        scale: Option<f64>,

        #[arg(long, value_name = "INCHES", help = "Paper width (default 8.5)")]
        paper_width: Option<f64>,

        #[arg(long, value_name = "INCHES", help = "Paper height (default 11)")]
        paper_height: Option<f64>,

        #[arg(long, value_name = "INCHES", help = "Uniform page margin (default 0)")]
        margin: Option<f64>,

        #[arg(long, help = "Pages to print, e.g. '1-3, 5'")]
        page_ranges: Option<String>,

        #[arg(long, value_enum, default_value = "json", help = "Summary format")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, OutputFormat};
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn generate_command_uses_defaults() {
        let cli = Cli::parse_from(["resumegen", "generate"]);

        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        match cli.command {
            Commands::Generate {
                resume,
                browser,
                templates,
                output,
                skip_pdf,
                format,
            } => {
                assert_eq!(resume, Path::new("example.yaml"));
                assert_eq!(browser, "http://127.0.0.1:9222");
                assert_eq!(templates, "templates/tmpl");
                assert_eq!(output, "output/example");
                assert!(!skip_pdf);
                assert!(matches!(format, OutputFormat::Json));
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn generate_command_respects_overrides() {
        let cli = Cli::parse_from([
            "resumegen",
            "generate",
            "--resume",
            "cv.yaml",
            "--browser",
            "http://10.0.0.2:9333",
            "--templates",
            "themes/plain",
            "--output",
            "build/cv",
            "--skip-pdf",
            "--format",
            "pretty",
            "--config",
            "resumegen.toml",
        ]);

        assert_eq!(cli.config.as_deref(), Some(Path::new("resumegen.toml")));
        match cli.command {
            Commands::Generate {
                resume,
                browser,
                templates,
                output,
                skip_pdf,
                format,
            } => {
                assert_eq!(resume, Path::new("cv.yaml"));
                assert_eq!(browser, "http://10.0.0.2:9333");
                assert_eq!(templates, "themes/plain");
                assert_eq!(output, "build/cv");
                assert!(skip_pdf);
                assert!(matches!(format, OutputFormat::Pretty));
            }
            _ => panic!("expected generate command with overrides"),
        }
    }

    #[test]
    fn pdf_command_parses_print_overrides() {
        let cli = Cli::parse_from([
            "resumegen",
            "--verbose",
            "pdf",
            "--input",
            "output/example.html",
            "--output",
            "output/example.pdf",
            "--landscape",
            "--scale",
            "0.8",
            "--margin",
            "0.4",
            "--page-ranges",
            "1-2",
        ]);

        assert!(cli.verbose);
        match cli.command {
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
                ..
            } => {
                assert_eq!(input, Path::new("output/example.html"));
                assert_eq!(output, Path::new("output/example.pdf"));
                assert_eq!(browser, "http://127.0.0.1:9222");
                assert!(landscape);
                assert_eq!(scale, Some(0.8));
                assert!(paper_width.is_none());
                assert!(paper_height.is_none());
                assert_eq!(margin, Some(0.4));
                assert_eq!(page_ranges.as_deref(), Some("1-2"));
            }
            _ => panic!("expected pdf command"),
        }
    }

    #[test]
    fn pdf_command_requires_input_and_output() {
        assert!(Cli::try_parse_from(["resumegen", "pdf", "--input", "a.html"]).is_err());
        assert!(Cli::try_parse_from(["resumegen", "pdf", "--output", "a.pdf"]).is_err());
    }
}
