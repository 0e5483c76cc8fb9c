//! Build automation tasks for Stagestats
//!
//! Currently the only task is regenerating the CLI reference documentation
//! from the clap definitions.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for Stagestats", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate CLI documentation in markdown format
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<stagestats_collector::Cli>();

    let content = format!(
        r#"# Stagestats collector CLI reference

Auto-generated from the CLI source code. Last updated: {}.

The collector runs its connectivity checks (configuration, database,
platform endpoint) before touching any data; use `--dry-run` to run only
those checks.

{}

## Environment variables

- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR`, `LOG_FILE_PREFIX`,
  `LOG_FILTER` - logging configuration overrides
- `RUST_LOG` - standard tracing filter directives

## Configuration

The collector reads a flat TOML file (default `collector.toml`); see
`collector.sample.toml` at the repository root for the full key set.
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let doc_file = output_path.join("cli.md");
    fs::write(&doc_file, content)?;

    println!("Wrote {}", doc_file.display());

    Ok(())
}
