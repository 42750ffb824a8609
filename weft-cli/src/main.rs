use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weft", version, about = "Weft template parts CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Instantiate a template against JSON state and print the rendered markup.
    Render {
        /// Markup file; its first <template> element is used, or the whole file
        template: PathBuf,
        /// Initial state (JSON object)
        #[arg(long)]
        state: Option<PathBuf>,
        /// State applied after the first render; repeat for more steps
        #[arg(long = "update")]
        updates: Vec<PathBuf>,
        /// Template markup conventions (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Template type, overriding the template's own attribute
        #[arg(long = "type")]
        template_type: Option<String>,
    },
    /// List the parts discovered in a template.
    Parts {
        template: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let lines = match cli.command {
        Commands::Render {
            template,
            state,
            updates,
            config,
            template_type,
        } => weft_cli::render_cmd(
            &template,
            state.as_deref(),
            &updates,
            config.as_deref(),
            template_type.as_deref(),
        )?,
        Commands::Parts { template, config } => weft_cli::parts_cmd(&template, config.as_deref())?,
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
