use clap::{Parser, Subcommand, ValueEnum};
use log::debug;
use std::path::PathBuf;

use grocy_import::parser::lexicon::Lexicon;
use grocy_import::{
    dry_run, read_recipe, GrocyClient, GrocyConfig, Interactive, ParseMode, RecipeImporter,
    Resolution, Session, Terminal, Unattended,
};

#[derive(Parser)]
#[command(name = "grocy-import")]
#[command(version)]
#[command(about = "Import scraped recipes into Grocy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add something to Grocy
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },

    /// Parse every ingredient line of a recipe without writing to Grocy
    Check {
        /// Recipe document (JSON)
        file: PathBuf,

        #[arg(long, value_enum, default_value = "automatic")]
        mode: Mode,
    },
}

#[derive(Subcommand)]
enum AddTarget {
    /// Import a recipe document (JSON)
    Recipe {
        file: PathBuf,

        /// Parse automatically and abort instead of prompting
        #[arg(long)]
        auto: bool,

        /// Ingredient parsing strategy; overrides the one chosen by --auto
        #[arg(long, value_enum)]
        mode: Option<Mode>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Guess,
    Automatic,
}

impl From<Mode> for ParseMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Guess => ParseMode::Guess,
            Mode::Automatic => ParseMode::Automatic,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = GrocyConfig::load()?;
    let client = GrocyClient::new(&config)?;
    let session = Session::load(&client)
        .await?
        .with_lexicon(Lexicon::from_config(&config.lexicon))
        .with_matching(config.matching.clone());

    match cli.command {
        Commands::Add {
            target: AddTarget::Recipe { file, auto, mode },
        } => {
            let doc = read_recipe(&tokio::fs::read_to_string(&file).await?)?;
            debug!("Read {:?} from {}", doc.title, file.display());
            let mode = mode
                .map(ParseMode::from)
                .unwrap_or(if auto { ParseMode::Automatic } else { ParseMode::Guess });

            let summary = if auto {
                RecipeImporter::new(&client, session, Unattended)
                    .mode(mode)
                    .import(&doc)
                    .await?
            } else {
                RecipeImporter::new(&client, session, Interactive::new(Terminal::stdio()))
                    .mode(mode)
                    .import(&doc)
                    .await?
            };
            println!(
                "Created recipe {} with {} ingredients",
                summary.recipe_id,
                summary.positions.len()
            );
        }
        Commands::Check { file, mode } => {
            let doc = read_recipe(&tokio::fs::read_to_string(&file).await?)?;
            let mut unresolved = 0;
            for (line, resolution) in dry_run(&doc, &session, mode.into()) {
                match resolution {
                    Resolution::Complete(ingredient) => println!(
                        "ok       {:<40} {} {} x {}{}",
                        line,
                        ingredient.amount,
                        session.units.name_of(ingredient.unit_id).unwrap_or("?"),
                        session.products.name_of(ingredient.product_id).unwrap_or("?"),
                        ingredient.note.as_ref().map(|n| format!(" ({})", n)).unwrap_or_default()
                    ),
                    other => {
                        unresolved += 1;
                        let missing: Vec<String> =
                            other.missing().iter().map(|f| f.to_string()).collect();
                        println!("missing  {:<40} {}", line, missing.join(", "));
                    }
                }
            }
            if unresolved > 0 {
                return Err(format!("{} ingredient lines need attention", unresolved).into());
            }
        }
    }

    Ok(())
}
