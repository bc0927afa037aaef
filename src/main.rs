use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use studyset::commands::generate::{self, GenerateArgs};
use studyset::llm;
use studyset::study::{Language, Level, request::QUESTION_COUNT_RANGE};

#[derive(Parser, Debug)]
#[command(
    name = "studyset",
    version,
    about = "Interview study sets with hidden answers, in your terminal.",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    disable_help_subcommand = true
)]
struct Cli {
    /// Log request details to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a study set. Prompts for anything not passed as a flag.
    Generate {
        /// Role or position, e.g. "Data Analyst"
        #[arg(long, value_name = "ROLE")]
        role: Option<String>,
        /// Seniority level
        #[arg(long, value_enum)]
        level: Option<Level>,
        /// Topic or focus, e.g. "System Design"
        #[arg(long, value_name = "TOPIC")]
        topic: Option<String>,
        /// Number of questions (3-20)
        #[arg(
            long,
            value_name = "COUNT",
            value_parser = clap::value_parser!(u8).range(
                i64::from(*QUESTION_COUNT_RANGE.start())..=i64::from(*QUESTION_COUNT_RANGE.end())
            )
        )]
        count: Option<u8>,
        /// Language of the questions and answers
        #[arg(long, value_enum)]
        language: Option<Language>,
        /// Print the formatted markdown instead of opening the card viewer
        #[arg(long, default_value_t = false)]
        markdown: bool,
    },
    /// Manage the stored OpenAI API key
    Llm {
        /// Store a new API key in the local auth file
        #[arg(long, value_name = "KEY", conflicts_with = "clear")]
        set: Option<String>,
        /// Remove the stored API key from the local auth file
        #[arg(long, conflicts_with = "test")]
        clear: bool,
        /// Verify the configured API key by calling the OpenAI API
        #[arg(long, conflicts_with = "clear")]
        test: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "studyset=debug"
    } else {
        "studyset=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    llm::load_dotenv();

    match cli.command {
        Command::Generate {
            role,
            level,
            topic,
            count,
            language,
            markdown,
        } => {
            generate::run(GenerateArgs {
                role,
                level,
                topic,
                count,
                language,
                markdown,
            })
            .await?
        }
        Command::Llm { set, clear, test } => handle_llm_command(set, clear, test).await?,
    }

    Ok(())
}

async fn handle_llm_command(set: Option<String>, clear: bool, test: bool) -> Result<()> {
    let mut action_taken = false;

    if let Some(key) = set {
        llm::store_api_key(&key)?;
        println!("Stored OpenAI API key in the local auth file.");
        action_taken = true;
    }

    if clear {
        if llm::clear_api_key()? {
            println!("Removed the stored OpenAI API key.");
        } else {
            println!("No OpenAI API key found in the auth file.");
        }
        action_taken = true;
    }

    if test {
        let source = llm::test_configured_api_key().await?;
        println!("OpenAI API key from the {} is valid.", source.description());
        action_taken = true;
    }

    if !action_taken {
        bail!("No action provided. Use --set, --clear, or --test.");
    }
    Ok(())
}
