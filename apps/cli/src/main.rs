use std::path::PathBuf;

use anyhow::{anyhow, ensure, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use foursquare_bot::{
    bootstrap,
    format::{HELP_TEXT, USAGE},
    settings::{load_api_key, resolve_settings_path},
    transport::serve_stdio,
    BotConfig, HandleOutcome, InboundMessage,
};
use output::{OutputFormat, Renderer};
use progress::spinner;
use replies::ReplyCollector;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Key shipped in the sample settings file; `check-key` compares against it
/// unless told otherwise.
const SAMPLE_API_KEY: &str = "abcdefghijksm";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "foursquare-bot",
    version,
    about = "Answer chat messages with nearby venues from Foursquare."
)]
struct Cli {
    /// Settings file holding the `[Foursquare] api_key` entry.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Preferred renderer for replies printed by `ask`.
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,
    /// Disable ANSI colors in log output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Suppress non-critical CLI output.
    #[arg(long, global = true)]
    quiet: bool,
    /// Disable progress indicators while waiting on Foursquare.
    #[arg(long, global = true)]
    no_progress: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Read JSON messages from stdin (one per line) and write replies to stdout.
    Serve,
    /// Run a single message through the bot and print the reply.
    Ask {
        /// Message text, e.g. "@foursquare 'Millenium Park' 8000 donuts".
        text: String,
        /// Sender address used for private replies.
        #[arg(long, default_value = "me@localhost")]
        sender: String,
        /// Deliver as a stream message to this stream instead of privately.
        #[arg(long)]
        stream: Option<String>,
        /// Topic for stream messages.
        #[arg(long, default_value = "general")]
        topic: String,
    },
    /// Verify the configured API key matches an expected value.
    CheckKey {
        #[arg(long, default_value = SAMPLE_API_KEY)]
        expected: String,
    },
    /// Print the bot description and help text.
    Usage,
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    fn progress_enabled(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    fn bot_config(&self) -> BotConfig {
        BotConfig {
            settings_path: self.config.clone(),
            ..BotConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    match &cli.command {
        Command::Serve => {
            let handler = bootstrap(cli.bot_config())?;
            info!(target: "foursquare_bot_cli", "Serving messages over STDIO");
            serve_stdio(&handler).await
        }
        Command::Ask {
            text,
            sender,
            stream,
            topic,
        } => {
            let message = match stream {
                Some(stream) => InboundMessage::stream(stream, topic, sender, text),
                None => InboundMessage::private(sender, text),
            };
            ask(&cli, &message).await
        }
        Command::CheckKey { expected } => check_key(&cli, expected),
        Command::Usage => {
            println!("{}", USAGE.trim());
            println!();
            println!("{}", HELP_TEXT.trim());
            Ok(())
        }
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(
                *shell,
                &mut command,
                "foursquare-bot",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

async fn ask(cli: &Cli, message: &InboundMessage) -> Result<()> {
    let handler = bootstrap(cli.bot_config())?;
    let renderer = Renderer::new(cli.format);
    let collector = ReplyCollector::default();

    let progress = spinner(cli.progress_enabled(), "Searching Foursquare...");
    let outcome = handler.process(message, &collector).await;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    if outcome? == HandleOutcome::Ignored && !cli.quiet {
        eprintln!("Message does not mention the bot; nothing to send.");
    }
    for reply in collector.take().await {
        renderer.reply(&reply)?;
    }
    Ok(())
}

fn check_key(cli: &Cli, expected: &str) -> Result<()> {
    let path = resolve_settings_path(cli.config.as_deref())?;
    let key = load_api_key(&path)?;
    ensure!(
        key.expose() == expected,
        "API key in {} does not match the expected value",
        path.display()
    );
    if !cli.quiet {
        println!("Success");
    }
    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,foursquare_bot_cli=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(!cli.no_color)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

mod output {
    use anyhow::Result;
    use clap::ValueEnum;
    use foursquare_bot::OutboundReply;

    #[derive(Debug, Clone, Copy, ValueEnum)]
    pub enum OutputFormat {
        Text,
        Json,
    }

    pub struct Renderer {
        format: OutputFormat,
    }

    impl Renderer {
        pub fn new(format: OutputFormat) -> Self {
            Self { format }
        }

        pub fn reply(&self, reply: &OutboundReply) -> Result<()> {
            match self.format {
                OutputFormat::Text => println!("{}", reply.content()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reply)?),
            }
            Ok(())
        }
    }
}

mod progress {
    use std::time::Duration;

    use indicatif::{ProgressBar, ProgressStyle};

    pub fn spinner(message_enabled: bool, message: impl Into<String>) -> Option<ProgressBar> {
        if !message_enabled {
            return None;
        }
        let progress = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        progress.set_style(style);
        progress.set_message(message.into());
        progress.enable_steady_tick(Duration::from_millis(80));
        Some(progress)
    }
}

mod replies {
    use anyhow::Result;
    use async_trait::async_trait;
    use foursquare_bot::{ChatClient, OutboundReply};
    use tokio::sync::Mutex;

    /// Keeps replies in memory so `ask` can print them after the spinner.
    #[derive(Default)]
    pub struct ReplyCollector {
        sent: Mutex<Vec<OutboundReply>>,
    }

    impl ReplyCollector {
        pub async fn take(&self) -> Vec<OutboundReply> {
            std::mem::take(&mut *self.sent.lock().await)
        }
    }

    #[async_trait]
    impl ChatClient for ReplyCollector {
        async fn send_message(&self, reply: OutboundReply) -> Result<()> {
            self.sent.lock().await.push(reply);
            Ok(())
        }
    }
}
