use std::process::ExitCode;

use anyhow::{bail, Context};
use chat_core::{
    ActionOutcome, ChatClient, ErrorBoundary, FormData, Id, LoaderError, NewThread, ThreadSession,
    Transport, UreqTransport,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod render;

#[derive(Parser)]
#[command(name = "chat")]
#[command(version)]
#[command(about = "Read and edit chat threads on a remote chat API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the chat API.
    #[arg(long, env = "CHAT_API_URL", default_value = config::DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Bearer token sent with every request.
    #[arg(long, env = "CHAT_API_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List threads")]
    Threads,

    #[command(about = "Start a new thread")]
    New { title: String },

    #[command(about = "Show a thread and its messages")]
    Show { thread: Id },

    #[command(about = "Post a message to a thread")]
    Send {
        thread: Id,
        #[arg(num_args = 1.., trailing_var_arg = true)]
        message: Vec<String>,
    },

    #[command(about = "Rename a thread")]
    Rename { thread: Id, title: String },

    #[command(about = "Edit one of your messages")]
    Edit {
        thread: Id,
        message: Id,
        content: String,
    },
}

fn main() -> ExitCode {
    config::load_dotenv_files();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut client = ChatClient::new(&cli.api_url);
    if let Some(token) = cli.token.filter(|t| !t.is_empty()) {
        client = client.with_token(token);
    }
    info!(api = client.base_url(), "using chat api");
    let transport = UreqTransport::new();

    match cli.command {
        Commands::Threads => {
            let threads = transport
                .execute(&client.build_list_threads())
                .and_then(|r| client.parse_list_threads(r))
                .context("listing threads")?;
            print!("{}", render::thread_list(&threads));
            Ok(ExitCode::SUCCESS)
        }
        Commands::New { title } => {
            let title = title.trim();
            if title.is_empty() {
                bail!("Title cannot be empty");
            }
            let request = client.build_create_thread(&NewThread {
                title: title.to_string(),
            })?;
            let thread = transport
                .execute(&request)
                .and_then(|r| client.parse_create_thread(r))
                .context("creating thread")?;
            println!("{}", thread.id);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show { thread } => {
            let mut session = ThreadSession::new(client, transport, thread);
            let _ = session.load();
            Ok(show(&session))
        }
        Commands::Send { thread, message } => {
            let mut session = ThreadSession::new(client, transport, thread);
            let form = FormData::from_pairs([("message", message.join(" "))]);
            let outcome = session.send_message(&form);
            finish(&session, outcome)
        }
        Commands::Rename { thread, title } => {
            let mut session = ThreadSession::new(client, transport, thread);
            let outcome = session.edit_title(&FormData::from_pairs([("title", title)]));
            finish(&session, outcome)
        }
        Commands::Edit {
            thread,
            message,
            content,
        } => {
            let mut session = ThreadSession::new(client, transport, thread);
            edit(&mut session, message, content)
        }
    }
}

/// Check the message against the loaded thread first, the way the edit form
/// does before it renders. A thread that fails to load gets its boundary and
/// nothing is submitted.
fn edit<T: Transport>(
    session: &mut ThreadSession<T>,
    message: Id,
    content: String,
) -> anyhow::Result<ExitCode> {
    if session.load().is_err() {
        return Ok(show(session));
    }
    if let Some(Err(reason)) = session.view().map(|view| view.editable_message(&message)) {
        bail!(reason);
    }
    let outcome = session.edit_message(message, &FormData::from_pairs([("content", content)]));
    finish(session, outcome)
}

/// Print the thread or the boundary that replaces it.
fn show<T: Transport>(session: &ThreadSession<T>) -> ExitCode {
    if let Some(view) = session.view() {
        print!("{}", render::thread_view(view, Utc::now()));
        return ExitCode::SUCCESS;
    }
    let boundary = session
        .boundary()
        .unwrap_or_else(|| ErrorBoundary::from(&LoaderError::Failed(String::new())));
    print!("{}", render::boundary(&boundary));
    ExitCode::FAILURE
}

fn finish<T: Transport>(session: &ThreadSession<T>, outcome: ActionOutcome) -> anyhow::Result<ExitCode> {
    match outcome {
        ActionOutcome::Error(message) => bail!(message),
        ActionOutcome::Redirect(location) => info!(%location, "redirect"),
        ActionOutcome::Success => info!("saved"),
    }
    Ok(show(session))
}
