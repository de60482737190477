//! hypripc CLI
//!
//! Command line front end for the Hyprland IPC client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hyprland_ipc::HyprClient;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hypripc")]
#[command(about = "Talk to Hyprland over its IPC sockets")]
#[command(version)]
struct Cli {
    /// Path to the command socket (defaults to the running instance's)
    #[arg(long, requires = "event_socket")]
    socket: Option<String>,

    /// Path to the event socket (defaults to the running instance's)
    #[arg(long, requires = "socket")]
    event_socket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send a raw command and print the reply
    Send {
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,
    },

    /// Send a command and pretty-print its JSON reply
    Json {
        #[arg(required = true, num_args = 1..)]
        command: Vec<String>,
    },

    /// Run dispatchers one request at a time
    Dispatch {
        /// Dispatcher with arguments, e.g. "workspace 2"
        #[arg(required = true, num_args = 1..)]
        actions: Vec<String>,
    },

    /// Run dispatchers in a single batched request
    Batch {
        #[arg(required = true, num_args = 1..)]
        actions: Vec<String>,
    },

    /// List all clients
    Clients,

    /// Show the focused window
    ActiveWindow,

    /// Show the focused workspace
    ActiveWorkspace,

    /// Print events as they arrive
    Events {
        /// Stop after this many events
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

fn main() -> miette::Result<()> {
    // Logs go to stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = build_client(cli.socket.as_deref(), cli.event_socket.as_deref())?;

    match cli.command {
        Commands::Send { command } => cmd_send(&client, &command.join(" ")),
        Commands::Json { command } => cmd_json(&client, &command.join(" ")),
        Commands::Dispatch { actions } => cmd_dispatch(&client, &actions),
        Commands::Batch { actions } => client.batch(&actions).map_err(report),
        Commands::Clients => {
            let clients = client.get_clients().map_err(report)?;
            print_json(&clients)
        }
        Commands::ActiveWindow => print_json(&client.get_active_window().map_err(report)?),
        Commands::ActiveWorkspace => print_json(&client.get_active_workspace().map_err(report)?),
        Commands::Events { count } => cmd_events(&client, count),
    }
}

fn build_client(socket: Option<&str>, event_socket: Option<&str>) -> miette::Result<HyprClient> {
    match (socket, event_socket) {
        (Some(socket), Some(event_socket)) => {
            Ok(HyprClient::new(expand(socket), expand(event_socket)))
        }
        _ => HyprClient::from_env().map_err(report),
    }
}

fn expand(path: &str) -> PathBuf {
    shellexpand::tilde(path).into_owned().into()
}

/// Convert a library error into a diagnostic carrying its source chain
fn report(err: hyprland_ipc::HyprError) -> miette::Report {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {}", cause));
        source = cause.source();
    }
    miette::miette!("{}", message)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> miette::Result<()> {
    let text = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", text);
    Ok(())
}

fn cmd_send(client: &HyprClient, command: &str) -> miette::Result<()> {
    let reply = client.send(command).map_err(report)?;
    print!("{}", reply);
    if !reply.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cmd_json(client: &HyprClient, command: &str) -> miette::Result<()> {
    let value = client.send_json(command).map_err(report)?;
    print_json(&value)
}

fn cmd_dispatch(client: &HyprClient, actions: &[String]) -> miette::Result<()> {
    match actions {
        [action] => client.dispatch(action),
        _ => client.dispatch_many(actions),
    }
    .map_err(report)
}

fn cmd_events(client: &HyprClient, count: Option<usize>) -> miette::Result<()> {
    let stream = client.events().map_err(report)?;

    for event in stream.take(count.unwrap_or(usize::MAX)) {
        println!("{}", event.map_err(report)?);
    }

    tracing::debug!("Event stream ended");
    Ok(())
}
