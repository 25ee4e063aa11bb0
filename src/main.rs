use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use indoor_mapper::identify::{Candidate, Choice, Disambiguator};
use indoor_mapper::storage::DEFAULT_DB_PATH;
use indoor_mapper::{Arrival, Error, Explorer, FileBackend, ForkRequest, Guidance};

#[derive(Parser)]
#[command(name = "indoor-mapper")]
#[command(about = "Map an unexplored building one junction at a time")]
struct Cmd {
    /// Database file
    #[arg(long, env = "INDOOR_MAPPER_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Start a new map with a single root node
    Begin,
    /// Record arrival at a junction and get the next direction
    Fork {
        /// New passages relative to your facing: w forward, d right, s back, a left
        dirs: Option<String>,
        /// Turn to take here instead of the suggested one
        forceturn: Option<String>,
        /// Description for the node if it is new
        #[arg(long, short = 'm', default_value = "")]
        description: String,
    },
    /// Revert the most recent step
    Undo,
    /// Summarize the stored map
    Status,
    /// Print the map as a Cypher script
    Export,
}

/// Operator prompt on stdin/stdout.
struct ConsolePrompt;

impl Disambiguator for ConsolePrompt {
    fn choose(&mut self, candidates: &[Candidate]) -> indoor_mapper::Result<Choice> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "Pick the node you are on, or type a new description:")?;
        for candidate in candidates {
            writeln!(stdout, "{}: {}", candidate.id, candidate.description)?;
        }
        write!(stdout, "-> ")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let answer = line.trim_end_matches(['\r', '\n']);
        Ok(match answer.trim().parse::<usize>() {
            Ok(index) => Choice::Existing(indoor_mapper::NodeId(index)),
            Err(_) => Choice::New(answer.to_string()),
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("indoor_mapper=info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cmd = Cmd::parse();
    match run(cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(Error::TopologyConflict { node, description, reported, stored }) =
                err.downcast_ref::<Error>()
            {
                println!("Something is wrong!");
                println!("It looks like you're at node {node}");
                println!("({description})");
                println!("But you gave directions:   {reported}");
                println!("That conflict with stored: {stored}");
                println!("Exiting without saving changes.");
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cmd: Cmd) -> Result<()> {
    let explorer = Explorer::with_backend(FileBackend::new(&cmd.db));
    let now = chrono::Local::now().naive_local();
    tracing::debug!(db = %cmd.db.display(), "opened");

    match cmd.action {
        Action::Begin => {
            explorer.begin(now).context("creating new map")?;
            println!("Started a new map in {}", cmd.db.display());
        }
        Action::Fork { dirs, forceturn, description } => {
            let request = ForkRequest::parse(dirs.as_deref().unwrap_or_default(), forceturn.as_deref(), now)?.with_description(description);
            let report = explorer.fork(&request, &mut ConsolePrompt)?;
            match report.arrival {
                Arrival::Known(id) => println!("You are at node {id} ({})", report.description),
                Arrival::Created(id) => println!("New node {id}"),
            }
            match report.guidance {
                Guidance::Turn { relative, .. } => println!("You should turn {relative}"),
                Guidance::Complete { route } => {
                    println!("You are done exploring! To get back to root:");
                    for step in route {
                        println!("{} {} {}", step.from, step.turn, step.description);
                    }
                }
            }
            println!("Saved.");
        }
        Action::Undo => {
            let report = explorer.undo()?;
            if let Some(id) = report.deleted_node {
                println!("Deleted node {id}");
            }
            println!("Removed log entry at node {} facing {}", report.entry.node, report.entry.afterturn);
        }
        Action::Status => {
            let status = explorer.status()?;
            println!("Nodes:       {}", status.nodes);
            println!("Log entries: {}", status.log_len);
            println!("Unexplored:  {}", status.unexplored);
            println!("Current:     node {} facing {}", status.current, status.facing);
        }
        Action::Export => {
            let mut stdout = io::stdout().lock();
            explorer.export_cypher(&mut stdout)?;
        }
    }
    Ok(())
}
