use std::future::Future;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use clap::Subcommand;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;

use crate::Result;
use crate::config::Config;
use crate::config::load_config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::datasource::HttpDataService;
use crate::err_with_loc;
use crate::error::ExplorerError;
use crate::handler::ExpansionController;
use crate::handler::TracingObserver;
use crate::model::ExpansionOutcome;
use crate::model::FlowDirection;
use crate::model::NodeKey;
use crate::model::SortOrder;
use crate::tracing::setup_tracing;

#[derive(Parser, Debug)]
#[command(name = "kashif", about = "Explore a transaction/account network one expansion at a time")]
pub struct KashifArgs {
  /// Path of the TOML configuration
  #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
  pub config: PathBuf,
  /// Transaction signature or account address to start from
  #[arg(long)]
  pub seed:   Option<String>,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct CommandLine {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
  /// Start a new session from a transaction signature or account address
  Seed { input: String },
  /// Fetch the next page of a node's flows
  Node {
    key:       String,
    direction: FlowDirection,
    sort:      SortOrder,
  },
  /// Fetch every flow of the transaction behind the index-th edge
  Edge { index: usize },
  /// Show the four cursors of a node
  Cursors { key: String },
  /// List committed edges in commit order
  Edges,
  /// Node and edge counts
  Stats,
  /// Print the whole graph as JSON
  Dump,
  /// Wait for running expansions and exit
  Quit,
}

impl Command {
  pub fn parse_line(line: &str) -> std::result::Result<Command, clap::Error> {
    CommandLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
  }
}

type Tasks = FuturesUnordered<JoinHandle<()>>;

#[derive(Clone)]
pub struct Kashif {
  pub config:     Config,
  pub controller: ExpansionController,
}

impl Kashif {
  pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = KashifArgs::parse();

    let config = load_config(&args.config)?;
    let _tracing_guard = setup_tracing(&config.logging, "kashif")?;
    info!("Starting Kashif (كاشف): The Revealer");

    let data_service = HttpDataService::new(&config.data_service).map_err(|e| err_with_loc!(e))?;
    info!("kashif::run::data_service::{}", config.data_service.base_url);

    let controller =
      ExpansionController::new(Arc::new(data_service), Arc::new(TracingObserver), config.explorer.page_size);
    let kashif = Kashif { config, controller };

    let mut tasks = Tasks::new();
    if let Some(seed) = args.seed {
      kashif.dispatch(Command::Seed { input: seed }, &mut tasks);
    }

    let cancellation_token = CancellationToken::new();
    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        info!("termination_signal::graceful_shutdown");
        ctrl_c_token.cancel();
      }
    });

    kashif.repl(&mut tasks, cancellation_token).await?;

    info!("kashif::waiting_for_expansions::{}", tasks.len());
    while let Some(joined) = tasks.next().await {
      if let Err(e) = joined {
        error!("expansion_task_failed::{}", e);
      }
    }
    info!("kashif::shutdown");
    Ok(())
  }

  async fn repl(
    &self,
    tasks: &mut Tasks,
    cancellation_token: CancellationToken,
  ) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
      tokio::select! {
        _ = cancellation_token.cancelled() => return Ok(()),
        Some(joined) = tasks.next(), if !tasks.is_empty() => {
          if let Err(e) = joined {
            error!("expansion_task_failed::{}", e);
          }
        },
        line = lines.next_line() => {
          let Some(line) = line? else {
            return Ok(());
          };
          if line.trim().is_empty() {
            continue;
          }
          match Command::parse_line(&line) {
            Ok(command) => {
              if self.dispatch(command, tasks).is_break() {
                return Ok(());
              }
            },
            Err(e) => println!("{}", e),
          }
        },
      }
    }
  }

  fn spawn_expansion<F>(
    &self,
    tasks: &mut Tasks,
    label: String,
    expansion: F,
  ) where
    F: Future<Output = std::result::Result<ExpansionOutcome, ExplorerError>> + Send + 'static,
  {
    tasks.push(tokio::spawn(async move {
      println!("{}", describe_outcome(&label, expansion.await));
    }));
  }

  pub fn dispatch(
    &self,
    command: Command,
    tasks: &mut Tasks,
  ) -> ControlFlow<()> {
    match command {
      Command::Seed { input } => {
        let controller = self.controller.clone();
        let label = format!("seed {}", input);
        self.spawn_expansion(tasks, label, async move { controller.start_session(&input).await });
      },
      Command::Node { key, direction, sort } => match NodeKey::new(key) {
        Ok(node) => {
          let controller = self.controller.clone();
          let label = format!("node {} {} {}", node.short(), direction, sort);
          self.spawn_expansion(tasks, label, async move { controller.expand_node(&node, direction, sort).await });
        },
        Err(e) => println!("{}", e),
      },
      Command::Edge { index } => match self.controller.edge_keys().into_iter().nth(index) {
        Some(edge) => {
          let controller = self.controller.clone();
          let label = format!("edge {}", index);
          self.spawn_expansion(tasks, label, async move { controller.expand_edge(&edge).await });
        },
        None => println!("no edge #{} (the graph has {})", index, self.controller.edge_count()),
      },
      Command::Cursors { key } => {
        let states = NodeKey::new(key).ok().and_then(|node| self.controller.cursor_states(&node));
        match states {
          Some(states) => {
            for (direction, sort, state) in states {
              println!("{:>3} {:<4} has_more={} page={}", direction.as_str(), sort.as_str(), state.has_more, state.page);
            }
          },
          None => println!("unknown node"),
        }
      },
      Command::Edges => {
        for (index, edge) in self.controller.snapshot().edges.iter().enumerate() {
          println!(
            "#{} {} -> {} {} {} tx={} {}",
            index,
            edge.source().short(),
            edge.target().short(),
            edge.amount,
            edge.asset_ticker.as_deref().unwrap_or(edge.asset_id()),
            edge.transaction_id(),
            if edge.expandable { "expandable" } else { "expanded" }
          );
        }
      },
      Command::Stats => println!(
        "generation={} nodes={} edges={} page_size={}",
        self.controller.generation(),
        self.controller.node_count(),
        self.controller.edge_count(),
        self.controller.page_size()
      ),
      Command::Dump => match serde_json::to_string_pretty(&self.controller.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("dump_failed::{}", e),
      },
      Command::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
  }
}

pub fn describe_outcome(
  label: &str,
  outcome: std::result::Result<ExpansionOutcome, ExplorerError>,
) -> String {
  match outcome {
    Ok(ExpansionOutcome::Applied(added)) if added.is_empty() => format!("{}: nothing new", label),
    Ok(ExpansionOutcome::Applied(added)) => {
      format!("{}: +{} nodes, +{} edges", label, added.nodes.len(), added.edges.len())
    },
    Ok(ExpansionOutcome::Rejected(violation)) => format!("{}: skipped, {}", label, violation),
    Ok(ExpansionOutcome::Discarded { .. }) => format!("{}: dropped, a new search replaced the session", label),
    Err(e) => format!("{}: {}", label, e.user_message()),
  }
}
