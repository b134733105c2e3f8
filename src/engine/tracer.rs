use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;
use tracing::warn;

use crate::Result;
use crate::config::Config;
use crate::config::load_config;
use crate::engine::Session;
use crate::err_with_loc;
use crate::fetch::HttpExplorer;
use crate::model::DateRange;
use crate::trace::TraceDirection;
use crate::trace::TraceOrchestrator;
use crate::trace::TraceProgress;
use crate::trace::TraceRequest;
use crate::tracing::setup_tracing;
use crate::utils::format_amount;
use crate::utils::truncate_address;

#[derive(Debug, Parser)]
#[command(name = "tracer", about = "Multi-hop address history crawler")]
pub struct TracerArgs {
    #[arg(long, default_value = "Config.toml")]
    pub config: String,

    /// Target address; repeat for multiple.
    #[arg(long = "address", required = true)]
    pub addresses: Vec<String>,

    /// Chain id as the explorer understands it.
    #[arg(long, default_value = "1")]
    pub network: String,

    #[arg(long, default_value_t = 1)]
    pub hops: usize,

    /// both | from | to
    #[arg(long, default_value = "both")]
    pub direction: String,

    #[arg(long)]
    pub exclude_native: bool,

    #[arg(long)]
    pub exclude_erc20: bool,

    #[arg(long)]
    pub start: Option<NaiveDate>,

    #[arg(long)]
    pub end: Option<NaiveDate>,
}

pub struct Tracer;

impl Tracer {
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        let args = TracerArgs::parse();

        let mut config = match load_config(&args.config).await {
            Ok(config) => config,
            Err(e) => {
                eprintln!("config_load_failed::{}::using_defaults::{}", args.config, e);
                Config::default()
            },
        };
        if let Ok(key) = std::env::var("CHAINSCOPE_API_KEY") {
            config.explorer.api_key = Some(key);
        }

        let _log_guard = setup_tracing(&config.logging, "tracer");
        info!("Starting Tracer: batched multi-hop history crawl");

        let direction = match args.direction.to_lowercase().as_str() {
            "both" => TraceDirection::Both,
            "from" => TraceDirection::From,
            "to" => TraceDirection::To,
            other => return Err(err_with_loc!(format!("unknown direction: {}", other))),
        };

        let range = match (args.start, args.end) {
            (Some(start), Some(end)) => Some(DateRange::from_dates(start, end)),
            (None, None) => None,
            _ => return Err(err_with_loc!("--start and --end must be given together")),
        };

        let provider = Arc::new(HttpExplorer::new(config.explorer.clone()));
        let (progress_tx, mut progress_rx) = mpsc::channel(64);
        let orchestrator =
            TraceOrchestrator::new(provider, config.trace.clone()).with_progress(progress_tx);

        let cancel = orchestrator.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("ctrl_c_received::finishing_current_layer_then_stopping");
                cancel.cancel();
            }
        });

        let progress_printer = tokio::spawn(async move {
            while let Some(event) = progress_rx.recv().await {
                match event {
                    TraceProgress::LayerStarted { layer, total, frontier_size } => {
                        info!("scanning_hop_layer::{}/{}::targets::{}", layer + 1, total, frontier_size);
                    },
                    TraceProgress::LayerFinished { layer, discovered, next_frontier } => {
                        info!(
                            "hop_layer_done::{}::discovered::{}::next_frontier::{}",
                            layer + 1,
                            discovered,
                            next_frontier
                        );
                    },
                    TraceProgress::FinishedEarly { layer } => {
                        info!("finished_at_hop::{}::no_new_frontier", layer);
                    },
                    TraceProgress::Finalizing => info!("finalizing"),
                }
            }
        });

        let mut session = Session::new(&config.graph);
        session.add_seed_addresses(args.addresses.iter().map(String::as_str));

        let request = TraceRequest {
            network: args.network.clone(),
            targets: args.addresses.clone(),
            hops: args.hops,
            direction,
            include_native: !args.exclude_native,
            include_erc20: !args.exclude_erc20,
            range,
        };

        let outcome = session.run_trace(&orchestrator, request).await?;
        drop(orchestrator);
        let _ = progress_printer.await;

        let ticks = session.layout_mut().settle(300);
        let view = session.view();
        info!(
            "trace_summary::transactions::{}::nodes::{}::links::{}::failed::{}::layout_ticks::{}",
            outcome.transactions.len(),
            view.nodes.len(),
            view.links.len(),
            outcome.failed_addresses.len(),
            ticks
        );

        let mut hop_counts: Vec<(u32, usize)> = Vec::new();
        for node in &view.nodes {
            if let Some(hop) = node.hop {
                match hop_counts.iter_mut().find(|(h, _)| *h == hop) {
                    Some((_, count)) => *count += 1,
                    None => hop_counts.push((hop, 1)),
                }
            }
        }
        hop_counts.sort_by_key(|(h, _)| *h);
        for (hop, count) in hop_counts {
            info!("hop_histogram::{}::{}", hop, count);
        }

        let mut by_balance: Vec<_> = view.nodes.iter().collect();
        by_balance.sort_by(|a, b| b.balance.total_cmp(&a.balance));
        for node in by_balance.iter().take(10) {
            info!(
                "top_balance::{}::{}::hop::{:?}",
                truncate_address(&node.id),
                format_amount(node.balance),
                node.hop
            );
        }

        Ok(())
    }
}
