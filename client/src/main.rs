use anyhow::Context;
use display::bridge::{default_bind_address, DisplayBridge};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::FeedConfig;
use workflow::runner::Runner;

mod display;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Recent earthquakes from a seismic event feed")]
struct Args {
    /// Load the feed config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Request this URL instead of building a query
    #[arg(long)]
    url: Option<String>,
    #[arg(long, default_value_t = 6.0)]
    min_magnitude: f64,
    #[arg(long, default_value_t = 10)]
    limit: u32,
    #[arg(long, default_value = "time")]
    order_by: String,
    /// Print the listing as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Open the detail page of the record at this position in a browser
    #[arg(long)]
    open: Option<usize>,
    /// Keep the display bridge alive for an external viewer
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = default_bind_address())]
    bind: SocketAddr,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let feed_config = if let Some(path) = args.config {
        FeedConfig::load(path)?
    } else {
        FeedConfig::from_args(args.url, args.min_magnitude, args.limit, args.order_by)
    };

    let runner = Arc::new(Runner::new(&feed_config)?);
    let bridge = DisplayBridge::new(runner.clone());
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the feed load")?;

    bridge.publish_status(&format!("Loading {}", runner.url()));
    let state = bridge.state();
    let result = runtime.block_on(runner.refresh(&state));

    let model = bridge.snapshot();
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&model).context("serializing listing")?
        );
    } else {
        for line in model.render_lines() {
            println!("{}", line);
        }
    }
    bridge.publish_status(&format!(
        "{} earthquakes{}",
        result.record_count,
        if result.complete { "" } else { " (load incomplete, see log)" }
    ));

    if let Some(index) = args.open {
        let selected = match state.read() {
            Ok(list) => list.detail_url(index).map(str::to_string),
            Err(_) => anyhow::bail!("displayed list is unavailable"),
        };
        let url = selected.with_context(|| format!("no earthquake at position {index}"))?;
        webbrowser::open(&url).with_context(|| format!("opening {url} in a browser"))?;
        bridge.publish_status(&format!("Opened {}", url));
    }

    if args.serve {
        let running = bridge
            .serve(args.bind)
            .context("binding display bridge")?;
        bridge.publish_status(&format!(
            "HTTP bridge running on {} (Ctrl+C to stop)...",
            running.addr
        ));
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
