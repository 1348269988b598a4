use std::io;

use clap::Parser as _;
use k8s_capacity as capacity;
use tracing_subscriber::EnvFilter;

use capacity::ClusterMetric;
use capacity::ResourceCell;
use capacity::ResourceMetric;
use capacity::ResourceType;
use capacity::Status;
use k8s_capacity_collector::CapacityCollector;
use k8s_capacity_collector::Selection;

use cli::Cli;
use printer::PrintOptions;
use printer::TablePrinter;

mod cli;
mod printer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Starting kube-capacity");

    let collector = CapacityCollector::new(cli.context.as_deref())
        .await
        .inspect_err(|err| tracing::error!(?err, "Failed to connect to the cluster"))?;
    let cluster = collector.cluster_metric(&cli.selection(), cli.util).await?;

    cli.color.apply();
    let printer = TablePrinter::new(&cluster, cli.print_options());
    printer.print(&mut io::stdout().lock())?;

    Ok(())
}
