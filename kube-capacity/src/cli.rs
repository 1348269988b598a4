use clap::Parser;
use clap::ValueEnum;

use super::*;

/// Overview of resource requests, limits and utilization in a Kubernetes cluster
#[derive(Debug, Parser)]
#[command(name = "kube-capacity", version, about, long_about = None)]
pub(crate) struct Cli {
    /// Include pods in the output
    #[arg(short, long)]
    pub(crate) pods: bool,

    /// Include utilization reported by metrics-server
    #[arg(short, long)]
    pub(crate) util: bool,

    /// Only include pods from this namespace
    #[arg(short, long)]
    pub(crate) namespace: Option<String>,

    /// Label selector to filter pods with
    #[arg(short = 'l', long)]
    pub(crate) pod_labels: Option<String>,

    /// Label selector to filter nodes with
    #[arg(long)]
    pub(crate) node_labels: Option<String>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub(crate) context: Option<String>,

    /// When to colorize flagged values
    #[arg(long, value_enum, env = "KUBE_CAPACITY_COLOR", default_value_t = ColorChoice::Auto)]
    pub(crate) color: ColorChoice,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ColorChoice {
    /// Colorize when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Forces `colored` on or off process wide when the choice is explicit.
    pub(crate) fn apply(self) {
        match self {
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
            Self::Auto => {}
        }
    }

    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => colored::control::SHOULD_COLORIZE.should_colorize(),
        }
    }
}

impl Cli {
    pub(crate) fn selection(&self) -> Selection {
        Selection {
            namespace: self.namespace.clone(),
            pod_labels: self.pod_labels.clone(),
            node_labels: self.node_labels.clone(),
        }
    }

    pub(crate) fn print_options(&self) -> PrintOptions {
        PrintOptions {
            show_pods: self.pods,
            show_util: self.util,
            colorize: self.color.enabled(),
        }
    }
}
