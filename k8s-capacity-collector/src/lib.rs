use std::collections::HashMap;
use std::collections::HashSet;

use k8s_capacity_ext as k8s;
use k8s_capacity_kubeapi::KubeApi;
use k8s_capacity_kubeapi::KubeApiError;
use kube::ResourceExt as _;

use k8s::capacity::CapacityError;
use k8s::capacity::ClusterMetric;
use k8s::capacity::Snapshot;
use k8s::corev1;
use k8s::metricsv1;
use k8s::NodeExt as _;
use k8s::PodExt as _;
use k8s::PodMetricsExt as _;
use k8s::QuantityParseError;

pub use k8s_capacity_kubeapi::Selection;

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    KubeApi(#[from] KubeApiError),
    #[error("failed to fetch cluster state: {0}")]
    Kube(#[from] kube::Error),
    #[error("invalid quantity in {kind} {name}: {source}")]
    Quantity {
        kind: &'static str,
        name: String,
        #[source]
        source: QuantityParseError,
    },
    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

impl CollectError {
    fn quantity(kind: &'static str, name: impl ToString) -> impl FnOnce(QuantityParseError) -> Self {
        let name = name.to_string();
        move |source| Self::Quantity { kind, name, source }
    }
}

#[derive(Debug)]
pub struct CapacityCollector {
    kubeapi: KubeApi,
}

impl CapacityCollector {
    pub async fn new(context: Option<&str>) -> Result<Self, CollectError> {
        let kubeapi = KubeApi::new(context).await?;
        Ok(Self::with_kubeapi(kubeapi))
    }

    pub fn with_kubeapi(kubeapi: KubeApi) -> Self {
        Self { kubeapi }
    }

    /// Fetches nodes, pods and, when `with_usage` is set, pod metrics.
    ///
    /// All requests run concurrently; any failure aborts the snapshot.
    pub async fn snapshot(
        &self,
        selection: &Selection,
        with_usage: bool,
    ) -> Result<Snapshot, CollectError> {
        let nodes = self.kubeapi.list_nodes(selection);
        let pods = self.kubeapi.list_pods(selection);
        let metrics = async {
            if with_usage {
                self.kubeapi.list_pod_metrics(selection).await
            } else {
                Ok(Vec::new())
            }
        };

        let (nodes, pods, metrics) = tokio::try_join!(nodes, pods, metrics)
            .inspect_err(|err| tracing::error!(?err, "Failed to fetch cluster state"))?;
        tracing::info!(
            nodes = nodes.len(),
            pods = pods.len(),
            metrics = metrics.len(),
            "Fetched cluster state"
        );

        snapshot_from(&nodes, &pods, &metrics, selection)
    }

    pub async fn cluster_metric(
        &self,
        selection: &Selection,
        with_usage: bool,
    ) -> Result<ClusterMetric, CollectError> {
        let snapshot = self.snapshot(selection, with_usage).await?;
        Ok(snapshot.aggregate()?)
    }
}

/// Converts fetched API objects into aggregation input.
///
/// When nodes are narrowed by a label selector, pods bound to any other node
/// are dropped rather than counted as orphans. Pods without a node are kept.
pub fn snapshot_from(
    nodes: &[corev1::Node],
    pods: &[corev1::Pod],
    metrics: &[metricsv1::PodMetrics],
    selection: &Selection,
) -> Result<Snapshot, CollectError> {
    let nodes = nodes
        .iter()
        .map(|node| {
            node.allocatable()
                .map_err(CollectError::quantity("node", node.name_any()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let node_names = nodes
        .iter()
        .map(|node| node.name.as_str())
        .collect::<HashSet<_>>();

    let mut selected = Vec::with_capacity(pods.len());
    for pod in pods {
        let resources = pod
            .resources()
            .map_err(CollectError::quantity("pod", pod.identity()))?;
        let on_unselected_node = selection.node_labels.is_some()
            && resources
                .node_name
                .as_deref()
                .is_some_and(|node| !node_names.contains(node));
        if on_unselected_node {
            tracing::debug!(pod = %pod.identity(), "Skipping pod on unselected node");
            continue;
        }
        selected.push(resources);
    }

    let usage = metrics
        .iter()
        .map(|metrics| {
            let identity = metrics.identity();
            metrics
                .container_usage()
                .map(|usage| (identity.clone(), usage))
                .map_err(CollectError::quantity("pod metrics", identity))
        })
        .collect::<Result<HashMap<_, _>, _>>()?;

    Ok(Snapshot {
        nodes,
        pods: selected,
        usage,
    })
}
