use std::fmt;

use k8s_capacity_ext as k8s;
use kube::api;

use k8s::corev1;
use k8s::metricsv1;

/// Pods in a terminal phase no longer hold their requests on a node.
const ACTIVE_PODS: &str = "status.phase!=Succeeded,status.phase!=Failed";

#[derive(Debug, thiserror::Error)]
pub enum KubeApiError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error(transparent)]
    Kube(#[from] kube::Error),
}

/// Which part of the cluster to look at.
///
/// Label selectors use the usual `key=value,key!=value` syntax.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub namespace: Option<String>,
    pub pod_labels: Option<String>,
    pub node_labels: Option<String>,
}

pub struct KubeApi {
    list_params: api::ListParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi using the default kubeconfig resolution, optionally
    /// pinned to the kubeconfig `context`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), k8s_capacity_kubeapi::KubeApiError> {
    /// let api = k8s_capacity_kubeapi::KubeApi::new(Some("kind-kind")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(context: Option<&str>) -> Result<Self, KubeApiError> {
        let client = match context {
            Some(context) => {
                let options = kube::config::KubeConfigOptions {
                    context: Some(context.to_string()),
                    ..k8s::default()
                };
                let config = kube::Config::from_kubeconfig(&options).await?;
                kube::Client::try_from(config)?
            }
            None => kube::Client::try_default().await?,
        };
        Ok(Self::with_client(client))
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            list_params: api::ListParams::default(),
            client,
        }
    }

    /// Lists the Nodes matching the node label selector of `selection`.
    pub async fn list_nodes(&self, selection: &Selection) -> kube::Result<Vec<corev1::Node>> {
        let lp = self.list_params(selection.node_labels.as_deref());
        let nodes = self.nodes().list(&lp).await?.items;
        tracing::debug!(count = nodes.len(), "Listed nodes");
        Ok(nodes)
    }

    /// Lists the Pods of `selection` that are not in a terminal phase.
    pub async fn list_pods(&self, selection: &Selection) -> kube::Result<Vec<corev1::Pod>> {
        let lp = self
            .list_params(selection.pod_labels.as_deref())
            .fields(ACTIVE_PODS);
        let pods = self.pods(selection).list(&lp).await?.items;
        tracing::debug!(count = pods.len(), "Listed pods");
        Ok(pods)
    }

    /// Lists `metrics.k8s.io` PodMetrics for the pods of `selection`.
    ///
    /// Fails when no metrics server is serving the API.
    pub async fn list_pod_metrics(
        &self,
        selection: &Selection,
    ) -> kube::Result<Vec<metricsv1::PodMetrics>> {
        let lp = self.list_params(selection.pod_labels.as_deref());
        let metrics = self
            .pod_metrics(selection)
            .list(&lp)
            .await
            .inspect_err(|err| tracing::warn!(?err, "Failed to list pod metrics"))?
            .items;
        tracing::debug!(count = metrics.len(), "Listed pod metrics");
        Ok(metrics)
    }

    fn nodes(&self) -> api::Api<corev1::Node> {
        api::Api::all(self.client.clone())
    }

    fn pods(&self, selection: &Selection) -> api::Api<corev1::Pod> {
        self.scoped(selection)
    }

    fn pod_metrics(&self, selection: &Selection) -> api::Api<metricsv1::PodMetrics> {
        self.scoped(selection)
    }

    fn scoped<K>(&self, selection: &Selection) -> api::Api<K>
    where
        K: kube::Resource<Scope = k8s::openapi::NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        match selection.namespace.as_deref() {
            Some(namespace) => api::Api::namespaced(self.client.clone(), namespace),
            None => api::Api::all(self.client.clone()),
        }
    }

    /// The base list parameters narrowed by an optional label selector.
    fn list_params(&self, labels: Option<&str>) -> api::ListParams {
        match labels {
            Some(labels) => self.list_params.clone().labels(labels),
            None => self.list_params.clone(),
        }
    }
}

impl fmt::Debug for KubeApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeApi")
            .field("list_params", &self.list_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}
