use super::*;

const MI: i64 = 1024 * 1024;

fn node(name: &str, cpu: i64, memory: i64) -> NodeAllocatable {
    NodeAllocatable::new(name, Resources::new(cpu, memory))
}

fn pod(name: &str, node: &str, requests: (i64, i64), limits: (i64, i64)) -> PodResources {
    PodResources::new(name, "default")
        .on_node(node)
        .requests(Resources::new(requests.0, requests.1))
        .limits(Resources::new(limits.0, limits.1))
}

fn cluster_with(nodes: &[NodeAllocatable]) -> ClusterMetric {
    let mut cluster = ClusterMetric::new();
    for node in nodes {
        cluster.add_node(node).unwrap();
    }
    cluster
}

#[test]
fn single_node_scenario() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let web = pod("web", "node-1", (500, 512 * MI), (1000, 1024 * MI));
    let usage = [Resources::new(600, 600 * MI)];

    cluster.add_pod_metric(&web, &usage).unwrap();

    let node = &cluster.node_metrics()["node-1"];
    assert_eq!(node.cpu().utilization_status(), Status::Flagged);
    assert_eq!(node.memory().utilization_status(), Status::Flagged);
    assert_eq!(node.cpu().request_status(), Status::Normal);
    assert_eq!(node.cpu().limit_status(), Status::Normal);

    assert_eq!(cluster.cpu(), node.cpu());
    assert_eq!(cluster.memory(), node.memory());

    assert_eq!(node.cpu().utilization_cell().to_string(), "600m (30%)");
    assert_eq!(node.memory().request_cell().to_string(), "512Mi (25%)");
}

#[test]
fn node_totals_are_sums_over_its_pods() {
    let mut cluster = cluster_with(&[node("node-1", 4000, 8192 * MI), node("node-2", 4000, 8192 * MI)]);
    let pods = [
        pod("a", "node-1", (100, 64 * MI), (200, 128 * MI)),
        pod("b", "node-1", (250, 256 * MI), (0, 0)),
        pod("c", "node-2", (400, 512 * MI), (800, 1024 * MI)),
    ];
    for pod in &pods {
        cluster.add_pod_metric(pod, &[]).unwrap();
    }

    for node in cluster.node_metrics().values() {
        let attributed = node.pod_metrics().values();
        let cpu_request: i64 = attributed.clone().map(|p| p.cpu().request()).sum();
        let cpu_limit: i64 = attributed.clone().map(|p| p.cpu().limit()).sum();
        let memory_request: i64 = attributed.clone().map(|p| p.memory().request()).sum();
        let memory_limit: i64 = attributed.map(|p| p.memory().limit()).sum();

        assert_eq!(node.cpu().request(), cpu_request);
        assert_eq!(node.cpu().limit(), cpu_limit);
        assert_eq!(node.memory().request(), memory_request);
        assert_eq!(node.memory().limit(), memory_limit);
    }

    assert_eq!(cluster.node_metrics()["node-1"].pod_metrics().len(), 2);
    assert_eq!(cluster.cpu().request(), 750);
    assert_eq!(cluster.cpu().allocatable(), 8000);
}

#[test]
fn pod_attribution_leaves_node_allocatable_untouched() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let before = cluster.node_metrics()["node-1"].cpu().allocatable();

    cluster
        .add_pod_metric(
            &pod("a", "node-1", (3000, 4096 * MI), (3000, 4096 * MI)),
            &[Resources::new(2500, 3000 * MI)],
        )
        .unwrap();

    let node = &cluster.node_metrics()["node-1"];
    assert_eq!(node.cpu().allocatable(), before);
    assert_eq!(node.memory().allocatable(), 2048 * MI);
    assert_eq!(cluster.cpu().allocatable(), 2000);
}

#[test]
fn pod_copies_node_allocatable_for_percentages() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    cluster
        .add_pod_metric(&pod("a", "node-1", (500, 512 * MI), (1000, 1024 * MI)), &[])
        .unwrap();

    let pod = &cluster.pod_metrics()["default/a"];
    assert_eq!(pod.cpu().allocatable(), 2000);
    assert_eq!(pod.memory().allocatable(), 2048 * MI);
    assert_eq!(pod.cpu().limit_cell().to_string(), "1000m (50%)");
}

#[test]
fn usage_accumulates_per_container() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let usage = [
        Resources::new(100, 100 * MI),
        Resources::new(50, 20 * MI),
        Resources::new(0, 0),
    ];
    cluster
        .add_pod_metric(&pod("a", "node-1", (500, 512 * MI), (1000, 1024 * MI)), &usage)
        .unwrap();

    let pod = &cluster.pod_metrics()["default/a"];
    assert_eq!(pod.cpu().utilization(), 150);
    assert_eq!(pod.memory().utilization(), 120 * MI);
    assert_eq!(cluster.node_metrics()["node-1"].cpu().utilization(), 150);
    assert_eq!(cluster.cpu().utilization(), 150);
}

#[test]
fn missing_usage_is_zero_utilization() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    cluster
        .add_pod_metric(&pod("a", "node-1", (500, 512 * MI), (1000, 1024 * MI)), &[])
        .unwrap();

    let pod = &cluster.pod_metrics()["default/a"];
    assert_eq!(pod.cpu().utilization(), 0);
    assert_eq!(pod.memory().utilization_cell().to_string(), "0Mi (0%)");
}

#[test]
fn duplicate_pod_is_rejected_without_changes() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let web = pod("web", "node-1", (500, 512 * MI), (1000, 1024 * MI));
    cluster.add_pod_metric(&web, &[]).unwrap();
    let before = cluster.clone();

    let err = cluster.add_pod_metric(&web, &[Resources::new(10, 10)]).unwrap_err();

    assert!(matches!(err, CapacityError::DuplicatePod(ref key) if key == "default/web"));
    assert_eq!(cluster, before);
}

#[test]
fn same_name_in_other_namespace_is_distinct() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let web = pod("web", "node-1", (100, MI), (100, MI));
    let other = PodResources {
        namespace: "kube-system".to_string(),
        ..web.clone()
    };

    cluster.add_pod_metric(&web, &[]).unwrap();
    cluster.add_pod_metric(&other, &[]).unwrap();

    assert_eq!(cluster.pod_metrics().len(), 2);
    assert!(cluster.pod_metrics().contains_key("kube-system/web"));
}

#[test]
fn duplicate_node_is_rejected() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);

    let err = cluster.add_node(&node("node-1", 1000, MI)).unwrap_err();

    assert!(matches!(err, CapacityError::DuplicateNode(ref name) if name == "node-1"));
    assert_eq!(cluster.cpu().allocatable(), 2000);
}

#[test]
fn cluster_allocatable_is_sum_of_nodes() {
    let cluster = cluster_with(&[
        node("node-1", 2000, 2048 * MI),
        node("node-2", 4000, 4096 * MI),
        node("node-3", 0, 0),
    ]);

    assert_eq!(cluster.cpu().allocatable(), 6000);
    assert_eq!(cluster.memory().allocatable(), 6144 * MI);
    assert_eq!(cluster.cpu().request(), 0);
}

#[test]
fn orphan_pod_scenario() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let orphan = pod("lost", "node-9", (100, 0), (0, 0));

    cluster.add_pod_metric(&orphan, &[]).unwrap();

    let indexed = &cluster.pod_metrics()["default/lost"];
    assert_eq!(indexed.cpu().allocatable(), 0);
    assert_eq!(indexed.cpu().request_cell().to_string(), "100m (0%)");
    assert_eq!(cluster.cpu().request(), 100);
    assert!(cluster
        .node_metrics()
        .values()
        .all(|node| node.pod_metrics().is_empty() && node.cpu().request() == 0));
    assert_eq!(cluster.orphan_pods().count(), 1);
}

#[test]
fn unscheduled_pod_is_an_orphan() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let pending = PodResources::new("pending", "default").requests(Resources::new(250, 0));

    cluster.add_pod_metric(&pending, &[]).unwrap();

    assert_eq!(cluster.orphan_pods().map(PodMetric::key).collect::<Vec<_>>(), ["default/pending"]);
    assert_eq!(cluster.cpu().request(), 250);
}

#[test]
fn orphan_pods_are_recorded_at_attribution() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    let pods = [
        pod("zeta", "gone", (10, 0), (0, 0)),
        pod("web", "node-1", (100, 0), (0, 0)),
        pod("alpha", "", (20, 0), (0, 0)),
    ];
    for pod in &pods {
        cluster.add_pod_metric(pod, &[]).unwrap();
    }
    let duplicate = cluster.add_pod_metric(&pods[0], &[]);

    assert!(matches!(duplicate, Err(CapacityError::DuplicatePod(_))));
    assert_eq!(
        cluster.orphan_pods().map(PodMetric::key).collect::<Vec<_>>(),
        ["default/alpha", "default/zeta"]
    );
    assert_eq!(cluster.pod_metrics().len(), 3);
}

#[test]
fn cluster_request_is_node_requests_plus_orphan_requests() {
    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI), node("node-2", 2000, 2048 * MI)]);
    let pods = [
        pod("a", "node-1", (100, 10 * MI), (200, 20 * MI)),
        pod("b", "node-2", (300, 30 * MI), (400, 40 * MI)),
        pod("c", "gone", (50, 5 * MI), (70, 7 * MI)),
        pod("d", "", (25, MI), (0, 0)),
    ];
    for pod in &pods {
        cluster.add_pod_metric(pod, &[]).unwrap();
    }

    let node_cpu: i64 = cluster.node_metrics().values().map(|n| n.cpu().request()).sum();
    let node_memory: i64 = cluster.node_metrics().values().map(|n| n.memory().limit()).sum();
    let orphan_cpu: i64 = cluster.orphan_pods().map(|p| p.cpu().request()).sum();
    let orphan_memory: i64 = cluster.orphan_pods().map(|p| p.memory().limit()).sum();

    assert_eq!(orphan_cpu, 75);
    assert_eq!(cluster.cpu().request(), node_cpu + orphan_cpu);
    assert_eq!(cluster.memory().limit(), node_memory + orphan_memory);
}

#[test]
fn orphan_policy_counts_orphans_towards_cluster() {
    assert_eq!(ORPHAN_POLICY, OrphanPolicy::CountTowardsCluster);
    assert_eq!(ClusterMetric::new().orphan_policy(), ORPHAN_POLICY);

    let mut cluster = cluster_with(&[node("node-1", 2000, 2048 * MI)]);
    cluster
        .add_pod_metric(
            &pod("lost", "node-9", (100, 64 * MI), (200, 128 * MI)),
            &[Resources::new(150, 32 * MI)],
        )
        .unwrap();

    assert_eq!(cluster.cpu().request(), 100);
    assert_eq!(cluster.cpu().limit(), 200);
    assert_eq!(cluster.cpu().utilization(), 150);
    assert_eq!(cluster.memory().utilization(), 32 * MI);
    assert_eq!(cluster.node_metrics()["node-1"].cpu().utilization(), 0);
    assert_eq!(cluster.pod_metrics()["default/lost"].cpu().utilization(), 150);
}

#[test]
fn excluded_orphans_add_nothing_to_cluster() {
    let mut cluster = ClusterMetric::with_orphan_policy(OrphanPolicy::Exclude);
    cluster.add_node(&node("node-1", 2000, 2048 * MI)).unwrap();
    cluster
        .add_pod_metric(
            &pod("lost", "node-9", (100, 64 * MI), (200, 128 * MI)),
            &[Resources::new(150, 32 * MI)],
        )
        .unwrap();

    assert_eq!(cluster.cpu().request(), 0);
    assert_eq!(cluster.cpu().limit(), 0);
    assert_eq!(cluster.cpu().utilization(), 0);
    assert_eq!(cluster.memory().utilization(), 0);
    assert_eq!(cluster.pod_metrics()["default/lost"].cpu().utilization(), 150);
}

#[test]
fn snapshot_registers_nodes_before_pods() {
    let mut usage = HashMap::new();
    usage.insert(
        "default/web".to_string(),
        vec![Resources::new(600, 600 * MI)],
    );
    let snapshot = Snapshot {
        // Pods listed first still find their node.
        pods: vec![pod("web", "node-1", (500, 512 * MI), (1000, 1024 * MI))],
        nodes: vec![node("node-1", 2000, 2048 * MI)],
        usage,
    };

    let cluster = snapshot.aggregate().unwrap();

    let node = &cluster.node_metrics()["node-1"];
    assert_eq!(node.pod_metrics().len(), 1);
    assert_eq!(node.cpu().utilization(), 600);
    assert_eq!(cluster.cpu(), node.cpu());
    assert_eq!(cluster.memory(), node.memory());
}

#[test]
fn snapshot_surfaces_duplicate_pods() {
    let web = pod("web", "node-1", (500, 512 * MI), (1000, 1024 * MI));
    let snapshot = Snapshot {
        nodes: vec![node("node-1", 2000, 2048 * MI)],
        pods: vec![web.clone(), web],
        ..Snapshot::default()
    };

    assert!(matches!(snapshot.aggregate(), Err(CapacityError::DuplicatePod(_))));
}

#[test]
fn add_node_metric_folds_prepopulated_figures() {
    let mut cluster = ClusterMetric::new();
    let mut node_metric = NodeMetric::new(&node("node-1", 2000, 2048 * MI));
    node_metric.add_requested(&Resources::new(100, MI), &Resources::new(200, 2 * MI));
    node_metric.add_usage(&Resources::new(50, MI));

    cluster.add_node_metric(node_metric).unwrap();

    assert_eq!(cluster.cpu().allocatable(), 2000);
    assert_eq!(cluster.cpu().request(), 100);
    assert_eq!(cluster.memory().limit(), 2 * MI);
    assert_eq!(cluster.cpu().utilization(), 50);
}
