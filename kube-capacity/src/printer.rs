use std::io;

use colored::Colorize as _;

use super::*;

const NAME_WIDTH: usize = 25;
const POD_WIDTH: usize = 50;
const VALUE_WIDTH: usize = 25;

const ALL: &str = "*";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PrintOptions {
    pub(crate) show_pods: bool,
    pub(crate) show_util: bool,
    pub(crate) colorize: bool,
}

/// Renders a [`ClusterMetric`] tree as an aligned text table.
#[derive(Debug)]
pub(crate) struct TablePrinter<'a> {
    cluster: &'a ClusterMetric,
    options: PrintOptions,
}

impl<'a> TablePrinter<'a> {
    pub(crate) fn new(cluster: &'a ClusterMetric, options: PrintOptions) -> Self {
        Self { cluster, options }
    }

    pub(crate) fn print(&self, out: &mut impl io::Write) -> io::Result<()> {
        writeln!(out, "{}", self.header())?;

        if self.show_cluster_row() {
            let names = self.names(ALL, ALL, ALL);
            let cluster = self.row(&names, |resource_type| self.cluster.resource(resource_type));
            writeln!(out, "{cluster}")?;
            if self.options.show_pods {
                writeln!(out)?;
            }
        }

        for node in self.cluster.node_metrics().values() {
            let names = self.names(node.name(), ALL, ALL);
            let row = self.row(&names, |resource_type| node.resource(resource_type));
            writeln!(out, "{row}")?;

            if self.options.show_pods {
                for pod in node.pod_metrics().values() {
                    let names = self.names(node.name(), pod.namespace(), pod.name());
                    let row = self.row(&names, |resource_type| pod.resource(resource_type));
                    writeln!(out, "{row}")?;
                }
                writeln!(out)?;
            }
        }

        Ok(())
    }

    #[cfg(test)]
    fn rendered(&self) -> String {
        let mut out = Vec::new();
        self.print(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // The combined and the plain layouts only total a multi-node cluster.
    fn show_cluster_row(&self) -> bool {
        if self.options.show_pods == self.options.show_util {
            self.cluster.node_metrics().len() > 1
        } else {
            true
        }
    }

    fn header(&self) -> String {
        let names = self.names("NODE", "NAMESPACE", "POD");
        let values = ResourceType::ALL
            .into_iter()
            .flat_map(|resource_type| {
                let resource = resource_type.as_str().to_uppercase();
                let mut columns = vec![format!("{resource} REQUESTS"), format!("{resource} LIMITS")];
                if self.options.show_util {
                    columns.push(format!("{resource} UTIL"));
                }
                columns
            })
            .map(|column| (column, Status::Normal))
            .collect::<Vec<_>>();
        self.render(&names, &values)
    }

    fn names<'n>(&self, node: &'n str, namespace: &'n str, pod: &'n str) -> Vec<(&'n str, usize)> {
        if self.options.show_pods {
            vec![(node, NAME_WIDTH), (namespace, NAME_WIDTH), (pod, POD_WIDTH)]
        } else {
            vec![(node, NAME_WIDTH)]
        }
    }

    /// Cells of every resource type, in `ResourceType::ALL` order.
    fn row<'m>(
        &self,
        names: &[(&str, usize)],
        metric: impl Fn(ResourceType) -> &'m ResourceMetric,
    ) -> String {
        let values = ResourceType::ALL
            .into_iter()
            .flat_map(|resource_type| self.cells(metric(resource_type)))
            .map(|cell| (cell.to_string(), cell.status))
            .collect::<Vec<_>>();
        self.render(names, &values)
    }

    fn cells(&self, metric: &ResourceMetric) -> Vec<ResourceCell> {
        let mut cells = vec![metric.request_cell(), metric.limit_cell()];
        if self.options.show_util {
            cells.push(metric.utilization_cell());
        }
        cells
    }

    fn render(&self, names: &[(&str, usize)], values: &[(String, Status)]) -> String {
        names
            .iter()
            .map(|(name, width)| format!("{name:<width$}"))
            .chain(
                values
                    .iter()
                    .map(|(value, status)| self.paint(format!("{value:>VALUE_WIDTH$}"), *status)),
            )
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn paint(&self, text: String, status: Status) -> String {
        if !self.options.colorize {
            return text;
        }
        match status {
            Status::Flagged => text.red().to_string(),
            Status::Normal => text.white().to_string(),
        }
    }
}
