#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("pod {0} is already attributed")]
    DuplicatePod(String),
    #[error("node {0} is already registered")]
    DuplicateNode(String),
}
