use kube::core::GroupVersionKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to get rest config")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("failed to create k8s client")]
    Connect(#[source] kube::Error),

    #[error(
        "no kind is registered for {}/{}, Kind={}",
        .0.group, .0.version, .0.kind
    )]
    NotRegistered(GroupVersionKind),

    #[error("failed to list {kind}")]
    Remote {
        kind: String,
        #[source]
        source: kube::Error,
    },

    #[error("write failed")]
    Output(#[from] std::io::Error),
}
