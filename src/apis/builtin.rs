use k8s_openapi::api::{
    apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet},
    batch::v1::{CronJob, Job},
    core::v1::{
        ConfigMap, Event, Namespace, Node, PersistentVolume, PersistentVolumeClaim, Pod, Secret,
        Service, ServiceAccount,
    },
    rbac::v1::{ClusterRole, ClusterRoleBinding, Role, RoleBinding},
};

use crate::scheme::{Scheme, SchemeError};

/// Register the Kubernetes native kinds shipped with `k8s-openapi`.
pub fn add_to_scheme(scheme: &mut Scheme) -> Result<(), SchemeError> {
    // core/v1
    scheme.register::<Namespace>()?;
    scheme.register::<Node>()?;
    scheme.register::<Pod>()?;
    scheme.register::<Service>()?;
    scheme.register::<ConfigMap>()?;
    scheme.register::<Secret>()?;
    scheme.register::<ServiceAccount>()?;
    scheme.register::<Event>()?;
    scheme.register::<PersistentVolume>()?;
    scheme.register::<PersistentVolumeClaim>()?;
    // apps/v1
    scheme.register::<Deployment>()?;
    scheme.register::<DaemonSet>()?;
    scheme.register::<StatefulSet>()?;
    scheme.register::<ReplicaSet>()?;
    // batch/v1
    scheme.register::<Job>()?;
    scheme.register::<CronJob>()?;
    // rbac.authorization.k8s.io/v1
    scheme.register::<Role>()?;
    scheme.register::<RoleBinding>()?;
    scheme.register::<ClusterRole>()?;
    scheme.register::<ClusterRoleBinding>()?;

    tracing::debug!(kinds = scheme.len(), "installed builtin kinds");
    Ok(())
}
