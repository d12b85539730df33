use std::collections::HashMap;

use kube::{
    Resource,
    core::{ApiResource, GroupVersionKind},
};

/// Errors raised while installing kinds into a [`Scheme`].
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    /// The same group/version/kind was already registered with different metadata.
    #[error(
        "kind {}/{}, Kind={} is already registered as {existing} and cannot be re-registered as {requested}",
        .gvk.group, .gvk.version, .gvk.kind
    )]
    Conflict {
        gvk: GroupVersionKind,
        existing: String,
        requested: String,
    },
}

/// Registry from group/version/kind to the [`ApiResource`] needed to
/// address and decode that kind.
///
/// A scheme is filled once by the `add_to_scheme` functions of the type
/// families in [`crate::apis`], then handed over to a
/// [`Connection`](crate::connection::Connection), which only reads it.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    kinds: HashMap<GroupVersionKind, ApiResource>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a statically typed resource.
    pub fn register<K>(&mut self) -> Result<(), SchemeError>
    where
        K: Resource<DynamicType = ()>,
    {
        self.register_resource(ApiResource::erase::<K>(&()))
    }

    /// Register a kind by its [`ApiResource`].
    ///
    /// Registering identical metadata twice is a no-op.
    pub fn register_resource(&mut self, resource: ApiResource) -> Result<(), SchemeError> {
        let gvk = gvk_of(&resource);
        match self.kinds.get(&gvk) {
            Some(existing) if existing == &resource => Ok(()),
            Some(existing) => Err(SchemeError::Conflict {
                gvk,
                existing: existing.plural.clone(),
                requested: resource.plural,
            }),
            None => {
                tracing::trace!(api_version = %resource.api_version, kind = %resource.kind, "registered kind");
                self.kinds.insert(gvk, resource);
                Ok(())
            }
        }
    }

    pub fn lookup(&self, gvk: &GroupVersionKind) -> Option<&ApiResource> {
        self.kinds.get(gvk)
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.kinds.contains_key(gvk)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &GroupVersionKind> {
        self.kinds.keys()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// The group/version/kind identifying a statically typed resource.
pub fn gvk_for<K>() -> GroupVersionKind
where
    K: Resource<DynamicType = ()>,
{
    GroupVersionKind::gvk(&K::group(&()), &K::version(&()), &K::kind(&()))
}

fn gvk_of(resource: &ApiResource) -> GroupVersionKind {
    GroupVersionKind::gvk(&resource.group, &resource.version, &resource.kind)
}
