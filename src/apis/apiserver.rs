//! `apiserver.openshift.io/v1`

use std::borrow::Cow;

use kube::{Resource, api::ObjectMeta, core::ClusterResourceScope};
use serde::{Deserialize, Serialize};

use crate::scheme::{Scheme, SchemeError};

pub const GROUP: &str = "apiserver.openshift.io";
pub const VERSION: &str = "v1";

/// Request counts tracked by the API server for one resource,
/// named `<resource>.<version>.<group>`.
///
/// Only the metadata is modelled; spec and status are left to the server.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ApiRequestCount {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

impl Resource for ApiRequestCount {
    type DynamicType = ();
    type Scope = ClusterResourceScope;

    fn kind(_: &()) -> Cow<'_, str> {
        "APIRequestCount".into()
    }

    fn group(_: &()) -> Cow<'_, str> {
        GROUP.into()
    }

    fn version(_: &()) -> Cow<'_, str> {
        VERSION.into()
    }

    fn api_version(_: &()) -> Cow<'_, str> {
        format!("{GROUP}/{VERSION}").into()
    }

    fn plural(_: &()) -> Cow<'_, str> {
        "apirequestcounts".into()
    }

    fn meta(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn meta_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}

pub fn add_to_scheme(scheme: &mut Scheme) -> Result<(), SchemeError> {
    scheme.register::<ApiRequestCount>()?;
    tracing::debug!(group = GROUP, version = VERSION, "installed apiserver kinds");
    Ok(())
}
