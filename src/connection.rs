use std::path::PathBuf;

use futures::future::{BoxFuture, FutureExt};
use kube::{
    Api, Client, Config, ResourceExt,
    api::{DynamicObject, ListParams},
    config::{KubeConfigOptions, Kubeconfig},
    core::GroupVersionKind,
};

use crate::{
    error::{Error, Result},
    scheme::Scheme,
};

/// Where to look for connection configuration.
///
/// With nothing set, configuration is inferred the usual way:
/// `KUBECONFIG`, then `~/.kube/config`, then the in-cluster service account.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Read this kubeconfig file instead of the default one.
    pub kubeconfig: Option<PathBuf>,
    /// Use this context instead of the kubeconfig's `current-context`.
    pub context: Option<String>,
}

/// Detects the Kubernetes context the connection will use.
///
/// Context determination follows this priority:
/// 1. Uses the context if explicitly specified.
/// 2. Retrieves the current context from the selected kubeconfig file.
///
/// Returns `None` when no kubeconfig can be read, e.g. when running in-cluster.
pub fn determine_context(options: &ConnectOptions) -> Option<String> {
    if let Some(context) = &options.context {
        return Some(context.clone());
    }

    let kubeconfig = match &options.kubeconfig {
        Some(path) => Kubeconfig::read_from(path),
        None => Kubeconfig::read(),
    };
    kubeconfig.ok()?.current_context
}

/// Resolve configuration and build a [`Connection`] bound to `scheme`.
///
/// The scheme is moved into the connection, so every kind must be
/// installed before calling this.
pub async fn connect(scheme: Scheme, options: &ConnectOptions) -> Result<Connection> {
    let config = resolve_config(options).await?;
    tracing::debug!(
        cluster_url = %config.cluster_url,
        context = ?determine_context(options),
        "resolved cluster config"
    );

    let client = Client::try_from(config).map_err(Error::Connect)?;
    Ok(Connection::new(client, scheme))
}

async fn resolve_config(options: &ConnectOptions) -> Result<Config> {
    let kube_options = KubeConfigOptions {
        context: options.context.clone(),
        ..Default::default()
    };

    match &options.kubeconfig {
        Some(path) => {
            let kubeconfig =
                Kubeconfig::read_from(path).map_err(|err| Error::Config(err.into()))?;
            Config::from_custom_kubeconfig(kubeconfig, &kube_options)
                .await
                .map_err(|err| Error::Config(err.into()))
        }
        None if options.context.is_some() => Config::from_kubeconfig(&kube_options)
            .await
            .map_err(|err| Error::Config(err.into())),
        None => Config::infer()
            .await
            .map_err(|err| Error::Config(err.into())),
    }
}

/// Read access to the names of all objects of a kind.
///
/// [`Connection`] is the real implementation; the workflow in
/// [`crate::run`] only depends on this trait.
pub trait ClusterReader {
    /// Issue one unfiltered list request for `gvk` and return object names in server order.
    fn list_names<'a>(&'a self, gvk: &'a GroupVersionKind) -> BoxFuture<'a, Result<Vec<String>>>;
}

/// A client bound to a finished [`Scheme`].
#[derive(Clone)]
pub struct Connection {
    client: Client,
    scheme: Scheme,
}

impl Connection {
    pub fn new(client: Client, scheme: Scheme) -> Self {
        Self { client, scheme }
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }
}

impl ClusterReader for Connection {
    fn list_names<'a>(&'a self, gvk: &'a GroupVersionKind) -> BoxFuture<'a, Result<Vec<String>>> {
        async move {
            let resource = self
                .scheme
                .lookup(gvk)
                .ok_or_else(|| Error::NotRegistered(gvk.clone()))?;

            tracing::debug!(kind = %gvk.kind, "listing objects");
            let api: Api<DynamicObject> = Api::all_with(self.client.clone(), resource);
            let list = api
                .list(&ListParams::default())
                .await
                .map_err(|source| Error::Remote {
                    kind: qualified_plural(&resource.plural, &resource.group),
                    source,
                })?;
            tracing::debug!(kind = %gvk.kind, items = list.items.len(), "listed objects");

            Ok(list.items.iter().map(|item| item.name_any()).collect())
        }
        .boxed()
    }
}

fn qualified_plural(plural: &str, group: &str) -> String {
    if group.is_empty() {
        plural.to_string()
    } else {
        format!("{plural}.{group}")
    }
}

#[cfg(test)]
mod tests {
    use std::{
        convert::Infallible,
        sync::{Arc, Mutex},
    };

    use http::{Request, Response, StatusCode};
    use kube::{Client, Config, client::Body};
    use serde_json::json;

    use crate::{
        Step,
        apis::{apiserver::ApiRequestCount, config::Console},
        build_scheme,
        error::Error,
        run,
        scheme::{Scheme, gvk_for},
    };

    use super::{ClusterReader, ConnectOptions, Connection, connect, determine_context};

    const REQUEST_COUNTS_PATH: &str = "/apis/apiserver.openshift.io/v1/apirequestcounts";
    const CONSOLES_PATH: &str = "/apis/config.openshift.io/v1/consoles";

    type RequestLog = Arc<Mutex<Vec<String>>>;

    fn unreachable_client() -> Client {
        // Nothing listens here; tests must fail before any request is sent.
        let config = Config::new("http://127.0.0.1:9".parse().expect("valid uri"));
        Client::try_from(config).expect("client should build without a server")
    }

    /// A client whose API server lists `b` then `a` as APIRequestCounts and
    /// refuses every other request with 403.
    fn stub_client() -> (Client, RequestLog) {
        let requests = RequestLog::default();
        let log = requests.clone();

        let service = tower::service_fn(move |request: Request<Body>| {
            let path = request.uri().path().to_string();
            log.lock().expect("request log poisoned").push(path.clone());

            async move {
                let (status, body) = if path == REQUEST_COUNTS_PATH {
                    (
                        StatusCode::OK,
                        json!({
                            "apiVersion": "apiserver.openshift.io/v1",
                            "kind": "APIRequestCountList",
                            "metadata": { "resourceVersion": "42" },
                            "items": [
                                {
                                    "apiVersion": "apiserver.openshift.io/v1",
                                    "kind": "APIRequestCount",
                                    "metadata": { "name": "b" },
                                    "status": { "requestCount": 3 }
                                },
                                {
                                    "apiVersion": "apiserver.openshift.io/v1",
                                    "kind": "APIRequestCount",
                                    "metadata": { "name": "a" }
                                }
                            ]
                        }),
                    )
                } else {
                    (
                        StatusCode::FORBIDDEN,
                        json!({
                            "apiVersion": "v1",
                            "kind": "Status",
                            "metadata": {},
                            "status": "Failure",
                            "message": "consoles is forbidden",
                            "reason": "Forbidden",
                            "code": 403
                        }),
                    )
                };

                let body = serde_json::to_vec(&body).expect("fixture serializes");
                let response = Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .expect("valid response");
                Ok::<_, Infallible>(response)
            }
        });

        (Client::new(service, "default"), requests)
    }

    fn requests(log: &RequestLog) -> Vec<String> {
        log.lock().expect("request log poisoned").clone()
    }

    #[tokio::test]
    async fn lists_names_in_server_order() {
        let (client, log) = stub_client();
        let connection = Connection::new(client, build_scheme().expect("scheme"));

        let names = connection
            .list_names(&gvk_for::<ApiRequestCount>())
            .await
            .expect("list should succeed");

        assert_eq!(names, ["b", "a"]);
        assert_eq!(requests(&log), [REQUEST_COUNTS_PATH]);
    }

    #[tokio::test]
    async fn forbidden_console_list_stops_the_run() {
        let (client, log) = stub_client();
        let connection = Connection::new(client, build_scheme().expect("scheme"));
        let mut out = Vec::new();

        let failure = run(&connection, &mut out)
            .await
            .expect_err("console list is forbidden");

        assert_eq!(
            String::from_utf8(out).expect("utf-8"),
            "b\na\nGetting cluster consoles...\n"
        );
        assert_eq!(requests(&log), [REQUEST_COUNTS_PATH, CONSOLES_PATH]);
        assert_eq!(failure.step, Step::ListConsoles);

        let Some(Error::Remote { kind, source }) = failure.source.downcast_ref::<Error>() else {
            panic!("expected a remote error, got {:?}", failure.source);
        };
        assert_eq!(kind, "consoles.config.openshift.io");
        match source {
            kube::Error::Api(response) => assert_eq!(response.code, 403),
            other => panic!("expected api error, got {other:?}"),
        }
        assert_eq!(
            failure.to_string(),
            format!("Failed to get console list: failed to list consoles.config.openshift.io: {source}")
        );
    }

    #[tokio::test]
    async fn list_names_refuses_unregistered_kind() {
        let mut scheme = Scheme::new();
        crate::apis::apiserver::add_to_scheme(&mut scheme).expect("install");
        let connection = Connection::new(unreachable_client(), scheme);

        let err = connection
            .list_names(&gvk_for::<Console>())
            .await
            .expect_err("console kind was never installed");

        assert!(matches!(err, Error::NotRegistered(gvk) if gvk.kind == "Console"));
        assert_eq!(connection.scheme().len(), 1);
    }

    #[tokio::test]
    async fn missing_kubeconfig_is_a_config_error() {
        let options = ConnectOptions {
            kubeconfig: Some("/nonexistent/ocplist/kubeconfig".into()),
            context: None,
        };

        let Err(err) = connect(Scheme::new(), &options).await else {
            panic!("connecting without a kubeconfig must fail");
        };
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "failed to get rest config");
    }

    #[test]
    fn explicit_context_wins() {
        let options = ConnectOptions {
            kubeconfig: Some("/nonexistent/ocplist/kubeconfig".into()),
            context: Some("admin@prod".to_string()),
        };
        assert_eq!(determine_context(&options).as_deref(), Some("admin@prod"));
    }

    #[test]
    fn unreadable_kubeconfig_has_no_context() {
        let options = ConnectOptions {
            kubeconfig: Some("/nonexistent/ocplist/kubeconfig".into()),
            context: None,
        };
        assert_eq!(determine_context(&options), None);
    }
}
