use std::ffi::OsStr;

use clap::builder::StyledStr;
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use kube::config::Kubeconfig;

/// Create an `ArgValueCompleter` that lists contexts from the active kubeconfig.
///
/// The current context is offered first.
///
/// Limitation: a `--kubeconfig` given on the same command line is not considered.
/// See https://github.com/clap-rs/clap/issues/1910 for more details.
pub fn context_value_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(|input: &OsStr| -> Vec<CompletionCandidate> {
        let kubeconfig = match Kubeconfig::read() {
            Ok(config) => config,
            Err(_) => return Vec::new(),
        };

        let input = input.to_string_lossy();
        context_candidates(&kubeconfig, input.trim())
            .into_iter()
            .map(|(name, cluster)| {
                let candidate = CompletionCandidate::new(name);
                match cluster {
                    Some(cluster) => {
                        candidate.help(Some(StyledStr::from(format!("cluster={cluster}"))))
                    }
                    None => candidate,
                }
            })
            .collect()
    })
}

/// Context names starting with `prefix`, paired with their cluster, current context first.
fn context_candidates(kubeconfig: &Kubeconfig, prefix: &str) -> Vec<(String, Option<String>)> {
    let current = kubeconfig.current_context.as_deref();

    let mut candidates: Vec<(String, Option<String>)> = kubeconfig
        .contexts
        .iter()
        .filter(|named| named.name.starts_with(prefix))
        .map(|named| {
            let cluster = named.context.as_ref().map(|ctx| ctx.cluster.clone());
            (named.name.clone(), cluster)
        })
        .collect();

    // Stable sort keeps kubeconfig order for the rest.
    candidates.sort_by_key(|(name, _)| Some(name.as_str()) != current);
    candidates
}
