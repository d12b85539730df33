#![cfg_attr(not(doctest), doc = include_str!("../README.md"))]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::{fmt, io::Write};

use anyhow::Context;

pub use k8s_openapi;
pub use kube;

pub mod apis;
pub mod claputil;
pub mod connection;
pub use connection::{ClusterReader, ConnectOptions, Connection, connect, determine_context};
pub mod error;
pub use error::{Error, Result};
pub mod report;
pub mod scheme;
pub use scheme::{Scheme, SchemeError};

use apis::{apiserver::ApiRequestCount, config::Console};
use scheme::gvk_for;

/// Install every type family this crate reads.
///
/// All kinds are registered here, before any [`Connection`] exists.
pub fn build_scheme() -> anyhow::Result<Scheme> {
    let mut scheme = Scheme::new();
    apis::builtin::add_to_scheme(&mut scheme).context("failed to install k8s schemes")?;
    apis::apiserver::add_to_scheme(&mut scheme).context("failed to install apiserver scheme")?;
    apis::config::add_to_scheme(&mut scheme).context("failed to install config scheme")?;
    Ok(scheme)
}

/// The step of [`inspect`] that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Client,
    ListRequestCounts,
    ListConsoles,
    Report,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self {
            Step::Client => "Failed to get client",
            Step::ListRequestCounts => "Failed to get apirequestcounts",
            Step::ListConsoles => "Failed to get console list",
            Step::Report => "Failed to write report",
        };
        f.write_str(prefix)
    }
}

/// A fatal error together with the step it happened in.
///
/// Displays as a single line: the step prefix followed by the error chain.
#[derive(Debug)]
pub struct Failure {
    pub step: Step,
    pub source: anyhow::Error,
}

impl Failure {
    pub fn new(step: Step, source: impl Into<anyhow::Error>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step)?;
        for cause in self.source.chain() {
            write!(f, ": {cause}")?;
            // kube errors already render their own cause.
            if cause.downcast_ref::<kube::Error>().is_some() {
                break;
            }
        }
        Ok(())
    }
}

/// Write `failure` as a single line to `out`.
///
/// A failed write is ignored: the exit code still reports the failure.
pub fn write_failure<W: Write>(out: &mut W, failure: &Failure) {
    let _ = writeln!(out, "{failure}").and_then(|()| out.flush());
}

/// Build the scheme, connect with `options` and run the listing against the cluster.
pub async fn inspect<W: Write>(options: &ConnectOptions, out: &mut W) -> Result<(), Failure> {
    let scheme = build_scheme().map_err(|err| Failure::new(Step::Client, err))?;
    let connection = connect(scheme, options)
        .await
        .map_err(|err| Failure::new(Step::Client, err))?;
    run(&connection, out).await
}

/// List APIRequestCounts, then Consoles, writing the names of each to `out`.
///
/// Stops at the first failure; nothing is written after it.
pub async fn run<R, W>(reader: &R, out: &mut W) -> Result<(), Failure>
where
    R: ClusterReader + ?Sized,
    W: Write,
{
    let request_counts_gvk = gvk_for::<ApiRequestCount>();
    let request_counts = reader
        .list_names(&request_counts_gvk)
        .await
        .map_err(|err| Failure::new(Step::ListRequestCounts, err))?;
    report::report(out, "ApiRequestCounts", &request_counts)
        .map_err(|err| Failure::new(Step::Report, Error::Output(err)))?;

    writeln!(out, "Getting cluster consoles...")
        .map_err(|err| Failure::new(Step::Report, Error::Output(err)))?;

    let consoles_gvk = gvk_for::<Console>();
    let consoles = reader
        .list_names(&consoles_gvk)
        .await
        .map_err(|err| Failure::new(Step::ListConsoles, err))?;
    report::report(out, "Consoles", &consoles)
        .map_err(|err| Failure::new(Step::Report, Error::Output(err)))?;

    Ok(())
}
