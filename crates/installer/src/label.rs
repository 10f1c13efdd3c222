// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure reporting: mark the owning pod with a label.
//!
//! Reporting is best-effort. [`report_failure`] always returns normally; any
//! problem (missing pod identity, no in-cluster credentials, RBAC denial,
//! network fault) is logged and folded into [`LabelOutcome::Skipped`].

use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, Patch, PatchParams};
use kube::Client;
use serde_json::json;

use crate::config::PodRef;
use crate::error::LabelingError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Label applied to the pod when installation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureLabel {
    pub key: String,
    pub value: String,
}

impl Default for FailureLabel {
    fn default() -> Self {
        Self { key: "observable".to_string(), value: "false".to_string() }
    }
}

impl FailureLabel {
    /// Merge-patch body touching only this label.
    pub fn patch(&self) -> serde_json::Value {
        json!({ "metadata": { "labels": { self.key.clone(): self.value.clone() } } })
    }
}

impl std::fmt::Display for FailureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Applies labels to a pod.
#[async_trait]
pub trait PodLabeler: Send + Sync {
    async fn apply(&self, pod: &PodRef, label: &FailureLabel) -> Result<(), LabelingError>;
}

/// Labels pods through the Kubernetes API.
///
/// Without an explicit client, in-cluster credentials are loaded only when a
/// label is applied; the happy path never touches the API server.
#[derive(Clone, Default)]
pub struct KubePodLabeler {
    client: Option<Client>,
}

impl KubePodLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `client` instead of in-cluster credentials.
    pub fn with_client(client: Client) -> Self {
        Self { client: Some(client) }
    }

    fn client(&self) -> Result<Client, LabelingError> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => in_cluster_client(),
        }
    }
}

fn in_cluster_client() -> Result<Client, LabelingError> {
    let mut config =
        kube::Config::incluster().map_err(|e| LabelingError::ClientConfig(e.to_string()))?;
    config.connect_timeout = Some(CONNECT_TIMEOUT);
    config.read_timeout = Some(READ_TIMEOUT);
    Client::try_from(config).map_err(LabelingError::Client)
}

#[async_trait]
impl PodLabeler for KubePodLabeler {
    async fn apply(&self, pod: &PodRef, label: &FailureLabel) -> Result<(), LabelingError> {
        let pods: Api<Pod> = Api::namespaced(self.client()?, &pod.namespace);
        pods.patch(&pod.name, &PatchParams::default(), &Patch::Merge(&label.patch()))
            .await
            .map_err(|source| LabelingError::Patch {
                pod: pod.name.clone(),
                namespace: pod.namespace.clone(),
                source,
            })?;
        Ok(())
    }
}

/// Result of a failure report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelOutcome {
    Labeled,
    /// Reporting was abandoned; the reason has already been logged.
    Skipped(String),
}

/// Label the pod after a failed install. Never fails.
pub async fn report_failure<L: PodLabeler + ?Sized>(
    labeler: &L,
    pod: Option<&PodRef>,
    label: &FailureLabel,
) -> LabelOutcome {
    let result = match pod {
        Some(pod) => labeler.apply(pod, label).await,
        None => Err(LabelingError::MissingPodIdentity),
    };
    match result {
        Ok(()) => {
            if let Some(pod) = pod {
                tracing::info!(pod = %pod.name, namespace = %pod.namespace, %label, "pod labeled");
            }
            LabelOutcome::Labeled
        }
        Err(e) => {
            tracing::error!(%label, error = %e, "failed to label pod");
            LabelOutcome::Skipped(e.to_string())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{FailureLabel, PodLabeler, PodRef};
    use crate::error::LabelingError;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded label attempt
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LabelCall {
        pub pod: PodRef,
        pub label: FailureLabel,
    }

    struct FakeLabelerState {
        reject: bool,
        calls: Vec<LabelCall>,
    }

    /// Fake pod labeler for testing
    #[derive(Clone)]
    pub struct FakePodLabeler {
        inner: Arc<Mutex<FakeLabelerState>>,
    }

    impl Default for FakePodLabeler {
        fn default() -> Self {
            Self { inner: Arc::new(Mutex::new(FakeLabelerState { reject: false, calls: Vec::new() })) }
        }
    }

    impl FakePodLabeler {
        pub fn new() -> Self {
            Self::default()
        }

        /// A labeler whose API calls all fail (after being recorded).
        pub fn rejecting() -> Self {
            let fake = Self::default();
            fake.inner.lock().reject = true;
            fake
        }

        /// Get all recorded label attempts
        pub fn calls(&self) -> Vec<LabelCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl PodLabeler for FakePodLabeler {
        async fn apply(&self, pod: &PodRef, label: &FailureLabel) -> Result<(), LabelingError> {
            let mut inner = self.inner.lock();
            inner.calls.push(LabelCall { pod: pod.clone(), label: label.clone() });
            if inner.reject {
                return Err(LabelingError::ClientConfig("rejected by fake".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePodLabeler, LabelCall};

#[cfg(test)]
#[path = "label_tests.rs"]
mod tests;
