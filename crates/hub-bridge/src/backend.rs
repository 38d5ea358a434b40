//! Typed view of the host's `backend` object, the one shape the hub uses.
//!
//! Pinned contract with the current host: object `backend`, properties
//! `engineVersion` / `recentProjects` / `projectTemplates`, methods
//! `CreateProject()` and `OpenProject(index)`.

use std::sync::Arc;

use async_trait::async_trait;
use hub_common::{BridgeError, ProjectEntry};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::proxy::{ObjectProxy, Subscription};
use crate::registry::{Bridge, Registry};

pub const BACKEND_OBJECT: &str = "backend";

pub const ENGINE_VERSION: &str = "engineVersion";
pub const RECENT_PROJECTS: &str = "recentProjects";
pub const PROJECT_TEMPLATES: &str = "projectTemplates";
pub const CREATE_PROJECT: &str = "CreateProject";
pub const OPEN_PROJECT: &str = "OpenProject";

/// What the project hub needs from the host.
#[async_trait]
pub trait ProjectBackend: Send + Sync {
    fn engine_version(&self) -> Option<String>;

    fn recent_projects(&self) -> Vec<ProjectEntry>;

    fn project_templates(&self) -> Vec<ProjectEntry>;

    /// Ask the host to create (and open) a project. The result is ignored.
    async fn create_project(&self) -> Result<(), BridgeError>;

    /// Open the `index`-th entry of `recent_projects`.
    async fn open_project(&self, index: usize) -> Result<(), BridgeError>;
}

/// [`ProjectBackend`] over the bridge proxy for `backend`.
#[derive(Clone, Debug)]
pub struct BackendProxy {
    proxy: Arc<ObjectProxy>,
}

impl BackendProxy {
    pub fn new(proxy: Arc<ObjectProxy>) -> Self {
        Self { proxy }
    }

    pub fn from_registry(registry: &Registry) -> Result<Self, BridgeError> {
        registry
            .lookup(BACKEND_OBJECT)
            .map(Self::new)
            .ok_or_else(|| BridgeError::ObjectNotFound(BACKEND_OBJECT.into()))
    }

    /// Fails with `NotReady` until the bridge has been initialized.
    pub fn from_bridge(bridge: &Bridge) -> Result<Self, BridgeError> {
        bridge
            .lookup(BACKEND_OBJECT)?
            .map(Self::new)
            .ok_or_else(|| BridgeError::ObjectNotFound(BACKEND_OBJECT.into()))
    }

    pub fn proxy(&self) -> &Arc<ObjectProxy> {
        &self.proxy
    }

    pub fn on_recent_projects_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Vec<ProjectEntry>) + Send + Sync + 'static,
    {
        self.proxy
            .subscribe(RECENT_PROJECTS, move |value| handler(decode_entries(RECENT_PROJECTS, value)))
    }

    pub fn on_project_templates_changed<F>(&self, handler: F) -> Subscription
    where
        F: Fn(Vec<ProjectEntry>) + Send + Sync + 'static,
    {
        self.proxy.subscribe(PROJECT_TEMPLATES, move |value| {
            handler(decode_entries(PROJECT_TEMPLATES, value))
        })
    }

    fn entries(&self, property: &str) -> Vec<ProjectEntry> {
        self.proxy
            .get(property)
            .map(|value| decode_entries(property, &value))
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProjectBackend for BackendProxy {
    fn engine_version(&self) -> Option<String> {
        self.proxy.get_as(ENGINE_VERSION)
    }

    fn recent_projects(&self) -> Vec<ProjectEntry> {
        self.entries(RECENT_PROJECTS)
    }

    fn project_templates(&self) -> Vec<ProjectEntry> {
        self.entries(PROJECT_TEMPLATES)
    }

    async fn create_project(&self) -> Result<(), BridgeError> {
        self.proxy.call(CREATE_PROJECT, Vec::new()).await.map(|_| ())
    }

    async fn open_project(&self, index: usize) -> Result<(), BridgeError> {
        self.proxy
            .call(OPEN_PROJECT, vec![json!(index)])
            .await
            .map(|_| ())
    }
}

/// Ill-typed lists read as empty.
fn decode_entries(property: &str, value: &Value) -> Vec<ProjectEntry> {
    match Vec::<ProjectEntry>::deserialize(value) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(property, error = %e, "Host sent an unreadable project list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, ChannelOptions};
    use crate::transport::{HostEndpoint, MemoryTransport};
    use std::path::PathBuf;
    use std::sync::Mutex;

    async fn connect_backend(methods: Value) -> (BackendProxy, HostEndpoint) {
        let (transport, mut host) = MemoryTransport::pair();
        let connecting = tokio::spawn(Channel::connect(transport, ChannelOptions::default()));

        let hello = host.recv().await.unwrap();
        assert_eq!(hello["type"], "handshake");
        host.send(json!({
            "type": "handshake-response",
            "objects": {
                "backend": {
                    "properties": {
                        "engineVersion": "1.0.0",
                        "recentProjects": [{"name": "Demo", "path": "/work/demo"}],
                        "projectTemplates": [
                            {"name": "Empty", "path": "/templates/empty"},
                            {"name": "Third Person", "path": "/templates/tp"}
                        ]
                    },
                    "methods": methods,
                    "signals": []
                }
            }
        }))
        .unwrap();

        let registry = connecting.await.unwrap().unwrap();
        (BackendProxy::from_registry(&registry).unwrap(), host)
    }

    #[tokio::test]
    async fn reads_typed_properties() {
        let (backend, _host) = connect_backend(json!(["CreateProject"])).await;

        assert_eq!(backend.engine_version().as_deref(), Some("1.0.0"));
        assert_eq!(
            backend.recent_projects(),
            vec![ProjectEntry {
                name: "Demo".into(),
                path: PathBuf::from("/work/demo"),
            }]
        );
        let templates = backend.project_templates();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[1].name, "Third Person");
    }

    #[tokio::test]
    async fn create_project_sends_one_invoke() {
        let (backend, mut host) = connect_backend(json!(["CreateProject"])).await;

        let pending = tokio::spawn({
            let backend = backend.clone();
            async move { backend.create_project().await }
        });

        let invoke = host.recv().await.unwrap();
        assert_eq!(invoke["type"], "invoke");
        assert_eq!(invoke["objectName"], "backend");
        assert_eq!(invoke["methodName"], "CreateProject");
        assert_eq!(invoke["args"], json!([]));

        host.send(json!({"type": "response", "id": invoke["id"], "result": null}))
            .unwrap();
        pending.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn open_project_passes_index() {
        let (backend, mut host) = connect_backend(json!(["CreateProject", "OpenProject"])).await;

        let pending = tokio::spawn({
            let backend = backend.clone();
            async move { backend.open_project(3).await }
        });

        let invoke = host.recv().await.unwrap();
        assert_eq!(invoke["methodName"], "OpenProject");
        assert_eq!(invoke["args"], json!([3]));

        host.send(json!({
            "type": "response",
            "id": invoke["id"],
            "error": {"message": "index out of range"}
        }))
        .unwrap();

        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Invocation { ref method, ref message, .. }
                if method == "OpenProject" && message == "index out of range"
        ));
    }

    #[tokio::test]
    async fn open_project_against_host_without_it_fails_fast() {
        let (backend, _host) = connect_backend(json!(["CreateProject"])).await;

        let err = backend.open_project(0).await.unwrap_err();
        assert!(matches!(err, BridgeError::UnknownMethod { .. }));
    }

    #[tokio::test]
    async fn recent_projects_subscription_decodes_entries() {
        let (backend, host) = connect_backend(json!(["CreateProject"])).await;
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let _sub = backend.on_recent_projects_changed(move |entries| {
            let _ = tx.send(entries);
        });

        host.send(json!({
            "type": "property-changed",
            "objectName": "backend",
            "property": "recentProjects",
            "value": [
                {"name": "Demo", "path": "/work/demo"},
                {"name": "Racer", "path": "/work/racer"}
            ]
        }))
        .unwrap();

        let entries = rx.recv().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(backend.recent_projects()[1].name, "Racer");
    }

    #[tokio::test]
    async fn ill_typed_list_reads_as_empty() {
        let (backend, host) = connect_backend(json!(["CreateProject"])).await;
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let (done_tx, mut done_rx) = tokio::sync::mpsc::unbounded_channel();
        let _sub = backend.on_project_templates_changed(move |entries| {
            *sink.lock().unwrap() = Some(entries);
            let _ = done_tx.send(());
        });

        host.send(json!({
            "type": "property-changed",
            "objectName": "backend",
            "property": "projectTemplates",
            "value": "not a list"
        }))
        .unwrap();

        done_rx.recv().await.unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some(&[][..]));
        assert!(backend.project_templates().is_empty());
    }

    #[test]
    fn from_bridge_before_initialize_is_not_ready() {
        let bridge = Bridge::new();
        let err = BackendProxy::from_bridge(&bridge).unwrap_err();
        assert!(matches!(err, BridgeError::NotReady));
    }

    struct FixedBackend;

    #[async_trait]
    impl ProjectBackend for FixedBackend {
        fn engine_version(&self) -> Option<String> {
            Some("0.9.0".into())
        }

        fn recent_projects(&self) -> Vec<ProjectEntry> {
            Vec::new()
        }

        fn project_templates(&self) -> Vec<ProjectEntry> {
            Vec::new()
        }

        async fn create_project(&self) -> Result<(), BridgeError> {
            Ok(())
        }

        async fn open_project(&self, _index: usize) -> Result<(), BridgeError> {
            Err(BridgeError::NotReady)
        }
    }

    #[tokio::test]
    async fn trait_objects_are_usable() {
        let backend: Box<dyn ProjectBackend> = Box::new(FixedBackend);
        assert_eq!(backend.engine_version().as_deref(), Some("0.9.0"));
        assert!(backend.create_project().await.is_ok());
        assert!(backend.open_project(0).await.is_err());
    }
}
