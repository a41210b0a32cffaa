//! In-memory mock of the extension API port

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dynext_core::ExtensionApi;
use dynext_domain::{
    CreatedExtension, DynextError, ExtensionId, ExtensionListPage, ExtensionSummary,
    Result as DomainResult,
};
use tokio_util::sync::CancellationToken;

/// Remote call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { page_size: u32, page_key: Option<String> },
    Create { payload: String },
    Get { id: String },
    Delete { id: String },
}

#[derive(Default)]
struct State {
    stored: BTreeMap<String, (String, String)>,
    next_id: usize,
    calls: Vec<Call>,
    create_failures: VecDeque<DynextError>,
    get_failures: VecDeque<DynextError>,
    delete_failures: VecDeque<DynextError>,
}

/// In-memory platform: ids are assigned as `custom.ext.<n>`, names as
/// `extension-<n>`.
#[derive(Clone, Default)]
pub struct MockExtensionApi {
    state: Arc<Mutex<State>>,
}

impl MockExtensionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an extension as if created out of band.
    pub fn with_extension(self, id: &str, name: &str, payload: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .stored
            .insert(id.to_string(), (name.to_string(), payload.to_string()));
        self
    }

    pub fn fail_next_create(&self, err: DynextError) {
        self.state.lock().unwrap().create_failures.push_back(err);
    }

    pub fn fail_next_get(&self, err: DynextError) {
        self.state.lock().unwrap().get_failures.push_back(err);
    }

    pub fn fail_next_delete(&self, err: DynextError) {
        self.state.lock().unwrap().delete_failures.push_back(err);
    }

    /// Change the stored payload behind the controller's back.
    pub fn set_remote_payload(&self, id: &str, payload: &str) {
        if let Some(entry) = self.state.lock().unwrap().stored.get_mut(id) {
            entry.1 = payload.to_string();
        }
    }

    pub fn remove_remote(&self, id: &str) {
        self.state.lock().unwrap().stored.remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().unwrap().stored.contains_key(id)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }
}

fn not_found(id: &str) -> DynextError {
    DynextError::NotFound { status: 404, body: format!("extension {id} not found") }
}

#[async_trait]
impl ExtensionApi for MockExtensionApi {
    async fn list_extensions(
        &self,
        page_size: u32,
        page_key: Option<&str>,
        _cancel: &CancellationToken,
    ) -> DomainResult<ExtensionListPage> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List { page_size, page_key: page_key.map(str::to_string) });

        let offset: usize = page_key.and_then(|key| key.parse().ok()).unwrap_or(0);
        let all: Vec<ExtensionSummary> = state
            .stored
            .iter()
            .map(|(id, (name, _))| ExtensionSummary {
                id: ExtensionId::new(id.clone()),
                name: name.clone(),
                extension_type: "JMX".into(),
            })
            .collect();
        let end = (offset + page_size as usize).min(all.len());
        let next = (end < all.len()).then(|| end.to_string());

        Ok(ExtensionListPage::new(all[offset..end].to_vec(), all.len() as u64, next))
    }

    async fn create_extension(
        &self,
        payload: &str,
        _cancel: &CancellationToken,
    ) -> DomainResult<CreatedExtension> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create { payload: payload.to_string() });
        if let Some(err) = state.create_failures.pop_front() {
            return Err(err);
        }

        state.next_id += 1;
        let id = format!("custom.ext.{}", state.next_id);
        let name = format!("extension-{}", state.next_id);
        state.stored.insert(id.clone(), (name.clone(), payload.to_string()));

        Ok(CreatedExtension { id: ExtensionId::new(id), name })
    }

    async fn get_extension_binary(
        &self,
        id: &ExtensionId,
        _cancel: &CancellationToken,
    ) -> DomainResult<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Get { id: id.to_string() });
        if let Some(err) = state.get_failures.pop_front() {
            return Err(err);
        }

        state
            .stored
            .get(id.as_str())
            .map(|(_, payload)| payload.clone())
            .ok_or_else(|| not_found(id.as_str()))
    }

    async fn delete_extension(
        &self,
        id: &ExtensionId,
        _cancel: &CancellationToken,
    ) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete { id: id.to_string() });
        if let Some(err) = state.delete_failures.pop_front() {
            return Err(err);
        }

        state.stored.remove(id.as_str()).map(|_| ()).ok_or_else(|| not_found(id.as_str()))
    }
}
