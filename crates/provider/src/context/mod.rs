//! Provider context - dependency injection container
//!
//! Built once by a successful provider configure and handed to every
//! resource and data source as opaque provider data.

use std::any::Any;
use std::sync::Arc;

use dynext_core::{ExtensionApi, ExtensionService};
use dynext_domain::UpdatePolicy;
use dynext_infra::ExtensionPager;

/// Opaque value the host passes from the provider to resources.
pub type ProviderData = Arc<dyn Any + Send + Sync>;

/// Shared services for one configured provider instance.
pub struct ProviderContext {
    pub extensions: ExtensionService,
    pub pager: ExtensionPager,
}

impl ProviderContext {
    /// Wire the lifecycle service and pager to one API handle.
    pub fn new(api: Arc<dyn ExtensionApi>, update_policy: UpdatePolicy) -> Self {
        let extensions = ExtensionService::new(Arc::clone(&api)).with_update_policy(update_policy);
        let pager = ExtensionPager::new(api);
        Self { extensions, pager }
    }

    /// Wrap into the opaque form handed to resources.
    pub fn into_provider_data(self) -> ProviderData {
        Arc::new(self)
    }
}

/// Recover the context from provider data, `None` if it holds anything else.
pub(crate) fn downcast(data: ProviderData) -> Option<Arc<ProviderContext>> {
    data.downcast::<ProviderContext>().ok()
}
