//! Service registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::routing::ServiceCall;
use crate::services::{Service, ServiceContext, ServiceError, SiteService};

/// Maps service names to their handlers. Populated once at startup.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: HashMap<String, Arc<dyn Service>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `site` service.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        // SiteService's name is a constant alphanumeric string
        let _ = registry.register(Arc::new(SiteService));
        registry
    }

    /// Add a service, replacing any previous handler with the same name.
    pub fn register(&mut self, service: Arc<dyn Service>) -> Result<(), ServiceError> {
        let name = service.name().to_lowercase();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ServiceError::InvalidName(name));
        }
        if self.services.insert(name.clone(), service).is_some() {
            tracing::warn!(service = %name, "Service handler replaced");
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Service>> {
        self.services.get(name)
    }

    /// Registered service names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.services.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Route a forwarded call to its handler.
    pub fn dispatch(
        &self,
        call: &ServiceCall,
        ctx: &ServiceContext<'_>,
    ) -> Result<Option<Value>, ServiceError> {
        let service = self
            .get(&call.service)
            .ok_or_else(|| ServiceError::UnknownService(call.service.clone()))?;

        let method = service
            .methods()
            .iter()
            .find(|m| m.eq_ignore_ascii_case(&call.method))
            .ok_or_else(|| ServiceError::UnknownMethod {
                service: call.service.clone(),
                method: call.method.clone(),
            })?;

        service.call(method, call.extra.as_deref(), ctx)
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .finish()
    }
}
