use crate::id::ResourceId;
use std::collections::HashMap;

/// Name of the resource every fuel cell produces.
pub const ELECTRIC_CHARGE: &str = "ElectricCharge";

/// A resource type definition in the registry.
#[derive(Debug, Clone)]
pub struct ResourceDef {
    pub name: String,
}

/// Builder for constructing an immutable [`ResourceRegistry`].
///
/// `ElectricCharge` is always registered first and therefore always has
/// `ResourceId(0)`.
#[derive(Debug)]
pub struct RegistryBuilder {
    resources: Vec<ResourceDef>,
    name_to_id: HashMap<String, ResourceId>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            resources: Vec::new(),
            name_to_id: HashMap::new(),
        };
        builder.register_resource(ELECTRIC_CHARGE);
        builder
    }

    /// Register a resource type. Registering an existing name returns the
    /// id it already has.
    pub fn register_resource(&mut self, name: &str) -> ResourceId {
        if let Some(id) = self.name_to_id.get(name) {
            return *id;
        }
        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(ResourceDef {
            name: name.to_string(),
        });
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Lookup resource ID by name.
    pub fn resource_id(&self, name: &str) -> Option<ResourceId> {
        self.name_to_id.get(name).copied()
    }

    /// Finalize and build the immutable registry.
    pub fn build(self) -> ResourceRegistry {
        ResourceRegistry {
            resources: self.resources,
            name_to_id: self.name_to_id,
        }
    }
}

/// Immutable registry. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct ResourceRegistry {
    resources: Vec<ResourceDef>,
    name_to_id: HashMap<String, ResourceId>,
}

impl ResourceRegistry {
    pub fn get(&self, id: ResourceId) -> Option<&ResourceDef> {
        self.resources.get(id.0 as usize)
    }

    pub fn resource_id(&self, name: &str) -> Option<ResourceId> {
        self.name_to_id.get(name).copied()
    }

    /// Like [`resource_id`](Self::resource_id), but as a `Result`.
    pub fn resolve(&self, name: &str) -> Result<ResourceId, RegistryError> {
        self.resource_id(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Display name for a resource, or `"?"` for an id this registry never issued.
    pub fn name(&self, id: ResourceId) -> &str {
        self.get(id).map(|def| def.name.as_str()).unwrap_or("?")
    }

    /// The id of [`ELECTRIC_CHARGE`].
    pub fn electric_charge(&self) -> ResourceId {
        ResourceId(0)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("resource not found: {0}")]
    NotFound(String),
}
