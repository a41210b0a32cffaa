//! Declarative schema descriptors for the provider, resource and data source

use serde::Serialize;

/// A single string attribute of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
}

impl Attribute {
    fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description, required: false, optional: false, computed: false, sensitive: false }
    }

    pub fn required(name: &'static str, description: &'static str) -> Self {
        Self { required: true, ..Self::new(name, description) }
    }

    pub fn optional(name: &'static str, description: &'static str) -> Self {
        Self { optional: true, ..Self::new(name, description) }
    }

    /// Set by the provider, never by the operator.
    pub fn computed(name: &'static str, description: &'static str) -> Self {
        Self { computed: true, ..Self::new(name, description) }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str, attributes: Vec<Attribute>) -> Self {
        Self { description, attributes }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
