//! Organization ownership tree

use super::event::loose_long;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An organization and, when it has one, its owning parent
///
/// The configuration service returns the whole ancestor chain nested through
/// `parent`, ending at a root with no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(deserialize_with = "lenient_id")]
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Organization>>,
}

/// Organization ids arrive as integers, integral floats or numeric strings
fn lenient_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    loose_long(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid organization id: {value}")))
}

impl Organization {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            name: None,
            parent: None,
        }
    }

    /// Attach an owning parent
    pub fn with_parent(mut self, parent: Organization) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Iterate from this organization up to the root
    pub fn lineage(&self) -> Lineage<'_> {
        Lineage { next: Some(self) }
    }
}

/// Self-to-root iterator returned by [`Organization::lineage`]
pub struct Lineage<'a> {
    next: Option<&'a Organization>,
}

impl<'a> Iterator for Lineage<'a> {
    type Item = &'a Organization;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
