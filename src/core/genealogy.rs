//! Organization genealogy resolution

use crate::adapters::traits::ConfigurationLookup;
use crate::domain::{Organization, RequestContext};
use crate::log_lookup_degraded;

/// Resolve the ancestor chain of an organization, self first and root last
///
/// An unknown organization or a failed lookup yields an empty chain.
pub async fn resolve_genealogy(
    lookup: &dyn ConfigurationLookup,
    ctx: &RequestContext,
    organization_id: i64,
) -> Vec<String> {
    match lookup.get_organization_genealogy(ctx, organization_id).await {
        Ok(Some(organization)) => genealogy_of(&organization),
        Ok(None) => {
            tracing::debug!(organization_id, "Organization not found, genealogy is empty");
            Vec::new()
        }
        Err(e) => {
            log_lookup_degraded!(&e, ctx, "genealogy is empty");
            Vec::new()
        }
    }
}

/// Flatten an organization and its parents into an id list
pub fn genealogy_of(organization: &Organization) -> Vec<String> {
    organization
        .lineage()
        .map(|o| o.id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::StaticConfigurationLookup;

    #[tokio::test]
    async fn test_root_organization() {
        let lookup = StaticConfigurationLookup::new().with_organization(Organization::new(10));
        let chain = resolve_genealogy(&lookup, &RequestContext::default(), 10).await;
        assert_eq!(chain, vec!["10"]);
    }

    #[tokio::test]
    async fn test_three_level_chain() {
        let c = Organization::new(3);
        let b = Organization::new(2).with_parent(c);
        let a = Organization::new(1).with_parent(b);
        let lookup = StaticConfigurationLookup::new().with_organization(a);

        let chain = resolve_genealogy(&lookup, &RequestContext::default(), 1).await;
        assert_eq!(chain, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_unknown_organization() {
        let lookup = StaticConfigurationLookup::new();
        let chain = resolve_genealogy(&lookup, &RequestContext::default(), 77).await;
        assert!(chain.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup() {
        let lookup = StaticConfigurationLookup::new()
            .with_organization(Organization::new(5))
            .failing();
        let chain = resolve_genealogy(&lookup, &RequestContext::default(), 5).await;
        assert!(chain.is_empty());
        assert_eq!(lookup.lookups().len(), 1);
    }
}
