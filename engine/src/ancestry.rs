//! Ancestry chain traversal.
//!
//! An image's ancestry is the image itself followed by each parent in turn,
//! ending at a root image (no parent). The chain is produced lazily by
//! repeated application of [`ImageProvider::parent`] and has no side effects;
//! stopping early at an already-serialized ancestor is the consumer's
//! decision, which keeps termination and deduplication independently
//! testable.

use layerpack_core::Result;

use crate::provider::ImageProvider;

/// Iterator over an image ID and all of its ancestors, newest first.
pub struct AncestryChain<'a, P: ImageProvider + ?Sized> {
    provider: &'a P,
    start: Option<String>,
    last: Option<String>,
}

impl<'a, P: ImageProvider + ?Sized> AncestryChain<'a, P> {
    /// Start a chain at the given image ID.
    pub fn new(provider: &'a P, start: &str) -> Self {
        Self {
            provider,
            start: Some(start.to_string()),
            last: None,
        }
    }
}

impl<'a, P: ImageProvider + ?Sized> Iterator for AncestryChain<'a, P> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        // The parent of the most recently yielded ID is fetched lazily here,
        // so the consumer can serialize an image before its parent is ever
        // queried.
        let next_id = match self.start.take() {
            Some(id) => id,
            None => {
                let last = self.last.take()?;
                match self.provider.parent(&last) {
                    Ok(Some(parent)) if !parent.is_empty() => parent,
                    Ok(_) => return None,
                    Err(e) => return Some(Err(e)),
                }
            }
        };
        self.last = Some(next_id.clone());
        Some(Ok(next_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerpack_core::PackError;
    use std::collections::HashMap;
    use std::io::Read;

    struct FakeProvider {
        parents: HashMap<String, String>,
        fail_parent_of: Option<String>,
    }

    impl FakeProvider {
        fn new(edges: &[(&str, &str)]) -> Self {
            Self {
                parents: edges
                    .iter()
                    .map(|(child, parent)| (child.to_string(), parent.to_string()))
                    .collect(),
                fail_parent_of: None,
            }
        }
    }

    impl ImageProvider for FakeProvider {
        fn metadata_descriptor(&self, id: &str) -> Result<Vec<u8>> {
            Ok(format!("{{\"id\":\"{id}\"}}").into_bytes())
        }

        fn filesystem_diff(&self, _id: &str) -> Result<Box<dyn Read + '_>> {
            Ok(Box::new(std::io::empty()))
        }

        fn parent(&self, id: &str) -> Result<Option<String>> {
            if self.fail_parent_of.as_deref() == Some(id) {
                return Err(PackError::StoreError(format!("no record for {id}")));
            }
            Ok(self.parents.get(id).cloned())
        }
    }

    fn collect(chain: AncestryChain<'_, FakeProvider>) -> Result<Vec<String>> {
        chain.collect()
    }

    #[test]
    fn test_chain_walks_to_root() {
        let provider = FakeProvider::new(&[("a", "b"), ("b", "c")]);
        let ids = collect(AncestryChain::new(&provider, "a")).unwrap();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_root_image_yields_itself_only() {
        let provider = FakeProvider::new(&[]);
        let ids = collect(AncestryChain::new(&provider, "root")).unwrap();
        assert_eq!(ids, vec!["root"]);
    }

    #[test]
    fn test_empty_parent_marker_ends_chain() {
        // Stores that record roots with an explicit empty parent terminate
        // the same way as those that record no parent at all.
        let provider = FakeProvider::new(&[("a", "")]);
        let ids = collect(AncestryChain::new(&provider, "a")).unwrap();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_chain_is_restartable() {
        let provider = FakeProvider::new(&[("a", "b")]);
        let first = collect(AncestryChain::new(&provider, "a")).unwrap();
        let second = collect(AncestryChain::new(&provider, "a")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parent_failure_surfaces_after_current() {
        let mut provider = FakeProvider::new(&[("a", "b")]);
        provider.fail_parent_of = Some("a".to_string());

        let mut chain = AncestryChain::new(&provider, "a");
        assert_eq!(chain.next().unwrap().unwrap(), "a");
        assert!(chain.next().unwrap().is_err());
        assert!(chain.next().is_none());
    }

    #[test]
    fn test_start_is_yielded_without_provider_calls() {
        // The starting ID may be a raw passthrough reference; yielding it
        // must not require the provider to know it.
        let mut provider = FakeProvider::new(&[]);
        provider.fail_parent_of = Some("bogus".to_string());

        let mut chain = AncestryChain::new(&provider, "bogus");
        assert_eq!(chain.next().unwrap().unwrap(), "bogus");
    }
}
