use super::{RemoteLister, RemoteRef, RemoteSpec};
use crate::core::auth::{Authentication, CredentialResolver};
use crate::utils::error::{Result, SweepError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// What a remote's first lookup produced.
#[derive(Debug, Clone)]
enum Listing {
    Refs(Arc<[RemoteRef]>),
    /// The listing failed; later lookups fail without retrying.
    Failed(String),
}

type Slot = Arc<Mutex<Option<Listing>>>;

/// Per-run memo of remote reference listings.
///
/// Each remote identity has its own slot lock, so concurrent first lookups of
/// one remote wait for a single listing while other remotes proceed. A failed
/// lookup is memoized too: the first caller gets the original error and later
/// callers get `RemoteUnreachable`.
pub struct RemoteRefCache {
    resolver: CredentialResolver,
    lister: Arc<dyn RemoteLister>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl RemoteRefCache {
    pub fn new(resolver: CredentialResolver, lister: Arc<dyn RemoteLister>) -> Self {
        Self {
            resolver,
            lister,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, identity: String) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(identity).or_default().clone()
    }

    pub fn list_refs(&self, remote: &RemoteSpec) -> Result<Arc<[RemoteRef]>> {
        let slot = self.slot(remote.identity());
        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);

        match cached.as_ref() {
            Some(Listing::Refs(refs)) => return Ok(Arc::clone(refs)),
            Some(Listing::Failed(message)) => {
                return Err(SweepError::remote_unreachable(
                    remote.name.as_str(),
                    format!("earlier listing failed: {}", message),
                ))
            }
            None => {}
        }

        match self.load(remote) {
            Ok(refs) => {
                let refs: Arc<[RemoteRef]> = refs.into();
                *cached = Some(Listing::Refs(Arc::clone(&refs)));
                Ok(refs)
            }
            Err(e) => {
                *cached = Some(Listing::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    fn load(&self, remote: &RemoteSpec) -> Result<Vec<RemoteRef>> {
        if !self.lister.needs_credentials() {
            let url = remote.url.as_deref().unwrap_or_default();
            return self.lister.list(remote, url, &Authentication::NotRequired);
        }

        let url = remote.url.as_deref().ok_or_else(|| {
            SweepError::invalid_remote_url("", format!("remote '{}' has no URL", remote.name))
        })?;
        let auth = self.resolver.resolve(url)?;
        debug!("Listing references of remote '{}'", remote.name);
        self.lister.list(remote, url, &auth)
    }

    /// Returns the reference whose name equals `path`, or `None` when the
    /// remote does not advertise it.
    pub fn find_ref(&self, remote: &RemoteSpec, path: &str) -> Result<Option<RemoteRef>> {
        let refs = self.list_refs(remote)?;
        Ok(refs.iter().find(|r| r.name == path).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_credential_config;
    use git2::Oid;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    struct CountingLister {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLister {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RemoteLister for CountingLister {
        fn list(
            &self,
            remote: &RemoteSpec,
            _url: &str,
            _auth: &Authentication,
        ) -> Result<Vec<RemoteRef>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // widen the window for racing callers
            thread::sleep(Duration::from_millis(20));
            if self.fail {
                return Err(SweepError::remote_unreachable(
                    remote.name.as_str(),
                    "connection refused",
                ));
            }
            Ok(vec![RemoteRef::new("refs/heads/main", Oid::zero())])
        }
    }

    fn resolver() -> CredentialResolver {
        CredentialResolver::new("/nonexistent-home", "tester", None, default_credential_config())
    }

    fn file_remote(name: &str) -> RemoteSpec {
        RemoteSpec::new(name, Some(format!("/srv/git/{}.git", name)))
    }

    #[test]
    fn test_lists_once_per_remote() {
        let lister = Arc::new(CountingLister::new());
        let cache = RemoteRefCache::new(resolver(), lister.clone());
        let origin = file_remote("origin");

        for _ in 0..5 {
            cache.list_refs(&origin).unwrap();
        }
        assert_eq!(lister.calls(), 1);

        cache.list_refs(&file_remote("upstream")).unwrap();
        assert_eq!(lister.calls(), 2);
    }

    #[test]
    fn test_concurrent_first_access_lists_once() {
        let lister = Arc::new(CountingLister::new());
        let cache = RemoteRefCache::new(resolver(), lister.clone());
        let origin = file_remote("origin");

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    cache.list_refs(&origin).unwrap();
                });
            }
        });

        assert_eq!(lister.calls(), 1);
    }

    #[test]
    fn test_failed_listing_is_not_retried() {
        let lister = Arc::new(CountingLister::failing());
        let cache = RemoteRefCache::new(resolver(), lister.clone());
        let origin = file_remote("origin");

        thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let result = cache.list_refs(&origin);
                    assert!(matches!(result, Err(SweepError::RemoteUnreachable { .. })));
                });
            }
        });
        let later = cache.find_ref(&origin, "refs/heads/main");

        assert!(matches!(later, Err(SweepError::RemoteUnreachable { .. })));
        assert_eq!(lister.calls(), 1);
    }

    #[test]
    fn test_find_ref_exact_match() {
        let lister = Arc::new(CountingLister::new());
        let cache = RemoteRefCache::new(resolver(), lister.clone());
        let origin = file_remote("origin");

        assert!(cache
            .find_ref(&origin, "refs/heads/main")
            .unwrap()
            .is_some());
        assert!(cache.find_ref(&origin, "refs/heads/ma").unwrap().is_none());
        assert!(cache
            .find_ref(&origin, "refs/heads/old-feature")
            .unwrap()
            .is_none());
        assert_eq!(lister.calls(), 1);
    }

    #[test]
    fn test_listing_failure_propagates() {
        let lister = Arc::new(CountingLister::failing());
        let cache = RemoteRefCache::new(resolver(), lister.clone());

        let result = cache.find_ref(&file_remote("origin"), "refs/heads/main");
        assert!(matches!(result, Err(SweepError::RemoteUnreachable { .. })));
    }

    #[test]
    fn test_credential_failure_skips_listing() {
        let lister = Arc::new(CountingLister::new());
        let cache = RemoteRefCache::new(resolver(), lister.clone());
        let remote = RemoteSpec::new("origin", Some("https://example.com/repo.git".to_string()));

        let result = cache.list_refs(&remote);
        assert!(matches!(result, Err(SweepError::ConfigUnavailable { .. })));
        let again = cache.list_refs(&remote);
        assert!(matches!(again, Err(SweepError::RemoteUnreachable { .. })));
        assert_eq!(lister.calls(), 0);
    }

    #[test]
    fn test_remote_without_url() {
        let lister = Arc::new(CountingLister::new());
        let cache = RemoteRefCache::new(resolver(), lister.clone());

        let result = cache.list_refs(&RemoteSpec::new("origin", None));
        assert!(matches!(result, Err(SweepError::InvalidRemoteUrl { .. })));
    }
}
