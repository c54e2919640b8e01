//! Modification policies and their hierarchical resolution
//!
//! The policy language and its evaluation engine live outside this crate.
//! Here a `Policy` is only an opaque yes/no question over a signature set,
//! and a `PolicyManager` is a path-addressable registry of them that mirrors
//! the group hierarchy of the configuration tree.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

use crate::model::item::PATH_SEPARATOR;
use crate::model::{FlatItem, PolicyReference, SignedData};

/// Why a policy rejected a signature set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("signature set did not satisfy policy: {reason}")]
    Unsatisfied { reason: String },

    #[error("only {found} of {required} required signatures present")]
    NotEnoughSignatures { required: usize, found: usize },
}

/// An evaluable predicate over a set of signatures
pub trait Policy: Send + Sync {
    /// Check the signature set against this policy.
    ///
    /// # Errors
    ///
    /// Returns a `PolicyError` describing why the set is insufficient.
    fn evaluate(&self, signed_data: &[SignedData]) -> Result<(), PolicyError>;
}

/// Hierarchical registry of policies
///
/// The root manager corresponds to the root group of the configuration.
/// `manager(path)` descends by group names below the root.
pub trait PolicyManager: Send + Sync {
    /// Look up a policy by name; slash-separated names address sub-managers.
    fn get_policy(&self, name: &str) -> Option<Arc<dyn Policy>>;

    /// Descend to the sub-manager at `path` (empty path is `self`).
    fn manager(&self, path: &[String]) -> Option<&dyn PolicyManager>;
}

/// Resolve the policy that governs modification of `item`
///
/// - `Absolute(path)`: looked up directly in `root`
/// - `Relative(name)`: looked up in the manager of the item's parent group
///
/// Returns `None` when either the sub-manager or the policy is missing.
pub fn policy_for_item(root: &dyn PolicyManager, item: &FlatItem) -> Option<Arc<dyn Policy>> {
    match item.policy_reference() {
        PolicyReference::Absolute(path) => root.get_policy(&path),
        PolicyReference::Relative(name) => {
            // the root manager stands for the root group, so drop that segment
            let group_path = item.parent_path().get(1..).unwrap_or(&[]);
            root.manager(group_path)?.get_policy(&name)
        }
    }
}

/// In-memory policy manager
///
/// ```
/// use cfgtx_core::policy::{AcceptAllPolicy, PolicyManager, PolicyManagerImpl};
///
/// let root = PolicyManagerImpl::new("Channel")
///     .with_policy("Admins", AcceptAllPolicy)
///     .with_manager(PolicyManagerImpl::new("Orderer").with_policy("Admins", AcceptAllPolicy));
///
/// assert!(root.get_policy("Channel/Orderer/Admins").is_some());
/// assert!(root.get_policy("Orderer/Writers").is_none());
/// ```
#[derive(Clone)]
pub struct PolicyManagerImpl {
    name: String,
    policies: HashMap<String, Arc<dyn Policy>>,
    managers: HashMap<String, PolicyManagerImpl>,
}

impl PolicyManagerImpl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            policies: HashMap::new(),
            managers: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a policy under `name`
    pub fn with_policy(mut self, name: impl Into<String>, policy: impl Policy + 'static) -> Self {
        self.policies.insert(name.into(), Arc::new(policy));
        self
    }

    /// Register a sub-manager under its own name
    pub fn with_manager(mut self, manager: PolicyManagerImpl) -> Self {
        self.managers.insert(manager.name.clone(), manager);
        self
    }

    fn descend<S: AsRef<str>>(&self, segments: &[S]) -> Option<&PolicyManagerImpl> {
        segments.iter().try_fold(self, |current, segment| {
            current.managers.get(segment.as_ref())
        })
    }
}

impl std::fmt::Debug for PolicyManagerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut policies: Vec<_> = self.policies.keys().collect();
        policies.sort();
        f.debug_struct("PolicyManagerImpl")
            .field("name", &self.name)
            .field("policies", &policies)
            .field("managers", &self.managers)
            .finish()
    }
}

impl PolicyManager for PolicyManagerImpl {
    fn get_policy(&self, name: &str) -> Option<Arc<dyn Policy>> {
        let segments: Vec<&str> = name
            .split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();
        let (policy_name, dirs) = segments.split_last()?;

        // absolute names may start with this manager's own name
        let dirs = match dirs.split_first() {
            Some((first, rest)) if *first == self.name => rest,
            _ => dirs,
        };

        self.descend(dirs)?.policies.get(*policy_name).cloned()
    }

    fn manager(&self, path: &[String]) -> Option<&dyn PolicyManager> {
        self.descend(path).map(|m| m as &dyn PolicyManager)
    }
}

/// Always satisfied
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllPolicy;

impl Policy for AcceptAllPolicy {
    fn evaluate(&self, _: &[SignedData]) -> Result<(), PolicyError> {
        Ok(())
    }
}

/// Never satisfied
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllPolicy;

impl Policy for RejectAllPolicy {
    fn evaluate(&self, _: &[SignedData]) -> Result<(), PolicyError> {
        Err(PolicyError::Unsatisfied {
            reason: "RejectAll policy".to_string(),
        })
    }
}

/// Satisfied when at least `required` distinct listed identities signed
#[derive(Debug, Clone, Default)]
pub struct SignedByPolicy {
    required: usize,
    identities: BTreeSet<Vec<u8>>,
}

impl SignedByPolicy {
    pub fn new<I, B>(required: usize, identities: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        Self {
            required,
            identities: identities.into_iter().map(Into::into).collect(),
        }
    }
}

impl Policy for SignedByPolicy {
    fn evaluate(&self, signed_data: &[SignedData]) -> Result<(), PolicyError> {
        let signers: BTreeSet<&Vec<u8>> = signed_data
            .iter()
            .map(|sd| &sd.identity)
            .filter(|id| self.identities.contains(*id))
            .collect();

        if signers.len() >= self.required {
            Ok(())
        } else {
            Err(PolicyError::NotEnoughSignatures {
                required: self.required,
                found: signers.len(),
            })
        }
    }
}
