// Copyright (c) 2024 Botho Foundation

//! Human readable names for identifiers, for logs and debugging output.

use crate::ids::{AccountId, FoundryId, NftId, OutputId, TransactionId};
use parking_lot::RwLock;
use std::{collections::HashMap, fmt};

/// An identifier that can be given an alias.
pub trait Aliasable: fmt::Display {
    /// Bytes the alias is keyed by.
    fn alias_key(&self) -> Vec<u8>;
}

macro_rules! impl_aliasable_bytes {
    ($($name:ty),*) => {
        $(
            impl Aliasable for $name {
                fn alias_key(&self) -> Vec<u8> {
                    self.0.to_vec()
                }
            }
        )*
    };
}

impl_aliasable_bytes!(AccountId, NftId, TransactionId);

impl Aliasable for OutputId {
    fn alias_key(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl Aliasable for FoundryId {
    fn alias_key(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

/// Maps identifiers to aliases. Owned by the caller and safe to share
/// between threads.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    aliases: RwLock<HashMap<Vec<u8>, String>>,
}

impl AliasRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name `id`, replacing any previous alias.
    pub fn register(&self, id: &impl Aliasable, alias: impl Into<String>) {
        self.aliases.write().insert(id.alias_key(), alias.into());
    }

    /// Forget the alias of `id`.
    pub fn unregister(&self, id: &impl Aliasable) -> Option<String> {
        self.aliases.write().remove(&id.alias_key())
    }

    /// The alias of `id`, or its hex form when it has none.
    pub fn alias_of(&self, id: &impl Aliasable) -> String {
        self.aliases
            .read()
            .get(&id.alias_key())
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// Forget all aliases.
    pub fn clear(&self) {
        self.aliases.write().clear();
    }

    /// Number of registered aliases.
    pub fn len(&self) -> usize {
        self.aliases.read().len()
    }

    /// Whether no aliases are registered.
    pub fn is_empty(&self) -> bool {
        self.aliases.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread};

    #[test]
    fn test_alias_falls_back_to_hex() {
        let registry = AliasRegistry::new();
        let id = AccountId([1u8; 32]);
        assert_eq!(registry.alias_of(&id), id.to_string());
        registry.register(&id, "treasury");
        assert_eq!(registry.alias_of(&id), "treasury");
        assert_eq!(registry.unregister(&id).as_deref(), Some("treasury"));
        assert_eq!(registry.alias_of(&id), id.to_string());
    }

    #[test]
    fn test_concurrent_registration() {
        let registry = Arc::new(AliasRegistry::new());
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || registry.register(&NftId([i; 32]), format!("nft-{i}")))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.alias_of(&NftId([2; 32])), "nft-2");
        registry.clear();
        assert!(registry.is_empty());
    }
}
