//! Keys under which engine state is persisted.

use std::fmt;

/// Persisted document keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    /// Admin-edited catalog, overriding the bundled seed.
    MenuDataCustom,
    Cart,
    Favorites,
    OrderStats,
}

impl StoreKey {
    /// Returns the key string used in the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::MenuDataCustom => "menuDataCustom",
            StoreKey::Cart => "cart",
            StoreKey::Favorites => "favorites",
            StoreKey::OrderStats => "orderStats",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
