//! Shared metadata shape for vocabulary registries.
//!
//! Every registry entry has a stable `id`, a canonical spelling, optional aliases, and a short
//! description. Registries that need extra per-item data wrap [`ItemInfo`] in their own info type.
//!
//! ## Notes
//! - `ItemInfo` is `Copy` so registries can live in `const` tables.

/// Registry entry metadata.
///
/// ## Examples
/// ```rust
/// use bamboo_core::vocab::registry::ItemInfo;
///
/// let item = ItemInfo { id: 7u8, canonical: "seven", aliases: &["7"], description: "A number." };
/// assert!(item.matches("7"));
/// assert!(item.matches("seven"));
/// assert!(!item.matches("eight"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ItemInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl<Id> ItemInfo<Id> {
    /// Check whether `name` is the canonical spelling or one of the aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.canonical == name || self.aliases.contains(&name)
    }
}
