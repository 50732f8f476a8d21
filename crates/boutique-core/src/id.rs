use serde::{Deserialize, Serialize};

/// Identifies a customer in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

/// Identifies a clothing item in the player's inventory.
///
/// Allocated from a per-inventory counter that is persisted with the
/// inventory, so ids never repeat within one save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_equality() {
        let a = CustomerId(0);
        let b = CustomerId(0);
        let c = CustomerId(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn item_id_copy() {
        let a = ItemId(5);
        let b = a;
        assert_eq!(a, b);
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(CustomerId(0), "ollie");
        map.insert(CustomerId(1), "mommy");
        assert_eq!(map[&CustomerId(0)], "ollie");
    }
}
