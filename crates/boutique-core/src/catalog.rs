//! The customer catalog: every customer who can show up to a wave.
//!
//! Two-phase lifecycle: register customers on a [`CatalogBuilder`], then
//! `build()` validates and freezes an immutable [`CustomerCatalog`]. The
//! session samples from the frozen catalog; nothing mutates it afterwards.

use crate::customer::{CustomerDef, CustomerKind, Preference};
use crate::id::CustomerId;
use crate::item::{Color, PriceLevel, Shape};
use std::collections::HashMap;

/// Validation errors raised when freezing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two customers registered with the same id.
    #[error("duplicate customer id {0:?}")]
    DuplicateId(CustomerId),

    /// Two customers registered with the same slug.
    #[error("duplicate customer slug '{0}'")]
    DuplicateSlug(String),

    /// A customer was registered with an empty display name.
    #[error("customer '{slug}' has an empty name")]
    EmptyName { slug: String },

    /// A catalog with no customers cannot host a wave.
    #[error("catalog contains no customers")]
    Empty,
}

/// Builder for constructing an immutable [`CustomerCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    customers: Vec<CustomerDef>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer. Validation happens at `build()`.
    pub fn add_customer(&mut self, def: CustomerDef) -> &mut Self {
        self.customers.push(def);
        self
    }

    /// Validate and freeze the catalog.
    pub fn build(self) -> Result<CustomerCatalog, CatalogError> {
        if self.customers.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_id = HashMap::new();
        let mut by_slug = HashMap::new();
        for (index, def) in self.customers.iter().enumerate() {
            if def.name.trim().is_empty() {
                return Err(CatalogError::EmptyName {
                    slug: def.slug.clone(),
                });
            }
            if by_id.insert(def.id, index).is_some() {
                return Err(CatalogError::DuplicateId(def.id));
            }
            if by_slug.insert(def.slug.clone(), index).is_some() {
                return Err(CatalogError::DuplicateSlug(def.slug.clone()));
            }
        }

        Ok(CustomerCatalog {
            customers: self.customers,
            by_id,
            by_slug,
        })
    }
}

/// Immutable customer catalog. Frozen after build(). Safe to share.
#[derive(Debug)]
pub struct CustomerCatalog {
    customers: Vec<CustomerDef>,
    by_id: HashMap<CustomerId, usize>,
    by_slug: HashMap<String, usize>,
}

impl CustomerCatalog {
    pub fn get(&self, id: CustomerId) -> Option<&CustomerDef> {
        self.by_id.get(&id).map(|&i| &self.customers[i])
    }

    pub fn by_slug(&self, slug: &str) -> Option<&CustomerDef> {
        self.by_slug.get(slug).map(|&i| &self.customers[i])
    }

    /// All customers, in registration order.
    pub fn defs(&self) -> &[CustomerDef] {
        &self.customers
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// The builtin roster: Thea's family and the creature regulars.
    pub fn builtin() -> CustomerCatalog {
        fn def(
            id: u32,
            slug: &str,
            name: &str,
            avatar: &str,
            kind: CustomerKind,
            wants: Preference,
        ) -> CustomerDef {
            CustomerDef {
                id: CustomerId(id),
                slug: slug.to_string(),
                name: name.to_string(),
                avatar: avatar.to_string(),
                kind,
                wants,
            }
        }

        fn wants(
            shapes: &[Shape],
            colors: &[Color],
            max_price: PriceLevel,
        ) -> Preference {
            Preference {
                shapes: shapes.to_vec(),
                colors: colors.to_vec(),
                patterns: Vec::new(),
                max_price,
            }
        }

        let mut builder = CatalogBuilder::new();
        builder
            .add_customer(def(
                0,
                "ollie",
                "Ollie",
                "👦",
                CustomerKind::Family,
                wants(&[Shape::Shirt, Shape::Pants], &[], PriceLevel::Two),
            ))
            .add_customer(def(
                1,
                "mommy",
                "Mommy",
                "👩",
                CustomerKind::Family,
                wants(
                    &[Shape::Dress, Shape::Skirt],
                    &[Color::Pink, Color::Purple, Color::Blue],
                    PriceLevel::Three,
                ),
            ))
            .add_customer(def(
                2,
                "daddy",
                "Daddy",
                "👨",
                CustomerKind::Family,
                wants(
                    &[Shape::Shirt, Shape::Pants],
                    &[Color::Blue, Color::Green],
                    PriceLevel::Three,
                ),
            ))
            .add_customer(def(
                3,
                "ba-noi",
                "Bà Nội",
                "👵",
                CustomerKind::Family,
                wants(&[Shape::Dress, Shape::Skirt], &[], PriceLevel::Three),
            ))
            .add_customer(def(
                4,
                "ba-ngoai",
                "Bà Ngoại",
                "🧓",
                CustomerKind::Family,
                wants(&[Shape::Dress, Shape::Skirt], &[], PriceLevel::Three),
            ))
            .add_customer(def(
                5,
                "auntie-thy",
                "Auntie Thy",
                "👩‍🦰",
                CustomerKind::Family,
                wants(
                    &[Shape::Dress, Shape::Skirt],
                    &[Color::Pink, Color::Purple],
                    PriceLevel::Three,
                ),
            ))
            .add_customer(def(
                6,
                "uncle-will",
                "Uncle Will",
                "🧔",
                CustomerKind::Family,
                wants(&[Shape::Shirt, Shape::Pants], &[], PriceLevel::Two),
            ))
            .add_customer(def(
                7,
                "sparkle",
                "Sparkle",
                "🦄",
                CustomerKind::Creature,
                wants(
                    &[],
                    &[Color::Pink, Color::Purple, Color::White],
                    PriceLevel::Three,
                ),
            ))
            .add_customer(def(
                8,
                "blaze",
                "Blaze",
                "🐉",
                CustomerKind::Creature,
                wants(
                    &[],
                    &[Color::Red, Color::Orange, Color::Yellow],
                    PriceLevel::Three,
                ),
            ))
            .add_customer(def(
                9,
                "fluffy",
                "Fluffy",
                "🐰",
                CustomerKind::Creature,
                wants(
                    &[],
                    &[Color::White, Color::Pink, Color::Blue],
                    PriceLevel::Two,
                ),
            ))
            .add_customer(def(
                10,
                "whiskers",
                "Whiskers",
                "🐱",
                CustomerKind::Creature,
                wants(&[Shape::Dress, Shape::Skirt], &[], PriceLevel::Two),
            ))
            .add_customer(def(
                11,
                "honey",
                "Honey",
                "🐻",
                CustomerKind::Creature,
                wants(
                    &[],
                    &[Color::Yellow, Color::Orange, Color::Red],
                    PriceLevel::Two,
                ),
            ));

        // The builtin roster is statically valid.
        builder.build().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_customer(id: u32, slug: &str) -> CustomerDef {
        CustomerDef {
            id: CustomerId(id),
            slug: slug.to_string(),
            name: slug.to_string(),
            avatar: "🙂".to_string(),
            kind: CustomerKind::Friend,
            wants: Preference::anything(PriceLevel::Two),
        }
    }

    // -----------------------------------------------------------------------
    // Builder validation
    // -----------------------------------------------------------------------

    #[test]
    fn build_rejects_empty_catalog() {
        let result = CatalogBuilder::new().build();
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn build_rejects_duplicate_id() {
        let mut b = CatalogBuilder::new();
        b.add_customer(any_customer(1, "a"));
        b.add_customer(any_customer(1, "b"));
        assert!(matches!(
            b.build(),
            Err(CatalogError::DuplicateId(CustomerId(1)))
        ));
    }

    #[test]
    fn build_rejects_duplicate_slug() {
        let mut b = CatalogBuilder::new();
        b.add_customer(any_customer(1, "twin"));
        b.add_customer(any_customer(2, "twin"));
        assert!(matches!(
            b.build(),
            Err(CatalogError::DuplicateSlug(ref s)) if s == "twin"
        ));
    }

    #[test]
    fn build_rejects_empty_name() {
        let mut nameless = any_customer(1, "ghost");
        nameless.name = "   ".to_string();
        let mut b = CatalogBuilder::new();
        b.add_customer(nameless);
        assert!(matches!(
            b.build(),
            Err(CatalogError::EmptyName { ref slug }) if slug == "ghost"
        ));
    }

    // -----------------------------------------------------------------------
    // Frozen catalog lookups
    // -----------------------------------------------------------------------

    #[test]
    fn lookups_by_id_and_slug() {
        let mut b = CatalogBuilder::new();
        b.add_customer(any_customer(4, "pal"));
        let catalog = b.build().unwrap();

        assert_eq!(catalog.get(CustomerId(4)).unwrap().slug, "pal");
        assert_eq!(catalog.by_slug("pal").unwrap().id, CustomerId(4));
        assert!(catalog.get(CustomerId(99)).is_none());
        assert!(catalog.by_slug("stranger").is_none());
    }

    #[test]
    fn defs_preserve_registration_order() {
        let mut b = CatalogBuilder::new();
        b.add_customer(any_customer(2, "second"));
        b.add_customer(any_customer(1, "first"));
        let catalog = b.build().unwrap();

        assert_eq!(catalog.defs()[0].slug, "second");
        assert_eq!(catalog.defs()[1].slug, "first");
    }

    // -----------------------------------------------------------------------
    // Builtin roster
    // -----------------------------------------------------------------------

    #[test]
    fn builtin_has_twelve_customers() {
        let catalog = CustomerCatalog::builtin();
        assert_eq!(catalog.len(), 12);
    }

    #[test]
    fn builtin_roster_shapes() {
        let catalog = CustomerCatalog::builtin();

        let ollie = catalog.by_slug("ollie").unwrap();
        assert_eq!(ollie.kind, CustomerKind::Family);
        assert_eq!(ollie.wants.max_price, PriceLevel::Two);
        assert_eq!(ollie.wants.shapes, vec![Shape::Shirt, Shape::Pants]);
        assert!(ollie.wants.colors.is_empty());

        let sparkle = catalog.by_slug("sparkle").unwrap();
        assert_eq!(sparkle.kind, CustomerKind::Creature);
        assert!(sparkle.wants.shapes.is_empty());
        assert_eq!(
            sparkle.wants.colors,
            vec![Color::Pink, Color::Purple, Color::White]
        );
    }

    #[test]
    fn builtin_ids_are_dense() {
        let catalog = CustomerCatalog::builtin();
        for (i, def) in catalog.defs().iter().enumerate() {
            assert_eq!(def.id, CustomerId(i as u32));
        }
    }
}
