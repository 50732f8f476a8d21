//! Serde data file structs for customer catalog content.
//!
//! These structs define the on-disk format for customer rows. They are
//! deserialized from RON, JSON, or TOML data files and then resolved into
//! engine types by the loader.

use boutique_core::customer::{CustomerDef, CustomerKind, Preference};
use boutique_core::id::CustomerId;
use boutique_core::item::{Color, Pattern, PriceLevel, Shape};
use serde::Deserialize;

/// A customer definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRow {
    pub id: u32,
    pub slug: String,
    pub name: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    pub kind: CustomerKind,
    #[serde(default)]
    pub wants: PreferenceRow,
}

fn default_avatar() -> String {
    "🙂".to_string()
}

/// A customer's shopping preference in a data file. An omitted attribute
/// list means no constraint on that attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct PreferenceRow {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default = "default_max_price")]
    pub max_price: PriceLevel,
}

fn default_max_price() -> PriceLevel {
    PriceLevel::Three
}

impl Default for PreferenceRow {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            colors: Vec::new(),
            patterns: Vec::new(),
            max_price: default_max_price(),
        }
    }
}

impl CustomerRow {
    /// Convert the on-disk row into an engine definition.
    pub fn resolve(self) -> CustomerDef {
        CustomerDef {
            id: CustomerId(self.id),
            slug: self.slug,
            name: self.name,
            avatar: self.avatar,
            kind: self.kind,
            wants: Preference {
                shapes: self.wants.shapes,
                colors: self.wants.colors,
                patterns: self.wants.patterns,
                max_price: self.wants.max_price,
            },
        }
    }
}

/// Wrapper for TOML files, which hold the rows under a top-level `customers`
/// key.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlCustomers {
    pub customers: Vec<CustomerRow>,
}
