use serde::{Deserialize, Serialize};

/// One caller-supplied garment or accessory. Every field is optional;
/// duplicates are allowed and input order is preserved.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FashionItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub color: Option<String>,
    pub theme: Option<String>,
    pub description: Option<String>,
}
