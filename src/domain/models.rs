use serde::{Deserialize, Serialize};

/// Optional feature labels attached to a menu item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyFeatures {
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub allergens: Option<Vec<String>>,
}

/// A single record of the `menu_items` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub key_features: Option<KeyFeatures>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl MenuItem {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            category_id: None,
            price: None,
            image_url: None,
            key_features: None,
            is_active: true,
        }
    }

    /// Price, if present and usable. Negative or non-finite prices count as absent.
    pub fn price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p >= 0.0)
    }

    /// Image reference, falling back to a placeholder seeded by the item id.
    pub fn image_ref(&self) -> String {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => format!("https://picsum.photos/seed/{}/400/500", self.id),
        }
    }

    pub fn ingredients(&self) -> &[String] {
        self.key_features
            .as_ref()
            .and_then(|f| f.ingredients.as_deref())
            .unwrap_or(&[])
    }

    pub fn allergens(&self) -> &[String] {
        self.key_features
            .as_ref()
            .and_then(|f| f.allergens.as_deref())
            .unwrap_or(&[])
    }
}
