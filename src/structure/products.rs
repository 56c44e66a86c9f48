use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::utils::serialize_datetime_as_iso_string;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub unit: String, // "pcs", "kg", "l"
    pub description: Option<String>,
    pub created_at: DateTime,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub description: Option<String>,
    #[serde(serialize_with = "serialize_datetime_as_iso_string")]
    pub created_at: DateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl NewProduct {
    pub fn into_product(self) -> Result<Product, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name is required");
        }
        Ok(Product {
            id: ObjectId::new(),
            name: name.to_string(),
            unit: self.unit.unwrap_or_else(|| "pcs".into()),
            description: self.description.filter(|d| !d.trim().is_empty()),
            created_at: DateTime::now(),
        })
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id.to_hex(),
            name: product.name,
            unit: product.unit,
            description: product.description,
            created_at: product.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let payload = NewProduct { name: "   ".into(), unit: None, description: None };
        assert_eq!(payload.into_product().unwrap_err(), "name is required");
    }

    #[test]
    fn unit_defaults_to_pieces() {
        let payload = NewProduct {
            name: " Life jacket ".into(),
            unit: None,
            description: Some("".into()),
        };
        let product = payload.into_product().unwrap();
        assert_eq!(product.name, "Life jacket");
        assert_eq!(product.unit, "pcs");
        assert_eq!(product.description, None);
    }
}
