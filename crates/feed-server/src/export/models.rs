//! Product records consumed by the export and the feed items it produces

use serde::{Deserialize, Serialize};

/// Business category classifier of a product
///
/// Unknown values are kept verbatim so the placeholder image URL can still
/// be built from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NativeType {
    Digital,
    Physical,
    Membership,
    Course,
    Ebook,
    Audiobook,
    Call,
    Commission,
    Coffee,
    Bundle,
    Other(String),
}

impl NativeType {
    pub fn as_str(&self) -> &str {
        match self {
            NativeType::Digital => "digital",
            NativeType::Physical => "physical",
            NativeType::Membership => "membership",
            NativeType::Course => "course",
            NativeType::Ebook => "ebook",
            NativeType::Audiobook => "audiobook",
            NativeType::Call => "call",
            NativeType::Commission => "commission",
            NativeType::Coffee => "coffee",
            NativeType::Bundle => "bundle",
            NativeType::Other(raw) => raw,
        }
    }
}

impl From<&str> for NativeType {
    fn from(value: &str) -> Self {
        match value {
            "digital" => NativeType::Digital,
            "physical" => NativeType::Physical,
            "membership" => NativeType::Membership,
            "course" => NativeType::Course,
            "ebook" => NativeType::Ebook,
            "audiobook" => NativeType::Audiobook,
            "call" => NativeType::Call,
            "commission" => NativeType::Commission,
            "coffee" => NativeType::Coffee,
            "bundle" => NativeType::Bundle,
            other => NativeType::Other(other.to_string()),
        }
    }
}

impl From<String> for NativeType {
    fn from(value: String) -> Self {
        NativeType::from(value.as_str())
    }
}

impl From<NativeType> for String {
    fn from(value: NativeType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for NativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub name: Option<String>,
    pub profile_url: String,
}

/// Read-only snapshot of one catalog product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Public permalink identifier
    pub id: String,
    pub name: Option<String>,
    /// Plain-text description
    pub description: Option<String>,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub native_type: NativeType,
    /// Price in minor currency units
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub requires_shipping: bool,
    #[serde(default)]
    pub in_preorder: bool,
    pub max_purchase_count: Option<i64>,
    pub remaining_for_sale_count: Option<i64>,
    #[serde(default)]
    pub refund_policy_enabled: bool,
    pub seller: Option<Seller>,
    pub published: bool,
    #[serde(default)]
    pub draft: bool,
    #[serde(default = "default_alive")]
    pub alive: bool,
}

fn default_alive() -> bool {
    true
}

impl ProductRecord {
    /// Whether the record belongs in a public feed at all
    pub fn is_listable(&self) -> bool {
        self.alive && self.published && !self.draft
    }
}

/// One normalized entry of the product feed
///
/// Field order is the order used by the JSON and XML renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub enable_search: bool,
    pub enable_checkout: bool,
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub image_link: String,
    pub product_category: String,
    pub brand: String,
    pub material: String,
    pub weight: String,
    pub price: String,
    pub availability: String,
    pub inventory_quantity: i64,
    pub seller_name: String,
    pub seller_url: String,
    pub seller_privacy_policy: String,
    pub seller_tos: String,
    pub return_policy: String,
    pub return_window: u32,
}

/// Column order of the tabular renderings
pub const FEED_COLUMNS: [&str; 20] = [
    "id",
    "title",
    "description",
    "link",
    "image_link",
    "product_category",
    "brand",
    "material",
    "weight",
    "price",
    "availability",
    "inventory_quantity",
    "seller_name",
    "seller_url",
    "seller_privacy_policy",
    "seller_tos",
    "return_policy",
    "return_window",
    "enable_search",
    "enable_checkout",
];

impl FeedItem {
    /// Field values in [`FEED_COLUMNS`] order
    pub fn row(&self) -> [String; 20] {
        [
            self.id.clone(),
            self.title.clone(),
            self.description.clone(),
            self.link.clone(),
            self.image_link.clone(),
            self.product_category.clone(),
            self.brand.clone(),
            self.material.clone(),
            self.weight.clone(),
            self.price.clone(),
            self.availability.clone(),
            self.inventory_quantity.to_string(),
            self.seller_name.clone(),
            self.seller_url.clone(),
            self.seller_privacy_policy.clone(),
            self.seller_tos.clone(),
            self.return_policy.clone(),
            self.return_window.to_string(),
            self.enable_search.to_string(),
            self.enable_checkout.to_string(),
        ]
    }

    /// (tag, text) pairs in struct order, as written to XML
    pub fn xml_fields(&self) -> [(&'static str, String); 20] {
        [
            ("enable_search", self.enable_search.to_string()),
            ("enable_checkout", self.enable_checkout.to_string()),
            ("id", self.id.clone()),
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("link", self.link.clone()),
            ("image_link", self.image_link.clone()),
            ("product_category", self.product_category.clone()),
            ("brand", self.brand.clone()),
            ("material", self.material.clone()),
            ("weight", self.weight.clone()),
            ("price", self.price.clone()),
            ("availability", self.availability.clone()),
            ("inventory_quantity", self.inventory_quantity.to_string()),
            ("seller_name", self.seller_name.clone()),
            ("seller_url", self.seller_url.clone()),
            ("seller_privacy_policy", self.seller_privacy_policy.clone()),
            ("seller_tos", self.seller_tos.clone()),
            ("return_policy", self.return_policy.clone()),
            ("return_window", self.return_window.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_type_round_trips_unknown_values() {
        assert_eq!(NativeType::from("physical"), NativeType::Physical);
        let other = NativeType::from("podcast");
        assert_eq!(other, NativeType::Other("podcast".to_string()));
        assert_eq!(other.as_str(), "podcast");
    }

    #[test]
    fn test_native_type_serde_as_plain_string() {
        let json = serde_json::to_string(&NativeType::Ebook).unwrap();
        assert_eq!(json, "\"ebook\"");
        let parsed: NativeType = serde_json::from_str("\"bundle\"").unwrap();
        assert_eq!(parsed, NativeType::Bundle);
    }

    #[test]
    fn test_record_defaults_from_json() {
        let record: ProductRecord = serde_json::from_str(
            r#"{
                "id": "abc",
                "name": "Sample",
                "description": null,
                "url": "https://example.com/l/abc",
                "thumbnail_url": null,
                "native_type": "digital",
                "price_cents": 500,
                "currency": "usd",
                "max_purchase_count": null,
                "remaining_for_sale_count": null,
                "seller": null,
                "published": true
            }"#,
        )
        .unwrap();

        assert!(record.alive);
        assert!(!record.draft);
        assert!(record.is_listable());
    }

    #[test]
    fn test_draft_or_unpublished_not_listable() {
        let mut record: ProductRecord = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "name": null,
            "description": null,
            "url": "https://example.com/l/abc",
            "thumbnail_url": null,
            "native_type": "digital",
            "price_cents": null,
            "currency": null,
            "max_purchase_count": null,
            "remaining_for_sale_count": null,
            "seller": null,
            "published": true,
            "draft": true
        }))
        .unwrap();
        assert!(!record.is_listable());

        record.draft = false;
        record.published = false;
        assert!(!record.is_listable());
    }
}
