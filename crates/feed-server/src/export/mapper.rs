//! Product record to feed item mapping
//!
//! Shared by the scheduled push job and the on-demand feed endpoint. Every
//! nullable input has a fallback, so the only mapping failure is a record
//! without an identifier.

use tracing::debug;

use super::error::ExportError;
use super::models::{FeedItem, NativeType, ProductRecord};

pub const BRAND: &str = "Gumroad";
pub const MARKETPLACE_URL: &str = "https://gumroad.com";
pub const PRIVACY_POLICY_URL: &str = "https://gumroad.com/privacy";
pub const TERMS_URL: &str = "https://gumroad.com/terms";
pub const REFUND_POLICY_URL: &str = "https://gumroad.com/refunds";

pub const UNTITLED_PRODUCT: &str = "Untitled Product";
pub const NO_DESCRIPTION: &str = "No description available";
pub const DEFAULT_SELLER_NAME: &str = "Gumroad Creator";
pub const DEFAULT_CATEGORY: &str = "Products > Digital Products";
pub const DEFAULT_CURRENCY: &str = "usd";

/// Reported when a product has no purchase limit
pub const UNLIMITED_INVENTORY: i64 = 999_999;

/// Days a buyer can ask for a refund when the product's refund policy is on
pub const REFUND_WINDOW_DAYS: u32 = 30;

/// Result of mapping a batch of records
#[derive(Debug, Clone, Default)]
pub struct MappedFeed {
    pub items: Vec<FeedItem>,
    /// Records excluded because they are drafts, unpublished or deleted
    pub skipped: usize,
}

/// Map one record; `Ok(None)` for records that must not be listed
pub fn map_product(product: &ProductRecord) -> Result<Option<FeedItem>, ExportError> {
    if !product.is_listable() {
        return Ok(None);
    }

    if product.id.trim().is_empty() {
        return Err(ExportError::Mapping(format!(
            "product {:?} has no permalink identifier",
            product.name.as_deref().unwrap_or(UNTITLED_PRODUCT)
        )));
    }

    let title = present(&product.name).unwrap_or(UNTITLED_PRODUCT).to_string();
    let description = present(&product.description)
        .or_else(|| present(&product.name))
        .unwrap_or(NO_DESCRIPTION)
        .to_string();

    Ok(Some(FeedItem {
        enable_search: true,
        enable_checkout: true,
        id: product.id.clone(),
        title,
        description,
        link: product.url.clone(),
        image_link: present(&product.thumbnail_url)
            .map(str::to_string)
            .unwrap_or_else(|| default_product_image(&product.native_type)),
        product_category: product_category_for(&product.native_type).to_string(),
        brand: BRAND.to_string(),
        material: material_for(&product.native_type).to_string(),
        weight: weight_for(&product.native_type, product.requires_shipping).to_string(),
        price: format_price(product.price_cents, product.currency.as_deref()),
        availability: availability_for(product.in_preorder).to_string(),
        inventory_quantity: inventory_quantity_for(
            product.max_purchase_count,
            product.remaining_for_sale_count,
        ),
        seller_name: product
            .seller
            .as_ref()
            .and_then(|s| present(&s.name))
            .unwrap_or(DEFAULT_SELLER_NAME)
            .to_string(),
        seller_url: product
            .seller
            .as_ref()
            .map(|s| s.profile_url.clone())
            .unwrap_or_else(|| MARKETPLACE_URL.to_string()),
        seller_privacy_policy: PRIVACY_POLICY_URL.to_string(),
        seller_tos: TERMS_URL.to_string(),
        return_policy: REFUND_POLICY_URL.to_string(),
        return_window: return_window_for(product.refund_policy_enabled),
    }))
}

/// Map records in source order, dropping unlisted ones.
///
/// Stops at the first mapping error so a malformed record fails the run
/// instead of silently producing a partial feed.
pub fn map_products<'a, I>(products: I) -> Result<MappedFeed, ExportError>
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let mut feed = MappedFeed::default();

    for product in products {
        match map_product(product)? {
            Some(item) => feed.items.push(item),
            None => {
                debug!(product_id = %product.id, "Skipping unlisted product");
                feed.skipped += 1;
            },
        }
    }

    Ok(feed)
}

pub fn product_category_for(native_type: &NativeType) -> &'static str {
    match native_type {
        NativeType::Digital => "Media > Digital Products",
        NativeType::Physical => "Products > Physical Goods",
        NativeType::Membership => "Services > Memberships",
        NativeType::Course => "Education > Online Courses",
        NativeType::Ebook => "Media > Books > Ebooks",
        NativeType::Audiobook => "Media > Audiobooks",
        NativeType::Call => "Services > Consultations",
        NativeType::Commission => "Services > Custom Work",
        NativeType::Coffee => "Services > Tips & Donations",
        NativeType::Bundle => "Products > Bundles",
        NativeType::Other(_) => DEFAULT_CATEGORY,
    }
}

pub fn material_for(native_type: &NativeType) -> &'static str {
    if *native_type == NativeType::Physical {
        "Physical"
    } else {
        "Digital"
    }
}

pub fn weight_for(native_type: &NativeType, requires_shipping: bool) -> &'static str {
    if *native_type == NativeType::Physical && requires_shipping {
        "1 lb"
    } else {
        "0 lb"
    }
}

/// `"<units>.<cents> <CURRENCY>"`, always two decimals.
///
/// Works on the integer minor units directly, so no value can lose
/// precision or overflow.
pub fn format_price(price_cents: Option<i64>, currency: Option<&str>) -> String {
    let cents = price_cents.unwrap_or(0);
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    let currency = currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_uppercase();

    format!("{}{}.{:02} {}", sign, magnitude / 100, magnitude % 100, currency)
}

pub fn availability_for(in_preorder: bool) -> &'static str {
    if in_preorder {
        "preorder"
    } else {
        "in_stock"
    }
}

pub fn inventory_quantity_for(max_purchase_count: Option<i64>, remaining: Option<i64>) -> i64 {
    match max_purchase_count {
        Some(_) => remaining.unwrap_or(0),
        None => UNLIMITED_INVENTORY,
    }
}

pub fn return_window_for(refund_policy_enabled: bool) -> u32 {
    if refund_policy_enabled {
        REFUND_WINDOW_DAYS
    } else {
        0
    }
}

pub fn default_product_image(native_type: &NativeType) -> String {
    format!(
        "https://public-files.gumroad.com/variants/{}/thumbnail.png",
        native_type.as_str()
    )
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
