//! Tests for the local render command

use feed_cli::render;
use std::io::Write;

const PRODUCTS: &str = r#"[
    {
        "id": "sticker",
        "name": "Sticker pack",
        "description": "Five vinyl stickers",
        "url": "https://gumroad.com/l/sticker",
        "thumbnail_url": null,
        "native_type": "physical",
        "price_cents": 450,
        "currency": "eur",
        "requires_shipping": true,
        "max_purchase_count": 100,
        "remaining_for_sale_count": 37,
        "seller": null,
        "published": true
    },
    {
        "id": "wip",
        "name": "Work in progress",
        "description": null,
        "url": "https://gumroad.com/l/wip",
        "thumbnail_url": null,
        "native_type": "course",
        "price_cents": null,
        "currency": null,
        "max_purchase_count": null,
        "remaining_for_sale_count": null,
        "seller": null,
        "published": false
    }
]"#;

fn products_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PRODUCTS.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_render_csv_to_file() {
    let input = products_file();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("feed.csv");

    let summary = render::run(input.path(), "csv", &output).await.unwrap();
    assert_eq!(summary.items, 1);
    assert_eq!(summary.skipped, 1);

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);

    let field = |name: &str| {
        let index = headers.iter().position(|h| h == name).unwrap();
        rows[0][index].to_string()
    };
    assert_eq!(field("id"), "sticker");
    assert_eq!(field("price"), "4.50 EUR");
    assert_eq!(field("weight"), "1 lb");
    assert_eq!(field("inventory_quantity"), "37");
    assert_eq!(field("seller_name"), "Gumroad Creator");
    assert_eq!(std::fs::metadata(&output).unwrap().len() as usize, summary.bytes);
}

#[tokio::test]
async fn test_render_rejects_unknown_format() {
    let input = products_file();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("feed.yaml");

    let err = render::run(input.path(), "yaml", &output).await.unwrap_err();
    assert!(err.to_string().contains("Unsupported feed format"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_unknown_format_fails_before_reading_input() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let output = dir.path().join("feed.yaml");

    let err = render::run(&missing, "yaml", &output).await.unwrap_err();
    assert!(err.to_string().contains("Unsupported feed format"));
    assert!(!output.exists());
}
