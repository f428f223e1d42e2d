//! Public catalog pages over the fixture products.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;

use tenantmart_integration_tests::{body_text, get, test_app};

#[tokio::test]
async fn catalog_first_page_lists_newest_nine() {
    let app = test_app();

    let response = get(&app, "/products", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("14 products"));
    assert!(body.contains("Linen Throw Blanket"));
    assert!(body.contains("Cast Iron Skillet"));
    // Tenth product and later are on page two
    assert!(!body.contains("Merino Scarf"));
    assert!(body.contains("Page 1 of 2"));
    assert!(body.contains("Featured"));
}

#[tokio::test]
async fn catalog_second_page_has_remainder_without_featured() {
    let app = test_app();

    let body = body_text(get(&app, "/products?page=2", None).await).await;
    assert!(body.contains("Merino Scarf"));
    assert!(body.contains("Leather Card Holder"));
    assert!(!body.contains("Linen Throw Blanket"));
    assert!(!body.contains("Featured"));
    assert!(body.contains("Page 2 of 2"));
}

#[tokio::test]
async fn catalog_out_of_range_page_is_clamped() {
    let app = test_app();

    let body = body_text(get(&app, "/products?page=40", None).await).await;
    assert!(body.contains("Page 2 of 2"));
    assert!(body.contains("Merino Scarf"));
}

#[tokio::test]
async fn catalog_filters_by_category() {
    let app = test_app();

    let body = body_text(get(&app, "/products?category=Home", None).await).await;
    assert!(body.contains("4 products"));
    assert!(body.contains("Brass Desk Lamp"));
    assert!(body.contains("Beeswax Candle"));
    assert!(!body.contains("Stoneware Mug"));
    assert!(!body.contains("Fountain Pen"));
}

#[tokio::test]
async fn catalog_filters_by_price_interval() {
    let app = test_app();

    let body = body_text(get(&app, "/products?min_price=50&max_price=80", None).await).await;
    assert!(body.contains("3 products"));
    assert!(body.contains("Linen Throw Blanket"));
    assert!(body.contains("Cast Iron Skillet"));
    assert!(body.contains("Fountain Pen"));
    assert!(!body.contains("Brass Desk Lamp"));
}

#[tokio::test]
async fn catalog_sorts_by_price() {
    let app = test_app();

    let body = body_text(get(&app, "/products?sort=price-low", None).await).await;
    // Skip the featured strip, which keeps catalog order
    let body = &body[body.find("result-count").unwrap()..];
    let pen = body.find("Field Notebook").unwrap();
    let candle = body.find("Beeswax Candle").unwrap();
    let mug = body.find("Stoneware Mug").unwrap();
    assert!(pen < candle && candle < mug);
    assert!(!body.contains("Brass Desk Lamp"));
}

#[tokio::test]
async fn catalog_with_no_matches_shows_placeholder() {
    let app = test_app();

    let response = get(&app, "/products?category=Garden", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("0 products"));
    assert!(body.contains("No products found"));
}

#[tokio::test]
async fn malformed_query_values_fall_back_to_defaults() {
    let app = test_app();

    let response = get(&app, "/products?min_price=cheap&sort=random&page=first", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("14 products"));
}

#[tokio::test]
async fn product_detail_is_public() {
    let app = test_app();

    let response = get(&app, "/products/fountain-pen", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Fountain Pen"));
    assert!(body.contains("$75.00"));
    assert!(body.contains("Sold by Example Store"));
    assert!(body.contains("Sign in to buy"));
}

#[tokio::test]
async fn product_detail_by_document_id() {
    let app = test_app();

    let response = get(&app, "/products/product-13", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Fountain Pen"));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let app = test_app();

    let response = get(&app, "/products/no-such-thing", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("that product"));
}
