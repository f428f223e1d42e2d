//! GROQ queries against the product dataset.
//!
//! Every query projects documents into the shape `tenantmart_core::Product`
//! deserializes: slugs are flattened, the shop reference is resolved to the
//! tenant slug and the first uploaded image wins over a plain `imageUrl`.

/// Shared projection for product documents.
macro_rules! product_projection {
    () => {
        r#"{
  _id,
  _createdAt,
  name,
  "slug": slug.current,
  price,
  category,
  shopName,
  "shop": shop->slug.current,
  "imageUrl": coalesce(images[0].asset->url, imageUrl),
  description,
  inStock,
  stockQuantity
}"#
    };
}

/// All products, newest first.
pub const ALL_PRODUCTS: &str = concat!(
    r#"*[_type == "product"] | order(_createdAt desc) "#,
    product_projection!()
);

/// Products owned by the tenant whose slug is `$shop`, newest first.
pub const TENANT_PRODUCTS: &str = concat!(
    r#"*[_type == "product" && shop->slug.current == $shop] | order(_createdAt desc) "#,
    product_projection!()
);

/// The product whose slug is `$slug`, or `null`.
pub const PRODUCT_BY_SLUG: &str = concat!(
    r#"*[_type == "product" && slug.current == $slug][0] "#,
    product_projection!()
);

/// The product whose document ID is `$id`, or `null`.
pub const PRODUCT_BY_ID: &str = concat!(
    r#"*[_type == "product" && _id == $id][0] "#,
    product_projection!()
);
