//! Product-import demo data: a CSV export mapped onto product widget fields.

use crate::error::CatalogError;
use crate::id::FieldId;
use crate::model::{FieldCatalog, FieldDescriptor, Side};
use crate::store::MappingStore;

/// Columns found in `product_catalog_2025.csv`.
pub fn source_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("sku-id", "SKU ID").with_example("1, 2, 3, 4, 5"),
        FieldDescriptor::new("image-url", "Image URL")
            .with_example("https://store.storeimages.cdn-a..."),
        FieldDescriptor::new("title", "Title").with_example("iPhone 15 Pro - Black, iPhone 1..."),
        FieldDescriptor::new("description", "Description")
            .with_example("General features A17 Pro ..."),
        FieldDescriptor::new("retail-price", "Retail Price")
            .with_example("999, 1099, 1399, 1599, 799"),
        FieldDescriptor::new("url", "URL").with_example("https://www.apple.com/iphone-16/"),
        FieldDescriptor::new("color", "Color").with_example("Black Titanium, Natural Titaniu..."),
        FieldDescriptor::new("capacity", "Capacity").with_example("128, 256, 512, 1024"),
        FieldDescriptor::new("display-size", "Display Size").with_example("Color"),
    ]
}

/// Product fields the widgets can consume.
pub fn target_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("id", "ID").required(),
        FieldDescriptor::new("product-name", "Product Name").required(),
        FieldDescriptor::new("product-url", "Product URL").required(),
        FieldDescriptor::new("image", "Image").required(),
        FieldDescriptor::new("description", "Description"),
        FieldDescriptor::new("price", "Price"),
    ]
}

/// Mappings suggested on import.
pub fn default_pairs() -> Vec<(FieldId, FieldId)> {
    [
        ("sku-id", "id"),
        ("title", "product-name"),
        ("url", "product-url"),
    ]
    .into_iter()
    .map(|(s, t)| (FieldId::intern(s), FieldId::intern(t)))
    .collect()
}

/// A store over the demo catalogs with the default mappings applied.
pub fn store() -> Result<MappingStore, CatalogError> {
    let source = FieldCatalog::new(Side::Source, source_fields())?;
    let target = FieldCatalog::new(Side::Target, target_fields())?;
    Ok(MappingStore::with_connections(source, target, &default_pairs()))
}
