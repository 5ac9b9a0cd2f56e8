//! Reference text for the product-master OData API

/// Product type codes and their meaning
pub const PRODUCT_TYPES: &[(&str, &str)] = &[
    ("FERT", "Finished product"),
    ("HALB", "Semi-finished product"),
    ("ROH", "Raw material"),
    ("HAWA", "Trading goods"),
    ("DIEN", "Service"),
    ("HIBE", "Operating supplies"),
    ("NLAG", "Non-stock material"),
    ("UNBW", "Non-valuated material"),
    ("VERP", "Packaging material"),
];

/// Fields that give a compact overview of a product
pub const RECOMMENDED_SELECT_FIELDS: &[&str] = &[
    "Product",
    "ProductType",
    "ProductGroup",
    "BaseUnit",
    "GrossWeight",
    "NetWeight",
    "WeightUnit",
    "CreationDate",
    "LastChangeDate",
    "Division",
    "IndustrySector",
];

const API_GUIDE: &str = r#"# Product Master API (OData V4)

Read-only access to product master data. Requests use OData V4 query options
and HTTP basic authentication.

## Product ID is not the product name
- `Product` is a technical key such as `TG-17` or `APJ123`. It is not readable text.
- `ProductDescription` holds the readable name, one entry per language,
  e.g. "Cat Food Premium 500g".

Searching `Product` for a word like "cat" only matches IDs, never names.

## Finding products by name (recommended)
Call `search_product_descriptions(search_text, language, top)`:
- `search_text`: text contained in the description ("cat", "battery", ...)
- `language`: two-letter language code, default `EN`
- `top`: maximum number of matches, default 20

It queries the `ProductDescription` entity set directly:
    ProductDescription?$filter=contains(ProductDescription,'cat') and Language eq 'EN'
and returns `Product`, `Language` and `ProductDescription` for each hit. Use the
returned IDs with `query_products` to fetch full records.

## Language codes
EN English, DE German, JA Japanese, FR French, ES Spanish, ZH Chinese, KO Korean.

## Query options for `query_products`
`$filter` works on fields of the Product entity only:
- equality: `Product eq 'TG-17'`
- substring of the ID: `contains(Product,'APJ')`
- prefix of the ID: `startswith(Product,'APJ')`
- combine with `and` / `or`: `ProductType eq 'FERT' and startswith(Product,'APJ')`

The navigation property `_ProductDescription` cannot be filtered.

`$expand=_ProductDescription` attaches every translation of the name:
each entry has `Language` and `ProductDescription`.

`$select=Product,ProductType,ProductGroup,BaseUnit` limits the returned fields.

`$top=20` caps the result size; keep it between 10 and 50.

`$skip=20` skips records for paging.

`$orderby=Product asc` or `$orderby=CreationDate desc` sorts the result.

## Query patterns
1. Browse with names: `expand="_ProductDescription", top=20`
2. ID prefix with names: `filter_expression="startswith(Product,'APJ')", expand="_ProductDescription", top=30`
3. One product in full: `filter_expression="Product eq 'APJ123'", expand="_ProductDescription"`
4. By product type: `filter_expression="ProductType eq 'FERT'", expand="_ProductDescription", top=30`

## Response structure
Every tool result has the shape
    {"success": true, "data": [...], "count": 2, "total_available": 57, "error": null}
`count` is the number of records returned, `total_available` the number of
matches on the server. On failure `success` is false, `data` is empty and
`error` explains what went wrong.

Main Product fields:
- `Product`: technical ID
- `ProductType`: type code, see below
- `ProductGroup`: category code
- `BaseUnit`: unit of measure such as EA, ST, KG, TO

With `$expand=_ProductDescription`:
    "_ProductDescription": [
      {"Language": "EN", "ProductDescription": "Cat Grill Tuna Flavor 130g"},
      {"Language": "DE", "ProductDescription": "Katzen Grill Thunfisch 130g"}
    ]

## Notes
- Search names with `search_product_descriptions` first.
- Always pass `top`; large result sets are slow.
- IDs are usually upper-case codes.
- When a request times out, lower `top` or simplify the filter.
"#;

/// Guide returned by `get_product_api_documentation`
///
/// The product type and field sections are generated from
/// [`PRODUCT_TYPES`] and [`RECOMMENDED_SELECT_FIELDS`].
pub fn product_api_documentation() -> String {
    let mut doc = String::from(API_GUIDE);

    doc.push_str("\n## Product types\n");
    for (code, name) in PRODUCT_TYPES {
        doc.push_str(&format!("- {code}: {name}\n"));
    }

    doc.push_str("\n## Recommended fields\n");
    doc.push_str(&format!(
        "For a compact overview use `select_fields=\"{}\"`.\n",
        RECOMMENDED_SELECT_FIELDS.join(",")
    ));
    doc
}
