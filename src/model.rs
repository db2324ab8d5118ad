use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use strum::{Display, EnumIter};

use crate::format::{
    cell_value, render_table, to_csv, to_json, Formattable, FormattingError, OutputFormat,
};

/// A remote resource. Each resource type has its own schema, which this
/// client passes through untouched.
pub type Resource = Map<String, Value>;

/// The collections exposed by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Product,
    Category,
    Attribute,
}

impl ResourceKind {
    /// Collection path relative to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Product => "products",
            ResourceKind::Category => "categories",
            ResourceKind::Attribute => "attributes",
        }
    }

    /// Name of the field that identifies a single resource.
    pub fn identifier_field(&self) -> &'static str {
        match self {
            ResourceKind::Product => "identifier",
            ResourceKind::Category | ResourceKind::Attribute => "code",
        }
    }

    /// Table columns as (header, JSON pointer) pairs.
    pub fn columns(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ResourceKind::Product => &[
                ("IDENTIFIER", "/identifier"),
                ("FAMILY", "/family"),
                ("ENABLED", "/enabled"),
                ("CATEGORIES", "/categories"),
                ("UPDATED", "/updated"),
            ],
            ResourceKind::Category => &[
                ("CODE", "/code"),
                ("PARENT", "/parent"),
                ("LABELS", "/labels"),
            ],
            ResourceKind::Attribute => &[
                ("CODE", "/code"),
                ("TYPE", "/type"),
                ("GROUP", "/group"),
                ("LOCALIZABLE", "/localizable"),
                ("SCOPABLE", "/scopable"),
            ],
        }
    }
}

/// Shape of a list response.
///
/// Variants are tried in order: a HAL envelope, then a bare array of
/// objects, then anything else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResourceEnvelope {
    Embedded {
        #[serde(rename = "_embedded")]
        embedded: EmbeddedItems,
    },
    Bare(Vec<Resource>),
    Other(Value),
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedItems {
    #[serde(default)]
    items: Vec<Resource>,
}

impl ResourceEnvelope {
    /// Normalize to the ordered list of resources; never fails.
    pub fn into_items(self) -> Vec<Resource> {
        match self {
            ResourceEnvelope::Embedded { embedded } => embedded.items,
            ResourceEnvelope::Bare(items) => items,
            ResourceEnvelope::Other(_) => Vec::new(),
        }
    }
}

/// One condition of the remote structured filter language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCondition {
    pub operator: String,
    pub value: Value,
}

/// The value of the `search` query parameter, e.g.
/// `{"type":[{"operator":"=","value":"pim_catalog_text"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchFilter(BTreeMap<String, Vec<SearchCondition>>);

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, field: &str, operator: &str, value: Value) -> Self {
        self.0.entry(field.to_string()).or_default().push(SearchCondition {
            operator: operator.to_string(),
            value,
        });
        self
    }

    pub fn equals(self, field: &str, value: &str) -> Self {
        self.condition(field, "=", Value::String(value.to_string()))
    }

    pub fn one_of(self, field: &str, values: &[String]) -> Self {
        self.condition(field, "IN", json!(values))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_query_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Selection of a single page; the client never walks further pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl Paging {
    fn append_to(&self, query: &mut Vec<(&'static str, String)>) {
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
    }
}

fn build_query(
    paging: &Paging,
    search: SearchFilter,
) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
    let mut query = Vec::new();
    paging.append_to(&mut query);
    if !search.is_empty() {
        query.push(("search", search.to_query_value()?));
    }
    Ok(query)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListOptions {
    pub paging: Paging,
    pub family: Option<String>,
}

impl ProductListOptions {
    pub fn query(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut search = SearchFilter::new();
        if let Some(family) = &self.family {
            search = search.one_of("family", std::slice::from_ref(family));
        }
        build_query(&self.paging, search)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryListOptions {
    pub paging: Paging,
    pub parent: Option<String>,
}

impl CategoryListOptions {
    pub fn query(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut search = SearchFilter::new();
        if let Some(parent) = &self.parent {
            search = search.equals("parent", parent);
        }
        build_query(&self.paging, search)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeListOptions {
    pub paging: Paging,
    pub attribute_type: Option<String>,
}

impl AttributeListOptions {
    pub fn query(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut search = SearchFilter::new();
        if let Some(attribute_type) = &self.attribute_type {
            search = search.equals("type", attribute_type);
        }
        build_query(&self.paging, search)
    }
}

/// A payload for a create call that can echo back what identifies it.
pub trait NewResource: Serialize {
    const KIND: ResourceKind;

    /// The identifying fields of the submitted payload.
    fn identifying_fields(&self) -> Resource;
}

fn object(value: Value) -> Resource {
    match value {
        Value::Object(map) => map,
        _ => Resource::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProduct {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub enabled: bool,
}

impl NewResource for NewProduct {
    const KIND: ResourceKind = ResourceKind::Product;

    fn identifying_fields(&self) -> Resource {
        object(json!({
            "identifier": self.identifier,
            "family": self.family,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl NewResource for NewCategory {
    const KIND: ResourceKind = ResourceKind::Category;

    fn identifying_fields(&self) -> Resource {
        object(json!({
            "code": self.code,
            "parent": self.parent,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAttribute {
    pub code: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub group: String,
    pub localizable: bool,
    pub scopable: bool,
}

impl NewResource for NewAttribute {
    const KIND: ResourceKind = ResourceKind::Attribute;

    fn identifying_fields(&self) -> Resource {
        object(json!({
            "code": self.code,
            "type": self.attribute_type,
        }))
    }
}

/// A page of resources of one kind, ready to be printed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList {
    pub kind: ResourceKind,
    pub items: Vec<Resource>,
}

impl Formattable for ResourceList {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        let columns = self.kind.columns();
        let headers: Vec<&str> = columns.iter().map(|(header, _)| *header).collect();
        let rows: Vec<Vec<String>> = self
            .items
            .iter()
            .map(|item| {
                let item = Value::Object(item.clone());
                columns
                    .iter()
                    .map(|(_, pointer)| item.pointer(pointer).map(cell_value).unwrap_or_default())
                    .collect()
            })
            .collect();

        match f {
            OutputFormat::Json(options) => to_json(&self.items, options.pretty),
            OutputFormat::Csv(options) => to_csv(&headers, &rows, options.with_headers),
            OutputFormat::Table(_) => Ok(render_table(&headers, &rows)),
        }
    }
}

/// A single resource, printed as field/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceItem {
    pub kind: ResourceKind,
    pub item: Resource,
}

impl Formattable for ResourceItem {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        // the identifying field leads, the rest follow in key order
        let identifier = self.kind.identifier_field();
        let rows: Vec<Vec<String>> = self
            .item
            .get_key_value(identifier)
            .into_iter()
            .chain(self.item.iter().filter(|(field, _)| *field != identifier))
            .map(|(field, value)| vec![field.clone(), cell_value(value)])
            .collect();

        match f {
            OutputFormat::Json(options) => to_json(&self.item, options.pretty),
            OutputFormat::Csv(options) => to_csv(&["FIELD", "VALUE"], &rows, options.with_headers),
            OutputFormat::Table(_) => Ok(render_table(&["FIELD", "VALUE"], &rows)),
        }
    }
}
