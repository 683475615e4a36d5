//! Collection+JSON hypermedia documents.
//!
//! Every successful resource response is a [`Document`] wrapping one
//! [`Collection`]: items carry their data as name/value pairs and their
//! relations as links, while the collection itself advertises navigation
//! links, search queries and a write template. Request bodies are accepted
//! either as a template (`{"template": {"data": [...]}}`) or as a plain
//! JSON object of field names to values.

use std::collections::HashMap;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Error;

/// Media type of every hypermedia response.
pub const COLLECTION_JSON: &str = "application/vnd.collection+json";

const VERSION: &str = "1.0";

/// One name/value pair in an item, query or template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DataField {
    pub name: String,
    #[schema(value_type = Object)]
    pub value: Value,
}

impl DataField {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Field with an empty string value, as used in templates and queries.
    pub fn blank(name: impl Into<String>) -> Self {
        Self::new(name, "")
    }
}

/// Typed relation to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }
}

/// Single resource representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub href: String,
    pub data: Vec<DataField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Item {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            data: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn datum(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.data.push(DataField::new(name, value));
        self
    }

    pub fn link(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.links.push(Link::new(rel, href));
        self
    }

    /// Value of the named datum, if present.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.data
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Target of the named link, if present.
    pub fn link_href(&self, rel: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == rel)
            .map(|link| link.href.as_str())
    }
}

/// Parameterised query a client may issue against the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Query {
    pub rel: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<DataField>,
}

/// Fields a client may submit to create or update a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Template {
    pub data: Vec<DataField>,
}

impl Template {
    /// Template listing `fields` with empty values.
    pub fn blank(fields: &[&str]) -> Self {
        Self {
            data: fields.iter().copied().map(DataField::blank).collect(),
        }
    }
}

/// Body of a Collection+JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Collection {
    pub version: String,
    pub href: String,
    pub items: Vec<Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
}

impl Collection {
    /// Empty collection at `href` with version `1.0`.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            version: VERSION.to_owned(),
            href: href.into(),
            items: Vec::new(),
            links: Vec::new(),
            queries: Vec::new(),
            template: None,
        }
    }

    pub fn items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn link(mut self, rel: &str, href: impl Into<String>) -> Self {
        self.links.push(Link::new(rel, href));
        self
    }

    /// Advertise a search query taking `params` as blank fields.
    pub fn search_query(mut self, href: impl Into<String>, params: &[&str]) -> Self {
        self.queries.push(Query {
            rel: "search".to_owned(),
            href: href.into(),
            data: params.iter().copied().map(DataField::blank).collect(),
        });
        self
    }

    pub fn template(mut self, fields: &[&str]) -> Self {
        self.template = Some(Template::blank(fields));
        self
    }

    /// Wrap into a response document.
    pub fn into_document(self) -> Document {
        Document { collection: self }
    }
}

/// Top-level response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub collection: Collection,
}

impl Document {
    /// `200 OK` response.
    pub fn ok(self) -> HttpResponse {
        self.respond(StatusCode::OK)
    }

    /// `201 Created` response pointing at `location`.
    pub fn created(self, location: &str) -> HttpResponse {
        HttpResponse::Created()
            .insert_header((LOCATION, location.to_owned()))
            .insert_header((CONTENT_TYPE, COLLECTION_JSON))
            .json(self)
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, COLLECTION_JSON))
            .json(self)
    }
}

/// Field values submitted in a write request.
///
/// Values arrive as JSON; strings are taken as-is, numbers and booleans are
/// rendered to text, and `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteFields(HashMap<String, String>);

impl WriteFields {
    /// Parse a request body. An empty body yields no fields.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::inbound::http::collection::WriteFields;
    ///
    /// let body = br#"{"template": {"data": [{"name": "name", "value": "soup"}]}}"#;
    /// let fields = WriteFields::parse(body).unwrap();
    /// assert_eq!(fields.get("name"), Some("soup"));
    ///
    /// let plain = WriteFields::parse(br#"{"name": "soup"}"#).unwrap();
    /// assert_eq!(plain, fields);
    /// ```
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| Error::invalid_request(format!("JSON parse error - {err}")))?;
        let Value::Object(mut object) = value else {
            return Err(Error::invalid_request(
                "Expected a Collection+JSON template or a JSON object.",
            ));
        };

        match object.remove("template") {
            Some(template) => {
                let template: Template = serde_json::from_value(template).map_err(|err| {
                    Error::invalid_request(format!("Malformed template - {err}"))
                })?;
                Ok(Self::from_pairs(
                    template
                        .data
                        .into_iter()
                        .map(|field| (field.name, field.value)),
                ))
            }
            None => Ok(Self::from_pairs(object)),
        }
    }

    fn from_pairs(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        let fields = pairs
            .into_iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                Some((name, text))
            })
            .collect();
        Self(fields)
    }

    /// Borrowed value of the named field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Owned copy of the named value.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }
}
