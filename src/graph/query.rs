//! Gremlin traversal construction.
//!
//! Labels and property names come from closed enums; every caller-supplied
//! value (search term, filter value, vertex id) travels in the bindings map
//! and never appears in the traversal text itself.

use serde_json::{Map, Value};

/// Vertex labels known to the platform ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexLabel {
    Application,
    Objective,
    Capability,
}

impl VertexLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VertexLabel::Application => "Application",
            VertexLabel::Objective => "Objective",
            VertexLabel::Capability => "Capability",
        }
    }
}

/// Vertex properties that may be searched or filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Name,
    Description,
    Alias,
    Category,
    Status,
    Version,
    Keywords,
    Capabilities,
}

impl SearchField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::Description => "description",
            SearchField::Alias => "alias",
            SearchField::Category => "category",
            SearchField::Status => "status",
            SearchField::Version => "version",
            SearchField::Keywords => "keywords",
            SearchField::Capabilities => "capabilities",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub search_fields: Vec<SearchField>,
    pub limit: u32,
    pub filters: Vec<(SearchField, String)>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            search_fields: vec![SearchField::Name, SearchField::Description],
            limit: 20,
            filters: Vec::new(),
        }
    }
}

/// Common projection applied to search and lookup results.
const SEARCH_PROJECTION: &str = "\
.project('id', 'alias', 'name', 'description', 'category', 'status', 'version', 'keywords', 'capabilities', 'createdAt', 'updatedAt')\
.by(id())\
.by(coalesce(values('alias'), constant('')))\
.by(coalesce(values('name'), constant('')))\
.by(coalesce(values('description'), constant('')))\
.by(coalesce(values('category'), constant('')))\
.by(coalesce(values('status'), constant('active')))\
.by(coalesce(values('version'), constant('')))\
.by(coalesce(values('keywords'), constant('')))\
.by(coalesce(values('capabilities'), constant('')))\
.by(coalesce(values('createdAt'), constant('')))\
.by(coalesce(values('updatedAt'), constant('')))";

const LABEL_PROJECTION: &str = "\
.project('id', 'alias', 'name', 'description', 'status')\
.by(id())\
.by(coalesce(values('alias'), constant('')))\
.by(coalesce(values('name'), constant('')))\
.by(coalesce(values('description'), constant('')))\
.by(coalesce(values('status'), constant('active')))";

const ID_PROJECTION: &str = "\
.project('id', 'alias', 'name', 'description', 'status', 'properties')\
.by(id())\
.by(coalesce(values('alias'), constant('')))\
.by(coalesce(values('name'), constant('')))\
.by(coalesce(values('description'), constant('')))\
.by(coalesce(values('status'), constant('active')))\
.by(valueMap())";

/// Build the vertex-search traversal and its bindings.
///
/// The text-matching strategy depends on whether the cluster has a native
/// text index: `textContains` when enabled, a case-insensitive `containing`
/// fallback otherwise. The search term is lowercased to match the fallback.
#[must_use]
pub fn build_search_traversal(
    label: VertexLabel,
    query: &str,
    options: &SearchOptions,
    text_search_enabled: bool,
) -> (String, Map<String, Value>) {
    let term = query.trim().to_lowercase();

    let mut bindings = Map::new();
    bindings.insert("term".to_string(), Value::String(term));

    let mut traversal = format!("g.V().hasLabel('{}')", label.as_str());

    for (index, (field, value)) in options.filters.iter().enumerate() {
        let binding = format!("f{index}");
        traversal.push_str(&format!(".has('{}', {binding})", field.as_str()));
        bindings.insert(binding, Value::String(value.clone()));
    }

    if text_search_enabled {
        let conditions = options
            .search_fields
            .iter()
            .map(|field| format!("has('{}', textContains(term))", field.as_str()))
            .collect::<Vec<_>>()
            .join(" or ");
        traversal.push_str(&format!(".where({conditions})"));
    } else {
        let conditions = options
            .search_fields
            .iter()
            .map(|field| format!("__.values('{}').is(containing(term))", field.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        traversal.push_str(&format!(".where(or({conditions}))"));
    }

    traversal.push_str(&format!(".limit({})", options.limit));
    traversal.push_str(SEARCH_PROJECTION);

    (traversal, bindings)
}

/// Traversal listing vertices of one label with the short projection.
#[must_use]
pub fn build_label_traversal(label: VertexLabel, limit: u32) -> String {
    format!(
        "g.V().hasLabel('{}').limit({limit}){LABEL_PROJECTION}",
        label.as_str()
    )
}

/// Traversal looking up a single vertex; the id is bound as `vid`.
#[must_use]
pub fn build_id_traversal(id: &str) -> (String, Map<String, Value>) {
    let mut bindings = Map::new();
    bindings.insert("vid".to_string(), Value::String(id.to_string()));
    (format!("g.V(vid){ID_PROJECTION}"), bindings)
}

/// Connectivity probe: count at most one vertex.
#[must_use]
pub fn connection_probe() -> &'static str {
    "g.V().limit(1).count()"
}
