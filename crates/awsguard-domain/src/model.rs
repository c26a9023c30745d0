use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// One declared infrastructure resource, as supplied by the host.
///
/// The engine only reads subjects; the type tag is the only field it interprets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub urn: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub type_tag: String,

    #[serde(default)]
    pub properties: Map<String, Value>,

    /// URNs of resources this declaration depends on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// Per-property dependencies: which resources feed which input property.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub property_dependencies: BTreeMap<String, Vec<String>>,
}

impl Subject {
    pub fn new(type_tag: &str, name: &str) -> Self {
        Self {
            urn: format!("urn:awsguard:stack::{type_tag}::{name}"),
            name: name.to_string(),
            type_tag: type_tag.to_string(),
            ..Self::default()
        }
    }

    /// Replace the property bag. Non-object values leave the bag empty.
    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = match properties {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    pub fn with_dependency(mut self, urn: &str) -> Self {
        self.dependencies.push(urn.to_string());
        self
    }

    pub fn with_property_dependency(mut self, property: &str, urn: &str) -> Self {
        self.property_dependencies
            .entry(property.to_string())
            .or_default()
            .push(urn.to_string());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn is_type(&self, type_tag: &str) -> bool {
        self.type_tag == type_tag
    }

    /// `"<type> (<name>)"`, the way hosts print a resource.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.type_tag, self.name)
    }
}

/// Host-facing document shape: `{ "resources": [ ... ] }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StackDocument {
    #[serde(default)]
    pub resources: Vec<Subject>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StackError {
    #[error("duplicate resource urn in stack: {0}")]
    DuplicateUrn(String),
}

/// Which declarations reference which other declarations.
///
/// Built once per stack; both directions are indexed so that cross-resource rules can
/// walk relationships without the engine understanding resource semantics.
#[derive(Clone, Debug, Default)]
pub struct RelationshipIndex {
    forward: BTreeMap<String, BTreeSet<String>>,
    reverse: BTreeMap<String, BTreeSet<String>>,
    by_property: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl RelationshipIndex {
    pub fn build(subjects: &[Subject]) -> Self {
        let mut index = RelationshipIndex::default();

        for subject in subjects {
            let declared = subject
                .dependencies
                .iter()
                .chain(subject.property_dependencies.values().flatten());
            for target in declared {
                index
                    .forward
                    .entry(subject.urn.clone())
                    .or_default()
                    .insert(target.clone());
                index
                    .reverse
                    .entry(target.clone())
                    .or_default()
                    .insert(subject.urn.clone());
            }

            for (property, targets) in &subject.property_dependencies {
                index
                    .by_property
                    .entry(subject.urn.clone())
                    .or_default()
                    .entry(property.clone())
                    .or_default()
                    .extend(targets.iter().cloned());
            }
        }

        index
    }

    /// Everything `urn` declares a relationship to, sorted.
    pub fn references(&self, urn: &str) -> impl Iterator<Item = &str> {
        self.forward
            .get(urn)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Everything that declares a relationship to `urn`, sorted.
    pub fn referenced_by(&self, urn: &str) -> impl Iterator<Item = &str> {
        self.reverse
            .get(urn)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Resources feeding one input property of `urn`, sorted.
    pub fn property_references(&self, urn: &str, property: &str) -> impl Iterator<Item = &str> {
        self.by_property
            .get(urn)
            .and_then(|props| props.get(property))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn references_subject(&self, from: &str, to: &str) -> bool {
        self.forward.get(from).is_some_and(|set| set.contains(to))
    }
}

/// The whole declared resource graph, as seen by stack validations.
#[derive(Clone, Debug)]
pub struct Stack<'a> {
    subjects: &'a [Subject],
    positions: BTreeMap<&'a str, usize>,
    index: RelationshipIndex,
}

impl<'a> Stack<'a> {
    pub fn new(subjects: &'a [Subject]) -> Result<Self, StackError> {
        let mut positions = BTreeMap::new();
        for (idx, subject) in subjects.iter().enumerate() {
            if positions.insert(subject.urn.as_str(), idx).is_some() {
                return Err(StackError::DuplicateUrn(subject.urn.clone()));
            }
        }

        Ok(Self {
            subjects,
            positions,
            index: RelationshipIndex::build(subjects),
        })
    }

    pub fn subjects(&self) -> &'a [Subject] {
        self.subjects
    }

    pub fn get(&self, urn: &str) -> Option<&'a Subject> {
        self.positions.get(urn).map(|&idx| &self.subjects[idx])
    }

    pub fn of_type<'s>(&'s self, type_tag: &'s str) -> impl Iterator<Item = &'a Subject> + 's {
        self.subjects.iter().filter(move |s| s.is_type(type_tag))
    }

    pub fn relationships(&self) -> &RelationshipIndex {
        &self.index
    }
}
