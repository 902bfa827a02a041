//! Dependent-dropdown option resolution.

use crud_contract::{DependentLevel, DependentSource, RelationSource, SelectOption};

#[derive(Debug, Clone, PartialEq, Eq)]
/// How a dependent level gets its options.
pub enum LevelOptions {
    /// Options are known immediately.
    Ready(Vec<SelectOption>),
    /// Options must be fetched.
    Fetch(RelationSource),
    /// The parent has no usable value yet.
    Blocked,
}

/// Substitutes the parent value into an endpoint template.
///
/// Both `{parent}` and `{<parent level name>}` placeholders are replaced with the URL-encoded
/// value.
pub fn expand_endpoint(template: &str, parent_name: &str, parent_value: &str) -> String {
    let encoded = urlencoding::encode(parent_value);
    template
        .replace("{parent}", &encoded)
        .replace(&format!("{{{parent_name}}}"), &encoded)
}

/// Options for the first level, which has no parent.
pub fn root_level_options(level: &DependentLevel) -> LevelOptions {
    match &level.source {
        DependentSource::Static(options) => LevelOptions::Ready(options.clone()),
        DependentSource::Relation(source) => LevelOptions::Fetch(source.clone()),
        DependentSource::ByParent(_) | DependentSource::Endpoint(_) => LevelOptions::Blocked,
    }
}

/// Options for a child level once its parent holds `parent_value`.
pub fn child_level_options(
    level: &DependentLevel,
    parent: &DependentLevel,
    parent_value: Option<&str>,
) -> LevelOptions {
    let Some(parent_value) = parent_value.filter(|value| {
        !value.trim().is_empty() && *value != crate::validation::NONE_SENTINEL
    }) else {
        return LevelOptions::Blocked;
    };
    match &level.source {
        DependentSource::ByParent(map) => {
            LevelOptions::Ready(map.get(parent_value).cloned().unwrap_or_default())
        }
        DependentSource::Endpoint(template) => LevelOptions::Fetch(RelationSource::new(
            expand_endpoint(template, &parent.name, parent_value),
        )),
        DependentSource::Static(options) => LevelOptions::Ready(options.clone()),
        DependentSource::Relation(source) => LevelOptions::Fetch(source.clone()),
    }
}
