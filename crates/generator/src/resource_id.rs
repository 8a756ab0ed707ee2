//! Resource id templates parsed from create operation paths
//!
//! A template looks like
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Foo/parents/{p}/children/{c}`:
//! an optional subscription or resource group prefix, the provider namespace,
//! then alternating type and name segments.

const PROVIDERS: &str = "providers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdTemplate {
    prefix: Vec<String>,
    namespace: String,
    /// (type, name) segments below the provider
    types: Vec<(String, String)>,
}

impl ResourceIdTemplate {
    /// Parse an unscoped create path; scoped or malformed paths yield `None`
    pub fn parse(path: &str) -> Option<Self> {
        let segments = segments(path);
        let providers = segments.iter().position(|s| is_providers(s))?;
        let (prefix, rest) = segments.split_at(providers);

        if !is_root_scope(prefix) || rest[1..].iter().any(|s| is_providers(s)) {
            return None;
        }

        let namespace = rest.get(1)?.to_string();
        let pairs = &rest[2..];
        if pairs.is_empty() || pairs.len() % 2 != 0 {
            return None;
        }

        Some(Self {
            prefix: prefix.iter().map(|s| s.to_string()).collect(),
            namespace,
            types: pairs
                .chunks(2)
                .map(|pair| (pair[0].to_string(), pair[1].to_string()))
                .collect(),
        })
    }

    /// Whether a create path lives under another resource's scope
    /// (extension resources, management groups, ...)
    pub fn is_scoped(path: &str) -> bool {
        let segments = segments(path);
        match segments.iter().position(|s| is_providers(s)) {
            Some(providers) => {
                !is_root_scope(&segments[..providers])
                    || segments[providers + 1..].iter().any(|s| is_providers(s))
            },
            None => true,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Type below the provider, e.g. `parents/children`
    pub fn resource_type(&self) -> String {
        self.types
            .iter()
            .map(|(ty, _)| ty.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// `Microsoft.Foo/parents/children`
    pub fn full_type(&self) -> String {
        format!("{}/{}", self.namespace, self.resource_type())
    }

    /// Create path of the enclosing resource, if this one is nested
    pub fn parent_path(&self) -> Option<String> {
        if self.types.len() < 2 {
            return None;
        }

        let mut segments: Vec<&str> = self.prefix.iter().map(String::as_str).collect();
        segments.push(PROVIDERS);
        segments.push(&self.namespace);
        for (ty, name) in &self.types[..self.types.len() - 1] {
            segments.push(ty);
            segments.push(name);
        }
        Some(format!("/{}", segments.join("/")))
    }
}

/// Key under which a create path is stored in the url-path table
///
/// Variable names and the casing of literal segments do not matter, so
/// `/subscriptions/{subscriptionId}/providers/Microsoft.Foo/parents/{parentName}`
/// and `/subscriptions/{sub}/providers/microsoft.foo/parents/{p}` collide.
pub fn url_key(path: &str) -> String {
    let normalized: Vec<String> = segments(path)
        .iter()
        .map(|s| {
            if s.starts_with('{') && s.ends_with('}') {
                "{}".to_string()
            } else {
                s.to_ascii_lowercase()
            }
        })
        .collect();
    format!("/{}", normalized.join("/"))
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn is_providers(segment: &str) -> bool {
    segment.eq_ignore_ascii_case(PROVIDERS)
}

fn is_root_scope(prefix: &[&str]) -> bool {
    match prefix {
        [] => true,
        [subscriptions, _] => subscriptions.eq_ignore_ascii_case("subscriptions"),
        [subscriptions, _, groups, _] => {
            subscriptions.eq_ignore_ascii_case("subscriptions")
                && groups.eq_ignore_ascii_case("resourceGroups")
        },
        _ => false,
    }
}
