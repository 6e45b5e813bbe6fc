use {async_graphql::InputObject, hackernews_store::Filter};

use crate::events::MutationType;

/// Predicates over links. Own predicates must all hold; each `OR` entry is
/// an alternative to them.
#[derive(InputObject, Debug, Clone, Default)]
pub struct LinkFilter {
    #[graphql(name = "OR")]
    pub or: Option<Vec<LinkFilter>>,
    /// Case-insensitive substring of the description.
    #[graphql(name = "description_contains")]
    pub description_contains: Option<String>,
    /// Case-insensitive substring of the URL.
    #[graphql(name = "url_contains")]
    pub url_contains: Option<String>,
}

impl LinkFilter {
    /// Translate into a store predicate. A filter that constrains nothing,
    /// or any `OR` branch that constrains nothing, matches every link.
    pub fn to_filter(&self) -> Filter {
        let mut own = Vec::new();
        if let Some(needle) = &self.description_contains {
            own.push(Filter::contains("description", needle.as_str()));
        }
        if let Some(needle) = &self.url_contains {
            own.push(Filter::contains("url", needle.as_str()));
        }

        let mut parts = Vec::new();
        match own.len() {
            0 => {},
            1 => parts.extend(own),
            _ => parts.push(Filter::And(own)),
        }
        parts.extend(self.or.iter().flatten().map(Self::to_filter));

        if parts.is_empty() || parts.contains(&Filter::All) {
            return Filter::All;
        }
        if parts.len() == 1 {
            return parts.swap_remove(0);
        }
        Filter::Or(parts)
    }
}

#[derive(InputObject, Debug, Clone)]
pub struct AuthProviderSignupData {
    pub email: Option<AuthProviderEmail>,
}

#[derive(InputObject, Debug, Clone)]
#[graphql(name = "AUTH_PROVIDER_EMAIL")]
pub struct AuthProviderEmail {
    pub email: String,
    pub password: String,
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct LinkSubscriptionFilter {
    #[graphql(name = "mutation_in")]
    pub mutation_in: Option<Vec<MutationType>>,
}

impl LinkSubscriptionFilter {
    /// An absent list passes every event, an empty list passes none.
    pub fn accepts(&self, mutation: MutationType) -> bool {
        self.mutation_in
            .as_ref()
            .is_none_or(|allowed| allowed.contains(&mutation))
    }
}
