/// A canned search shown while the result list is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub query: &'static str,
}

const SUGGESTIONS: &[Suggestion] = &[
    Suggestion {
        title: "Nearby parking",
        subtitle: "Find a parking spot close to you",
        query: "Parking",
    },
    Suggestion {
        title: "Charging",
        subtitle: "Electric vehicle charging stations",
        query: "Borne de recharge",
    },
    Suggestion {
        title: "Restaurants",
        subtitle: "Places to eat around you",
        query: "Restaurant",
    },
];

pub fn default_suggestions() -> &'static [Suggestion] {
    SUGGESTIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_queries_are_searchable() {
        let suggestions = default_suggestions();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.iter().all(|s| !s.query.trim().is_empty()));
        assert_eq!(suggestions[0].query, "Parking");
    }
}
