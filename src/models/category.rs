/// The fixed set of categories a movement can be filed under.
///
/// Storage keeps the display text and does not enforce the set; input is
/// checked with [`Category::parse`] at the shell boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Food,
    Housing,
    Transport,
    Subscriptions,
    Leisure,
    Health,
    Income,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Housing => "Housing",
            Self::Transport => "Transport",
            Self::Subscriptions => "Subscriptions/Streaming",
            Self::Leisure => "Leisure",
            Self::Health => "Health",
            Self::Income => "Income(Salary)",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup by display name or a short alias.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "food" => Some(Self::Food),
            "housing" => Some(Self::Housing),
            "transport" => Some(Self::Transport),
            "subscriptions/streaming" | "subscriptions" | "streaming" => Some(Self::Subscriptions),
            "leisure" => Some(Self::Leisure),
            "health" => Some(Self::Health),
            "income(salary)" | "income" | "salary" => Some(Self::Income),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Read back a stored value. Unknown text becomes `Other`.
    pub fn from_stored(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Other)
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Housing,
            Self::Transport,
            Self::Subscriptions,
            Self::Leisure,
            Self::Health,
            Self::Income,
            Self::Other,
        ]
    }

    /// Income categories cannot carry a spending limit.
    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    /// Categories a budget may be set for.
    pub fn budgetable() -> impl Iterator<Item = Category> {
        Self::all().iter().copied().filter(|c| !c.is_income())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
