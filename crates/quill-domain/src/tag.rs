//! Tag module - fixed topical categories and their trigger keywords

/// Topical category attached to a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// Jobs, careers, employment
    Career,

    /// Companies, startups, entrepreneurship
    Business,

    /// Technology, software, AI
    Tech,

    /// Leadership, management, teams
    Leadership,

    /// Marketing, branding, social media
    Marketing,

    /// Professional networking
    Networking,
}

/// Ordered keyword table used for tag detection.
///
/// Order matters: when more categories match than a post may carry, the
/// earlier entries win.
pub const KEYWORD_TABLE: &[(Tag, &[&str])] = &[
    (Tag::Career, &["career", "job", "work", "employment"]),
    (Tag::Business, &["business", "company", "startup", "entrepreneur"]),
    (Tag::Tech, &["technology", "tech", "ai", "digital", "software"]),
    (Tag::Leadership, &["leadership", "management", "team", "leader"]),
    (Tag::Marketing, &["marketing", "brand", "social media"]),
    (Tag::Networking, &["network", "connection", "professional"]),
];

impl Tag {
    /// All categories in table order
    pub const ALL: [Tag; 6] = [
        Tag::Career,
        Tag::Business,
        Tag::Tech,
        Tag::Leadership,
        Tag::Marketing,
        Tag::Networking,
    ];

    /// Get the tag name as written to the output artifact
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Career => "career",
            Tag::Business => "business",
            Tag::Tech => "tech",
            Tag::Leadership => "leadership",
            Tag::Marketing => "marketing",
            Tag::Networking => "networking",
        }
    }

    /// Parse an exact category name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|tag| tag.as_str() == lowered)
    }

    /// Map a free-form label onto a category.
    ///
    /// Accepts the category name itself or any of its trigger keywords,
    /// ignoring case, surrounding whitespace and a leading `#`. Labels that
    /// match nothing return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let lowered = label.trim().trim_start_matches('#').trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        if let Some(tag) = Self::parse(&lowered) {
            return Some(tag);
        }
        KEYWORD_TABLE
            .iter()
            .find(|(_, triggers)| triggers.contains(&lowered.as_str()))
            .map(|(tag, _)| *tag)
    }

    /// Trigger keywords for this category
    pub fn triggers(&self) -> &'static [&'static str] {
        KEYWORD_TABLE
            .iter()
            .find(|(tag, _)| tag == self)
            .map(|(_, triggers)| *triggers)
            .unwrap_or(&[])
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tag: {}", s))
    }
}
