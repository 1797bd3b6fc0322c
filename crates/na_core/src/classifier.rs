use crate::types::Category;

/// Checked in order; the first category with a matching keyword wins.
const KEYWORDS: [(Category, &[&str]); 6] = [
    (
        Category::Sports,
        &["football", "cricket", "tennis", "fifa", "olympics", "nba", "match", "score"],
    ),
    (
        Category::Technology,
        &["tech", "ai", "apple", "google", "software", "smartphone", "robot", "microsoft"],
    ),
    (
        Category::Health,
        &["covid", "health", "vaccine", "medicine", "doctor", "mental health", "fitness"],
    ),
    (
        Category::Business,
        &["stock", "market", "economy", "trade", "startup", "investment", "revenue"],
    ),
    (
        Category::Science,
        &["nasa", "space", "physics", "research", "scientist", "quantum"],
    ),
    (
        Category::Entertainment,
        &["movie", "film", "celebrity", "hollywood", "netflix", "tv", "music"],
    ),
];

/// Guess a category from an article title by plain substring matching on the
/// lower-cased title. Falls back to [`Category::General`].
pub fn infer_category(title: &str) -> Category {
    let title = title.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| title.contains(kw)))
        .map(|(category, _)| category.clone())
        .unwrap_or(Category::General)
}
