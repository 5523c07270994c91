use std::collections::HashSet;

/// Case-normalized set of skill tags
///
/// Tags are lower-cased on the way in, so membership and overlap are
/// case-insensitive. Duplicate tags collapse into one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet(HashSet<String>);

impl SkillSet {
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(tags.into_iter().map(|t| t.as_ref().to_lowercase()).collect())
    }

    /// Build a set from an optional tag list, treating `None` as empty
    pub fn from_optional(tags: Option<&[String]>) -> Self {
        tags.map(Self::from_tags).unwrap_or_default()
    }

    /// Number of tags present in both sets
    #[inline]
    pub fn overlap(&self, other: &SkillSet) -> usize {
        // Iterate the smaller side
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small.iter().filter(|tag| large.contains(*tag)).count()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(&tag.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_ignores_case() {
        let required = SkillSet::from_tags(["EM", "Intubation"]);
        let held = SkillSet::from_tags(["em", "INTUBATION", "suturing"]);
        assert_eq!(required.overlap(&held), 2);
        assert_eq!(held.overlap(&required), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = SkillSet::from_tags(["em", "EM", "Em"]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("eM"));
    }

    #[test]
    fn test_absent_tags_are_empty() {
        let set = SkillSet::from_optional(None);
        assert!(set.is_empty());
        assert_eq!(set.overlap(&SkillSet::from_tags(["em"])), 0);
    }
}
