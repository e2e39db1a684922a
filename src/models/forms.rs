//! Form helpers shared by several pages.

use serde::{Deserialize, Serialize};

/// Editable list of goals. Always holds at least one (possibly blank) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct GoalList(Vec<String>);

impl Default for GoalList {
    fn default() -> Self {
        Self(vec![String::new()])
    }
}

impl From<Vec<String>> for GoalList {
    fn from(goals: Vec<String>) -> Self {
        Self::from_goals(goals)
    }
}

impl GoalList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing goals; an empty input still yields one blank field.
    pub fn from_goals<I, S>(goals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let goals: Vec<String> = goals.into_iter().map(Into::into).collect();
        if goals.is_empty() {
            Self::default()
        } else {
            Self(goals)
        }
    }

    /// Add a blank goal field.
    pub fn add(&mut self) {
        self.0.push(String::new());
    }

    /// Set the goal at `index`. Out-of-range indices are ignored.
    pub fn update(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = value.into();
        }
    }

    /// Remove the goal at `index`. A no-op when only one field remains.
    pub fn remove(&mut self, index: usize) {
        if self.0.len() > 1 && index < self.0.len() {
            self.0.remove(index);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Goals to submit: blank entries dropped.
    pub fn submitted(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|g| !g.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_last_goal_is_noop() {
        let mut goals = GoalList::new();
        goals.remove(0);
        assert_eq!(goals.len(), 1);

        goals.add();
        goals.update(0, "Derivatives");
        goals.update(1, "Integrals");
        goals.remove(0);
        assert_eq!(goals.fields(), &["Integrals".to_string()]);
        goals.remove(0);
        assert_eq!(goals.fields(), &["Integrals".to_string()]);
    }

    #[test]
    fn test_submitted_drops_blank_goals() {
        let goals = GoalList::from_goals(["Limits", "  ", ""]);
        assert_eq!(goals.submitted(), vec!["Limits".to_string()]);
        assert_eq!(GoalList::from_goals(Vec::<String>::new()).len(), 1);
    }

    #[test]
    fn test_deserialized_goals_keep_one_field() {
        let goals: GoalList = serde_json::from_str("[]").unwrap();
        assert_eq!(goals.fields(), &[String::new()]);

        let goals: GoalList = serde_json::from_str(r#"["Limits"]"#).unwrap();
        assert_eq!(goals.submitted(), vec!["Limits".to_string()]);
    }
}
