use std::fmt;

type Test<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct Clause<T> {
    label: String,
    test: Test<T>,
}

/// A conjunction of independent boolean clauses over `T`.
///
/// A predicate without clauses matches every value.
pub struct Predicate<T> {
    clauses: Vec<Clause<T>>,
}

impl<T> Predicate<T> {
    pub fn all() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Adds a clause; `label` shows up in logs and `Debug` output.
    pub fn and<F>(mut self, label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push(label, test);
        self
    }

    pub fn push<F>(&mut self, label: impl Into<String>, test: F)
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.clauses.push(Clause {
            label: label.into(),
            test: Box::new(test),
        });
    }

    pub fn matches(&self, value: &T) -> bool {
        self.clauses.iter().all(|clause| (clause.test)(value))
    }

    pub fn is_universal(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().map(|clause| clause.label.as_str())
    }
}

impl<T> Default for Predicate<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_predicate_matches_everything() {
        let predicate = Predicate::<i32>::all();
        assert!(predicate.is_universal());
        assert!(predicate.matches(&0));
        assert!(predicate.matches(&i32::MIN));
    }

    #[test]
    fn test_clauses_combine_with_and() {
        let predicate = Predicate::all()
            .and("positive", |n: &i32| *n > 0)
            .and("even", |n: &i32| n % 2 == 0);
        assert_eq!(predicate.len(), 2);
        assert!(predicate.matches(&4));
        assert!(!predicate.matches(&3));
        assert!(!predicate.matches(&-2));
    }

    #[test]
    fn test_debug_lists_labels() {
        let predicate = Predicate::all().and("positive", |n: &i32| *n > 0);
        assert_eq!(format!("{:?}", predicate), r#"["positive"]"#);
    }
}
