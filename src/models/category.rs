use std::fmt;

/// Active category filter. `All` is the sentinel that shows every expense.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => name == category,
        }
    }

    /// Next filter in the cycle `All -> options[0] -> ... -> All`.
    pub fn next(&self, options: &[String]) -> CategoryFilter {
        let position = self.position(options);
        match position {
            None => options
                .first()
                .map(|c| CategoryFilter::Only(c.clone()))
                .unwrap_or(CategoryFilter::All),
            Some(i) if i + 1 < options.len() => CategoryFilter::Only(options[i + 1].clone()),
            Some(_) => CategoryFilter::All,
        }
    }

    pub fn previous(&self, options: &[String]) -> CategoryFilter {
        match self.position(options) {
            None => options
                .last()
                .map(|c| CategoryFilter::Only(c.clone()))
                .unwrap_or(CategoryFilter::All),
            Some(0) => CategoryFilter::All,
            Some(i) => CategoryFilter::Only(options[i - 1].clone()),
        }
    }

    // A stale `Only` (category no longer present) is treated like `All`.
    fn position(&self, options: &[String]) -> Option<usize> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(name) => options.iter().position(|c| c == name),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "All"),
            CategoryFilter::Only(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["food".to_string(), "transit".to_string()]
    }

    #[test]
    fn matches_exactly_and_case_sensitively() {
        let filter = CategoryFilter::Only("food".to_string());
        assert!(filter.matches("food"));
        assert!(!filter.matches("Food"));
        assert!(!filter.matches("foods"));
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn cycles_forward_through_options_and_back_to_all() {
        let options = options();
        let first = CategoryFilter::All.next(&options);
        assert_eq!(first, CategoryFilter::Only("food".to_string()));
        let second = first.next(&options);
        assert_eq!(second, CategoryFilter::Only("transit".to_string()));
        assert_eq!(second.next(&options), CategoryFilter::All);
    }

    #[test]
    fn cycles_backward() {
        let options = options();
        let last = CategoryFilter::All.previous(&options);
        assert_eq!(last, CategoryFilter::Only("transit".to_string()));
        assert_eq!(
            last.previous(&options),
            CategoryFilter::Only("food".to_string())
        );
        assert_eq!(
            CategoryFilter::Only("food".to_string()).previous(&options),
            CategoryFilter::All
        );
    }

    #[test]
    fn stays_on_all_without_options() {
        assert_eq!(CategoryFilter::All.next(&[]), CategoryFilter::All);
        assert_eq!(CategoryFilter::All.previous(&[]), CategoryFilter::All);
    }
}
