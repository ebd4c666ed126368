//! Filter selection state and the cascading business line / parent route choices.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Options offered by the parent-route dropdown and the one preselected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteChoices {
    pub options: Vec<String>,
    pub selected: Option<String>,
}

/// Parent routes of `business_line`, defaulting to the first of them.
pub fn route_choices(dataset: &Dataset, business_line: &str) -> RouteChoices {
    let options = dataset.parent_routes(business_line);
    let selected = options.first().cloned();
    RouteChoices { options, selected }
}

/// Current dropdown and slider values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub business_line: Option<String>,
    pub parent_route: Option<String>,
    pub year: Option<i32>,
}

impl Selection {
    /// First business line, its first parent route, and the earliest year.
    pub fn initial(dataset: &Dataset) -> Self {
        let mut selection = Self {
            year: dataset.year_range().map(|(min, _)| min),
            ..Default::default()
        };
        if let Some(bl) = dataset.business_lines().into_iter().next() {
            selection.select_business_line(dataset, &bl);
        }
        selection
    }

    /// Switches business line and resets the parent route to its first route.
    pub fn select_business_line(&mut self, dataset: &Dataset, business_line: &str) -> RouteChoices {
        let choices = route_choices(dataset, business_line);
        self.business_line = Some(business_line.to_string());
        self.parent_route = choices.selected.clone();
        choices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample;

    #[test]
    fn test_choices_belong_to_business_line() {
        let ds = sample();
        for bl in ds.business_lines() {
            let choices = route_choices(&ds, &bl);
            assert!(!choices.options.is_empty());
            for route in &choices.options {
                assert!(
                    ds.records()
                        .iter()
                        .any(|r| r.business_line == bl && &r.parent_route == route)
                );
            }
            assert_eq!(choices.selected.as_ref(), choices.options.first());
        }
    }

    #[test]
    fn test_unknown_business_line_has_no_choices() {
        let choices = route_choices(&sample(), "Unknown");
        assert!(choices.options.is_empty());
        assert_eq!(choices.selected, None);
    }

    #[test]
    fn test_initial_selection() {
        let selection = Selection::initial(&sample());
        assert_eq!(selection.business_line.as_deref(), Some("Long Distance"));
        assert_eq!(selection.parent_route.as_deref(), Some("Cardinal"));
        assert_eq!(selection.year, Some(2022));
    }

    #[test]
    fn test_switching_business_line_resets_route() {
        let ds = sample();
        let mut selection = Selection::initial(&ds);
        selection.year = Some(2024);

        let choices = selection.select_business_line(&ds, "Northeast");
        assert_eq!(choices.options, vec!["Acela", "Regional"]);
        assert_eq!(selection.parent_route.as_deref(), Some("Acela"));
        assert_eq!(selection.year, Some(2024));

        let route = selection.parent_route.as_deref().unwrap();
        assert!(ds.parent_routes("Northeast").iter().any(|r| r == route));
        assert!(!ds.parent_routes("Long Distance").iter().any(|r| r == route));
    }

    #[test]
    fn test_initial_on_empty_dataset() {
        let selection = Selection::initial(&Dataset::default());
        assert_eq!(selection, Selection::default());
    }
}
