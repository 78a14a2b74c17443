//! Property-based tests for the matcher algebra.
//!
//! These tests use proptest to generate random project types and labels and
//! verify that the composition laws hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::matcher::Matcher;
    use crate::project::{ProjectDecl, ProjectGraph, ProjectNode};
    use proptest::prelude::*;

    fn project(project_type: &str, label: Option<&str>) -> ProjectNode {
        let mut decl = ProjectDecl::new("sample").with_type(project_type);
        decl.label = label.map(str::to_string);
        let graph = ProjectGraph::new("/work", vec![decl]).unwrap();
        graph.find("sample").unwrap().clone()
    }

    fn typelet() -> impl Strategy<Value = String> {
        "[a-z]{1,6}"
    }

    fn project_type() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(typelet(), 1..5)
    }

    proptest! {
        /// Property: TypeHaving ignores the order of its typelets
        #[test]
        fn type_having_is_order_insensitive(
            segments in project_type(),
            wanted in prop::collection::vec(typelet(), 0..4),
        ) {
            let p = project(&segments.join("-"), None);
            let mut reversed = wanted.clone();
            reversed.reverse();
            prop_assert_eq!(
                Matcher::by_type_having(wanted).matches(&p),
                Matcher::by_type_having(reversed).matches(&p)
            );
        }

        /// Property: every segment of a type is matched by TypeHaving
        #[test]
        fn type_having_matches_own_segments(segments in project_type()) {
            let p = project(&segments.join("-"), None);
            prop_assert!(Matcher::by_type_having(segments.clone()).matches(&p));
            for segment in &segments {
                prop_assert!(Matcher::by_type_having([segment.clone()]).matches(&p));
            }
        }

        /// Property: a type always matches itself exactly, by prefix and by suffix
        #[test]
        fn type_matches_itself(segments in project_type()) {
            let t = segments.join("-");
            let p = project(&t, None);
            prop_assert!(Matcher::by_type(t.clone()).matches(&p));
            prop_assert!(Matcher::by_type_prefix(t.clone()).matches(&p));
            prop_assert!(Matcher::by_type_suffix(t).matches(&p));
        }

        /// Property: And/Or/Not obey De Morgan's laws
        #[test]
        fn composites_obey_de_morgan(
            segments in project_type(),
            a in typelet(),
            b in typelet(),
        ) {
            let p = project(&segments.join("-"), None);
            let ma = Matcher::by_type_having([a]);
            let mb = Matcher::by_type_having([b]);

            let not_and = !(ma.clone().and(mb.clone()));
            let or_not = (!ma.clone()).or(!mb.clone());
            prop_assert_eq!(not_and.matches(&p), or_not.matches(&p));

            let not_or = !(ma.clone().or(mb.clone()));
            let and_not = (!ma).and(!mb);
            prop_assert_eq!(not_or.matches(&p), and_not.matches(&p));
        }

        /// Property: Labels of a single label agrees with Label
        #[test]
        fn labels_of_one_agrees_with_label(
            labels in prop::collection::vec("[a-z]{1,6}", 0..4),
            wanted in "[a-z]{1,6}",
        ) {
            let attribute = labels.join(", ");
            let p = project("java-lib", Some(&attribute));
            prop_assert_eq!(
                Matcher::by_label(wanted.clone()).matches(&p),
                Matcher::by_labels([wanted]).matches(&p)
            );
        }

        /// Property: descriptions are deterministic
        #[test]
        fn description_is_stable(a in typelet(), b in typelet()) {
            let m1 = Matcher::by_type_prefix(a.clone()).and(!Matcher::by_label(b.clone()));
            let m2 = Matcher::by_type_prefix(a).and(!Matcher::by_label(b));
            prop_assert_eq!(m1.description(), m2.description());
        }
    }
}
