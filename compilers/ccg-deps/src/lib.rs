//! Dependency structures for CCG parsing.
//!
//! Each chart cell carries a [`DependencyStructure`]. Combining two cells
//! unifies their coindexation trees, which resolves the dependencies whose
//! argument slots become bound to words.

pub mod coindexation;
pub mod dependency;
pub mod disjoint;
pub mod error;
pub mod markedup;
pub mod markup;
pub mod slot;
pub mod structure;
pub mod substitution;

pub use coindexation::Coindexation;
pub use dependency::{Dependency, ResolvedDependency, UnlabelledDependency, UnresolvedDependency};
pub use error::{CombineError, LexiconError, MarkupError, ValidationError};
pub use markedup::{LoadOptions, Markedup, SkippedEntry};
pub use markup::MarkedCategory;
pub use slot::{Heads, Slot};
pub use structure::DependencyStructure;
pub use substitution::{Resolution, UnifyingSubstitution};

#[cfg(test)]
mod tests {
    use super::*;
    use ccg_category::{Category, Slash};
    use ccg_protocol::{Preposition, RoleRegistry, VarId, WordIndex};
    use proptest::prelude::*;
    use std::sync::Arc;

    const LEXICON: &str = "\
(S\\NP)/NP
  2 ((S_1\\NP_2)_1/NP_3)_1

(S\\NP)/PP
  2 ((S_1\\NP_2)_1/PP_3)_1

((S\\NP)/PP)/NP
  3 (((S_1\\NP_2)_1/PP_3)_1/NP_4)_1

PP/NP
  1 (PP_2/NP_2)_1
";

    fn lexicon() -> Markedup {
        let (markedup, skipped) = Markedup::parse(LEXICON);
        assert!(skipped.is_empty(), "{:?}", skipped);
        markedup
    }

    fn cat(s: &str) -> Arc<Category> {
        Category::parse(s).unwrap()
    }

    fn word(category: &str, text: &str, position: u32, markedup: &Markedup) -> DependencyStructure {
        DependencyStructure::make(&cat(category), text, WordIndex(position), markedup).unwrap()
    }

    fn words(heads: &Heads) -> Vec<u32> {
        heads.iter().map(|w| w.0).collect()
    }

    fn type_raise(noun: &DependencyStructure) -> DependencyStructure {
        let rule = MarkedCategory::parse("((S_2/(S_2\\NP_1)_2)_2\\NP_1)_2").unwrap();
        let mut out = Vec::new();
        let raised = DependencyStructure::for_rule(&rule).unwrap().apply(noun, &mut out).unwrap();
        assert!(out.is_empty());
        raised
    }

    #[test]
    fn test_application() {
        let markedup = lexicon();
        let john = word("NP", "John", 0, &markedup);
        let likes = word("(S\\NP)/NP", "likes", 1, &markedup);
        let mary = word("NP", "Mary", 2, &markedup);

        // 1. Object
        let mut out = Vec::new();
        let vp = likes.apply(&mary, &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].head(), WordIndex(1));
        assert_eq!(out[0].arg_number(), 2);
        assert_eq!(words(out[0].arguments()), vec![2]);
        assert_eq!(vp.unresolved().len(), 1);

        // 2. Subject
        let sentence = vp.apply(&john, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].arg_number(), 1);
        assert_eq!(words(out[1].arguments()), vec![0]);
        assert!(sentence.unresolved().is_empty());
        assert_eq!(sentence.arbitrary_head(), Some(WordIndex(1)));
    }

    #[test]
    fn test_composition_through_preposition() {
        let markedup = lexicon();
        let sat = word("(S\\NP)/PP", "sat", 1, &markedup);
        let on = word("PP/NP", "on", 2, &markedup);
        let mat = word("NP", "mat", 3, &markedup);

        let mut out = Vec::new();
        let composed = sat.compose(&on, &mut out).unwrap();
        assert!(out.is_empty());
        assert!(composed.coindexation().fits(&cat("(S\\NP)/NP")));

        let vp = composed.apply(&mat, &mut out).unwrap();
        assert_eq!(out.len(), 2);

        let through_pp = &out[0];
        assert_eq!(through_pp.head(), WordIndex(1));
        assert_eq!(through_pp.arg_number(), 2);
        assert_eq!(words(through_pp.arguments()), vec![3]);
        assert_eq!(through_pp.preposition(), Preposition::On);

        let object = &out[1];
        assert_eq!(object.head(), WordIndex(2));
        assert_eq!(object.arg_number(), 1);
        assert_eq!(words(object.arguments()), vec![3]);
        assert_eq!(object.preposition(), Preposition::None);

        assert_eq!(vp.arbitrary_head(), Some(WordIndex(1)));
        assert_eq!(vp.unresolved().len(), 1);
    }

    #[test]
    fn test_noun_coordination() {
        let markedup = lexicon();
        let cats = word("NP", "cats", 0, &markedup);
        let dogs = word("NP", "dogs", 2, &markedup);
        let sleep = word("S\\NP", "sleep", 3, &markedup);

        let mut out = Vec::new();
        let coordinated = dogs.conjunction().apply(&cats, &mut out).unwrap();
        assert!(out.is_empty());
        assert!(!coordinated.is_conjunction());

        let heads = coordinated.heads().unwrap();
        assert_eq!(heads.len(), cats.heads().unwrap().len() + dogs.heads().unwrap().len());
        assert_eq!(words(heads), vec![0, 2]);
        assert!(matches!(coordinated.arbitrary_head(), Some(WordIndex(0)) | Some(WordIndex(2))));

        sleep.apply(&coordinated, &mut out).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(words(out[0].arguments()), vec![0, 2]);
    }

    #[test]
    fn test_verb_coordination_shares_arguments() {
        let markedup = lexicon();
        let john = word("NP", "John", 0, &markedup);
        let likes = word("(S\\NP)/NP", "likes", 1, &markedup);
        let hates = word("(S\\NP)/NP", "hates", 3, &markedup);
        let mary = word("NP", "Mary", 4, &markedup);

        let mut out = Vec::new();
        let verbs = hates.conjunction().apply(&likes, &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(words(verbs.heads().unwrap()), vec![1, 3]);
        assert_eq!(verbs.unresolved().len(), 4);

        let vp = verbs.apply(&mary, &mut out).unwrap();
        vp.apply(&john, &mut out).unwrap();
        assert_eq!(out.len(), 4);

        let mut objects: Vec<u32> = out
            .iter()
            .filter(|d| d.arg_number() == 2)
            .inspect(|d| assert_eq!(words(d.arguments()), vec![4]))
            .map(|d| d.head().0)
            .collect();
        objects.sort();
        assert_eq!(objects, vec![1, 3]);
        assert!(out
            .iter()
            .filter(|d| d.arg_number() == 1)
            .all(|d| words(d.arguments()) == vec![0]));
    }

    #[test]
    fn test_colliding_ids_are_kept_apart() {
        let markedup = lexicon();
        let likes = word("(S\\NP)/NP", "likes", 1, &markedup);
        // Uses id 1, the verb's own head id
        let mary = word("NP", "Mary", 2, &markedup);
        assert_eq!(mary.coindexation().id(), likes.coindexation().id());

        let mut first = Vec::new();
        let mut second = Vec::new();
        let a = likes.apply(&mary, &mut first).unwrap();
        let b = likes.apply(&word("NP", "Mary", 2, &markedup), &mut second).unwrap();

        assert_eq!(a, b);
        assert_eq!(first, second);
        assert_eq!(a.arbitrary_head(), Some(WordIndex(1)));
    }

    #[test]
    fn test_type_raised_subject() {
        let markedup = lexicon();
        let john = type_raise(&word("NP", "John", 0, &markedup));
        assert_eq!(john.heads(), None);
        assert!(john.coindexation().fits(&cat("S/(S\\NP)")));

        let likes = word("(S\\NP)/NP", "likes", 1, &markedup);
        let mary = word("NP", "Mary", 2, &markedup);

        let mut out = Vec::new();
        let partial = john.compose(&likes, &mut out).unwrap();
        assert!(partial.coindexation().fits(&cat("S/NP")));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].arg_number(), 1);
        assert_eq!(words(out[0].arguments()), vec![0]);

        let sentence = partial.apply(&mary, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].arg_number(), 2);
        assert_eq!(words(out[1].arguments()), vec![2]);
        assert_eq!(sentence.arbitrary_head(), Some(WordIndex(1)));
    }

    #[test]
    fn test_compose2_builds_nested_result() {
        let markedup = lexicon();
        let john = type_raise(&word("NP", "John", 0, &markedup));
        let put = word("((S\\NP)/PP)/NP", "put", 1, &markedup);

        let mut out = Vec::new();
        let composed = john.compose2(&put, &mut out).unwrap();
        assert!(composed.coindexation().fits(&cat("(S/PP)/NP")));
        assert_eq!(composed.arbitrary_head(), Some(WordIndex(1)));
        assert_eq!(out.len(), 1);
        assert_eq!(words(out[0].arguments()), vec![0]);
        assert_eq!(composed.unresolved().len(), 2);

        let book = word("NP", "book", 2, &markedup);
        let rest = composed.apply(&book, &mut out).unwrap();
        assert!(rest.coindexation().fits(&cat("S/PP")));
        assert_eq!(out[1].arg_number(), 3);
    }

    #[test]
    fn test_compose2_modifier_keeps_other_shape() {
        let markedup = lexicon();
        let probably = word("(S\\NP)/(S\\NP)", "probably", 0, &markedup);
        let put = word("((S\\NP)/PP)/NP", "put", 1, &markedup);
        assert!(probably.coindexation().is_modifier());

        let mut out = Vec::new();
        let composed = probably.compose2(&put, &mut out).unwrap();
        assert!(composed.coindexation().fits(&cat("((S\\NP)/PP)/NP")));
        assert_eq!(composed.arbitrary_head(), Some(WordIndex(1)));

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].head(), WordIndex(0));
        assert_eq!(words(out[0].arguments()), vec![1]);
        // probably's subject waits alongside put's three arguments
        assert_eq!(composed.unresolved().len(), 4);
        assert_eq!(
            out.len() + composed.unresolved().len(),
            probably.unresolved().len() + put.unresolved().len()
        );
    }

    #[test]
    fn test_modifier_composition_keeps_modified_head() {
        let markedup = lexicon();
        let probably = word("(S\\NP)/(S\\NP)", "probably", 0, &markedup);
        let likes = word("(S\\NP)/NP", "likes", 1, &markedup);

        let mut out = Vec::new();
        let composed = probably.compose(&likes, &mut out).unwrap();
        assert_eq!(composed.arbitrary_head(), Some(WordIndex(1)));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_unary_rule_passes_head_through() {
        let markedup = lexicon();
        let rule = DependencyStructure::for_rule(&MarkedCategory::parse("(NP_1\\N_1)_1").unwrap()).unwrap();
        let cats = word("N", "cats", 4, &markedup);

        let mut out = Vec::new();
        let np = rule.apply(&cats, &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(np.arbitrary_head(), Some(WordIndex(4)));
        assert!(np.coindexation().is_leaf());
    }

    #[test]
    fn test_labelling_after_coordination() {
        let mut registry = RoleRegistry::new();
        let arg0 = registry.intern("ARG0");
        let roles = registry.freeze();

        let markedup = lexicon();
        let cats = word("NP", "cats", 0, &markedup);
        let dogs = word("NP", "dogs", 2, &markedup);
        let sleep = word("S\\NP", "sleep", 3, &markedup);

        let mut out = Vec::new();
        let subject = dogs.conjunction().apply(&cats, &mut out).unwrap();
        sleep.apply(&subject, &mut out).unwrap();

        let labelled = out[0].set_label(arg0);
        let described: Vec<String> = labelled.iter().map(|d| d.describe(&roles)).collect();
        assert_eq!(described, vec!["3 S\\NP 1 0 ARG0", "3 S\\NP 1 2 ARG0"]);
        assert_eq!(labelled[0].offset(), -3);
    }

    #[test]
    fn test_structures_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DependencyStructure>();
        assert_send_sync::<Markedup>();
        assert_send_sync::<UnlabelledDependency>();
    }

    const APPLICATIONS: &[(&str, &str)] = &[
        ("(S\\NP)/NP", "NP"),
        ("S\\NP", "NP"),
        ("(S\\NP)/PP", "PP"),
        ("(S\\NP)/(S\\NP)", "S\\NP"),
        ("((S\\NP)/PP)/NP", "NP"),
        ("NP/N", "N"),
        ("(N/N)/(N/N)", "N/N"),
        ("PP/NP", "NP"),
    ];

    #[derive(Debug, Clone, Copy)]
    enum Combinator {
        Compose,
        Compose2,
        RaiseAndCompose,
        RaiseAndCompose2,
        Coordinate,
    }

    const COMBINATIONS: &[(Combinator, &str, &str)] = &[
        (Combinator::Compose, "(S\\NP)/(S\\NP)", "(S\\NP)/NP"),
        (Combinator::Compose, "(S\\NP)/PP", "PP/NP"),
        (Combinator::Compose, "(S\\NP)/(S\\NP)", "(S\\NP)/PP"),
        (Combinator::Compose2, "(S\\NP)/(S\\NP)", "((S\\NP)/PP)/NP"),
        (Combinator::RaiseAndCompose, "NP", "(S\\NP)/NP"),
        (Combinator::RaiseAndCompose, "NP", "(S\\NP)/PP"),
        (Combinator::RaiseAndCompose2, "NP", "((S\\NP)/PP)/NP"),
        (Combinator::Coordinate, "NP", "NP"),
        (Combinator::Coordinate, "(S\\NP)/NP", "(S\\NP)/NP"),
        (Combinator::Coordinate, "(S\\NP)/PP", "(S\\NP)/PP"),
    ];

    /// Writes `category` as markup, labelling each node with its id in
    /// `coindexation`.
    fn render_markup(category: &Category, coindexation: &Coindexation) -> String {
        match (category, coindexation.left(), coindexation.right()) {
            (Category::Functor { result, slash, argument }, Some(left), Some(right)) => format!(
                "({}{}{})_{}",
                render_markup(result, left),
                slash.as_char(),
                render_markup(argument, right),
                coindexation.id()
            ),
            _ => format!("{}_{}", category, coindexation.id()),
        }
    }

    fn arb_category() -> impl Strategy<Value = Arc<Category>> {
        let leaf = prop::sample::select(vec!["S", "S[dcl]", "NP", "N", "PP"])
            .prop_map(|name| Category::parse(name).unwrap());
        leaf.prop_recursive(4, 16, 2, |inner| {
            (inner.clone(), any::<bool>(), inner).prop_map(|(result, forward, argument)| {
                let slash = if forward { Slash::Forward } else { Slash::Backward };
                Category::functor(result, slash, argument)
            })
        })
    }

    proptest! {
        #[test]
        fn test_application_conserves_dependencies(
            case in 0..APPLICATIONS.len(),
            head in 0u32..50,
            argument in 50u32..100,
        ) {
            let markedup = lexicon();
            let (functor_category, argument_category) = APPLICATIONS[case];
            let functor = word(functor_category, "w", head, &markedup);
            let operand = word(argument_category, "x", argument, &markedup);

            let mut out = Vec::new();
            let result = functor.apply(&operand, &mut out).unwrap();
            prop_assert_eq!(
                out.len() + result.unresolved().len(),
                functor.unresolved().len() + operand.unresolved().len()
            );
        }

        #[test]
        fn test_combinators_conserve_dependencies(
            case in 0..COMBINATIONS.len(),
            left in 0u32..50,
            right in 50u32..100,
        ) {
            let markedup = lexicon();
            let (combinator, left_category, right_category) = COMBINATIONS[case];
            let first = word(left_category, "w", left, &markedup);
            let second = word(right_category, "x", right, &markedup);

            let mut out = Vec::new();
            let result = match combinator {
                Combinator::Compose => first.compose(&second, &mut out),
                Combinator::Compose2 => first.compose2(&second, &mut out),
                Combinator::RaiseAndCompose => type_raise(&first).compose(&second, &mut out),
                Combinator::RaiseAndCompose2 => type_raise(&first).compose2(&second, &mut out),
                Combinator::Coordinate => second.conjunction().apply(&first, &mut out),
            }
            .unwrap();
            prop_assert_eq!(
                out.len() + result.unresolved().len(),
                first.unresolved().len() + second.unresolved().len()
            );
        }

        #[test]
        fn test_parsed_markup_mirrors_category(category in arb_category()) {
            let markup = render_markup(&category, &Coindexation::from_category(&category));
            let parsed = Coindexation::from_string(&markup, WordIndex(0)).unwrap();
            prop_assert!(parsed.fits(&category), "{} does not fit {}", markup, category);
            prop_assert_eq!(&parsed, &Coindexation::from_category(&category));

            let template = MarkedCategory::parse(&markup).unwrap();
            prop_assert_eq!(template.category(), &category);
            prop_assert!(template.instantiate(None).fits(&category));
        }

        #[test]
        fn test_normalization_is_canonical(category in arb_category(), start in 1u32..1000) {
            let structure = DependencyStructure::make(&category, "w", WordIndex(0), &Markedup::new()).unwrap();
            prop_assert_eq!(structure.normalize(), structure.clone());
            prop_assert_eq!(structure.standardize_apart(VarId(start)).normalize(), structure);
        }

        #[test]
        fn test_structure_mirrors_category(category in arb_category()) {
            let structure = DependencyStructure::make(&category, "w", WordIndex(7), &Markedup::new()).unwrap();
            prop_assert!(structure.coindexation().fits(&category));
            prop_assert_eq!(structure.unresolved().len(), category.number_of_arguments());
            prop_assert!(structure.coindexation().validate().is_ok());
            prop_assert_eq!(structure.arbitrary_head(), Some(WordIndex(7)));
        }
    }
}
