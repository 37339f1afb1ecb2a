use std::cell::RefCell;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geom::{Point3, ShapeInstance, Transform, Vec3};
use crate::grammar::{
    EvaluationOptions, Grammar, GrammarError, Interpreter, RuleVariant, Statement, evaluate,
    library,
};

fn grammar(xml: &str) -> Grammar {
    Grammar::from_xml(xml).expect("test grammar parses")
}

fn shapes(instances: &[ShapeInstance]) -> Vec<&str> {
    instances.iter().map(|i| i.shape.as_str()).collect()
}

fn origin_of(instance: &ShapeInstance) -> Point3 {
    instance.transform * Point3::ORIGIN
}

#[test]
fn single_box() {
    let g = grammar(r#"<rules max_depth="1"><rule name="entry"><instance shape="box"/></rule></rules>"#);
    let instances = evaluate(&g, 0).unwrap();
    assert_eq!(instances, vec![ShapeInstance::new("box", Transform::identity())]);
}

#[test]
fn repeated_statement_compounds() {
    let g = grammar(
        r#"<rules max_depth="1"><rule name="entry"><instance shape="box" count="3" transforms="tx 1"/></rule></rules>"#,
    );
    let instances = evaluate(&g, 0).unwrap();
    let offsets: Vec<_> = instances.iter().map(|i| i.transform.translation()).collect();
    assert_eq!(
        offsets,
        vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0)
        ]
    );
}

#[test]
fn transform_carries_across_statements() {
    let g = grammar(
        r#"<rules max_depth="1"><rule name="entry">
            <instance shape="a" transforms="tx 1"/>
            <instance shape="b" transforms="ty 1"/>
        </rule></rules>"#,
    );
    let instances = evaluate(&g, 0).unwrap();
    assert_eq!(origin_of(&instances[1]), Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn calls_are_processed_last_in_first_out() {
    let g = grammar(
        r#"<rules max_depth="10">
            <rule name="entry"><call rule="a"/><call rule="b" transforms="tz 1"/></rule>
            <rule name="a"><instance shape="A"/></rule>
            <rule name="b"><instance shape="B"/></rule>
        </rules>"#,
    );
    let instances = evaluate(&g, 0).unwrap();
    assert_eq!(shapes(&instances), vec!["B", "A"]);
    // The pushed frame keeps a copy of the transform at push time.
    assert_eq!(origin_of(&instances[0]), Point3::new(0.0, 0.0, 1.0));
    assert_eq!(origin_of(&instances[1]), Point3::ORIGIN);
}

#[test]
fn same_seed_same_output() {
    let g = grammar(library::TREE);
    let first = evaluate(&g, 29).unwrap();
    let second = evaluate(&g, 29).unwrap();
    assert!(!first.is_empty());
    assert_eq!(first, second);

    let other = evaluate(&g, 30).unwrap();
    assert_ne!(first, other);
}

#[test]
fn self_recursion_stops_at_global_depth() {
    let g = grammar(
        r#"<rules max_depth="50"><rule name="entry">
            <instance shape="s"/>
            <call rule="entry" transforms="tx 1"/>
        </rule></rules>"#,
    );
    let evaluation = Interpreter::new(&g).run().unwrap();
    assert_eq!(evaluation.instances.len(), 50);
    assert_eq!(origin_of(&evaluation.instances[49]), Point3::new(49.0, 0.0, 0.0));
    assert_eq!(evaluation.stats.frames_processed, 51);
    assert_eq!(evaluation.stats.frames_exhausted, 1);
    assert_eq!(evaluation.stats.frames_dropped, 0);
}

#[test]
fn local_depth_overrides_global() {
    let g = grammar(
        r#"<rules max_depth="50"><rule name="entry" max_depth="5">
            <instance shape="s"/>
            <call rule="entry"/>
        </rule></rules>"#,
    );
    assert_eq!(evaluate(&g, 1).unwrap().len(), 5);
}

#[test]
fn successor_restarts_depth_and_keeps_placement() {
    let g = grammar(
        r#"<rules max_depth="100">
            <rule name="entry" max_depth="3" successor="tail">
                <instance shape="a"/>
                <call rule="entry" transforms="tx 1"/>
            </rule>
            <rule name="tail" max_depth="2">
                <instance shape="b"/>
                <call rule="tail" transforms="tx 1"/>
            </rule>
        </rules>"#,
    );
    let evaluation = Interpreter::new(&g).run().unwrap();
    assert_eq!(shapes(&evaluation.instances), vec!["a", "a", "a", "b", "b"]);
    // The successor starts from the exhausted frame's transform.
    assert_eq!(origin_of(&evaluation.instances[3]), Point3::new(3.0, 0.0, 0.0));
    assert_eq!(evaluation.stats.frames_exhausted, 2);
}

#[test]
fn stack_size_valve_drops_frames() {
    let g = grammar(
        r#"<rules max_depth="4">
            <rule name="entry"><call rule="leaf" count="10"/></rule>
            <rule name="leaf"><instance shape="x"/></rule>
        </rules>"#,
    );
    let evaluation = Interpreter::new(&g).run().unwrap();
    assert_eq!(evaluation.instances.len(), 4);
    assert_eq!(evaluation.stats.frames_dropped, 6);
    assert_eq!(evaluation.stats.frames_processed, 11);
    assert_eq!(evaluation.stats.peak_stack, 10);
}

#[test]
fn successor_chains_terminate() {
    let g = grammar(library::NOUVEAU);
    let evaluation = Interpreter::with_options(&g, EvaluationOptions::with_seed(29))
        .run()
        .unwrap();
    assert!(!evaluation.instances.is_empty());
    assert!(evaluation.instances.iter().all(|i| i.shape == "boxy"));
    assert!(evaluation.stats.frames_dropped > 0);
    assert!(evaluation.stats.peak_stack <= g.max_depth() + 1);
}

#[test]
fn successor_cycle_without_fan_out_terminates() {
    let g = grammar(
        r#"<rules max_depth="10">
            <rule name="entry" max_depth="2" successor="entry">
                <instance shape="box"/>
                <call rule="entry"/>
            </rule>
        </rules>"#,
    );
    let evaluation = Interpreter::with_options(&g, EvaluationOptions::with_seed(3))
        .run()
        .unwrap();

    // Ten restarts of a three-frame chain, then the eleventh lineage is cut.
    assert_eq!(evaluation.stats.frames_exhausted, 10);
    assert_eq!(evaluation.stats.frames_dropped, 1);
    assert_eq!(evaluation.stats.frames_processed, 31);
    assert_eq!(evaluation.instances.len(), 20);
    assert!(evaluation.stats.peak_stack <= 1);
}

#[test]
fn weighted_selection_follows_weights() {
    let mut g = Grammar::new(1).unwrap();
    g.add_variant(RuleVariant::new("pick").with_statement(Statement::instance("light", "", 1).unwrap()));
    g.add_variant(
        RuleVariant::new("pick")
            .with_weight(3)
            .with_statement(Statement::instance("heavy", "", 1).unwrap()),
    );

    let mut rng = StdRng::seed_from_u64(7);
    let draws = 40_000;
    let heavy = (0..draws)
        .filter(|_| g.pick("pick", &mut rng).unwrap().weight == 3)
        .count();
    let ratio = heavy as f64 / f64::from(draws);
    assert!((ratio - 0.75).abs() < 0.02, "heavy ratio {ratio}");
}

#[test]
fn zero_weight_variants_are_never_picked() {
    let mut g = Grammar::new(1).unwrap();
    g.add_variant(RuleVariant::new("r").with_weight(0));
    g.add_variant(RuleVariant::new("r").with_weight(2).with_max_depth(7));
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        assert_eq!(g.pick("r", &mut rng).unwrap().max_depth, Some(7));
    }

    let mut empty = Grammar::new(1).unwrap();
    empty.add_variant(RuleVariant::new("entry").with_weight(0));
    assert!(matches!(
        evaluate(&empty, 0),
        Err(GrammarError::NoSelectableVariant { ref name }) if name == "entry"
    ));
}

#[test]
fn unknown_rule_aborts_with_suggestion() {
    let g = grammar(
        r#"<rules max_depth="10">
            <rule name="entry"><call rule="sprial"/></rule>
            <rule name="spiral"><instance shape="s"/></rule>
        </rules>"#,
    );
    match evaluate(&g, 0).unwrap_err() {
        GrammarError::NoSuchRule { name, suggestion } => {
            assert_eq!(name, "sprial");
            assert_eq!(suggestion.as_deref(), Some("spiral"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let no_entry = grammar(r#"<rules max_depth="10"><rule name="start"/></rules>"#);
    assert!(matches!(
        evaluate(&no_entry, 0),
        Err(GrammarError::NoSuchRule { ref name, .. }) if name == "entry"
    ));
}

#[test]
fn progress_observer_is_called_every_interval() {
    let g = grammar(
        r#"<rules max_depth="30"><rule name="entry">
            <instance shape="s"/>
            <call rule="entry"/>
        </rule></rules>"#,
    );
    let seen = RefCell::new(Vec::new());
    let options = EvaluationOptions {
        seed: 0,
        progress_interval: 10,
    };
    let evaluation = Interpreter::with_options(&g, options)
        .on_progress(|count| seen.borrow_mut().push(count))
        .run()
        .unwrap();
    assert_eq!(evaluation.instances.len(), 30);
    assert_eq!(*seen.borrow(), vec![10, 20, 30]);

    let silent = RefCell::new(0);
    Interpreter::with_options(&g, EvaluationOptions { progress_interval: 0, ..options })
        .on_progress(|_| *silent.borrow_mut() += 1)
        .run()
        .unwrap();
    assert_eq!(*silent.borrow(), 0);
}
