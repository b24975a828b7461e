use std::{fs, path::Path};

use bdd_reporting::{
    aggregate, gherkin, FeatureRef, FeatureResult, ScenarioRef, ScenarioResult,
    StepError, StepRef, StepResult,
};
use regex::Regex;
use serde_json::Value;
use tempfile::TempDir;

/// Executes the given `feature` on paper: the step with the `failing` text
/// fails, the steps after it in the same scenario are skipped.
fn execute(feature: &gherkin::Feature, failing: &str) -> FeatureResult {
    let mut result = FeatureResult::new(FeatureRef::from(feature));
    for sc in &feature.scenarios {
        let mut sc_result = ScenarioResult::new(ScenarioRef::from(sc));
        let mut failed = false;
        for step in &sc.steps {
            let step_ref = StepRef::from(step);
            sc_result.add_step_result(if failed {
                StepResult::skipped(step_ref)
            } else if step.value == failing {
                failed = true;
                StepResult::failed(
                    step_ref,
                    StepError::new("expected a hiss")
                        .with_stack_trace("expected a hiss\n  at cats.feature:11"),
                    250_000,
                )
            } else {
                StepResult::passed(step_ref, 1_500_000)
            });
        }
        result.add_scenario_result(sc_result);
    }
    result
}

fn cats() -> gherkin::Feature {
    gherkin::Feature::parse_path(
        "tests/features/animals/cats.feature",
        gherkin::GherkinEnv::default(),
    )
    .unwrap()
}

fn dotted(line: &str, status: &str) -> String {
    format!("{line}{} {status}", ".".repeat(75 - line.chars().count()))
}

#[test]
fn feature_ref_is_derived_from_parsed_path() {
    let feature = FeatureRef::from(&cats());

    assert_eq!(feature.name, "Cats [v2]");
    assert_eq!(feature.display_uri, "tests/features/animals/cats.feature");
    assert_eq!(feature.qualified_name, "tests.features.animals.cats");
    assert_eq!(feature.line, 1);
}

#[test]
fn writes_junit_xml_named_after_feature() {
    let dir = TempDir::new().unwrap();
    let result = execute(&cats(), "it hisses");

    let path = aggregate::write_feature_xml(dir.path(), &result, None).unwrap();

    assert_eq!(path, dir.path().join("tests.features.animals.cats.xml"));
    let xml = fs::read_to_string(&path).unwrap();
    let times = Regex::new(r#" time="[^"]*""#).unwrap();
    let xml = times.replace_all(&xml, "");

    let expected = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
         <testsuite name=\"tests/features/animals/cats.feature\" \
         skipped=\"0\" tests=\"2\" failures=\"1\">\n\
         \x20 <testcase classname=\"tests.features.animals.cats\" \
         name=\"purring\">\n\
         \x20   <system-out>{}\n{}\n{}\n</system-out>\n\
         \x20 </testcase>\n\
         \x20 <testcase classname=\"tests.features.animals.cats\" \
         name=\"hissing &amp; spitting\">\n\
         \x20   <failure message=\"expected a hiss\">{}\n{}\n{}\n\
         \nStack Trace:\nexpected a hiss\n  at cats.feature:11\n\
         </failure>\n\
         \x20 </testcase>\n\
         </testsuite>\n",
        dotted("Given a cat ", "passed"),
        dotted("When it is stroked ", "passed"),
        dotted("Then it purrs ", "passed"),
        dotted("Given a cat ", "passed"),
        dotted("When it is bathed ", "passed"),
        dotted("Then it hisses ", "failed"),
    );
    assert_eq!(xml, expected);
}

#[test]
fn junit_times_are_in_seconds() {
    let result = execute(&cats(), "it hisses");

    let xml = aggregate::feature_xml(&result);

    assert!(xml.contains(r#"failures="1" time="0.00775">"#), "{xml}");
    assert!(xml.contains(r#"name="purring" time="0.0045">"#), "{xml}");
    assert!(
        xml.contains(r#"name="hissing &amp; spitting" time="0.00325">"#),
        "{xml}",
    );
}

#[test]
fn skipped_steps_are_listed_after_failure() {
    let result = execute(&cats(), "it is bathed");

    let xml = aggregate::feature_xml(&result);

    assert!(xml.contains(&dotted("When it is bathed ", "failed")));
    assert!(xml.contains(&dotted("Then it hisses ", "skipped")));
}

#[test]
fn writes_json_array_of_single_feature() {
    let dir = TempDir::new().unwrap();
    let result = execute(&cats(), "it hisses");

    let path = aggregate::write_feature_json(dir.path(), &result, None).unwrap();

    assert_eq!(path, dir.path().join("tests.features.animals.cats.json"));
    let json: Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let features = json.as_array().unwrap();
    assert_eq!(features.len(), 1);

    let feature = &features[0];
    assert_eq!(feature["feature"]["name"], "Cats [v2]");
    assert_eq!(feature["scenarioCount"], 2);
    assert_eq!(feature["failedCount"], 1);
    assert_eq!(feature["passedCount"], 1);
    assert_eq!(feature["failed"], true);

    let steps = &feature["scenarioResults"][1]["stepResults"];
    assert_eq!(steps[2]["status"], "failed");
    assert_eq!(steps[2]["error"]["message"], "expected a hiss");
}

#[test]
fn honors_explicit_file_names() {
    let dir = TempDir::new().unwrap();
    let result = execute(&cats(), "");

    let json =
        aggregate::write_feature_json(dir.path(), &result, Some("cats.json"))
            .unwrap();
    let xml = aggregate::write_feature_xml(dir.path(), &result, Some("cats.xml"))
        .unwrap();

    assert_eq!(json, dir.path().join("cats.json"));
    assert_eq!(xml, dir.path().join("cats.xml"));
    assert!(aggregate::feature_xml(&result).contains("failures=\"0\""));
}

#[test]
fn creates_missing_target_dir() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("nested").join("reports");
    let result = execute(&cats(), "");

    _ = aggregate::write_feature_xml(&target, &result, None).unwrap();

    assert!(Path::new(&target).join("tests.features.animals.cats.xml").is_file());
}
