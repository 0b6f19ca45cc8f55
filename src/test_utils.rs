use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{de::{Error, MapAccess, Visitor}, Deserialize, Deserializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Ok,
    // Name of the expected error kind, e.g. "SyntaxError"
    Err(String),
}

/// Expected result of running one fixture program.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub outcome: TestOutcome,
    // Protocol lines emitted before the program finished or failed
    pub output: Vec<String>,
    pub max_steps: Option<u64>,
}

struct TestCaseVisitor {}

impl<'de> Deserialize<'de> for TestCase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de> {

        deserializer.deserialize_map(TestCaseVisitor {})
    }
}

impl<'de> Visitor<'de> for TestCaseVisitor {
    type Value = TestCase;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok' and the list 'output'. If it's not okay, also the key 'type'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>, {

        let mut ok: Option<bool> = None;
        let mut output: Option<Vec<String>> = None;
        let mut error_type: Option<String> = None;
        let mut max_steps: Option<u64> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "ok" => ok = Some(map.next_value()?),
                "output" => output = Some(map.next_value()?),
                "type" => error_type = Some(map.next_value()?),
                "max_steps" => max_steps = Some(map.next_value()?),
                other => return Err(A::Error::custom(format!("Unrecognized key: {}", other))),
            }
        }

        let output = output.ok_or(A::Error::custom("Missing key 'output'"))?;
        let outcome = match (ok, error_type) {
            (Some(true), None) => TestOutcome::Ok,
            (Some(false), Some(error_type)) => match error_type.as_str() {
                "SyntaxError" | "UndefinedVariable" | "StepLimitExceeded" => TestOutcome::Err(error_type),
                other => return Err(A::Error::custom(format!("Unrecognized turtle error: {}", other))),
            },
            (Some(true), Some(_)) => return Err(A::Error::custom("A passing case has no 'type'")),
            (Some(false), None) => return Err(A::Error::custom("A failing case needs a 'type'")),
            (None, _) => return Err(A::Error::custom("Missing key 'ok'")),
        };

        Ok(TestCase { outcome, output, max_steps })
    }
}

fn load_output_file<P: AsRef<Path>>(path: P) -> anyhow::Result<TestCase> {
    let source = std::fs::read(path)?;
    Ok(serde_json::from_slice(&source)?)
}

pub fn load_test_case(testcase: usize) -> anyhow::Result<(String, TestCase)> {
    if !all_testcases().any(|case| case == testcase) { bail!("Testcase out of bounds"); }

    let base_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let source = std::fs::read_to_string(base_path.join("test_inputs").join(format!("{}.turtle", testcase)))?;
    let expected = load_output_file(base_path.join("test_outputs").join(format!("{}.json", testcase)))?;

    Ok((source, expected))
}

pub fn all_testcases() -> impl Iterator<Item = usize> {
    1..=10
}
