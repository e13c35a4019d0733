//! Every fixture under `dev-test-runner/fixtures` must hold under the default config.
use json_struct_schema::{Struct, make, path_de};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct Fixture {
    #[serde(rename = "struct")]
    struct_: Struct,
    expect: Expect,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
enum Expect {
    Ok(Value),
    Err(String),
}

#[test]
fn fixtures_hold() {
    let pattern = format!("{}/dev-test-runner/fixtures/*.json", env!("CARGO_MANIFEST_DIR"));
    let paths = glob::glob(&pattern).unwrap().collect::<Result<Vec<_>, _>>().unwrap();
    assert!(!paths.is_empty(), "no fixtures matched {pattern}");
    for path in paths {
        let source = std::fs::read_to_string(&path).unwrap();
        let fixture: Fixture = path_de::from_str_with_path(&source)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        let actual = make(&fixture.struct_);
        match fixture.expect {
            Expect::Ok(want) => assert_eq!(actual, Ok(want), "{}", path.display()),
            Expect::Err(want) => assert_eq!(actual, Err(want), "{}", path.display()),
        }
    }
}
