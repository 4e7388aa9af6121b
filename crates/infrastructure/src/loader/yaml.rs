//! YAML suite folder loading.
//!
//! A suite folder holds an optional `options.yml` plus any number of
//! `tests/*.yml` (or `.yaml`) files, each a list of test items. Test files
//! load in name order and append to the options' own `tests` list, so
//! declaration order is reproducible across filesystems. Scalar nodes tagged `!env` resolve
//! against the process environment at load time.

use std::fs;
use std::path::Path;

use serde_yaml::value::TaggedValue;
use serde_yaml::Value as Yaml;
use tracing::debug;
use walkdir::WalkDir;

use volley_application::SetupError;
use volley_domain::{Suite, TestItem};

/// Loads a suite from `folder`.
///
/// # Errors
///
/// Returns a [`SetupError`] when a file cannot be read or parsed, a mapping
/// key is not a string, an unknown tag appears, or an `!env` node names an
/// unset environment variable.
pub fn load_suite(folder: &Path) -> Result<Suite, SetupError> {
    let options_path = folder.join("options.yml");
    let mut suite = if options_path.is_file() {
        load_file::<Option<Suite>>(&options_path)?.unwrap_or_default()
    } else {
        Suite::default()
    };
    let tests_dir = folder.join("tests");
    if tests_dir.is_dir() {
        for entry in WalkDir::new(&tests_dir)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yml" || ext == "yaml")
                && path.is_file()
            {
                debug!(path = %path.display(), "loading test file");
                // An empty file is an empty item list, not a load failure.
                let items: Option<Vec<TestItem>> = load_file(path)?;
                suite.tests.extend(items.unwrap_or_default());
            }
        }
    }
    Ok(suite)
}

/// Reads one YAML file, resolves its tags, and deserializes it. An empty
/// file deserializes from JSON null.
fn load_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, SetupError> {
    let display = path.display().to_string();
    let text = fs::read_to_string(path).map_err(|error| SetupError::Read {
        path: display.clone(),
        reason: error.to_string(),
    })?;
    let parsed: Yaml = serde_yaml::from_str(&text).map_err(|error| SetupError::Parse {
        path: display.clone(),
        reason: error.to_string(),
    })?;
    let resolved = resolve_tags(parsed, &display, &|name| std::env::var(name).ok())?;
    let json = to_json(resolved, &display)?;
    serde_json::from_value(json).map_err(|error| SetupError::Parse {
        path: display,
        reason: error.to_string(),
    })
}

/// Replaces every `!env NAME` scalar with the named environment value.
///
/// `lookup` is the environment seam; production passes `std::env::var`.
fn resolve_tags(
    value: Yaml,
    path: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Yaml, SetupError> {
    match value {
        Yaml::Tagged(tagged) => resolve_tagged(*tagged, path, lookup),
        Yaml::Sequence(items) => items
            .into_iter()
            .map(|item| resolve_tags(item, path, lookup))
            .collect::<Result<Vec<_>, _>>()
            .map(Yaml::Sequence),
        Yaml::Mapping(entries) => entries
            .into_iter()
            .map(|(key, value)| Ok((key, resolve_tags(value, path, lookup)?)))
            .collect::<Result<serde_yaml::Mapping, SetupError>>()
            .map(Yaml::Mapping),
        scalar => Ok(scalar),
    }
}

fn resolve_tagged(
    tagged: TaggedValue,
    path: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Yaml, SetupError> {
    if tagged.tag == "env" {
        let Yaml::String(name) = tagged.value else {
            return Err(SetupError::Parse {
                path: path.to_string(),
                reason: "!env expects an environment variable name".to_string(),
            });
        };
        let value = lookup(&name).ok_or(SetupError::MissingEnv { name })?;
        return Ok(Yaml::String(value));
    }
    Err(SetupError::Parse {
        path: path.to_string(),
        reason: format!("unknown tag '{}'", tagged.tag),
    })
}

/// Converts a resolved YAML tree into JSON for the serde item types. Only
/// string mapping keys are accepted.
fn to_json(value: Yaml, path: &str) -> Result<serde_json::Value, SetupError> {
    use serde_json::Value as Json;
    match value {
        Yaml::Null => Ok(Json::Null),
        Yaml::Bool(flag) => Ok(Json::Bool(flag)),
        Yaml::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(Json::from(int))
            } else if let Some(int) = number.as_u64() {
                Ok(Json::from(int))
            } else {
                let float = number.as_f64().and_then(serde_json::Number::from_f64);
                float.map(Json::Number).ok_or_else(|| SetupError::Parse {
                    path: path.to_string(),
                    reason: format!("number {number} has no JSON representation"),
                })
            }
        }
        Yaml::String(text) => Ok(Json::String(text)),
        Yaml::Sequence(items) => items
            .into_iter()
            .map(|item| to_json(item, path))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        Yaml::Mapping(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                let Yaml::String(key) = key else {
                    return Err(SetupError::Parse {
                        path: path.to_string(),
                        reason: "mapping keys must be strings".to_string(),
                    });
                };
                object.insert(key, to_json(value, path)?);
            }
            Ok(Json::Object(object))
        }
        Yaml::Tagged(tagged) => Err(SetupError::Parse {
            path: path.to_string(),
            reason: format!("unresolved tag '{}'", tagged.tag),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_loads_options_and_sorted_test_files() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "options.yml",
            "base: http://api.test\ntests:\n  - path: /from-options\n",
        );
        write(&dir, "tests/20-users.yml", "- path: /users\n- path: /users/1\n");
        write(&dir, "tests/10-health.yml", "- path: /health\n");
        let suite = load_suite(dir.path()).unwrap();
        assert_eq!(suite.base.as_deref(), Some("http://api.test"));
        let paths: Vec<_> = suite
            .tests
            .iter()
            .map(|item| item.path.as_deref().unwrap())
            .collect();
        assert_eq!(paths, vec!["/from-options", "/health", "/users", "/users/1"]);
    }

    #[test]
    fn test_folder_without_options_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "tests/smoke.yml", "- path: /ping\n  code: 200\n");
        let suite = load_suite(dir.path()).unwrap();
        assert_eq!(suite.base, None);
        assert_eq!(suite.tests.len(), 1);
        assert_eq!(suite.tests[0].path.as_deref(), Some("/ping"));
    }

    #[test]
    fn test_empty_files_load_as_empty() {
        let dir = TempDir::new().unwrap();
        write(&dir, "options.yml", "");
        write(&dir, "tests/placeholder.yml", "# nothing here yet\n");
        let suite = load_suite(dir.path()).unwrap();
        assert_eq!(suite.tests.len(), 0);
    }

    #[test]
    fn test_non_yml_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "tests/real.yml", "- path: /real\n");
        write(&dir, "tests/also-real.yaml", "- path: /also-real\n");
        write(&dir, "tests/notes.txt", "not yaml at all {{{");
        let suite = load_suite(dir.path()).unwrap();
        assert_eq!(suite.tests.len(), 2);
    }

    #[test]
    fn test_parse_failure_names_the_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "tests/bad.yml", "- path: [unclosed\n");
        let error = load_suite(dir.path()).unwrap_err();
        match error {
            SetupError::Parse { path, .. } => assert!(path.ends_with("bad.yml")),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_tag_resolves_through_lookup() {
        let parsed: Yaml = serde_yaml::from_str("token: !env API_TOKEN\n").unwrap();
        let resolved = resolve_tags(parsed, "options.yml", &|name| {
            (name == "API_TOKEN").then(|| "s3cret".to_string())
        })
        .unwrap();
        let json = to_json(resolved, "options.yml").unwrap();
        assert_eq!(json["token"], "s3cret");
    }

    #[test]
    fn test_missing_env_variable_is_a_setup_error() {
        let parsed: Yaml = serde_yaml::from_str("token: !env VOLLEY_NO_SUCH_VAR\n").unwrap();
        let error = resolve_tags(parsed, "options.yml", &|_| None).unwrap_err();
        assert_eq!(
            error,
            SetupError::MissingEnv {
                name: "VOLLEY_NO_SUCH_VAR".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let parsed: Yaml = serde_yaml::from_str("check: !type assertBody\n").unwrap();
        let error = resolve_tags(parsed, "tests/a.yml", &|_| None).unwrap_err();
        assert!(matches!(error, SetupError::Parse { .. }));
    }
}
