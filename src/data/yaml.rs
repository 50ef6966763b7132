//! YAML processing utilities

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use yaml_rust_davvid::YamlEmitter;

/// Serialize data structure to YAML string with proper multi-line formatting
///
/// serde_yaml emits multi-line strings as quoted scalars with `\n` escapes,
/// which are unpleasant to edit by hand; yaml-rust's emitter writes literal
/// `|` blocks instead.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    let serde_value = serde_yaml::to_value(data).context("Failed to serialize to serde value")?;
    let yaml_rust_value = convert_serde_to_yaml_rust(&serde_value);

    let mut output = String::new();
    let mut emitter = YamlEmitter::new(&mut output);
    emitter.multiline_strings(true);
    emitter
        .dump(&yaml_rust_value)
        .context("Failed to emit YAML")?;

    Ok(output)
}

/// Convert serde_yaml::Value to yaml_rust_davvid::Yaml
fn convert_serde_to_yaml_rust(value: &serde_yaml::Value) -> yaml_rust_davvid::Yaml {
    use yaml_rust_davvid::Yaml;

    match value {
        serde_yaml::Value::Null => Yaml::Null,
        serde_yaml::Value::Bool(b) => Yaml::Boolean(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Yaml::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Yaml::Real(f.to_string())
            } else {
                Yaml::String(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => Yaml::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            Yaml::Array(seq.iter().map(convert_serde_to_yaml_rust).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut yaml_map = yaml_rust_davvid::yaml::Hash::new();
            for (k, v) in map {
                yaml_map.insert(convert_serde_to_yaml_rust(k), convert_serde_to_yaml_rust(v));
            }
            Yaml::Hash(yaml_map)
        }
        serde_yaml::Value::Tagged(tagged) => convert_serde_to_yaml_rust(&tagged.value),
    }
}

/// Deserialize YAML string to data structure
pub fn from_yaml<T: for<'de> Deserialize<'de>>(yaml: &str) -> Result<T> {
    serde_yaml::from_str(yaml).context("Failed to deserialize YAML")
}

/// Write data structure to YAML file
pub fn write_yaml_file<T: Serialize, P: AsRef<Path>>(data: &T, path: P) -> Result<()> {
    let yaml_content = to_yaml(data)?;

    fs::write(&path, yaml_content)
        .with_context(|| format!("Failed to write file: {}", path.as_ref().display()))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::data::PrContent;

    #[test]
    fn multiline_body_uses_literal_block() {
        let pr = PrContent {
            title: "feat: add login".to_string(),
            body: "## Summary\n\n- adds form\n- adds route".to_string(),
        };
        let yaml = to_yaml(&pr).unwrap();
        assert!(yaml.contains("body: |"), "unexpected YAML:\n{yaml}");

        let parsed: PrContent = from_yaml(&yaml).unwrap();
        assert_eq!(parsed.title, pr.title);
        assert_eq!(parsed.body.trim_end(), pr.body);
    }

    #[test]
    fn file_helpers_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pr.yaml");
        let pr = PrContent {
            title: "fix: crash".to_string(),
            body: "One line".to_string(),
        };

        write_yaml_file(&pr, &path).unwrap();
        let parsed: PrContent = from_yaml(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, pr);
    }

    #[test]
    fn invalid_yaml_is_error() {
        let result: Result<PrContent> = from_yaml("title: [unclosed");
        assert!(result.is_err());
    }
}
