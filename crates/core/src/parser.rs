//! Fixture document parsers.
//!
//! Both formats are read whole into memory, decoded into an ordered
//! `serde_json::Value` and then classified into a [`Tree`].
//!
//! YAML merge keys (`<<: *anchor`) are applied before conversion. Tags are
//! dropped and non-finite floats are rejected.

use crate::error::ParseError;
use crate::tree::Tree;
use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Turns an input stream into a [`Tree`].
pub trait Parser: Send + Sync {
    fn parse(&self, reader: &mut dyn Read) -> Result<Tree, ParseError>;
}

impl<F> Parser for F
where
    F: Fn(&mut dyn Read) -> Result<Tree, ParseError> + Send + Sync,
{
    fn parse(&self, reader: &mut dyn Read) -> Result<Tree, ParseError> {
        self(reader)
    }
}

/// JSON fixture parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, reader: &mut dyn Read) -> Result<Tree, ParseError> {
        let data = read_all(reader)?;
        let json: JsonValue = serde_json::from_slice(&data)?;
        Tree::from_json(json)
    }
}

/// YAML fixture parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl Parser for YamlParser {
    fn parse(&self, reader: &mut dyn Read) -> Result<Tree, ParseError> {
        let data = read_all(reader)?;
        let mut yaml: YamlValue = serde_yaml::from_slice(&data)?;
        yaml.apply_merge()?;
        Tree::from_json(yaml_to_json(yaml, "")?)
    }
}

fn yaml_to_json(value: YamlValue, path: &str) -> Result<JsonValue, ParseError> {
    Ok(match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(JsonValue::Number)
                    .ok_or_else(|| ParseError::NonFiniteNumber {
                        path: path.to_string(),
                    })?
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(items) => JsonValue::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| yaml_to_json(item, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = match key {
                    YamlValue::String(s) => s,
                    YamlValue::Bool(b) => b.to_string(),
                    YamlValue::Number(n) => n.to_string(),
                    _ => {
                        return Err(ParseError::UnsupportedKey {
                            path: path.to_string(),
                        })
                    }
                };
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                object.insert(key, yaml_to_json(value, &child)?);
            }
            JsonValue::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value, path)?,
    })
}

fn read_all(reader: &mut dyn Read) -> Result<Vec<u8>, ParseError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(data)
}

/// Fixture document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    pub fn parser(self) -> Box<dyn Parser> {
        match self {
            Format::Json => Box::new(JsonParser),
            Format::Yaml => Box::new(YamlParser),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("unknown format '{other}', expected json or yaml")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Yaml => f.write_str("yaml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Value;
    use serde_json::json;

    const YAML_INPUT: &str = "users:
- id: 1
  name: Roman
- id: 2
  name: Dmitry
all:
- group: first
- group: second
";

    #[test]
    fn test_json_parser() {
        let mut input = r#"{"users":[{"id":1,"name":"Roman"}],"count":1}"#.as_bytes();
        let tree = JsonParser.parse(&mut input).unwrap();

        assert_eq!(tree.names().collect::<Vec<_>>(), vec!["users", "count"]);
        assert_eq!(tree.entries()[1].1, Value::Leaf(json!(1)));
    }

    #[test]
    fn test_yaml_parser_keeps_order() {
        let mut input = YAML_INPUT.as_bytes();
        let tree = YamlParser.parse(&mut input).unwrap();

        assert_eq!(tree.names().collect::<Vec<_>>(), vec!["users", "all"]);
        let Value::RecordSequence(users) = &tree.entries()[0].1 else {
            panic!("expected users to be a record sequence");
        };
        assert_eq!(users.len(), 2);
        let fields: Vec<&str> = users[1].fields().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(fields, vec!["id", "name"]);
        assert_eq!(users[1].get("name"), Some(&Value::Leaf(json!("Dmitry"))));
    }

    #[test]
    fn test_yaml_merge_keys() {
        let mut input = "base: &base {x: 1, z: 0}\nt:\n- <<: *base\n  y: 2\n  z: 3\n".as_bytes();
        let tree = YamlParser.parse(&mut input).unwrap();

        let Value::RecordSequence(rows) = &tree.entries()[1].1 else {
            panic!("expected t to be a record sequence");
        };
        assert!(rows[0].get("<<").is_none());
        assert_eq!(rows[0].get("x"), Some(&Value::Leaf(json!(1))));
        assert_eq!(rows[0].get("y"), Some(&Value::Leaf(json!(2))));
        assert_eq!(rows[0].get("z"), Some(&Value::Leaf(json!(3))));
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn test_yaml_non_finite_numbers_are_rejected() {
        for scalar in [".nan", ".inf", "-.inf"] {
            let input = format!("t:\n- id: 1\n  score: {scalar}\n");
            let err = YamlParser.parse(&mut input.as_bytes()).unwrap_err();
            assert!(
                matches!(err, ParseError::NonFiniteNumber { ref path } if path == "t[0].score"),
                "{scalar}: {err}"
            );
        }
    }

    #[test]
    fn test_yaml_scalars_survive_conversion() {
        let mut input = "t:\n- big: 18446744073709551615\n  neg: -3\n  f: 1.5\n  tagged: !code abc\n  1: one\n".as_bytes();
        let tree = YamlParser.parse(&mut input).unwrap();

        let Value::RecordSequence(rows) = &tree.entries()[0].1 else {
            panic!("expected t to be a record sequence");
        };
        assert_eq!(rows[0].get("big"), Some(&Value::Leaf(json!(u64::MAX))));
        assert_eq!(rows[0].get("neg"), Some(&Value::Leaf(json!(-3))));
        assert_eq!(rows[0].get("f"), Some(&Value::Leaf(json!(1.5))));
        assert_eq!(rows[0].get("tagged"), Some(&Value::Leaf(json!("abc"))));
        assert_eq!(rows[0].get("1"), Some(&Value::Leaf(json!("one"))));
    }

    #[test]
    fn test_malformed_input() {
        let mut input = r#"{"users": [}"#.as_bytes();
        assert!(matches!(
            JsonParser.parse(&mut input),
            Err(ParseError::Json(_))
        ));

        let mut input = "users: [unclosed".as_bytes();
        assert!(matches!(
            YamlParser.parse(&mut input),
            Err(ParseError::Yaml(_))
        ));
    }

    #[test]
    fn test_root_must_be_a_mapping() {
        let mut input = "- id: 1".as_bytes();
        assert!(matches!(
            YamlParser.parse(&mut input),
            Err(ParseError::NotAMapping { .. })
        ));
    }

    #[test]
    fn test_closure_parser() {
        let parser = |_: &mut dyn Read| -> Result<Tree, ParseError> { Ok(Tree::default()) };
        let tree = parser.parse(&mut "ignored".as_bytes()).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path(Path::new("seed.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("seed.YML")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("fixtures/seed.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("seed.txt")), None);
        assert_eq!("yaml".parse::<Format>(), Ok(Format::Yaml));
        assert!("toml".parse::<Format>().is_err());
    }
}
