//! Loading and saving compiled registration-group tables.
//!
//! A compiled table is a JSON object keyed by ean prefix. Each value is a
//! prefix tree where:
//!
//! - single-digit keys lead to child nodes,
//! - `"_"` holds the registrant ranges by length and marks the node terminal,
//! - `"a"`, `"c"` and `"l"` hold the agency name, country code or language
//!   code of a terminal node.
//!
//! ```json
//! {
//!   "978": {
//!     "0": { "_": { "2": [[0, 19]], "3": [[200, 699]] }, "l": "EN" },
//!     "9": { "2": { "_": { "1": [[0, 5]] }, "a": "International NGO Publishers" } }
//!   }
//! }
//! ```
//!
//! When a node carries more than one agency tag, the name wins over the
//! country code, which wins over the language code.
//!
//! # Examples
//!
//! ```
//! use bookland::{Agency, RegistrationGroups};
//!
//! let groups = RegistrationGroups::from_json_str(
//!     r#"{"978": {"4": {"_": {"2": [[0, 19]], "3": [[200, 699]]}, "c": "JP"}}}"#,
//! )?;
//! let isbn = groups.parse("4-19-830127-1");
//! assert_eq!(isbn.agency(), Some(&Agency::CountryCode("JP".into())));
//! assert_eq!(isbn.code_parts().map(|p| p.as_strs()), Some(["4", "19", "830127"]));
//! # Ok::<(), bookland::RegistryError>(())
//! ```

use crate::error::{DataPath, Result};
use crate::registration_group::{
    is_ean_prefix, Agency, PrefixNode, RegistrationGroup, RegistrationGroups,
    MAX_REGISTRANT_LENGTH,
};
use log::debug;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const RANGES_KEY: &str = "_";
const NAME_KEY: &str = "a";
const COUNTRY_CODE_KEY: &str = "c";
const LANG_CODE_KEY: &str = "l";

impl RegistrationGroups {
    /// Build a table from a parsed compiled table.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidData`](crate::RegistryError::InvalidData)
    /// naming the offending path if the value does not follow the compiled
    /// table format.
    pub fn from_json(json: &Value) -> Result<Self> {
        let root = DataPath::default();
        let object = json
            .as_object()
            .ok_or_else(|| root.error("expected an object keyed by ean prefix"))?;

        let mut groups = Self::new();
        for (ean_prefix, tree) in object {
            let path = root.child(ean_prefix);
            if !is_ean_prefix(ean_prefix) {
                return Err(path.error("ean prefix must be three digits"));
            }
            let tree_object = tree
                .as_object()
                .ok_or_else(|| path.error("expected an object"))?;
            if let Some(key) = tree_object.keys().find(|key| !is_digit_key(key)) {
                return Err(path
                    .child(key)
                    .error("tree root only holds single-digit children"));
            }
            groups.insert_tree(ean_prefix.clone(), node_from_json(tree_object, &path)?);
        }

        debug!(
            "loaded {} registration groups under {} ean prefixes",
            groups.group_count(),
            object.len()
        );
        Ok(groups)
    }

    /// Build a table from compiled-table JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Json`](crate::RegistryError::Json) if the text
    /// is not JSON, or [`RegistryError::InvalidData`](crate::RegistryError::InvalidData)
    /// as for [`from_json`](RegistrationGroups::from_json).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Build a table from a reader of compiled-table JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the data is not a valid table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json(&value)
    }

    /// Build a table from a compiled-table JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`](crate::RegistryError::Io) if the file
    /// cannot be opened, or any error of
    /// [`from_reader`](RegistrationGroups::from_reader).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading registration groups from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Write the table in the compiled table format.
    ///
    /// The output loads back into an equal table with
    /// [`from_json`](RegistrationGroups::from_json).
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for ean_prefix in self.ean_prefixes() {
            if let Some(tree) = self.tree(ean_prefix) {
                object.insert(ean_prefix.to_string(), node_to_json(tree));
            }
        }
        Value::Object(object)
    }
}

fn is_digit_key(key: &str) -> bool {
    key.len() == 1 && key.bytes().all(|b| b.is_ascii_digit())
}

fn node_from_json(object: &Map<String, Value>, path: &DataPath) -> Result<PrefixNode> {
    let mut node = PrefixNode::new();

    for (key, value) in object {
        let child_path = path.child(key);
        match key.as_str() {
            RANGES_KEY | NAME_KEY | COUNTRY_CODE_KEY | LANG_CODE_KEY => {},
            digit if is_digit_key(digit) => {
                let child = value
                    .as_object()
                    .ok_or_else(|| child_path.error("expected an object"))?;
                if let Some(ch) = digit.chars().next() {
                    *node.child_mut(ch) = node_from_json(child, &child_path)?;
                }
            },
            _ => return Err(child_path.error("unknown key")),
        }
    }

    match object.get(RANGES_KEY) {
        Some(ranges) => {
            node.set_group(group_from_json(object, ranges, path)?);
        },
        None => {
            if let Some(tag) = [NAME_KEY, COUNTRY_CODE_KEY, LANG_CODE_KEY]
                .into_iter()
                .find(|tag| object.contains_key(*tag))
            {
                return Err(path
                    .child(tag)
                    .error("agency tag on a node without ranges"));
            }
        },
    }

    Ok(node)
}

fn group_from_json(
    object: &Map<String, Value>,
    ranges: &Value,
    path: &DataPath,
) -> Result<RegistrationGroup> {
    let mut group = RegistrationGroup::new(agency_from_json(object, path)?);

    let ranges_path = path.child(RANGES_KEY);
    let by_length = ranges
        .as_object()
        .ok_or_else(|| ranges_path.error("expected an object keyed by registrant length"))?;

    for (length_key, list) in by_length {
        let length_path = ranges_path.child(length_key);
        let length = length_key
            .parse::<u8>()
            .ok()
            .filter(|length| (1..=MAX_REGISTRANT_LENGTH).contains(length))
            .ok_or_else(|| {
                length_path.error(format!(
                    "registrant length must be between 1 and {MAX_REGISTRANT_LENGTH}"
                ))
            })?;
        let list = list
            .as_array()
            .ok_or_else(|| length_path.error("expected an array of ranges"))?;

        for (i, range) in list.iter().enumerate() {
            let range_path = length_path.child(&i.to_string());
            let (low, high) = range_from_json(range, &range_path)?;
            group.add_range(length, low, high);
        }
    }

    Ok(group)
}

fn range_from_json(value: &Value, path: &DataPath) -> Result<(u32, u32)> {
    let bound = |value: &Value| {
        value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| path.error("range bounds must be non-negative integers"))
    };

    match value.as_array().map(Vec::as_slice) {
        Some([low, high]) => {
            let (low, high) = (bound(low)?, bound(high)?);
            if low > high {
                return Err(path.error(format!("empty range {low}..={high}")));
            }
            Ok((low, high))
        },
        _ => Err(path.error("expected a [low, high] pair")),
    }
}

fn agency_from_json(object: &Map<String, Value>, path: &DataPath) -> Result<Agency> {
    let tag = |key: &str| -> Result<Option<String>> {
        match object.get(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(path.child(key).error("expected a string")),
        }
    };

    let name = tag(NAME_KEY)?;
    let country_code = tag(COUNTRY_CODE_KEY)?;
    let lang_code = tag(LANG_CODE_KEY)?;

    Ok(if let Some(name) = name {
        Agency::Name(name)
    } else if let Some(code) = country_code {
        Agency::CountryCode(code)
    } else if let Some(code) = lang_code {
        Agency::LangCode(code)
    } else {
        Agency::Unspecified
    })
}

fn node_to_json(node: &PrefixNode) -> Value {
    let mut object = Map::new();

    if let Some(group) = node.group() {
        let mut ranges = Map::new();
        for (length, list) in group.ranges_by_length() {
            let list = list
                .iter()
                .map(|range| Value::from(vec![*range.start(), *range.end()]))
                .collect();
            ranges.insert(length.to_string(), Value::Array(list));
        }
        object.insert(RANGES_KEY.to_string(), Value::Object(ranges));

        let tag = match group.agency() {
            Agency::Name(name) => Some((NAME_KEY, name)),
            Agency::CountryCode(code) => Some((COUNTRY_CODE_KEY, code)),
            Agency::LangCode(code) => Some((LANG_CODE_KEY, code)),
            Agency::Unspecified => None,
        };
        if let Some((key, value)) = tag {
            object.insert(key.to_string(), Value::String(value.clone()));
        }
    }

    for (digit, child) in node.children() {
        object.insert(digit.to_string(), node_to_json(child));
    }

    Value::Object(object)
}
