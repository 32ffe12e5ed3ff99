//! Collision attributes encoded in material names
//!
//! `MAT{attribute}_FLAG{flag}`, `MAT{attribute}` and `FLAG{flag}` are
//! recognised. Numbers that fail to parse read as zero.

use std::fmt;

/// Material attribute and collision flag carried by a material name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialCode {
    /// Surface material id
    pub attribute: u32,
    /// Collision flag bitmask
    pub flag: u64,
}

impl MaterialCode {
    /// Create a code
    pub fn new(attribute: u32, flag: u64) -> Self {
        Self { attribute, flag }
    }

    /// Decode a material name, or `None` if it follows none of the forms
    pub fn parse(name: &str) -> Option<Self> {
        let parts: Vec<&str> = name.split('_').collect();
        if let [attribute, flag] = parts.as_slice() {
            return Some(Self {
                attribute: number(attribute.trim_start_matches("MAT")),
                flag: number(flag.trim_start_matches("FLAG")),
            });
        }

        if let Some(attribute) = name.strip_prefix("MAT") {
            Some(Self {
                attribute: number(attribute),
                flag: 0,
            })
        } else {
            name.strip_prefix("FLAG").map(|flag| Self {
                attribute: 0,
                flag: number(flag),
            })
        }
    }
}

fn number<T: std::str::FromStr + Default>(text: &str) -> T {
    text.parse().unwrap_or_default()
}

impl fmt::Display for MaterialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAT{}_FLAG{}", self.attribute, self.flag)
    }
}
