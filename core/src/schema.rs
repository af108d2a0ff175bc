//! Record layout: attribute types, schemas and tuple access.
//!
//! A tuple is the raw payload of a record laid out attribute by attribute in
//! schema order, every attribute occupying the fixed width of its type.
//! Integers are 4-byte little-endian.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Base attribute types. The discriminant is the on-disk type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    #[serde(alias = "character")]
    Char = 0,
    Varchar = 1,
    Bool = 2,
    Enum = 3,
    #[serde(alias = "integer")]
    Int = 4,
    Float = 5,
    Double = 6,
    Date = 7,
    Time = 8,
}

/// Fixed width of a varchar slot, including its terminator.
pub const VARCHAR_WIDTH: usize = 256;

impl AttrType {
    /// Bytes one value of this type occupies in a tuple.
    pub fn width(self) -> usize {
        match self {
            AttrType::Char | AttrType::Bool | AttrType::Enum => 1,
            AttrType::Varchar => VARCHAR_WIDTH,
            AttrType::Int | AttrType::Float => 4,
            AttrType::Double | AttrType::Time => 8,
            AttrType::Date => 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttrType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, ty: AttrType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Ordered attribute list governing a record payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Total payload size in bytes.
    pub fn size(&self) -> usize {
        self.attributes.iter().map(|a| a.ty.width()).sum()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Byte offset of the named attribute within a tuple.
    pub fn offset(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for attr in &self.attributes {
            if attr.name == name {
                return Some(offset);
            }
            offset += attr.ty.width();
        }
        None
    }

    /// First attribute declared as an integer, if any.
    pub fn first_integer(&self) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.ty == AttrType::Int)
    }

    /// Zeroed tuple buffer sized for this schema.
    pub fn new_tuple(&self) -> Vec<u8> {
        vec![0; self.size()]
    }

    /// Resolve which attribute carries the edge weight, and where it lives.
    pub fn weight_field(&self, selection: &WeightAttribute) -> Result<WeightField> {
        let attr = match selection {
            WeightAttribute::FirstInteger => {
                self.first_integer().ok_or(Error::NoWeightAttribute)?
            }
            WeightAttribute::Named(name) => {
                let attr = self
                    .attribute(name)
                    .ok_or_else(|| Error::UnknownAttribute(name.clone()))?;
                if attr.ty != AttrType::Int {
                    return Err(Error::WeightAttributeNotInteger(name.clone()));
                }
                attr
            }
        };
        // Present by construction: attr was found in self.
        let offset = self
            .offset(&attr.name)
            .ok_or_else(|| Error::UnknownAttribute(attr.name.clone()))?;
        Ok(WeightField {
            name: attr.name.clone(),
            offset,
        })
    }
}

/// How the weight attribute of an edge schema is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightAttribute {
    /// The first attribute whose type is `int`.
    #[default]
    FirstInteger,
    /// An explicitly named `int` attribute.
    Named(String),
}

/// A resolved weight attribute: its name and byte offset in the edge tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightField {
    pub name: String,
    pub offset: usize,
}

/// Decode a little-endian i32 at `offset`.
pub fn read_int(buf: &[u8], offset: usize) -> Result<i32> {
    let bytes = offset
        .checked_add(4)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| Error::corrupt(format!("tuple too short for int at offset {offset}")))?;
    let mut raw = [0u8; 4];
    raw.copy_from_slice(bytes);
    Ok(i32::from_le_bytes(raw))
}

/// Encode `value` as a little-endian i32 at `offset`.
pub fn write_int(buf: &mut [u8], offset: usize, value: i32) -> Result<()> {
    let len = buf.len();
    let slot = offset
        .checked_add(4)
        .and_then(|end| buf.get_mut(offset..end))
        .ok_or_else(|| Error::corrupt(format!("int at offset {offset} overruns {len}-byte tuple")))?;
    slot.copy_from_slice(&value.to_le_bytes());
    Ok(())
}
