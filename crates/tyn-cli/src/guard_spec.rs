//! Textual guard descriptors for `tyn narrow`.
//!
//! | spec                     | guard                          |
//! |--------------------------|--------------------------------|
//! | `typeof:string`          | `typeof x === "string"`        |
//! | `truthy`                 | `if (x)`                       |
//! | `nullish`                | `x == null`                    |
//! | `eq:"a"`                 | `x === "a"`                    |
//! | `in:swim`                | `"swim" in x`                  |
//! | `instanceof:Dog`         | `x instanceof Dog`             |
//! | `discriminant:kind=circle` | `x.kind === "circle"`        |
//! | `predicate:Fish`         | `isFish(x)`                    |
//! | `asserts` / `asserts:Fish` | `assert(x)` / `assertIsFish(x)` |

use anyhow::{Result, anyhow, bail};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tyn_lowering::TypeLowering;
use tyn_solver::{TypeGuard, TypeTag};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardSpec {
    Typeof(String),
    Truthy,
    Nullish,
    Equality(String),
    In(String),
    Instanceof(String),
    Discriminant { property: String, value: String },
    Predicate(String),
    Asserts(Option<String>),
}

impl GuardSpec {
    pub fn is_assertion(&self) -> bool {
        matches!(self, GuardSpec::Asserts(_))
    }

    /// Lower the annotations the guard mentions. Unresolvable names are
    /// reported through the lowering's diagnostics and become `error`.
    pub fn resolve(&self, lowering: &TypeLowering<'_>) -> Result<TypeGuard> {
        let db = lowering.db();
        Ok(match self {
            GuardSpec::Typeof(tag) => TypeGuard::Typeof(
                TypeTag::from_typeof(tag).ok_or_else(|| anyhow!("unknown typeof tag '{tag}'"))?,
            ),
            GuardSpec::Truthy => TypeGuard::Truthy,
            GuardSpec::Nullish => TypeGuard::NullishEquality,
            GuardSpec::Equality(value) => {
                TypeGuard::Equality(lowering.lower_annotation(&literal_annotation(value)))
            }
            GuardSpec::In(property) => TypeGuard::InProperty(db.intern_string(property)),
            GuardSpec::Instanceof(class_name) => {
                TypeGuard::Instanceof(lowering.lower_annotation(class_name))
            }
            GuardSpec::Discriminant { property, value } => TypeGuard::Discriminant {
                property_name: db.intern_string(property),
                value_type: lowering.lower_annotation(&literal_annotation(value)),
            },
            GuardSpec::Predicate(target) => TypeGuard::Predicate {
                type_id: Some(lowering.lower_annotation(target)),
                asserts: false,
            },
            GuardSpec::Asserts(target) => TypeGuard::Predicate {
                type_id: target.as_deref().map(|t| lowering.lower_annotation(t)),
                asserts: true,
            },
        })
    }
}

impl FromStr for GuardSpec {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        let (kind, rest) = match text.split_once(':') {
            Some((kind, rest)) => (kind.trim(), Some(rest.trim())),
            None => (text, None),
        };
        let required = |what: &str| -> Result<String> {
            match rest {
                Some(rest) if !rest.is_empty() => Ok(rest.to_string()),
                _ => bail!("guard '{kind}' requires {what}, e.g. '{kind}:<{what}>'"),
            }
        };

        Ok(match kind {
            "typeof" => {
                let tag = required("tag")?;
                if TypeTag::from_typeof(&tag).is_none() {
                    bail!("unknown typeof tag '{tag}'");
                }
                GuardSpec::Typeof(tag)
            }
            "truthy" => GuardSpec::Truthy,
            "nullish" => GuardSpec::Nullish,
            "eq" => GuardSpec::Equality(required("value")?),
            "in" => GuardSpec::In(required("property")?),
            "instanceof" => GuardSpec::Instanceof(required("class")?),
            "discriminant" => {
                let pair = required("property=value")?;
                let (property, value) = pair
                    .split_once('=')
                    .ok_or_else(|| anyhow!("discriminant guard must be 'property=value'"))?;
                let (property, value) = (property.trim(), value.trim());
                if property.is_empty() || value.is_empty() {
                    bail!("discriminant guard must be 'property=value'");
                }
                GuardSpec::Discriminant {
                    property: property.to_string(),
                    value: value.to_string(),
                }
            }
            "predicate" => GuardSpec::Predicate(required("type")?),
            "asserts" => GuardSpec::Asserts(rest.filter(|r| !r.is_empty()).map(str::to_string)),
            other => bail!(
                "unknown guard '{other}' (expected typeof, truthy, nullish, eq, in, instanceof, discriminant, predicate or asserts)"
            ),
        })
    }
}

impl fmt::Display for GuardSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardSpec::Typeof(tag) => write!(f, "typeof x === \"{tag}\""),
            GuardSpec::Truthy => write!(f, "x"),
            GuardSpec::Nullish => write!(f, "x == null"),
            GuardSpec::Equality(value) => write!(f, "x === {}", literal_annotation(value)),
            GuardSpec::In(property) => write!(f, "\"{property}\" in x"),
            GuardSpec::Instanceof(class_name) => write!(f, "x instanceof {class_name}"),
            GuardSpec::Discriminant { property, value } => {
                write!(f, "x.{property} === {}", literal_annotation(value))
            }
            GuardSpec::Predicate(target) => write!(f, "x is {target}"),
            GuardSpec::Asserts(Some(target)) => write!(f, "asserts x is {target}"),
            GuardSpec::Asserts(None) => write!(f, "asserts x"),
        }
    }
}

/// Bare words in a literal position are string literals: `circle` is
/// `"circle"`. Quoted strings, numbers, bigints and literal keywords are
/// kept as written.
pub fn literal_annotation(text: &str) -> Cow<'_, str> {
    let text = text.trim();
    let is_literal = text.starts_with('"')
        || text.starts_with('\'')
        || matches!(text, "true" | "false" | "null" | "undefined")
        || is_numeric_literal(text);
    if is_literal {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")))
    }
}

fn is_numeric_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let digits = digits.strip_suffix('n').unwrap_or(digits);
    !digits.is_empty()
        && digits.starts_with(|c: char| c.is_ascii_digit())
        && digits.parse::<f64>().is_ok()
}
