//! Utilities for case-insensitive enum serialization/deserialization
//!
//! This module provides macros and utilities to help with case-insensitive
//! handling of enum variants in JSON and other serialization formats.

/// Macro to implement case-insensitive deserialization for enums with simple string variants.
///
/// This macro generates a custom `Deserialize` implementation for an enum that makes
/// variant string matching case-insensitive. It works with enums that use string
/// representation in serialization (e.g., with `#[serde(tag = "type")]`).
///
/// The generated implementation will match variant names case-insensitively, so both
/// `"variant1"` and `"VARIANT1"` will be deserialized as `MyEnum::Variant1`.
#[macro_export]
macro_rules! impl_case_insensitive_enum {
    ($enum_name:ident, { $($variant_str:expr => $variant:ident),* $(,)? }) => {
        impl<'de> ::serde::Deserialize<'de> for $enum_name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                use ::serde::de::{self, MapAccess, Visitor};
                use std::fmt;

                struct EnumVisitor;

                impl<'de> Visitor<'de> for EnumVisitor {
                    type Value = $enum_name;

                    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                        formatter.write_str(concat!("a struct with a `type` field for ", stringify!($enum_name)))
                    }

                    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
                    where
                        M: MapAccess<'de>,
                    {
                        let mut type_: Option<String> = None;
                        let mut value: Option<::serde_json::Value> = None;

                        while let Some(key) = map.next_key::<String>()? {
                            if key == "type" {
                                type_ = Some(map.next_value()?);
                            } else if key == "value" {
                                value = Some(map.next_value()?);
                            } else {
                                let _: ::serde_json::Value = map.next_value()?;
                            }
                        }

                        let type_ = type_.ok_or_else(|| de::Error::missing_field("type"))?;
                        let value = value.ok_or_else(|| de::Error::missing_field("value"))?;
                        let type_lowercase = type_.to_lowercase();

                        match type_lowercase.as_str() {
                            $(
                                $variant_str => {
                                    let content = ::serde_json::from_value::<String>(value)
                                        .map_err(|e| de::Error::custom(format!(
                                            concat!("invalid ", $variant_str, " value: {}"), e
                                        )))?;
                                    Ok($enum_name::$variant(content.into()))
                                },
                            )*
                            _ => Err(de::Error::unknown_variant(
                                &type_,
                                &[$($variant_str),*],
                            )),
                        }
                    }
                }

                deserializer.deserialize_map(EnumVisitor)
            }
        }
    };
}
