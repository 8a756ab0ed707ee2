//! Type mapping from client model type expressions to intermediate representation
//!
//! Maps textual wire types such as `list<map<string, Sku>>` to our `WireType` IR.

use provisioning_generator_common::{PrimitiveType, WireType};

/// Maps type expressions to WireType
pub struct TypeMapper;

impl TypeMapper {
    /// Map a type expression to WireType
    ///
    /// # Examples
    /// ```
    /// use provisioning_generator_parser::TypeMapper;
    /// use provisioning_generator_common::{PrimitiveType, WireType};
    ///
    /// assert_eq!(TypeMapper::map_type("string"), WireType::Primitive(PrimitiveType::String));
    /// assert_eq!(TypeMapper::map_type("int64"), WireType::Primitive(PrimitiveType::Int64));
    /// assert_eq!(
    ///     TypeMapper::map_type("list<bool>"),
    ///     WireType::List(Box::new(WireType::Primitive(PrimitiveType::Boolean)))
    /// );
    /// ```
    pub fn map_type(expression: &str) -> WireType {
        let type_str = expression.trim();

        if let Some(primitive) = Self::map_primitive(type_str) {
            return WireType::Primitive(primitive);
        }

        if let Some(element) = type_str.strip_suffix("[]") {
            return WireType::List(Box::new(Self::map_type(element)));
        }

        if let Some((outer, inner)) = Self::split_generic(type_str) {
            return match outer.to_ascii_lowercase().as_str() {
                "list" | "array" | "vec" => WireType::List(Box::new(Self::map_type(inner))),
                "dict" | "dictionary" => WireType::Map(Box::new(Self::map_type(inner))),
                "map" | "hashmap" => {
                    let parts = Self::split_top_level(inner);
                    match parts.as_slice() {
                        [value] => WireType::Map(Box::new(Self::map_type(value))),
                        [key, value]
                            if Self::map_primitive(key.trim()) == Some(PrimitiveType::String) =>
                        {
                            WireType::Map(Box::new(Self::map_type(value)))
                        },
                        // Only string keys can be expressed on the wire
                        _ => WireType::Unsupported(type_str.to_string()),
                    }
                },
                _ => WireType::Unsupported(type_str.to_string()),
            };
        }

        if Self::is_identifier(type_str) {
            WireType::Model(type_str.to_string())
        } else {
            WireType::Unsupported(type_str.to_string())
        }
    }

    /// Map a builtin type name, case-insensitively
    pub fn map_primitive(name: &str) -> Option<PrimitiveType> {
        let primitive = match name.to_ascii_lowercase().as_str() {
            "string" | "str" => PrimitiveType::String,
            "int" | "int32" | "integer" => PrimitiveType::Int32,
            "int64" | "long" => PrimitiveType::Int64,
            "float" | "float32" => PrimitiveType::Float32,
            "float64" | "double" | "number" => PrimitiveType::Float64,
            "bool" | "boolean" => PrimitiveType::Boolean,
            "date-time" | "datetime" | "offsetdatetime" => PrimitiveType::DateTime,
            "duration" => PrimitiveType::Duration,
            "uuid" => PrimitiveType::Uuid,
            "url" | "uri" => PrimitiveType::Url,
            "binary" | "bytes" | "byte[]" => PrimitiveType::Binary,
            "object" | "any" => PrimitiveType::Object,
            _ => return None,
        };
        Some(primitive)
    }

    /// Check if a field name suggests it's sensitive
    pub fn is_sensitive(field_name: &str) -> bool {
        let lower = field_name.to_lowercase();
        lower.contains("password")
            || lower.contains("secret")
            || lower.ends_with("key")
            || lower.contains("token")
            || lower.contains("credential")
    }

    /// Split `outer<inner>` into its parts
    fn split_generic(type_str: &str) -> Option<(&str, &str)> {
        let open = type_str.find('<')?;
        let inner = type_str[open + 1..].strip_suffix('>')?;
        Some((type_str[..open].trim(), inner))
    }

    /// Split on commas that are not nested inside angle brackets
    fn split_top_level(inner: &str) -> Vec<&str> {
        let mut parts = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, c) in inner.char_indices() {
            match c {
                '<' => depth += 1,
                '>' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&inner[start..i]);
                    start = i + 1;
                },
                _ => {},
            }
        }
        parts.push(&inner[start..]);
        parts
    }

    fn is_identifier(type_str: &str) -> bool {
        !type_str.is_empty()
            && type_str
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && type_str
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    }
}
