use crate::ir_map::IrProperty;
use serde_json::Value as JsonValue;

/// A custom property as declared in the map. Values are kept as text, never evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProperty {
    /// Property name.
    pub name: String,
    /// Tiled type tag (`string`, `int`, `bool`, ...); `string` when the source omits it.
    pub kind: String,
    /// Value as text; non-string JSON values are rendered as JSON.
    pub value: String,
}

impl CustomProperty {
    /// Converts the intermediate shape.
    pub fn from_ir(prop: IrProperty) -> Self {
        let value = match prop.value {
            JsonValue::Null => String::new(),
            JsonValue::String(s) => s,
            other => other.to_string(),
        };
        Self {
            name: prop.name,
            kind: prop.kind,
            value,
        }
    }
}

pub(crate) fn properties_from_ir(props: Vec<IrProperty>) -> Vec<CustomProperty> {
    props.into_iter().map(CustomProperty::from_ir).collect()
}

/// First property called `name`.
pub fn find_property<'a>(props: &'a [CustomProperty], name: &str) -> Option<&'a CustomProperty> {
    props.iter().find(|p| p.name == name)
}
