//! Type-Descriptor Emitter
//!
//! Machine-readable structural description of the schema, one entry per type
//! keyed by name in registration order. Shape:
//!
//! ```text
//! {
//!   "version": 1,
//!   "sdlChecksum": "<sha256 of the SDL document>",
//!   "roots": { "query": "Query" },
//!   "types": {
//!     "Post": {
//!       "kind": "object",
//!       "interfaces": ["Node"],
//!       "fields": [
//!         { "name": "id", "type": "ID", "targetKind": "scalar", "nullable": false, "list": false }
//!       ]
//!     }
//!   }
//! }
//! ```

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::checksum::Checksum;
use crate::config::OutputFormat;
use crate::declaration::TypeKind;
use crate::error::Result;
use crate::schema::{Schema, SchemaType, TypeTarget};

use super::sdl::emit_sdl;

/// Bumped whenever the descriptor shape changes incompatibly
pub const DESCRIPTOR_VERSION: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    version: u32,
    sdl_checksum: String,
    roots: Roots<'a>,
    types: TypeMap<'a>,
}

#[derive(Serialize)]
struct Roots<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mutation: Option<&'a str>,
}

/// Serialized as a JSON object, preserving insertion order
struct TypeMap<'a>(Vec<(&'a str, TypeEntry<'a>)>);

impl Serialize for TypeMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TypeEntry<'a> {
    kind: TypeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    interfaces: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    implementors: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldEntry<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<ValueEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldEntry<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_name: &'a str,
    target_kind: TypeKind,
    nullable: bool,
    list: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    item_nullable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deprecated: Option<&'a str>,
}

#[derive(Serialize)]
struct ValueEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deprecated: Option<&'a str>,
}

/// Render the type-descriptor document
pub fn emit_descriptor(schema: &Schema, format: OutputFormat) -> Result<String> {
    let document = Document {
        version: DESCRIPTOR_VERSION,
        sdl_checksum: Checksum::from_content(&emit_sdl(schema)).to_string(),
        roots: Roots {
            query: schema.query_root().map(|t| t.name()),
            mutation: schema.mutation_root().map(|t| t.name()),
        },
        types: TypeMap(
            schema
                .types()
                .map(|ty| (ty.name(), describe_type(schema, ty)))
                .collect(),
        ),
    };

    let mut output = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(&document)?,
        OutputFormat::Compact => serde_json::to_string(&document)?,
    };
    output.push('\n');
    Ok(output)
}

fn describe_type<'a>(schema: &'a Schema, ty: &'a SchemaType) -> TypeEntry<'a> {
    let names = |ids: &[crate::schema::TypeId]| -> Vec<&'a str> {
        ids.iter().map(|id| schema.ty(*id).name()).collect()
    };

    TypeEntry {
        kind: ty.kind(),
        description: ty.description(),
        interfaces: names(ty.interfaces()),
        implementors: names(ty.implementors()),
        fields: ty
            .fields()
            .iter()
            .map(|field| FieldEntry {
                name: field.name(),
                type_name: schema.target_name(field.target()),
                target_kind: match field.target() {
                    TypeTarget::Builtin(_) => TypeKind::Scalar,
                    TypeTarget::Declared(id) => schema.ty(id).kind(),
                },
                nullable: field.ty().is_nullable(),
                list: field.ty().is_list(),
                item_nullable: field.ty().is_list().then(|| field.ty().is_item_nullable()),
                description: field.description(),
                deprecated: field.deprecated(),
            })
            .collect(),
        values: ty
            .values()
            .iter()
            .map(|value| ValueEntry {
                name: &value.name,
                description: value.description.as_deref(),
                deprecated: value.deprecated.as_deref(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::SchemaAssembler;
    use crate::declaration::{FieldDeclaration, FieldType, TypeDeclaration};
    use crate::registry::TypeRegistry;
    use serde_json::json;

    fn field(name: &str, ty: &str) -> FieldDeclaration {
        FieldDeclaration::new(name, FieldType::parse(ty).unwrap())
    }

    fn schema() -> Schema {
        let mut registry = TypeRegistry::new();
        registry
            .register_all([
                TypeDeclaration::enumeration("Role").values(["ADMIN", "MEMBER"]).build(),
                TypeDeclaration::interface("Node").field(field("id", "ID!")).build(),
                TypeDeclaration::object("User")
                    .implements("Node")
                    .field(field("id", "ID!"))
                    .field(field("roles", "[Role!]!"))
                    .build(),
            ])
            .unwrap();
        SchemaAssembler::new(&registry).assemble().unwrap()
    }

    #[test]
    fn test_descriptor_shape() {
        let schema = schema();
        let text = emit_descriptor(&schema, OutputFormat::Pretty).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["version"], json!(1));
        assert_eq!(value["roots"], json!({}));
        assert_eq!(value["types"]["Node"]["implementors"], json!(["User"]));
        assert_eq!(
            value["types"]["User"]["fields"][1],
            json!({
                "name": "roles",
                "type": "Role",
                "targetKind": "enum",
                "nullable": false,
                "list": true,
                "itemNullable": false
            })
        );
        assert_eq!(value["types"]["Role"]["values"], json!([{ "name": "ADMIN" }, { "name": "MEMBER" }]));
    }

    #[test]
    fn test_types_keep_registration_order() {
        let text = emit_descriptor(&schema(), OutputFormat::Compact).unwrap();
        let role = text.find("\"Role\":").unwrap();
        let node = text.find("\"Node\":").unwrap();
        let user = text.find("\"User\":").unwrap();
        assert!(role < node && node < user);
        assert!(!text.trim_end().contains('\n'));
    }

    #[test]
    fn test_checksum_pairs_with_sdl() {
        let schema = schema();
        let text = emit_descriptor(&schema, OutputFormat::Compact).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let expected = Checksum::from_content(&emit_sdl(&schema));
        assert_eq!(value["sdlChecksum"], json!(expected.as_str()));
    }

    #[test]
    fn test_envelope_keys() {
        let text = emit_descriptor(&schema(), OutputFormat::Pretty).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["roots", "sdlChecksum", "types", "version"]);
        // itemNullable only appears on list fields
        assert!(value["types"]["User"]["fields"][0].get("itemNullable").is_none());
        assert_eq!(value["types"]["User"]["fields"][0]["targetKind"], json!("scalar"));
    }
}
