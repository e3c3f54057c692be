use std::collections::HashMap;

use http::Method;
use itertools::Itertools;
use mediatype::MediaType;
use oas3::{
  Spec,
  spec::{MediaType as OasMediaType, ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn, Schema, SchemaType},
};
use serde_json::Value;

use super::ServiceSource;
use crate::{
  generator::{
    descriptor::{
      AuthRequirement, BodyDescriptor, BodyKind, OperationDescriptor, ParameterDescriptor, ParameterLocation,
      ServiceDescriptor,
    },
    document::path_template::unique_template_params,
    naming::{generate_operation_id, sanitize, to_type_name},
    types::{Field, TypeGraph, TypeId, TypeNode},
  },
  utils::{SchemaExt, parse_schema_ref_path},
};

const DEFAULT_SERVICE_NAME: &str = "Service";
const DEFAULT_GROUP: &str = "root";

/// Services and types read from an OpenAPI 3.x document.
///
/// The whole document is lowered up front; the source is immutable afterwards.
#[derive(Debug, Clone)]
pub struct OpenApiSource {
  services: Vec<ServiceDescriptor>,
  types: TypeGraph,
  pointers: HashMap<TypeId, String>,
}

impl OpenApiSource {
  #[must_use]
  pub fn new(spec: &Spec) -> Self {
    let mut lowering = TypeLowering::new(spec);
    let authentication = service_authentication(spec);

    let operations = spec
      .operations()
      .map(|(path, method, operation)| describe_operation(&mut lowering, &path, &method, operation, &authentication))
      .collect();

    let service = ServiceDescriptor {
      name: service_name(&spec.info.title),
      operations,
      authentication,
    };

    Self {
      services: vec![service],
      types: lowering.graph,
      pointers: lowering.pointers,
    }
  }
}

impl ServiceSource for OpenApiSource {
  fn services(&self) -> &[ServiceDescriptor] {
    &self.services
  }

  fn types(&self) -> &TypeGraph {
    &self.types
  }

  fn schema_pointer(&self, id: TypeId) -> Option<String> {
    self.pointers.get(&id).cloned()
  }
}

pub(crate) fn service_name(title: &str) -> String {
  if title.trim().is_empty() {
    DEFAULT_SERVICE_NAME.to_string()
  } else {
    to_type_name(title)
  }
}

pub(crate) fn operation_name(path: &str, method: &Method, operation: &Operation) -> String {
  operation
    .operation_id
    .as_deref()
    .map(str::trim)
    .filter(|id| !id.is_empty())
    .map_or_else(|| generate_operation_id(method.as_str(), path), str::to_string)
}

pub(crate) fn operation_group(path: &str, operation: &Operation) -> String {
  let from_tag = operation.tags.first().map(|tag| sanitize(tag)).filter(|tag| !tag.is_empty());
  let from_path = || {
    path
      .split('/')
      .find(|segment| !segment.is_empty() && !segment.contains('{'))
      .map(sanitize)
      .filter(|segment| !segment.is_empty())
  };
  from_tag
    .or_else(from_path)
    .unwrap_or_else(|| DEFAULT_GROUP.to_string())
}

/// Scheme names of the top-level `security` requirements.
///
/// An empty requirement object (anonymous access) contributes no scheme.
fn service_authentication(spec: &Spec) -> AuthRequirement {
  let Ok(Value::Array(requirements)) = serde_json::to_value(&spec.security) else {
    return AuthRequirement::None;
  };

  let schemes: Vec<String> = requirements
    .iter()
    .filter_map(Value::as_object)
    .flat_map(|requirement| requirement.keys().cloned())
    .unique()
    .collect();

  if schemes.is_empty() {
    AuthRequirement::None
  } else {
    AuthRequirement::Schemes(schemes)
  }
}

fn describe_operation(
  lowering: &mut TypeLowering<'_>,
  path: &str,
  method: &Method,
  operation: &Operation,
  authentication: &AuthRequirement,
) -> OperationDescriptor {
  OperationDescriptor::builder()
    .name(operation_name(path, method, operation))
    .group(operation_group(path, operation))
    .verb(method.clone())
    .path(path)
    .parameters(collect_parameters(lowering.spec, path, operation))
    .maybe_body(describe_body(lowering, operation))
    .authentication(authentication.clone())
    .build()
}

/// Path-item parameters overridden by operation parameters with the same
/// location and name. Cookies are dropped; undeclared template parameters are
/// added as path parameters.
fn collect_parameters(spec: &Spec, path: &str, operation: &Operation) -> Vec<ParameterDescriptor> {
  let mut params: Vec<Parameter> = vec![];

  if let Some(path_item) = spec.paths.as_ref().and_then(|p| p.get(path)) {
    params.extend(path_item.parameters.iter().filter_map(|r| r.resolve(spec).ok()));
  }

  for param in operation.parameters.iter().filter_map(|r| r.resolve(spec).ok()) {
    params.retain(|p| p.location != param.location || p.name != param.name);
    params.push(param);
  }

  let mut descriptors: Vec<ParameterDescriptor> = params
    .into_iter()
    .filter_map(|param| {
      let location = match param.location {
        ParameterIn::Path => ParameterLocation::Path,
        ParameterIn::Query => ParameterLocation::Query,
        ParameterIn::Header => ParameterLocation::Header,
        ParameterIn::Cookie => return None,
      };
      Some(ParameterDescriptor {
        name: param.name,
        location,
      })
    })
    .collect();

  let missing: Vec<ParameterDescriptor> = unique_template_params(path)
    .into_iter()
    .filter(|name| {
      !descriptors
        .iter()
        .any(|param| param.location == ParameterLocation::Path && param.name == *name)
    })
    .map(ParameterDescriptor::path)
    .collect();
  descriptors.extend(missing);

  descriptors
}

fn describe_body(lowering: &mut TypeLowering<'_>, operation: &Operation) -> Option<BodyDescriptor> {
  let body = operation.request_body.as_ref()?.resolve(lowering.spec).ok()?;
  let (first_content_type, media_type) = body.content.iter().next()?;

  let ty = match media_type.schema.as_ref() {
    Some(schema) => lowering.lower_ref(schema),
    None => lowering.graph.add(TypeNode::Unknown {
      kind: "unspecified".to_string(),
    }),
  };

  Some(
    BodyDescriptor::builder()
      .kind(body_kind(first_content_type, media_type))
      .content_types(body.content.keys().cloned().collect())
      .ty(ty)
      .build(),
  )
}

fn body_kind(content_type: &str, media_type: &OasMediaType) -> BodyKind {
  let essence = content_type.split(';').next().unwrap_or(content_type).trim();
  let Ok(media) = MediaType::parse(essence) else {
    return BodyKind::Single;
  };

  match (media.ty.as_str(), media.subty.as_str()) {
    ("multipart", _) => BodyKind::Multipart,
    ("application", "octet-stream") | ("image" | "audio" | "video", _) => BodyKind::File,
    _ if is_binary_schema(media_type) => BodyKind::File,
    _ => BodyKind::Single,
  }
}

fn is_binary_schema(media_type: &OasMediaType) -> bool {
  matches!(
    media_type.schema.as_ref(),
    Some(ObjectOrReference::Object(schema)) if schema.format.as_deref() == Some("binary")
  )
}

/// Converts schemas into [`TypeGraph`] nodes.
///
/// Component references are lowered once and cached by name. The cache entry
/// is reserved before the component body is lowered, so a schema that refers
/// back to itself closes into a cycle of ids.
struct TypeLowering<'s> {
  spec: &'s Spec,
  graph: TypeGraph,
  components: HashMap<String, TypeId>,
  pointers: HashMap<TypeId, String>,
}

impl<'s> TypeLowering<'s> {
  fn new(spec: &'s Spec) -> Self {
    Self {
      spec,
      graph: TypeGraph::new(),
      components: HashMap::new(),
      pointers: HashMap::new(),
    }
  }

  fn lower_ref(&mut self, schema_ref: &ObjectOrReference<ObjectSchema>) -> TypeId {
    match schema_ref {
      ObjectOrReference::Object(schema) => self.lower(schema, None, None),
      ObjectOrReference::Ref { ref_path, .. } => self.lower_component(schema_ref, ref_path),
    }
  }

  fn lower_component(&mut self, schema_ref: &ObjectOrReference<ObjectSchema>, ref_path: &str) -> TypeId {
    let Some(name) = parse_schema_ref_path(ref_path) else {
      return self.unknown(format!("external reference {ref_path}"));
    };
    if let Some(id) = self.components.get(&name) {
      return *id;
    }

    let slot = self.graph.reserve();
    self.components.insert(name.clone(), slot);
    self.pointers.insert(slot, ref_path.to_string());

    match schema_ref.resolve(self.spec) {
      Ok(schema) => self.lower(&schema, Some(&name), Some(slot)),
      Err(_) => self.place(
        TypeNode::Unknown {
          kind: format!("unresolved reference {ref_path}"),
        },
        Some(slot),
      ),
    }
  }

  fn lower(&mut self, schema: &ObjectSchema, name: Option<&str>, slot: Option<TypeId>) -> TypeId {
    if !schema.all_of.is_empty() {
      return self.lower_all_of(schema, name, slot);
    }

    if !schema.enum_values.is_empty() {
      let variants: Vec<TypeId> = schema
        .enum_values
        .iter()
        .filter(|value| !value.is_null())
        .map(|value| self.graph.literal(value.clone()))
        .collect();
      if variants.is_empty() {
        return self.place(TypeNode::Literal(Value::Null), slot);
      }
      return self.place(
        TypeNode::Union {
          name: name.map(String::from),
          variants,
        },
        slot,
      );
    }

    if let Some(value) = &schema.const_value {
      return self.place(TypeNode::Literal(value.clone()), slot);
    }

    if schema.has_union() {
      let variants = schema.non_null_variants(self.spec);
      if let [only] = variants.as_slice()
        && schema.properties.is_empty()
      {
        let id = self.lower_ref(only);
        return self.alias(id, name, slot);
      }
      let variants = variants.into_iter().map(|variant| self.lower_ref(variant)).collect();
      return self.place(
        TypeNode::Union {
          name: name.map(String::from),
          variants,
        },
        slot,
      );
    }

    match schema.declared_types().as_slice() {
      [] if !schema.properties.is_empty() => self.lower_record(schema, name, slot),
      [] => self.place(
        TypeNode::Unknown {
          kind: "any".to_string(),
        },
        slot,
      ),
      [single] => self.lower_typed(schema, *single, name, slot),
      many => {
        let variants = many
          .iter()
          .map(|schema_type| self.lower_typed(schema, *schema_type, None, None))
          .collect();
        self.place(
          TypeNode::Union {
            name: name.map(String::from),
            variants,
          },
          slot,
        )
      }
    }
  }

  fn lower_typed(
    &mut self,
    schema: &ObjectSchema,
    schema_type: SchemaType,
    name: Option<&str>,
    slot: Option<TypeId>,
  ) -> TypeId {
    match schema_type {
      SchemaType::Object => self.lower_record(schema, name, slot),
      SchemaType::Array => {
        let element = match schema.items.as_deref() {
          Some(Schema::Object(items)) => self.lower_ref(items),
          Some(Schema::Boolean(_)) => self.unknown("boolean schema".to_string()),
          None => self.unknown("any".to_string()),
        };
        self.place(TypeNode::Array { element }, slot)
      }
      SchemaType::Null => self.place(
        TypeNode::Unknown {
          kind: "null".to_string(),
        },
        slot,
      ),
      scalar => {
        let name = schema.scalar_name(scalar).unwrap_or_else(|| "string".to_string());
        self.place(TypeNode::Scalar { name }, slot)
      }
    }
  }

  fn lower_record(&mut self, schema: &ObjectSchema, name: Option<&str>, slot: Option<TypeId>) -> TypeId {
    let slot = slot.unwrap_or_else(|| self.graph.reserve());
    let fields = self.lower_properties(schema);
    self.graph.replace(
      slot,
      TypeNode::Record {
        name: name.map(String::from),
        base: None,
        fields,
      },
    );
    slot
  }

  /// The first `$ref` member, wherever it appears, becomes the base; every other
  /// member contributes its fields as own fields, followed by the schema's own properties.
  fn lower_all_of(&mut self, schema: &ObjectSchema, name: Option<&str>, slot: Option<TypeId>) -> TypeId {
    if let [only] = schema.all_of.as_slice()
      && schema.properties.is_empty()
    {
      let id = self.lower_ref(only);
      return self.alias(id, name, slot);
    }

    let slot = slot.unwrap_or_else(|| self.graph.reserve());
    let base_index = schema
      .all_of
      .iter()
      .position(|member| matches!(member, ObjectOrReference::Ref { .. }));
    let base = base_index.map(|index| self.lower_ref(&schema.all_of[index]));

    let mut fields = vec![];
    for (index, member) in schema.all_of.iter().enumerate() {
      if Some(index) == base_index {
        continue;
      }
      let id = self.lower_ref(member);
      fields.extend(self.graph.all_fields(id).into_iter().cloned());
    }
    fields.extend(self.lower_properties(schema));

    self.graph.replace(
      slot,
      TypeNode::Record {
        name: name.map(String::from),
        base,
        fields,
      },
    );
    slot
  }

  fn lower_properties(&mut self, schema: &ObjectSchema) -> Vec<Field> {
    schema
      .properties
      .iter()
      .map(|(name, property)| Field::new(name, self.lower_ref(property)))
      .collect()
  }

  fn unknown(&mut self, kind: String) -> TypeId {
    self.graph.add(TypeNode::Unknown { kind })
  }

  fn place(&mut self, node: TypeNode, slot: Option<TypeId>) -> TypeId {
    match slot {
      Some(slot) => {
        self.graph.replace(slot, node);
        slot
      }
      None => self.graph.add(node),
    }
  }

  /// Makes `slot` (when present) a copy of `target` under the component name.
  fn alias(&mut self, target: TypeId, name: Option<&str>, slot: Option<TypeId>) -> TypeId {
    let Some(slot) = slot else {
      return target;
    };
    if slot == target {
      return slot;
    }
    let mut node = self.graph.get(target).clone();
    if let Some(name) = name
      && let TypeNode::Record { name: declared, .. } | TypeNode::Union { name: declared, .. } = &mut node
    {
      *declared = Some(name.to_string());
    }
    self.place(node, Some(slot))
  }
}
