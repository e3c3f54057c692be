//! Request document assembly.
//!
//! A document is built in fixed stages: variables, request line, headers and
//! body. [`HttpFileGenerator`] holds the sections while they are filled in and
//! [`DocumentAssembler`] drives it for one [`OperationDescriptor`].

pub mod path_template;

use http::Method;

use super::{
  descriptor::{AuthRequirement, OperationDescriptor, ParameterLocation},
  example::{BodyStatus, ExampleSynthesizer, SynthesisContext, synthesize_body},
  naming::to_type_name,
};

pub const DOCUMENT_EXTENSION: &str = "http";
pub const NO_BODY_ALLOWED: &str = "// No body allowed for this request method";
pub const JSON_CONTENT_TYPE_HEADER: &str = "Content-Type: application/json";
pub const AUTHORIZATION_HEADER: &str = "Authorization: Bearer {{authToken}}";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;

/// Values of the default variables every document declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
  pub host: String,
  pub port: u16,
}

impl Default for DocumentOptions {
  fn default() -> Self {
    Self {
      host: DEFAULT_HOST.to_string(),
      port: DEFAULT_PORT,
    }
  }
}

/// Verbs that conventionally carry a request payload.
#[must_use]
pub fn carries_payload(verb: &Method) -> bool {
  [Method::POST, Method::PUT, Method::PATCH].contains(verb)
}

fn placeholder_variable(name: &str) -> String {
  format!("@{name} = REPLACE_WITH_{}_VALUE", name.to_uppercase())
}

/// Accumulates the sections of one document.
#[derive(Debug, Clone)]
pub struct HttpFileGenerator {
  variables: Vec<String>,
  query_params: Vec<String>,
  request_line: String,
  headers: Vec<String>,
  body: Vec<String>,
}

impl HttpFileGenerator {
  #[must_use]
  pub fn new(options: &DocumentOptions) -> Self {
    Self {
      variables: vec![
        "// Variables section - defines variables to use in the request".to_string(),
        format!("@host = {}", options.host),
        format!("@port = {}", options.port),
        "@baseUrl = http://{{host}}{{#if port}}:{{port}}{{/if}}".to_string(),
      ],
      query_params: vec![],
      request_line: String::new(),
      headers: vec![],
      body: vec![],
    }
  }

  pub fn add_path_params<S: AsRef<str>>(&mut self, params: &[S]) {
    self.add_variable_group("// Path parameters", params);
  }

  pub fn add_query_params<S: AsRef<str>>(&mut self, params: &[S]) {
    self.add_variable_group("// Query parameters", params);
    self
      .query_params
      .extend(params.iter().map(|param| param.as_ref().to_string()));
  }

  fn add_variable_group<S: AsRef<str>>(&mut self, heading: &str, params: &[S]) {
    if params.is_empty() {
      return;
    }
    self.variables.push(String::new());
    self.variables.push(heading.to_string());
    self
      .variables
      .extend(params.iter().map(|param| placeholder_variable(param.as_ref())));
  }

  /// Query parameters must already be added; they are appended in the order
  /// they were declared.
  pub fn set_request_line(&mut self, verb: &Method, path: &str) {
    let mut url = path_template::substitute_variables(path);
    if !self.query_params.is_empty() {
      url.push('?');
      url.push_str(
        &self
          .query_params
          .iter()
          .map(|param| format!("{param}={{{{{param}}}}}"))
          .collect::<Vec<_>>()
          .join("&"),
      );
    }
    self.request_line = format!("{} {{{{baseUrl}}}}{url}", verb.as_str().to_uppercase());
  }

  pub fn add_headers(&mut self, verb: &Method, authentication: &AuthRequirement) {
    if carries_payload(verb) {
      self.headers.push(JSON_CONTENT_TYPE_HEADER.to_string());
    }
    if authentication.is_required() {
      self.headers.push(AUTHORIZATION_HEADER.to_string());
      self.variables.extend([
        String::new(),
        "// Authentication".to_string(),
        "@authToken = REPLACE_WITH_YOUR_AUTH_TOKEN".to_string(),
      ]);
    }
  }

  pub fn set_body(&mut self, lines: Vec<String>) {
    self.body = lines;
  }

  #[must_use]
  pub fn generate_file(&self, operation_name: &str) -> String {
    let mut lines = vec![format!("### {operation_name}"), String::new()];
    lines.extend(self.variables.iter().cloned());
    lines.push(String::new());
    lines.push(self.request_line.clone());
    lines.extend(self.headers.iter().cloned());
    lines.push(String::new());
    lines.extend(self.body.iter().cloned());
    lines.join("\n")
  }
}

/// One generated request document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDocument {
  pub operation: String,
  /// `<group>_<operation>_<verb>`, without extension.
  pub file_stem: String,
  pub contents: String,
  pub body_status: BodyStatus,
  pub path_template_error: Option<path_template::PathTemplateError>,
}

#[derive(Debug, Clone, Copy)]
pub struct DocumentAssembler<'a> {
  synthesizer: ExampleSynthesizer<'a>,
  options: &'a DocumentOptions,
}

impl<'a> DocumentAssembler<'a> {
  #[must_use]
  pub const fn new(synthesizer: ExampleSynthesizer<'a>, options: &'a DocumentOptions) -> Self {
    Self { synthesizer, options }
  }

  /// Builds the document for `operation`.
  ///
  /// Nothing here fails: unsupported bodies and malformed templates degrade to
  /// comments or are reported on the returned document.
  pub fn assemble(&self, operation: &OperationDescriptor, ctx: &mut SynthesisContext<'_>) -> RequestDocument {
    let verb = operation.effective_verb();
    let path = if operation.path.is_empty() { "/" } else { &operation.path };
    let mut file = HttpFileGenerator::new(self.options);

    file.add_path_params(&path_template::unique_template_params(path));
    let query_params: Vec<&str> = operation
      .parameters_in(ParameterLocation::Query)
      .map(|param| param.name.as_str())
      .collect();
    file.add_query_params(&query_params);

    file.set_request_line(&verb, path);
    file.add_headers(&verb, &operation.authentication);

    let body_status = if carries_payload(&verb) {
      let hint = format!("{}Body", to_type_name(&operation.name));
      let outcome = synthesize_body(&self.synthesizer, operation.body.as_ref(), &hint, ctx);
      file.set_body(outcome.lines);
      outcome.status
    } else {
      file.set_body(vec![NO_BODY_ALLOWED.to_string()]);
      BodyStatus::NotApplicable
    };

    RequestDocument {
      operation: operation.name.clone(),
      file_stem: operation.document_stem(),
      contents: file.generate_file(&operation.name),
      body_status,
      path_template_error: path_template::validate(path).err(),
    }
  }
}
