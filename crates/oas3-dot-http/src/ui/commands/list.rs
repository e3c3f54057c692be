use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::{
    document::DOCUMENT_EXTENSION,
    host::{OpenApiSource, ServiceSource},
  },
  ui::{Colors, colors::IntoComfyColor, term_width},
  utils::spec::SpecLoader,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct OperationRow {
  name: String,
  method: http::Method,
  path: String,
  document: String,
}

/// One row per operation, sorted by operation name. The document column is the
/// path `generate` writes to, before collision suffixes are applied.
fn operation_rows(source: &impl ServiceSource) -> Vec<OperationRow> {
  let mut rows: Vec<OperationRow> = source
    .services()
    .iter()
    .flat_map(|service| {
      service.operations.iter().map(|operation| OperationRow {
        name: operation.name.clone(),
        method: operation.effective_verb(),
        path: operation.path.clone(),
        document: format!("{}/{}.{DOCUMENT_EXTENSION}", service.name, operation.document_stem()),
      })
    })
    .collect();

  rows.sort_by(|a, b| a.name.cmp(&b.name));
  rows
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let spec = SpecLoader::open(input).await?.parse()?;
  let rows = operation_rows(&OpenApiSource::new(&spec));

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut header = Row::new();
  for title in ["OPERATION", "METHOD", "PATH", "DOCUMENT"] {
    header.add_cell(Cell::new(title).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(header);

  for row in rows {
    let mut cells = Row::new();
    cells.add_cell(
      Cell::new(row.name)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    cells.add_cell(
      Cell::new(row.method.as_str())
        .fg(IntoComfyColor::into(colors.method(&row.method)))
        .set_alignment(CellAlignment::Right),
    );
    cells.add_cell(Cell::new(row.path).fg(IntoComfyColor::into(colors.primary())));
    cells.add_cell(Cell::new(row.document).fg(IntoComfyColor::into(colors.info())));
    table.add_row(cells);
  }

  println!("{table}");

  Ok(())
}

#[cfg(test)]
mod tests {
  use http::Method;

  use super::*;

  #[test]
  fn test_rows_sorted_with_document_paths() {
    let spec = oas3::from_json(
      r#"{
        "openapi": "3.0.3",
        "info": { "title": "Zoo", "version": "1" },
        "paths": {
          "/animals/{id}": {
            "delete": { "operationId": "removeAnimal", "tags": ["Animals"], "responses": { "204": { "description": "gone" } } },
            "get": { "operationId": "getAnimal", "tags": ["Animals"], "responses": { "200": { "description": "ok" } } }
          }
        }
      }"#,
    )
    .unwrap();

    let rows = operation_rows(&OpenApiSource::new(&spec));

    assert_eq!(
      rows,
      vec![
        OperationRow {
          name: "getAnimal".to_string(),
          method: Method::GET,
          path: "/animals/{id}".to_string(),
          document: "Zoo/animals_getAnimal_get.http".to_string(),
        },
        OperationRow {
          name: "removeAnimal".to_string(),
          method: Method::DELETE,
          path: "/animals/{id}".to_string(),
          document: "Zoo/animals_removeAnimal_delete.http".to_string(),
        },
      ]
    );
  }
}
