//! Reading and writing the schema JSON document.

use std::io::{Read, Write};
use std::path::Path;

use crate::types::{FormSchema, SchemaResult};

/// Default output filename.
pub const DEFAULT_SCHEMA_FILE: &str = "udyam_form_schema.json";

/// Write `schema` to `path` as indented JSON, replacing any existing file,
/// and hand the schema back.
pub fn persist(schema: FormSchema, path: &Path) -> SchemaResult<FormSchema> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;
    write_to(&schema, &mut file)?;
    file.flush()?;

    tracing::info!("form schema saved to {}", path.display());
    Ok(schema)
}

/// Write `schema` as 2-space indented UTF-8 JSON with a trailing newline.
/// Non-ASCII text is written as-is, not escaped.
pub fn write_to<W: Write>(schema: &FormSchema, writer: &mut W) -> SchemaResult<()> {
    serde_json::to_writer_pretty(&mut *writer, schema)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Read a schema previously written by [`persist`].
pub fn load(path: &Path) -> SchemaResult<FormSchema> {
    let mut file = std::fs::File::open(path)?;
    read_from(&mut file)
}

/// Read a schema from any reader.
pub fn read_from<R: Read>(reader: &mut R) -> SchemaResult<FormSchema> {
    Ok(serde_json::from_reader(reader)?)
}
