use super::RowOutput;
use crate::cli::EditArgs;
use crate::context::CliContext;
use crate::output;
use pagewin_core::PageError;
use pagewin_domain::{FieldType, Value};
use serde::Serialize;

#[derive(Serialize)]
struct EditOutput {
    page: usize,
    field: String,
    row: RowOutput,
}

pub fn handle(ctx: &mut CliContext, args: EditArgs) -> anyhow::Result<()> {
    let view = ctx.open_page(args.page)?;
    let field_type = view
        .schema()
        .field_type(&args.field)
        .ok_or_else(|| PageError::UnknownField(args.field.clone()))?;
    let json = parse_value(&args.value, field_type);
    let value = Value::from_json(&args.field, &json, field_type)?;

    view.write(args.id, &args.field, value)?;
    ctx.save()?;

    let row = view.row(&args.id).ok_or(PageError::NotFound(args.id))?;
    output::output_success(EditOutput {
        page: args.page,
        field: args.field,
        row: RowOutput::new(&view, &row),
    });
    Ok(())
}

/// JSON literal if it parses, otherwise the raw text as a string. Text fields
/// keep the raw text unless it parsed to a string or null.
fn parse_value(raw: &str, field_type: FieldType) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) if field_type != FieldType::Text || json.is_string() || json.is_null() => json,
        _ => serde_json::Value::String(raw.to_string()),
    }
}
