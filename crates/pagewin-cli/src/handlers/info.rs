use crate::context::CliContext;
use crate::output;
use pagewin_core::PAGE_SIZE_CHOICES;
use pagewin_domain::{FieldDef, SourceCollection};
use serde::Serialize;

#[derive(Serialize)]
struct InfoOutput {
    file: String,
    rows: usize,
    page_size: usize,
    standard_page_size: bool,
    page_size_choices: &'static [usize],
    last_page: usize,
    fields: Vec<FieldDef>,
}

pub fn handle(ctx: &CliContext) -> anyhow::Result<()> {
    let (rows, fields) = {
        let source = ctx.engine.source().borrow();
        (source.len(), source.schema().fields().to_vec())
    };

    output::output_success(InfoOutput {
        file: ctx.path().display().to_string(),
        rows,
        page_size: ctx.engine.page_size(),
        standard_page_size: PAGE_SIZE_CHOICES.contains(&ctx.engine.page_size()),
        page_size_choices: &PAGE_SIZE_CHOICES,
        last_page: ctx.engine.last_page_number()?,
        fields,
    });
    Ok(())
}
