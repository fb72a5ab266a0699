use super::PageOutput;
use crate::cli::PageArgs;
use crate::context::CliContext;
use crate::output;

pub fn handle(ctx: &mut CliContext, args: PageArgs) -> anyhow::Result<()> {
    let view = ctx.open_page(args.page)?;
    if !args.hide.is_empty() {
        let hidden = ctx.engine.hide_rows(args.hide)?;
        tracing::debug!("Hid {} rows from page {}", hidden, args.page);
    }

    let last_page = ctx.engine.last_page_number()?;
    output::output_success(PageOutput::new(&view, ctx.engine.page_size(), last_page));
    Ok(())
}
