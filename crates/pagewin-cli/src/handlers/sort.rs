use super::PageOutput;
use crate::cli::SortArgs;
use crate::context::CliContext;
use crate::output;
use pagewin_domain::SortOrder;

pub fn handle(ctx: &mut CliContext, args: SortArgs) -> anyhow::Result<()> {
    let order = SortOrder::from_ascending(!args.descending);

    if let Some(page) = args.page {
        ctx.open_page(page)?;
    }
    let reopened = ctx.engine.sort(&args.field, order)?;
    ctx.save()?;

    match reopened {
        Some(view) => {
            let last_page = ctx.engine.last_page_number()?;
            output::output_success(PageOutput::new(&view, ctx.engine.page_size(), last_page));
        }
        None => output::output_success(serde_json::json!({
            "sorted_by": args.field,
            "order": order,
        })),
    }
    Ok(())
}
