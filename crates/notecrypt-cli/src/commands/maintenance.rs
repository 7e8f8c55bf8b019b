use tracing::warn;

use crate::app::AppContext;

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let (service, _owner) = ctx.open_service()?;
    match service.check_integrity() {
        Ok(()) => {
            if !ctx.quiet() {
                println!("Integrity check: OK");
                println!("- sqlite integrity: OK");
                println!("- foreign keys: OK");
                println!("- encrypted flags match content: OK");
            }
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "integrity check failed");
            eprintln!("Integrity check: FAILED");
            Err(err.into())
        }
    }
}
