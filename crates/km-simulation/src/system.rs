use crate::context::SimContext;
use crate::error::SimResult;

/// One phase of a season.
///
/// Systems run in registration order, each with a mutable context over the
/// world, the dice and the narration log.
pub trait System: std::fmt::Debug {
    /// Human-readable name for this system.
    fn name(&self) -> &str;

    /// Called once per season.
    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()>;

    /// Called once before the first season. Optional setup hook.
    fn init(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }
}
