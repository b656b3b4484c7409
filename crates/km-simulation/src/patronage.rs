//! The bishop's patronage: sponsoring knights with coin and blessing them
//! with glory.

use km_core::KnightId;

use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;

/// Sponsor a knight. Returns the coin spent.
///
/// The cost depends on the knight's prowess, house might and recent
/// reputation. Sponsored knights earn the bishop glory from then on.
pub fn sponsor_knight(ctx: &mut SimContext<'_>, id: KnightId) -> SimResult<u32> {
    let title = ctx.world.knight_title(id)?;
    let knight = ctx.world.knight(id)?;
    if knight.sponsored {
        return Err(SimError::Refused(format!("{title} is already sponsored")));
    }
    let cost = knight.cost(ctx.world.house(knight.house)?.might);
    if cost > ctx.world.bishop.coin {
        return Err(SimError::Refused(format!(
            "sponsoring {title} costs {cost} coin, you only have {}",
            ctx.world.bishop.coin
        )));
    }

    ctx.world.bishop.coin -= cost;
    ctx.world.sponsor(id)?;
    ctx.emit(
        SimEventKind::KnightSponsored { knight: id, cost },
        format!("You sponsored {title} for {cost} coin."),
    );
    tracing::debug!(%id, cost, "knight sponsored");
    Ok(cost)
}

/// Bless a knight for their next duel. Returns the glory spent.
///
/// Each blessing costs one more step of glory than the last. Blessings add
/// to the knight's duel pool and are spent when they next duel.
pub fn bless_knight(ctx: &mut SimContext<'_>, id: KnightId) -> SimResult<u32> {
    let title = ctx.world.knight_title(id)?;
    let blessings = ctx.world.knight(id)?.blessings;
    let cost = (blessings + 1) * ctx.config.blessing_glory_step;
    if cost > ctx.world.bishop.glory {
        return Err(SimError::Refused(format!(
            "blessing {title} costs {cost} glory, you only have {}",
            ctx.world.bishop.glory
        )));
    }

    ctx.world.bishop.glory -= cost;
    let knight = ctx.world.knight_mut(id)?;
    knight.blessings += 1;
    let blessings = knight.blessings;
    ctx.emit(
        SimEventKind::KnightBlessed {
            knight: id,
            blessings,
        },
        format!("{title} received the blessing of the Church for {cost} glory."),
    );
    Ok(cost)
}
