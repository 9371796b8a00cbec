//! Repositioning abilities.

use crate::combat::{self, AttackType};
use crate::engine::{self, BattleContext};
use crate::events::BattleEvent;
use crate::targeting;

use super::{CasterView, ensure_on_board, hit, primary_target, strike};
use crate::ability::{AbilityError, AbilityId, Cast};

const FLY_AWAY_RANGE: u32 = 3;

pub fn teleport(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    if let Some(cell) = ctx.state.board.teleportation_cell(view.position) {
        engine::teleport(ctx, view.id, cell);
    }
    Ok(())
}

/// Retreats from the nearest enemy and raises a shield.
pub fn fly_away(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    if let Some((_, threat)) = primary_target(ctx, cast, &view) {
        let cell = ctx
            .state
            .board
            .fly_away_cell(view.position, threat, FLY_AWAY_RANGE);
        if let Some(cell) = cell {
            engine::teleport(ctx, view.id, cell);
        }
    }
    combat::add_shield(ctx, view.id, view.power([20, 40, 80]), Some(view.id));
    Ok(())
}

/// Lands behind the farthest enemy that has a free neighbour, then strikes it.
pub fn shadow_sneak(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((enemy, cell)) = targeting::farthest_landing(ctx.state, view.id) else {
        return Ok(());
    };
    ensure_on_board(ctx, AbilityId::ShadowSneak, cell)?;
    engine::teleport(ctx, view.id, cell);
    strike(ctx, cast, enemy, view.power([30, 60, 120]));
    Ok(())
}

/// Resurfaces where the most enemies are packed and hits all of them.
pub fn dig(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some(cell) = targeting::most_surrounded_cell(ctx.state, view.team) else {
        return Ok(());
    };
    let landing = if engine::teleport(ctx, view.id, cell) {
        cell
    } else {
        view.position
    };
    let damage = view.power([20, 40, 80]);
    for enemy in targeting::adjacent_units(ctx.state, landing, view.enemy()) {
        hit(ctx, cast, enemy, damage, AttackType::Physical);
    }
    Ok(())
}

/// Trades places with the farthest enemy.
pub fn switcheroo(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some(enemy) = targeting::farthest_enemy(ctx.state, view.id) else {
        return Ok(());
    };
    ctx.state.swap_units(view.id, enemy)?;

    let moved = [view.id, enemy].map(|id| ctx.state.unit(id).map(|unit| unit.position));
    if let [Some(caster_at), Some(enemy_at)] = moved {
        ctx.emit(BattleEvent::UnitMoved {
            unit: view.id,
            from: enemy_at,
            to: caster_at,
        });
        ctx.emit(BattleEvent::UnitMoved {
            unit: enemy,
            from: caster_at,
            to: enemy_at,
        });
    }
    hit(ctx, cast, enemy, view.power([20, 40, 80]), AttackType::Special);
    Ok(())
}
