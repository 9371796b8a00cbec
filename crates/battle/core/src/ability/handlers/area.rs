//! Area abilities. Victims are collected before any damage lands so a death
//! in the middle of the sweep does not change who else is hit.

use crate::combat::{self, AttackType, DamageRequest};
use crate::engine::BattleContext;
use crate::env::RollPurpose;
use crate::state::StatusKind;
use crate::targeting;

use super::{CasterView, ensure_on_board, hit, inflict, primary_target};
use crate::ability::{AbilityError, AbilityId, Cast};

pub fn earthquake(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let damage = view.power([30, 60, 120]);
    for enemy in targeting::units_in_radius(ctx.state, view.position, 2, view.enemy()) {
        hit(ctx, cast, enemy, damage, AttackType::Physical);
    }
    Ok(())
}

/// Freezing burst centred on the target.
pub fn blizzard(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((_, center)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    ensure_on_board(ctx, AbilityId::Blizzard, center)?;

    let mut cells = vec![center];
    cells.extend(ctx.state.board.cells_in_radius(center, 1));
    let victims = targeting::units_on_cells(ctx.state, &cells, view.enemy());
    let damage = view.power([20, 40, 80]);
    for enemy in victims {
        let outcome = hit(ctx, cast, enemy, damage, AttackType::Special);
        if !outcome.death {
            inflict(ctx, cast, enemy, StatusKind::Freeze, 1000);
        }
    }
    Ok(())
}

pub fn discharge(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let damage = view.power([25, 50, 100]);
    for enemy in targeting::adjacent_units(ctx.state, view.position, view.enemy()) {
        let outcome = hit(ctx, cast, enemy, damage, AttackType::Special);
        if !outcome.death {
            inflict(ctx, cast, enemy, StatusKind::Paralysis, 2000);
        }
    }
    Ok(())
}

/// Blasts adjacent enemies, then costs the caster half its max life.
pub fn self_destruct(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let damage = view.power([50, 100, 200]);
    for enemy in targeting::adjacent_units(ctx.state, view.position, view.enemy()) {
        hit(ctx, cast, enemy, damage, AttackType::Special);
    }
    combat::apply_damage(
        ctx,
        DamageRequest::new(view.id, view.max_life / 2, AttackType::True).without_reactions(),
    );
    Ok(())
}

/// Cone of heat in front of the caster; each victim may catch fire.
pub fn heat_wave(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((_, toward)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let cells = ctx.state.board.cells_in_front(view.position, toward, 3);
    let victims = targeting::units_on_cells(ctx.state, &cells, view.enemy());
    let damage = view.power([20, 40, 80]);
    let burn_chance = view.tuned([20, 40, 60]);
    for enemy in victims {
        let outcome = hit(ctx, cast, enemy, damage, AttackType::Special);
        if !outcome.death && ctx.rng.chance_pct(burn_chance, RollPurpose::Handler) {
            inflict(ctx, cast, enemy, StatusKind::Burn, 3000);
        }
    }
    Ok(())
}
