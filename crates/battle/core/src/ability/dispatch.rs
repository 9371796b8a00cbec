use tracing::{debug, warn};

use crate::engine::BattleContext;
use crate::env::RollPurpose;
use crate::error::{BattleError, ErrorContext, ErrorSeverity};
use crate::events::BattleEvent;
use crate::state::{BoardError, Position, UnitId, UnitTags};

use super::AbilityId;

/// Inputs of one ability resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cast {
    pub caster: UnitId,
    /// Enemy engaged when the cast started; may faint before the handler uses it.
    pub target: Option<UnitId>,
    pub crit: bool,
}

/// Faults raised inside a handler. They abort the handler, never the tick.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("caster {caster} is no longer on the board")]
    CasterMissing { caster: UnitId },

    #[error("{ability} computed off-board cell {position}")]
    OutOfBounds {
        ability: AbilityId,
        position: Position,
        context: ErrorContext,
    },

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl BattleError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CasterMissing { .. } => ErrorSeverity::Recoverable,
            Self::OutOfBounds { .. } => ErrorSeverity::Internal,
            Self::Board(err) => err.severity(),
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::OutOfBounds { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CasterMissing { .. } => "ABILITY_CASTER_MISSING",
            Self::OutOfBounds { .. } => "ABILITY_OUT_OF_BOUNDS",
            Self::Board(err) => err.error_code(),
        }
    }
}

/// Casts the caster's ability.
///
/// Empties the resource meter, rolls the ability crit (only with
/// ABILITY_CRIT), reports the cast, then runs the handler. Handler faults are
/// logged and absorbed.
pub fn cast(ctx: &mut BattleContext<'_>, caster: UnitId, target: Option<UnitId>) {
    let Some(unit) = ctx.state.live_unit(caster) else {
        return;
    };
    let ability = unit.ability;
    let position = unit.position;
    let can_crit = unit.has_tag(UnitTags::ABILITY_CRIT);
    let crit_chance = unit.live.crit_chance;

    let crit = can_crit && ctx.rng.chance_pct(crit_chance, RollPurpose::Crit);
    if let Some(unit) = ctx.state.live_unit_mut(caster) {
        unit.set_pp(0);
        unit.counters.casts += 1;
        if crit {
            unit.counters.crits += 1;
        }
    }

    let target_position = target
        .and_then(|id| ctx.state.live_unit(id))
        .map(|unit| unit.position);
    ctx.emit(BattleEvent::AbilityCast {
        caster,
        ability,
        position,
        target: target_position,
        crit,
    });
    debug!(unit = %caster, %ability, crit, "ability cast");

    invoke(
        ctx,
        ability,
        &Cast {
            caster,
            target,
            crit,
        },
    );
}

/// Runs the handler registered for `ability`, absorbing its faults.
pub fn invoke(ctx: &mut BattleContext<'_>, ability: AbilityId, cast: &Cast) {
    let effect = ctx.registry.get(ability);
    if let Err(err) = (effect.apply)(ctx, cast) {
        let at_ms = err.context().map_or(ctx.now(), |context| context.elapsed_ms);
        if err.severity().is_bug() {
            warn!(
                unit = %cast.caster,
                %ability,
                code = err.error_code(),
                at_ms,
                %err,
                "ability handler aborted"
            );
        } else {
            debug!(
                unit = %cast.caster,
                %ability,
                code = err.error_code(),
                %err,
                "ability handler skipped"
            );
        }
    }
}
