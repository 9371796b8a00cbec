/// Identifier of a unit's special ability.
///
/// The registry maps every id to its handler; ids without a registered
/// handler resolve to the no-op default. Names this build does not know
/// deserialize to [`AbilityId::Default`] as well.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityId {
    // ========================================================================
    // Single target and lines
    // ========================================================================
    Thunder,
    SolarBeam,
    Guillotine,
    GigaDrain,
    Counter,
    LockOn,
    NightSlash,
    IceBeam,
    DragonBreath,

    // ========================================================================
    // Areas
    // ========================================================================
    Earthquake,
    Blizzard,
    Discharge,
    SelfDestruct,
    HeatWave,

    // ========================================================================
    // Crowd control
    // ========================================================================
    Hypnosis,
    Attract,
    ConfuseRay,
    Toxic,
    WillOWisp,
    Disable,
    Screech,
    ThunderWave,

    // ========================================================================
    // Support
    // ========================================================================
    Wish,
    Recover,
    Protect,
    Aromatherapy,
    Safeguard,
    IronDefense,
    SwordsDance,
    Agility,
    HelpingHand,

    // ========================================================================
    // Mobility
    // ========================================================================
    Teleport,
    FlyAway,
    ShadowSneak,
    Dig,
    Switcheroo,

    // ========================================================================
    // Delayed
    // ========================================================================
    FutureSight,
    DoomDesire,
    FireSpin,

    // ========================================================================
    // Terrain
    // ========================================================================
    Smog,
    StickyWeb,
    GrassyTerrain,
    Inferno,
    Smokescreen,

    // ========================================================================
    // Reflection (never copyable)
    // ========================================================================
    /// Casts the observed target's ability as its own.
    Mimic,
    /// Casts a uniformly random copyable ability.
    Metronome,
    /// Permanently adopts the target's ability and offensive stats.
    Transform,

    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Default,
}

impl AbilityId {
    /// Reflection abilities must never be reachable from other reflections.
    pub const fn is_reflection(self) -> bool {
        matches!(self, Self::Mimic | Self::Metronome | Self::Transform)
    }
}
