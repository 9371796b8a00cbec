/// Battlefield weather, fixed for the whole battle.
///
/// Produced by an external synergy system and consulted by a minority of
/// ability handlers.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Weather {
    #[default]
    Neutral,
    Sun,
    Rain,
    Sandstorm,
    Snow,
    Night,
    Misty,
    Storm,
    Windy,
}
