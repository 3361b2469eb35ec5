//! Immutable weapon and spell tables. Units point into these by id.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRule {
    #[default]
    None,
    CriticalHit,
    Lifesteal,
    DeathWound,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub range: i32,
    pub attacks: u32,
    #[serde(default)]
    pub bonus_strength: i32,
    #[serde(default)]
    pub bonus_damage: i32,
    #[serde(default)]
    pub special_rule: SpecialRule,
}

impl Weapon {
    /// Range 1 is melee only; anything longer can shoot.
    pub fn is_ranged(&self) -> bool {
        self.range > 1
    }

    pub fn damage_per_hit(&self) -> i32 {
        1 + self.bonus_damage
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellTarget {
    Ally,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellEffect {
    ToughnessBuff,
    AccuracyDebuff,
    StrengthBuff,
    DamageAndKnockback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    /// A 2d6 roll must meet or beat this.
    pub cost: i32,
    pub target: SpellTarget,
    pub effect: SpellEffect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId(pub usize);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    weapons: Vec<Weapon>,
    spells: Vec<Spell>,
}

impl Catalog {
    pub fn new(weapons: Vec<Weapon>, spells: Vec<Spell>) -> Self {
        Self { weapons, spells }
    }

    /// The stock armoury and grimoire shipped with the game.
    pub fn standard() -> Self {
        Self::new(standard_weapons(), standard_spells())
    }

    /// Panics on an id that did not come from this catalog.
    pub fn weapon(&self, id: WeaponId) -> &Weapon {
        &self.weapons[id.0]
    }

    pub fn weapons(&self) -> impl Iterator<Item = (WeaponId, &Weapon)> {
        self.weapons
            .iter()
            .enumerate()
            .map(|(idx, weapon)| (WeaponId(idx), weapon))
    }

    pub fn find_weapon(&self, name: &str) -> Option<WeaponId> {
        self.weapons
            .iter()
            .position(|weapon| weapon.name == name)
            .map(WeaponId)
    }

    /// Fallback for unmatched weapon names: the second entry, or the only one.
    pub fn default_weapon(&self) -> Option<WeaponId> {
        match self.weapons.len() {
            0 => None,
            1 => Some(WeaponId(0)),
            _ => Some(WeaponId(1)),
        }
    }

    pub fn spell(&self, id: SpellId) -> Option<&Spell> {
        self.spells.get(id.0)
    }

    pub fn spells(&self) -> impl Iterator<Item = (SpellId, &Spell)> {
        self.spells
            .iter()
            .enumerate()
            .map(|(idx, spell)| (SpellId(idx), spell))
    }

    pub fn find_spell(&self, name: &str) -> Option<SpellId> {
        self.spells
            .iter()
            .position(|spell| spell.name == name)
            .map(SpellId)
    }
}

fn weapon(
    name: &str,
    range: i32,
    attacks: u32,
    bonus_strength: i32,
    special_rule: SpecialRule,
) -> Weapon {
    Weapon {
        name: name.to_string(),
        range,
        attacks,
        bonus_strength,
        bonus_damage: 0,
        special_rule,
    }
}

fn standard_weapons() -> Vec<Weapon> {
    vec![
        weapon("Bestial Blades", 1, 7, 1, SpecialRule::CriticalHit),
        weapon("Bestial Staff", 1, 3, 0, SpecialRule::Lifesteal),
        weapon("Crossbow of Death", 4, 3, 0, SpecialRule::None),
        weapon("Spectral Axe", 1, 8, 2, SpecialRule::DeathWound),
        weapon("Bestial Bow", 3, 2, 0, SpecialRule::CriticalHit),
    ]
}

fn standard_spells() -> Vec<Spell> {
    let spell = |name: &str, cost, target, effect| Spell {
        name: name.to_string(),
        cost,
        target,
        effect,
    };
    vec![
        spell(
            "Old Forest Roots",
            4,
            SpellTarget::Ally,
            SpellEffect::ToughnessBuff,
        ),
        spell(
            "Twisted Instincts",
            6,
            SpellTarget::Enemy,
            SpellEffect::AccuracyDebuff,
        ),
        spell("Gore Blades", 7, SpellTarget::Ally, SpellEffect::StrengthBuff),
        spell(
            "Bestial Rampage",
            10,
            SpellTarget::Enemy,
            SpellEffect::DamageAndKnockback,
        ),
    ]
}
