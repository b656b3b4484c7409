use std::fmt;

use serde::{Deserialize, Serialize};

/// The weapon a knight fights with.
///
/// Weapons only change narration: each has a kill message and the verb
/// used when a knight earns a nickname.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weapon {
    /// A spear.
    Spear,
    /// A sword.
    Sword,
    /// A war hammer.
    WarHammer,
}

impl Weapon {
    /// Every weapon, in table order.
    pub const ALL: [Self; 3] = [Self::Spear, Self::Sword, Self::WarHammer];

    /// Display name of the weapon.
    pub fn name(self) -> &'static str {
        match self {
            Self::Spear => "spear",
            Self::Sword => "sword",
            Self::WarHammer => "war hammer",
        }
    }

    /// Agent noun used in nicknames ("the Vell-crusher").
    pub fn nickname_verb(self) -> &'static str {
        match self {
            Self::Spear => "piercer",
            Self::Sword => "slayer",
            Self::WarHammer => "crusher",
        }
    }

    /// Narrate one knight killing another with this weapon.
    pub fn kill_message(self, victor: &str, victim: &str) -> String {
        match self {
            Self::Spear => format!("{victor} impaled {victim}"),
            Self::Sword => format!("{victor} pierced {victim}'s heart"),
            Self::WarHammer => format!("{victor} caved in {victim}'s chest"),
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_messages_name_both_knights() {
        for weapon in Weapon::ALL {
            let msg = weapon.kill_message("Ser Aldo", "Lady Brin");
            assert!(msg.starts_with("Ser Aldo"));
            assert!(msg.contains("Lady Brin"));
        }
    }

    #[test]
    fn verbs_are_distinct() {
        assert_eq!(Weapon::Spear.nickname_verb(), "piercer");
        assert_eq!(Weapon::Sword.nickname_verb(), "slayer");
        assert_eq!(Weapon::WarHammer.nickname_verb(), "crusher");
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Weapon::WarHammer.to_string(), "war hammer");
    }
}
