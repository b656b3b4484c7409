use std::fmt;

use km_mechanics::rules::{Reputation, recent_reputation, sponsorship_cost};
use km_mechanics::BattleResult;
use serde::{Deserialize, Serialize};

use crate::id::{HouseId, KnightId};
use crate::weapon::Weapon;

/// Slain knights needed before a knight earns a nickname.
pub const NICKNAME_KILLS: usize = 3;

/// A knight's gender, which decides their honorific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Addressed as "Lady".
    Female,
    /// Addressed as "Ser".
    Male,
}

impl Gender {
    /// Honorific used in titles.
    pub fn honorific(self) -> &'static str {
        match self {
            Self::Female => "Lady",
            Self::Male => "Ser",
        }
    }
}

/// A knight slain by another, remembered by name after removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlainKnight {
    /// Full title at the time of death.
    pub title: String,
    /// Name of the house they fought for.
    pub house: String,
}

/// Everything needed to register a new knight.
#[derive(Debug, Clone)]
pub struct NewKnight {
    /// Given name, unique among live knights.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Duel skill and casualty resistance.
    pub prowess: u32,
    /// Likelihood of being chosen as champion.
    pub bravery: u32,
    /// Weapon used in narration.
    pub weapon: Weapon,
}

/// A knight sworn to a house.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Knight {
    /// Registry identifier.
    pub id: KnightId,
    /// Given name.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Duel skill, 1 to 5.
    pub prowess: u32,
    /// Champion eagerness, 1 to 5.
    pub bravery: u32,
    /// Weapon used in narration.
    pub weapon: Weapon,
    /// The house this knight fights for.
    pub house: HouseId,
    /// Spouse, always mutual.
    pub spouse: Option<KnightId>,
    /// Extra duel dice, spent by the next duel.
    pub blessings: u32,
    /// House battle results, oldest first.
    pub battle_results: Vec<BattleResult>,
    /// Whether the bishop sponsors this knight.
    pub sponsored: bool,
    /// Knights this knight has slain in duels, oldest first.
    pub slain: Vec<SlainKnight>,
    /// Earned nickname; once set it never changes.
    pub nickname: Option<String>,
    /// Marked by prophecy; losing this knight loses the game.
    pub chosen: bool,
}

impl Knight {
    pub(crate) fn new(id: KnightId, recruit: NewKnight, house: HouseId) -> Self {
        Self {
            id,
            name: recruit.name,
            gender: recruit.gender,
            prowess: recruit.prowess,
            bravery: recruit.bravery,
            weapon: recruit.weapon,
            house,
            spouse: None,
            blessings: 0,
            battle_results: Vec::new(),
            sponsored: false,
            slain: Vec::new(),
            nickname: None,
            chosen: false,
        }
    }

    /// Full title, e.g. "Ser Aldric Vell the Blessed".
    pub fn title(&self, house_name: &str) -> String {
        let mut title = format!("{} {} {}", self.gender.honorific(), self.name, house_name);
        if let Some(nickname) = &self.nickname {
            title.push(' ');
            title.push_str(nickname);
        }
        if self.blessings > 0 {
            title.push_str(" the Blessed");
        }
        title
    }

    /// Reputation from the trailing window of battle results.
    pub fn reputation(&self) -> Reputation {
        recent_reputation(&self.battle_results)
    }

    /// Coin needed to sponsor this knight.
    pub fn cost(&self, house_might: u32) -> u32 {
        sponsorship_cost(self.prowess, house_might, self.reputation())
    }

    /// Duel pool: prowess plus blessings.
    pub fn duel_rating(&self) -> u32 {
        self.prowess + self.blessings
    }

    /// Remember a slain knight. Returns the nickname if this kill earned one.
    pub fn record_slain(&mut self, victim: SlainKnight) -> Option<&str> {
        let victim_house = victim.house.clone();
        self.slain.push(victim);
        if self.nickname.is_none() && self.slain.len() >= NICKNAME_KILLS {
            self.nickname = Some(format!(
                "the {victim_house}-{}",
                self.weapon.nickname_verb()
            ));
            return self.nickname.as_deref();
        }
        None
    }

    /// Battle record as a string of V and D.
    pub fn record_summary(&self) -> String {
        self.battle_results
            .iter()
            .map(|r| match r {
                BattleResult::Victory => "V",
                BattleResult::Defeat => "D",
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Female => write!(f, "female"),
            Self::Male => write!(f, "male"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight() -> Knight {
        Knight::new(
            KnightId(1),
            NewKnight {
                name: "Aldric".into(),
                gender: Gender::Male,
                prowess: 3,
                bravery: 2,
                weapon: Weapon::WarHammer,
            },
            HouseId(0),
        )
    }

    #[test]
    fn title_with_blessing() {
        let mut k = knight();
        assert_eq!(k.title("Vell"), "Ser Aldric Vell");
        k.blessings = 2;
        assert_eq!(k.title("Vell"), "Ser Aldric Vell the Blessed");
    }

    #[test]
    fn duel_rating_includes_blessings() {
        let mut k = knight();
        k.blessings = 2;
        assert_eq!(k.duel_rating(), 5);
    }

    #[test]
    fn nickname_after_third_kill_only_once() {
        let mut k = knight();
        let victim = |house: &str| SlainKnight {
            title: format!("Lady X {house}"),
            house: house.into(),
        };
        assert!(k.record_slain(victim("Morrow")).is_none());
        assert!(k.record_slain(victim("Morrow")).is_none());
        assert_eq!(k.record_slain(victim("Ashby")), Some("the Ashby-crusher"));
        assert!(k.record_slain(victim("Thorne")).is_none());
        assert_eq!(k.nickname.as_deref(), Some("the Ashby-crusher"));
        assert_eq!(k.title("Vell"), "Ser Aldric Vell the Ashby-crusher");
    }

    #[test]
    fn cost_uses_house_might() {
        let k = knight();
        assert_eq!(k.cost(4), 13);
    }

    #[test]
    fn record_summary_letters() {
        let mut k = knight();
        k.battle_results = vec![BattleResult::Victory, BattleResult::Defeat];
        assert_eq!(k.record_summary(), "V D");
    }
}
