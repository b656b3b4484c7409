use serde::{Deserialize, Serialize};

use crate::banner::Banner;
use crate::bishop::Bishop;
use crate::error::{CoreError, CoreResult};
use crate::house::{DiplomaticRelation, House};
use crate::id::{HouseId, KnightId, WarId};
use crate::knight::{Knight, NewKnight};
use crate::war::{Alliance, War};

/// Coin a house pays the sponsor per point of wealth when a sponsored knight dies.
pub const FUNERAL_TITHE_PER_WEALTH: u32 = 5;

/// What happened when a knight was killed.
#[derive(Debug, Clone)]
pub struct KnightDeath {
    /// The removed knight.
    pub knight: Knight,
    /// The knight's title at the moment of death.
    pub title: String,
    /// Title of the house that lost the knight.
    pub house_title: String,
    /// Coin paid to the bishop, if the knight was sponsored.
    pub tithe: Option<u32>,
    /// The surviving spouse, if the knight was married.
    pub widowed: Option<KnightId>,
}

/// What happened when a house was destroyed.
#[derive(Debug, Clone)]
pub struct HouseDestruction {
    /// The removed house.
    pub house: House,
    /// Every member knight, killed in list order.
    pub deaths: Vec<KnightDeath>,
    /// Wars the house led, removed from the registry.
    pub ended_wars: Vec<War>,
    /// Wars the house had joined as an ally and was dropped from.
    pub abandoned_wars: Vec<WarId>,
}

/// The registry. Sole owner of every house, knight and war.
///
/// Iteration order is creation order for houses and knights and
/// declaration order for wars, so a seeded game replays exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// The player.
    pub bishop: Bishop,
    /// Seasons played so far.
    pub season: u32,
    houses: Vec<House>,
    knights: Vec<Knight>,
    wars: Vec<War>,
    next_id: u64,
}

impl World {
    /// An empty world with the given bishop.
    pub fn new(bishop: Bishop) -> Self {
        Self {
            bishop,
            ..Self::default()
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // -----------------------------------------------------------------------
    // Houses
    // -----------------------------------------------------------------------

    /// Register a house with a zero-tension relation toward every live
    /// house, and every live house toward it.
    pub fn add_house(
        &mut self,
        name: impl Into<String>,
        banner: Banner,
        might: u32,
        wealth: u32,
    ) -> HouseId {
        let id = HouseId(self.allocate_id());
        let mut relations = std::collections::BTreeMap::new();
        for other in &mut self.houses {
            other.relations.insert(id, DiplomaticRelation::default());
            relations.insert(other.id, DiplomaticRelation::default());
        }
        self.houses.push(House {
            id,
            name: name.into(),
            banner,
            might,
            wealth,
            knights: Vec::new(),
            relations,
        });
        tracing::debug!(%id, "house registered");
        id
    }

    /// All live houses in creation order.
    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    /// Identifiers of all live houses in creation order.
    pub fn house_ids(&self) -> Vec<HouseId> {
        self.houses.iter().map(|h| h.id).collect()
    }

    /// Look up a house.
    pub fn house(&self, id: HouseId) -> CoreResult<&House> {
        self.houses
            .iter()
            .find(|h| h.id == id)
            .ok_or(CoreError::HouseNotFound(id))
    }

    /// Look up a house mutably.
    pub fn house_mut(&mut self, id: HouseId) -> CoreResult<&mut House> {
        self.houses
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(CoreError::HouseNotFound(id))
    }

    /// Returns true if the house is registered.
    pub fn contains_house(&self, id: HouseId) -> bool {
        self.houses.iter().any(|h| h.id == id)
    }

    /// Find a house by name (case-insensitive).
    pub fn find_house_by_name(&self, name: &str) -> CoreResult<&House> {
        self.houses
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::NoHouseNamed(name.to_string()))
    }

    // -----------------------------------------------------------------------
    // Knights
    // -----------------------------------------------------------------------

    /// Register a knight as the newest member of a house.
    pub fn add_knight(&mut self, recruit: NewKnight, house: HouseId) -> CoreResult<KnightId> {
        if !self.contains_house(house) {
            return Err(CoreError::HouseNotFound(house));
        }
        let id = KnightId(self.allocate_id());
        self.knights.push(Knight::new(id, recruit, house));
        self.house_mut(house)?.knights.push(id);
        Ok(id)
    }

    /// All live knights in creation order.
    pub fn knights(&self) -> &[Knight] {
        &self.knights
    }

    /// Look up a knight.
    pub fn knight(&self, id: KnightId) -> CoreResult<&Knight> {
        self.knights
            .iter()
            .find(|k| k.id == id)
            .ok_or(CoreError::KnightNotFound(id))
    }

    /// Look up a knight mutably.
    pub fn knight_mut(&mut self, id: KnightId) -> CoreResult<&mut Knight> {
        self.knights
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or(CoreError::KnightNotFound(id))
    }

    /// Returns true if the knight is registered.
    pub fn contains_knight(&self, id: KnightId) -> bool {
        self.knights.iter().any(|k| k.id == id)
    }

    /// Find a knight by given name (case-insensitive).
    pub fn find_knight_by_name(&self, name: &str) -> CoreResult<&Knight> {
        self.knights
            .iter()
            .find(|k| k.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::NoKnightNamed(name.to_string()))
    }

    /// Returns true if a live knight already uses this given name.
    pub fn knight_name_taken(&self, name: &str) -> bool {
        self.find_knight_by_name(name).is_ok()
    }

    /// A knight's full title, including their house name.
    pub fn knight_title(&self, id: KnightId) -> CoreResult<String> {
        let knight = self.knight(id)?;
        let house = self.house(knight.house)?;
        Ok(knight.title(&house.name))
    }

    /// Mark a knight as sponsored by the bishop.
    pub fn sponsor(&mut self, id: KnightId) -> CoreResult<()> {
        self.knight_mut(id)?.sponsored = true;
        if !self.bishop.sponsors(id) {
            self.bishop.sponsored.push(id);
        }
        Ok(())
    }

    /// Move a knight from their house to the end of another house's list.
    pub fn transfer_knight(&mut self, id: KnightId, to: HouseId) -> CoreResult<()> {
        if !self.contains_house(to) {
            return Err(CoreError::HouseNotFound(to));
        }
        let from = self.knight(id)?.house;
        self.house_mut(from)?.knights.retain(|k| *k != id);
        self.house_mut(to)?.knights.push(id);
        self.knight_mut(id)?.house = to;
        Ok(())
    }

    /// Link two knights as spouses of each other.
    pub fn wed(&mut self, a: KnightId, b: KnightId) -> CoreResult<()> {
        self.knight(b)?;
        self.knight_mut(a)?.spouse = Some(b);
        self.knight_mut(b)?.spouse = Some(a);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Diplomacy
    // -----------------------------------------------------------------------

    /// Tension `holder` feels toward `toward`.
    pub fn tension(&self, holder: HouseId, toward: HouseId) -> CoreResult<u32> {
        if holder == toward {
            return Err(CoreError::SelfRelation(holder));
        }
        self.house(holder)?
            .tension_toward(toward)
            .ok_or(CoreError::HouseNotFound(toward))
    }

    fn relation_mut(
        &mut self,
        holder: HouseId,
        toward: HouseId,
    ) -> CoreResult<&mut DiplomaticRelation> {
        if holder == toward {
            return Err(CoreError::SelfRelation(holder));
        }
        self.house_mut(holder)?
            .relations
            .get_mut(&toward)
            .ok_or(CoreError::HouseNotFound(toward))
    }

    /// Raise the tension `holder` feels toward `toward`. Returns the new value.
    pub fn raise_tension(&mut self, holder: HouseId, toward: HouseId, amount: u32) -> CoreResult<u32> {
        let relation = self.relation_mut(holder, toward)?;
        relation.tension += amount;
        Ok(relation.tension)
    }

    /// Lower tension in both directions, never below 0.
    pub fn relieve_tension(&mut self, a: HouseId, b: HouseId, amount: u32) -> CoreResult<()> {
        let forward = self.relation_mut(a, b)?;
        forward.tension = forward.tension.saturating_sub(amount);
        let backward = self.relation_mut(b, a)?;
        backward.tension = backward.tension.saturating_sub(amount);
        Ok(())
    }

    /// Set tension in both directions to 0.
    pub fn reset_tension(&mut self, a: HouseId, b: HouseId) -> CoreResult<()> {
        self.relation_mut(a, b)?.tension = 0;
        self.relation_mut(b, a)?.tension = 0;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Wars
    // -----------------------------------------------------------------------

    /// Reserve an identifier for a war that is not registered yet.
    pub fn next_war_id(&mut self) -> WarId {
        WarId(self.allocate_id())
    }

    /// Register a war.
    pub fn add_war(&mut self, war: War) -> WarId {
        let id = war.id;
        self.wars.push(war);
        id
    }

    /// All live wars in declaration order.
    pub fn wars(&self) -> &[War] {
        &self.wars
    }

    /// Identifiers of all live wars in declaration order.
    pub fn war_ids(&self) -> Vec<WarId> {
        self.wars.iter().map(|w| w.id).collect()
    }

    /// Look up a war.
    pub fn war(&self, id: WarId) -> CoreResult<&War> {
        self.wars
            .iter()
            .find(|w| w.id == id)
            .ok_or(CoreError::WarNotFound(id))
    }

    /// Look up a war mutably.
    pub fn war_mut(&mut self, id: WarId) -> CoreResult<&mut War> {
        self.wars
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(CoreError::WarNotFound(id))
    }

    /// Unregister a war.
    pub fn remove_war(&mut self, id: WarId) -> CoreResult<War> {
        let idx = self
            .wars
            .iter()
            .position(|w| w.id == id)
            .ok_or(CoreError::WarNotFound(id))?;
        Ok(self.wars.remove(idx))
    }

    /// Number of live wars the house fights in, on either side.
    pub fn wars_involving(&self, house: HouseId) -> usize {
        self.wars.iter().filter(|w| w.involves(house)).count()
    }

    /// Returns true if the house fights in any live war.
    pub fn is_at_war(&self, house: HouseId) -> bool {
        self.wars.iter().any(|w| w.involves(house))
    }

    /// Returns true if the houses fight on opposite sides of some live war.
    pub fn at_war_with(&self, a: HouseId, b: HouseId) -> bool {
        self.wars.iter().any(|w| w.opposes(a, b))
    }

    /// Base might of the leader plus every ally still registered.
    pub fn alliance_might(&self, alliance: &Alliance) -> u32 {
        alliance
            .combatants()
            .into_iter()
            .filter_map(|id| self.house(id).ok())
            .map(|h| h.might)
            .sum()
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Kill a knight.
    ///
    /// Pays the funeral tithe if sponsored and widows the spouse while the
    /// spouse link is still resolvable, then removes the knight from their
    /// house, the bishop's sponsored list and the registry.
    pub fn kill_knight(&mut self, id: KnightId) -> CoreResult<KnightDeath> {
        let knight = self.knight(id)?;
        let (house_id, sponsored, spouse) = (knight.house, knight.sponsored, knight.spouse);
        let house = self.house(house_id)?;
        let title = knight.title(&house.name);
        let house_title = house.title();
        let wealth = house.wealth;

        let tithe = sponsored.then(|| {
            let amount = FUNERAL_TITHE_PER_WEALTH * wealth;
            self.bishop.coin += amount;
            amount
        });

        let widowed = spouse.and_then(|spouse_id| {
            let partner = self.knights.iter_mut().find(|k| k.id == spouse_id)?;
            partner.spouse = None;
            Some(spouse_id)
        });

        self.house_mut(house_id)?.knights.retain(|k| *k != id);
        if sponsored {
            self.bishop.sponsored.retain(|k| *k != id);
        }
        let idx = self
            .knights
            .iter()
            .position(|k| k.id == id)
            .ok_or(CoreError::KnightNotFound(id))?;
        let knight = self.knights.remove(idx);

        tracing::debug!(%id, ?tithe, ?widowed, "knight killed");
        Ok(KnightDeath {
            knight,
            title,
            house_title,
            tithe,
            widowed,
        })
    }

    /// Destroy a house.
    ///
    /// Drops every relation toward it, unregisters the wars it leads,
    /// removes it from the wars it joined, kills its knights and finally
    /// unregisters the house itself.
    pub fn destroy_house(&mut self, id: HouseId) -> CoreResult<HouseDestruction> {
        if !self.contains_house(id) {
            return Err(CoreError::HouseNotFound(id));
        }

        for other in &mut self.houses {
            other.relations.remove(&id);
        }

        let (ended_wars, remaining): (Vec<War>, Vec<War>) =
            std::mem::take(&mut self.wars)
                .into_iter()
                .partition(|w| w.is_led_by(id));
        self.wars = remaining;

        let abandoned_wars = self
            .wars
            .iter_mut()
            .filter_map(|w| w.remove_ally(id).then_some(w.id))
            .collect();

        let members = self.house(id)?.knights.clone();
        let deaths = members
            .into_iter()
            .map(|knight| self.kill_knight(knight))
            .collect::<CoreResult<Vec<_>>>()?;

        let idx = self
            .houses
            .iter()
            .position(|h| h.id == id)
            .ok_or(CoreError::HouseNotFound(id))?;
        let house = self.houses.remove(idx);

        tracing::info!(%id, name = %house.name, "house destroyed");
        Ok(HouseDestruction {
            house,
            deaths,
            ended_wars,
            abandoned_wars,
        })
    }

    // -----------------------------------------------------------------------
    // Integrity
    // -----------------------------------------------------------------------

    /// Every broken cross-reference in the registry, as readable messages.
    /// An empty list means the world is consistent.
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for house in &self.houses {
            if house.relations.contains_key(&house.id) {
                problems.push(format!("{} has a relation with itself", house.id));
            }
            for other in &self.houses {
                if other.id != house.id && !house.relations.contains_key(&other.id) {
                    problems.push(format!("{} has no relation toward {}", house.id, other.id));
                }
            }
            for target in house.relations.keys() {
                if !self.contains_house(*target) {
                    problems.push(format!("{} relates to missing {target}", house.id));
                }
            }
            for member in &house.knights {
                match self.knight(*member) {
                    Ok(k) if k.house == house.id => {}
                    Ok(k) => problems.push(format!("{member} listed in {} but sworn to {}", house.id, k.house)),
                    Err(_) => problems.push(format!("{} lists missing {member}", house.id)),
                }
            }
        }

        for knight in &self.knights {
            match self.house(knight.house) {
                Ok(h) if h.knights.contains(&knight.id) => {}
                _ => problems.push(format!("{} missing from {}", knight.id, knight.house)),
            }
            if let Some(spouse) = knight.spouse {
                match self.knight(spouse) {
                    Ok(s) if s.spouse == Some(knight.id) => {}
                    _ => problems.push(format!("{} married to {spouse} one-sidedly", knight.id)),
                }
            }
            if knight.sponsored != self.bishop.sponsors(knight.id) {
                problems.push(format!("{} sponsorship out of sync", knight.id));
            }
        }

        for sponsored in &self.bishop.sponsored {
            if !self.contains_knight(*sponsored) {
                problems.push(format!("bishop sponsors missing {sponsored}"));
            }
        }

        for war in &self.wars {
            for house in war.attackers.combatants().iter().chain(&war.defenders.combatants()) {
                if !self.contains_house(*house) {
                    problems.push(format!("{} references missing {house}", war.id));
                }
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knight::Gender;
    use crate::weapon::Weapon;

    fn recruit(name: &str) -> NewKnight {
        NewKnight {
            name: name.into(),
            gender: Gender::Female,
            prowess: 3,
            bravery: 3,
            weapon: Weapon::Sword,
        }
    }

    fn two_houses() -> (World, HouseId, HouseId) {
        let mut world = World::new(Bishop::new(15));
        let a = world.add_house("Vell", Banner::new("black", "stag"), 3, 2);
        let b = world.add_house("Morrow", Banner::new("amber", "wolf"), 2, 4);
        (world, a, b)
    }

    #[test]
    fn new_house_relates_to_all() {
        let (mut world, a, b) = two_houses();
        let c = world.add_house("Ashby", Banner::new("red", "rose"), 1, 1);
        for (x, y) in [(a, b), (a, c), (b, a), (b, c), (c, a), (c, b)] {
            assert_eq!(world.tension(x, y).unwrap(), 0);
        }
        assert!(matches!(world.tension(a, a), Err(CoreError::SelfRelation(_))));
        assert!(world.integrity_violations().is_empty());
    }

    #[test]
    fn ids_never_reused() {
        let (mut world, a, _) = two_houses();
        let k = world.add_knight(recruit("Brin"), a).unwrap();
        world.kill_knight(k).unwrap();
        let k2 = world.add_knight(recruit("Brin"), a).unwrap();
        assert_ne!(k, k2);
    }

    #[test]
    fn add_knight_to_missing_house() {
        let (mut world, _, _) = two_houses();
        assert!(matches!(
            world.add_knight(recruit("Brin"), HouseId(99)),
            Err(CoreError::HouseNotFound(HouseId(99)))
        ));
    }

    #[test]
    fn find_by_name_ignores_case() {
        let (mut world, a, _) = two_houses();
        let k = world.add_knight(recruit("Brin"), a).unwrap();
        assert_eq!(world.find_knight_by_name("brin").unwrap().id, k);
        assert_eq!(world.find_house_by_name("VELL").unwrap().id, a);
        assert!(matches!(
            world.find_knight_by_name("nobody"),
            Err(CoreError::NoKnightNamed(_))
        ));
    }

    #[test]
    fn tension_raise_and_relieve() {
        let (mut world, a, b) = two_houses();
        assert_eq!(world.raise_tension(a, b, 3).unwrap(), 3);
        assert_eq!(world.tension(b, a).unwrap(), 0);
        world.raise_tension(b, a, 7).unwrap();
        world.relieve_tension(a, b, 5).unwrap();
        assert_eq!(world.tension(a, b).unwrap(), 0);
        assert_eq!(world.tension(b, a).unwrap(), 2);
        world.reset_tension(a, b).unwrap();
        assert_eq!(world.tension(b, a).unwrap(), 0);
    }

    #[test]
    fn transfer_moves_membership() {
        let (mut world, a, b) = two_houses();
        let k = world.add_knight(recruit("Brin"), a).unwrap();
        world.transfer_knight(k, b).unwrap();
        assert!(world.house(a).unwrap().knights.is_empty());
        assert_eq!(world.house(b).unwrap().knights, vec![k]);
        assert_eq!(world.knight(k).unwrap().house, b);
        assert!(world.integrity_violations().is_empty());
    }

    #[test]
    fn kill_unsponsored_unmarried() {
        let (mut world, a, _) = two_houses();
        let k = world.add_knight(recruit("Brin"), a).unwrap();
        let death = world.kill_knight(k).unwrap();
        assert_eq!(death.title, "Lady Brin Vell");
        assert_eq!(death.tithe, None);
        assert_eq!(death.widowed, None);
        assert_eq!(world.bishop.coin, 15);
        assert!(!world.contains_knight(k));
        assert!(matches!(world.kill_knight(k), Err(CoreError::KnightNotFound(_))));
    }

    #[test]
    fn wars_involving_counts_both_sides() {
        let (mut world, a, b) = two_houses();
        let c = world.add_house("Ashby", Banner::new("red", "rose"), 1, 1);
        let id = world.next_war_id();
        world.add_war(War::new(id, a, b, 6));
        let id = world.next_war_id();
        let mut second = War::new(id, c, b, 6);
        second.attackers.allies.push(a);
        world.add_war(second);
        assert_eq!(world.wars_involving(a), 2);
        assert_eq!(world.wars_involving(b), 2);
        assert_eq!(world.wars_involving(c), 1);
        assert!(world.at_war_with(a, b));
        assert!(!world.at_war_with(a, c));
        assert_eq!(world.alliance_might(&world.wars()[1].attackers), 4);
    }

    #[test]
    fn remove_missing_war() {
        let (mut world, _, _) = two_houses();
        assert!(matches!(world.remove_war(WarId(42)), Err(CoreError::WarNotFound(_))));
    }

    #[test]
    fn world_serializes() {
        let (mut world, a, _) = two_houses();
        world.add_knight(recruit("Brin"), a).unwrap();
        let json = serde_json::to_string(&world).unwrap();
        assert!(json.contains("Brin"));
        assert!(json.contains("Morrow"));
    }
}
