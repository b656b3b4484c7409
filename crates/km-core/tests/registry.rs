//! Integration tests for the km-core registry.
use km_core::*;
use proptest::prelude::*;

fn knight(name: &str, gender: Gender) -> NewKnight {
    NewKnight {
        name: name.into(),
        gender,
        prowess: 2,
        bravery: 2,
        weapon: Weapon::Spear,
    }
}

fn realm() -> (World, Vec<HouseId>) {
    let mut world = World::new(Bishop::new(15));
    let houses = vec![
        world.add_house("Vell", Banner::new("black", "stag"), 3, 2),
        world.add_house("Morrow", Banner::new("amber", "wolf"), 2, 4),
        world.add_house("Ashby", Banner::new("red", "rose"), 4, 1),
    ];
    (world, houses)
}

#[test]
fn sponsored_married_knight_death() {
    let (mut world, houses) = realm();
    let a = world.add_knight(knight("Aldric", Gender::Male), houses[0]).unwrap();
    let b = world.add_knight(knight("Beatrix", Gender::Female), houses[0]).unwrap();
    world.sponsor(a).unwrap();
    world.wed(a, b).unwrap();

    let death = world.kill_knight(a).unwrap();

    assert_eq!(death.tithe, Some(10));
    assert_eq!(death.widowed, Some(b));
    assert_eq!(death.house_title, "House Vell");
    assert_eq!(world.bishop.coin, 25);
    assert!(world.bishop.sponsored.is_empty());
    assert_eq!(world.knight(b).unwrap().spouse, None);
    assert_eq!(world.house(houses[0]).unwrap().knights, vec![b]);
    assert!(world.integrity_violations().is_empty());
}

#[test]
fn destroyed_house_leaves_no_trace() {
    let (mut world, houses) = realm();
    let (vell, morrow, ashby) = (houses[0], houses[1], houses[2]);
    let doomed = world.add_knight(knight("Corin", Gender::Male), morrow).unwrap();
    let widow = world.add_knight(knight("Dara", Gender::Female), vell).unwrap();
    world.wed(doomed, widow).unwrap();
    world.sponsor(doomed).unwrap();

    let led = world.next_war_id();
    world.add_war(War::new(led, morrow, vell, 6));
    let joined = world.next_war_id();
    let mut war = War::new(joined, ashby, vell, 6);
    war.attackers.allies.push(morrow);
    world.add_war(war);

    let report = world.destroy_house(morrow).unwrap();

    assert_eq!(report.house.name, "Morrow");
    assert_eq!(report.deaths.len(), 1);
    assert_eq!(report.deaths[0].tithe, Some(20));
    assert_eq!(report.ended_wars.len(), 1);
    assert_eq!(report.ended_wars[0].id, led);
    assert_eq!(report.abandoned_wars, vec![joined]);

    assert!(!world.contains_house(morrow));
    assert!(!world.contains_knight(doomed));
    assert_eq!(world.knight(widow).unwrap().spouse, None);
    assert_eq!(world.wars().len(), 1);
    assert!(!world.wars()[0].involves(morrow));
    assert!(world.house(vell).unwrap().tension_toward(morrow).is_none());
    assert!(world.integrity_violations().is_empty());
}

#[test]
fn destroy_missing_house() {
    let (mut world, _) = realm();
    assert!(matches!(
        world.destroy_house(HouseId(77)),
        Err(CoreError::HouseNotFound(_))
    ));
}

#[test]
fn tension_never_negative() {
    let (mut world, houses) = realm();
    world.raise_tension(houses[0], houses[1], 2).unwrap();
    world.relieve_tension(houses[0], houses[1], 5).unwrap();
    assert_eq!(world.tension(houses[0], houses[1]).unwrap(), 0);
    assert_eq!(world.tension(houses[1], houses[0]).unwrap(), 0);
}

#[derive(Debug, Clone)]
enum Op {
    AddHouse,
    DestroyHouse(usize),
    AddKnight(usize),
    KillKnight(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddHouse),
        (0usize..8).prop_map(Op::DestroyHouse),
        (0usize..8).prop_map(Op::AddKnight),
        (0usize..16).prop_map(Op::KillKnight),
    ]
}

proptest! {
    #[test]
    fn registry_stays_consistent(ops in prop::collection::vec(op(), 1..40)) {
        let (mut world, _) = realm();
        let mut names = 0;
        for op in ops {
            match op {
                Op::AddHouse => {
                    names += 1;
                    world.add_house(format!("H{names}"), Banner::new("grey", "tower"), 2, 2);
                }
                Op::DestroyHouse(i) => {
                    let ids = world.house_ids();
                    if let Some(id) = ids.get(i) {
                        world.destroy_house(*id).unwrap();
                    }
                }
                Op::AddKnight(i) => {
                    let ids = world.house_ids();
                    if let Some(id) = ids.get(i) {
                        names += 1;
                        let k = world.add_knight(knight(&format!("K{names}"), Gender::Male), *id).unwrap();
                        if names % 2 == 0 {
                            world.sponsor(k).unwrap();
                        }
                    }
                }
                Op::KillKnight(i) => {
                    let id = world.knights().get(i).map(|k| k.id);
                    if let Some(id) = id {
                        world.kill_knight(id).unwrap();
                    }
                }
            }
            let problems = world.integrity_violations();
            prop_assert!(problems.is_empty(), "{:?}", problems);
        }
    }
}
