use serde::{Deserialize, Serialize};

use crate::id::KnightId;

/// The glory bishop: a member of the church who sponsors knights.
///
/// The player is the bishop. Coin is spent on sponsorships and glory on
/// blessings and marriages; callers check balances before spending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bishop {
    /// Coin available for sponsorships.
    pub coin: u32,
    /// Glory earned from sponsored knights.
    pub glory: u32,
    /// Knights currently sponsored, in sponsorship order.
    pub sponsored: Vec<KnightId>,
}

impl Bishop {
    /// A bishop with a starting purse.
    pub fn new(coin: u32) -> Self {
        Self {
            coin,
            ..Self::default()
        }
    }

    /// Returns true if the knight is sponsored by this bishop.
    pub fn sponsors(&self, knight: KnightId) -> bool {
        self.sponsored.contains(&knight)
    }
}
