use std::fmt;

/// Fixed duty of a vehicle.  Chosen at construction and never changed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Role {
    /// Collects parcels from the network and drops them at depots.
    Pickup,
    /// Loads parcels from depots and delivers them to their destinations.
    Delivery,
    /// Serves parcels end to end without depots, nearest job first.
    Courier,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Pickup   => "pickup",
            Role::Delivery => "delivery",
            Role::Courier  => "courier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
