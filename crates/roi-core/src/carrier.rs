//! Carrier tags: the technology or energy domain attached to buses and components.
//!
//! Carriers are the grouping key of every aggregation. The set of tags a
//! sector-coupled model emits is known in advance, so they are modelled as a
//! closed enumeration; anything else lands in [`Carrier::Unknown`], which
//! still aggregates normally but can be detected with [`Carrier::is_known`].
//!
//! ```
//! use roi_core::Carrier;
//!
//! assert_eq!(Carrier::from("central_heat"), Carrier::CentralHeat);
//! assert_eq!(Carrier::from("AC").as_str(), "AC");
//!
//! let odd = Carrier::from("heat_pump");
//! assert!(!odd.is_known());
//! assert_eq!(odd.as_str(), "heat_pump");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! carriers {
    ($($(#[$meta:meta])* $variant:ident => $tag:literal,)+) => {
        /// Closed set of known carrier tags plus an explicit unknown fallback.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum Carrier {
            $($(#[$meta])* $variant,)+
            /// A tag outside the known set, kept verbatim.
            Unknown(String),
        }

        impl Carrier {
            /// Every known carrier, in declaration order.
            pub const KNOWN: &'static [Carrier] = &[$(Carrier::$variant,)+];

            /// The tag as it appears in network data.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Carrier::$variant => $tag,)+
                    Carrier::Unknown(tag) => tag.as_str(),
                }
            }

            fn from_known_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(Carrier::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

carriers! {
    // bus domains
    /// Electricity (AC buses)
    Ac => "AC",
    Dc => "DC",
    /// District heating
    CentralHeat => "central_heat",
    /// Building-level heating
    RuralHeat => "rural_heat",
    Ch4 => "CH4",
    H2Grid => "H2_grid",
    H2Saltcavern => "H2_saltcavern",

    // conversion links
    CentralHeatPump => "central_heat_pump",
    RuralHeatPump => "rural_heat_pump",
    CentralResistiveHeater => "central_resistive_heater",
    CentralGasBoiler => "central_gas_boiler",
    RuralGasBoiler => "rural_gas_boiler",
    CentralGasChp => "central_gas_CHP",
    CentralGasChpHeat => "central_gas_CHP_heat",
    CentralWasteChp => "central_waste_CHP",
    CentralWasteChpHeat => "central_waste_CHP_heat",
    Ocgt => "OCGT",
    H2ToCh4 => "H2_to_CH4",
    H2ToPower => "H2_to_power",
    PowerToH2 => "power_to_H2",
    Ch4ToH2 => "CH4_to_H2",

    // storage interfaces (links feeding/draining a store)
    CentralHeatStoreCharger => "central_heat_store_charger",
    CentralHeatStoreDischarger => "central_heat_store_discharger",
    RuralHeatStoreCharger => "rural_heat_store_charger",
    RuralHeatStoreDischarger => "rural_heat_store_discharger",

    // stores and storage units
    CentralHeatStore => "central_heat_store",
    RuralHeatStore => "rural_heat_store",
    H2Overground => "H2_overground",
    H2Underground => "H2_underground",
    Battery => "battery",

    // generators
    LoadShedding => "load shedding",
    Solar => "solar",
    SolarRooftop => "solar_rooftop",
    WindOnshore => "wind_onshore",
    WindOffshore => "wind_offshore",
    RunOfRiver => "run_of_river",
    Reservoir => "reservoir",
    Biomass => "biomass",
    SolarThermalCollector => "solar_thermal_collector",
    GeoThermal => "geo_thermal",

    // pseudo-carriers produced by flow accounting
    BatteryDischarge => "battery_discharge",
    Import => "import",
}

impl Carrier {
    pub fn is_known(&self) -> bool {
        !matches!(self, Carrier::Unknown(_))
    }

    /// Links that move energy into or out of a store. Their power rating
    /// mirrors the store's own capacity and is kept out of capacity totals.
    pub fn is_storage_interface(&self) -> bool {
        matches!(
            self,
            Carrier::CentralHeatStoreCharger
                | Carrier::CentralHeatStoreDischarger
                | Carrier::RuralHeatStoreCharger
                | Carrier::RuralHeatStoreDischarger
        )
    }

    /// The load-shedding pseudo-technology of the optimizer.
    pub fn is_load_shedding(&self) -> bool {
        matches!(self, Carrier::LoadShedding)
    }
}

impl From<&str> for Carrier {
    fn from(tag: &str) -> Self {
        Carrier::from_known_tag(tag).unwrap_or_else(|| Carrier::Unknown(tag.to_string()))
    }
}

impl From<String> for Carrier {
    fn from(tag: String) -> Self {
        match Carrier::from_known_tag(&tag) {
            Some(known) => known,
            None => Carrier::Unknown(tag),
        }
    }
}

impl From<Carrier> for String {
    fn from(carrier: Carrier) -> Self {
        match carrier {
            Carrier::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Carrier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Carrier::from(s))
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_known_tag_round_trips() {
        for carrier in Carrier::KNOWN {
            assert_eq!(&Carrier::from(carrier.as_str()), carrier);
            assert!(carrier.is_known());
        }
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert_eq!(Carrier::from("ac"), Carrier::Unknown("ac".into()));
    }

    #[test]
    fn test_storage_interface_family() {
        let interfaces: Vec<_> = Carrier::KNOWN
            .iter()
            .filter(|c| c.is_storage_interface())
            .collect();
        assert_eq!(interfaces.len(), 4);
        assert!(!Carrier::CentralHeatStore.is_storage_interface());
    }

    #[test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&Carrier::LoadShedding).unwrap();
        assert_eq!(json, "\"load shedding\"");
        let parsed: Carrier = serde_json::from_str("\"H2_to_CH4\"").unwrap();
        assert_eq!(parsed, Carrier::H2ToCh4);
        let unknown: Carrier = serde_json::from_str("\"fusion\"").unwrap();
        assert_eq!(unknown, Carrier::Unknown("fusion".into()));
    }
}
