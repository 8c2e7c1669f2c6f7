use roi_core::{Carrier, CarrierTable};
use serde::{Deserialize, Serialize};

/// Technology families compared side by side across scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnologyGroup {
    /// Hydrogen back to methane or power
    HydrogenReconversion,
    HydrogenProduction,
    CentralHeatStorage,
    /// Building-level heat stores and hydrogen storage
    DecentralStorage,
    StorageInterfaces,
    Battery,
}

impl TechnologyGroup {
    pub const ALL: [TechnologyGroup; 6] = [
        TechnologyGroup::HydrogenReconversion,
        TechnologyGroup::HydrogenProduction,
        TechnologyGroup::CentralHeatStorage,
        TechnologyGroup::DecentralStorage,
        TechnologyGroup::StorageInterfaces,
        TechnologyGroup::Battery,
    ];

    pub fn members(&self) -> &'static [Carrier] {
        match self {
            TechnologyGroup::HydrogenReconversion => &[Carrier::H2ToCh4, Carrier::H2ToPower],
            TechnologyGroup::HydrogenProduction => &[Carrier::PowerToH2, Carrier::Ch4ToH2],
            TechnologyGroup::CentralHeatStorage => &[Carrier::CentralHeatStore],
            TechnologyGroup::DecentralStorage => &[
                Carrier::RuralHeatStore,
                Carrier::H2Overground,
                Carrier::H2Underground,
            ],
            TechnologyGroup::StorageInterfaces => &[
                Carrier::CentralHeatStoreCharger,
                Carrier::CentralHeatStoreDischarger,
                Carrier::RuralHeatStoreCharger,
                Carrier::RuralHeatStoreDischarger,
            ],
            TechnologyGroup::Battery => &[Carrier::Battery],
        }
    }

    pub fn contains(&self, carrier: &Carrier) -> bool {
        self.members().contains(carrier)
    }

    /// Rows of `table` belonging to this group, in table order.
    pub fn select(&self, table: &CarrierTable) -> CarrierTable {
        table.filtered(|c| self.contains(c))
    }

    /// The group a carrier belongs to, if any.
    pub fn of(carrier: &Carrier) -> Option<TechnologyGroup> {
        Self::ALL.into_iter().find(|g| g.contains(carrier))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TechnologyGroup::HydrogenReconversion => "hydrogen_reconversion",
            TechnologyGroup::HydrogenProduction => "hydrogen_production",
            TechnologyGroup::CentralHeatStorage => "central_heat_storage",
            TechnologyGroup::DecentralStorage => "decentral_storage",
            TechnologyGroup::StorageInterfaces => "storage_interfaces",
            TechnologyGroup::Battery => "battery",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_disjoint() {
        for carrier in Carrier::KNOWN {
            let count = TechnologyGroup::ALL.iter().filter(|g| g.contains(carrier)).count();
            assert!(count <= 1, "{carrier} is in {count} groups");
        }
    }

    #[test]
    fn test_select_keeps_table_order() {
        let table = CarrierTable::new()
            .with("H2_to_power", 3.0)
            .with("solar", 10.0)
            .with("H2_to_CH4", 1.0);
        let picked = TechnologyGroup::HydrogenReconversion.select(&table);
        let carriers: Vec<_> = picked.carriers().map(|c| c.as_str()).collect();
        assert_eq!(carriers, vec!["H2_to_power", "H2_to_CH4"]);
        assert!(TechnologyGroup::Battery.select(&table).is_empty());
    }

    #[test]
    fn test_group_of() {
        assert_eq!(
            TechnologyGroup::of(&Carrier::H2Underground),
            Some(TechnologyGroup::DecentralStorage)
        );
        assert_eq!(TechnologyGroup::of(&Carrier::Solar), None);
    }
}
