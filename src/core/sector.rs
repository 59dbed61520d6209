use super::error::{HkdError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A business sector and its flat VAT/PIT rates on revenue.
///
/// Rates are percentages: `vat_rate = 1` means 1% of revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSector {
    pub code: String,
    pub name: String,
    pub name_vi: String,
    #[schemars(with = "f64")]
    pub vat_rate: Decimal,
    #[schemars(with = "f64")]
    pub pit_rate: Decimal,
}

impl BusinessSector {
    pub fn new(code: &str, name: &str, name_vi: &str, vat_rate: Decimal, pit_rate: Decimal) -> Self {
        BusinessSector {
            code: code.to_string(),
            name: name.to_string(),
            name_vi: name_vi.to_string(),
            vat_rate,
            pit_rate,
        }
    }

    /// Combined VAT + PIT percentage
    pub fn total_rate(&self) -> Decimal {
        self.vat_rate + self.pit_rate
    }
}

/// Reference table of sector rates, looked up by sector code.
#[derive(Debug, Clone)]
pub struct SectorTable {
    sectors: Vec<BusinessSector>,
}

impl SectorTable {
    pub fn new(sectors: Vec<BusinessSector>) -> Self {
        SectorTable { sectors }
    }

    /// Find a sector by code (case-insensitive)
    pub fn find(&self, code: &str) -> Result<&BusinessSector> {
        let code = code.trim();
        self.sectors
            .iter()
            .find(|s| s.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| HkdError::UnknownSector(code.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &BusinessSector> {
        self.sectors.iter()
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

impl Default for SectorTable {
    fn default() -> Self {
        SectorTable::new(vec![
            BusinessSector::new("RETAIL", "Retail/Trading", "Bán hàng", dec!(1), dec!(0.5)),
            BusinessSector::new(
                "CONSTRUCTION",
                "Construction with materials",
                "Xây dựng có VL",
                dec!(4.5),
                dec!(2.25),
            ),
            BusinessSector::new("SERVICE", "Services", "Dịch vụ", dec!(7), dec!(3.5)),
            BusinessSector::new("RENTAL", "Rental", "Cho thuê", dec!(10), dec!(5)),
            BusinessSector::new(
                "OTHER_SERVICE",
                "Other services",
                "Dịch vụ khác",
                dec!(3),
                dec!(1.5),
            ),
            BusinessSector::new("TRANSPORT", "Transportation", "Vận tải", dec!(3), dec!(1.5)),
            BusinessSector::new("FOOD", "Food & Beverage", "Ăn uống", dec!(5), dec!(2)),
            BusinessSector::new("HEALTHCARE", "Healthcare", "Y tế", dec!(5), dec!(2)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_eight_sectors() {
        let table = SectorTable::default();
        assert_eq!(table.len(), 8);
        let codes: Vec<_> = table.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes[0], "RETAIL");
        assert!(codes.contains(&"HEALTHCARE"));
    }

    #[test]
    fn find_is_case_insensitive() {
        let table = SectorTable::default();
        let retail = table.find("retail").unwrap();
        assert_eq!(retail.vat_rate, dec!(1));
        assert_eq!(retail.pit_rate, dec!(0.5));
        assert_eq!(table.find(" Rental ").unwrap().total_rate(), dec!(15));
    }

    #[test]
    fn unknown_sector_is_invalid_argument() {
        let table = SectorTable::default();
        let err = table.find("MINING").unwrap_err();
        assert_eq!(err, HkdError::UnknownSector("MINING".to_string()));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn construction_rates() {
        let table = SectorTable::default();
        let construction = table.find("CONSTRUCTION").unwrap();
        assert_eq!(construction.total_rate(), dec!(6.75));
    }
}
