pub mod deal;
pub mod fiscal;
pub mod market;

use clap::ValueEnum;
use prop_deal_core::{BuyerCategory, PropertyCategory};

/// Buyer profile flag values, mapped onto the core enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BuyerArg {
    CitizenFirst,
    CitizenSecond,
    CitizenThirdPlus,
    PrFirst,
    PrSecond,
    Foreigner,
    Entity,
}

impl From<BuyerArg> for BuyerCategory {
    fn from(arg: BuyerArg) -> Self {
        match arg {
            BuyerArg::CitizenFirst => BuyerCategory::CitizenFirst,
            BuyerArg::CitizenSecond => BuyerCategory::CitizenSecond,
            BuyerArg::CitizenThirdPlus => BuyerCategory::CitizenThirdPlus,
            BuyerArg::PrFirst => BuyerCategory::PermanentResidentFirst,
            BuyerArg::PrSecond => BuyerCategory::PermanentResidentSecond,
            BuyerArg::Foreigner => BuyerCategory::Foreigner,
            BuyerArg::Entity => BuyerCategory::Entity,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Hdb,
    Condo,
    Landed,
}

impl From<CategoryArg> for PropertyCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Hdb => PropertyCategory::PublicHousing,
            CategoryArg::Condo => PropertyCategory::Condominium,
            CategoryArg::Landed => PropertyCategory::Landed,
        }
    }
}
